use clap::Parser;
use zep_cat::DatagramParser;

/// `cat` for ZEP datagrams.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The ZEP datagram to parse, as hex.
    #[clap(value_parser(clap::builder::NonEmptyStringValueParser::new()))]
    input: String,
}

fn main() {
    let args = Args::parse();

    match DatagramParser::parse_hex(&args.input) {
        Ok(output) => print!("{output}"),
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
