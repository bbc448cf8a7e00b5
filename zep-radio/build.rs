use std::collections::HashMap;
use std::env;
use std::fmt::Write;
use std::path::PathBuf;

fn main() {
    // (Variable, Type, Default value)
    let mut configs: HashMap<&str, (&str, &str)> = HashMap::from([
        ("DEFAULT_CHANNEL", ("u8", "26")),
        ("DEFAULT_PAN_ID", ("u16", "0x0023")),
        ("DEFAULT_LOCAL_PORT", ("u16", "17755")),
        ("DEFAULT_REMOTE_ADDR", ("&str", "\"::1\"")),
        ("DEFAULT_REMOTE_PORT", ("u16", "17754")),
        ("SEND_HELLO", ("bool", "true")),
    ]);

    // Make sure we get rerun if needed
    println!("cargo:rerun-if-changed=build.rs");
    for name in configs.keys() {
        println!("cargo:rerun-if-env-changed=ZEP_RADIO_{name}");
    }

    let mut data = String::new();

    for (var, value) in std::env::vars() {
        if let Some(name) = var.strip_prefix("ZEP_RADIO_") {
            // discard from hashmap as a way of consuming the setting
            let Some((_, (ty, _))) = configs.remove_entry(name) else {
                panic!("Wrong configuration name {name}");
            };

            // string settings are given bare on the command line
            if ty == "&str" {
                writeln!(data, "pub const {name}: {ty} = {value:?};").unwrap();
            } else {
                writeln!(data, "pub const {name}: {ty} = {value};").unwrap();
            }
        }
    }

    // Take the remaining configs and write the default value to the file
    for (name, (ty, value)) in configs.iter() {
        writeln!(data, "pub const {name}: {ty} = {value};").unwrap();
    }

    let out_dir = PathBuf::from(env::var_os("OUT_DIR").unwrap());
    let out_file = out_dir.join("config.rs");
    std::fs::write(out_file, data).unwrap();
}
