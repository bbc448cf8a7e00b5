use colored::*;
use zep_frame::*;

struct Writer<'b> {
    buffer: &'b mut String,
    indent: usize,
}

impl<'b> Writer<'b> {
    fn new(buffer: &'b mut String) -> Self {
        Self { buffer, indent: 0 }
    }

    fn increase_indent(&mut self) {
        self.indent += 2;
    }

    fn decrease_indent(&mut self) {
        self.indent -= 2;
    }

    fn write(&mut self, s: String) {
        self.buffer.push_str(&" ".repeat(self.indent));
        self.buffer.push_str(&s);
    }

    fn writeln(&mut self, s: String) {
        self.write(s);
        self.buffer.push('\n');
    }

    fn field(&mut self, name: &str, value: impl core::fmt::Display) {
        self.writeln(format!("{}: {}", name.bold(), value));
    }

    fn section(&mut self, title: &str) {
        self.writeln(title.underline().bold().to_string());
    }
}

/// An error preventing a datagram from being displayed.
#[derive(Debug)]
pub enum ParseError {
    /// The input is not valid hex.
    Hex(hex::FromHexError),
    /// The ZEP header is invalid.
    Frame(Error),
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParseError::Hex(err) => write!(f, "invalid hex input: {err}"),
            ParseError::Frame(err) => write!(f, "invalid datagram: {err}"),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<hex::FromHexError> for ParseError {
    fn from(err: hex::FromHexError) -> Self {
        ParseError::Hex(err)
    }
}

impl From<Error> for ParseError {
    fn from(err: Error) -> Self {
        ParseError::Frame(err)
    }
}

pub struct DatagramParser {}

impl DatagramParser {
    pub fn parse_hex(input: &str) -> core::result::Result<String, ParseError> {
        let data = hex::decode(input.trim())?;
        Self::parse(&data)
    }

    pub fn parse(input: &[u8]) -> core::result::Result<String, ParseError> {
        let header = ZepHeader::new(input)?;
        let mut buffer = String::new();

        let mut w = Writer::new(&mut buffer);

        // -----------------------------------------------------------------
        // ZEP Header
        // -----------------------------------------------------------------
        w.section("ZEP Header");
        w.increase_indent();
        w.field("version", header.version());
        w.field(
            "type",
            format!("{:?}", header.frame_type()).bright_blue(),
        );

        if header.frame_type() == ZepType::Hello {
            w.field("length", header.length());
            w.decrease_indent();

            // -------------------------------------------------------------
            // Hardware Address
            // -------------------------------------------------------------
            w.section("Hardware Address");
            w.increase_indent();
            match <[u8; 8]>::try_from(header.payload()) {
                Ok(hwaddr) => w.writeln(Address::Extended(hwaddr).to_string()),
                Err(_) => w.writeln(format!("invalid: {:x?}", header.payload())),
            }
            w.decrease_indent();

            return Ok(buffer);
        }

        w.field("channel", header.channel());
        w.field("device id", format!("{:04x}", header.device_id()));
        w.field("lqi mode", header.lqi_mode());
        w.field("lqi", header.lqi());
        w.field("timestamp", header.timestamp());
        w.field("sequence", header.sequence());
        let length = header.length() as usize;
        w.field(
            "length",
            if length == header.payload().len() {
                length.to_string().normal()
            } else {
                format!("{} (received {})", length, header.payload().len()).red()
            },
        );
        w.decrease_indent();

        let payload = header.payload();
        let payload = &payload[..length.min(payload.len())];
        if payload.len() < FCS_LEN {
            return Ok(buffer);
        }
        let (frame, fcs) = payload.split_at(payload.len() - FCS_LEN);

        let Ok(mac) = MacHeader::new(frame) else {
            w.section("Frame");
            w.increase_indent();
            w.writeln(format!("{:x?}", frame));
            w.decrease_indent();
            return Ok(buffer);
        };

        let fc = mac.frame_control();

        // -----------------------------------------------------------------
        // Frame Control
        // -----------------------------------------------------------------
        w.section("Frame Control");
        w.increase_indent();
        w.field("frame type", format!("{:?}", fc.frame_type()).bright_blue());
        w.field("security", fc.security_enabled() as usize);
        w.field("frame pending", fc.frame_pending() as usize);
        w.field("ack request", fc.ack_request() as usize);
        w.field("pan id compression", fc.pan_id_compression() as usize);
        w.field(
            "sequence number suppression",
            fc.sequence_number_suppression() as usize,
        );
        w.field("dst addressing mode", format!("{:?}", fc.dst_addressing_mode()));
        w.field("src addressing mode", format!("{:?}", fc.src_addressing_mode()));
        w.field(
            "frame version",
            format!("{} ({:?})", fc.frame_version() as usize, fc.frame_version()),
        );
        w.decrease_indent();

        // -----------------------------------------------------------------
        // Sequence Number
        // -----------------------------------------------------------------
        if let Some(seq) = mac.sequence_number() {
            w.section("Sequence Number");
            w.increase_indent();
            w.field("sequence number", seq);
            w.decrease_indent();
        }

        // -----------------------------------------------------------------
        // Addressing
        // -----------------------------------------------------------------
        w.section("Addressing");
        w.increase_indent();
        if let Some(dst_pan_id) = mac.dst_pan_id() {
            w.writeln(format!("{}: {:x}", "dst pan id".bold(), dst_pan_id));
        }
        if let Some(dst_addr) = mac.dst_address() {
            w.writeln(format!(
                "{}: {}{}",
                "dst addr".bold(),
                dst_addr,
                if dst_addr.is_broadcast() {
                    " (broadcast)"
                } else {
                    ""
                }
            ));
        }
        if let Some(src_pan_id) = mac.src_pan_id() {
            w.writeln(format!("{}: {:x}", "src pan id".bold(), src_pan_id));
        }
        if let Some(src_addr) = mac.src_address() {
            w.field("src addr", src_addr);
        }
        w.decrease_indent();

        // -----------------------------------------------------------------
        // Payload
        // -----------------------------------------------------------------
        if let Some(mac_payload) = mac.payload() {
            w.section("Payload");
            w.increase_indent();
            w.writeln(format!("{:x?}", mac_payload));
            w.decrease_indent();
        }

        // -----------------------------------------------------------------
        // FCS
        // -----------------------------------------------------------------
        let expected = checksum([frame]);
        let received = u16::from_le_bytes([fcs[0], fcs[1]]);
        w.section("FCS");
        w.increase_indent();
        w.writeln(if expected == received {
            format!("{:04x} {}", received, "(valid)".green())
        } else {
            format!(
                "{:04x} {}",
                received,
                format!("(invalid, expected {expected:04x})").red()
            )
        });
        w.decrease_indent();

        Ok(buffer)
    }
}
