use zep_cat::{DatagramParser, ParseError};

fn parse(input: &str) -> String {
    let output = DatagramParser::parse_hex(input).unwrap();
    String::from_utf8(strip_ansi_escapes::strip(output)).unwrap()
}

#[test]
fn data_datagram() {
    assert_eq!(
        parse("455802011a000101ffe92e42800000100000000007000000000000000000000d418805230034120100deadb8cf"),
        r#"ZEP Header
  version: 2
  type: Data
  channel: 26
  device id: 0001
  lqi mode: 1
  lqi: 255
  timestamp: 3912123008.00001000
  sequence: 7
  length: 13
Frame Control
  frame type: Data
  security: 0
  frame pending: 0
  ack request: 0
  pan id compression: 1
  sequence number suppression: 0
  dst addressing mode: Short
  src addressing mode: Short
  frame version: 0 (Ieee802154_2003)
Sequence Number
  sequence number: 5
Addressing
  dst pan id: 23
  dst addr: 12:34
  src addr: 00:01
Payload
  [de, ad]
FCS
  cfb8 (valid)
"#
    );
}

#[test]
fn corrupted_fcs() {
    let output = parse(
        "455802011a000101ffe92e42800000100000000007000000000000000000000d418805230034120100deaeb8cf",
    );
    assert!(output.ends_with("Payload\n  [de, ae]\nFCS\n  cfb8 (invalid, expected fd23)\n"));
}

#[test]
fn broadcast_destination() {
    let output = parse(
        "455802011a000101ffe92e42800000100000000007000000000000000000000b4188052300ffff0100872e",
    );
    assert!(output.contains("  dst addr: ff:ff (broadcast)\n"));
}

#[test]
fn hello_datagram() {
    assert_eq!(
        parse("455802ff000000000000000000000000000000000048454c4c4f0000000000080211223344556677"),
        r#"ZEP Header
  version: 2
  type: Hello
  length: 8
Hardware Address
  02:11:22:33:44:55:66:77
"#
    );
}

#[test]
fn invalid_input() {
    assert!(matches!(
        DatagramParser::parse_hex("45580"),
        Err(ParseError::Hex(_))
    ));
    assert!(matches!(
        DatagramParser::parse_hex("45580301"),
        Err(ParseError::Frame(zep_frame::Error::UnsupportedVersion))
    ));
}
