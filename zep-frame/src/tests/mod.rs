use super::*;

/// A ZEP data datagram carrying a data frame from 0x0001 to 0x1234, PAN 0x0023.
const DATAGRAM: [u8; 45] = [
    // ZEP header
    0x45, 0x58, 0x02, 0x01, 0x1a, 0x00, 0x01, 0x01, 0xff, 0xe9, 0x2e, 0x42, 0x80, 0x00, 0x00,
    0x10, 0x00, 0x00, 0x00, 0x00, 0x07, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x0d, // MAC header
    0x41, 0x88, 0x05, 0x23, 0x00, 0x34, 0x12, 0x01, 0x00, // MAC payload
    0xde, 0xad, // FCS
    0xb8, 0xcf,
];

#[test]
fn parse_data_datagram() {
    let header = ZepHeader::new(&DATAGRAM[..]).unwrap();
    let repr = ZepHeaderRepr::parse(&header).unwrap();

    assert_eq!(repr.frame_type, ZepType::Data);
    assert_eq!(repr.channel, 26);
    assert_eq!(repr.device_id, 0x0001);
    assert_eq!(repr.lqi_mode, LQI_MODE_PRESENT);
    assert_eq!(repr.lqi, LQI_PLACEHOLDER);
    assert_eq!(repr.sequence, 7);
    assert_eq!(repr.length, 13);
    assert_eq!(
        repr.timestamp,
        NtpTimestamp {
            seconds: 0xe92e_4280,
            fraction: 0x0000_1000,
        }
    );

    assert_eq!(header.payload().len(), repr.length as usize);
}

#[test]
fn parse_tunnelled_frame() {
    let header = ZepHeader::new(&DATAGRAM[..]).unwrap();
    let mac = MacHeader::new(header.payload()).unwrap();

    let fc = mac.frame_control();
    assert_eq!(fc.frame_type(), FrameType::Data);
    assert_eq!(fc.frame_version(), FrameVersion::Ieee802154_2003);
    assert!(fc.pan_id_compression());
    assert!(!fc.security_enabled());

    assert_eq!(mac.sequence_number(), Some(5));
    assert_eq!(mac.dst_pan_id(), Some(0x0023));
    assert_eq!(mac.dst_address(), Some(Address::Short([0x12, 0x34])));
    assert_eq!(mac.src_pan_id(), None);
    assert_eq!(mac.src_address(), Some(Address::Short([0x00, 0x01])));
}

#[test]
fn fcs_covers_frame_without_trailer() {
    let header = ZepHeader::new(&DATAGRAM[..]).unwrap();
    let payload = header.payload();
    let (frame, fcs) = payload.split_at(payload.len() - FCS_LEN);

    assert_eq!(checksum([frame]), 0xcfb8);
    assert_eq!(fcs, [0xb8, 0xcf]);

    // The checksum does not depend on how the frame is split.
    let (mhr, body) = frame.split_at(9);
    assert_eq!(checksum([mhr, body]), checksum([frame]));
}

#[test]
fn emit_matches_captured_header() {
    let repr = ZepHeaderRepr::data(
        26,
        0x0001,
        7,
        13,
        NtpTimestamp {
            seconds: 0xe92e_4280,
            fraction: 0x0000_1000,
        },
    );

    let mut buffer = vec![0; repr.buffer_len()];
    repr.emit(&mut ZepHeader::new_unchecked(&mut buffer[..]));

    assert_eq!(buffer, DATAGRAM[..HEADER_LEN]);
}

#[test]
fn header_only_datagram() {
    // A length of zero with nothing behind the header still parses; checking
    // the announced length against the datagram is left to the receiver.
    let mut datagram = DATAGRAM;
    datagram[31] = 0;

    let header = ZepHeader::new(&datagram[..HEADER_LEN]).unwrap();
    assert_eq!(header.length(), 0);
    assert!(header.payload().is_empty());
}
