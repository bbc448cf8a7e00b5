use crate::{Error, NtpTimestamp, Result, ZepHeader, ZepType, HELLO_TAG, HEADER_LEN, ZEP_VERSION_2};

/// LQI mode announcing that the LQI field is filled in.
pub const LQI_MODE_PRESENT: u8 = 1;
/// LQI value sent when no link quality was measured.
pub const LQI_PLACEHOLDER: u8 = 0xff;

/// A high-level representation of a ZEP v2 header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub struct ZepHeaderRepr {
    /// The datagram type.
    pub frame_type: ZepType,
    /// The channel.
    pub channel: u8,
    /// The tag of the sending device.
    pub device_id: u16,
    /// The LQI mode.
    pub lqi_mode: u8,
    /// The LQI value.
    pub lqi: u8,
    /// The send timestamp.
    pub timestamp: NtpTimestamp,
    /// The sequence number.
    pub sequence: u32,
    /// The payload length, including the FCS.
    pub length: u8,
}

impl ZepHeaderRepr {
    /// A data header as sent by a simulated radio.
    pub fn data(
        channel: u8,
        device_id: u16,
        sequence: u32,
        length: u8,
        timestamp: NtpTimestamp,
    ) -> Self {
        Self {
            frame_type: ZepType::Data,
            channel,
            device_id,
            lqi_mode: LQI_MODE_PRESENT,
            lqi: LQI_PLACEHOLDER,
            timestamp,
            sequence,
            length,
        }
    }

    /// The header registering a device with a ZEP dispatcher. Only the
    /// length of the hardware address that follows is filled in.
    pub fn hello(length: u8) -> Self {
        Self {
            frame_type: ZepType::Hello,
            channel: 0,
            device_id: 0,
            lqi_mode: 0,
            lqi: 0,
            timestamp: NtpTimestamp::default(),
            sequence: 0,
            length,
        }
    }

    /// Parse a data header.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedType`] for anything but a data header; ACK
    /// and HELLO datagrams included.
    pub fn parse<T: AsRef<[u8]>>(reader: &ZepHeader<T>) -> Result<Self> {
        let frame_type = reader.frame_type();
        if frame_type != ZepType::Data {
            return Err(Error::UnsupportedType);
        }

        Ok(Self {
            frame_type,
            channel: reader.channel(),
            device_id: reader.device_id(),
            lqi_mode: reader.lqi_mode(),
            lqi: reader.lqi(),
            timestamp: reader.timestamp(),
            sequence: reader.sequence(),
            length: reader.length(),
        })
    }

    /// Return the length of the header when emitted into a buffer.
    pub fn buffer_len(&self) -> usize {
        HEADER_LEN
    }

    /// Emit the header into a buffer.
    pub fn emit<T: AsRef<[u8]> + AsMut<[u8]>>(&self, header: &mut ZepHeader<T>) {
        header.set_preamble();
        header.set_version(ZEP_VERSION_2);
        header.set_frame_type(self.frame_type);
        header.set_channel(self.channel);
        header.set_device_id(self.device_id);
        header.set_lqi_mode(self.lqi_mode);
        header.set_lqi(self.lqi);
        header.set_timestamp(self.timestamp);
        header.set_sequence(self.sequence);
        match self.frame_type {
            ZepType::Hello => header.set_reserved(&HELLO_TAG),
            _ => header.set_reserved(&[]),
        }
        header.set_length(self.length);
    }
}

/// Decode and validate the ZEP header at the start of a datagram.
///
/// This is [`ZepHeader::new`] followed by [`ZepHeaderRepr::parse`].
pub fn decode_header(datagram: &[u8]) -> Result<ZepHeaderRepr> {
    ZepHeaderRepr::parse(&ZepHeader::new(datagram)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let repr = ZepHeaderRepr::data(
            11,
            0x1234,
            u32::MAX,
            127,
            NtpTimestamp::from_unix(1_700_000_000, 500_000),
        );

        let mut buffer = [0xffu8; HEADER_LEN];
        repr.emit(&mut ZepHeader::new_unchecked(&mut buffer[..]));

        let parsed = decode_header(&buffer).unwrap();
        assert_eq!(parsed.channel, 11);
        assert_eq!(parsed.device_id, 0x1234);
        assert_eq!(parsed.sequence, u32::MAX);
        assert_eq!(parsed.length, 127);
        assert_eq!(parsed, repr);
    }

    #[test]
    fn emit_is_byte_exact() {
        let repr = ZepHeaderRepr::data(
            26,
            0xbeef,
            0x0102_0304,
            5,
            NtpTimestamp {
                seconds: 0xa0b0_c0d0,
                fraction: 0x0a0b_0c0d,
            },
        );

        let mut buffer = [0xffu8; HEADER_LEN];
        repr.emit(&mut ZepHeader::new_unchecked(&mut buffer[..]));

        assert_eq!(
            hex::encode(buffer),
            "455802011abeef01ffa0b0c0d00a0b0c0d010203040000000000000000000005"
        );
    }

    #[test]
    fn hello_header() {
        let mut buffer = [0xffu8; HEADER_LEN];
        ZepHeaderRepr::hello(8).emit(&mut ZepHeader::new_unchecked(&mut buffer[..]));

        let mut expected = [0u8; HEADER_LEN];
        expected[..4].copy_from_slice(&[b'E', b'X', 2, 255]);
        expected[21..26].copy_from_slice(b"HELLO");
        expected[31] = 8;
        assert_eq!(buffer, expected);

        // A HELLO is a valid header, but not a data header.
        assert!(ZepHeader::new(&buffer[..]).is_ok());
        assert_eq!(decode_header(&buffer), Err(Error::UnsupportedType));
    }

    #[test]
    fn reject_ack() {
        let mut buffer = [0u8; HEADER_LEN];
        let mut repr = ZepHeaderRepr::data(26, 0, 0, 2, NtpTimestamp::default());
        repr.frame_type = ZepType::Ack;
        repr.emit(&mut ZepHeader::new_unchecked(&mut buffer[..]));

        assert_eq!(decode_header(&buffer), Err(Error::UnsupportedType));
    }

    #[test]
    fn errors_are_propagated() {
        assert_eq!(decode_header(b"XE\x02"), Err(Error::BadPreamble));
        assert_eq!(decode_header(b"EX\x01"), Err(Error::UnsupportedVersion));
        assert_eq!(decode_header(b"EX\x02\x01"), Err(Error::Truncated));
    }
}
