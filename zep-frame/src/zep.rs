//! ZEP header readers and writers.

use crate::NtpTimestamp;
use crate::{Error, Result};

/// The two octets every ZEP datagram starts with.
pub const PREAMBLE: [u8; 2] = *b"EX";
/// The only supported protocol version.
pub const ZEP_VERSION_2: u8 = 2;
/// Length of a ZEP v2 data header in octets.
pub const HEADER_LEN: usize = 32;
/// Length of the reserved field in octets.
pub const RESERVED_LEN: usize = 10;
/// Tag carried in the reserved field of a HELLO datagram.
pub const HELLO_TAG: [u8; 5] = *b"HELLO";

/// Preamble and version, common to every ZEP version.
const PREFIX_LEN: usize = 3;

mod field {
    use core::ops::Range;

    pub const PREAMBLE: Range<usize> = 0..2;
    pub const VERSION: usize = 2;
    pub const TYPE: usize = 3;
    pub const CHANNEL: usize = 4;
    pub const DEVICE_ID: Range<usize> = 5..7;
    pub const LQI_MODE: usize = 7;
    pub const LQI: usize = 8;
    pub const SECONDS: Range<usize> = 9..13;
    pub const FRACTION: Range<usize> = 13..17;
    pub const SEQUENCE: Range<usize> = 17..21;
    pub const RESERVED: Range<usize> = 21..31;
    pub const LENGTH: usize = 31;
}

/// ZEP v2 datagram type.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub enum ZepType {
    /// A tunnelled IEEE 802.15.4 frame.
    Data,
    /// A ZEP level acknowledgment.
    Ack,
    /// Registration with a ZEP dispatcher.
    Hello,
    /// Any other value.
    Unknown,
}

impl From<u8> for ZepType {
    fn from(value: u8) -> Self {
        match value {
            0x01 => Self::Data,
            0x02 => Self::Ack,
            0xff => Self::Hello,
            _ => Self::Unknown,
        }
    }
}

impl From<ZepType> for u8 {
    fn from(value: ZepType) -> Self {
        match value {
            ZepType::Data => 0x01,
            ZepType::Ack => 0x02,
            ZepType::Hello => 0xff,
            ZepType::Unknown => 0x00,
        }
    }
}

/// A reader/writer for a ZEP v2 header and the payload following it.
pub struct ZepHeader<T: AsRef<[u8]>> {
    buffer: T,
}

impl<T: AsRef<[u8]>> ZepHeader<T> {
    /// Create a new [`ZepHeader`] reader/writer from a given buffer.
    ///
    /// The preamble and version are checked first. Only then is the buffer
    /// checked against the length of the header of that version.
    ///
    /// # Errors
    ///
    /// - [`Error::BadPreamble`] if the buffer does not start with `"EX"`, or
    ///   is too short to hold the preamble and the version.
    /// - [`Error::UnsupportedVersion`] if the version is not 2.
    /// - [`Error::Truncated`] if the buffer is shorter than the header.
    pub fn new(buffer: T) -> Result<Self> {
        let header = Self::new_unchecked(buffer);
        let b = header.buffer.as_ref();

        if b.len() < PREFIX_LEN || b[field::PREAMBLE] != PREAMBLE {
            return Err(Error::BadPreamble);
        }

        match b[field::VERSION] {
            ZEP_VERSION_2 => {
                if !header.check_len() {
                    return Err(Error::Truncated);
                }
                Ok(header)
            }
            _ => Err(Error::UnsupportedVersion),
        }
    }

    /// Returns `false` if the buffer is too short to contain a v2 header.
    fn check_len(&self) -> bool {
        self.buffer.as_ref().len() >= HEADER_LEN
    }

    /// Create a new [`ZepHeader`] reader/writer without checking the buffer.
    pub fn new_unchecked(buffer: T) -> Self {
        Self { buffer }
    }

    /// Return the protocol version.
    pub fn version(&self) -> u8 {
        self.buffer.as_ref()[field::VERSION]
    }

    /// Return the [`ZepType`].
    pub fn frame_type(&self) -> ZepType {
        ZepType::from(self.buffer.as_ref()[field::TYPE])
    }

    /// Return the channel the frame was sent on.
    pub fn channel(&self) -> u8 {
        self.buffer.as_ref()[field::CHANNEL]
    }

    /// Return the tag of the sending device.
    pub fn device_id(&self) -> u16 {
        let b = &self.buffer.as_ref()[field::DEVICE_ID];
        u16::from_be_bytes([b[0], b[1]])
    }

    /// Return the LQI mode.
    pub fn lqi_mode(&self) -> u8 {
        self.buffer.as_ref()[field::LQI_MODE]
    }

    /// Return the LQI value.
    pub fn lqi(&self) -> u8 {
        self.buffer.as_ref()[field::LQI]
    }

    /// Return the [`NtpTimestamp`] of the frame.
    pub fn timestamp(&self) -> NtpTimestamp {
        let b = self.buffer.as_ref();
        let s = &b[field::SECONDS];
        let f = &b[field::FRACTION];
        NtpTimestamp {
            seconds: u32::from_be_bytes([s[0], s[1], s[2], s[3]]),
            fraction: u32::from_be_bytes([f[0], f[1], f[2], f[3]]),
        }
    }

    /// Return the sequence number.
    pub fn sequence(&self) -> u32 {
        let b = &self.buffer.as_ref()[field::SEQUENCE];
        u32::from_be_bytes([b[0], b[1], b[2], b[3]])
    }

    /// Return the reserved field.
    pub fn reserved(&self) -> &[u8] {
        &self.buffer.as_ref()[field::RESERVED]
    }

    /// Returns `true` when the reserved field carries the HELLO tag.
    pub fn has_hello_tag(&self) -> bool {
        self.reserved().starts_with(&HELLO_TAG)
    }

    /// Return the payload length, including the FCS.
    #[allow(clippy::len_without_is_empty)]
    pub fn length(&self) -> u8 {
        self.buffer.as_ref()[field::LENGTH]
    }

    /// Return the octets following the header.
    pub fn payload(&self) -> &[u8] {
        &self.buffer.as_ref()[HEADER_LEN..]
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> ZepHeader<T> {
    /// Write the `"EX"` preamble.
    pub fn set_preamble(&mut self) {
        self.buffer.as_mut()[field::PREAMBLE].copy_from_slice(&PREAMBLE);
    }

    /// Set the protocol version.
    pub fn set_version(&mut self, version: u8) {
        self.buffer.as_mut()[field::VERSION] = version;
    }

    /// Set the [`ZepType`].
    pub fn set_frame_type(&mut self, frame_type: ZepType) {
        self.buffer.as_mut()[field::TYPE] = frame_type.into();
    }

    /// Set the channel.
    pub fn set_channel(&mut self, channel: u8) {
        self.buffer.as_mut()[field::CHANNEL] = channel;
    }

    /// Set the device tag.
    pub fn set_device_id(&mut self, device_id: u16) {
        self.buffer.as_mut()[field::DEVICE_ID].copy_from_slice(&device_id.to_be_bytes());
    }

    /// Set the LQI mode.
    pub fn set_lqi_mode(&mut self, mode: u8) {
        self.buffer.as_mut()[field::LQI_MODE] = mode;
    }

    /// Set the LQI value.
    pub fn set_lqi(&mut self, lqi: u8) {
        self.buffer.as_mut()[field::LQI] = lqi;
    }

    /// Set the timestamp.
    pub fn set_timestamp(&mut self, timestamp: NtpTimestamp) {
        let b = self.buffer.as_mut();
        b[field::SECONDS].copy_from_slice(&timestamp.seconds.to_be_bytes());
        b[field::FRACTION].copy_from_slice(&timestamp.fraction.to_be_bytes());
    }

    /// Set the sequence number.
    pub fn set_sequence(&mut self, sequence: u32) {
        self.buffer.as_mut()[field::SEQUENCE].copy_from_slice(&sequence.to_be_bytes());
    }

    /// Zero the reserved field and copy `tag` to its start.
    ///
    /// A tag longer than the field is cut off.
    pub fn set_reserved(&mut self, tag: &[u8]) {
        let reserved = &mut self.buffer.as_mut()[field::RESERVED];
        reserved.fill(0);
        let len = tag.len().min(RESERVED_LEN);
        reserved[..len].copy_from_slice(&tag[..len]);
    }

    /// Set the payload length, including the FCS.
    pub fn set_length(&mut self, length: u8) {
        self.buffer.as_mut()[field::LENGTH] = length;
    }
}

impl<T: AsRef<[u8]>> core::fmt::Display for ZepHeader<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "ZEP Header")?;
        writeln!(f, "  version: {}", self.version())?;
        writeln!(f, "  type: {:?}", self.frame_type())?;
        writeln!(f, "  channel: {}", self.channel())?;
        writeln!(f, "  device id: {:04x}", self.device_id())?;
        writeln!(f, "  lqi mode: {}", self.lqi_mode())?;
        writeln!(f, "  lqi: {}", self.lqi())?;
        writeln!(f, "  timestamp: {}", self.timestamp())?;
        writeln!(f, "  sequence: {}", self.sequence())?;
        writeln!(f, "  length: {}", self.length())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_header() -> [u8; HEADER_LEN] {
        let mut b = [0u8; HEADER_LEN];
        b[..9].copy_from_slice(&[b'E', b'X', 2, 1, 26, 0xbe, 0xef, 1, 0xff]);
        b[9..13].copy_from_slice(&0x8326_6f00u32.to_be_bytes());
        b[13..17].copy_from_slice(&0x0000_1000u32.to_be_bytes());
        b[17..21].copy_from_slice(&42u32.to_be_bytes());
        b[31] = 12;
        b
    }

    #[test]
    fn read_fields() {
        let b = data_header();
        let header = ZepHeader::new(&b[..]).unwrap();

        assert_eq!(header.version(), 2);
        assert_eq!(header.frame_type(), ZepType::Data);
        assert_eq!(header.channel(), 26);
        assert_eq!(header.device_id(), 0xbeef);
        assert_eq!(header.lqi_mode(), 1);
        assert_eq!(header.lqi(), 0xff);
        assert_eq!(
            header.timestamp(),
            NtpTimestamp {
                seconds: 0x8326_6f00,
                fraction: 0x1000
            }
        );
        assert_eq!(header.sequence(), 42);
        assert_eq!(header.reserved(), &[0u8; RESERVED_LEN]);
        assert!(!header.has_hello_tag());
        assert_eq!(header.length(), 12);
        assert!(header.payload().is_empty());
    }

    #[test]
    fn bad_preamble() {
        let mut b = data_header();
        b[1] = b'Y';
        assert!(matches!(ZepHeader::new(&b[..]), Err(Error::BadPreamble)));
        assert!(matches!(ZepHeader::new(&b"E"[..]), Err(Error::BadPreamble)));
        assert!(matches!(ZepHeader::new(&[0u8; 0][..]), Err(Error::BadPreamble)));
    }

    #[test]
    fn version_before_length() {
        // A v1 datagram is rejected on its version, whatever its length.
        assert!(matches!(
            ZepHeader::new(&[b'E', b'X', 1][..]),
            Err(Error::UnsupportedVersion)
        ));

        let mut b = data_header();
        b[2] = 3;
        assert!(matches!(
            ZepHeader::new(&b[..]),
            Err(Error::UnsupportedVersion)
        ));
    }

    #[test]
    fn truncated() {
        let b = data_header();
        assert!(matches!(ZepHeader::new(&b[..2]), Err(Error::BadPreamble)));
        assert!(matches!(ZepHeader::new(&b[..3]), Err(Error::Truncated)));
        assert!(matches!(
            ZepHeader::new(&b[..HEADER_LEN - 1]),
            Err(Error::Truncated)
        ));
    }

    #[test]
    fn write_fields() {
        let mut b = [0xaau8; HEADER_LEN];
        let mut header = ZepHeader::new_unchecked(&mut b[..]);
        header.set_preamble();
        header.set_version(ZEP_VERSION_2);
        header.set_frame_type(ZepType::Data);
        header.set_channel(26);
        header.set_device_id(0xbeef);
        header.set_lqi_mode(1);
        header.set_lqi(0xff);
        header.set_timestamp(NtpTimestamp {
            seconds: 0x8326_6f00,
            fraction: 0x1000,
        });
        header.set_sequence(42);
        header.set_reserved(&[]);
        header.set_length(12);

        assert_eq!(b, data_header());
    }

    #[test]
    fn hello_tag() {
        let mut b = data_header();
        let mut header = ZepHeader::new_unchecked(&mut b[..]);
        header.set_frame_type(ZepType::Hello);
        header.set_reserved(&HELLO_TAG);

        let header = ZepHeader::new(&b[..]).unwrap();
        assert_eq!(header.frame_type(), ZepType::Hello);
        assert!(header.has_hello_tag());
        assert_eq!(header.reserved(), b"HELLO\0\0\0\0\0");
    }

    #[test]
    fn zep_type_values() {
        assert_eq!(ZepType::from(1), ZepType::Data);
        assert_eq!(ZepType::from(2), ZepType::Ack);
        assert_eq!(ZepType::from(255), ZepType::Hello);
        assert_eq!(ZepType::from(7), ZepType::Unknown);
        assert_eq!(u8::from(ZepType::Hello), 255);
    }
}
