//! Minimal IEEE 802.15.4 MAC header reader.
//!
//! A tunnelled frame is only inspected far enough to find out who it is
//! addressed to. Addresses are returned in network byte order, the reverse of
//! their order on air.

use crate::{Error, Result};

/// An IEEE 802.15.4 address.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Address {
    /// No address field.
    Absent,
    /// A 16-bit short address.
    Short([u8; 2]),
    /// A 64-bit extended address.
    Extended([u8; 8]),
}

impl Address {
    /// The broadcast address.
    pub const BROADCAST: Address = Address::Short([0xff; 2]);

    /// Query whether this address is the broadcast address.
    pub fn is_broadcast(&self) -> bool {
        *self == Self::BROADCAST
    }

    /// Return the address octets.
    pub const fn as_bytes(&self) -> &[u8] {
        match self {
            Address::Absent => &[],
            Address::Short(value) => value,
            Address::Extended(value) => value,
        }
    }

    /// Return the length of the address in octets.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }
}

impl core::fmt::Display for Address {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Address::Absent => write!(f, "absent"),
            Address::Short(_) | Address::Extended(_) => {
                for (i, b) in self.as_bytes().iter().enumerate() {
                    if i > 0 {
                        write!(f, ":")?;
                    }
                    write!(f, "{b:02x}")?;
                }
                Ok(())
            }
        }
    }
}

/// IEEE 802.15.4 addressing mode.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum AddressingMode {
    /// Address not present.
    Absent,
    /// Short address.
    Short,
    /// Extended address.
    Extended,
    /// Reserved value.
    Unknown,
}

impl AddressingMode {
    /// Return the size of the address in octets.
    pub fn size(&self) -> usize {
        match self {
            Self::Short => 2,
            Self::Extended => 8,
            Self::Absent | Self::Unknown => 0,
        }
    }
}

impl From<u8> for AddressingMode {
    fn from(value: u8) -> Self {
        match value {
            0b00 => Self::Absent,
            0b10 => Self::Short,
            0b11 => Self::Extended,
            _ => Self::Unknown,
        }
    }
}

/// IEEE 802.15.4 frame type.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum FrameType {
    /// Beacon frame.
    Beacon,
    /// Data frame.
    Data,
    /// Acknowledgment frame.
    Ack,
    /// MAC command frame.
    MacCommand,
    /// Multipurpose frame.
    Multipurpose,
    /// Fragment or Frak frame.
    FragmentOrFrak,
    /// Extended frame type.
    Extended,
    /// Reserved value.
    Unknown,
}

impl From<u8> for FrameType {
    fn from(value: u8) -> Self {
        match value {
            0b000 => Self::Beacon,
            0b001 => Self::Data,
            0b010 => Self::Ack,
            0b011 => Self::MacCommand,
            0b101 => Self::Multipurpose,
            0b110 => Self::FragmentOrFrak,
            0b111 => Self::Extended,
            _ => Self::Unknown,
        }
    }
}

/// IEEE 802.15.4 frame version.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum FrameVersion {
    /// IEEE 802.15.4-2003.
    Ieee802154_2003,
    /// IEEE 802.15.4-2006.
    Ieee802154_2006,
    /// IEEE 802.15.4-2015 and later.
    Ieee802154_2020,
    /// Reserved value.
    Unknown,
}

impl From<u8> for FrameVersion {
    fn from(value: u8) -> Self {
        match value {
            0b00 => Self::Ieee802154_2003,
            0b01 => Self::Ieee802154_2006,
            0b10 => Self::Ieee802154_2020,
            _ => Self::Unknown,
        }
    }
}

/// A reader for the IEEE 802.15.4 Frame Control field.
pub struct FrameControl<T: AsRef<[u8]>> {
    buffer: T,
}

impl<T: AsRef<[u8]>> FrameControl<T> {
    /// Create a new [`FrameControl`] reader.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer is shorter than two octets.
    pub fn new(buffer: T) -> Result<Self> {
        let fc = Self::new_unchecked(buffer);

        if fc.buffer.as_ref().len() < 2 {
            return Err(Error::BufferTooShort);
        }

        Ok(fc)
    }

    /// Create a new [`FrameControl`] reader without length checking.
    pub fn new_unchecked(buffer: T) -> Self {
        Self { buffer }
    }

    fn raw(&self) -> u16 {
        let b = &self.buffer.as_ref()[..2];
        u16::from_le_bytes([b[0], b[1]])
    }

    fn bit(&self, offset: u16) -> bool {
        (self.raw() >> offset) & 0b1 == 1
    }

    /// Return the [`FrameType`].
    pub fn frame_type(&self) -> FrameType {
        FrameType::from((self.raw() & 0b111) as u8)
    }

    /// Returns `true` when the security enabled field is set.
    pub fn security_enabled(&self) -> bool {
        self.bit(3)
    }

    /// Returns `true` when the frame pending field is set.
    pub fn frame_pending(&self) -> bool {
        self.bit(4)
    }

    /// Returns `true` when the acknowledgement request field is set.
    pub fn ack_request(&self) -> bool {
        self.bit(5)
    }

    /// Returns `true` when the PAN ID compression field is set.
    pub fn pan_id_compression(&self) -> bool {
        self.bit(6)
    }

    /// Returns `true` when the sequence number suppression field is set.
    pub fn sequence_number_suppression(&self) -> bool {
        self.bit(8)
    }

    /// Return the destination [`AddressingMode`].
    pub fn dst_addressing_mode(&self) -> AddressingMode {
        AddressingMode::from(((self.raw() >> 10) & 0b11) as u8)
    }

    /// Return the [`FrameVersion`].
    pub fn frame_version(&self) -> FrameVersion {
        FrameVersion::from(((self.raw() >> 12) & 0b11) as u8)
    }

    /// Return the source [`AddressingMode`].
    pub fn src_addressing_mode(&self) -> AddressingMode {
        AddressingMode::from(((self.raw() >> 14) & 0b11) as u8)
    }
}

/// Which addressing fields are present, per frame version.
struct PresentFields {
    dst_pan_id: bool,
    dst: AddressingMode,
    src_pan_id: bool,
    src: AddressingMode,
}

impl PresentFields {
    fn new<T: AsRef<[u8]>>(fc: &FrameControl<T>) -> Option<Self> {
        use AddressingMode::*;

        let dst = fc.dst_addressing_mode();
        let src = fc.src_addressing_mode();
        if dst == Unknown || src == Unknown {
            return None;
        }
        let compressed = fc.pan_id_compression();

        let (dst_pan_id, src_pan_id) = match fc.frame_version() {
            FrameVersion::Ieee802154_2003 | FrameVersion::Ieee802154_2006 => match (dst, src) {
                (Absent, Absent) => (false, false),
                (Absent, _) => (false, true),
                (_, Absent) => (true, false),
                _ => (true, !compressed),
            },
            FrameVersion::Ieee802154_2020 => match (dst, src, compressed) {
                (Absent, Absent, c) => (c, false),
                (_, Absent, c) => (!c, false),
                (Absent, _, c) => (false, !c),
                (Extended, Extended, c) => (!c, false),
                (_, _, c) => (true, !c),
            },
            FrameVersion::Unknown => return None,
        };

        Some(Self {
            dst_pan_id,
            dst,
            src_pan_id,
            src,
        })
    }
}

/// A reader for the start of an IEEE 802.15.4 MAC frame.
pub struct MacHeader<T: AsRef<[u8]>> {
    buffer: T,
}

impl<T: AsRef<[u8]>> MacHeader<T> {
    /// Create a new [`MacHeader`] reader.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer cannot hold the frame control field and
    /// the sequence number it announces.
    pub fn new(buffer: T) -> Result<Self> {
        let header = Self::new_unchecked(buffer);
        let len = header.buffer.as_ref().len();

        if len < 2 || len < header.addressing_offset() {
            return Err(Error::BufferTooShort);
        }

        Ok(header)
    }

    /// Create a new [`MacHeader`] reader without length checking.
    pub fn new_unchecked(buffer: T) -> Self {
        Self { buffer }
    }

    /// Return a [`FrameControl`] reader.
    pub fn frame_control(&self) -> FrameControl<&'_ [u8]> {
        FrameControl::new_unchecked(&self.buffer.as_ref()[..2])
    }

    /// Return the sequence number if not suppressed.
    pub fn sequence_number(&self) -> Option<u8> {
        if self.frame_control().sequence_number_suppression() {
            None
        } else {
            self.buffer.as_ref().get(2).copied()
        }
    }

    fn addressing_offset(&self) -> usize {
        if self.frame_control().sequence_number_suppression() {
            2
        } else {
            3
        }
    }

    fn read_u16(&self, offset: usize) -> Option<u16> {
        let b = self.buffer.as_ref().get(offset..offset + 2)?;
        Some(u16::from_le_bytes([b[0], b[1]]))
    }

    fn read_address(&self, offset: usize, mode: AddressingMode) -> Option<Address> {
        match mode {
            AddressingMode::Absent => Some(Address::Absent),
            AddressingMode::Short => {
                let mut raw = [0u8; 2];
                raw.copy_from_slice(self.buffer.as_ref().get(offset..offset + 2)?);
                raw.reverse();
                Some(Address::Short(raw))
            }
            AddressingMode::Extended => {
                let mut raw = [0u8; 8];
                raw.copy_from_slice(self.buffer.as_ref().get(offset..offset + 8)?);
                raw.reverse();
                Some(Address::Extended(raw))
            }
            AddressingMode::Unknown => None,
        }
    }

    /// Return the destination PAN ID if present.
    pub fn dst_pan_id(&self) -> Option<u16> {
        let fields = PresentFields::new(&self.frame_control())?;
        if fields.dst_pan_id {
            self.read_u16(self.addressing_offset())
        } else {
            None
        }
    }

    /// Return the destination [`Address`].
    ///
    /// Returns `None` when the addressing mode is reserved or the frame is
    /// too short to hold the address.
    pub fn dst_address(&self) -> Option<Address> {
        let fields = PresentFields::new(&self.frame_control())?;
        let offset = self.addressing_offset() + if fields.dst_pan_id { 2 } else { 0 };
        self.read_address(offset, fields.dst)
    }

    /// Return the source PAN ID if present.
    pub fn src_pan_id(&self) -> Option<u16> {
        let fields = PresentFields::new(&self.frame_control())?;
        if fields.src_pan_id {
            let offset = self.addressing_offset()
                + if fields.dst_pan_id { 2 } else { 0 }
                + fields.dst.size();
            self.read_u16(offset)
        } else {
            None
        }
    }

    /// Return the source [`Address`].
    pub fn src_address(&self) -> Option<Address> {
        let fields = PresentFields::new(&self.frame_control())?;
        let offset = self.addressing_offset()
            + if fields.dst_pan_id { 2 } else { 0 }
            + fields.dst.size()
            + if fields.src_pan_id { 2 } else { 0 };
        self.read_address(offset, fields.src)
    }

    /// Return the length of the header up to and including the addressing
    /// fields. An auxiliary security header is not accounted for.
    pub fn header_len(&self) -> Option<usize> {
        let fields = PresentFields::new(&self.frame_control())?;
        Some(
            self.addressing_offset()
                + if fields.dst_pan_id { 2 } else { 0 }
                + fields.dst.size()
                + if fields.src_pan_id { 2 } else { 0 }
                + fields.src.size(),
        )
    }

    /// Return the octets following the addressing fields.
    pub fn payload(&self) -> Option<&[u8]> {
        self.buffer.as_ref().get(self.header_len()?..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_broadcast() {
        assert!(Address::BROADCAST.is_broadcast());
        assert!(Address::Short([0xff, 0xff]).is_broadcast());
        assert!(!Address::Short([0xff, 0xfe]).is_broadcast());
        assert!(!Address::Extended([0xff; 8]).is_broadcast());
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Address::BROADCAST), "ff:ff");
        assert_eq!(
            format!("{}", Address::Extended([0x00, 0x12, 0x4b, 0x00, 0x14, 0xb5, 0xd9, 0xc7])),
            "00:12:4b:00:14:b5:d9:c7"
        );
        assert_eq!(format!("{}", Address::Absent), "absent");
    }

    #[test]
    fn data_frame_broadcast() {
        let frame = [
            0x41, 0xd8, 0x01, 0xcd, 0xab, 0xff, 0xff, 0xc7, 0xd9, 0xb5, 0x14, 0x00, 0x4b, 0x12,
            0x00, 0x2b, 0x00, 0x00, 0x00,
        ];
        let mac = MacHeader::new(&frame[..]).unwrap();
        let fc = mac.frame_control();

        assert_eq!(fc.frame_type(), FrameType::Data);
        assert!(fc.pan_id_compression());
        assert_eq!(fc.frame_version(), FrameVersion::Ieee802154_2006);
        assert_eq!(fc.dst_addressing_mode(), AddressingMode::Short);
        assert_eq!(fc.src_addressing_mode(), AddressingMode::Extended);

        assert_eq!(mac.sequence_number(), Some(1));
        assert_eq!(mac.dst_pan_id(), Some(0xabcd));
        assert_eq!(mac.dst_address(), Some(Address::BROADCAST));
        assert_eq!(mac.src_pan_id(), None);
        assert_eq!(
            mac.src_address(),
            Some(Address::Extended([
                0x00, 0x12, 0x4b, 0x00, 0x14, 0xb5, 0xd9, 0xc7
            ]))
        );
        assert_eq!(mac.header_len(), Some(15));
        assert_eq!(mac.payload(), Some(&[0x2b, 0x00, 0x00, 0x00][..]));
    }

    #[test]
    fn extended_destination() {
        // Data, PAN ID compression, dst and src extended, 2006.
        let frame = [
            0x41, 0xdc, 0x05, 0xcd, 0xab, 0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01, 0x18,
            0x17, 0x16, 0x15, 0x14, 0x13, 0x12, 0x11, 0xaa,
        ];
        let mac = MacHeader::new(&frame[..]).unwrap();

        assert_eq!(
            mac.dst_address(),
            Some(Address::Extended([1, 2, 3, 4, 5, 6, 7, 8]))
        );
        assert_eq!(
            mac.src_address(),
            Some(Address::Extended([
                0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17, 0x18
            ]))
        );
    }

    #[test]
    fn sequence_number_suppressed() {
        // Data, 2020, sequence number suppressed, dst short, src absent.
        let frame = [0x01, 0x29, 0xcd, 0xab, 0x34, 0x12];
        let mac = MacHeader::new(&frame[..]).unwrap();

        assert_eq!(mac.sequence_number(), None);
        assert_eq!(mac.dst_pan_id(), Some(0xabcd));
        assert_eq!(mac.dst_address(), Some(Address::Short([0x12, 0x34])));
        assert_eq!(mac.src_address(), Some(Address::Absent));
    }

    #[test]
    fn truncated_destination() {
        let frame = [0x41, 0xdc, 0x05, 0xcd, 0xab, 0x08, 0x07];
        let mac = MacHeader::new(&frame[..]).unwrap();
        assert_eq!(mac.dst_address(), None);

        assert!(MacHeader::new(&frame[..1]).is_err());
        assert!(MacHeader::new(&frame[..2]).is_err());
    }

    #[test]
    fn reserved_addressing_mode() {
        // dst addressing mode 0b01 is reserved.
        let frame = [0x41, 0xc4, 0x01, 0xcd, 0xab, 0xff, 0xff];
        let mac = MacHeader::new(&frame[..]).unwrap();
        assert_eq!(mac.frame_control().dst_addressing_mode(), AddressingMode::Unknown);
        assert_eq!(mac.dst_address(), None);
    }
}
