//! Zero-copy read and write structures for ZEP v2 datagrams.
//!
//! A ZEP (ZigBee Encapsulation Protocol) datagram is a fixed 32-octet header
//! followed by an IEEE 802.15.4 frame, including its trailing Frame Check
//! Sequence. This crate provides:
//! - [`ZepHeader`]: a reader/writer over a raw datagram buffer.
//! - [`ZepHeaderRepr`]: a high-level representation that can be parsed from
//!   and emitted into a [`ZepHeader`].
//! - [`checksum`] and [`Fcs`]: the IEEE 802.15.4 FCS, computed incrementally
//!   over any number of buffers.
//! - [`MacHeader`]: a minimal reader for the IEEE 802.15.4 MAC header of the
//!   tunnelled frame, enough to filter on the destination [`Address`].
//!
//! Each reader contains the following functions:
//! - [`new`]: Create a new reader, validating the buffer.
//! - [`new_unchecked`]: Create a new reader without checking the buffer.
//!
//! ## Reading and writing a header
//! ```
//! # use zep_frame::{
//! #   Address, MacHeader, NtpTimestamp, ZepHeader, ZepHeaderRepr, ZepType, HEADER_LEN,
//! # };
//! let payload = [
//!     0x41, 0xd8, 0x01, 0xcd, 0xab, 0xff, 0xff, 0xc7, 0xd9, 0xb5, 0x14, 0x00, 0x4b, 0x12,
//!     0x00, 0x2b,
//! ];
//! let repr = ZepHeaderRepr::data(26, 0xbeef, 7, payload.len() as u8 + 2, NtpTimestamp::default());
//!
//! let mut buffer = [0u8; HEADER_LEN];
//! repr.emit(&mut ZepHeader::new_unchecked(&mut buffer[..]));
//!
//! let header = ZepHeader::new(&buffer[..]).unwrap();
//! assert_eq!(header.frame_type(), ZepType::Data);
//! assert_eq!(ZepHeaderRepr::parse(&header).unwrap().sequence, 7);
//!
//! let mac = MacHeader::new(&payload[..]).unwrap();
//! assert_eq!(mac.dst_address(), Some(Address::BROADCAST));
//! ```
//!
//! [`new`]: ZepHeader::new
//! [`new_unchecked`]: ZepHeader::new_unchecked
#![no_std]
#![deny(missing_docs)]
#![deny(unsafe_code)]

#[cfg(any(feature = "std", test))]
#[macro_use]
extern crate std;

#[cfg(test)]
mod tests;

mod checksum;
pub use checksum::*;

mod time;
pub use time::*;

mod zep;
pub use zep::*;

mod mac;
pub use mac::*;

mod repr;
pub use repr::*;

/// An error that can occur when reading or writing a ZEP datagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The datagram does not start with the `"EX"` preamble.
    BadPreamble,
    /// The protocol version is not 2.
    UnsupportedVersion,
    /// The ZEP type is not a data frame.
    UnsupportedType,
    /// The datagram is shorter than its header.
    Truncated,
    /// A buffer is too short for the structure it should contain.
    BufferTooShort,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::BadPreamble => write!(f, "invalid ZEP preamble"),
            Error::UnsupportedVersion => write!(f, "unsupported ZEP version"),
            Error::UnsupportedType => write!(f, "unsupported ZEP type"),
            Error::Truncated => write!(f, "truncated ZEP header"),
            Error::BufferTooShort => write!(f, "buffer too short"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// A type alias for `Result<T, zep_frame::Error>`.
pub type Result<T> = core::result::Result<T, Error>;
