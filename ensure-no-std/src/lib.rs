//! Build with a target without `std`, e.g. `thumbv7em-none-eabihf`.
#![no_std]

use zep_frame::{checksum, decode_header, MacHeader, ZepHeader, FCS_LEN};

/// Return the FCS of the frame in `datagram` if it is a data datagram.
pub fn frame_fcs(datagram: &[u8]) -> Option<u16> {
    decode_header(datagram).ok()?;
    let header = ZepHeader::new(datagram).ok()?;
    let payload = header.payload();
    let frame = payload.get(..payload.len().checked_sub(FCS_LEN)?)?;
    MacHeader::new(frame).ok()?;
    Some(checksum([frame]))
}
