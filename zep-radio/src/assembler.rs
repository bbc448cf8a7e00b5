//! Framing of outgoing frames: `[ZEP header][fragment 0]..[fragment n][FCS]`.
use std::io::IoSlice;
use std::time::{SystemTime, UNIX_EPOCH};

use zep_frame::{Fcs, NtpTimestamp, ZepHeader, ZepHeaderRepr, FCS_LEN, HEADER_LEN};

use crate::error::{Error, Result};
use crate::ieee802154::{FRAME_LEN_MAX, LONG_ADDRESS_LEN};

/// Largest payload, FCS included, that is sent. This is the largest PHY
/// payload, which is also all a receiving device accepts.
pub const PAYLOAD_LEN_MAX: usize = FRAME_LEN_MAX;

/// The current host time as an NTP timestamp.
pub fn now() -> NtpTimestamp {
    // A clock before 1970 is reported as the Unix epoch.
    let since_epoch = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    NtpTimestamp::from_unix(since_epoch.as_secs(), since_epoch.subsec_micros())
}

/// Encode a data header stamped with the current host time.
pub fn encode_data_header(
    channel: u8,
    device_id: u16,
    sequence: u32,
    length: u8,
) -> [u8; HEADER_LEN] {
    let mut header = [0; HEADER_LEN];
    ZepHeaderRepr::data(channel, device_id, sequence, length, now())
        .emit(&mut ZepHeader::new_unchecked(&mut header[..]));
    header
}

/// Encode the header of a HELLO datagram, followed on the wire by the EUI-64
/// of the device.
pub fn encode_hello_header() -> [u8; HEADER_LEN] {
    let mut header = [0; HEADER_LEN];
    ZepHeaderRepr::hello(LONG_ADDRESS_LEN as u8)
        .emit(&mut ZepHeader::new_unchecked(&mut header[..]));
    header
}

/// A frame ready to be written to the socket. The fragments are borrowed, never
/// copied.
#[derive(Debug)]
pub struct WireFrame<'a> {
    header: [u8; HEADER_LEN],
    fragments: &'a [&'a [u8]],
    fcs: [u8; FCS_LEN],
    payload_len: usize,
}

impl<'a> WireFrame<'a> {
    /// Frame `fragments` as a ZEP data datagram.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PayloadTooLong`] if the fragments and the FCS exceed
    /// [`PAYLOAD_LEN_MAX`].
    pub fn assemble(
        channel: u8,
        device_id: u16,
        sequence: u32,
        fragments: &'a [&'a [u8]],
    ) -> Result<Self> {
        let mut fcs = Fcs::new();
        let mut payload_len = FCS_LEN;
        for fragment in fragments {
            fcs.update(fragment);
            payload_len += fragment.len();
        }

        if payload_len > PAYLOAD_LEN_MAX {
            return Err(Error::PayloadTooLong(payload_len));
        }

        Ok(Self {
            header: encode_data_header(channel, device_id, sequence, payload_len as u8),
            fragments,
            fcs: fcs.finalize_bytes(),
            payload_len,
        })
    }

    /// The encoded ZEP header.
    pub fn header(&self) -> &[u8; HEADER_LEN] {
        &self.header
    }

    /// The FCS, in transmission order.
    pub fn fcs(&self) -> [u8; FCS_LEN] {
        self.fcs
    }

    /// The payload length, FCS included.
    pub fn payload_len(&self) -> usize {
        self.payload_len
    }

    /// The length of the datagram.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        HEADER_LEN + self.payload_len
    }

    /// The segments to write, in order.
    pub fn segments(&self) -> Vec<IoSlice<'_>> {
        let mut segments = Vec::with_capacity(self.fragments.len() + 2);
        segments.push(IoSlice::new(&self.header));
        segments.extend(self.fragments.iter().map(|fragment| IoSlice::new(fragment)));
        segments.push(IoSlice::new(&self.fcs));
        segments
    }
}
