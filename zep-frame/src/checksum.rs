//! Frame Check Sequence computation.
//!
//! The FCS field contains a 16-bit ITU-T CRC, using the x^16 + x^12 + x^5 + 1
//! polynomial in its reflected form. Unlike most CRCs, the initial and final
//! values are both 0x0000. The checksum covers the link-layer payload only,
//! never the ZEP header in front of it.

/// CRC-16 as used for the IEEE 802.15.4 FCS.
pub const CRC_16_IEEE802154: crc::Algorithm<u16> = crc::Algorithm {
    width: 16,
    poly: 0x1021,
    init: 0x0000,
    refin: true,
    refout: true,
    xorout: 0x0000,
    check: 0x2189,
    residue: 0x0000,
};

static IEEE802154: crc::Crc<u16> = crc::Crc::<u16>::new(&CRC_16_IEEE802154);

/// Length of the FCS field in octets.
pub const FCS_LEN: usize = 2;

/// An incremental FCS accumulator.
///
/// Feeding the fragments of a frame one by one yields the same value as
/// feeding their concatenation at once.
pub struct Fcs {
    digest: crc::Digest<'static, u16>,
}

impl Fcs {
    /// Start a new computation with a zero seed.
    pub fn new() -> Self {
        Self {
            digest: IEEE802154.digest(),
        }
    }

    /// Fold `bytes` into the running state.
    pub fn update(&mut self, bytes: &[u8]) {
        self.digest.update(bytes);
    }

    /// Return the final checksum value.
    pub fn finalize(self) -> u16 {
        self.digest.finalize()
    }

    /// Return the final checksum in its on-wire representation.
    pub fn finalize_bytes(self) -> [u8; FCS_LEN] {
        self.finalize().to_le_bytes()
    }
}

impl Default for Fcs {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute the FCS over a sequence of buffers, in order.
pub fn checksum<'a, I>(buffers: I) -> u16
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut fcs = Fcs::new();
    for buffer in buffers {
        fcs.update(buffer);
    }
    fcs.finalize()
}
