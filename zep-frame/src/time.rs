//! NTP timestamps as carried in the ZEP v2 header.

/// Seconds between the NTP era 0 epoch (1900-01-01) and the Unix epoch.
pub const UNIX_NTP_ERA_OFFSET: u64 = 2_208_988_800;

/// Microseconds per second.
pub const USEC_PER_SEC: u32 = 1_000_000;

/// Divisor of the fraction field scaling.
const FRACTION_DIVISOR: u32 = 232;

/// An NTP era 1900 timestamp, seconds and fraction of a second.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub struct NtpTimestamp {
    /// Seconds since 1900-01-01.
    pub seconds: u32,
    /// Fraction of a second.
    pub fraction: u32,
}

impl NtpTimestamp {
    /// Create a timestamp from a Unix time given as seconds and microseconds.
    ///
    /// The seconds wrap at the end of NTP era 0. The fraction is
    /// `(usec * 1_000_000) / 232`, with the product truncated to 32 bits
    /// before the division.
    ///
    /// `usec` must be below one second.
    pub fn from_unix(secs: u64, usec: u32) -> Self {
        debug_assert!(usec < USEC_PER_SEC);

        Self {
            seconds: secs.wrapping_add(UNIX_NTP_ERA_OFFSET) as u32,
            fraction: ((usec as u64 * USEC_PER_SEC as u64) as u32) / FRACTION_DIVISOR,
        }
    }
}

impl core::fmt::Display for NtpTimestamp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{:08x}", self.seconds, self.fraction)
    }
}
