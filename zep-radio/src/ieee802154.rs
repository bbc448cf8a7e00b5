//! The IEEE 802.15.4 configuration of a device.
use rand_core::RngCore;

use crate::config::DEFAULT_PAN_ID;
use crate::error::{Error, Result};
use crate::netdev::NetOpt;

/// Length of a short address.
pub const SHORT_ADDRESS_LEN: usize = 2;
/// Length of a long address (EUI-64).
pub const LONG_ADDRESS_LEN: usize = 8;
/// Largest PHY payload.
pub const FRAME_LEN_MAX: usize = 127;
/// Highest channel number accepted.
pub const CHANNEL_MAX: u8 = 26;
/// Value of [`NetOpt::DeviceType`].
pub const DEVICE_TYPE_IEEE802154: u16 = 3;
/// Value of [`NetOpt::Proto`] before it is set.
pub const PROTO_UNDEF: u16 = 0;

/// Generate a random EUI-64, locally administered and unicast.
pub fn generate_long_address<R: RngCore>(rng: &mut R) -> [u8; LONG_ADDRESS_LEN] {
    let mut addr = [0; LONG_ADDRESS_LEN];
    rng.fill_bytes(&mut addr);
    addr[0] |= 0x02;
    addr[0] &= !0x01;
    addr
}

/// The short address derived from an EUI-64: its last two octets, with the
/// top bit cleared to stay clear of the broadcast and reserved ranges.
pub fn short_from_long(long: &[u8; LONG_ADDRESS_LEN]) -> [u8; SHORT_ADDRESS_LEN] {
    [long[6] & 0x7f, long[7]]
}

/// The option store of an IEEE 802.15.4 device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ieee802154Options {
    /// Current channel.
    pub channel: u8,
    /// PAN id.
    pub pan_id: u16,
    /// Short address, most significant octet first.
    pub short_addr: [u8; SHORT_ADDRESS_LEN],
    /// Long address, most significant octet first.
    pub long_addr: [u8; LONG_ADDRESS_LEN],
    /// Length of the source address of sent frames.
    pub src_len: u16,
    /// Protocol on top of the device.
    pub proto: u16,
}

impl Ieee802154Options {
    /// Options of a device with hardware address `long_addr`.
    pub fn new(long_addr: [u8; LONG_ADDRESS_LEN], channel: u8) -> Self {
        let mut options = Self {
            channel,
            pan_id: DEFAULT_PAN_ID,
            short_addr: short_from_long(&long_addr),
            long_addr,
            src_len: LONG_ADDRESS_LEN as u16,
            proto: PROTO_UNDEF,
        };
        options.reset(channel);
        options
    }

    /// Restore the defaults, keeping the hardware addresses.
    pub fn reset(&mut self, channel: u8) {
        self.channel = channel;
        self.pan_id = DEFAULT_PAN_ID;
        self.src_len = LONG_ADDRESS_LEN as u16;
        self.proto = PROTO_UNDEF;
    }

    /// The 16 bit tag identifying the device in ZEP headers.
    pub fn device_id(&self) -> u16 {
        u16::from_be_bytes([self.long_addr[6], self.long_addr[7]])
    }

    /// Read an option into `value`.
    pub fn get(&self, opt: NetOpt, value: &mut [u8]) -> Result<usize> {
        match opt {
            NetOpt::Channel => write_u16(value, self.channel as u16),
            NetOpt::Address => write_bytes(value, &self.short_addr),
            NetOpt::AddressLong => write_bytes(value, &self.long_addr),
            NetOpt::SrcLen => write_u16(value, self.src_len),
            NetOpt::Nid => write_u16(value, self.pan_id),
            NetOpt::DeviceType => write_u16(value, DEVICE_TYPE_IEEE802154),
            NetOpt::MaxPduSize => write_u16(value, (FRAME_LEN_MAX - zep_frame::FCS_LEN) as u16),
            NetOpt::Proto => write_u16(value, self.proto),
        }
    }

    /// Write an option from `value`.
    pub fn set(&mut self, opt: NetOpt, value: &[u8]) -> Result<usize> {
        match opt {
            NetOpt::Channel => {
                let channel = read_u16(value)?;
                if channel > CHANNEL_MAX as u16 {
                    return Err(Error::InvalidValue);
                }
                self.channel = channel as u8;
                Ok(2)
            }
            NetOpt::Address => {
                self.short_addr = value.try_into().map_err(|_| Error::InvalidValue)?;
                Ok(SHORT_ADDRESS_LEN)
            }
            NetOpt::AddressLong => {
                self.long_addr = value.try_into().map_err(|_| Error::InvalidValue)?;
                Ok(LONG_ADDRESS_LEN)
            }
            NetOpt::SrcLen => {
                let len = read_u16(value)?;
                if len as usize != SHORT_ADDRESS_LEN && len as usize != LONG_ADDRESS_LEN {
                    return Err(Error::InvalidValue);
                }
                self.src_len = len;
                Ok(2)
            }
            NetOpt::Nid => {
                self.pan_id = read_u16(value)?;
                Ok(2)
            }
            NetOpt::Proto => {
                self.proto = read_u16(value)?;
                Ok(2)
            }
            NetOpt::DeviceType | NetOpt::MaxPduSize => Err(Error::NotSupported),
        }
    }
}

fn write_bytes(value: &mut [u8], bytes: &[u8]) -> Result<usize> {
    let Some(value) = value.get_mut(..bytes.len()) else {
        return Err(Error::Overflow);
    };
    value.copy_from_slice(bytes);
    Ok(bytes.len())
}

fn write_u16(value: &mut [u8], v: u16) -> Result<usize> {
    write_bytes(value, &v.to_le_bytes())
}

fn read_u16(value: &[u8]) -> Result<u16> {
    let bytes: [u8; 2] = value.try_into().map_err(|_| Error::InvalidValue)?;
    Ok(u16::from_le_bytes(bytes))
}
