//! The contract between a network device driver and the stack using it.
use core::future::Future;
use std::io;
use std::net::UdpSocket;

pub use crate::irq::NetdevEvent;

/// Link quality of a received frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RxInfo {
    /// Link Quality Indicator.
    pub lqi: u8,
    /// Received signal strength.
    pub rssi: u8,
}

/// Options of a network device, read with [`Netdev::get`] and written with
/// [`Netdev::set`].
///
/// Multi-octet integer values are native (little) endian `u16`s, addresses
/// are octet strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetOpt {
    /// The channel, `u16`.
    Channel,
    /// The short address, 2 octets.
    Address,
    /// The long address, 8 octets.
    AddressLong,
    /// Length of the source address put in sent frames, `u16` of 2 or 8.
    SrcLen,
    /// The PAN id, `u16`.
    Nid,
    /// The kind of device, `u16`. Read only.
    DeviceType,
    /// The largest frame the stack may hand to the device, `u16`. Read only.
    MaxPduSize,
    /// The protocol expected on top of the device, `u16`.
    Proto,
}

/// A network device driver.
pub trait Netdev {
    /// Error returned by the device.
    type Error;

    /// Send a frame given as a list of fragments, in order.
    ///
    /// Returns the number of payload octets sent.
    fn send(&mut self, fragments: &[&[u8]]) -> impl Future<Output = Result<usize, Self::Error>>;

    /// Receive a frame into `buf`.
    ///
    /// Without a buffer, or with an empty one, returns the size of the next
    /// pending frame without consuming it.
    fn recv(&mut self, buf: Option<&mut [u8]>, info: Option<&mut RxInfo>)
        -> Result<usize, Self::Error>;

    /// Reset the device to its initial configuration.
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Read an option into `value`, returning the number of octets written.
    fn get(&self, opt: NetOpt, value: &mut [u8]) -> Result<usize, Self::Error>;

    /// Write an option from `value`, returning the number of octets used.
    fn set(&mut self, opt: NetOpt, value: &[u8]) -> Result<usize, Self::Error>;
}

/// The host's readability notification mechanism.
///
/// After a [`register`], the host calls back into the device (for example
/// [`SocketZep::on_readable`]) when the socket becomes readable. A
/// notification may be dropped; the device polls the socket after every
/// receive and only re-arms through [`continue_reading`] when no datagram is
/// left.
///
/// [`register`]: Readiness::register
/// [`continue_reading`]: Readiness::continue_reading
/// [`SocketZep::on_readable`]: crate::device::SocketZep::on_readable
pub trait Readiness {
    /// Start watching `socket`.
    fn register(&mut self, socket: &UdpSocket) -> io::Result<()>;

    /// Watch `socket` for the next datagram.
    fn continue_reading(&mut self, socket: &UdpSocket);

    /// Stop watching `socket`.
    fn unregister(&mut self, socket: &UdpSocket);
}

/// No readiness notifications, for hosts polling the device themselves.
impl Readiness for () {
    fn register(&mut self, _socket: &UdpSocket) -> io::Result<()> {
        Ok(())
    }

    fn continue_reading(&mut self, _socket: &UdpSocket) {}

    fn unregister(&mut self, _socket: &UdpSocket) {}
}
