//! A simulated IEEE 802.15.4 radio tunnelling its frames over ZEP.
use std::io;
use std::net::{SocketAddr, UdpSocket};

use rand_core::RngCore;
use zep_frame::{Address, MacHeader, ZepHeader, ZepHeaderRepr, FCS_LEN, HEADER_LEN};

use crate::assembler::WireFrame;
use crate::config::SocketZepParams;
use crate::error::{Error, Result};
use crate::ieee802154::{generate_long_address, Ieee802154Options, FRAME_LEN_MAX};
use crate::irq::{IrqLine, NetdevEvent};
use crate::netdev::{NetOpt, Netdev, Readiness, RxInfo};
use crate::sync::yield_now;
use crate::transport::Transport;

/// Size of the receive scratch buffer: a header and the largest PHY payload.
pub const RX_BUF_LEN: usize = HEADER_LEN + FRAME_LEN_MAX;

/// RSSI reported for every received frame.
pub const RSSI_PLACEHOLDER: u8 = u8::MAX;

/// A radio device backed by a UDP socket.
///
/// Frames are sent to, and received from, a ZEP dispatcher which forwards them
/// to the other simulated radios. When an [`IrqLine`] is attached, the device
/// reports [`NetdevEvent`]s through it like a radio would through its
/// interrupt line.
pub struct SocketZep<'a, R: Readiness = ()> {
    transport: Transport,
    options: Ieee802154Options,
    default_channel: u8,
    index: u8,
    sequence: u32,
    irq: Option<&'a IrqLine>,
    readiness: R,
    scratch: [u8; RX_BUF_LEN],
}

impl<'a, R: Readiness> SocketZep<'a, R> {
    /// Open the socket of device `index` and register it with the dispatcher
    /// and with `readiness`.
    ///
    /// Without a fixed hardware address in `params`, an EUI-64 is generated
    /// from `rng`. A HELLO datagram carrying the EUI-64 is sent when the
    /// socket got connected and [`SocketZepParams::send_hello`] is set.
    pub fn setup<G: RngCore>(
        params: &SocketZepParams,
        index: u8,
        mut readiness: R,
        rng: &mut G,
    ) -> Result<Self> {
        debug!("socket_zep{}: setup", index);

        let transport = Transport::open(params)?;
        let hwaddr = match params.hwaddr {
            Some(hwaddr) => hwaddr,
            None => generate_long_address(rng),
        };

        if transport.is_connected() && params.send_hello {
            transport.send_hello(&hwaddr)?;
            trace!("socket_zep{}: sent HELLO", index);
        }

        readiness.register(transport.socket())?;

        let device = Self {
            transport,
            options: Ieee802154Options::new(hwaddr, params.channel),
            default_channel: params.channel,
            index,
            sequence: 0,
            irq: None,
            readiness,
            scratch: [0; RX_BUF_LEN],
        };

        info!(
            "socket_zep{}: {} on channel {}",
            index,
            Address::Extended(hwaddr),
            params.channel
        );

        Ok(device)
    }

    /// Deregister from the readiness notifications and close the socket.
    ///
    /// Dropping the device does the same.
    pub fn cleanup(self) {
        debug!("socket_zep{}: cleanup", self.index);
    }

    /// Report events through `line`.
    pub fn set_irq_line(&mut self, line: &'a IrqLine) {
        self.irq = Some(line);
    }

    /// Stop reporting events.
    pub fn clear_irq_line(&mut self) {
        self.irq = None;
    }

    /// Readiness handler, to be called by the host when the socket became
    /// readable.
    pub fn on_readable(&self) {
        if let Some(irq) = self.irq {
            irq.trigger(NetdevEvent::RxComplete);
        }
    }

    /// The device index given to [`SocketZep::setup`].
    pub fn index(&self) -> u8 {
        self.index
    }

    /// The current IEEE 802.15.4 configuration.
    pub fn options(&self) -> &Ieee802154Options {
        &self.options
    }

    /// The sequence number of the next data datagram.
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// The readiness subsystem the device is registered with.
    pub fn readiness(&self) -> &R {
        &self.readiness
    }

    /// The socket of the device.
    pub fn socket(&self) -> &UdpSocket {
        self.transport.socket()
    }

    /// The local endpoint of the socket.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.transport.local_addr()
    }

    /// The dispatcher endpoint.
    pub fn peer_addr(&self) -> io::Result<SocketAddr> {
        self.transport.peer_addr()
    }

    fn trigger(&self, event: NetdevEvent) -> bool {
        match self.irq {
            Some(irq) => {
                irq.trigger(event);
                true
            }
            None => false,
        }
    }

    fn peek(&self) -> Result<usize> {
        self.transport.peek().map_err(|err| {
            error!("socket_zep{}: peek failed: {}", self.index, err);
            Error::Io(err)
        })
    }

    fn read_frame(&mut self, buf: &mut [u8], info: Option<&mut RxInfo>) -> Result<usize> {
        let size = match self.transport.read(&mut self.scratch) {
            Ok(0) => return Err(Error::EmptyDatagram),
            Ok(size) => size,
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => return Ok(0),
            Err(err) => {
                error!("socket_zep{}: read failed: {}", self.index, err);
                return Err(Error::Io(err));
            }
        };

        let header = ZepHeader::new(&self.scratch[..size])?;
        let repr = ZepHeaderRepr::parse(&header)?;

        let length = repr.length as usize;
        if HEADER_LEN + length != size {
            return Err(Error::LengthMismatch {
                announced: length,
                received: size - HEADER_LEN,
            });
        }
        if length > buf.len() {
            return Err(Error::BufferTooSmall {
                needed: length,
                available: buf.len(),
            });
        }
        if repr.channel != self.options.channel {
            return Err(Error::ChannelMismatch {
                received: repr.channel,
                expected: self.options.channel,
            });
        }

        // The FCS is not verified.
        let frame = &header.payload()[..length.saturating_sub(FCS_LEN)];
        if !is_for_me(&self.options, frame) {
            return Err(Error::NotForMe);
        }

        buf[..frame.len()].copy_from_slice(frame);
        if let Some(info) = info {
            *info = RxInfo {
                lqi: repr.lqi,
                rssi: RSSI_PLACEHOLDER,
            };
        }

        Ok(frame.len())
    }

    /// Hand a datagram still waiting to the interrupt service, otherwise wait
    /// for the next readiness notification.
    fn continue_reading(&mut self) {
        if self.transport.readable() {
            trace!("socket_zep{}: datagram pending, reinjecting", self.index);
            self.on_readable();
        } else {
            self.readiness.continue_reading(self.transport.socket());
        }
    }
}

impl<R: Readiness> Drop for SocketZep<'_, R> {
    fn drop(&mut self) {
        self.readiness.unregister(self.transport.socket());
        trace!("socket_zep{}: unregistered", self.index);
    }
}

/// Whether the destination of `frame` is this device. Frames without a
/// destination, or with one that cannot be parsed, are not.
fn is_for_me(options: &Ieee802154Options, frame: &[u8]) -> bool {
    let Ok(mac) = MacHeader::new(frame) else {
        return false;
    };

    match mac.dst_address() {
        Some(Address::Extended(addr)) => addr == options.long_addr,
        Some(dst @ Address::Short(addr)) => dst.is_broadcast() || addr == options.short_addr,
        _ => false,
    }
}

impl<R: Readiness> Netdev for SocketZep<'_, R> {
    type Error = Error;

    async fn send(&mut self, fragments: &[&[u8]]) -> Result<usize> {
        let frame = WireFrame::assemble(
            self.options.channel,
            self.options.device_id(),
            self.sequence,
            fragments,
        )?;

        if self.trigger(NetdevEvent::TxStarted) {
            yield_now().await;
        }

        let written = match self.transport.write_vectored(&frame.segments()) {
            Ok(written) => written,
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => {
                debug!("socket_zep{}: send would block, frame dropped", self.index);
                return Ok(0);
            }
            Err(err) => {
                error!("socket_zep{}: send failed: {}", self.index, err);
                return Err(Error::Io(err));
            }
        };

        trace!(
            "socket_zep{}: sent #{} ({} octets)",
            self.index,
            self.sequence,
            frame.payload_len()
        );
        self.sequence = self.sequence.wrapping_add(1);

        if self.trigger(NetdevEvent::TxComplete) {
            yield_now().await;
        }

        Ok(written.saturating_sub(HEADER_LEN + FCS_LEN))
    }

    fn recv(&mut self, buf: Option<&mut [u8]>, info: Option<&mut RxInfo>) -> Result<usize> {
        let buf = match buf {
            Some(buf) if !buf.is_empty() => buf,
            _ => return self.peek(),
        };

        let res = self.read_frame(buf, info);
        if let Err(err) = &res {
            if err.is_rejection() {
                debug!("socket_zep{}: dropped datagram: {}", self.index, err);
            }
        }

        self.continue_reading();
        res
    }

    fn init(&mut self) -> Result<()> {
        self.options.reset(self.default_channel);
        Ok(())
    }

    fn get(&self, opt: NetOpt, value: &mut [u8]) -> Result<usize> {
        self.options.get(opt, value)
    }

    fn set(&mut self, opt: NetOpt, value: &[u8]) -> Result<usize> {
        self.options.set(opt, value)
    }
}

#[cfg(test)]
mod tests {
    use pollster::FutureExt as _;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    const HWADDR: [u8; 8] = [0x02, 0x11, 0x22, 0x33, 0x44, 0x55, 0x46, 0x77];

    fn options() -> Ieee802154Options {
        Ieee802154Options::new(HWADDR, 26)
    }

    /// A data frame with a short source and the given destination.
    fn frame_to(dst: &[u8]) -> Vec<u8> {
        let mode: u16 = match dst.len() {
            0 => 0b00,
            2 => 0b10,
            _ => 0b11,
        };
        let fc: u16 = 0x0001 | (mode << 10) | (0b10 << 14) | if dst.is_empty() { 0 } else { 1 << 6 };

        let mut frame = fc.to_le_bytes().to_vec();
        frame.push(0x2a);
        frame.extend_from_slice(&0x0023u16.to_le_bytes());
        frame.extend(dst.iter().rev());
        frame.extend_from_slice(&[0x01, 0x00]);
        frame.extend_from_slice(b"payload");
        frame
    }

    #[test]
    fn accept_own_long_address() {
        assert!(is_for_me(&options(), &frame_to(&HWADDR)));

        let mut other = HWADDR;
        other[7] ^= 1;
        assert!(!is_for_me(&options(), &frame_to(&other)));
    }

    #[test]
    fn accept_broadcast_and_own_short_address() {
        assert!(is_for_me(&options(), &frame_to(&[0xff, 0xff])));
        assert!(is_for_me(&options(), &frame_to(&[0x46, 0x77])));
        assert!(!is_for_me(&options(), &frame_to(&[0x46, 0x78])));
    }

    #[test]
    fn reject_without_destination() {
        assert!(!is_for_me(&options(), &frame_to(&[])));
        assert!(!is_for_me(&options(), &[0x41]));
        assert!(!is_for_me(&options(), &[]));
    }

    #[test]
    fn sequence_wraps() {
        let dispatcher = UdpSocket::bind("127.0.0.1:0").unwrap();
        let port = dispatcher.local_addr().unwrap().port();
        let params = SocketZepParams::remote("127.0.0.1", port).with_hello(false);
        let mut device: SocketZep =
            SocketZep::setup(&params, 0, (), &mut StdRng::seed_from_u64(1)).unwrap();

        device.sequence = u32::MAX - 1;
        let mut buf = [0u8; 64];
        for expected in [u32::MAX - 1, u32::MAX, 0, 1] {
            device.send(&[&b"seq"[..]]).block_on().unwrap();

            let len = dispatcher.recv(&mut buf).unwrap();
            let header = ZepHeader::new(&buf[..len]).unwrap();
            assert_eq!(header.sequence(), expected);
        }
        assert_eq!(device.sequence(), 2);
    }

    #[test]
    fn failed_send_keeps_sequence() {
        let line = IrqLine::new();
        let params = SocketZepParams::default()
            .without_remote()
            .with_local("127.0.0.1", 0);
        let mut device: SocketZep =
            SocketZep::setup(&params, 0, (), &mut StdRng::seed_from_u64(1)).unwrap();

        device.set_irq_line(&line);

        // Not connected, there is nowhere to send to.
        let mut events = Vec::new();
        let mut service = crate::InterruptService::new(&line, |event| events.push(event));
        let (res, ()) =
            crate::sync::join(device.send(&[&b"lost"[..]]), service.service()).block_on();
        drop(service);

        assert!(matches!(res, Err(Error::Io(_))));
        assert_eq!(events, [NetdevEvent::TxStarted]);
        assert!(!line.is_pending());
        assert_eq!(device.sequence(), 0);
    }
}
