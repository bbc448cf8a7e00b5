//! The UDP socket tunnelling the frames.
use std::io::{self, IoSlice};
#[cfg(target_os = "linux")]
use std::mem::MaybeUninit;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use socket2::{Domain, Protocol, SockRef, Socket, Type};
use zep_frame::HEADER_LEN;

use crate::assembler::encode_hello_header;
use crate::config::SocketZepParams;
use crate::error::{Error, Result};
use crate::ieee802154::LONG_ADDRESS_LEN;

/// Largest size [`Transport::peek`] reports where the full size of a datagram
/// cannot be queried: a header and the largest length it can announce.
pub const PEEK_LEN_MAX: usize = HEADER_LEN + u8::MAX as usize;

/// A non-blocking UDP socket, optionally bound to a local endpoint and
/// optionally connected to a ZEP dispatcher.
#[derive(Debug)]
pub struct Transport {
    socket: UdpSocket,
    connected: bool,
}

impl Transport {
    /// Bind and connect as described by `params`.
    ///
    /// # Errors
    ///
    /// Fails if an address cannot be resolved, if a local address is given but
    /// none of its candidates can be bound, or if the session ends up with
    /// neither a bound nor a connected socket.
    pub fn open(params: &SocketZepParams) -> Result<Self> {
        let mut socket = match &params.local_addr {
            Some(addr) => Some(bind_local(addr, params.local_port)?),
            None => None,
        };

        let mut connected = false;
        if let Some(addr) = &params.remote_addr {
            match connect_remote(socket.as_ref(), addr, params.remote_port)? {
                Some(Connection::Fresh(fresh)) => {
                    socket = Some(fresh);
                    connected = true;
                }
                Some(Connection::Bound) => connected = true,
                None => warn!("zep: unable to connect to [{}]:{}", addr, params.remote_port),
            }
        }

        let Some(socket) = socket else {
            return Err(Error::NoEndpoint);
        };

        socket.set_nonblocking(true)?;

        Ok(Self {
            socket: socket.into(),
            connected,
        })
    }

    /// Whether the socket is connected to a dispatcher.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// The socket, for readiness registration.
    pub fn socket(&self) -> &UdpSocket {
        &self.socket
    }

    /// The local endpoint.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// The dispatcher endpoint.
    pub fn peer_addr(&self) -> io::Result<SocketAddr> {
        self.socket.peer_addr()
    }

    /// Register `hwaddr` with the dispatcher.
    pub fn send_hello(&self, hwaddr: &[u8; LONG_ADDRESS_LEN]) -> io::Result<usize> {
        let header = encode_hello_header();
        self.write_vectored(&[IoSlice::new(&header), IoSlice::new(hwaddr)])
    }

    /// Write `segments` as one datagram.
    pub fn write_vectored(&self, segments: &[IoSlice<'_>]) -> io::Result<usize> {
        SockRef::from(&self.socket).send_vectored(segments)
    }

    /// Read one datagram.
    pub fn read(&self, buf: &mut [u8]) -> io::Result<usize> {
        self.socket.recv(buf)
    }

    /// Return the size of the next datagram without consuming it, or 0 when
    /// none is queued.
    ///
    /// An error left on the socket by an ICMP port unreachable, for example
    /// after a HELLO reached a dispatcher that was not running yet, is cleared
    /// and not reported.
    ///
    /// On Linux the full size is returned. Elsewhere, datagrams longer than
    /// the largest ZEP datagram are reported as [`PEEK_LEN_MAX`].
    pub fn peek(&self) -> io::Result<usize> {
        let res = match self.peek_len() {
            Err(err) if is_pending_error(&err) => {
                debug!("zep: cleared pending socket error: {}", err);
                self.peek_len()
            }
            res => res,
        };

        match res {
            Err(err) if err.kind() == io::ErrorKind::WouldBlock || is_pending_error(&err) => {
                Ok(0)
            }
            res => res,
        }
    }

    /// Check, without waiting, whether a datagram is queued.
    pub fn readable(&self) -> bool {
        match self.peek_len() {
            Ok(_) => true,
            Err(err) => {
                if err.kind() != io::ErrorKind::WouldBlock {
                    trace!("zep: readability check failed: {}", err);
                }
                false
            }
        }
    }

    #[cfg(target_os = "linux")]
    fn peek_len(&self) -> io::Result<usize> {
        // MSG_TRUNC reports the length of the datagram, not of the buffer.
        let mut buf = [MaybeUninit::<u8>::uninit(); 1];
        SockRef::from(&self.socket).recv_with_flags(&mut buf, libc::MSG_PEEK | libc::MSG_TRUNC)
    }

    #[cfg(not(target_os = "linux"))]
    fn peek_len(&self) -> io::Result<usize> {
        let mut buf = [0u8; PEEK_LEN_MAX];
        self.socket.peek(&mut buf)
    }
}

/// An error a connected socket reports once, after an ICMP error came back
/// for one of its datagrams.
fn is_pending_error(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::ConnectionRefused | io::ErrorKind::ConnectionReset
    )
}

fn resolve(addr: &str, port: u16) -> Result<Vec<SocketAddr>> {
    let candidates: Vec<SocketAddr> = match (addr, port).to_socket_addrs() {
        Ok(candidates) => candidates.collect(),
        Err(err) => {
            error!("zep: unable to resolve [{}]:{}: {}", addr, port, err);
            Vec::new()
        }
    };

    if candidates.is_empty() {
        return Err(Error::Resolve(format!("[{addr}]:{port}")));
    }
    Ok(candidates)
}

fn udp_socket(candidate: &SocketAddr) -> io::Result<Socket> {
    Socket::new(
        Domain::for_address(*candidate),
        Type::DGRAM,
        Some(Protocol::UDP),
    )
}

fn bind_local(addr: &str, port: u16) -> Result<Socket> {
    for candidate in resolve(addr, port)? {
        let bound = udp_socket(&candidate).and_then(|socket| {
            socket.bind(&candidate.into())?;
            Ok(socket)
        });

        match bound {
            Ok(socket) => {
                debug!("zep: bound to {}", candidate);
                return Ok(socket);
            }
            Err(err) => debug!("zep: unable to bind {}: {}", candidate, err),
        }
    }

    error!("zep: unable to bind [{}]:{}", addr, port);
    Err(Error::Bind(format!("[{addr}]:{port}")))
}

/// How the remote end got connected.
enum Connection {
    /// The bound socket is connected.
    Bound,
    /// A new socket was created for the connection.
    Fresh(Socket),
}

/// Connect `socket`, or a new socket when there is none, to the first
/// reachable candidate. Returns `None` if no candidate could be connected.
fn connect_remote(socket: Option<&Socket>, addr: &str, port: u16) -> Result<Option<Connection>> {
    for candidate in resolve(addr, port)? {
        let connected = match socket {
            Some(socket) => socket
                .connect(&candidate.into())
                .map(|()| Connection::Bound),
            None => udp_socket(&candidate).and_then(|fresh| {
                fresh.connect(&candidate.into())?;
                Ok(Connection::Fresh(fresh))
            }),
        };

        match connected {
            Ok(connection) => {
                debug!("zep: connected to {}", candidate);
                return Ok(Some(connection));
            }
            Err(err) => debug!("zep: unable to connect to {}: {}", candidate, err),
        }
    }

    Ok(None)
}
