use std::io;

/// An error returned by a [`SocketZep`] session.
///
/// [`SocketZep`]: crate::device::SocketZep
#[derive(Debug)]
pub enum Error {
    /// The ZEP header of a received datagram is invalid.
    Frame(zep_frame::Error),
    /// The length field does not match the size of the datagram.
    LengthMismatch {
        /// Payload length announced by the header.
        announced: usize,
        /// Payload octets actually received.
        received: usize,
    },
    /// The receive buffer cannot hold the frame.
    BufferTooSmall {
        /// Octets needed.
        needed: usize,
        /// Octets available.
        available: usize,
    },
    /// The datagram was sent on another channel.
    ChannelMismatch {
        /// Channel of the datagram.
        received: u8,
        /// Channel of the session.
        expected: u8,
    },
    /// The frame is not addressed to this device.
    NotForMe,
    /// A datagram without any content was received.
    EmptyDatagram,
    /// The frame does not fit the one octet length field.
    PayloadTooLong(usize),
    /// An endpoint address could not be resolved.
    Resolve(String),
    /// None of the local candidates could be bound.
    Bind(String),
    /// Neither a local nor a remote endpoint is available.
    NoEndpoint,
    /// The option is not supported by the device.
    NotSupported,
    /// The option value is invalid.
    InvalidValue,
    /// The option value does not fit the supplied buffer.
    Overflow,
    /// The socket failed. The session is unusable afterwards.
    Io(io::Error),
}

impl Error {
    /// Whether this is a rejected datagram rather than a failure of the
    /// session. Rejections leave the session untouched.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Error::Frame(_)
                | Error::LengthMismatch { .. }
                | Error::BufferTooSmall { .. }
                | Error::ChannelMismatch { .. }
                | Error::NotForMe
                | Error::EmptyDatagram
        )
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Frame(err) => write!(f, "rejected datagram: {err}"),
            Error::LengthMismatch {
                announced,
                received,
            } => write!(
                f,
                "length field announces {announced} octets, got {received}"
            ),
            Error::BufferTooSmall { needed, available } => {
                write!(f, "frame of {needed} octets does not fit {available}")
            }
            Error::ChannelMismatch { received, expected } => {
                write!(f, "datagram on channel {received}, listening on {expected}")
            }
            Error::NotForMe => write!(f, "frame not addressed to this device"),
            Error::EmptyDatagram => write!(f, "empty datagram"),
            Error::PayloadTooLong(len) => write!(f, "payload of {len} octets is too long"),
            Error::Resolve(endpoint) => write!(f, "unable to resolve {endpoint}"),
            Error::Bind(endpoint) => write!(f, "unable to bind {endpoint}"),
            Error::NoEndpoint => write!(f, "neither a local nor a remote endpoint"),
            Error::NotSupported => write!(f, "option not supported"),
            Error::InvalidValue => write!(f, "invalid option value"),
            Error::Overflow => write!(f, "option value does not fit"),
            Error::Io(err) => write!(f, "socket error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Frame(err) => Some(err),
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<zep_frame::Error> for Error {
    fn from(err: zep_frame::Error) -> Self {
        Error::Frame(err)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

/// A type alias for `Result<T, zep_radio::Error>`.
pub type Result<T> = core::result::Result<T, Error>;
