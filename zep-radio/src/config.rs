//! Build time defaults and the runtime parameters of a [`SocketZep`] session.
//!
//! The constants are generated by the build script. Each one can be
//! overridden at build time through a `ZEP_RADIO_<NAME>` environment variable,
//! e.g. `ZEP_RADIO_DEFAULT_CHANNEL=11`.
//!
//! [`SocketZep`]: crate::device::SocketZep

#[allow(missing_docs)]
mod generated {
    include!(concat!(env!("OUT_DIR"), "/config.rs"));
}
pub use generated::*;

/// Parameters of a ZEP tunnel endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketZepParams {
    /// Local address to bind to. No local bind happens when `None`.
    pub local_addr: Option<String>,
    /// Local port to bind to.
    pub local_port: u16,
    /// Address of the ZEP dispatcher. No connection is made when `None`.
    pub remote_addr: Option<String>,
    /// Port of the ZEP dispatcher.
    pub remote_port: u16,
    /// Register with the dispatcher by sending a HELLO datagram.
    pub send_hello: bool,
    /// Fixed EUI-64 of the device. Generated when `None`.
    pub hwaddr: Option<[u8; 8]>,
    /// Channel used until changed through the option store.
    pub channel: u8,
}

impl Default for SocketZepParams {
    fn default() -> Self {
        Self {
            local_addr: None,
            local_port: DEFAULT_LOCAL_PORT,
            remote_addr: Some(DEFAULT_REMOTE_ADDR.to_string()),
            remote_port: DEFAULT_REMOTE_PORT,
            send_hello: SEND_HELLO,
            hwaddr: None,
            channel: DEFAULT_CHANNEL,
        }
    }
}

impl SocketZepParams {
    /// Parameters connecting to `addr:port`.
    pub fn remote(addr: impl Into<String>, port: u16) -> Self {
        Self {
            remote_addr: Some(addr.into()),
            remote_port: port,
            ..Self::default()
        }
    }

    /// Also bind the local end to `addr:port`.
    pub fn with_local(mut self, addr: impl Into<String>, port: u16) -> Self {
        self.local_addr = Some(addr.into());
        self.local_port = port;
        self
    }

    /// Do not connect to a dispatcher.
    pub fn without_remote(mut self) -> Self {
        self.remote_addr = None;
        self
    }

    /// Use a fixed EUI-64.
    pub fn with_hwaddr(mut self, hwaddr: [u8; 8]) -> Self {
        self.hwaddr = Some(hwaddr);
        self
    }

    /// Enable or disable the HELLO registration.
    pub fn with_hello(mut self, send_hello: bool) -> Self {
        self.send_hello = send_hello;
        self
    }

    /// Start on `channel`.
    pub fn with_channel(mut self, channel: u8) -> Self {
        self.channel = channel;
        self
    }
}
