//! An IEEE 802.15.4 radio for hosts, tunnelling its frames through a UDP
//! socket using ZEP v2 (the ZigBee Encapsulation Protocol).
//!
//! A [`SocketZep`] behaves like a radio driver towards the stack using it:
//! frames go out through [`Netdev::send`], come in through [`Netdev::recv`],
//! and the progress of both is reported as [`NetdevEvent`]s on an
//! [`IrqLine`], which an [`InterruptService`] drains into a callback.
//!
//! ```no_run
//! use zep_radio::sync::join;
//! use zep_radio::{InterruptService, IrqLine, Netdev, SocketZep, SocketZepParams};
//!
//! # fn main() -> Result<(), zep_radio::Error> {
//! let line = IrqLine::new();
//! let params = SocketZepParams::remote("127.0.0.1", 17754);
//! let mut radio: SocketZep = SocketZep::setup(&params, 0, (), &mut rand::thread_rng())?;
//! radio.set_irq_line(&line);
//!
//! let mut service = InterruptService::new(&line, |event| println!("{event:?}"));
//! pollster::block_on(async {
//!     let frame: &[u8] = &[0x41, 0xc8, 0x00, 0x23, 0x00, 0xff, 0xff];
//!     join(radio.send(&[frame]), async {
//!         service.service().await;
//!         service.service().await;
//!     })
//!     .await
//! })
//! .0?;
//! # Ok(())
//! # }
//! ```
#![deny(unsafe_code)]

#[macro_use]
pub(crate) mod utils;

pub use zep_frame as frame;

pub mod assembler;
pub mod config;
pub mod device;
pub mod error;
pub mod ieee802154;
pub mod irq;
pub mod netdev;
pub mod sync;
pub mod transport;

pub use config::SocketZepParams;
pub use device::SocketZep;
pub use error::{Error, Result};
pub use irq::{InterruptService, IrqLine, NetdevEvent};
pub use netdev::{NetOpt, Netdev, Readiness, RxInfo};
