//! Simulated interrupt delivery.
//!
//! A real radio reports the start and the end of a transmission, and the
//! reception of a frame, through an interrupt. The [`IrqLine`] replaces the
//! interrupt request line: the driver [`trigger`]s an event into a single
//! slot, and the [`InterruptService`] takes it out again and hands it to the
//! registered callback.
//!
//! The slot holds one event. Events are not queued: triggering while an event
//! is still pending overwrites it. The driver therefore yields right after
//! every trigger, giving a service future polled by the same task the turn
//! before the next event is produced.
//!
//! [`trigger`]: IrqLine::trigger
use core::cell::Cell;
use core::future::poll_fn;
use core::task::{Poll, Waker};

/// An event reported by a network device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetdevEvent {
    /// A transmission has started.
    TxStarted,
    /// A transmission has completed.
    TxComplete,
    /// A frame is waiting to be received.
    RxComplete,
}

/// A single slot interrupt request line.
#[derive(Default)]
pub struct IrqLine {
    pending: Cell<Option<NetdevEvent>>,
    waker: Cell<Option<Waker>>,
}

impl IrqLine {
    /// Create a line without a pending event.
    pub const fn new() -> Self {
        Self {
            pending: Cell::new(None),
            waker: Cell::new(None),
        }
    }

    /// Store `event` in the slot and request service.
    ///
    /// Returns whether an event that was not yet serviced got overwritten.
    pub fn trigger(&self, event: NetdevEvent) -> bool {
        let previous = self.pending.replace(Some(event));
        if let Some(previous) = previous {
            warn!("irq: {:?} overwritten by {:?}", previous, event);
        }

        if let Some(waker) = self.waker.take() {
            waker.wake();
        }

        previous.is_some()
    }

    /// Take the pending event, leaving the slot empty.
    pub fn take(&self) -> Option<NetdevEvent> {
        self.pending.take()
    }

    /// Check if an event is waiting to be serviced.
    pub fn is_pending(&self) -> bool {
        self.pending.get().is_some()
    }

    /// Wait for an event and take it.
    pub async fn wait(&self) -> NetdevEvent {
        poll_fn(|cx| match self.pending.take() {
            Some(event) => Poll::Ready(event),
            None => {
                self.waker.set(Some(cx.waker().clone()));
                Poll::Pending
            }
        })
        .await
    }
}

/// The interrupt service routine of a device: drains an [`IrqLine`] into an
/// event callback.
pub struct InterruptService<'a, F: FnMut(NetdevEvent)> {
    line: &'a IrqLine,
    callback: F,
}

impl<'a, F: FnMut(NetdevEvent)> InterruptService<'a, F> {
    /// Service `line`, handing every event to `callback`.
    pub fn new(line: &'a IrqLine, callback: F) -> Self {
        Self { line, callback }
    }

    /// Service the pending event, if any.
    pub fn isr(&mut self) {
        if let Some(event) = self.line.take() {
            self.dispatch(event);
        }
    }

    /// Wait for the next event and service it.
    pub async fn service(&mut self) {
        let event = self.line.wait().await;
        self.dispatch(event);
    }

    /// Service events forever.
    pub async fn run(&mut self) -> ! {
        loop {
            self.service().await;
        }
    }

    fn dispatch(&mut self, event: NetdevEvent) {
        trace!("irq: servicing {:?}", event);
        (self.callback)(event);
    }
}
