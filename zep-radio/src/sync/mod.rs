//! Executor independent helpers for running the interrupt service and the
//! driver inside a single task.
pub(crate) mod join;
pub(crate) mod yield_now;

pub use join::join;
pub use yield_now::yield_now;
