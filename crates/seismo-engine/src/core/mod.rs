//! Core engine-facing contracts.
//!
//! The stable interface between the runtime (platform loop) and the
//! application layer. Keeps runtime internals out of user code and provides
//! a consistent per-frame context.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
