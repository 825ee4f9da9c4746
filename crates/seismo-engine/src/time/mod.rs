//! Frame timing.
//!
//! One `FrameClock` per window or render loop; call `tick()` once per
//! presented frame to obtain a `FrameTime` snapshot.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
