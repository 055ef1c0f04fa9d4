//! Smooth page scrolling for transitions
//!
//! - `easing` - the quadratic ease-in/ease-out curve
//! - `timing` - progress and interpolation helpers
//! - `coordinator` - time-based scroll state, advanced once per frame
//!
//! The coordinator is driven by [`crate::Engine`], which reads and writes the
//! host's scroll offset and schedules a [`crate::Wake::ScrollTick`] for each
//! frame until the scroll completes.

pub mod coordinator;
pub mod easing;
pub mod timing;

pub use coordinator::{ScrollCoordinator, ScrollPurpose, ScrollStep};
pub use easing::ease_in_out_quad;
