//! In-memory host environment for the segue engine
//!
//! Builds a page from a [`PageFixture`], runs the engine against it on a
//! virtual clock and records a timeline of everything the page would show.

pub mod driver;
pub mod host;
pub mod page;

pub use driver::Simulation;
pub use host::{Effect, Pending, SimHost, TimelineEntry, FRAME_INTERVAL};
pub use page::{ElementFixture, PageFixture};
