//! Page-transition orchestration for multi-page sites
//!
//! Intercepts clicks on in-site links, plays a CSS animation by adding a
//! class to the document root, optionally scrolls the page, waits for the
//! animation's transition-end signal and only then navigates.
//!
//! The page itself is reached through the [`Host`] trait; see `segue-sim`
//! for an in-memory implementation.

pub mod anchor;
pub mod config;
pub mod engine;
pub mod error;
pub mod host;
pub mod registry;
pub mod scroll;

#[cfg(test)]
mod testing;

pub use config::{AnimationOptions, AnimationSpec, EngineConfig, ScrollTiming};
pub use engine::{Engine, Hooks, Phase, Transition};
pub use error::{Error, Result};
pub use host::{
    ClickEvent, ClickOutcome, Delay, ElementId, Host, Navigation, ScrollId, TransitionId, Wake,
};
pub use registry::{AnimationDescriptor, Registry};
pub use scroll::ScrollPurpose;
