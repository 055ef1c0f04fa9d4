//! Time-based scroll animation state
//!
//! The coordinator owns no host; it only tracks where a scroll started and
//! turns a timestamp into the offset to show. The engine feeds it the current
//! time on every animation frame and applies the result.

use std::collections::HashMap;
use std::time::Duration;

use super::easing::ease_in_out_quad;
use super::timing::{is_complete, lerp, progress};
use crate::host::{ScrollId, TransitionId};

/// What to do once a scroll has reached its target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollPurpose {
    /// Add the body class (the `before` timing)
    ApplyClass(TransitionId),
    /// Continue finalizing and navigate (the `after` timing)
    Navigate(TransitionId),
    /// Nothing waits on this scroll (the `during` timing)
    Detached,
}

#[derive(Debug, Clone)]
struct ActiveScroll {
    start: Duration,
    from: f64,
    to: f64,
    duration: Duration,
    purpose: ScrollPurpose,
}

/// Result of advancing a scroll by one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollStep {
    /// Still moving; show this offset and tick again
    Continue(f64),
    /// Finished; the offset is exactly the target
    Complete { offset: f64, purpose: ScrollPurpose },
}

/// Tracks every scroll in flight, each completing with its own purpose
#[derive(Debug, Default)]
pub struct ScrollCoordinator {
    active: HashMap<ScrollId, ActiveScroll>,
    next_id: u64,
}

impl ScrollCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin scrolling from `from` to `to` over `duration`, starting at `now`
    ///
    /// Scrolls already in flight keep running; whichever ticks last on a
    /// frame decides the offset shown.
    pub fn start(
        &mut self,
        now: Duration,
        from: f64,
        to: f64,
        duration: Duration,
        purpose: ScrollPurpose,
    ) -> ScrollId {
        self.next_id += 1;
        let id = ScrollId(self.next_id);
        self.active.insert(
            id,
            ActiveScroll {
                start: now,
                from,
                to,
                duration,
                purpose,
            },
        );
        id
    }

    /// Advance the scroll identified by `id` to time `now`
    ///
    /// Returns `None` for an unknown or finished scroll.
    pub fn tick(&mut self, id: ScrollId, now: Duration) -> Option<ScrollStep> {
        let anim = self.active.get(&id)?;
        let elapsed = now.saturating_sub(anim.start);

        if anim.from == anim.to || is_complete(elapsed, anim.duration) {
            let anim = self.active.remove(&id)?;
            return Some(ScrollStep::Complete {
                offset: anim.to,
                purpose: anim.purpose,
            });
        }

        let t = progress(elapsed, anim.duration);
        Some(ScrollStep::Continue(lerp(anim.from, anim.to, ease_in_out_quad(t))))
    }

    #[inline]
    pub fn is_scrolling(&self) -> bool {
        !self.active.is_empty()
    }

    /// Target offset of the scroll `id`, while it is in flight
    pub fn target(&self, id: ScrollId) -> Option<f64> {
        self.active.get(&id).map(|a| a.to)
    }
}
