use std::sync::Arc;

use crate::host::{ElementId, TransitionId};
use crate::registry::AnimationDescriptor;

/// Engine phase, as seen from outside
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Accepting clicks
    Idle,
    /// Body class applied or pending, waiting for the transition-end signal
    Animating,
    /// Signal received; scrolling (`after` timing) or navigating
    Finalizing,
}

/// One in-flight run of an animation
///
/// Holds what belongs to this click rather than to the registration: the
/// link that was clicked and the path it resolved to.
#[derive(Debug, Clone)]
pub struct Transition {
    pub(crate) id: TransitionId,
    pub(crate) descriptor: Arc<AnimationDescriptor>,
    pub(crate) anchor: ElementId,
    pub(crate) path: String,
    pub(crate) final_element: ElementId,
    pub(crate) class_applied: bool,
}

impl Transition {
    pub(crate) fn new(
        descriptor: Arc<AnimationDescriptor>,
        anchor: ElementId,
        path: String,
        final_element: ElementId,
    ) -> Self {
        Self {
            id: TransitionId::new(),
            descriptor,
            anchor,
            path,
            final_element,
            class_applied: false,
        }
    }

    pub fn id(&self) -> TransitionId {
        self.id
    }

    pub fn descriptor(&self) -> &AnimationDescriptor {
        &self.descriptor
    }

    /// The link that was clicked
    pub fn anchor(&self) -> ElementId {
        self.anchor
    }

    /// Path the engine will navigate to
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn final_element(&self) -> ElementId {
        self.final_element
    }

    /// Whether the body class has been added to the root element yet
    pub fn class_applied(&self) -> bool {
        self.class_applied
    }
}

/// Active transition slot
#[derive(Debug, Default)]
pub(crate) enum State {
    #[default]
    Idle,
    Animating(Transition),
    Finalizing(Transition),
}

impl State {
    pub(crate) fn phase(&self) -> Phase {
        match self {
            State::Idle => Phase::Idle,
            State::Animating(_) => Phase::Animating,
            State::Finalizing(_) => Phase::Finalizing,
        }
    }

    pub(crate) fn transition(&self) -> Option<&Transition> {
        match self {
            State::Idle => None,
            State::Animating(t) | State::Finalizing(t) => Some(t),
        }
    }
}
