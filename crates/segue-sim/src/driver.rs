//! Drives an [`Engine`] over a [`SimHost`]
//!
//! Plays the role of the browser's event loop: delivers clicks, pops pending
//! work off the virtual clock in due order and hands wakes and
//! transition-end signals back to the engine.

use std::time::Duration;

use anyhow::{anyhow, Result};
use tracing::debug;

use segue_core::{ClickEvent, ClickOutcome, Engine, EngineConfig, Hooks, Host};

use crate::host::{Pending, SimHost};
use crate::page::PageFixture;

pub struct Simulation {
    engine: Engine<SimHost>,
}

impl Simulation {
    /// Build the page, construct the engine and enable it
    pub fn new(page: &PageFixture, config: EngineConfig) -> Self {
        let mut engine = Engine::new(SimHost::new(page), config);
        engine.enable();
        Self { engine }
    }

    pub fn with_hooks(self, hooks: Hooks) -> Self {
        Self {
            engine: self.engine.with_hooks(hooks),
        }
    }

    pub fn engine(&self) -> &Engine<SimHost> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine<SimHost> {
        &mut self.engine
    }

    pub fn host(&self) -> &SimHost {
        self.engine.host()
    }

    fn element(&self, name: &str) -> Result<segue_core::ElementId> {
        self.host()
            .element(name)
            .ok_or_else(|| anyhow!("No element '{}' in page", name))
    }

    /// Click on the element named `name`
    ///
    /// The click reaches the engine only if it lands on or inside a link the
    /// engine is listening to; otherwise the browser handles it.
    pub fn click(&mut self, name: &str) -> Result<ClickOutcome> {
        let target = self.element(name)?;
        if self.host().is_unloaded() {
            return Err(anyhow!("Page has been unloaded"));
        }

        let outcome = match self.host().click_listener_for(target) {
            Some(_) => self.engine.click(ClickEvent::new(target)),
            None => ClickOutcome::PassThrough,
        };
        self.engine
            .host_mut()
            .record_click(target, outcome.is_intercepted());
        Ok(outcome)
    }

    /// Fire a transition end on `name` right now
    pub fn fire_transition_end(&mut self, name: &str) -> Result<()> {
        let element = self.element(name)?;
        self.deliver(Pending::TransitionEnd(element));
        Ok(())
    }

    fn deliver(&mut self, item: Pending) {
        match item {
            Pending::Wake(wake) => self.engine.wake(wake),
            Pending::TransitionEnd(element) => {
                let signal = self.engine.transition_end_event();
                if self.engine.host_mut().transition_ended(element, signal) {
                    self.engine.transition_end(element);
                }
            }
        }
    }

    /// Run the earliest pending item; false when nothing is pending
    pub fn step(&mut self) -> bool {
        match self.engine.host_mut().pop_due() {
            Some(item) => {
                debug!(at = ?self.host().now(), ?item, "Delivering");
                self.deliver(item);
                true
            }
            None => false,
        }
    }

    /// Run everything due within the next `by`, then move the clock there
    pub fn advance(&mut self, by: Duration) {
        let until = self.host().now() + by;
        while self.host().next_due().is_some_and(|due| due <= until) {
            self.step();
        }
        self.engine.host_mut().set_now(until);
    }

    /// Run until nothing is pending or `limit` of virtual time has passed
    ///
    /// Returns true when the page went quiet.
    pub fn run_until_quiet(&mut self, limit: Duration) -> bool {
        let until = self.host().now() + limit;
        while let Some(due) = self.host().next_due() {
            if due > until {
                return false;
            }
            self.step();
        }
        true
    }

    /// Like [`Simulation::run_until_quiet`], but paced against the wall
    /// clock. `speed` scales time: 2.0 plays twice as fast.
    pub async fn run_realtime(&mut self, limit: Duration, speed: f64) -> bool {
        let speed = if speed > 0.0 { speed } else { 1.0 };
        let until = self.host().now() + limit;
        while let Some(due) = self.host().next_due() {
            if due > until {
                return false;
            }
            let wait = due.saturating_sub(self.host().now());
            if !wait.is_zero() {
                tokio::time::sleep(wait.div_f64(speed)).await;
            }
            self.step();
        }
        true
    }

    /// Current offset of the page
    pub fn scroll(&self) -> f64 {
        self.host().scroll_offset()
    }
}
