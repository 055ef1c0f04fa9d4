//! Animation registry
//!
//! Maps URL path patterns to animation descriptors. Lookup is first match
//! in registration order; re-registering a pattern replaces the descriptor
//! but keeps its position.

use std::sync::Arc;
use std::time::Duration;

use regex::Regex;
use tracing::{debug, error};

use crate::config::{AnimationOptions, AnimationSpec, EngineConfig, ScrollTiming};
use crate::host::{ElementId, Host};
use crate::{Error, Result};

/// One registered page-transition animation
#[derive(Debug, Clone)]
pub struct AnimationDescriptor {
    pattern: String,
    regex: Regex,
    body_class: String,
    final_element_id: String,
    final_element: Option<ElementId>,
    should_scroll: bool,
    scroll_timing: ScrollTiming,
    scroll_duration: Duration,
}

impl AnimationDescriptor {
    /// Pattern source; also the registry key
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Class string as registered
    pub fn body_class(&self) -> &str {
        &self.body_class
    }

    /// Individual class tokens to add to the root element
    pub fn class_tokens(&self) -> impl Iterator<Item = &str> {
        self.body_class.split_whitespace()
    }

    pub fn final_element_id(&self) -> &str {
        &self.final_element_id
    }

    /// Element whose transition end completes the animation, if it resolved
    pub fn final_element(&self) -> Option<ElementId> {
        self.final_element
    }

    pub fn should_scroll(&self) -> bool {
        self.should_scroll
    }

    pub fn scroll_timing(&self) -> ScrollTiming {
        self.scroll_timing
    }

    pub fn scroll_duration(&self) -> Duration {
        self.scroll_duration
    }
}

/// Ordered pattern → descriptor mapping
#[derive(Debug, Default)]
pub struct Registry {
    entries: Vec<Arc<AnimationDescriptor>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an animation for paths matching `pattern`
    ///
    /// An invalid pattern or an empty class is rejected and nothing is stored.
    /// A final element that cannot be found is logged; the descriptor is still
    /// stored but will never be animated.
    pub fn register<H: Host + ?Sized>(
        &mut self,
        host: &H,
        defaults: &EngineConfig,
        pattern: &str,
        final_element_id: &str,
        body_class: &str,
        options: AnimationOptions,
    ) -> Result<Arc<AnimationDescriptor>> {
        let regex = Regex::new(pattern).map_err(|source| Error::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;

        if body_class.split_whitespace().next().is_none() {
            return Err(Error::Config(format!(
                "Animation for '{}' has an empty body class",
                pattern
            )));
        }

        let final_element = host.element_by_id(final_element_id);
        if final_element.is_none() {
            error!(pattern, element = final_element_id, "No element with ID {}", final_element_id);
        }

        let descriptor = Arc::new(AnimationDescriptor {
            pattern: pattern.to_string(),
            regex,
            body_class: body_class.trim().to_string(),
            final_element_id: final_element_id.to_string(),
            final_element,
            should_scroll: options.should_scroll.unwrap_or(defaults.should_scroll),
            scroll_timing: options.scroll_timing.unwrap_or(defaults.scroll_timing),
            scroll_duration: Duration::from_millis(
                options.scroll_duration_ms.unwrap_or(defaults.scroll_duration_ms),
            ),
        });

        match self.entries.iter_mut().find(|d| d.pattern == pattern) {
            Some(slot) => {
                debug!(pattern, "Replacing registered animation");
                *slot = Arc::clone(&descriptor);
            }
            None => {
                debug!(pattern, "Registered animation");
                self.entries.push(Arc::clone(&descriptor));
            }
        }

        Ok(descriptor)
    }

    /// Register a declarative entry
    pub fn register_spec<H: Host + ?Sized>(
        &mut self,
        host: &H,
        defaults: &EngineConfig,
        spec: &AnimationSpec,
    ) -> Result<Arc<AnimationDescriptor>> {
        self.register(
            host,
            defaults,
            &spec.pattern,
            &spec.final_element,
            &spec.body_class,
            spec.options,
        )
    }

    /// Remove the animation registered under `pattern`
    ///
    /// Unknown patterns are logged and otherwise ignored.
    pub fn deregister(&mut self, pattern: &str) -> Option<Arc<AnimationDescriptor>> {
        match self.entries.iter().position(|d| d.pattern == pattern) {
            Some(index) => Some(self.entries.remove(index)),
            None => {
                error!(pattern, "No animation registered with regex {}", pattern);
                None
            }
        }
    }

    /// First descriptor, in registration order, whose pattern matches `path`
    pub fn find(&self, path: &str) -> Option<&Arc<AnimationDescriptor>> {
        self.entries.iter().find(|d| d.matches(path))
    }

    pub fn get(&self, pattern: &str) -> Option<&Arc<AnimationDescriptor>> {
        self.entries.iter().find(|d| d.pattern == pattern)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<AnimationDescriptor>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeHost;

    fn host() -> FakeHost {
        let mut host = FakeHost::new("https://example.com", "/");
        host.add_element("hero", None, None);
        host.add_element("footer", None, None);
        host
    }

    #[test]
    fn test_register_uses_defaults() {
        let host = host();
        let mut registry = Registry::new();
        let defaults = EngineConfig::default();

        let d = registry
            .register(&host, &defaults, "^/about$", "hero", "fade", AnimationOptions::default())
            .unwrap();

        assert!(d.should_scroll());
        assert_eq!(d.scroll_timing(), ScrollTiming::Before);
        assert_eq!(d.scroll_duration(), Duration::from_millis(200));
        assert!(d.final_element().is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_options_override_defaults() {
        let host = host();
        let mut registry = Registry::new();
        let defaults = EngineConfig::default();
        let options = AnimationOptions::default()
            .should_scroll(false)
            .scroll_timing(ScrollTiming::After)
            .scroll_duration_ms(0);

        let d = registry
            .register(&host, &defaults, "^/$", "hero", "a b", options)
            .unwrap();

        assert!(!d.should_scroll());
        assert_eq!(d.scroll_timing(), ScrollTiming::After);
        assert_eq!(d.scroll_duration(), Duration::ZERO);
        assert_eq!(d.class_tokens().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_reregister_replaces_in_place() {
        let host = host();
        let mut registry = Registry::new();
        let defaults = EngineConfig::default();

        registry
            .register(&host, &defaults, "^/a", "hero", "first", AnimationOptions::default())
            .unwrap();
        registry
            .register(&host, &defaults, "^/", "hero", "catch-all", AnimationOptions::default())
            .unwrap();
        registry
            .register(&host, &defaults, "^/a", "footer", "second", AnimationOptions::default())
            .unwrap();

        assert_eq!(registry.len(), 2);
        let hit = registry.find("/a/b").unwrap();
        assert_eq!(hit.body_class(), "second");
        assert_eq!(hit.final_element_id(), "footer");
    }

    #[test]
    fn test_first_match_wins() {
        let host = host();
        let mut registry = Registry::new();
        let defaults = EngineConfig::default();

        registry
            .register(&host, &defaults, "^/blog", "hero", "blog", AnimationOptions::default())
            .unwrap();
        registry
            .register(&host, &defaults, "^/blog/post", "hero", "post", AnimationOptions::default())
            .unwrap();

        assert_eq!(registry.find("/blog/post/1").unwrap().body_class(), "blog");
        assert!(registry.find("/contact").is_none());
    }

    #[test]
    fn test_missing_element_still_stored() {
        let host = host();
        let mut registry = Registry::new();
        let defaults = EngineConfig::default();

        let d = registry
            .register(&host, &defaults, "^/x$", "nope", "fade", AnimationOptions::default())
            .unwrap();

        assert!(d.final_element().is_none());
        assert!(registry.get("^/x$").is_some());
    }

    #[test]
    fn test_invalid_pattern_and_empty_class_rejected() {
        let host = host();
        let mut registry = Registry::new();
        let defaults = EngineConfig::default();

        let err = registry
            .register(&host, &defaults, "^/(unclosed", "hero", "fade", AnimationOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { .. }));

        let err = registry
            .register(&host, &defaults, "^/ok$", "hero", "   ", AnimationOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        assert!(registry.is_empty());
    }

    #[test]
    fn test_deregister_unknown_is_harmless() {
        let host = host();
        let mut registry = Registry::new();
        let defaults = EngineConfig::default();
        registry
            .register(&host, &defaults, "^/a$", "hero", "fade", AnimationOptions::default())
            .unwrap();

        assert!(registry.deregister("^/b$").is_none());
        assert_eq!(registry.len(), 1);

        assert!(registry.deregister("^/a$").is_some());
        assert!(registry.is_empty());
    }
}
