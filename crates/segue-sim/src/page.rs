//! Page fixtures
//!
//! A fixture describes just enough of a document for the engine to run
//! against: the origin and path it was loaded from, a flat list of elements
//! with parent links, and how the CSS behaves when the root gains a class.
//!
//! ```toml
//! origin = "https://example.com"
//! path = "/"
//! scroll = 640.0
//!
//! [[elements]]
//! id = "hero"
//! transition_ms = 400
//!
//! [[elements]]
//! id = "nav-about"
//! href = "/about"
//! ```

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageFixture {
    /// `scheme://host[:port]` the page was served from
    #[serde(default = "default_origin")]
    pub origin: String,
    /// Path of the page itself
    #[serde(default = "default_path")]
    pub path: String,
    /// Initial scroll offset
    #[serde(default)]
    pub scroll: f64,
    /// Largest reachable scroll offset; unset means unbounded
    #[serde(default)]
    pub max_scroll: Option<f64>,
    /// Style properties the environment knows, for transition-end detection
    #[serde(default = "default_style_properties")]
    pub style_properties: Vec<String>,
    /// Whether navigating discards the page. When false the page stays
    /// alive, as it does when a browser restores it from its page cache.
    #[serde(default)]
    pub unload_on_navigate: bool,
    #[serde(default)]
    pub elements: Vec<ElementFixture>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementFixture {
    pub id: String,
    /// ID of the containing element; top-level elements hang off the body
    #[serde(default)]
    pub parent: Option<String>,
    /// Link target, absolute or relative to the origin
    #[serde(default)]
    pub href: Option<String>,
    /// CSS transition length once the root gains a class; the element then
    /// fires a transition-end signal
    #[serde(default)]
    pub transition_ms: Option<u64>,
}

fn default_origin() -> String {
    "https://example.com".to_string()
}

fn default_path() -> String {
    "/".to_string()
}

fn default_style_properties() -> Vec<String> {
    vec!["transition".to_string()]
}

impl Default for PageFixture {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            path: default_path(),
            scroll: 0.0,
            max_scroll: None,
            style_properties: default_style_properties(),
            unload_on_navigate: false,
            elements: Vec::new(),
        }
    }
}

impl PageFixture {
    pub fn new(origin: &str, path: &str) -> Self {
        Self {
            origin: origin.to_string(),
            path: path.to_string(),
            ..Default::default()
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read page fixture {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Invalid page fixture {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let page: Self = toml::from_str(content)?;
        page.validate()?;
        Ok(page)
    }

    /// Check element ids are unique and parents refer to earlier elements
    pub fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for element in &self.elements {
            if element.id == "body" {
                bail!("Element id 'body' is reserved for the root element");
            }
            if let Some(parent) = &element.parent {
                if parent != "body" && !seen.contains(parent.as_str()) {
                    bail!(
                        "Element '{}' refers to unknown parent '{}'",
                        element.id,
                        parent
                    );
                }
            }
            if !seen.insert(element.id.as_str()) {
                bail!("Duplicate element id '{}'", element.id);
            }
        }
        Ok(())
    }

    /// Append an element (builder style, for tests and demos)
    pub fn element(mut self, id: &str, parent: Option<&str>) -> Self {
        self.elements.push(ElementFixture {
            id: id.to_string(),
            parent: parent.map(str::to_string),
            href: None,
            transition_ms: None,
        });
        self
    }

    pub fn link(mut self, id: &str, href: &str) -> Self {
        self.elements.push(ElementFixture {
            id: id.to_string(),
            parent: None,
            href: Some(href.to_string()),
            transition_ms: None,
        });
        self
    }

    /// Element that fires transition end `ms` after the root gains a class
    pub fn animated(mut self, id: &str, ms: u64) -> Self {
        self.elements.push(ElementFixture {
            id: id.to_string(),
            parent: None,
            href: None,
            transition_ms: Some(ms),
        });
        self
    }

    pub fn scrolled_to(mut self, offset: f64) -> Self {
        self.scroll = offset;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fixture() {
        let page = PageFixture::from_toml(
            r#"
            origin = "https://example.com"
            path = "/home"
            scroll = 300.0

            [[elements]]
            id = "hero"
            transition_ms = 400

            [[elements]]
            id = "nav"

            [[elements]]
            id = "nav-about"
            parent = "nav"
            href = "/about"
            "#,
        )
        .unwrap();

        assert_eq!(page.path, "/home");
        assert_eq!(page.elements.len(), 3);
        assert_eq!(page.elements[0].transition_ms, Some(400));
        assert_eq!(page.elements[2].parent.as_deref(), Some("nav"));
        assert_eq!(page.style_properties, vec!["transition"]);
        assert!(!page.unload_on_navigate);
    }

    #[test]
    fn test_rejects_duplicates_and_unknown_parents() {
        let dup = PageFixture::default().element("a", None).element("a", None);
        assert!(dup.validate().is_err());

        let orphan = PageFixture::default().element("child", Some("missing"));
        assert!(orphan.validate().is_err());

        let reserved = PageFixture::default().element("body", None);
        assert!(reserved.validate().is_err());
    }
}
