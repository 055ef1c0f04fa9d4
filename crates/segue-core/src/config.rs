use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// When page scrolling happens relative to applying the body class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollTiming {
    /// Scroll first, apply the class once scrolling completes
    #[default]
    Before,
    /// Apply the class on the next tick while scrolling
    During,
    /// Apply the class immediately, scroll once the transition has ended
    After,
}

impl std::fmt::Display for ScrollTiming {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ScrollTiming::Before => "before",
            ScrollTiming::During => "during",
            ScrollTiming::After => "after",
        };
        f.write_str(s)
    }
}

/// Engine-wide configuration, fixed at construction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Scroll as part of animations unless a registration overrides it
    #[serde(default = "default_true")]
    pub should_scroll: bool,
    /// Default scroll timing
    #[serde(default)]
    pub scroll_timing: ScrollTiming,
    /// Default scroll duration in milliseconds
    #[serde(default = "default_scroll_duration")]
    pub scroll_duration_ms: u64,
    /// Animate links that point at the page currently shown
    #[serde(default)]
    pub animate_links_to_self: bool,
    /// Delay before undoing the transition after navigation was requested
    #[serde(default = "default_cleanup_delay")]
    pub cleanup_delay_ms: u64,
    /// Force navigation if the transition-end signal never arrives.
    /// Unset means wait forever.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_timeout_ms: Option<u64>,
    /// Animations to register on startup
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub animations: Vec<AnimationSpec>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            should_scroll: default_true(),
            scroll_timing: ScrollTiming::default(),
            scroll_duration_ms: default_scroll_duration(),
            animate_links_to_self: false,
            cleanup_delay_ms: default_cleanup_delay(),
            transition_timeout_ms: None,
            animations: Vec::new(),
        }
    }
}

/// Per-registration overrides of the engine defaults
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub should_scroll: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_timing: Option<ScrollTiming>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_duration_ms: Option<u64>,
}

impl AnimationOptions {
    pub fn should_scroll(mut self, value: bool) -> Self {
        self.should_scroll = Some(value);
        self
    }

    pub fn scroll_timing(mut self, timing: ScrollTiming) -> Self {
        self.scroll_timing = Some(timing);
        self
    }

    pub fn scroll_duration_ms(mut self, ms: u64) -> Self {
        self.scroll_duration_ms = Some(ms);
        self
    }
}

/// Declarative registration entry, as written in a config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationSpec {
    /// Regular expression matched against the link path
    pub pattern: String,
    /// ID of the element whose transition end completes the animation
    pub final_element: String,
    /// Class token(s) added to the root element to start the animation
    pub body_class: String,
    #[serde(flatten)]
    pub options: AnimationOptions,
}

fn default_true() -> bool {
    true
}

fn default_scroll_duration() -> u64 {
    200
}

fn default_cleanup_delay() -> u64 {
    100
}

impl EngineConfig {
    /// Load configuration from the default path or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific TOML file
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Save configuration to a TOML file
    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/segue/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("segue")
            .join("config.toml")
    }

    pub fn cleanup_delay(&self) -> Duration {
        Duration::from_millis(self.cleanup_delay_ms)
    }

    pub fn transition_timeout(&self) -> Option<Duration> {
        self.transition_timeout_ms.map(Duration::from_millis)
    }
}
