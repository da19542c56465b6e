//! Run configuration.
//!
//! Mirrors the suite's external configuration document:
//! base URL, browser launch options, timeouts, screenshot and logging
//! settings. Loadable from JSON or YAML; every field has a default so a
//! partial document is enough.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::result::EnsayoResult;

/// Default wait timeout for element operations (ms)
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default navigation timeout (ms)
pub const DEFAULT_NAVIGATION_TIMEOUT_MS: u64 = 30_000;

/// Browser engine to launch.
///
/// Unknown names fall back to the default engine rather than failing the
/// run; a typo in configuration should not abort every scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// Chromium-like engine (default)
    #[default]
    Chromium,
    /// Firefox-like engine
    Firefox,
    /// WebKit-like engine
    Webkit,
}

impl Engine {
    /// Parse an engine name, falling back to the default for unknown names.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "firefox" => Self::Firefox,
            "webkit" => Self::Webkit,
            _ => Self::Chromium,
        }
    }

    /// Engine name as written in configuration
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Chromium => "chromium",
            Self::Firefox => "firefox",
            Self::Webkit => "webkit",
        }
    }
}

/// Viewport dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

/// Browser launch options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    /// Engine selection
    pub name: Engine,
    /// Run without a visible window
    pub headless: bool,
    /// Slow-motion delay between driver actions (ms)
    #[serde(rename = "slowMo")]
    pub slow_mo_ms: u64,
    /// Viewport size for the isolated context
    pub viewport: Viewport,
    /// Extra launch arguments passed through to the engine
    pub args: Vec<String>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            name: Engine::Chromium,
            headless: true,
            slow_mo_ms: 0,
            viewport: Viewport::default(),
            args: Vec::new(),
        }
    }
}

/// Wait timeouts
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// Default timeout for element waits (ms)
    #[serde(rename = "default")]
    pub default_ms: u64,
    /// Timeout for navigations (ms)
    #[serde(rename = "navigation")]
    pub navigation_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            default_ms: DEFAULT_TIMEOUT_MS,
            navigation_ms: DEFAULT_NAVIGATION_TIMEOUT_MS,
        }
    }
}

/// Screenshot capture settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenshotSettings {
    /// Directory for screenshot artifacts
    pub path: PathBuf,
    /// Capture a full-page screenshot when a scenario fails
    #[serde(rename = "onFailure")]
    pub on_failure: bool,
}

impl Default for ScreenshotSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("test-results/screenshots"),
            on_failure: true,
        }
    }
}

/// Logging sink settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Directory for log files
    pub path: PathBuf,
    /// Minimum level for the run log (trace/debug/info/warn/error)
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("test-results/logs"),
            level: "info".to_string(),
        }
    }
}

/// Complete run configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Base URL of the application under test
    #[serde(rename = "baseURL")]
    pub base_url: String,
    /// Browser launch options
    pub browser: BrowserSettings,
    /// Wait timeouts
    pub timeouts: Timeouts,
    /// Screenshot settings
    pub screenshots: ScreenshotSettings,
    /// Logging settings
    pub logging: LoggingSettings,
    /// Directory for run reports
    #[serde(rename = "reports")]
    pub reports_path: PathBuf,
}

impl RunConfig {
    /// Load from a JSON document
    pub fn from_json_file(path: impl AsRef<Path>) -> EnsayoResult<Self> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Load from a YAML document
    pub fn from_yaml_file(path: impl AsRef<Path>) -> EnsayoResult<Self> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_yaml_ng::from_str(&data)?)
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.browser.headless = headless;
        self
    }

    /// Set the default element-wait timeout
    #[must_use]
    pub const fn with_default_timeout_ms(mut self, ms: u64) -> Self {
        self.timeouts.default_ms = ms;
        self
    }

    /// Set the screenshot directory
    #[must_use]
    pub fn with_screenshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.screenshots.path = path.into();
        self
    }
}
