//! Runtime configuration.
//!
//! Read from `~/.config/freshet/config.toml` at startup; a commented
//! default file is written on first run. Missing fields fall back to their
//! defaults, so a config file only needs to name what it overrides.
//!
//! Per-site behavior lives in the adapter registry, not here; this module
//! only tunes the browser runtime shared by every adapter.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::app::{FreshetError, Result};

/// Browser runtime settings shared by all adapters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    /// Run Chrome headless (default: true).
    pub headless: bool,

    /// Extra Chrome launch flags.
    pub chrome_args: Vec<String>,

    /// How long to let the network settle after navigation, in milliseconds
    /// (default: 1000). Approximates a "mostly idle" network condition.
    pub settle_ms: u64,

    /// Poll interval for the readiness-selector wait, in milliseconds
    /// (default: 250).
    pub poll_ms: u64,

    /// Fixed user-agent presented when an adapter requests fingerprint
    /// hardening. Deliberately not randomized, to keep runs reproducible.
    pub hardened_user_agent: String,

    /// Window size presented when hardening is requested.
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            chrome_args: vec![
                "--no-sandbox".to_string(),
                "--disable-gpu".to_string(),
                "--disable-dev-shm-usage".to_string(),
            ],
            settle_ms: 1000,
            poll_ms: 250,
            hardened_user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                 AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            viewport_width: 1280,
            viewport_height: 800,
        }
    }
}

impl BrowserSettings {
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_ms)
    }
}

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub browser: BrowserSettings,
}

impl Config {
    /// Load configuration from the default path, creating a commented
    /// default file if none exists yet.
    pub fn load() -> Result<Self> {
        let path = Self::default_config_path()?;
        if !path.exists() {
            Self::write_default(&path)?;
            return Ok(Self::default());
        }
        Self::from_path(&path)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| FreshetError::Config(format!("{}: {}", path.display(), e)))
    }

    /// `~/.config/freshet/config.toml`
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| FreshetError::Config("no config directory available".into()))?;
        Ok(config_dir.join("freshet").join("config.toml"))
    }

    fn write_default(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::File::create(path)?;
        file.write_all(Self::default_config_content().as_bytes())?;
        Ok(())
    }

    fn default_config_content() -> String {
        r##"# Freshet configuration
#
# Every field is optional; omitted fields use the built-in defaults.

[browser]
# Run Chrome without a visible window.
headless = true

# Extra Chrome launch flags.
chrome_args = ["--no-sandbox", "--disable-gpu", "--disable-dev-shm-usage"]

# Post-navigation network settle time, in milliseconds.
settle_ms = 1000

# Readiness-selector poll interval, in milliseconds.
poll_ms = 250

# Fingerprint presented when an adapter enables anti-crawler hardening.
hardened_user_agent = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
viewport_width = 1280
viewport_height = 800
"##
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn test_default_values() {
        let settings = BrowserSettings::default();
        assert!(settings.headless);
        assert_eq!(settings.settle_ms, 1000);
        assert_eq!(settings.poll_ms, 250);
        assert_eq!(settings.viewport_width, 1280);
        assert_eq!(settings.viewport_height, 800);
        assert!(settings.hardened_user_agent.contains("Chrome/120"));
    }

    #[test]
    fn test_durations() {
        let settings = BrowserSettings::default();
        assert_eq!(settings.settle(), Duration::from_millis(1000));
        assert_eq!(settings.poll_interval(), Duration::from_millis(250));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[browser]\nheadless = false\nsettle_ms = 50").unwrap();
        let config = Config::from_path(file.path()).unwrap();
        assert!(!config.browser.headless);
        assert_eq!(config.browser.settle_ms, 50);
        assert_eq!(config.browser.poll_ms, 250);
    }

    #[test]
    fn test_invalid_file_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[browser]\nheadless = \"definitely\"").unwrap();
        let err = Config::from_path(file.path()).unwrap_err();
        assert!(matches!(err, FreshetError::Config(_)));
    }

    #[test]
    fn test_default_config_content_parses() {
        let config: Config = toml::from_str(&Config::default_config_content()).unwrap();
        assert!(config.browser.headless);
    }
}
