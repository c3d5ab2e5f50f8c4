use crate::dom::profile::{ExtractionProfile, EXTENDED, MINIMAL};
use crate::errors::{ExtractError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub extraction: ExtractConfig,
    pub browser: BrowserConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub profile: ProfileKind,
    /// CSS patterns collected in addition to the profile's own.
    pub extra_patterns: Vec<String>,
    pub include_timestamp: bool,
    pub max_text_length: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub headless: bool,
    pub viewport: Viewport,
    pub user_agent: Option<String>,
    pub args: Vec<String>,
    pub navigation_timeout_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    Minimal,
    #[default]
    Extended,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| {
            ExtractError::ConfigurationError(format!("{}: {}", path.display(), e))
        })
    }
}

impl ExtractConfig {
    pub fn with_profile(profile: ProfileKind) -> Self {
        Self {
            profile,
            ..Default::default()
        }
    }

    pub fn profile(&self) -> &'static ExtractionProfile {
        match self.profile {
            ProfileKind::Minimal => &MINIMAL,
            ProfileKind::Extended => &EXTENDED,
        }
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            profile: ProfileKind::default(),
            extra_patterns: Vec::new(),
            include_timestamp: true,
            max_text_length: 1000,
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport: Viewport::default(),
            user_agent: None,
            args: vec![],
            navigation_timeout_ms: 30000,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "extraction": { "profile": "minimal" } }"#).unwrap();
        assert_eq!(config.extraction.profile, ProfileKind::Minimal);
        assert!(config.extraction.include_timestamp);
        assert_eq!(config.extraction.max_text_length, 1000);
        assert!(config.browser.headless);
        assert_eq!(config.browser.viewport.width, 1280);
    }

    #[test]
    fn profile_kind_resolves_to_profile() {
        let config = ExtractConfig::with_profile(ProfileKind::Minimal);
        assert!(!config.profile().admit_metadata_only);
        assert!(ExtractConfig::default().profile().admit_metadata_only);
    }

    #[test]
    fn unknown_profile_is_rejected() {
        let parsed = serde_json::from_str::<Config>(r#"{ "extraction": { "profile": "huge" } }"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Config::from_file("/nonexistent/page-perception.json").unwrap_err();
        assert!(matches!(err, ExtractError::IoError(_)));
    }
}
