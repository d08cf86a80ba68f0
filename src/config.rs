use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use crate::foundation::error::{SegueError, SegueResult};

/// Environment override for [`SegueConfig::poll_interval_ms`].
pub const POLL_INTERVAL_ENV: &str = "SEGUE_POLL_INTERVAL_MS";

/// Runtime configuration.
///
/// Every field has a default, so `{}` is a valid config file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SegueConfig {
    /// Store polling interval in milliseconds.
    pub poll_interval_ms: u64,
    /// Preview rendering settings.
    pub preview: PreviewConfig,
    /// Store discovery settings.
    pub discovery: DiscoveryConfig,
}

/// Preview surface size and animation length.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PreviewConfig {
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// One full preview loop, in milliseconds.
    pub duration_ms: u64,
}

/// Names used to find the host store in a named registry.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiscoveryConfig {
    /// Case-insensitive substrings a registry entry name must contain.
    pub registry_patterns: Vec<String>,
    /// Exact store names tried last.
    pub conventional_names: Vec<String>,
}

impl Default for SegueConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
            preview: PreviewConfig::default(),
            discovery: DiscoveryConfig::default(),
        }
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            width: 160,
            height: 90,
            duration_ms: 1500,
        }
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            registry_patterns: vec!["editor".to_owned(), "project".to_owned()],
            conventional_names: vec![
                "projectStore".to_owned(),
                "editorStore".to_owned(),
                "timelineStore".to_owned(),
                "store".to_owned(),
            ],
        }
    }
}

impl SegueConfig {
    /// Parse a config from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> SegueResult<Self> {
        let cfg: SegueConfig = serde_json::from_reader(r)
            .map_err(|e| SegueError::serde(format!("parse config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> SegueResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SegueError::validation(format!("open config JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Apply `SEGUE_*` environment overrides. Unparseable or zero values are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(ms) = std::env::var(POLL_INTERVAL_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|&n| n > 0)
        {
            self.poll_interval_ms = ms;
        }
        self
    }

    /// Check value ranges.
    pub fn validate(&self) -> SegueResult<()> {
        if self.poll_interval_ms == 0 {
            return Err(SegueError::validation("pollIntervalMs must be > 0"));
        }
        if self.preview.width == 0 || self.preview.height == 0 {
            return Err(SegueError::validation("preview width/height must be > 0"));
        }
        if self.preview.duration_ms == 0 {
            return Err(SegueError::validation("preview durationMs must be > 0"));
        }
        Ok(())
    }

    /// Polling interval as a [`Duration`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl PreviewConfig {
    /// Loop length as a [`Duration`].
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}
