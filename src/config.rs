use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::Lane;
use crate::error::SignwallError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub source: SourceConfig,
    pub rotation: RotationConfig,
    pub refresh: RefreshConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Snapshot endpoint
    pub url: Option<String>,
    /// Local snapshot file; takes precedence over `url`
    pub file: Option<PathBuf>,
    /// Route primary entries with this affinity into the archive lane
    pub archive_affinity: Option<String>,
    /// Request timeout; unset leaves the transport default
    pub timeout_ms: Option<u64>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: Some("http://localhost:3000/api/prayers".to_string()),
            file: None,
            archive_affinity: None,
            timeout_ms: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    pub page_display_ms: u64,
    pub page_size: usize,
    /// Every Nth page is the instruction page; 0 disables it
    pub instruction_page_frequency: u64,
    pub weights: LaneWeights,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            page_display_ms: 18000,
            page_size: 7,
            instruction_page_frequency: 10,
            weights: LaneWeights::default(),
        }
    }
}

impl RotationConfig {
    pub fn page_display_time(&self) -> Duration {
        Duration::from_millis(self.page_display_ms)
    }
}

/// Share of ticks each entry lane receives
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaneWeights {
    pub recent: f64,
    pub older: f64,
    pub archive: f64,
}

impl Default for LaneWeights {
    fn default() -> Self {
        Self {
            recent: 0.70,
            older: 0.25,
            archive: 0.05,
        }
    }
}

impl LaneWeights {
    const TOLERANCE: f64 = 1e-6;

    /// Contiguous bands over `[0, 1)` in fixed lane order.
    ///
    /// Without an archive lane its weight folds into `older`.
    pub fn bands(&self, has_archive: bool) -> [(Lane, f64); 3] {
        if has_archive {
            [
                (Lane::Recent, self.recent),
                (Lane::Older, self.older),
                (Lane::Archive, self.archive),
            ]
        } else {
            [
                (Lane::Recent, self.recent),
                (Lane::Older, self.older + self.archive),
                (Lane::Archive, 0.0),
            ]
        }
    }

    pub fn sum(&self) -> f64 {
        self.recent + self.older + self.archive
    }

    pub fn validate(&self) -> std::result::Result<(), SignwallError> {
        if [self.recent, self.older, self.archive].iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(SignwallError::Config(format!("lane weights must be non-negative: {:?}", self)));
        }
        if (self.sum() - 1.0).abs() > Self::TOLERANCE {
            return Err(SignwallError::Config(format!("lane weights sum to {}, expected 1", self.sum())));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    pub interval_secs: u64,
    pub recent_window_days: i64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: 300,
            recent_window_days: 7,
        }
    }
}

impl RefreshConfig {
    /// A century; longer windows classify every entry as recent anyway
    pub const MAX_RECENT_WINDOW_DAYS: i64 = 36_500;

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn recent_window(&self) -> chrono::Duration {
        chrono::Duration::try_days(self.recent_window_days).unwrap_or(chrono::Duration::MAX)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub title: String,
    pub instruction_heading: String,
    pub instruction_lines: Vec<String>,
    /// Delay between successive cards fading in
    pub stagger_ms: u64,
    /// Screen redraw rate, also the keyboard poll timeout
    pub redraw_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: "Prayer Wall".to_string(),
            instruction_heading: "Submit Your Prayer Intention".to_string(),
            instruction_lines: vec![
                "Use the iPad in the church to submit your prayer intention".to_string(),
                "- or -".to_string(),
                "Visit the prayer wall on your mobile device".to_string(),
            ],
            stagger_ms: 200,
            redraw_ms: 250,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            source: SourceConfig::default(),
            rotation: RotationConfig::default(),
            refresh: RefreshConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try primary location: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            let project_name = env!("CARGO_PKG_NAME");
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let project_name = env!("CARGO_PKG_NAME");
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        // No config file found, use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        config.validate().context("Invalid config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Reject values the rotation engine cannot run with
    pub fn validate(&self) -> std::result::Result<(), SignwallError> {
        self.rotation.weights.validate()?;
        if self.rotation.page_size == 0 {
            return Err(SignwallError::Config("rotation.page_size must be at least 1".to_string()));
        }
        if self.rotation.page_display_ms == 0 {
            return Err(SignwallError::Config("rotation.page_display_ms must be positive".to_string()));
        }
        if self.refresh.interval_secs == 0 {
            return Err(SignwallError::Config("refresh.interval_secs must be positive".to_string()));
        }
        if self.refresh.recent_window_days < 0 {
            return Err(SignwallError::Config("refresh.recent_window_days must not be negative".to_string()));
        }
        if self.refresh.recent_window_days > RefreshConfig::MAX_RECENT_WINDOW_DAYS {
            return Err(SignwallError::Config(format!(
                "refresh.recent_window_days must be at most {}",
                RefreshConfig::MAX_RECENT_WINDOW_DAYS
            )));
        }
        if self.source.url.is_none() && self.source.file.is_none() {
            return Err(SignwallError::Config("source needs a url or a file".to_string()));
        }
        Ok(())
    }
}
