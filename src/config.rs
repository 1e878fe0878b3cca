use crate::error::SubburnError;
use crate::timing::TimingConfig;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

pub const DEFAULT_CONFIG_NAME: &str = "subburn.json";

/// Values given on the command line. Each one that is set wins over the
/// config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_dir: Option<PathBuf>,
    pub gap_seconds: Option<f64>,
    pub weight_seconds_per_char: Option<f64>,
    pub min_line_seconds: Option<f64>,
    pub skip_blank_lines: bool,
}

impl Overrides {
    /// The config file read when none is named: `subburn.json` in the base
    /// directory, or in `.` without one.
    pub fn fallback_config(&self) -> PathBuf {
        self.base_dir
            .as_deref()
            .unwrap_or_else(|| Path::new("."))
            .join(DEFAULT_CONFIG_NAME)
    }
}

/// Run configuration. Every field has a default, so a config file only needs
/// the values it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub timing: TimingConfig,
    /// Whether blank script lines become empty captions or are dropped.
    pub keep_blank_lines: bool,
    /// Directory the relative paths below are resolved against.
    pub base_dir: PathBuf,
    pub subtitle_name: PathBuf,
    pub fonts_dir: PathBuf,
    pub output_dir: PathBuf,
    /// ASS `force_style` passed to the subtitles filter.
    pub style: String,
    pub ffmpeg: String,
    pub ffprobe: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timing: TimingConfig::default(),
            keep_blank_lines: true,
            base_dir: PathBuf::from("."),
            subtitle_name: PathBuf::from("table").join("subtitles.srt"),
            fonts_dir: PathBuf::from("fonts"),
            output_dir: PathBuf::from("output"),
            style: "BackColour=&H80000000,BorderStyle=4,Fontsize=16,FontName=Roboto".to_string(),
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
        }
    }
}

impl Config {
    /// Loads `explicit` if given, which must exist. Without it, `fallback` is
    /// read when present and defaults are used otherwise.
    pub fn load(explicit: Option<&Path>, fallback: &Path) -> Result<Self> {
        let path = match explicit {
            Some(path) if !path.is_file() => {
                return Err(SubburnError::InvalidInput {
                    kind: "config",
                    path: path.to_path_buf(),
                }
                .into())
            }
            Some(path) => path,
            None if fallback.is_file() => fallback,
            None => {
                log::debug!("No config file at '{}', using defaults", fallback.display());
                return Ok(Self::default());
            }
        };
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: '{}'", path.display()))?;
        let config: Config = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse config file: '{}'", path.display()))?;
        log::debug!("Loaded config from '{}'", path.display());
        Ok(config)
    }

    /// Loads the config file and applies the command line on top of it.
    pub fn resolve(explicit: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let mut config = Self::load(explicit, &overrides.fallback_config())?;
        config.apply_overrides(overrides);
        Ok(config)
    }

    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(base_dir) = &overrides.base_dir {
            self.base_dir = base_dir.clone();
        }
        if let Some(gap) = overrides.gap_seconds {
            self.timing.gap_seconds = gap;
        }
        if let Some(weight) = overrides.weight_seconds_per_char {
            self.timing.weight_seconds_per_char = weight;
        }
        if let Some(min_line) = overrides.min_line_seconds {
            self.timing.min_line_seconds = min_line;
        }
        if overrides.skip_blank_lines {
            self.keep_blank_lines = false;
        }
    }

    pub fn validate(&self) -> Result<(), SubburnError> {
        self.timing.validate()
    }

    pub fn subtitle_path(&self) -> PathBuf {
        self.base_dir.join(&self.subtitle_name)
    }

    pub fn fonts_path(&self) -> PathBuf {
        self.base_dir.join(&self.fonts_dir)
    }

    pub fn output_path(&self) -> PathBuf {
        self.base_dir.join(&self.output_dir)
    }
}
