use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::canvas::SUPERSAMPLE;
use crate::error::{ConfigError, Result};

/// Largest matrix side whose supersampled frame still fits a GIF
pub const MAX_ANIMATION_CELLS: u32 = u16::MAX as u32 / SUPERSAMPLE;

/// Main configuration for ledlog-render
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Animated (GIF) rendering settings
    pub animation: AnimationConfig,

    /// Static (PNG strip timeline) rendering settings
    pub strip: StripConfig,

    /// Worker pool settings
    pub jobs: JobConfig,

    /// Output placement and post-processing
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|_| ConfigError::ParseFailed { path: path.display().to_string() })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.animation.validate()?;
        self.strip.validate()?;
        self.jobs.validate()?;
        Ok(())
    }
}

fn invalid(key: &str, value: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

/// Animated GIF settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Matrix rows
    pub height: u32,

    /// Matrix columns
    pub width: u32,

    /// Display rate of the output animation
    pub fps: u32,

    /// NeuQuant speed used when building per-frame palettes (1-30, lower is slower and better)
    pub quantize_speed: i32,

    /// Characters stripped from the end of the input file name to get the output base
    pub suffix_len: usize,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            height: 100,
            width: 100,
            fps: 50,
            quantize_speed: 10,
            suffix_len: 7,
        }
    }
}

impl AnimationConfig {
    /// Number of LEDs read from each frame
    pub fn num_leds(&self) -> usize {
        self.height as usize * self.width as usize
    }

    /// GIF frame delay in centiseconds
    pub fn frame_delay(&self) -> u16 {
        (100 / self.fps.max(1)).max(1) as u16
    }

    fn validate(&self) -> Result<()> {
        if self.height == 0 || self.height > MAX_ANIMATION_CELLS {
            return Err(invalid("animation.height", self.height).into());
        }

        if self.width == 0 || self.width > MAX_ANIMATION_CELLS {
            return Err(invalid("animation.width", self.width).into());
        }

        if self.fps == 0 || self.fps > 100 {
            return Err(invalid("animation.fps", self.fps).into());
        }

        if !(1..=30).contains(&self.quantize_speed) {
            return Err(invalid("animation.quantize_speed", self.quantize_speed).into());
        }

        Ok(())
    }
}

/// Static PNG settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StripConfig {
    /// LEDs per frame
    pub num_leds: usize,

    /// Fixed image height; picked from the frame count when unset
    pub height: Option<u32>,

    /// Width of the separator between chunks
    pub gutter_width: u32,

    /// Separator color
    pub gutter_color: [u8; 3],

    /// Characters stripped from the end of the input file name to get the output base
    pub suffix_len: usize,
}

impl Default for StripConfig {
    fn default() -> Self {
        Self {
            num_leds: 240,
            height: None,
            gutter_width: 10,
            gutter_color: [32, 32, 32],
            suffix_len: 4,
        }
    }
}

impl StripConfig {
    fn validate(&self) -> Result<()> {
        if self.num_leds == 0 {
            return Err(invalid("strip.num_leds", self.num_leds).into());
        }

        if self.height == Some(0) {
            return Err(invalid("strip.height", 0).into());
        }

        Ok(())
    }
}

/// Worker pool settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    /// Number of files rendered at the same time
    pub workers: usize,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get(),
        }
    }
}

impl JobConfig {
    fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(invalid("jobs.workers", self.workers).into());
        }
        Ok(())
    }
}

/// Output placement and post-processing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for rendered files; next to each input when unset
    pub dir: Option<PathBuf>,

    /// Draw progress bars on stderr
    pub progress: bool,

    /// GIF size optimization pass
    pub optimizer: OptimizerConfig,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: None,
            progress: true,
            optimizer: OptimizerConfig::default(),
        }
    }
}

/// External GIF optimizer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub enabled: bool,

    /// Optimizer executable
    pub program: String,

    /// `--optimize` level passed to the optimizer (1-3)
    pub level: u8,

    /// `--lossy` amount; lossless optimization when unset
    pub lossy: Option<u32>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            program: "gifsicle".to_string(),
            level: 3,
            lossy: None,
        }
    }
}
