use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::config::OptimizerConfig;
use crate::error::{EncodingError, Result};

/// What the optimizer pass did to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Optimization {
    /// Rewritten in place; sizes in bytes
    Optimized { before: u64, after: u64 },
    Disabled,
    /// The optimizer executable could not be found
    Unavailable,
}

/// Runs gifsicle over a finished GIF, rewriting it in place
#[derive(Debug, Clone)]
pub struct GifOptimizer {
    config: OptimizerConfig,
    available: bool,
}

impl GifOptimizer {
    /// Probe for the configured executable once, up front
    pub fn new(config: OptimizerConfig) -> Self {
        let available = config.enabled && Self::check_available(&config.program);
        if config.enabled && !available {
            warn!("{} not found; GIFs will be written unoptimized", config.program);
        }
        Self { config, available }
    }

    pub fn check_available(program: &str) -> bool {
        Command::new(program)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    fn args(&self, path: &Path) -> Vec<String> {
        let mut args = vec![
            "--batch".to_string(),
            format!("--optimize={}", self.config.level.clamp(1, 3)),
            "--no-warnings".to_string(),
        ];
        if let Some(lossy) = self.config.lossy {
            args.push(format!("--lossy={}", lossy));
        }
        args.push(path.display().to_string());
        args
    }

    /// Optimize `path` in place. Blocks until the optimizer exits.
    pub fn optimize<P: AsRef<Path>>(&self, path: P) -> Result<Optimization> {
        let path = path.as_ref();
        if !self.config.enabled {
            return Ok(Optimization::Disabled);
        }
        if !self.available {
            return Ok(Optimization::Unavailable);
        }

        let before = std::fs::metadata(path)?.len();
        let output = Command::new(&self.config.program)
            .args(self.args(path))
            .output()
            .map_err(|e| EncodingError::Optimizer {
                reason: format!("failed to run {}: {}", self.config.program, e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EncodingError::Optimizer {
                reason: format!("{} failed: {}", self.config.program, stderr.trim()),
            }
            .into());
        }

        let after = std::fs::metadata(path)?.len();
        debug!("Optimized {:?}: {} -> {} bytes", path, before, after);
        Ok(Optimization::Optimized { before, after })
    }
}
