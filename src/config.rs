//! Configuration management and validation.
//!
//! Holds the transform settings requested for a run and the surrounding
//! conversion settings (paths, channel, output behaviour). Everything is
//! validated before the input file is touched.

use crate::constants::{DEFAULT_CHANNEL, DEFAULT_OUTPUT_EXTENSION, STDOUT_PATH};
use crate::error::{PwlError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Transforms requested for a run.
///
/// Field order matches the order in which the pipeline applies them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformConfig {
    /// Lower clamp bound
    pub clamp_low: Option<f64>,

    /// Upper clamp bound
    pub clamp_high: Option<f64>,

    /// Subtract the mean value
    pub remove_dc: bool,

    /// Added to every value
    pub offset: Option<f64>,

    /// Every value is multiplied by this
    pub multiply: Option<f64>,

    /// Seconds added to every time
    pub time_shift: Option<f64>,

    /// Samples at or after this time are dropped
    pub cut: Option<f64>,

    /// Extra copies appended after the waveform
    pub repeat: Option<usize>,

    /// Keep one of every N samples
    pub downsample: Option<usize>,

    /// Drop interior points of flat runs
    pub compact: bool,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            clamp_low: None,
            clamp_high: None,
            remove_dc: false,
            offset: None,
            multiply: None,
            time_shift: None,
            cut: None,
            repeat: None,
            downsample: None,
            compact: true,
        }
    }
}

impl TransformConfig {
    /// Clamp values to the given bounds
    pub fn with_clamp(mut self, low: Option<f64>, high: Option<f64>) -> Self {
        self.clamp_low = low;
        self.clamp_high = high;
        self
    }

    /// Enable DC removal
    pub fn with_remove_dc(mut self) -> Self {
        self.remove_dc = true;
        self
    }

    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_multiply(mut self, factor: f64) -> Self {
        self.multiply = Some(factor);
        self
    }

    pub fn with_time_shift(mut self, delta: f64) -> Self {
        self.time_shift = Some(delta);
        self
    }

    pub fn with_cut(mut self, threshold: f64) -> Self {
        self.cut = Some(threshold);
        self
    }

    pub fn with_repeat(mut self, count: usize) -> Self {
        self.repeat = Some(count);
        self
    }

    pub fn with_downsample(mut self, interval: usize) -> Self {
        self.downsample = Some(interval);
        self
    }

    /// Keep every point, including the interior of flat runs
    pub fn keep_all(mut self) -> Self {
        self.compact = false;
        self
    }

    /// Check every argument before any transform runs
    pub fn validate(&self) -> Result<()> {
        let numeric = [
            ("clamp low", self.clamp_low),
            ("clamp high", self.clamp_high),
            ("offset", self.offset),
            ("multiply", self.multiply),
            ("time shift", self.time_shift),
            ("cut", self.cut),
        ];
        for (argument, value) in numeric {
            if let Some(value) = value {
                if !value.is_finite() {
                    return Err(PwlError::invalid_argument(argument, value));
                }
            }
        }

        if let (Some(low), Some(high)) = (self.clamp_low, self.clamp_high) {
            if high <= low {
                return Err(PwlError::InvalidClampBounds { low, high });
            }
        }

        if let Some(threshold) = self.cut {
            if threshold <= 0.0 {
                return Err(PwlError::InvalidCutThreshold { threshold });
            }
        }

        if let Some(count) = self.repeat {
            if count < 1 {
                return Err(PwlError::InvalidRepeatCount { count });
            }
        }

        if let Some(interval) = self.downsample {
            if interval <= 1 {
                return Err(PwlError::InvalidDownsampleInterval { interval });
            }
        }

        Ok(())
    }

    /// True when no transform other than compaction is requested
    pub fn is_passthrough(&self) -> bool {
        let defaults = Self {
            compact: self.compact,
            ..Self::default()
        };
        *self == defaults
    }
}

/// How header analysis is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum AnalysisFormat {
    /// Human-readable listing
    #[default]
    Human,
    /// JSON for scripting
    Json,
}

/// Where the PWL records go
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputTarget {
    File(PathBuf),
    Stdout,
}

/// Settings for one conversion run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionConfig {
    pub input: PathBuf,
    pub output: OutputTarget,
    pub channel: String,
    /// Only analyse the header
    pub list_only: bool,
    pub analysis_format: AnalysisFormat,
    pub force_overwrite: bool,
    pub transforms: TransformConfig,
}

impl ConversionConfig {
    /// Configuration with defaults for everything but the input path
    pub fn new(input: impl Into<PathBuf>) -> Self {
        let input = input.into();
        let output = OutputTarget::File(default_output_path(&input));
        Self {
            input,
            output,
            channel: DEFAULT_CHANNEL.to_string(),
            list_only: false,
            analysis_format: AnalysisFormat::default(),
            force_overwrite: false,
            transforms: TransformConfig::default(),
        }
    }

    /// Set the output path; `-` means stdout
    pub fn with_output(mut self, output: impl AsRef<Path>) -> Self {
        let output = output.as_ref();
        self.output = if output.as_os_str() == STDOUT_PATH {
            OutputTarget::Stdout
        } else {
            OutputTarget::File(output.to_path_buf())
        };
        self
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }

    pub fn with_list_only(mut self, format: AnalysisFormat) -> Self {
        self.list_only = true;
        self.analysis_format = format;
        self
    }

    pub fn with_force_overwrite(mut self) -> Self {
        self.force_overwrite = true;
        self
    }

    pub fn with_transforms(mut self, transforms: TransformConfig) -> Self {
        self.transforms = transforms;
        self
    }

    /// Validate paths and transform arguments
    pub fn validate(&self) -> Result<()> {
        if self.channel.trim().is_empty() {
            return Err(PwlError::invalid_argument("channel", "(empty)"));
        }

        if let OutputTarget::File(path) = &self.output {
            if path == &self.input {
                return Err(PwlError::invalid_argument(
                    "output",
                    format!("{} is the input file", path.display()),
                ));
            }
        }

        self.transforms.validate()?;
        debug!("Validated configuration: {:?}", self);
        Ok(())
    }
}

/// `capture.csv` becomes `capture.txt` next to it
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension(DEFAULT_OUTPUT_EXTENSION)
}
