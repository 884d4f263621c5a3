//! Error handling for capture conversion.
//!
//! Covers malformed headers, per-line decode failures, channel selection,
//! invalid transform arguments and transforms that leave nothing behind.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PwlError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid file format: input is not valid UTF-8 text")]
    InvalidFileFormat,

    #[error("No header or values found")]
    InsufficientLines,

    #[error("No channels found")]
    NoChannelsDetected,

    #[error("Time increment not found")]
    IncrementNotFound,

    #[error("Time increment value is not valid: \"{value}\"")]
    InvalidIncrementValue { value: String },

    #[error("Specified channel \"{label}\" not found in file")]
    ChannelNotFound { label: String },

    #[error("Couldn't find sequence number in line {line_number}: {line}")]
    SequenceNumberInvalid { line_number: usize, line: String },

    #[error("Line {line_number} has no field at column {column_index}: {line}")]
    MissingField {
        line_number: usize,
        column_index: usize,
        line: String,
    },

    #[error("Invalid decimal number \"{value}\" in line {line_number}: {line}")]
    InvalidValue {
        line_number: usize,
        value: String,
        line: String,
    },

    #[error("No samples found after the header")]
    NoSamples,

    #[error("Invalid value for {argument}: {value}")]
    InvalidArgument { argument: String, value: String },

    #[error("Clamp upper bound {high} must be greater than lower bound {low}")]
    InvalidClampBounds { low: f64, high: f64 },

    #[error("Cut time must be greater than zero, got {threshold}")]
    InvalidCutThreshold { threshold: f64 },

    #[error("Repeat count must be at least 1, got {count}")]
    InvalidRepeatCount { count: usize },

    #[error("Downsample interval must be greater than 1, got {interval}")]
    InvalidDownsampleInterval { interval: usize },

    #[error("Operation \"{operation}\" removed every point")]
    OperationRemovedEveryPoint { operation: String },

    #[error("Must have at least two points to repeat")]
    MustHaveAtLeastTwoPointsToRepeat,

    #[error("Output file already exists: {path} (use --force to overwrite)")]
    OutputExists { path: PathBuf },
}

impl PwlError {
    pub(crate) fn removed_every_point(operation: impl Into<String>) -> Self {
        Self::OperationRemovedEveryPoint {
            operation: operation.into(),
        }
    }

    pub(crate) fn invalid_argument(argument: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidArgument {
            argument: argument.into(),
            value: value.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PwlError>;
