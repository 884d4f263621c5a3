//! Core data structures for capture conversion.
//!
//! Defines samples, header channels, the decoded capture and the report
//! produced by the transform pipeline.

use serde::{Deserialize, Serialize};

/// One `(time, value)` point of a waveform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Seconds since capture start
    pub time: f64,
    /// Reading in the channel's physical unit
    pub value: f64,
}

impl Sample {
    pub fn new(time: f64, value: f64) -> Self {
        Self { time, value }
    }
}

/// A data column announced by the first header line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub name: String,
    pub column_index: usize,
    pub unit: Option<String>,
}

/// Everything the two header lines describe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderInfo {
    pub channels: Vec<Channel>,
    /// Seconds between consecutive samples
    pub increment: f64,
}

impl HeaderInfo {
    /// Channel names in column order
    pub fn channel_names(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.name.as_str()).collect()
    }
}

/// A decoded capture for one selected channel
#[derive(Debug, Clone)]
pub struct WaveformCapture {
    pub header: HeaderInfo,
    /// `None` when only the header was analysed
    pub channel: Option<Channel>,
    pub samples: Vec<Sample>,
}

impl WaveformCapture {
    /// Time of the last sample, if any
    pub fn duration(&self) -> Option<f64> {
        self.samples.last().map(|s| s.time)
    }
}

/// What a single pipeline step did
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    pub operation: &'static str,
    pub points_before: usize,
    pub points_after: usize,
}

/// Summary of one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineReport {
    pub steps: Vec<StepReport>,
    /// Mean value subtracted by DC removal
    pub dc_removed: Option<f64>,
}

impl PipelineReport {
    pub(crate) fn record(&mut self, operation: &'static str, before: usize, after: usize) {
        self.steps.push(StepReport {
            operation,
            points_before: before,
            points_after: after,
        });
    }

    /// Points removed by the compaction step, if it ran
    pub fn redundant_points_removed(&self) -> Option<usize> {
        self.steps
            .iter()
            .find(|s| s.operation == "compact")
            .map(|s| s.points_before - s.points_after)
    }
}
