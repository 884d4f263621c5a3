//! Transform pipeline.
//!
//! Applies the requested transforms in a fixed order regardless of the order
//! in which they were asked for:
//!
//! 1. clamp
//! 2. remove DC
//! 3. offset
//! 4. multiply
//! 5. time shift
//! 6. cut
//! 7. repeat
//! 8. downsample
//! 9. compact

use crate::config::TransformConfig;
use crate::error::Result;
use crate::models::{PipelineReport, Sample};
use crate::transforms;
use tracing::{debug, info};

/// Runs a validated [`TransformConfig`] over sample sequences
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: TransformConfig,
}

impl Pipeline {
    /// Build a pipeline, rejecting invalid arguments up front
    pub fn new(config: TransformConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Apply every requested step, returning the samples and what each step did
    pub fn run(&self, samples: Vec<Sample>) -> Result<(Vec<Sample>, PipelineReport)> {
        let config = &self.config;
        let mut report = PipelineReport::default();
        let mut samples = samples;
        debug!("Running pipeline on {} samples", samples.len());
        if config.is_passthrough() {
            debug!("No value or timing transforms requested");
        }

        if config.clamp_low.is_some() || config.clamp_high.is_some() {
            let before = samples.len();
            samples = transforms::clamp(samples, config.clamp_low, config.clamp_high)?;
            info!(
                "Clamped values to [{}, {}]",
                bound_label(config.clamp_low),
                bound_label(config.clamp_high)
            );
            report.record("clamp", before, samples.len());
        }

        if config.remove_dc {
            let before = samples.len();
            let (without_dc, mean) = transforms::remove_dc(samples);
            samples = without_dc;
            info!("Removed DC component of {}", mean);
            report.dc_removed = Some(mean);
            report.record("remove dc", before, samples.len());
        }

        if let Some(delta) = config.offset {
            let before = samples.len();
            samples = transforms::offset(samples, delta);
            info!("Offset values by {}", delta);
            report.record("offset", before, samples.len());
        }

        if let Some(factor) = config.multiply {
            let before = samples.len();
            samples = transforms::multiply(samples, factor);
            info!("Multiplied values by {}", factor);
            report.record("multiply", before, samples.len());
        }

        if let Some(delta) = config.time_shift {
            let before = samples.len();
            samples = transforms::time_shift(samples, delta)?;
            info!(
                "Shifted time by {} s, {} points remain",
                delta,
                samples.len()
            );
            report.record("time shift", before, samples.len());
        }

        if let Some(threshold) = config.cut {
            let before = samples.len();
            samples = transforms::cut(samples, threshold)?;
            info!("Cut at {} s, {} points remain", threshold, samples.len());
            report.record("cut", before, samples.len());
        }

        if let Some(count) = config.repeat {
            let before = samples.len();
            samples = transforms::repeat(samples, count)?;
            info!("Repeated waveform {} more time(s)", count);
            report.record("repeat", before, samples.len());
        }

        if let Some(interval) = config.downsample {
            let before = samples.len();
            samples = transforms::downsample(samples, interval)?;
            info!(
                "Downsampled by {}, {} points remain",
                interval,
                samples.len()
            );
            report.record("downsample", before, samples.len());
        }

        if config.compact {
            let before = samples.len();
            samples = transforms::compact(samples);
            info!(
                "Removed {} redundant points",
                before - samples.len()
            );
            report.record("compact", before, samples.len());
        }

        Ok((samples, report))
    }
}

fn bound_label(bound: Option<f64>) -> String {
    bound.map_or_else(|| "-".to_string(), |b| b.to_string())
}
