//! Conversion engine.
//!
//! Orchestrates one run: read the capture into memory, decode the selected
//! channel, apply the transform pipeline, serialize the PWL records and hand
//! them to the writer. Any error aborts before the output is touched.

use crate::config::{ConversionConfig, OutputTarget};
use crate::constants::PROGRESS_THRESHOLD_LINES;
use crate::decoder::parse_capture_with_progress;
use crate::error::{PwlError, Result};
use crate::models::{Channel, HeaderInfo, PipelineReport};
use crate::pipeline::Pipeline;
use crate::serializer::serialize_samples;
use crate::writer::write_output;

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;
use tracing::{debug, info};

/// Statistics for a finished conversion
#[derive(Debug, Clone)]
pub struct ConversionStats {
    pub channel: Channel,
    pub increment: f64,
    pub points_read: usize,
    pub points_written: usize,
    /// Time of the last written point
    pub duration: f64,
    pub report: PipelineReport,
    pub output: OutputTarget,
    pub processing_time_ms: u128,
}

/// Result of a run
#[derive(Debug, Clone)]
pub enum ConversionOutcome {
    /// Header analysed, nothing written
    Analysed(HeaderInfo),
    Converted(ConversionStats),
}

/// Runs a validated [`ConversionConfig`]
#[derive(Debug)]
pub struct CaptureProcessor {
    config: ConversionConfig,
    pipeline: Pipeline,
    show_progress: bool,
}

impl CaptureProcessor {
    /// Create a processor, validating the configuration first
    pub fn new(config: ConversionConfig) -> Result<Self> {
        config.validate()?;
        let pipeline = Pipeline::new(config.transforms.clone())?;
        Ok(Self {
            config,
            pipeline,
            show_progress: false,
        })
    }

    /// Draw a progress bar while decoding large captures
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// Main processing entry point
    pub fn process(&self) -> Result<ConversionOutcome> {
        let start_time = Instant::now();
        debug!("Reading {}", self.config.input.display());
        let raw = std::fs::read(&self.config.input)?;
        info!("Read {} bytes from {}", raw.len(), self.config.input.display());

        if self.config.list_only {
            let capture = parse_capture_with_progress(&raw, &self.config.channel, true, None)?;
            return Ok(ConversionOutcome::Analysed(capture.header));
        }

        let (content, mut stats) = self.convert_bytes(&raw)?;
        write_output(&self.config.output, &content, self.config.force_overwrite)?;

        stats.processing_time_ms = start_time.elapsed().as_millis();
        Ok(ConversionOutcome::Converted(stats))
    }

    /// Decode, transform and serialize an in-memory capture
    pub fn convert_bytes(&self, raw: &[u8]) -> Result<(String, ConversionStats)> {
        let start_time = Instant::now();

        let progress = self.create_decode_progress(raw);
        let capture = parse_capture_with_progress(
            raw,
            &self.config.channel,
            false,
            progress.as_ref(),
        );
        if let Some(pb) = &progress {
            pb.finish_and_clear();
        }
        let capture = capture?;

        if let Some(duration) = capture.duration() {
            debug!("Capture spans {} s", duration);
        }
        let channel = capture.channel.ok_or_else(|| PwlError::ChannelNotFound {
            label: self.config.channel.clone(),
        })?;
        let points_read = capture.samples.len();

        let (samples, report) = self.pipeline.run(capture.samples)?;
        let content = serialize_samples(&samples);
        debug!(
            "Serialized {} points into {} bytes",
            samples.len(),
            content.len()
        );

        let stats = ConversionStats {
            channel,
            increment: capture.header.increment,
            points_read,
            points_written: samples.len(),
            duration: samples.last().map_or(0.0, |s| s.time),
            report,
            output: self.config.output.clone(),
            processing_time_ms: start_time.elapsed().as_millis(),
        };

        Ok((content, stats))
    }

    fn create_decode_progress(&self, raw: &[u8]) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let lines = raw.iter().filter(|&&b| b == b'\n').count();
        if lines < PROGRESS_THRESHOLD_LINES {
            return None;
        }

        Some(create_progress_bar(
            lines.saturating_sub(2) as u64,
            "Decoding samples",
        ))
    }
}

/// Progress bar in the shared CLI style
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} [{per_sec}] ETA: {eta}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb.set_message(message.to_string());
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TransformConfig;
    use std::fs;
    use tempfile::TempDir;

    const CAPTURE: &str = "X,CH1,CH2,Start,Increment,\n\
                           Sequence,Volt,Volt,0,1e-3\n\
                           0,1.0,2.0,\n\
                           1,1.0,2.0,\n\
                           2,1.0,2.0,\n\
                           3,1.5,2.0,\n";

    #[test]
    fn test_convert_bytes_compacts_by_default() {
        let processor = CaptureProcessor::new(ConversionConfig::new("scope.csv")).unwrap();
        let (content, stats) = processor.convert_bytes(CAPTURE.as_bytes()).unwrap();

        assert_eq!(stats.points_read, 4);
        assert_eq!(stats.points_written, 3);
        assert_eq!(stats.channel.name, "CH1");
        assert_eq!(stats.report.redundant_points_removed(), Some(1));
        assert_eq!(
            content,
            "0.000000000\t1\r\n0.002000000\t1\r\n0.003000000\t1.5\r\n"
        );
    }

    #[test]
    fn test_convert_bytes_other_channel_keep_all() {
        let config = ConversionConfig::new("scope.csv")
            .with_channel("ch2")
            .with_transforms(TransformConfig::default().keep_all().with_multiply(0.5));
        let processor = CaptureProcessor::new(config).unwrap();
        let (content, stats) = processor.convert_bytes(CAPTURE.as_bytes()).unwrap();

        assert_eq!(stats.channel.name, "CH2");
        assert_eq!(stats.points_written, 4);
        assert!(content.lines().all(|line| line.ends_with("\t1")));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ConversionConfig::new("scope.csv")
            .with_transforms(TransformConfig::default().with_cut(-1.0));
        assert!(matches!(
            CaptureProcessor::new(config),
            Err(PwlError::InvalidCutThreshold { .. })
        ));
    }

    #[test]
    fn test_process_writes_output_file() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("scope.csv");
        fs::write(&input, CAPTURE).unwrap();

        let processor = CaptureProcessor::new(ConversionConfig::new(&input)).unwrap();
        let outcome = processor.process().unwrap();

        let output = temp_dir.path().join("scope.txt");
        match outcome {
            ConversionOutcome::Converted(stats) => {
                assert_eq!(stats.output, OutputTarget::File(output.clone()));
            }
            other => panic!("Expected Converted, got {:?}", other),
        }
        assert_eq!(fs::read_to_string(output).unwrap().lines().count(), 3);
    }

    #[test]
    fn test_process_analyse_only() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("scope.csv");
        fs::write(&input, CAPTURE).unwrap();

        let config = ConversionConfig::new(&input).with_list_only(Default::default());
        let outcome = CaptureProcessor::new(config).unwrap().process().unwrap();

        match outcome {
            ConversionOutcome::Analysed(header) => {
                assert_eq!(header.channel_names(), vec!["CH1", "CH2"])
            }
            other => panic!("Expected Analysed, got {:?}", other),
        }
        assert!(!temp_dir.path().join("scope.txt").exists());
    }

    #[test]
    fn test_non_finite_sample_rejected() {
        let processor = CaptureProcessor::new(ConversionConfig::new("scope.csv")).unwrap();
        let result =
            processor.convert_bytes(b"X,CH1,Increment\nSequence,Volt,1e-3\n0,1.0\n1,NaN\n2,inf\n");

        match result {
            Err(PwlError::InvalidValue { line_number, value, .. }) => {
                assert_eq!(line_number, 4);
                assert_eq!(value, "NaN");
            }
            other => panic!("Expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_failed_decode_leaves_no_output() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("broken.csv");
        fs::write(&input, "X,CH1,Increment\nSequence,Volt,1e-3\n0,1.0\n1,bad\n").unwrap();

        let result = CaptureProcessor::new(ConversionConfig::new(&input))
            .unwrap()
            .process();

        assert!(matches!(result, Err(PwlError::InvalidValue { .. })));
        assert!(!temp_dir.path().join("broken.txt").exists());
    }
}
