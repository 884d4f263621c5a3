//! Oscilloscope CSV to SPICE PWL conversion
//!
//! A Rust library for turning oscilloscope CSV exports into piecewise-linear
//! (PWL) source files that SPICE simulators can read.
//!
//! This library provides tools for:
//! - Parsing the two-line scope CSV header into channels and a time step
//! - Decoding a selected channel into `(time, value)` samples
//! - Shaping the waveform (clamp, DC removal, offset, scaling, time shift,
//!   cut, repeat, downsample) in a fixed order
//! - Dropping redundant points inside flat runs
//! - Writing locale-independent, CRLF-terminated PWL records atomically
//!
//! ```
//! use rigol_pwl::{Pipeline, TransformConfig, parse_capture, serialize_samples};
//!
//! let csv = "X,CH1,Start,Increment\nSequence,Volt,0,1e-3\n0,0.0\n1,0.0\n2,0.0\n3,1.0\n";
//! let capture = parse_capture(csv.as_bytes(), "CH1", false).unwrap();
//!
//! let pipeline = Pipeline::new(TransformConfig::default().with_multiply(2.0)).unwrap();
//! let (samples, _report) = pipeline.run(capture.samples).unwrap();
//!
//! assert_eq!(samples.len(), 3);
//! assert!(serialize_samples(&samples).ends_with("0.003000000\t2\r\n"));
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod decoder;
pub mod error;
pub mod header;
pub mod models;
pub mod notation;
pub mod pipeline;
pub mod processor;
pub mod serializer;
pub mod transforms;
pub mod writer;

// Re-export commonly used types
pub use config::{AnalysisFormat, ConversionConfig, OutputTarget, TransformConfig};
pub use decoder::{decode_sample, parse_capture, parse_capture_with_progress, select_channel};
pub use error::{PwlError, Result};
pub use header::parse_header;
pub use models::{Channel, HeaderInfo, PipelineReport, Sample, WaveformCapture};
pub use notation::{format_engineering, parse_engineering};
pub use pipeline::Pipeline;
pub use processor::{CaptureProcessor, ConversionOutcome, ConversionStats};
pub use serializer::{format_sample, serialize_samples};
pub use writer::write_output;
