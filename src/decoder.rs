//! Sample decoding and capture loading.
//!
//! Data lines look like `<sequence>,<ch0>,<ch1>,...` where the sequence is
//! an integer sample counter. Sample time is `sequence * increment`.

use crate::error::{PwlError, Result};
use crate::header::{parse_header, split_fields};
use crate::models::{Channel, Sample, WaveformCapture};
use indicatif::ProgressBar;
use tracing::{debug, info, warn};

/// How many decoded lines between progress bar updates
const PROGRESS_STEP: usize = 4096;

/// Decode one data line for the channel stored at `column_index`.
///
/// `line_number` is the 1-based position of the line in the file and is
/// only used for error reporting.
pub fn decode_sample(
    line: &str,
    line_number: usize,
    increment: f64,
    column_index: usize,
) -> Result<Sample> {
    let fields = split_fields(line);

    let sequence = fields
        .first()
        .and_then(|field| field.parse::<u64>().ok())
        .ok_or_else(|| PwlError::SequenceNumberInvalid {
            line_number,
            line: line.to_string(),
        })?;

    let value_field = fields
        .get(column_index)
        .ok_or_else(|| PwlError::MissingField {
            line_number,
            column_index,
            line: line.to_string(),
        })?;

    let value = value_field
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| PwlError::InvalidValue {
            line_number,
            value: value_field.to_string(),
            line: line.to_string(),
        })?;

    Ok(Sample {
        time: sequence as f64 * increment,
        value,
    })
}

/// Find a channel by label, exact match first then ignoring case
pub fn select_channel<'a>(channels: &'a [Channel], label: &str) -> Result<&'a Channel> {
    channels
        .iter()
        .find(|c| c.name == label)
        .or_else(|| {
            let found = channels
                .iter()
                .find(|c| c.name.to_lowercase() == label.to_lowercase());
            if let Some(channel) = found {
                debug!(
                    "Channel {} matched {} ignoring case",
                    label, channel.name
                );
            }
            found
        })
        .ok_or_else(|| PwlError::ChannelNotFound {
            label: label.to_string(),
        })
}

/// Parse a whole capture file held in memory.
///
/// With `list_only` set, only the header is decoded and the returned capture
/// has no channel and no samples.
pub fn parse_capture(raw: &[u8], channel_label: &str, list_only: bool) -> Result<WaveformCapture> {
    parse_capture_with_progress(raw, channel_label, list_only, None)
}

/// Same as [`parse_capture`], advancing `progress` once per data line
pub fn parse_capture_with_progress(
    raw: &[u8],
    channel_label: &str,
    list_only: bool,
    progress: Option<&ProgressBar>,
) -> Result<WaveformCapture> {
    let text = std::str::from_utf8(raw).map_err(|_| PwlError::InvalidFileFormat)?;
    let mut lines = text.lines().enumerate();

    let (line1, line2) = match (lines.next(), lines.next()) {
        (Some((_, first)), Some((_, second))) => (first, second),
        _ => return Err(PwlError::InsufficientLines),
    };

    let header = parse_header(line1, line2)?;
    info!(
        "Header lists {} channel(s): {}",
        header.channels.len(),
        header.channel_names().join(", ")
    );

    if list_only {
        return Ok(WaveformCapture {
            header,
            channel: None,
            samples: Vec::new(),
        });
    }

    let channel = select_channel(&header.channels, channel_label)?.clone();
    debug!(
        "Decoding channel {} from column {}",
        channel.name, channel.column_index
    );

    let mut samples = Vec::new();
    let mut decoded = 0usize;
    for (index, line) in lines {
        if line.trim().is_empty() {
            continue;
        }

        let sample = decode_sample(line, index + 1, header.increment, channel.column_index)?;
        if let Some(previous) = samples.last().map(|s: &Sample| s.time) {
            if sample.time < previous {
                warn!(
                    "Sequence goes backwards at line {} ({} s after {} s)",
                    index + 1,
                    sample.time,
                    previous
                );
            }
        }
        samples.push(sample);

        decoded += 1;
        if let Some(pb) = progress {
            if decoded % PROGRESS_STEP == 0 {
                pb.set_position(decoded as u64);
            }
        }
    }

    if let Some(pb) = progress {
        pb.set_position(decoded as u64);
    }

    if samples.is_empty() {
        return Err(PwlError::NoSamples);
    }

    info!("Decoded {} samples from {}", samples.len(), channel.name);

    Ok(WaveformCapture {
        header,
        channel: Some(channel),
        samples,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAPTURE: &str = "X,CH1,CH2,Start,Increment,\r\n\
                           Sequence,Volt,Volt,0.000000e+00,1.000000e-03\r\n\
                           0,1.0,2.0,\r\n\
                           1,1.0,2.0,\r\n\
                           \r\n\
                           2,1.5,2.0,\r\n";

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-15,
            "{} != {}",
            actual,
            expected
        );
    }

    #[test]
    fn test_decode_sample() {
        let sample = decode_sample("5,0.25", 3, 1e-6, 1).unwrap();
        assert_close(sample.time, 5e-6);
        assert_eq!(sample.value, 0.25);
    }

    #[test]
    fn test_decode_scientific_value() {
        let sample = decode_sample("10,-1.20e-01,3.2e+00", 3, 2e-6, 2).unwrap();
        assert_close(sample.time, 20e-6);
        assert_eq!(sample.value, 3.2);
    }

    #[test]
    fn test_decode_bad_sequence() {
        match decode_sample("-1,0.25", 7, 1e-6, 1) {
            Err(PwlError::SequenceNumberInvalid { line_number, line }) => {
                assert_eq!(line_number, 7);
                assert_eq!(line, "-1,0.25");
            }
            other => panic!("Expected SequenceNumberInvalid, got {:?}", other),
        }
        assert!(matches!(
            decode_sample("1.5,0.25", 7, 1e-6, 1),
            Err(PwlError::SequenceNumberInvalid { .. })
        ));
    }

    #[test]
    fn test_decode_bad_value() {
        match decode_sample("3,****", 9, 1e-6, 1) {
            Err(PwlError::InvalidValue {
                line_number, value, ..
            }) => {
                assert_eq!(line_number, 9);
                assert_eq!(value, "****");
            }
            other => panic!("Expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_non_finite_value() {
        for text in ["NaN", "inf", "-infinity"] {
            let line = format!("1,{}", text);
            match decode_sample(&line, 5, 1e-6, 1) {
                Err(PwlError::InvalidValue { value, .. }) => assert_eq!(value, text),
                other => panic!("Expected InvalidValue for {}, got {:?}", text, other),
            }
        }
    }

    #[test]
    fn test_decode_short_line() {
        assert!(matches!(
            decode_sample("3,0.5", 4, 1e-6, 2),
            Err(PwlError::MissingField {
                line_number: 4,
                column_index: 2,
                ..
            })
        ));
    }

    fn channels() -> Vec<Channel> {
        vec![
            Channel {
                name: "CH1".to_string(),
                column_index: 1,
                unit: None,
            },
            Channel {
                name: "ch2".to_string(),
                column_index: 2,
                unit: None,
            },
        ]
    }

    #[test]
    fn test_select_channel_exact_and_fallback() {
        let channels = channels();
        assert_eq!(select_channel(&channels, "CH1").unwrap().column_index, 1);
        assert_eq!(select_channel(&channels, "ch1").unwrap().column_index, 1);
        assert_eq!(select_channel(&channels, "CH2").unwrap().column_index, 2);
    }

    #[test]
    fn test_select_channel_prefers_exact_case() {
        let mut channels = channels();
        channels.push(Channel {
            name: "CH2".to_string(),
            column_index: 3,
            unit: None,
        });
        assert_eq!(select_channel(&channels, "CH2").unwrap().column_index, 3);
        assert_eq!(select_channel(&channels, "ch2").unwrap().column_index, 2);
    }

    #[test]
    fn test_select_channel_missing() {
        match select_channel(&channels(), "CH4") {
            Err(PwlError::ChannelNotFound { label }) => assert_eq!(label, "CH4"),
            other => panic!("Expected ChannelNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_capture() {
        let capture = parse_capture(CAPTURE.as_bytes(), "CH1", false).unwrap();

        assert_eq!(capture.channel.as_ref().unwrap().name, "CH1");
        assert_eq!(capture.samples.len(), 3);
        assert_close(capture.samples[1].time, 1e-3);
        assert_close(capture.samples[2].time, 2e-3);
        assert_eq!(capture.samples[2].value, 1.5);
    }

    #[test]
    fn test_parse_capture_list_only() {
        let capture = parse_capture(CAPTURE.as_bytes(), "missing", true).unwrap();
        assert!(capture.channel.is_none());
        assert!(capture.samples.is_empty());
        assert_eq!(capture.header.channel_names(), vec!["CH1", "CH2"]);
    }

    #[test]
    fn test_parse_capture_reports_file_line_numbers() {
        let text = "X,CH1,Increment\nSequence,Volt,1e-3\n0,1.0\n\n2,oops\n";
        match parse_capture(text.as_bytes(), "CH1", false) {
            Err(PwlError::InvalidValue { line_number, .. }) => assert_eq!(line_number, 5),
            other => panic!("Expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_capture_errors() {
        assert!(matches!(
            parse_capture(b"X,CH1,Increment", "CH1", false),
            Err(PwlError::InsufficientLines)
        ));
        assert!(matches!(
            parse_capture(b"X,CH1,Increment\nSequence,Volt,1e-3\n", "CH1", false),
            Err(PwlError::NoSamples)
        ));
        assert!(matches!(
            parse_capture(&[0xff, 0xfe, 0x00], "CH1", false),
            Err(PwlError::InvalidFileFormat)
        ));
        assert!(matches!(
            parse_capture(CAPTURE.as_bytes(), "CH3", false),
            Err(PwlError::ChannelNotFound { .. })
        ));
    }

    #[test]
    fn test_progress_bar_tracks_decoded_lines() {
        let pb = ProgressBar::hidden();
        parse_capture_with_progress(CAPTURE.as_bytes(), "CH2", false, Some(&pb)).unwrap();
        assert_eq!(pb.position(), 3);
    }
}
