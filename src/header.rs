//! Scope CSV header parsing.
//!
//! The first line labels every column (`X`, channel names, `Start`,
//! `Increment`); the second line carries units for the channel columns and
//! the numeric sample time step under `Increment`.

use crate::constants::{FIELD_SEPARATOR, header_labels};
use crate::error::{PwlError, Result};
use crate::models::{Channel, HeaderInfo};
use tracing::debug;

/// Role of a first-line column
#[derive(Debug, Clone, PartialEq, Eq)]
enum ColumnRole {
    Marker,
    Increment,
    Channel(String),
}

impl ColumnRole {
    fn classify(label: &str) -> Self {
        let lowered = label.to_lowercase();
        match lowered.as_str() {
            "" | header_labels::X | header_labels::START => ColumnRole::Marker,
            header_labels::INCREMENT => ColumnRole::Increment,
            _ => ColumnRole::Channel(label.to_string()),
        }
    }
}

/// Split a CSV line into trimmed fields, keeping empty fields in place
pub(crate) fn split_fields(line: &str) -> Vec<&str> {
    line.split(FIELD_SEPARATOR).map(str::trim).collect()
}

/// Decode the two header lines into channels and the time increment
pub fn parse_header(line1: &str, line2: &str) -> Result<HeaderInfo> {
    let mut builder = HeaderBuilder::new();

    for (index, label) in split_fields(line1).into_iter().enumerate() {
        builder.add_column(index, label);
    }

    let header = builder.build(&split_fields(line2))?;

    for channel in &header.channels {
        debug!(
            "Found channel {} at column {} (unit: {})",
            channel.name,
            channel.column_index,
            channel.unit.as_deref().unwrap_or("none")
        );
    }
    debug!("Sample increment: {} s", header.increment);

    Ok(header)
}

/// Collects column roles from the first header line
struct HeaderBuilder {
    channels: Vec<Channel>,
    increment_index: Option<usize>,
}

impl HeaderBuilder {
    fn new() -> Self {
        Self {
            channels: Vec::new(),
            increment_index: None,
        }
    }

    fn add_column(&mut self, index: usize, label: &str) {
        match ColumnRole::classify(label) {
            ColumnRole::Marker => {}
            ColumnRole::Increment => self.increment_index = Some(index),
            ColumnRole::Channel(name) => self.channels.push(Channel {
                name,
                column_index: index,
                unit: None,
            }),
        }
    }

    fn build(self, second_line: &[&str]) -> Result<HeaderInfo> {
        if self.channels.is_empty() {
            return Err(PwlError::NoChannelsDetected);
        }

        let increment_index = self.increment_index.ok_or(PwlError::IncrementNotFound)?;
        let increment = parse_increment(second_line.get(increment_index).copied())?;

        let channels = self
            .channels
            .into_iter()
            .map(|channel| {
                let unit = second_line
                    .get(channel.column_index)
                    .filter(|unit| !unit.is_empty())
                    .map(|unit| unit.to_string());
                Channel { unit, ..channel }
            })
            .collect();

        Ok(HeaderInfo {
            channels,
            increment,
        })
    }
}

/// The increment must be a finite, strictly positive number of seconds
fn parse_increment(field: Option<&str>) -> Result<f64> {
    let text = field.unwrap_or_default();
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
        _ => Err(PwlError::InvalidIncrementValue {
            value: text.to_string(),
        }),
    }
}
