//! Transforms that only touch sample values.

use crate::error::{PwlError, Result};
use crate::models::Sample;

/// Limit values to `[low, high]`; either bound may be absent
pub fn clamp(samples: Vec<Sample>, low: Option<f64>, high: Option<f64>) -> Result<Vec<Sample>> {
    if let (Some(low), Some(high)) = (low, high) {
        if high <= low {
            return Err(PwlError::InvalidClampBounds { low, high });
        }
    }

    Ok(samples
        .into_iter()
        .map(|mut sample| {
            if let Some(low) = low {
                if sample.value < low {
                    sample.value = low;
                }
            }
            if let Some(high) = high {
                if sample.value > high {
                    sample.value = high;
                }
            }
            sample
        })
        .collect())
}

/// Arithmetic mean of all values, `0.0` for an empty sequence
pub fn mean_value(samples: &[Sample]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().map(|s| s.value).sum::<f64>() / samples.len() as f64
}

/// Subtract the mean value from every sample, returning the removed mean
pub fn remove_dc(samples: Vec<Sample>) -> (Vec<Sample>, f64) {
    let mean = mean_value(&samples);
    (offset(samples, -mean), mean)
}

pub fn offset(samples: Vec<Sample>, delta: f64) -> Vec<Sample> {
    samples
        .into_iter()
        .map(|s| Sample::new(s.time, s.value + delta))
        .collect()
}

pub fn multiply(samples: Vec<Sample>, factor: f64) -> Vec<Sample> {
    samples
        .into_iter()
        .map(|s| Sample::new(s.time, s.value * factor))
        .collect()
}
