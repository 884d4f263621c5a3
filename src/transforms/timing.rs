//! Transforms that move, trim, repeat or thin samples along the time axis.

use crate::error::{PwlError, Result};
use crate::models::Sample;
use tracing::warn;

/// Move every sample by `delta` seconds, dropping samples that end up before zero
pub fn time_shift(samples: Vec<Sample>, delta: f64) -> Result<Vec<Sample>> {
    let shifted: Vec<Sample> = samples
        .into_iter()
        .map(|s| Sample::new(s.time + delta, s.value))
        .filter(|s| s.time >= 0.0)
        .collect();

    if shifted.is_empty() {
        return Err(PwlError::removed_every_point("time shift"));
    }
    Ok(shifted)
}

/// Keep only samples strictly before `threshold` seconds
pub fn cut(samples: Vec<Sample>, threshold: f64) -> Result<Vec<Sample>> {
    if threshold.is_nan() || threshold <= 0.0 {
        return Err(PwlError::InvalidCutThreshold { threshold });
    }

    let kept: Vec<Sample> = samples.into_iter().filter(|s| s.time < threshold).collect();

    if kept.is_empty() {
        return Err(PwlError::removed_every_point("cut"));
    }
    Ok(kept)
}

/// Append `count` extra copies of the waveform end to end.
///
/// The step between the first two samples is used as the gap between the
/// last sample of one copy and the first sample of the next.
pub fn repeat(samples: Vec<Sample>, count: usize) -> Result<Vec<Sample>> {
    if samples.len() < 2 {
        return Err(PwlError::MustHaveAtLeastTwoPointsToRepeat);
    }

    let first = samples[0].time;
    let last = samples[samples.len() - 1].time;
    let increment = samples[1].time - first;
    if increment <= 0.0 {
        warn!(
            "First two samples are {} s apart, repeated copies will touch",
            increment
        );
    }
    let period = (last - first) + increment;

    let mut repeated = Vec::with_capacity(samples.len() * (count + 1));
    repeated.extend_from_slice(&samples);
    for copy in 1..=count {
        let shift = copy as f64 * period;
        repeated.extend(samples.iter().map(|s| Sample::new(s.time + shift, s.value)));
    }

    Ok(repeated)
}

/// Keep one sample out of every `interval`, starting with the `interval`-th
pub fn downsample(samples: Vec<Sample>, interval: usize) -> Result<Vec<Sample>> {
    if interval <= 1 {
        return Err(PwlError::InvalidDownsampleInterval { interval });
    }

    let kept: Vec<Sample> = samples
        .into_iter()
        .enumerate()
        .filter(|(i, _)| (i + 1) % interval == 0)
        .map(|(_, s)| s)
        .collect();

    if kept.is_empty() {
        return Err(PwlError::removed_every_point("downsample"));
    }
    Ok(kept)
}
