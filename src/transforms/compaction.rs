//! Removal of redundant points inside flat runs.
//!
//! A PWL source interpolates linearly between points, so in a run of equal
//! values only the two ends of the run are needed. Every interior sample whose
//! value equals both of its original neighbours is dropped.

use crate::models::Sample;

pub fn compact(samples: Vec<Sample>) -> Vec<Sample> {
    if samples.len() < 3 {
        return samples;
    }

    let last = samples.len() - 1;
    let redundant: Vec<bool> = (0..samples.len())
        .map(|i| {
            i != 0
                && i != last
                && samples[i - 1].value == samples[i].value
                && samples[i].value == samples[i + 1].value
        })
        .collect();

    samples
        .into_iter()
        .zip(redundant)
        .filter(|(_, redundant)| !redundant)
        .map(|(sample, _)| sample)
        .collect()
}
