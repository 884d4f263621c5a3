//! Waveform transforms.
//!
//! Every transform takes ownership of a sample sequence and returns a new one.
//! Transforms that could leave nothing behind fail with
//! [`PwlError::OperationRemovedEveryPoint`](crate::error::PwlError) instead of
//! returning an empty sequence.

pub mod compaction;
pub mod timing;
pub mod values;

pub use compaction::compact;
pub use timing::{cut, downsample, repeat, time_shift};
pub use values::{clamp, mean_value, multiply, offset, remove_dc};
