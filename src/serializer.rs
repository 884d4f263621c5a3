//! PWL record formatting.
//!
//! Records are `<time>\t<value>` in plain fixed-point decimal with `.` as the
//! decimal point, one per line, CRLF terminated. Output never depends on the
//! host locale.

use crate::constants::{
    COLUMN_SEPARATOR, MAX_FRACTION_DIGITS, RECORD_TERMINATOR, TIME_MIN_FRACTION_DIGITS,
    VALUE_MIN_FRACTION_DIGITS,
};
use crate::models::Sample;

/// Fixed-point text with between `min_digits` and `max_digits` fractional digits
pub fn format_fixed(value: f64, min_digits: usize, max_digits: usize) -> String {
    let mut text = format!("{:.*}", max_digits, value);

    if let Some(point) = text.find('.') {
        let keep = point + 1 + min_digits;
        while text.len() > keep && text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }

    if text.starts_with('-') && text[1..].chars().all(|c| c == '0' || c == '.') {
        text.remove(0);
    }

    text
}

/// Format one sample as `<time>\t<value>` without a terminator
pub fn format_sample(sample: &Sample) -> String {
    format!(
        "{}{}{}",
        format_fixed(sample.time, TIME_MIN_FRACTION_DIGITS, MAX_FRACTION_DIGITS),
        COLUMN_SEPARATOR,
        format_fixed(sample.value, VALUE_MIN_FRACTION_DIGITS, MAX_FRACTION_DIGITS)
    )
}

/// Serialize every sample, each record terminated by CRLF
pub fn serialize_samples(samples: &[Sample]) -> String {
    let mut out = String::with_capacity(samples.len() * 40);
    for sample in samples {
        out.push_str(&format_sample(sample));
        out.push_str(RECORD_TERMINATOR);
    }
    out
}
