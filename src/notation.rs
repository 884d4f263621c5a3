//! Engineering-notation parsing and display.
//!
//! Command-line magnitudes such as `r1.5ms`, `l20u` or `10mv` are turned into
//! plain `f64` values. The grammar is:
//!
//! ```text
//! [sign letter] <decimal> [SI suffix] [unit letter]
//! ```
//!
//! * sign letters: `l`, `m`, `n`, `d` negate; `r`, `p`, `u` keep the sign
//! * SI suffixes: `m` 1e-3, `u`/`µ` 1e-6, `n` 1e-9, `p` 1e-12, `f` 1e-15
//! * unit letters `s`, `v`, `a`, `x` are discarded without validation
//!
//! Matching is case-insensitive, so `M` means milli, never mega.

use crate::constants::{
    DISPLAY_PREFIXES, NEGATIVE_PREFIXES, POSITIVE_PREFIXES, SI_SUFFIXES, UNIT_LETTERS,
};

/// Parse an engineering-notation magnitude.
///
/// Returns `None` when the numeric core is not a finite decimal number.
pub fn parse_engineering(input: &str) -> Option<f64> {
    let lowered = input.trim().to_lowercase();
    let mut text = lowered.as_str();

    let mut sign = 1.0;
    if let Some(first) = text.chars().next() {
        if NEGATIVE_PREFIXES.contains(&first) {
            sign = -1.0;
            text = &text[first.len_utf8()..];
        } else if POSITIVE_PREFIXES.contains(&first) {
            text = &text[first.len_utf8()..];
        }
    }

    if let Some(last) = text.chars().last() {
        if UNIT_LETTERS.contains(&last) {
            text = &text[..text.len() - last.len_utf8()];
        }
    }

    let mut multiplier = 1.0;
    if let Some(last) = text.chars().last() {
        if let Some((_, scale)) = SI_SUFFIXES.iter().find(|(suffix, _)| *suffix == last) {
            multiplier = *scale;
            text = &text[..text.len() - last.len_utf8()];
        }
    }

    let base = text.trim().parse::<f64>().ok().filter(|v| v.is_finite())?;
    Some(sign * base * multiplier)
}

/// Render a value with an SI prefix for console messages, e.g. `2.5 ms`.
///
/// Uses at most three fractional digits and always `.` as the decimal point.
pub fn format_engineering(value: f64, unit: &str) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{} {}", value.abs(), unit).trim_end().to_string();
    }

    let magnitude = value.abs();
    let (scale, prefix) = DISPLAY_PREFIXES
        .iter()
        .find(|(scale, _)| round_millis(magnitude / scale) >= 1.0)
        .copied()
        .unwrap_or((1e-15, "f"));

    let scaled = value / scale;
    let mut number = format!("{:.3}", scaled);
    if number.contains('.') {
        number = number.trim_end_matches('0').trim_end_matches('.').to_string();
    }

    format!("{} {}{}", number, prefix, unit).trim_end().to_string()
}

fn round_millis(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
