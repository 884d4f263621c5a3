//! Application constants for the PWL converter
//!
//! Header marker labels, engineering-notation letters, output formatting
//! precision and CLI defaults.

// =============================================================================
// CSV Header Markers
// =============================================================================

/// Header labels that never name a channel (compared case-insensitively)
pub mod header_labels {
    /// Sequence-index column
    pub const X: &str = "x";

    /// Capture start time column
    pub const START: &str = "start";

    /// Column whose second-line value is the sample time step
    pub const INCREMENT: &str = "increment";
}

/// CSV field separator used by scope exports
pub const FIELD_SEPARATOR: char = ',';

// =============================================================================
// Engineering Notation
// =============================================================================

/// Leading letters that make a magnitude negative (left, minus, negative, down)
pub const NEGATIVE_PREFIXES: &[char] = &['l', 'm', 'n', 'd'];

/// Leading letters that make a magnitude positive (right, plus, up)
pub const POSITIVE_PREFIXES: &[char] = &['r', 'p', 'u'];

/// Trailing unit letters that are discarded before the SI suffix is read
pub const UNIT_LETTERS: &[char] = &['s', 'v', 'a', 'x'];

/// SI scale suffixes accepted by the parser
pub const SI_SUFFIXES: &[(char, f64)] = &[
    ('m', 1e-3),
    ('u', 1e-6),
    ('µ', 1e-6),
    ('μ', 1e-6),
    ('n', 1e-9),
    ('p', 1e-12),
    ('f', 1e-15),
];

/// SI prefixes used when displaying values on the console, largest first
pub const DISPLAY_PREFIXES: &[(f64, &str)] = &[
    (1e9, "G"),
    (1e6, "M"),
    (1e3, "k"),
    (1.0, ""),
    (1e-3, "m"),
    (1e-6, "µ"),
    (1e-9, "n"),
    (1e-12, "p"),
    (1e-15, "f"),
];

// =============================================================================
// PWL Output Formatting
// =============================================================================

/// Minimum fractional digits for the time column
pub const TIME_MIN_FRACTION_DIGITS: usize = 9;

/// Maximum fractional digits for both columns
pub const MAX_FRACTION_DIGITS: usize = 14;

/// Minimum fractional digits for the value column
pub const VALUE_MIN_FRACTION_DIGITS: usize = 0;

/// Record terminator expected by SPICE tools
pub const RECORD_TERMINATOR: &str = "\r\n";

/// Separator between time and value
pub const COLUMN_SEPARATOR: char = '\t';

// =============================================================================
// CLI Defaults
// =============================================================================

/// Channel processed when none is given
pub const DEFAULT_CHANNEL: &str = "CH1";

/// Extension given to the derived output file
pub const DEFAULT_OUTPUT_EXTENSION: &str = "txt";

/// Output path meaning "write to stdout"
pub const STDOUT_PATH: &str = "-";

/// Progress bar is only drawn for captures with at least this many lines
pub const PROGRESS_THRESHOLD_LINES: usize = 50_000;
