//! Command-line interface components.

use crate::config::{AnalysisFormat, ConversionConfig, OutputTarget, TransformConfig};
use crate::constants::{DEFAULT_CHANNEL, STDOUT_PATH};
use crate::models::HeaderInfo;
use crate::notation::{format_engineering, parse_engineering};
use crate::processor::ConversionStats;
use clap::Parser;
use colored::*;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "rigol-pwl")]
#[command(about = "Convert oscilloscope CSV captures to SPICE PWL source files")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    long_about = "Convert an oscilloscope CSV capture into a SPICE piecewise-linear (PWL) \
                  source file. Numeric options accept engineering notation: an optional sign \
                  letter (l/m/n/d negative, r/p/u positive), an SI suffix (m, u, n, p, f) and \
                  an ignored unit letter (s, v, a, x), e.g. l1.5ms, r20u, 10mv, 2x. \
                  Transforms are always applied in the order clamp, remove-dc, offset, \
                  multiply, shift, cut, repeat, downsample, compact."
)]
pub struct Args {
    /// CSV file exported by the oscilloscope
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output file (defaults to INPUT with a .txt extension, '-' for stdout)
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Label of the channel to convert (exact case preferred, then case-insensitive)
    #[arg(short, long, default_value = DEFAULT_CHANNEL)]
    pub channel: String,

    /// Analyse the file's header, list its channels and exit
    #[arg(short, long)]
    pub analyse: bool,

    /// Format for the --analyse listing
    #[arg(long, value_enum, default_value = "human")]
    pub format: AnalysisFormat,

    /// Values below this are raised to it
    #[arg(long, value_name = "VALUE", value_parser = parse_magnitude, allow_hyphen_values = true)]
    pub clamp_low: Option<f64>,

    /// Values above this are lowered to it
    #[arg(long, value_name = "VALUE", value_parser = parse_magnitude, allow_hyphen_values = true)]
    pub clamp_high: Option<f64>,

    /// Subtract the mean value of the capture
    #[arg(long)]
    pub remove_dc: bool,

    /// Add a constant to every value
    #[arg(long, value_name = "VALUE", value_parser = parse_magnitude, allow_hyphen_values = true)]
    pub offset: Option<f64>,

    /// Multiply every value by a constant
    #[arg(long, value_name = "VALUE", value_parser = parse_magnitude, allow_hyphen_values = true)]
    pub multiply: Option<f64>,

    /// Shift time (l = earlier, r = later), points before zero are dropped
    #[arg(long, value_name = "TIME", value_parser = parse_magnitude, allow_hyphen_values = true)]
    pub shift: Option<f64>,

    /// Drop every point at or after this time
    #[arg(long, value_name = "TIME", value_parser = parse_magnitude)]
    pub cut: Option<f64>,

    /// Append the waveform N more times
    #[arg(long, value_name = "N")]
    pub repeat: Option<usize>,

    /// Keep one point out of every N
    #[arg(long, value_name = "N")]
    pub downsample: Option<usize>,

    /// Keep redundant points inside flat runs
    #[arg(short, long)]
    pub keep_all: bool,

    /// Overwrite the output file if it exists
    #[arg(short, long)]
    pub force: bool,

    /// Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only show errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// clap value parser for engineering-notation magnitudes
pub fn parse_magnitude(value: &str) -> std::result::Result<f64, String> {
    parse_engineering(value).ok_or_else(|| format!("'{}' is not a valid number", value))
}

impl Args {
    /// Log level derived from -v / -q
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Progress bars are drawn unless quiet or writing PWL records to stdout
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.output.as_deref() != Some(std::path::Path::new(STDOUT_PATH))
    }

    pub fn transform_config(&self) -> TransformConfig {
        let mut transforms = TransformConfig::default().with_clamp(self.clamp_low, self.clamp_high);
        if self.remove_dc {
            transforms = transforms.with_remove_dc();
        }
        if let Some(offset) = self.offset {
            transforms = transforms.with_offset(offset);
        }
        if let Some(factor) = self.multiply {
            transforms = transforms.with_multiply(factor);
        }
        if let Some(delta) = self.shift {
            transforms = transforms.with_time_shift(delta);
        }
        if let Some(threshold) = self.cut {
            transforms = transforms.with_cut(threshold);
        }
        if let Some(count) = self.repeat {
            transforms = transforms.with_repeat(count);
        }
        if let Some(interval) = self.downsample {
            transforms = transforms.with_downsample(interval);
        }
        if self.keep_all {
            transforms = transforms.keep_all();
        }
        transforms
    }

    /// Build the run configuration
    pub fn to_config(&self) -> ConversionConfig {
        let mut config = ConversionConfig::new(&self.input)
            .with_channel(self.channel.clone())
            .with_transforms(self.transform_config());
        if let Some(output) = &self.output {
            config = config.with_output(output);
        }
        if self.analyse {
            config = config.with_list_only(self.format);
        }
        if self.force {
            config = config.with_force_overwrite();
        }
        config
    }
}

/// Set up structured logging on stderr
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rigol_pwl={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    tracing::debug!("Logging initialized at level: {}", log_level);
}

/// Render the header listing printed by --analyse
pub fn render_analysis(header: &HeaderInfo, format: AnalysisFormat) -> serde_json::Result<String> {
    match format {
        AnalysisFormat::Json => serde_json::to_string_pretty(header),
        AnalysisFormat::Human => {
            let mut out = String::new();
            out.push_str(&format!("{}\n", "Channels:".bright_green().bold()));
            for channel in &header.channels {
                out.push_str(&format!(
                    "  {} {} {}\n",
                    channel.name.bright_cyan(),
                    format!("(column {})", channel.column_index).bright_black(),
                    channel.unit.as_deref().unwrap_or("")
                ));
            }
            out.push_str(&format!(
                "{} {} ({})",
                "Sample increment:".bright_green().bold(),
                format_engineering(header.increment, "s").bright_white(),
                format_engineering(1.0 / header.increment, "Sa/s")
            ));
            Ok(out)
        }
    }
}

/// Print the end-of-run summary to stderr
pub fn print_summary(stats: &ConversionStats) {
    eprintln!("{}", "Conversion Summary".bright_green().bold());
    eprintln!(
        "  {} {}",
        "Channel:".bright_cyan(),
        stats.channel.name.bright_white()
    );
    eprintln!(
        "  {} {}",
        "Sample increment:".bright_cyan(),
        format_engineering(stats.increment, "s")
    );
    eprintln!(
        "  {} {}",
        "Points read:".bright_cyan(),
        stats.points_read.to_string().bright_white()
    );
    if let Some(mean) = stats.report.dc_removed {
        eprintln!(
            "  {} {}",
            "DC removed:".bright_cyan(),
            format_engineering(mean, stats.channel.unit.as_deref().map_or("", unit_symbol))
        );
    }
    if let Some(removed) = stats.report.redundant_points_removed() {
        eprintln!(
            "  {} {}",
            "Redundant points removed:".bright_cyan(),
            removed.to_string().bright_white()
        );
    }
    eprintln!(
        "  {} {}",
        "Points written:".bright_cyan(),
        stats.points_written.to_string().bright_white().bold()
    );
    eprintln!(
        "  {} {}",
        "Waveform length:".bright_cyan(),
        format_engineering(stats.duration, "s")
    );
    let destination = match &stats.output {
        OutputTarget::File(path) => path.display().to_string(),
        OutputTarget::Stdout => "stdout".to_string(),
    };
    eprintln!("  {} {}", "Output:".bright_cyan(), destination);
    eprintln!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        stats.processing_time_ms.to_string().bright_white()
    );
}

/// Short symbol for the unit names scopes write in the header
fn unit_symbol(unit: &str) -> &str {
    match unit.to_lowercase().as_str() {
        "volt" | "volts" => "V",
        "amp" | "amps" | "ampere" => "A",
        _ => unit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Channel;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("rigol-pwl").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["scope.csv"]);
        let config = args.to_config();

        assert_eq!(config.channel, "CH1");
        assert!(!config.list_only);
        assert_eq!(
            config.output,
            OutputTarget::File(PathBuf::from("scope.txt"))
        );
        assert_eq!(config.transforms, TransformConfig::default());
        assert_eq!(args.get_log_level(), "warn");
    }

    #[test]
    fn test_engineering_arguments() {
        let args = parse(&[
            "scope.csv",
            "out.pwl",
            "--shift",
            "l1ms",
            "--cut",
            "20u",
            "--offset",
            "-0.5",
            "--multiply",
            "2x",
        ]);
        let transforms = args.transform_config();

        assert!((transforms.time_shift.unwrap() + 1e-3).abs() < 1e-15);
        assert!((transforms.cut.unwrap() - 20e-6).abs() < 1e-18);
        assert_eq!(transforms.offset, Some(-0.5));
        assert_eq!(transforms.multiply, Some(2.0));
    }

    #[test]
    fn test_invalid_magnitude_rejected() {
        let result = Args::try_parse_from(["rigol-pwl", "scope.csv", "--offset", "lots"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_flags() {
        let args = parse(&[
            "scope.csv", "-", "-c", "CH2", "-k", "-f", "--repeat", "3", "--downsample", "4",
            "-vv",
        ]);
        let config = args.to_config();

        assert_eq!(config.output, OutputTarget::Stdout);
        assert_eq!(config.channel, "CH2");
        assert!(!config.transforms.compact);
        assert!(config.force_overwrite);
        assert_eq!(config.transforms.repeat, Some(3));
        assert_eq!(config.transforms.downsample, Some(4));
        assert_eq!(args.get_log_level(), "debug");
        assert!(!args.show_progress());
    }

    #[test]
    fn test_analyse_json() {
        let args = parse(&["scope.csv", "--analyse", "--format", "json"]);
        let config = args.to_config();
        assert!(config.list_only);
        assert_eq!(config.analysis_format, AnalysisFormat::Json);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Args::try_parse_from(["rigol-pwl", "scope.csv", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_render_analysis_json() {
        let header = HeaderInfo {
            channels: vec![Channel {
                name: "CH1".to_string(),
                column_index: 1,
                unit: Some("Volt".to_string()),
            }],
            increment: 1e-6,
        };
        let json = render_analysis(&header, AnalysisFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["channels"][0]["name"], "CH1");
        assert_eq!(value["channels"][0]["column_index"], 1);
        assert_eq!(value["increment"], 1e-6);
    }

    #[test]
    fn test_unit_symbol() {
        assert_eq!(unit_symbol("Volt"), "V");
        assert_eq!(unit_symbol("W"), "W");
    }
}
