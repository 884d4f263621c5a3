use anyhow::Context;
use clap::Parser;
use rigol_pwl::cli::{Args, print_summary, render_analysis, setup_logging};
use rigol_pwl::{CaptureProcessor, ConversionOutcome};
use std::process;
use tracing::debug;

fn main() {
    let args = Args::parse();
    setup_logging(&args);

    match run(&args) {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    debug!("Command line arguments: {:?}", args);
    let config = args.to_config();

    let processor = CaptureProcessor::new(config)
        .context("Invalid arguments")?
        .with_progress(args.show_progress());

    let outcome = processor.process().with_context(|| {
        format!(
            "Failed to convert {}",
            processor.config().input.display()
        )
    })?;

    match outcome {
        ConversionOutcome::Analysed(header) => {
            let listing = render_analysis(&header, processor.config().analysis_format)
                .context("Failed to render header analysis")?;
            println!("{}", listing);
        }
        ConversionOutcome::Converted(stats) => {
            if !args.quiet {
                print_summary(&stats);
            }
        }
    }

    Ok(())
}
