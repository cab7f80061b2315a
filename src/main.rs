//! Retraction Mixer CLI
//!
//! Entry point for the `retraction-mixer` command-line tool.

use clap::Parser;
use retraction_mixer::{logging, pipeline, CliOverrides, MixRequest, MixerConfig};
use std::io;
use std::path::PathBuf;
use std::process;

const EXIT_STATUS_HELP: &str = "Exit status: 0 when out.gcode was written, 1 when the inputs or \
arguments were rejected (no output file is written in that case).";

#[derive(Parser)]
#[command(name = "retraction-mixer")]
#[command(
    about = "Creates one gcode file from multiple enumerated gcode files by splitting them at given layer heights",
    version,
    after_help = EXIT_STATUS_HELP
)]
struct Cli {
    /// Directory holding the numbered input files (0.gcode, 1.gcode, ...).
    dir: PathBuf,

    /// Space separated layer heights at which to cut over to the next input file.
    #[arg(required = true, allow_negative_numbers = true)]
    layer_heights: Vec<f64>,

    /// Path to a TOML config file.
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Output file name inside DIR (default: out.gcode).
    #[arg(long, short = 'o')]
    output: Option<String>,

    /// Prefix every output line with the index of its source file.
    #[arg(long)]
    annotate: bool,

    /// Print the run summary as JSON instead of the text report.
    #[arg(long)]
    json: bool,

    /// Increase log verbosity on stderr (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if !cli.dir.is_dir() {
        println!("{} is not a directory. Exiting.", cli.dir.display());
        process::exit(1);
    }

    let overrides = CliOverrides {
        output_name: cli.output,
        annotate: cli.annotate,
    };
    let config = match MixerConfig::load(cli.config.as_deref(), overrides) {
        Ok(c) => c,
        Err(e) => {
            println!("Configuration error: {}. Exiting.", e);
            process::exit(1);
        }
    };

    let request = MixRequest {
        dir: cli.dir,
        split_heights: cli.layer_heights,
        config,
    };

    let result = if cli.json {
        pipeline::run(&request, &mut io::sink())
    } else {
        pipeline::run(&request, &mut io::stdout().lock())
    };

    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            println!("{}. Exiting.", e);
            process::exit(1);
        }
    };

    if cli.json {
        match summary.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing summary: {}", e);
                process::exit(1);
            }
        }
    }
}
