//! Mix pipeline
//!
//! Runs one mix end to end:
//! - Discover the numbered inputs
//! - Validate input and split counts
//! - Scan every input for layer count and top height, then validate them
//! - Report retraction settings
//! - Merge into the output file
//!
//! The output file is created only once every check has passed, so a
//! rejected run leaves any previous output untouched.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use mixer_gcode::{GcodeDialect, LayerStats, LineReader, RetractionSettings};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, MixerConfig};
use crate::discovery::{discover_inputs, DiscoveryError, InputFile};
use crate::merge::{write_merged, Bands, MergeError, MergeOptions};
use crate::report::{self, RetractionTable, SECTION_RULE};
use crate::summary::{digest_file, InputSummary, MixSummary, OutputSummary};
use crate::validate::{self, ValidationError};

/// Pipeline errors.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Discovery(#[from] DiscoveryError),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("failed to scan {path}: {source}")]
    Scan {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Output file {0} is one of the input files")]
    OutputIsInput(String),

    #[error("{0}")]
    Merge(#[from] MergeError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// One mix to perform.
#[derive(Debug, Clone)]
pub struct MixRequest {
    /// Directory holding `0.gcode`, `1.gcode`, ...
    pub dir: PathBuf,

    /// Split heights as given, in any order.
    pub split_heights: Vec<f64>,

    pub config: MixerConfig,
}

/// Run a mix, writing the human report to `out`.
///
/// Pass [`io::sink`] as `out` for a quiet run.
pub fn run<W: Write>(request: &MixRequest, out: &mut W) -> PipelineResult<MixSummary> {
    request.config.validate()?;
    let dialect = request.config.dialect().map_err(ConfigError::from)?;
    debug!(
        layer_marker = dialect.layer_marker(),
        height_prefix = dialect.height_prefix(),
        "gcode dialect"
    );
    let split_heights = validate::sorted_split_heights(request.split_heights.clone())?;
    let dir_label = request.dir.display().to_string();

    let inputs = discover_inputs(&request.dir)?;
    if inputs.is_empty() {
        return Err(ValidationError::NoInputs(dir_label).into());
    }
    writeln!(
        out,
        "Found {} input gcode files in directory {}",
        inputs.len(),
        dir_label
    )?;
    validate::check_input_count(&dir_label, inputs.len())?;

    writeln!(
        out,
        "{} layer heights were given: {}",
        split_heights.len(),
        report::format_heights(&split_heights)
    )?;
    validate::check_split_count(inputs.len(), split_heights.len())?;

    let mut stats = Vec::with_capacity(inputs.len());
    for input in &inputs {
        let file_stats = scan_layers(input, &dialect)?;
        writeln!(out, "{}", report::layer_summary(&input.name(), &file_stats))?;
        stats.push((input.name(), file_stats));
    }
    let shared = validate::check_uniform_stats(&stats)?;
    validate::check_split_range(&split_heights, shared.max_height)?;

    let retraction = inputs
        .iter()
        .map(scan_retraction)
        .collect::<PipelineResult<Vec<_>>>()?;
    let mut table = RetractionTable::new();
    for (input, settings) in inputs.iter().zip(&retraction) {
        table.push(input.name(), settings.clone());
    }
    writeln!(out, "{}", SECTION_RULE)?;
    write!(out, "{}", table.to_human())?;
    writeln!(out, "{}", SECTION_RULE)?;

    let bands = Bands::from_splits(split_heights);
    let out_path = output_path(&request.dir, &request.config);
    check_output_not_input(&out_path, &inputs)?;
    info!(
        output = %out_path.display(),
        inputs = inputs.len(),
        layers = shared.layer_count,
        "merging"
    );

    let merge = write_merged(
        &out_path,
        &inputs,
        &bands,
        &dialect,
        MergeOptions {
            annotate: request.config.annotate,
        },
    )?;
    let sha256 = digest_file(&out_path)?;
    debug!(lines = merge.lines_written, bytes = merge.bytes_written, %sha256, "output written");

    writeln!(out, "Output written to file {}", out_path.display())?;
    writeln!(out, "sha256 {}", sha256)?;

    let input_summaries = inputs
        .iter()
        .zip(stats)
        .zip(retraction)
        .map(|((input, (name, file_stats)), retraction)| InputSummary {
            name,
            number: input.number,
            stats: file_stats,
            retraction,
            layers_taken: 0,
        })
        .collect();

    let output = OutputSummary {
        path: out_path.display().to_string(),
        lines: merge.lines_written,
        bytes: merge.bytes_written,
        sha256,
    };
    Ok(MixSummary::new(&request.dir, &bands, input_summaries, &merge, output))
}

fn scan_layers(input: &InputFile, dialect: &GcodeDialect) -> PipelineResult<LayerStats> {
    let scan_err = |source| PipelineError::Scan {
        path: input.path.display().to_string(),
        source,
    };
    let mut reader = LineReader::open(&input.path).map_err(scan_err)?;
    let stats = LayerStats::scan(&mut reader, dialect).map_err(scan_err)?;
    debug!(
        file = %input.path.display(),
        layers = stats.layer_count,
        max_height = stats.max_height,
        "scanned layers"
    );
    Ok(stats)
}

fn scan_retraction(input: &InputFile) -> PipelineResult<RetractionSettings> {
    let scan_err = |source| PipelineError::Scan {
        path: input.path.display().to_string(),
        source,
    };
    let mut reader = LineReader::open(&input.path).map_err(scan_err)?;
    let settings = RetractionSettings::scan(&mut reader).map_err(scan_err)?;
    if settings.is_empty() {
        warn!(file = %input.path.display(), "no retraction settings found");
    }
    Ok(settings)
}

/// Refuse to truncate an input, including through a symlinked output name.
fn check_output_not_input(out_path: &Path, inputs: &[InputFile]) -> PipelineResult<()> {
    let target = fs::canonicalize(out_path).unwrap_or_else(|_| out_path.to_path_buf());
    for input in inputs {
        let input_path = fs::canonicalize(&input.path).unwrap_or_else(|_| input.path.clone());
        if input_path == target {
            return Err(PipelineError::OutputIsInput(out_path.display().to_string()));
        }
    }
    Ok(())
}

/// Path the output would be written to for `dir`.
pub fn output_path(dir: &Path, config: &MixerConfig) -> PathBuf {
    dir.join(&config.output_name)
}
