//! Layer-band merge
//!
//! Streams every input in order and keeps, for each layer, the lines of
//! the input whose band contains that layer's height.

mod bands;
mod router;

pub use bands::{Band, Bands};
pub use router::Router;

use mixer_gcode::{GcodeDialect, LineReader};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::debug;

use crate::discovery::InputFile;

/// Merge errors.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Merge options.
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeOptions {
    /// Prefix each written line with `<index> ### `.
    pub annotate: bool,
}

/// Counters collected while merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    pub lines_read: u64,
    pub lines_written: u64,
    pub bytes_written: u64,

    /// Layers taken from each input, by input position.
    pub layers_taken: Vec<usize>,
}

/// Merge `inputs` into `out`.
///
/// `inputs[i]` owns band `i` of `bands`. Read errors name the offending
/// input; write errors are reported against `"<output>"`, callers that
/// know the path use [`write_merged`].
pub fn merge_inputs<W: Write>(
    inputs: &[InputFile],
    bands: &Bands,
    dialect: &GcodeDialect,
    out: &mut W,
    options: MergeOptions,
) -> Result<MergeStats, MergeError> {
    let mut router = Router::new(bands, dialect);
    let mut stats = MergeStats::default();

    for (index, input) in inputs.iter().enumerate() {
        let read_err = |source| MergeError::Read {
            path: input.path.display().to_string(),
            source,
        };
        let write_err = |source| MergeError::Write {
            path: "<output>".to_string(),
            source,
        };

        let mut reader = LineReader::open(&input.path).map_err(read_err)?;
        router.start_file();
        let written_before = stats.lines_written;

        while let Some(line) = reader.next_line().map_err(read_err)? {
            stats.lines_read += 1;
            if !router.route(index, line) {
                continue;
            }
            if options.annotate {
                let prefix = format!("{} ### ", index);
                out.write_all(prefix.as_bytes()).map_err(write_err)?;
                stats.bytes_written += prefix.len() as u64;
            }
            out.write_all(line).map_err(write_err)?;
            stats.bytes_written += line.len() as u64;
            stats.lines_written += 1;
        }

        debug!(
            file = %input.path.display(),
            index,
            lines = stats.lines_written - written_before,
            selected = router.selected(),
            "merged input"
        );
    }

    stats.layers_taken = router.layers_taken().to_vec();
    Ok(stats)
}

/// Create (or truncate) `path` and merge into it.
pub fn write_merged(
    path: &Path,
    inputs: &[InputFile],
    bands: &Bands,
    dialect: &GcodeDialect,
    options: MergeOptions,
) -> Result<MergeStats, MergeError> {
    let write_err = |source| MergeError::Write {
        path: path.display().to_string(),
        source,
    };

    let file = File::create(path).map_err(write_err)?;
    let mut out = BufWriter::new(file);
    let stats = match merge_inputs(inputs, bands, dialect, &mut out, options) {
        Err(MergeError::Write { source, .. }) => return Err(write_err(source)),
        other => other?,
    };
    out.flush().map_err(write_err)?;
    Ok(stats)
}
