//! Mix summary document

use chrono::{DateTime, Utc};
use mixer_gcode::{LayerStats, RetractionSettings};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io;
use std::path::Path;

use crate::merge::{Band, Bands, MergeStats};

/// Schema identifier for the mix summary.
pub const MIX_SUMMARY_SCHEMA_ID: &str = "retraction-mixer/mix_summary@1";

/// Per-input section of the summary.
#[derive(Debug, Clone, Serialize)]
pub struct InputSummary {
    /// File name.
    pub name: String,

    /// Number parsed from the file name.
    pub number: u64,

    /// Layer count and top height.
    #[serde(flatten)]
    pub stats: LayerStats,

    /// Retraction settings found in the file.
    pub retraction: RetractionSettings,

    /// Layers this input contributed to the output.
    pub layers_taken: usize,
}

/// The merged output file.
#[derive(Debug, Clone, Serialize)]
pub struct OutputSummary {
    pub path: String,
    pub lines: u64,
    pub bytes: u64,

    /// Hex SHA-256 of the written file.
    pub sha256: String,
}

/// Summary of one mix.
#[derive(Debug, Clone, Serialize)]
pub struct MixSummary {
    pub schema_id: String,
    pub created_at: DateTime<Utc>,

    /// Input directory.
    pub dir: String,

    /// Sorted split heights.
    pub split_heights: Vec<f64>,

    /// Height band owned by each input.
    pub bands: Vec<Band>,

    pub inputs: Vec<InputSummary>,
    pub output: OutputSummary,
}

impl MixSummary {
    pub fn new(
        dir: &Path,
        bands: &Bands,
        mut inputs: Vec<InputSummary>,
        merge: &MergeStats,
        output: OutputSummary,
    ) -> Self {
        for (input, taken) in inputs.iter_mut().zip(&merge.layers_taken) {
            input.layers_taken = *taken;
        }
        Self {
            schema_id: MIX_SUMMARY_SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            dir: dir.display().to_string(),
            split_heights: bands.splits().to_vec(),
            bands: bands.iter().collect(),
            inputs,
            output,
        }
    }

    /// Format as JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Hex SHA-256 of a file's contents.
pub fn digest_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}
