//! Run validation
//!
//! Every check here is fatal: a failed check stops the run before the
//! output file is opened.

use mixer_gcode::LayerStats;

/// Validation errors. The messages are shown to the operator as-is.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("No numbered gcode files found as input in directory {0}")]
    NoInputs(String),

    #[error("Two or more input files needed, found {0}")]
    TooFewInputs(usize),

    #[error("Layer height {0} is not a finite number")]
    NonFiniteHeight(f64),

    #[error("Need exactly one more input file than layer heights: {files} files, {heights} heights given")]
    SplitCountMismatch { files: usize, heights: usize },

    #[error("Not all files have the same layer count: {0}")]
    LayerCountMismatch(String),

    #[error("Not all files have the same max layer height: {0}")]
    MaxHeightMismatch(String),

    #[error("Given height {height} is bigger than maximum layer height {max}")]
    HeightAboveMax { height: f64, max: f64 },
}

/// Sort split heights ascending, rejecting NaN and infinities.
pub fn sorted_split_heights(mut heights: Vec<f64>) -> Result<Vec<f64>, ValidationError> {
    if let Some(bad) = heights.iter().find(|h| !h.is_finite()) {
        return Err(ValidationError::NonFiniteHeight(*bad));
    }
    heights.sort_by(f64::total_cmp);
    Ok(heights)
}

/// At least two inputs are needed to blend anything.
pub fn check_input_count(dir: &str, count: usize) -> Result<(), ValidationError> {
    match count {
        0 => Err(ValidationError::NoInputs(dir.to_string())),
        1 => Err(ValidationError::TooFewInputs(1)),
        _ => Ok(()),
    }
}

/// One split height between each pair of neighbouring inputs.
pub fn check_split_count(files: usize, heights: usize) -> Result<(), ValidationError> {
    if files != heights + 1 {
        return Err(ValidationError::SplitCountMismatch { files, heights });
    }
    Ok(())
}

/// All inputs must describe the same print: same number of layers and the
/// same top height. Returns the shared figures.
pub fn check_uniform_stats(stats: &[(String, LayerStats)]) -> Result<LayerStats, ValidationError> {
    let Some((_, first)) = stats.first() else {
        return Err(ValidationError::TooFewInputs(0));
    };

    if stats.iter().any(|(_, s)| s.layer_count != first.layer_count) {
        return Err(ValidationError::LayerCountMismatch(describe(stats, |s| {
            s.layer_count.to_string()
        })));
    }
    if stats.iter().any(|(_, s)| s.max_height != first.max_height) {
        return Err(ValidationError::MaxHeightMismatch(describe(stats, |s| {
            s.max_height.to_string()
        })));
    }
    Ok(*first)
}

/// No split may lie above the top of the print.
pub fn check_split_range(heights: &[f64], max: f64) -> Result<(), ValidationError> {
    match heights.iter().find(|&&h| h > max) {
        Some(&height) => Err(ValidationError::HeightAboveMax { height, max }),
        None => Ok(()),
    }
}

fn describe(stats: &[(String, LayerStats)], field: impl Fn(&LayerStats) -> String) -> String {
    stats
        .iter()
        .map(|(name, s)| format!("{}={}", name, field(s)))
        .collect::<Vec<_>>()
        .join(", ")
}
