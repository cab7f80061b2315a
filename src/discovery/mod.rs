//! Input discovery
//!
//! Finds the numbered slicer outputs (`0.gcode`, `1.gcode`, ...) directly
//! inside the working directory and orders them by their number.

use regex_lite::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;
use walkdir::WalkDir;

/// Discovery errors.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("{0} is not a directory")]
    NotADirectory(String),

    #[error("failed to list {path}: {source}")]
    Walk {
        path: String,
        #[source]
        source: walkdir::Error,
    },
}

/// One numbered input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    /// Number taken from the file name.
    pub number: u64,

    /// Full path.
    pub path: PathBuf,
}

impl InputFile {
    /// File name for display.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

fn input_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([0-9]+)\.gcode$").expect("input name pattern"))
}

/// Parse the number out of an input file name, `None` if the name is not
/// `<digits>.gcode`.
pub fn input_number(file_name: &str) -> Option<u64> {
    let caps = input_name_re().captures(file_name)?;
    // Digit runs too long for u64 are not treated as inputs.
    caps.get(1)?.as_str().parse().ok()
}

/// List numbered gcode files in `dir`, sorted numerically.
///
/// Only direct children are considered. Files whose numbers compare equal
/// (`1.gcode` and `01.gcode`) are ordered by name.
pub fn discover_inputs(dir: &Path) -> Result<Vec<InputFile>, DiscoveryError> {
    if !dir.is_dir() {
        return Err(DiscoveryError::NotADirectory(dir.display().to_string()));
    }

    let mut inputs = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
        let entry = entry.map_err(|source| DiscoveryError::Walk {
            path: dir.display().to_string(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if let Some(number) = input_number(&name) {
            inputs.push(InputFile {
                number,
                path: entry.path().to_path_buf(),
            });
        }
    }

    inputs.sort_by(|a, b| a.number.cmp(&b.number).then_with(|| a.path.cmp(&b.path)));

    for input in &inputs {
        debug!(file = %input.path.display(), number = input.number, "discovered input");
    }
    Ok(inputs)
}
