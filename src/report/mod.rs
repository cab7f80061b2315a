//! Human-readable run report
//!
//! Purely informational: nothing printed here feeds back into the merge.

use mixer_gcode::{LayerStats, RetractionKey, RetractionSettings};

/// Separator line between report sections.
pub const SECTION_RULE: &str = "##########";

/// Shown for a setting that never appeared in the file.
const UNSET: &str = "-";

/// One-line layer summary of an input.
pub fn layer_summary(name: &str, stats: &LayerStats) -> String {
    format!(
        "{} has {} layers and {:?} max layer height",
        name, stats.layer_count, stats.max_height
    )
}

/// Format split heights the way they were sorted, e.g. `[0.6, 1.2]`.
pub fn format_heights(heights: &[f64]) -> String {
    let items: Vec<String> = heights.iter().map(|h| format!("{:?}", h)).collect();
    format!("[{}]", items.join(", "))
}

/// Retraction settings of every input, one row per file.
#[derive(Debug, Default)]
pub struct RetractionTable {
    rows: Vec<(String, RetractionSettings)>,
}

impl RetractionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, settings: RetractionSettings) {
        self.rows.push((name.into(), settings));
    }

    /// Render as an aligned text table.
    pub fn to_human(&self) -> String {
        let mut header = vec!["file".to_string()];
        header.extend(RetractionKey::ALL.iter().map(|k| k.to_string()));

        let body: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|(name, settings)| {
                let mut row = vec![name.clone()];
                row.extend(RetractionKey::ALL.iter().map(|&k| {
                    settings
                        .get(k)
                        .map(|v| v.to_string())
                        .unwrap_or_else(|| UNSET.to_string())
                }));
                row
            })
            .collect();

        let widths: Vec<usize> = (0..header.len())
            .map(|col| {
                std::iter::once(&header)
                    .chain(body.iter())
                    .map(|row| row[col].chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut output = String::new();
        for row in std::iter::once(&header).chain(body.iter()) {
            let cells: Vec<String> = row
                .iter()
                .zip(&widths)
                .enumerate()
                .map(|(col, (cell, &width))| {
                    if col == 0 {
                        format!("{:<width$}", cell, width = width)
                    } else {
                        format!("{:>width$}", cell, width = width)
                    }
                })
                .collect();
            output.push_str(cells.join("  ").trim_end());
            output.push('\n');
        }
        output
    }
}
