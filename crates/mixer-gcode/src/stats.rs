//! Layer count and top height of a single gcode file.

use std::io::{self, BufRead};

use serde::Serialize;

use crate::dialect::GcodeDialect;
use crate::reader::LineReader;

/// Derived per-file layer figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayerStats {
    /// Number of layer-change markers.
    pub layer_count: usize,

    /// Height stamped after the last marker that carried one (0.0 if none did).
    pub max_height: f64,
}

impl LayerStats {
    /// Scan a whole file in one pass.
    ///
    /// Only the line directly after a marker is tried as a height stamp.
    /// If it does not parse, the previous height is kept.
    pub fn scan<R: BufRead>(reader: &mut LineReader<R>, dialect: &GcodeDialect) -> io::Result<Self> {
        let mut layer_count = 0;
        let mut max_height = 0.0;
        let mut expecting_height = false;

        while let Some(line) = reader.next_line()? {
            if dialect.is_layer_marker(line) {
                layer_count += 1;
                expecting_height = true;
                continue;
            }
            if expecting_height {
                expecting_height = false;
                if let Some(height) = dialect.parse_height(line) {
                    max_height = height;
                }
            }
        }

        Ok(Self {
            layer_count,
            max_height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(input: &str) -> LayerStats {
        let mut reader = LineReader::new(input.as_bytes());
        LayerStats::scan(&mut reader, &GcodeDialect::default()).unwrap()
    }

    #[test]
    fn test_counts_and_last_height() {
        let stats = scan(
            "G28\n;LAYER_CHANGE\n;Z:0.2\nG1 X1\n;LAYER_CHANGE\n;Z:0.4\nG1 X2\n;LAYER_CHANGE\n;Z:0.6\n",
        );
        assert_eq!(stats.layer_count, 3);
        assert_eq!(stats.max_height, 0.6);
    }

    #[test]
    fn test_last_marker_wins_even_if_lower() {
        let stats = scan(";LAYER_CHANGE\n;Z:2.0\n;LAYER_CHANGE\n;Z:1.0\n");
        assert_eq!(stats.max_height, 1.0);
    }

    #[test]
    fn test_height_only_on_next_line() {
        let stats = scan(";LAYER_CHANGE\n;Z:0.2\n;LAYER_CHANGE\nG1 Z0.4\n;Z:0.4\n");
        assert_eq!(stats.layer_count, 2);
        assert_eq!(stats.max_height, 0.2);
    }

    #[test]
    fn test_unparseable_height_keeps_previous() {
        let stats = scan(";LAYER_CHANGE\n;Z:0.2\n;LAYER_CHANGE\n;Z:0.4.1\n");
        assert_eq!(stats.max_height, 0.2);
    }

    #[test]
    fn test_consecutive_markers_rearm() {
        let stats = scan(";LAYER_CHANGE\n;LAYER_CHANGE\n;Z:0.3\n");
        assert_eq!(stats.layer_count, 2);
        assert_eq!(stats.max_height, 0.3);
    }

    #[test]
    fn test_no_layers() {
        let stats = scan("G28\nG1 Z5\n");
        assert_eq!(stats.layer_count, 0);
        assert_eq!(stats.max_height, 0.0);
    }
}
