//! Line-level recognition for slicer gcode.
//!
//! Knows exactly three things about a gcode file: where a layer starts,
//! which absolute Z height the layer prints at, and which retraction
//! settings the slicer stamped into its trailing config block. Nothing
//! here interprets moves or geometry.

mod dialect;
mod reader;
mod settings;
mod stats;

pub use dialect::{DialectError, GcodeDialect, DEFAULT_HEIGHT_PREFIX, DEFAULT_LAYER_MARKER};
pub use reader::{line_text, LineReader};
pub use settings::{RetractionKey, RetractionSettings, SettingValue};
pub use stats::LayerStats;
