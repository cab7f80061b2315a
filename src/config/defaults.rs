//! Built-in defaults (layer 1)

use mixer_gcode::{DEFAULT_HEIGHT_PREFIX, DEFAULT_LAYER_MARKER};

/// Name of the merged file written into the input directory.
pub const DEFAULT_OUTPUT_NAME: &str = "out.gcode";

pub(super) fn output_name() -> String {
    DEFAULT_OUTPUT_NAME.to_string()
}

pub(super) fn layer_marker() -> String {
    DEFAULT_LAYER_MARKER.to_string()
}

pub(super) fn height_prefix() -> String {
    DEFAULT_HEIGHT_PREFIX.to_string()
}
