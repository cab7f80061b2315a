//! Retraction Mixer - blend several slicer runs into one print
//!
//! Takes the same model sliced several times with different settings
//! (`0.gcode`, `1.gcode`, ...) and stitches them into a single print job
//! that switches source file at given layer heights. Typical use is a
//! retraction tower: one print, a different retraction tuning per band.

pub mod config;
pub mod discovery;
pub mod logging;
pub mod merge;
pub mod pipeline;
pub mod report;
pub mod summary;
pub mod validate;

pub use config::{CliOverrides, ConfigError, MixerConfig};
pub use discovery::{discover_inputs, DiscoveryError, InputFile};
pub use merge::{merge_inputs, Bands, MergeError, MergeOptions, MergeStats, Router};
pub use pipeline::{run, MixRequest, PipelineError};
pub use summary::MixSummary;
pub use validate::ValidationError;
