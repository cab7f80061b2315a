//! Run summary
//!
//! Machine-readable record of one mix, printed with `--json`.

mod mix_summary;

pub use mix_summary::{digest_file, InputSummary, MixSummary, OutputSummary, MIX_SUMMARY_SCHEMA_ID};
