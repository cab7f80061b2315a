//! Structural line prefixes of the slicer output.

use regex_lite::Regex;

use crate::reader::line_text;

/// Comment emitted by PrusaSlicer-family slicers before every layer.
pub const DEFAULT_LAYER_MARKER: &str = ";LAYER_CHANGE";

/// Comment carrying the absolute Z of the layer that just started.
pub const DEFAULT_HEIGHT_PREFIX: &str = ";Z:";

/// Errors building a dialect.
#[derive(Debug, thiserror::Error)]
pub enum DialectError {
    #[error("layer marker must not be empty")]
    EmptyLayerMarker,

    #[error("height prefix must not be empty")]
    EmptyHeightPrefix,

    #[error("invalid height pattern: {0}")]
    Pattern(#[from] regex_lite::Error),
}

/// The two line shapes the merge reacts to.
#[derive(Debug, Clone)]
pub struct GcodeDialect {
    layer_marker: String,
    height_prefix: String,
    height_re: Regex,
}

impl Default for GcodeDialect {
    fn default() -> Self {
        Self::new(DEFAULT_LAYER_MARKER, DEFAULT_HEIGHT_PREFIX).expect("default dialect is valid")
    }
}

impl GcodeDialect {
    /// Build a dialect from a marker prefix and a height stamp prefix.
    pub fn new(layer_marker: &str, height_prefix: &str) -> Result<Self, DialectError> {
        if layer_marker.is_empty() {
            return Err(DialectError::EmptyLayerMarker);
        }
        if height_prefix.is_empty() {
            return Err(DialectError::EmptyHeightPrefix);
        }
        let height_re = Regex::new(&format!("{}([.0-9]+)", regex_lite::escape(height_prefix)))?;

        Ok(Self {
            layer_marker: layer_marker.to_string(),
            height_prefix: height_prefix.to_string(),
            height_re,
        })
    }

    pub fn layer_marker(&self) -> &str {
        &self.layer_marker
    }

    pub fn height_prefix(&self) -> &str {
        &self.height_prefix
    }

    /// True when the raw line starts a new layer.
    pub fn is_layer_marker(&self, line: &[u8]) -> bool {
        line.starts_with(self.layer_marker.as_bytes())
    }

    /// Extract the Z height stamped anywhere in the line.
    ///
    /// Returns `None` when there is no stamp or the digits do not form a
    /// valid decimal (for example `;Z:1.2.3`).
    pub fn parse_height(&self, line: &[u8]) -> Option<f64> {
        let text = line_text(line);
        let caps = self.height_re.captures(&text)?;
        caps.get(1)?.as_str().parse::<f64>().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_marker() {
        let dialect = GcodeDialect::default();
        assert!(dialect.is_layer_marker(b";LAYER_CHANGE\n"));
        assert!(dialect.is_layer_marker(b";LAYER_CHANGE"));
        assert!(!dialect.is_layer_marker(b" ;LAYER_CHANGE\n"));
        assert!(!dialect.is_layer_marker(b";LAYER:3\n"));
    }

    #[test]
    fn test_parse_height() {
        let dialect = GcodeDialect::default();
        assert_eq!(dialect.parse_height(b";Z:0.2\n"), Some(0.2));
        assert_eq!(dialect.parse_height(b";Z:12\r\n"), Some(12.0));
        // Search is unanchored.
        assert_eq!(dialect.parse_height(b"G1 ;Z:1.4\n"), Some(1.4));
    }

    #[test]
    fn test_parse_height_rejects_garbage() {
        let dialect = GcodeDialect::default();
        assert_eq!(dialect.parse_height(b";HEIGHT:0.2\n"), None);
        assert_eq!(dialect.parse_height(b";Z:\n"), None);
        assert_eq!(dialect.parse_height(b";Z:1.2.3\n"), None);
        assert_eq!(dialect.parse_height(b";Z:-1\n"), None);
    }

    #[test]
    fn test_custom_prefix_is_escaped() {
        let dialect = GcodeDialect::new(";LAYER", "(Z=").unwrap();
        assert_eq!(dialect.parse_height(b"(Z=3.5)\n"), Some(3.5));
        assert!(dialect.is_layer_marker(b";LAYER 4\n"));
    }

    #[test]
    fn test_empty_prefixes_rejected() {
        assert!(matches!(
            GcodeDialect::new("", ";Z:"),
            Err(DialectError::EmptyLayerMarker)
        ));
        assert!(matches!(
            GcodeDialect::new(";LAYER_CHANGE", ""),
            Err(DialectError::EmptyHeightPrefix)
        ));
    }
}
