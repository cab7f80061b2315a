//! Retraction settings stamped into the slicer's config comments.
//!
//! Slicers append their full configuration as `; key = value` comments.
//! Six of those keys describe retraction; they are collected here so runs
//! sliced with different retraction tuning can be compared side by side.

use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, BufRead};
use std::sync::OnceLock;

use regex_lite::Regex;
use serde::{Serialize, Serializer};

use crate::reader::{line_text, LineReader};

/// The retraction keys that are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RetractionKey {
    RetractLength,
    RetractSpeed,
    RetractLift,
    FilamentRetractLength,
    FilamentRetractSpeed,
    FilamentRetractLift,
}

impl RetractionKey {
    /// All keys in report column order.
    pub const ALL: [RetractionKey; 6] = [
        RetractionKey::RetractLength,
        RetractionKey::RetractSpeed,
        RetractionKey::RetractLift,
        RetractionKey::FilamentRetractLength,
        RetractionKey::FilamentRetractSpeed,
        RetractionKey::FilamentRetractLift,
    ];

    /// Key as written by the slicer.
    pub fn as_str(&self) -> &'static str {
        match self {
            RetractionKey::RetractLength => "retract_length",
            RetractionKey::RetractSpeed => "retract_speed",
            RetractionKey::RetractLift => "retract_lift",
            RetractionKey::FilamentRetractLength => "filament_retract_length",
            RetractionKey::FilamentRetractSpeed => "filament_retract_speed",
            RetractionKey::FilamentRetractLift => "filament_retract_lift",
        }
    }

    /// Match a settings comment against this key, returning the text
    /// after the key.
    ///
    /// The key must be followed by a space or `=`, so `retract_lift_above`
    /// does not match `retract_lift`.
    fn strip_from<'a>(&self, line: &'a str) -> Option<&'a str> {
        let rest = line.strip_prefix("; ")?.strip_prefix(self.as_str())?;
        rest.starts_with([' ', '=']).then_some(rest)
    }
}

impl fmt::Display for RetractionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recognized setting's value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettingValue {
    Value(f64),
    /// The key was present but its value was not a number (e.g. `nil`).
    NotAvailable,
}

impl SettingValue {
    fn parse(rest: &str) -> Self {
        static VALUE_RE: OnceLock<Regex> = OnceLock::new();
        let re = VALUE_RE.get_or_init(|| {
            Regex::new(r"^ = ([-+]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+))").expect("value pattern")
        });

        re.captures(rest)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .map_or(SettingValue::NotAvailable, SettingValue::Value)
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Value(v) => write!(f, "{}", v),
            SettingValue::NotAvailable => f.write_str("n/a"),
        }
    }
}

impl Serialize for SettingValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SettingValue::Value(v) => serializer.serialize_f64(*v),
            SettingValue::NotAvailable => serializer.serialize_str("n/a"),
        }
    }
}

/// Retraction settings found in one file. Keys never seen stay absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RetractionSettings {
    values: BTreeMap<RetractionKey, SettingValue>,
}

impl RetractionSettings {
    /// Scan a whole file for the six retraction keys.
    pub fn scan<R: BufRead>(reader: &mut LineReader<R>) -> io::Result<Self> {
        let mut settings = Self::default();
        while let Some(line) = reader.next_line()? {
            if line.starts_with(b"; ") {
                settings.observe(&line_text(line));
            }
        }
        Ok(settings)
    }

    /// Record the line if it is one of the tracked settings. Later lines
    /// for the same key overwrite earlier ones.
    pub fn observe(&mut self, line: &str) {
        for key in RetractionKey::ALL {
            if let Some(rest) = key.strip_from(line) {
                self.values.insert(key, SettingValue::parse(rest));
                return;
            }
        }
    }

    pub fn get(&self, key: RetractionKey) -> Option<SettingValue> {
        self.values.get(&key).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
