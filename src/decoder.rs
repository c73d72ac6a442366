//! Blob name decoding.

use regex::Regex;
use std::fmt;

use crate::error::ListerResult;

/// Name of the capture group holding the grain identifier.
const GRAIN_ID_GROUP: &str = "grain_id";

/// A grain type paired with one identifier decoded from a blob name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedRecord {
    pub grain_type: String,
    pub grain_id: String,
}

impl DecodedRecord {
    pub fn new(grain_type: impl Into<String>, grain_id: impl Into<String>) -> Self {
        Self {
            grain_type: grain_type.into(),
            grain_id: grain_id.into(),
        }
    }
}

impl fmt::Display for DecodedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.grain_type, self.grain_id)
    }
}

/// Extracts grain identifiers from blob names of the form
/// `<prefix>/<grainId>.json`.
///
/// The prefix is matched literally and must be followed directly by `/`. The
/// identifier is everything between that `/` and the final `.json`, so it may
/// itself contain slashes, but it can never be empty.
#[derive(Debug, Clone)]
pub struct GrainNameDecoder {
    pattern: Regex,
}

impl GrainNameDecoder {
    pub fn new(prefix: &str) -> ListerResult<Self> {
        let pattern = Regex::new(&format!(
            r"^{}/(?P<{}>.+)\.json$",
            regex::escape(prefix),
            GRAIN_ID_GROUP
        ))?;
        Ok(Self { pattern })
    }

    /// Returns the grain identifier, or `None` if the name does not match.
    pub fn decode<'a>(&self, name: &'a str) -> Option<&'a str> {
        self.pattern
            .captures(name)
            .and_then(|caps| caps.name(GRAIN_ID_GROUP))
            .map(|m| m.as_str())
    }

    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }
}
