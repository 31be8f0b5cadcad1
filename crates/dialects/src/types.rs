use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound on the context snippet a parser attaches to a raw feature.
pub const MAX_RAW_CONTEXT_CHARS: usize = 160;

/// A single web-platform feature usage found in a source file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DetectedFeature {
    /// Raw token from the parser, or the canonical registry id after validation
    pub feature: String,

    /// Which kind of sub-region the usage came from
    #[serde(rename = "type")]
    pub feature_type: FeatureType,

    /// Short source snippet around the usage
    pub context: String,

    /// Source file path
    pub file: String,

    /// Line (1-indexed)
    pub line: usize,

    /// Column (0-indexed)
    pub column: usize,
}

impl DetectedFeature {
    /// Create a new feature record; the context is bounded to a single short line
    #[must_use]
    pub fn new(
        feature: impl Into<String>,
        feature_type: FeatureType,
        context: &str,
        file: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            feature: feature.into(),
            feature_type,
            context: bound_context(context),
            file: file.into(),
            line: line.max(1),
            column,
        }
    }

    /// Shift the record down by `lines` (used for chunked and embedded regions)
    #[must_use]
    pub fn offset_lines(mut self, lines: usize) -> Self {
        self.line += lines;
        self
    }

    /// Builder: replace the source path
    #[must_use]
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = file.into();
        self
    }
}

/// Sub-region a feature was detected in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FeatureType {
    Markup,
    Style,
    Script,
}

impl FeatureType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Markup => "markup",
            Self::Style => "style",
            Self::Script => "script",
        }
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keep the first non-empty line of a snippet, trimmed and capped.
fn bound_context(raw: &str) -> String {
    let line = raw
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("");
    line.chars().take(MAX_RAW_CONTEXT_CHARS).collect()
}
