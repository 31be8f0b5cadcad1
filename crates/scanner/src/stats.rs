use baseline_dialects::DetectedFeature;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Statistics about a scan run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanStats {
    /// Paths handed to the scan
    pub files_considered: usize,

    /// Paths no dialect parser claimed
    pub files_skipped: usize,

    /// Files parsed from source this run
    pub files_parsed: usize,

    /// Files served from the parse-result cache
    pub files_cached: usize,

    /// Parsed files that were read in chunks
    pub files_streamed: usize,

    /// Files whose read or parse failed
    pub files_failed: usize,

    /// Features emitted by the dialect parsers
    pub raw_features: usize,

    /// Features left after validation and deduplication
    pub validated_features: usize,

    /// Time taken in milliseconds
    pub time_ms: u64,

    /// Dialect name → files handled
    pub dialects: HashMap<String, usize>,

    /// Errors encountered
    pub errors: Vec<String>,
}

impl ScanStats {
    pub fn new() -> Self {
        Self {
            files_considered: 0,
            files_skipped: 0,
            files_parsed: 0,
            files_cached: 0,
            files_streamed: 0,
            files_failed: 0,
            raw_features: 0,
            validated_features: 0,
            time_ms: 0,
            dialects: HashMap::new(),
            errors: Vec::new(),
        }
    }

    pub fn add_file(&mut self, dialect: &str, features: usize) {
        self.raw_features += features;
        *self.dialects.entry(dialect.to_string()).or_insert(0) += 1;
    }

    pub fn add_error(&mut self, error: String) {
        self.files_failed += 1;
        self.errors.push(error);
    }
}

impl Default for ScanStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Validated features plus the statistics of the run that produced them
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanReport {
    pub features: Vec<DetectedFeature>,
    pub stats: ScanStats,
}
