use crate::error::{Result, ScanError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const MAX_CONCURRENCY: usize = 64;
const MAX_CACHE_CAPACITY: usize = 1_000_000;
const MIN_CONTEXT_CHARS: usize = 4;

/// Directories never descended into during a directory scan
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    ".hg",
    ".svn",
    "dist",
    "build",
    "out",
    "coverage",
    "target",
    "vendor",
    ".next",
    ".nuxt",
    ".output",
    ".svelte-kit",
    ".turbo",
    ".cache",
];

/// Tunables for a scan run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// In-flight parse operations and validation batches
    pub concurrency: usize,

    /// Parse-result cache entries kept before LRU eviction
    pub cache_capacity: usize,

    /// Validity window for a cached parse result
    pub cache_ttl_secs: u64,

    /// Files larger than this are read in line chunks
    pub stream_threshold_bytes: u64,

    /// Lines per streamed chunk
    pub stream_chunk_lines: usize,

    /// Pause between parse batches
    pub batch_delay_ms: u64,

    /// Raw features per validation task
    pub validation_batch_size: usize,

    /// Cap for validated context snippets
    pub max_context_chars: usize,

    /// Directory walk depth limit
    pub max_depth: usize,

    /// Directory names skipped by the directory walk (case-insensitive)
    pub exclude_dirs: Vec<String>,

    /// Feature registry document; `None` means an empty registry
    pub registry_path: Option<PathBuf>,

    /// Resident memory above which a warning is logged between batches
    pub memory_soft_limit_mb: Option<u64>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            concurrency: 10,
            cache_capacity: 1000,
            cache_ttl_secs: 300,
            stream_threshold_bytes: 10 * 1024 * 1024,
            stream_chunk_lines: 1000,
            batch_delay_ms: 10,
            validation_batch_size: 100,
            max_context_chars: 100,
            max_depth: 20,
            exclude_dirs: DEFAULT_EXCLUDED_DIRS.iter().map(|d| (*d).to_string()).collect(),
            registry_path: None,
            memory_soft_limit_mb: None,
        }
    }
}

impl ScanConfig {
    /// Parse a TOML document; missing keys take their defaults
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Defaults with `BASELINE_SCAN_*` environment overrides applied
    pub fn from_env() -> Result<Self> {
        let config = Self::default().with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply `BASELINE_SCAN_*` overrides from the process environment
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup; unparsable values keep the current setting
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(&format!("BASELINE_SCAN_{key}"));

        self.concurrency =
            parse_usize(get("CONCURRENCY").as_deref(), self.concurrency, 1, MAX_CONCURRENCY);
        self.cache_capacity = parse_usize(
            get("CACHE_CAPACITY").as_deref(),
            self.cache_capacity,
            1,
            MAX_CACHE_CAPACITY,
        );
        self.cache_ttl_secs = parse_u64(get("CACHE_TTL_SECS").as_deref(), self.cache_ttl_secs);
        self.stream_threshold_bytes = parse_u64(
            get("STREAM_THRESHOLD_BYTES").as_deref(),
            self.stream_threshold_bytes,
        );
        self.stream_chunk_lines = parse_usize(
            get("STREAM_CHUNK_LINES").as_deref(),
            self.stream_chunk_lines,
            1,
            usize::MAX,
        );
        self.batch_delay_ms = parse_u64(get("BATCH_DELAY_MS").as_deref(), self.batch_delay_ms);
        self.validation_batch_size = parse_usize(
            get("VALIDATION_BATCH_SIZE").as_deref(),
            self.validation_batch_size,
            1,
            usize::MAX,
        );
        self.max_depth = parse_usize(get("MAX_DEPTH").as_deref(), self.max_depth, 1, usize::MAX);

        if let Some(path) = get("REGISTRY").map(|v| v.trim().to_string()) {
            if !path.is_empty() {
                self.registry_path = Some(PathBuf::from(path));
            }
        }
        if let Some(limit) = get("MEMORY_SOFT_LIMIT_MB")
            .as_deref()
            .map(str::trim)
            .and_then(|v| v.parse::<u64>().ok())
        {
            self.memory_soft_limit_mb = Some(limit);
        }

        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 || self.concurrency > MAX_CONCURRENCY {
            return Err(ScanError::invalid_config(format!(
                "concurrency must be between 1 and {MAX_CONCURRENCY}"
            )));
        }
        if self.cache_capacity == 0 {
            return Err(ScanError::invalid_config("cache_capacity must be > 0"));
        }
        if self.cache_ttl_secs == 0 {
            return Err(ScanError::invalid_config("cache_ttl_secs must be > 0"));
        }
        if self.stream_chunk_lines == 0 {
            return Err(ScanError::invalid_config("stream_chunk_lines must be > 0"));
        }
        if self.validation_batch_size == 0 {
            return Err(ScanError::invalid_config("validation_batch_size must be > 0"));
        }
        if self.max_context_chars < MIN_CONTEXT_CHARS {
            return Err(ScanError::invalid_config(format!(
                "max_context_chars must be at least {MIN_CONTEXT_CHARS}"
            )));
        }
        if self.max_depth == 0 {
            return Err(ScanError::invalid_config("max_depth must be > 0"));
        }
        Ok(())
    }

    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    #[must_use]
    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    #[must_use]
    pub fn memory_soft_limit_bytes(&self) -> Option<u64> {
        self.memory_soft_limit_mb.map(|mb| mb.saturating_mul(1024 * 1024))
    }
}

fn parse_usize(raw: Option<&str>, default_value: usize, min: usize, max: usize) -> usize {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default_value)
        .clamp(min, max)
}

fn parse_u64(raw: Option<&str>, default_value: u64) -> u64 {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default_value)
}
