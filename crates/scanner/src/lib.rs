//! # Baseline Scanner
//!
//! Orchestration of a feature scan over a source tree.
//!
//! ## Flow
//!
//! ```text
//! paths / directory walk
//!     │
//!     ├──> dialect dispatch (first claiming parser wins)
//!     │
//!     ├──> batches of `concurrency` files, throttled between batches
//!     │      ├─> cache hit (mtime + size + sha256 match, age < TTL)
//!     │      └─> parse: whole file, or line chunks above the streaming threshold
//!     │
//!     └──> one validation pass → deduplicated canonical features
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use baseline_scanner::{ParserManager, ScanConfig};
//! use std::path::Path;
//!
//! # async fn run() -> baseline_scanner::Result<()> {
//! let config = ScanConfig::from_env()?;
//! let manager = ParserManager::new(config)?;
//! let report = manager.parse_directory(Path::new("src")).await;
//! println!("{}", serde_json::to_string_pretty(&report.features).unwrap_or_default());
//! # Ok(())
//! # }
//! ```

mod cache;
mod config;
mod error;
mod manager;
mod memory;
mod metadata;
mod scanner;
mod stats;
mod stream;

pub use cache::{CacheManager, CacheStats, CachedParseResult, LruTtlCache};
pub use config::{ScanConfig, DEFAULT_EXCLUDED_DIRS};
pub use error::{Result, ScanError};
pub use manager::ParserManager;
pub use memory::MemorySnapshot;
pub use metadata::FileMetadata;
pub use scanner::DirectoryScanner;
pub use stats::{ScanReport, ScanStats};
pub use stream::{StreamConfig, StreamManager};

pub use baseline_dialects::{DetectedFeature, FeatureType};
