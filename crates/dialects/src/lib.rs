//! # Baseline Dialects
//!
//! Dialect-aware detection of web-platform feature usages.
//!
//! ## Architecture
//!
//! ```text
//! Source File
//!     │
//!     ├──> Dialect selection (from extension)
//!     │
//!     ├──> Tree-sitter parsing of the enclosing document
//!     │      └─> <script> / <style> / markup regions
//!     │
//!     ├──> Region walkers
//!     │    ├─> Script: platform API catalog + modern syntax node kinds
//!     │    ├─> Style: declarations, modern pseudo-classes, at-rules
//!     │    └─> Markup: modern elements/attributes, directives skipped
//!     │
//!     └──> DetectedFeature[] in file line/column space
//! ```
//!
//! ## Example
//!
//! ```rust
//! use baseline_dialects::{default_parsers, DialectParser, FeatureType};
//! use std::path::Path;
//!
//! let parsers = default_parsers();
//! let path = Path::new("app.js");
//! let parser = parsers.iter().find(|p| p.can_parse(path)).unwrap();
//!
//! let features = parser.parse_features("const x = a?.b ?? c;", path).unwrap();
//! assert!(features.iter().any(|f| f.feature == "optional-chaining"));
//! assert!(features.iter().all(|f| f.feature_type == FeatureType::Script));
//! ```

mod catalog;
mod dialect;
mod error;
mod grammar;
mod markup;
mod plain;
mod region;
mod script;
mod style;
mod svelte;
mod types;
mod vue;

pub use dialect::{default_parsers, default_parsers_with, DialectParser};
pub use error::{DialectError, Result};
pub use grammar::{Grammar, GrammarSet};
pub use plain::{MarkupParser, ScriptParser, StyleParser};
pub use region::Region;
pub use svelte::SvelteParser;
pub use types::{DetectedFeature, FeatureType, MAX_RAW_CONTEXT_CHARS};
pub use vue::VueParser;
