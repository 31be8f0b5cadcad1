//! # Baseline Registry
//!
//! Canonical feature vocabulary and the validation pass that maps raw parser tokens onto
//! it.
//!
//! ## Pipeline
//!
//! ```text
//! raw DetectedFeature[]
//!     │
//!     ├──> batches (validated concurrently)
//!     │      ├─> dialect-noise filter (hooks, runes, directives)
//!     │      ├─> id resolution (alias → dotted segments → custom property → registry id)
//!     │      ├─> registry membership check
//!     │      └─> context reshaping per feature type
//!     │
//!     └──> dedup on (id, file, line, column), first occurrence wins
//! ```
//!
//! ## Example
//!
//! ```rust
//! use baseline_dialects::{DetectedFeature, FeatureType};
//! use baseline_registry::{BaselineStatus, FeatureEntry, FeatureRegistry, FeatureValidator};
//! use std::sync::Arc;
//!
//! let registry = FeatureRegistry::from_entries([(
//!     "container-queries",
//!     FeatureEntry::new("Container queries", BaselineStatus::Low),
//! )]);
//! let validator = FeatureValidator::new(Arc::new(registry));
//!
//! let raw = DetectedFeature::new(
//!     "container-type",
//!     FeatureType::Style,
//!     "container-type: inline-size",
//!     "card.css",
//!     3,
//!     2,
//! );
//! let feature = validator.normalize(&raw).unwrap().unwrap();
//! assert_eq!(feature.feature, "container-queries");
//! ```

mod aliases;
mod context;
mod error;
mod registry;
mod validator;

pub use context::{format_context, MAX_CONTEXT_CHARS};
pub use error::{RegistryError, Result};
pub use registry::{BaselineStatus, FeatureEntry, FeatureRegistry, FeatureStatus};
pub use validator::{FeatureValidator, ValidatorConfig, DEFAULT_BATCH_SIZE};
