use crate::aliases::{alias, is_dialect_noise, CUSTOM_PROPERTY_ID, CUSTOM_PROPERTY_PREFIX};
use crate::context::{format_context, MAX_CONTEXT_CHARS};
use crate::error::{RegistryError, Result};
use crate::registry::FeatureRegistry;
use baseline_dialects::DetectedFeature;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Default number of raw features validated per task
pub const DEFAULT_BATCH_SIZE: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorConfig {
    /// Raw features per validation task
    pub batch_size: usize,

    /// Cap for the rewritten context snippet
    pub max_context_chars: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            max_context_chars: MAX_CONTEXT_CHARS,
        }
    }
}

struct ValidatorInner {
    registry: Arc<FeatureRegistry>,
    config: ValidatorConfig,
}

/// Maps raw parser tokens onto canonical registry ids.
///
/// Cloning is cheap; clones share the registry.
#[derive(Clone)]
pub struct FeatureValidator {
    inner: Arc<ValidatorInner>,
}

impl FeatureValidator {
    pub fn new(registry: Arc<FeatureRegistry>) -> Self {
        Self::with_config(registry, ValidatorConfig::default())
    }

    pub fn with_config(registry: Arc<FeatureRegistry>, config: ValidatorConfig) -> Self {
        let config = ValidatorConfig {
            batch_size: config.batch_size.max(1),
            max_context_chars: config.max_context_chars.max(4),
        };
        Self {
            inner: Arc::new(ValidatorInner { registry, config }),
        }
    }

    #[must_use]
    pub fn registry(&self) -> &FeatureRegistry {
        &self.inner.registry
    }

    #[must_use]
    pub fn config(&self) -> ValidatorConfig {
        self.inner.config
    }

    /// Resolve a raw token to a canonical id present in the registry.
    ///
    /// Order: alias table on the raw name; for dotted names the trailing then the leading
    /// segment; custom-property prefix; the raw name as a registry id.
    #[must_use]
    pub fn resolve_id(&self, raw: &str) -> Option<String> {
        let candidate = alias(raw)
            .or_else(|| dotted_fallback(raw))
            .map(str::to_string)
            .or_else(|| {
                raw.starts_with(CUSTOM_PROPERTY_PREFIX)
                    .then(|| CUSTOM_PROPERTY_ID.to_string())
            })
            .or_else(|| self.registry().contains(raw).then(|| raw.to_string()))?;

        self.registry().contains(&candidate).then_some(candidate)
    }

    /// Validate one raw feature. `Ok(None)` means the feature was filtered out.
    pub fn normalize(&self, raw: &DetectedFeature) -> Result<Option<DetectedFeature>> {
        let name = raw.feature.trim();
        if name.is_empty() {
            return Err(RegistryError::InvalidFeature(format!(
                "empty feature name at {}:{}",
                raw.file, raw.line
            )));
        }
        if raw.line == 0 {
            return Err(RegistryError::InvalidFeature(format!(
                "{name} has line 0 in {}",
                raw.file
            )));
        }

        if is_dialect_noise(name) {
            return Ok(None);
        }

        let Some(id) = self.resolve_id(name) else {
            return Ok(None);
        };

        Ok(Some(DetectedFeature {
            context: format_context(
                raw.feature_type,
                name,
                &raw.context,
                self.inner.config.max_context_chars,
            ),
            feature: id,
            feature_type: raw.feature_type,
            file: raw.file.clone(),
            line: raw.line,
            column: raw.column,
        }))
    }

    /// Validate a batch; rejected features are logged and dropped.
    #[must_use]
    pub fn validate_batch(&self, batch: &[DetectedFeature]) -> Vec<DetectedFeature> {
        batch
            .iter()
            .filter_map(|raw| match self.normalize(raw) {
                Ok(feature) => feature,
                Err(e) => {
                    log::debug!("Dropping feature: {e}");
                    None
                }
            })
            .collect()
    }

    /// Validate every raw feature, at most `concurrency` batches in flight.
    ///
    /// Results keep input order, deduplicated on (id, file, line, column) with the first
    /// occurrence kept.
    pub async fn validate_features(
        &self,
        raw: Vec<DetectedFeature>,
        concurrency: usize,
    ) -> Vec<DetectedFeature> {
        if raw.is_empty() {
            return Vec::new();
        }

        let total = raw.len();
        let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
        let mut handles = Vec::new();

        for batch in raw.chunks(self.inner.config.batch_size) {
            let batch = batch.to_vec();
            let validator = self.clone();
            let semaphore = semaphore.clone();
            handles.push(tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                validator.validate_batch(&batch)
            }));
        }

        let mut seen = HashSet::new();
        let mut validated = Vec::new();
        for handle in handles {
            match handle.await {
                Ok(batch) => {
                    for feature in batch {
                        let key = (
                            feature.feature.clone(),
                            feature.file.clone(),
                            feature.line,
                            feature.column,
                        );
                        if seen.insert(key) {
                            validated.push(feature);
                        }
                    }
                }
                Err(e) => log::warn!("Validation task failed: {e}"),
            }
        }

        log::debug!("Validated {} of {total} raw features", validated.len());
        validated
    }
}

impl std::fmt::Debug for FeatureValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureValidator")
            .field("registry_features", &self.inner.registry.len())
            .field("config", &self.inner.config)
            .finish()
    }
}

fn dotted_fallback(raw: &str) -> Option<&'static str> {
    let (leading, _) = raw.split_once('.')?;
    let (_, trailing) = raw.rsplit_once('.')?;
    alias(trailing).or_else(|| alias(leading))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{BaselineStatus, FeatureEntry};
    use baseline_dialects::FeatureType;
    use pretty_assertions::assert_eq;

    fn registry(ids: &[&str]) -> Arc<FeatureRegistry> {
        Arc::new(FeatureRegistry::from_entries(
            ids.iter()
                .map(|id| (*id, FeatureEntry::new(*id, BaselineStatus::High))),
        ))
    }

    fn raw(name: &str, feature_type: FeatureType, context: &str, line: usize) -> DetectedFeature {
        DetectedFeature::new(name, feature_type, context, "src/app.ts", line, 0)
    }

    #[test]
    fn resolves_aliases_and_dotted_segments() {
        let validator = FeatureValidator::new(registry(&[
            "async-clipboard",
            "intersection-observer",
            "fetch",
            "custom-properties",
        ]));

        assert_eq!(
            validator.resolve_id("navigator.clipboard").as_deref(),
            Some("async-clipboard")
        );
        assert_eq!(
            validator.resolve_id("navigator.clipboard.writeText").as_deref(),
            Some("async-clipboard")
        );
        assert_eq!(
            validator.resolve_id("IntersectionObserver").as_deref(),
            Some("intersection-observer")
        );
        assert_eq!(validator.resolve_id("fetch.bind").as_deref(), Some("fetch"));
        assert_eq!(validator.resolve_id("--brand").as_deref(), Some("custom-properties"));
    }

    #[test]
    fn unresolved_or_unregistered_ids_are_dropped() {
        let validator = FeatureValidator::new(registry(&["dialog"]));
        assert_eq!(validator.resolve_id("container-type"), None);
        assert_eq!(validator.resolve_id("made-up-thing"), None);
        assert_eq!(validator.resolve_id("dialog").as_deref(), Some("dialog"));
    }

    #[test]
    fn registry_ids_resolve_directly() {
        let validator = FeatureValidator::new(registry(&["user-select"]));
        assert_eq!(
            validator.resolve_id("user-select").as_deref(),
            Some("user-select")
        );
    }

    #[test]
    fn noise_wins_over_registry_membership() {
        let validator = FeatureValidator::new(registry(&["useFoo", "onMounted"]));
        let feature = raw("useFoo", FeatureType::Script, "useFoo()", 1);
        assert_eq!(validator.normalize(&feature).unwrap(), None);
        let hook = raw("onMounted", FeatureType::Script, "onMounted(() => {})", 2);
        assert_eq!(validator.normalize(&hook).unwrap(), None);
    }

    #[test]
    fn normalize_rewrites_id_and_context() {
        let validator = FeatureValidator::new(registry(&["container-queries"]));
        let feature = raw(
            "container-type",
            FeatureType::Style,
            "container-type: inline-size",
            4,
        );
        let normalized = validator.normalize(&feature).unwrap().unwrap();
        assert_eq!(normalized.feature, "container-queries");
        assert_eq!(normalized.context, "container-type: inline-size");
        assert_eq!((normalized.line, normalized.column), (4, 0));
        assert_eq!(normalized.file, "src/app.ts");
    }

    #[test]
    fn malformed_features_are_errors() {
        let validator = FeatureValidator::new(registry(&["dialog"]));
        let mut feature = raw("dialog", FeatureType::Markup, "<dialog>", 1);
        feature.feature = "  ".to_string();
        assert!(validator.normalize(&feature).is_err());
        assert!(validator.validate_batch(&[feature]).is_empty());
    }

    #[tokio::test]
    async fn dedup_keeps_first_across_batches() {
        let validator = FeatureValidator::with_config(
            registry(&["async-clipboard"]),
            ValidatorConfig {
                batch_size: 1,
                ..ValidatorConfig::default()
            },
        );
        let first = raw("navigator.clipboard", FeatureType::Script, "first", 3);
        let second = raw("writeText", FeatureType::Script, "second", 3);
        let other_line = raw("readText", FeatureType::Script, "third", 5);

        let validated = validator
            .validate_features(vec![first, second, other_line], 4)
            .await;

        assert_eq!(validated.len(), 2);
        assert_eq!(validated[0].context, "first");
        assert_eq!(validated[1].line, 5);
    }

    #[tokio::test]
    async fn empty_input_is_empty_output() {
        let validator = FeatureValidator::new(registry(&[]));
        assert!(validator.validate_features(Vec::new(), 10).await.is_empty());
    }
}
