use crate::cache::CacheManager;
use crate::config::ScanConfig;
use crate::error::{Result, ScanError};
use crate::metadata::FileMetadata;
use crate::scanner::DirectoryScanner;
use crate::stats::{ScanReport, ScanStats};
use crate::stream::{StreamConfig, StreamManager};
use baseline_dialects::{default_parsers, DetectedFeature, DialectParser};
use baseline_registry::{FeatureRegistry, FeatureValidator, ValidatorConfig};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Where a file's features came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Cache,
    Parsed,
    Streamed,
}

struct FileOutcome {
    path: PathBuf,
    dialect: &'static str,
    result: Result<(Vec<DetectedFeature>, Origin)>,
}

struct ManagerInner {
    config: ScanConfig,
    parsers: Vec<Arc<dyn DialectParser>>,
    cache: CacheManager,
    validator: FeatureValidator,
    streams: StreamManager,
}

/// Orchestrates a scan: dispatch by dialect, cache lookup, bounded parallel parsing,
/// then one validation pass over everything collected.
///
/// Cloning is cheap; clones share the cache.
#[derive(Clone)]
pub struct ParserManager {
    inner: Arc<ManagerInner>,
}

impl ParserManager {
    /// Built-in dialects over the process-wide registry named by `config.registry_path`
    pub fn new(config: ScanConfig) -> Result<Self> {
        config.validate()?;
        let registry = FeatureRegistry::shared(config.registry_path.as_deref());
        Self::with_parts(config, default_parsers(), registry)
    }

    /// Explicit dialect list (priority order) and registry
    pub fn with_parts(
        config: ScanConfig,
        parsers: Vec<Arc<dyn DialectParser>>,
        registry: Arc<FeatureRegistry>,
    ) -> Result<Self> {
        config.validate()?;

        let mut owners: HashMap<&'static str, &'static str> = HashMap::new();
        let mut active = Vec::with_capacity(parsers.len());
        for parser in parsers {
            if !parser.is_enabled() {
                log::warn!(
                    "Dialect {} disabled for this run: grammar unavailable",
                    parser.name()
                );
                continue;
            }
            for ext in parser.supported_extensions() {
                match owners.get(ext) {
                    Some(owner) => log::warn!(
                        "Extension .{ext} claimed by {owner} and {}; {owner} wins",
                        parser.name()
                    ),
                    None => {
                        owners.insert(*ext, parser.name());
                    }
                }
            }
            active.push(parser);
        }

        let validator = FeatureValidator::with_config(
            registry,
            ValidatorConfig {
                batch_size: config.validation_batch_size,
                max_context_chars: config.max_context_chars,
            },
        );

        Ok(Self {
            inner: Arc::new(ManagerInner {
                cache: CacheManager::new(config.cache_capacity, config.cache_ttl()),
                streams: StreamManager::new(StreamConfig::from(&config)),
                parsers: active,
                validator,
                config,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ScanConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn cache(&self) -> &CacheManager {
        &self.inner.cache
    }

    #[must_use]
    pub fn validator(&self) -> &FeatureValidator {
        &self.inner.validator
    }

    #[must_use]
    pub fn streams(&self) -> &StreamManager {
        &self.inner.streams
    }

    /// Names of the enabled dialects, in priority order
    #[must_use]
    pub fn dialects(&self) -> Vec<&'static str> {
        self.inner.parsers.iter().map(|p| p.name()).collect()
    }

    /// First enabled dialect that claims `path`
    #[must_use]
    pub fn parser_for(&self, path: &Path) -> Option<&Arc<dyn DialectParser>> {
        self.inner.parsers.iter().find(|p| p.can_parse(path))
    }

    /// Validated, deduplicated features for `paths`; per-file failures are logged
    pub async fn parse_files(&self, paths: &[PathBuf]) -> Vec<DetectedFeature> {
        self.scan(paths).await.features
    }

    /// Like [`ParserManager::parse_files`], with run statistics
    pub async fn scan(&self, paths: &[PathBuf]) -> ScanReport {
        let start = Instant::now();
        let mut stats = ScanStats::new();
        stats.files_considered = paths.len();

        let expired = self.inner.cache.sweep_expired();
        if expired > 0 {
            log::debug!("Dropped {expired} expired cache entries");
        }

        let claimed: Vec<PathBuf> = paths
            .iter()
            .filter(|path| self.parser_for(path).is_some())
            .cloned()
            .collect();
        stats.files_skipped = paths.len() - claimed.len();

        let concurrency = self.inner.config.concurrency;
        let outcomes = self
            .inner
            .streams
            .process_batches(claimed, concurrency, |batch| {
                let manager = self.clone();
                async move { Ok(manager.parse_batch(batch).await) }
            })
            .await;

        let mut raw = Vec::new();
        for outcome in outcomes {
            match outcome.result {
                Ok((features, origin)) => {
                    match origin {
                        Origin::Cache => stats.files_cached += 1,
                        Origin::Parsed => stats.files_parsed += 1,
                        Origin::Streamed => {
                            stats.files_parsed += 1;
                            stats.files_streamed += 1;
                        }
                    }
                    stats.add_file(outcome.dialect, features.len());
                    raw.extend(features);
                }
                Err(e) => stats.add_error(format!("{}: {e}", outcome.path.display())),
            }
        }

        let features = self
            .inner
            .validator
            .validate_features(raw, concurrency)
            .await;

        stats.validated_features = features.len();
        stats.time_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        log::info!(
            "Scanned {} files ({} parsed, {} cached, {} failed): {} features in {} ms",
            stats.files_considered,
            stats.files_parsed,
            stats.files_cached,
            stats.files_failed,
            stats.validated_features,
            stats.time_ms
        );

        ScanReport { features, stats }
    }

    /// Raw features of one file, bypassing the cache; every feature carries `path`
    pub async fn parse_file(&self, path: &Path) -> Result<Vec<DetectedFeature>> {
        let parser = self
            .parser_for(path)
            .cloned()
            .ok_or_else(|| ScanError::unsupported(path.display().to_string()))?;
        let (features, _) = self.parse_with(&parser, path).await?;
        Ok(features)
    }

    /// Files under `root` some enabled dialect claims
    #[must_use]
    pub fn scan_directory(&self, root: &Path) -> Vec<PathBuf> {
        DirectoryScanner::new(root)
            .with_excluded(&self.inner.config.exclude_dirs)
            .with_max_depth(self.inner.config.max_depth)
            .scan(|path| self.parser_for(path).is_some())
    }

    /// Walk `root` and scan everything found
    pub async fn parse_directory(&self, root: &Path) -> ScanReport {
        let manager = self.clone();
        let root_owned = root.to_path_buf();
        let files = match tokio::task::spawn_blocking(move || manager.scan_directory(&root_owned))
            .await
        {
            Ok(files) => files,
            Err(e) => {
                log::warn!("Directory walk of {} failed: {e}", root.display());
                Vec::new()
            }
        };
        self.scan(&files).await
    }

    /// Partition `paths` into (changed, unchanged) relative to the cache
    pub async fn changed_files(&self, paths: &[PathBuf]) -> (Vec<PathBuf>, Vec<PathBuf>) {
        self.inner.cache.get_changed_files(paths).await
    }

    async fn parse_batch(&self, batch: Vec<PathBuf>) -> Vec<FileOutcome> {
        let handles: Vec<_> = batch
            .into_iter()
            .map(|path| {
                let manager = self.clone();
                let task_path = path.clone();
                let handle = tokio::spawn(async move { manager.process_file(task_path).await });
                (path, handle)
            })
            .collect();

        let mut outcomes = Vec::with_capacity(handles.len());
        for (path, handle) in handles {
            match handle.await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    log::warn!("Parse task for {} failed: {e}", path.display());
                    outcomes.push(FileOutcome {
                        path,
                        dialect: "unknown",
                        result: Err(ScanError::from(e)),
                    });
                }
            }
        }
        outcomes
    }

    async fn process_file(&self, path: PathBuf) -> FileOutcome {
        let Some(parser) = self.parser_for(&path).cloned() else {
            return FileOutcome {
                result: Err(ScanError::unsupported(path.display().to_string())),
                dialect: "unknown",
                path,
            };
        };
        let dialect = parser.name();

        let metadata = FileMetadata::probe(&path).await;
        if let Some(current) = &metadata {
            if let Some(features) = self.inner.cache.get_matching(&path, current) {
                log::debug!("Cache hit for {}", path.display());
                return FileOutcome {
                    path,
                    dialect,
                    result: Ok((features, Origin::Cache)),
                };
            }
        }

        let result = match self.parse_with(&parser, &path).await {
            Ok((features, origin)) => {
                if let Some(current) = metadata {
                    self.inner
                        .cache
                        .set_with_metadata(&path, features.clone(), current);
                }
                Ok((features, origin))
            }
            Err(e) => {
                log::warn!("Skipping {} [{}]: {e}", path.display(), e.kind());
                Err(e)
            }
        };

        FileOutcome {
            path,
            dialect,
            result,
        }
    }

    async fn parse_with(
        &self,
        parser: &Arc<dyn DialectParser>,
        path: &Path,
    ) -> Result<(Vec<DetectedFeature>, Origin)> {
        let size = tokio::fs::metadata(path).await?.len();

        let (features, origin) = if self.inner.streams.should_stream(size) {
            log::debug!("Streaming {} ({size} bytes)", path.display());
            let mut features = Vec::new();
            self.inner
                .streams
                .read_file_streaming(path, |chunk, start_line| {
                    let chunk_features = parser.parse_features(chunk, path)?;
                    features.extend(
                        chunk_features
                            .into_iter()
                            .map(|f| f.offset_lines(start_line - 1)),
                    );
                    Ok(())
                })
                .await?;
            (features, Origin::Streamed)
        } else {
            let content = tokio::fs::read_to_string(path).await?;
            let parser = parser.clone();
            let owned = path.to_path_buf();
            let features =
                tokio::task::spawn_blocking(move || parser.parse_features(&content, &owned))
                    .await??;
            (features, Origin::Parsed)
        };

        let file = path.display().to_string();
        let tagged = features
            .into_iter()
            .map(|f| f.with_file(file.clone()))
            .collect();
        Ok((tagged, origin))
    }
}

impl std::fmt::Debug for ParserManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParserManager")
            .field("dialects", &self.dialects())
            .field("config", &self.inner.config)
            .field("cache", &self.inner.cache)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use baseline_dialects::FeatureType;
    use baseline_registry::{BaselineStatus, FeatureEntry};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    /// Claims `.js` but always fails
    struct BrokenScript;

    impl DialectParser for BrokenScript {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn supported_extensions(&self) -> &'static [&'static str] {
            &["js"]
        }

        fn parse_features(
            &self,
            _: &str,
            path: &Path,
        ) -> baseline_dialects::Result<Vec<DetectedFeature>> {
            Err(baseline_dialects::DialectError::syntax(
                path.display().to_string(),
                1,
                "unexpected token",
            ))
        }
    }

    /// Disabled stand-in for a dialect whose grammar failed to load
    struct Disabled;

    impl DialectParser for Disabled {
        fn name(&self) -> &'static str {
            "disabled"
        }

        fn supported_extensions(&self) -> &'static [&'static str] {
            &["css"]
        }

        fn is_enabled(&self) -> bool {
            false
        }

        fn parse_features(
            &self,
            _: &str,
            _: &Path,
        ) -> baseline_dialects::Result<Vec<DetectedFeature>> {
            Ok(Vec::new())
        }
    }

    fn registry(ids: &[&str]) -> Arc<FeatureRegistry> {
        Arc::new(FeatureRegistry::from_entries(
            ids.iter()
                .map(|id| (*id, FeatureEntry::new(*id, BaselineStatus::High))),
        ))
    }

    fn config() -> ScanConfig {
        ScanConfig {
            batch_delay_ms: 0,
            ..ScanConfig::default()
        }
    }

    #[test]
    fn first_registered_dialect_wins() {
        let mut parsers: Vec<Arc<dyn DialectParser>> = vec![Arc::new(BrokenScript)];
        parsers.extend(default_parsers());
        let manager = ParserManager::with_parts(config(), parsers, registry(&[])).unwrap();

        let claim = |file: &str| manager.parser_for(Path::new(file)).map(|p| p.name());
        assert_eq!(claim("app.js"), Some("broken"));
        assert_eq!(claim("app.ts"), Some("script"));
        assert_eq!(claim("README.md"), None);
    }

    #[test]
    fn disabled_dialects_are_dropped() {
        let parsers: Vec<Arc<dyn DialectParser>> = vec![Arc::new(Disabled)];
        let manager = ParserManager::with_parts(config(), parsers, registry(&[])).unwrap();
        assert!(manager.dialects().is_empty());
        assert!(manager.parser_for(Path::new("a.css")).is_none());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let bad = ScanConfig {
            concurrency: 0,
            ..ScanConfig::default()
        };
        assert!(ParserManager::with_parts(bad, default_parsers(), registry(&[])).is_err());
    }

    #[tokio::test]
    async fn failing_file_does_not_cancel_siblings() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.js");
        let good = dir.path().join("good.css");
        std::fs::write(&bad, "whatever").unwrap();
        std::fs::write(&good, ".a { inset: 0; }\n").unwrap();

        let mut parsers: Vec<Arc<dyn DialectParser>> = vec![Arc::new(BrokenScript)];
        parsers.extend(default_parsers());
        let manager = ParserManager::with_parts(config(), parsers, registry(&["inset"])).unwrap();

        let report = manager.scan(&[bad, good.clone()]).await;
        assert_eq!(report.stats.files_failed, 1);
        assert_eq!(report.stats.files_parsed, 1);
        assert_eq!(report.features.len(), 1);
        assert_eq!(report.features[0].feature, "inset");
        assert_eq!(report.features[0].feature_type, FeatureType::Style);
        assert_eq!(report.features[0].file, good.display().to_string());
    }

    #[tokio::test]
    async fn expired_entries_are_swept_before_a_scan() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.css");
        let b = dir.path().join("b.css");
        std::fs::write(&a, ".a { inset: 0; }\n").unwrap();
        std::fs::write(&b, ".b { inset: 0; }\n").unwrap();

        let short_ttl = ScanConfig {
            cache_ttl_secs: 1,
            ..config()
        };
        let manager =
            ParserManager::with_parts(short_ttl, default_parsers(), registry(&["inset"])).unwrap();

        manager.scan(&[a]).await;
        assert_eq!(manager.cache().len(), 1);

        tokio::time::sleep(Duration::from_millis(1200)).await;
        manager.scan(&[b]).await;
        assert_eq!(manager.cache().len(), 1);
        assert_eq!(manager.cache().stats().expirations, 1);
    }

    #[tokio::test]
    async fn parse_file_rejects_unclaimed_paths() {
        let manager =
            ParserManager::with_parts(config(), default_parsers(), registry(&[])).unwrap();
        let err = manager.parse_file(Path::new("notes.txt")).await.unwrap_err();
        assert_eq!(err.kind(), "unsupported");
    }
}
