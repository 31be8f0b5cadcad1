use baseline_dialects::default_parsers;
use baseline_registry::{BaselineStatus, FeatureEntry, FeatureRegistry};
use baseline_scanner::{DetectedFeature, FeatureType, ParserManager, ScanConfig};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const REGISTRY_IDS: &[&str] = &[
    "optional-chaining",
    "nullish-coalescing",
    "container-queries",
    "dialog",
    "has",
    "fetch",
    "top-level-await",
    "async-clipboard",
];

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn registry() -> Arc<FeatureRegistry> {
    Arc::new(FeatureRegistry::from_entries(
        REGISTRY_IDS
            .iter()
            .map(|id| (*id, FeatureEntry::new(*id, BaselineStatus::Low))),
    ))
}

fn manager(config: ScanConfig) -> ParserManager {
    ParserManager::with_parts(config, default_parsers(), registry()).unwrap()
}

fn quick_config() -> ScanConfig {
    ScanConfig {
        batch_delay_ms: 0,
        concurrency: 2,
        ..ScanConfig::default()
    }
}

fn write(root: &Path, rel: &str, contents: &str) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, contents).unwrap();
    path
}

fn project(root: &Path) -> Vec<PathBuf> {
    vec![
        write(root, "src/app.js", "const x = a?.b ?? c;\n"),
        write(
            root,
            "src/card.css",
            ".card:has(img) {\n  container-type: inline-size;\n}\n",
        ),
        write(
            root,
            "src/index.html",
            "<!doctype html>\n<html>\n<body>\n<dialog open>Hello</dialog>\n</body>\n</html>\n",
        ),
        write(
            root,
            "src/Copy.vue",
            "<template>\n  <button @click=\"copy\">Copy</button>\n</template>\n\n<script setup>\nimport { onMounted } from 'vue'\nonMounted(() => {})\nconst copy = () => navigator.clipboard.writeText('x')\n</script>\n",
        ),
        write(root, "README.md", "# readme\n"),
    ]
}

fn find<'a>(features: &'a [DetectedFeature], id: &str) -> &'a DetectedFeature {
    features
        .iter()
        .find(|f| f.feature == id)
        .unwrap_or_else(|| panic!("{id} not found in {features:?}"))
}

#[tokio::test]
async fn scenario_features_are_canonicalized() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let paths = project(dir.path());

    let report = manager(quick_config()).scan(&paths).await;
    let features = &report.features;

    let optional = find(features, "optional-chaining");
    assert_eq!(optional.feature_type, FeatureType::Script);
    assert_eq!(optional.line, 1);
    assert!(optional.file.ends_with("app.js"));
    find(features, "nullish-coalescing");

    let container = find(features, "container-queries");
    assert_eq!(container.feature_type, FeatureType::Style);
    assert_eq!((container.line, container.column), (2, 2));
    assert_eq!(container.context, "container-type: inline-size");

    assert_eq!(find(features, "has").line, 1);

    let dialog = find(features, "dialog");
    assert_eq!(dialog.feature_type, FeatureType::Markup);
    assert_eq!(dialog.line, 4);
    assert!(dialog.context.starts_with("<dialog"));

    let clipboard = find(features, "async-clipboard");
    assert!(clipboard.file.ends_with("Copy.vue"));
    assert_eq!(clipboard.line, 8);

    assert!(features.iter().all(|f| f.feature != "onMounted"));
    assert!(features.iter().all(|f| REGISTRY_IDS.contains(&f.feature.as_str())));

    assert_eq!(report.stats.files_considered, 5);
    assert_eq!(report.stats.files_skipped, 1);
    assert_eq!(report.stats.files_parsed, 4);
    assert_eq!(report.stats.files_failed, 0);
    assert_eq!(report.stats.validated_features, features.len());
}

#[tokio::test]
async fn output_is_deduplicated() {
    let dir = tempfile::tempdir().unwrap();
    let paths = project(dir.path());

    let features = manager(quick_config()).parse_files(&paths).await;
    let mut keys: Vec<_> = features
        .iter()
        .map(|f| (f.feature.clone(), f.file.clone(), f.line, f.column))
        .collect();
    let total = keys.len();
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), total);
}

#[tokio::test]
async fn rescans_are_idempotent_and_cached() {
    let dir = tempfile::tempdir().unwrap();
    let paths = project(dir.path());
    let manager = manager(quick_config());

    let first = manager.scan(&paths).await;
    let second = manager.scan(&paths).await;

    assert_eq!(first.features, second.features);
    assert_eq!(second.stats.files_cached, 4);
    assert_eq!(second.stats.files_parsed, 0);
    assert_eq!(manager.cache().len(), 4);
}

#[tokio::test]
async fn edited_file_is_reparsed() {
    let dir = tempfile::tempdir().unwrap();
    let paths = project(dir.path());
    let manager = manager(quick_config());
    manager.scan(&paths).await;

    write(dir.path(), "src/app.js", "const y = await fetch('/x');\n");

    let (changed, unchanged) = manager.changed_files(&paths).await;
    assert_eq!(changed.len(), 2, "app.js and the unclaimed README: {changed:?}");
    assert!(changed.iter().any(|p| p.ends_with("src/app.js")));
    assert_eq!(unchanged.len(), 3);

    let report = manager.scan(&paths).await;
    assert_eq!(report.stats.files_parsed, 1);
    assert_eq!(report.stats.files_cached, 3);
    assert!(report.features.iter().all(|f| f.feature != "optional-chaining"));
    find(&report.features, "fetch");
    find(&report.features, "top-level-await");
}

#[tokio::test]
async fn unreadable_and_broken_files_are_isolated() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let mut paths = project(dir.path());
    paths.push(write(dir.path(), "src/broken.js", "const = ;\n"));
    paths.push(dir.path().join("src/missing.js"));

    let report = manager(quick_config()).scan(&paths).await;
    assert_eq!(report.stats.files_failed, 2);
    assert_eq!(report.stats.errors.len(), 2);
    find(&report.features, "optional-chaining");
    find(&report.features, "dialog");
}

#[tokio::test]
async fn streamed_files_match_whole_file_parsing() {
    let dir = tempfile::tempdir().unwrap();
    let body: String = (0..2500)
        .map(|i| format!("const v{i} = a{i}?.b ?? c{i};\n"))
        .collect();
    let path = write(dir.path(), "big.js", &body);
    let paths = vec![path];

    let whole = manager(quick_config()).scan(&paths).await;
    let streamed = manager(ScanConfig {
        stream_threshold_bytes: 1024,
        ..quick_config()
    })
    .scan(&paths)
    .await;

    assert_eq!(whole.stats.files_streamed, 0);
    assert_eq!(streamed.stats.files_streamed, 1);
    assert_eq!(whole.features.len(), 5000);
    assert_eq!(streamed.features, whole.features);

    let last = streamed.features.last().unwrap();
    assert_eq!(last.line, 2500);
}

#[tokio::test]
async fn directory_scan_honors_exclusions_and_depth() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    project(root);
    write(root, "node_modules/lib/index.js", "const x = a?.b;\n");
    write(root, "dist/bundle.js", "const x = a?.b;\n");
    write(root, "a/b/c/d/deep.js", "const x = a?.b;\n");

    let manager = manager(ScanConfig {
        max_depth: 4,
        ..quick_config()
    });

    let files = manager.scan_directory(root);
    let names: Vec<_> = files
        .iter()
        .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
        .collect();
    assert_eq!(
        names,
        vec!["src/Copy.vue", "src/app.js", "src/card.css", "src/index.html"]
    );

    let report = manager.parse_directory(root).await;
    assert_eq!(report.stats.files_considered, 4);
    find(&report.features, "dialog");
}
