use baseline_dialects::{default_parsers, DetectedFeature};
use baseline_registry::{FeatureRegistry, FeatureValidator};
use pretty_assertions::assert_eq;
use std::path::Path;
use std::sync::Arc;

const REGISTRY: &str = r#"{
    "features": {
        "optional-chaining": {"name": "Optional chaining", "status": {"baseline": "high"}},
        "nullish-coalescing": {"name": "Nullish coalescing", "status": {"baseline": "high"}},
        "container-queries": {"name": "Container queries", "status": {"baseline": "low"}},
        "dialog": {"name": "<dialog>", "status": {"baseline": "high"}},
        "async-clipboard": {"name": "Async clipboard", "status": {"baseline": "low"}},
        "useFoo": {"name": "Not a platform feature"}
    }
}"#;

fn validator() -> FeatureValidator {
    let registry = FeatureRegistry::from_json_str(REGISTRY).unwrap();
    FeatureValidator::new(Arc::new(registry))
}

fn raw(file: &str, source: &str) -> Vec<DetectedFeature> {
    let parsers = default_parsers();
    let path = Path::new(file);
    let parser = parsers.iter().find(|p| p.can_parse(path)).unwrap();
    parser.parse_features(source, path).unwrap()
}

fn ids(features: &[DetectedFeature]) -> Vec<&str> {
    features.iter().map(|f| f.feature.as_str()).collect()
}

#[tokio::test]
async fn optional_chaining_and_nullish_coalescing() {
    let features = validator()
        .validate_features(raw("app.js", "const x = a?.b ?? c;\n"), 10)
        .await;
    let mut found = ids(&features);
    found.sort_unstable();
    assert_eq!(found, vec!["nullish-coalescing", "optional-chaining"]);
    assert!(features.iter().all(|f| f.line == 1));
}

#[tokio::test]
async fn container_type_maps_to_container_queries() {
    let features = validator()
        .validate_features(
            raw("card.css", ".card {\n  container-type: inline-size;\n}\n"),
            10,
        )
        .await;
    assert_eq!(ids(&features), vec!["container-queries"]);
    assert_eq!(features[0].line, 2);
    assert_eq!(features[0].context, "container-type: inline-size");
}

#[tokio::test]
async fn dialog_element_is_kept_with_wrapped_context() {
    let features = validator()
        .validate_features(raw("page.html", "<body>\n<dialog open>Hi</dialog>\n</body>\n"), 10)
        .await;
    assert_eq!(ids(&features), vec!["dialog"]);
    assert!(features[0].context.starts_with('<'));
    assert!(features[0].context.ends_with('>'));
}

#[tokio::test]
async fn framework_hooks_are_dropped_even_when_registered() {
    let feature = DetectedFeature::new(
        "useFoo",
        baseline_dialects::FeatureType::Script,
        "const foo = useFoo()",
        "hooks.ts",
        1,
        12,
    );
    let features = validator().validate_features(vec![feature], 10).await;
    assert!(features.is_empty());
}

#[tokio::test]
async fn duplicate_usages_collapse_to_one() {
    let source = "navigator.clipboard.writeText(a);\n";
    let mut features = raw("copy.js", source);
    features.extend(raw("copy.js", source));

    let validated = validator().validate_features(features, 2).await;
    let clipboard: Vec<_> = validated
        .iter()
        .filter(|f| f.feature == "async-clipboard")
        .collect();
    assert_eq!(clipboard.len(), 1);
}

#[tokio::test]
async fn validation_is_idempotent() {
    let source = "const x = a?.b ?? c;\nawait fetch('/x');\n";
    let first = validator().validate_features(raw("app.mjs", source), 3).await;
    let second = validator().validate_features(raw("app.mjs", source), 3).await;
    assert_eq!(first, second);
}
