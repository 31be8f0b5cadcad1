use crate::dialect::DialectParser;
use crate::error::Result;
use crate::grammar::{Grammar, GrammarSet};
use crate::markup::{MarkupRules, MarkupScanner};
use crate::plain::scan_embedded_blocks;
use crate::region::{collect_embedded, tag_name, Region};
use crate::types::DetectedFeature;
use std::path::Path;
use std::sync::Arc;

/// Composition API primitives, lifecycle hooks, and instance members. None of these are
/// platform features even when a catalog entry shares the name.
const VUE_EXCLUSIONS: &[&str] = &[
    "onMounted",
    "onBeforeMount",
    "onUpdated",
    "onBeforeUpdate",
    "onUnmounted",
    "onBeforeUnmount",
    "onActivated",
    "onDeactivated",
    "onErrorCaptured",
    "onServerPrefetch",
    "ref",
    "reactive",
    "computed",
    "watch",
    "watchEffect",
    "defineProps",
    "defineEmits",
    "defineExpose",
    "defineModel",
    "withDefaults",
    "nextTick",
    "provide",
    "inject",
    "h",
    "useSlots",
    "useAttrs",
    "$refs",
    "$emit",
    "$el",
    "$nextTick",
];

const VUE_MARKUP: MarkupRules = MarkupRules {
    directive_prefixes: &["v-", ":", "@", "#"],
    tag_prefixes: &[],
    skip_component_tags: true,
    directive_wrappers: &["template"],
};

/// Vue single-file components.
///
/// The file is parsed with the HTML grammar; `<script>` and `<style>` blocks are re-parsed
/// with their own grammars and the top-level `<template>` body is walked as markup. Custom
/// blocks (`<i18n>`, `<docs>`) are ignored.
pub struct VueParser {
    grammars: Arc<GrammarSet>,
}

impl VueParser {
    #[must_use]
    pub fn new(grammars: Arc<GrammarSet>) -> Self {
        Self { grammars }
    }
}

impl DialectParser for VueParser {
    fn name(&self) -> &'static str {
        "vue"
    }

    fn supported_extensions(&self) -> &'static [&'static str] {
        &["vue"]
    }

    fn is_enabled(&self) -> bool {
        self.grammars.is_available(Grammar::Html)
    }

    fn parse_features(&self, content: &str, path: &Path) -> Result<Vec<DetectedFeature>> {
        let file = path.to_string_lossy();
        let tree = self.grammars.parse(Grammar::Html, content)?;
        let root = tree.root_node();

        let blocks = collect_embedded(root, content);
        let mut features = scan_embedded_blocks(&self.grammars, &blocks, &file, VUE_EXCLUSIONS)?;

        let markup = MarkupScanner::new(content, &file, Region::origin(), VUE_MARKUP);
        let mut cursor = root.walk();
        for block in root.children(&mut cursor) {
            if block.kind() != "element" || tag_name(block, content) != Some("template") {
                continue;
            }
            // Walk the template body only; the wrapper tag itself is SFC structure.
            let mut body_cursor = block.walk();
            for child in block.children(&mut body_cursor) {
                if !matches!(child.kind(), "start_tag" | "end_tag") {
                    markup.scan(child, &mut features);
                }
            }
        }

        Ok(features)
    }
}
