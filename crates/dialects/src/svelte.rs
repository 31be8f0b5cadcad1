use crate::dialect::DialectParser;
use crate::error::Result;
use crate::grammar::{Grammar, GrammarSet};
use crate::markup::{MarkupRules, MarkupScanner};
use crate::plain::scan_embedded_blocks;
use crate::region::{collect_embedded, Region};
use crate::types::DetectedFeature;
use std::path::Path;
use std::sync::Arc;

/// Lifecycle functions, store primitives, and runes.
const SVELTE_EXCLUSIONS: &[&str] = &[
    "onMount",
    "onDestroy",
    "beforeUpdate",
    "afterUpdate",
    "tick",
    "setContext",
    "getContext",
    "hasContext",
    "createEventDispatcher",
    "writable",
    "readable",
    "derived",
    "get",
    "$state",
    "$derived",
    "$effect",
    "$props",
    "$bindable",
    "$inspect",
    "$host",
];

const SVELTE_MARKUP: MarkupRules = MarkupRules {
    directive_prefixes: &[
        "on:",
        "bind:",
        "use:",
        "class:",
        "style:",
        "transition:",
        "in:",
        "out:",
        "animate:",
        "let:",
        "{",
    ],
    tag_prefixes: &["svelte:"],
    skip_component_tags: true,
    directive_wrappers: &[],
};

/// Svelte components: instance/module scripts, one style block, and top-level markup
/// interleaved with `{#...}` logic blocks.
pub struct SvelteParser {
    grammars: Arc<GrammarSet>,
}

impl SvelteParser {
    #[must_use]
    pub fn new(grammars: Arc<GrammarSet>) -> Self {
        Self { grammars }
    }
}

impl DialectParser for SvelteParser {
    fn name(&self) -> &'static str {
        "svelte"
    }

    fn supported_extensions(&self) -> &'static [&'static str] {
        &["svelte"]
    }

    fn is_enabled(&self) -> bool {
        self.grammars.is_available(Grammar::Html)
    }

    fn parse_features(&self, content: &str, path: &Path) -> Result<Vec<DetectedFeature>> {
        let file = path.to_string_lossy();
        let tree = self.grammars.parse(Grammar::Html, content)?;
        let root = tree.root_node();

        let blocks = collect_embedded(root, content);
        let mut features =
            scan_embedded_blocks(&self.grammars, &blocks, &file, SVELTE_EXCLUSIONS)?;

        MarkupScanner::new(content, &file, Region::origin(), SVELTE_MARKUP)
            .scan(root, &mut features);
        Ok(features)
    }
}
