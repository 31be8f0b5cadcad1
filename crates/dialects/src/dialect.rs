use crate::error::Result;
use crate::grammar::GrammarSet;
use crate::plain::{MarkupParser, ScriptParser, StyleParser};
use crate::svelte::SvelteParser;
use crate::types::DetectedFeature;
use crate::vue::VueParser;
use std::path::Path;
use std::sync::Arc;

/// Feature extraction for one source dialect
pub trait DialectParser: Send + Sync {
    /// Dialect name used in logs and stats
    fn name(&self) -> &'static str;

    /// Lowercase file extensions (without dot) this dialect claims
    fn supported_extensions(&self) -> &'static [&'static str];

    /// Whether this dialect claims `path`
    fn can_parse(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.supported_extensions()
                    .iter()
                    .any(|candidate| candidate.eq_ignore_ascii_case(ext))
            })
    }

    /// False when a grammar this dialect needs failed to load
    fn is_enabled(&self) -> bool {
        true
    }

    /// Extract raw features from `content`, reporting positions in file space
    fn parse_features(&self, content: &str, path: &Path) -> Result<Vec<DetectedFeature>>;
}

/// Built-in dialects in priority order, over the process-wide grammar set
#[must_use]
pub fn default_parsers() -> Vec<Arc<dyn DialectParser>> {
    default_parsers_with(GrammarSet::shared())
}

/// Built-in dialects in priority order, over an explicit grammar set
#[must_use]
pub fn default_parsers_with(grammars: Arc<GrammarSet>) -> Vec<Arc<dyn DialectParser>> {
    vec![
        Arc::new(VueParser::new(grammars.clone())),
        Arc::new(SvelteParser::new(grammars.clone())),
        Arc::new(ScriptParser::new(grammars.clone())),
        Arc::new(StyleParser::new(grammars.clone())),
        Arc::new(MarkupParser::new(grammars)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;
    use std::collections::HashSet;

    #[test]
    fn default_extensions_are_disjoint() {
        let mut seen = HashSet::new();
        for parser in default_parsers() {
            for ext in parser.supported_extensions() {
                assert!(seen.insert(*ext), "extension {ext} claimed twice");
            }
        }
    }

    #[test]
    fn can_parse_is_case_insensitive() {
        let parsers = default_parsers();
        let claim = |file: &str| {
            parsers
                .iter()
                .find(|p| p.can_parse(Path::new(file)))
                .map(|p| p.name())
        };
        assert_eq!(claim("App.vue"), Some("vue"));
        assert_eq!(claim("App.VUE"), Some("vue"));
        assert_eq!(claim("Card.svelte"), Some("svelte"));
        assert_eq!(claim("main.ts"), Some("script"));
        assert_eq!(claim("site.css"), Some("style"));
        assert_eq!(claim("index.html"), Some("markup"));
        assert_eq!(claim("README.md"), None);
        assert_eq!(claim("Makefile"), None);
    }

    #[test]
    fn missing_html_grammar_disables_component_dialects() {
        let grammars = Arc::new(GrammarSet::acquire().without(Grammar::Html));
        let parsers = default_parsers_with(grammars);
        let enabled: Vec<_> = parsers
            .iter()
            .filter(|p| p.is_enabled())
            .map(|p| p.name())
            .collect();
        assert_eq!(enabled, vec!["script", "style"]);
    }
}
