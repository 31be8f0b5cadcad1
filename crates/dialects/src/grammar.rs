use crate::error::{DialectError, Result};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use tree_sitter::{Parser, Tree};

/// Structural grammar used to parse a document or one of its regions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grammar {
    JavaScript,
    TypeScript,
    Tsx,
    Css,
    Html,
}

impl Grammar {
    pub const ALL: [Self; 5] = [
        Self::JavaScript,
        Self::TypeScript,
        Self::Tsx,
        Self::Css,
        Self::Html,
    ];

    /// Get grammar name as string
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Tsx => "tsx",
            Self::Css => "css",
            Self::Html => "html",
        }
    }

    /// Detect grammar from file extension
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "js" | "mjs" | "cjs" | "jsx" => Some(Self::JavaScript),
            "ts" | "mts" | "cts" => Some(Self::TypeScript),
            "tsx" => Some(Self::Tsx),
            "css" => Some(Self::Css),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }

    /// Detect grammar from file path
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Grammar for a `<script lang="...">` block; `None` when the language is not script we parse
    #[must_use]
    pub fn for_script_lang(lang: Option<&str>) -> Option<Self> {
        match lang.map(|l| l.trim().to_lowercase()).as_deref() {
            None | Some("" | "js" | "jsx" | "javascript") => Some(Self::JavaScript),
            Some("ts" | "typescript") => Some(Self::TypeScript),
            Some("tsx") => Some(Self::Tsx),
            Some(_) => None,
        }
    }

    /// Whether a `<style lang="...">` block can be walked with the CSS grammar
    #[must_use]
    pub fn style_lang_supported(lang: Option<&str>) -> bool {
        !matches!(
            lang.map(|l| l.trim().to_lowercase()).as_deref(),
            Some("sass" | "stylus" | "styl")
        )
    }

    fn tree_sitter_language(self) -> tree_sitter::Language {
        match self {
            Self::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Self::Css => tree_sitter_css::LANGUAGE.into(),
            Self::Html => tree_sitter_html::LANGUAGE.into(),
        }
    }
}

/// The set of grammars that loaded successfully for this process.
///
/// Acquisition checks every grammar against the linked tree-sitter runtime once. A grammar
/// that fails is logged a single time and left out; dialects needing it report themselves
/// as disabled rather than failing per file.
#[derive(Clone)]
pub struct GrammarSet {
    languages: HashMap<Grammar, tree_sitter::Language>,
}

impl GrammarSet {
    /// Load and check every known grammar
    #[must_use]
    pub fn acquire() -> Self {
        let mut languages = HashMap::new();
        for grammar in Grammar::ALL {
            let language = grammar.tree_sitter_language();
            let mut parser = Parser::new();
            match parser.set_language(&language) {
                Ok(()) => {
                    languages.insert(grammar, language);
                }
                Err(e) => {
                    log::warn!(
                        "Grammar {} failed to load, dependent dialects disabled: {e}",
                        grammar.as_str()
                    );
                }
            }
        }
        Self { languages }
    }

    /// Process-wide grammar set, acquired on first use
    pub fn shared() -> Arc<Self> {
        static SHARED: OnceLock<Arc<GrammarSet>> = OnceLock::new();
        SHARED.get_or_init(|| Arc::new(Self::acquire())).clone()
    }

    /// Copy of this set with one grammar removed
    #[must_use]
    pub fn without(mut self, grammar: Grammar) -> Self {
        self.languages.remove(&grammar);
        self
    }

    #[must_use]
    pub fn is_available(&self, grammar: Grammar) -> bool {
        self.languages.contains_key(&grammar)
    }

    /// Fresh parser bound to `grammar`
    pub fn parser(&self, grammar: Grammar) -> Result<Parser> {
        let language = self
            .languages
            .get(&grammar)
            .ok_or_else(|| DialectError::grammar_unavailable(grammar.as_str()))?;
        let mut parser = Parser::new();
        parser
            .set_language(language)
            .map_err(|e| DialectError::tree_sitter(format!("Failed to set language: {e}")))?;
        Ok(parser)
    }

    /// Parse `source` with `grammar`
    pub fn parse(&self, grammar: Grammar, source: &str) -> Result<Tree> {
        self.parser(grammar)?
            .parse(source, None)
            .ok_or_else(|| DialectError::tree_sitter("Failed to parse source code"))
    }
}

impl std::fmt::Debug for GrammarSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut loaded: Vec<_> = self.languages.keys().map(|g| g.as_str()).collect();
        loaded.sort_unstable();
        f.debug_struct("GrammarSet").field("loaded", &loaded).finish()
    }
}
