use crate::dialect::DialectParser;
use crate::error::{DialectError, Result};
use crate::grammar::{Grammar, GrammarSet};
use crate::markup::{MarkupRules, MarkupScanner};
use crate::region::{collect_embedded, BlockKind, EmbeddedBlock, Region};
use crate::script::ScriptScanner;
use crate::style::StyleScanner;
use crate::types::DetectedFeature;
use std::path::Path;
use std::sync::Arc;

/// Standalone JavaScript / TypeScript modules
pub struct ScriptParser {
    grammars: Arc<GrammarSet>,
}

impl ScriptParser {
    #[must_use]
    pub fn new(grammars: Arc<GrammarSet>) -> Self {
        Self { grammars }
    }
}

impl DialectParser for ScriptParser {
    fn name(&self) -> &'static str {
        "script"
    }

    fn supported_extensions(&self) -> &'static [&'static str] {
        &["js", "mjs", "cjs", "jsx", "ts", "mts", "cts", "tsx"]
    }

    fn is_enabled(&self) -> bool {
        [Grammar::JavaScript, Grammar::TypeScript, Grammar::Tsx]
            .into_iter()
            .any(|g| self.grammars.is_available(g))
    }

    fn parse_features(&self, content: &str, path: &Path) -> Result<Vec<DetectedFeature>> {
        let grammar = Grammar::from_path(path).unwrap_or(Grammar::JavaScript);
        let file = path.to_string_lossy();
        ScriptScanner::new(content, &file, Region::origin(), &[]).scan(&self.grammars, grammar)
    }
}

/// Standalone stylesheets
pub struct StyleParser {
    grammars: Arc<GrammarSet>,
}

impl StyleParser {
    #[must_use]
    pub fn new(grammars: Arc<GrammarSet>) -> Self {
        Self { grammars }
    }
}

impl DialectParser for StyleParser {
    fn name(&self) -> &'static str {
        "style"
    }

    fn supported_extensions(&self) -> &'static [&'static str] {
        &["css"]
    }

    fn is_enabled(&self) -> bool {
        self.grammars.is_available(Grammar::Css)
    }

    fn parse_features(&self, content: &str, path: &Path) -> Result<Vec<DetectedFeature>> {
        let file = path.to_string_lossy();
        StyleScanner::new(content, &file, Region::origin()).scan(&self.grammars)
    }
}

/// Plain HTML documents, including inline `<script>` and `<style>` blocks
pub struct MarkupParser {
    grammars: Arc<GrammarSet>,
}

impl MarkupParser {
    #[must_use]
    pub fn new(grammars: Arc<GrammarSet>) -> Self {
        Self { grammars }
    }
}

impl DialectParser for MarkupParser {
    fn name(&self) -> &'static str {
        "markup"
    }

    fn supported_extensions(&self) -> &'static [&'static str] {
        &["html", "htm"]
    }

    fn is_enabled(&self) -> bool {
        self.grammars.is_available(Grammar::Html)
    }

    fn parse_features(&self, content: &str, path: &Path) -> Result<Vec<DetectedFeature>> {
        let file = path.to_string_lossy();
        let tree = self.grammars.parse(Grammar::Html, content)?;
        let root = tree.root_node();

        let blocks = collect_embedded(root, content);
        let mut features = scan_embedded_blocks(&self.grammars, &blocks, &file, &[])?;
        MarkupScanner::new(content, &file, Region::origin(), MarkupRules::HTML)
            .scan(root, &mut features);
        Ok(features)
    }
}

/// Scan embedded script and style bodies, translating positions into file space.
///
/// Blocks in a language we do not walk (`lang="coffee"`, `type="text/template"`) are
/// skipped. A script block with a syntax error fails the whole file.
pub(crate) fn scan_embedded_blocks(
    grammars: &GrammarSet,
    blocks: &[EmbeddedBlock<'_>],
    file: &str,
    exclusions: &[&str],
) -> Result<Vec<DetectedFeature>> {
    let mut features = Vec::new();

    for block in blocks {
        match block.kind {
            BlockKind::Script => {
                if !block.is_executable_script() {
                    continue;
                }
                let Some(grammar) = Grammar::for_script_lang(block.lang.as_deref()) else {
                    log::debug!(
                        "Skipping <script lang={:?}> in {file}",
                        block.lang.as_deref().unwrap_or_default()
                    );
                    continue;
                };
                let scanner = ScriptScanner::new(block.text, file, block.region, exclusions);
                features.extend(scanner.scan(grammars, grammar)?);
            }
            BlockKind::Style => {
                if !Grammar::style_lang_supported(block.lang.as_deref()) {
                    log::debug!(
                        "Skipping <style lang={:?}> in {file}",
                        block.lang.as_deref().unwrap_or_default()
                    );
                    continue;
                }
                match StyleScanner::new(block.text, file, block.region).scan(grammars) {
                    Ok(found) => features.extend(found),
                    Err(DialectError::GrammarUnavailable(name)) => {
                        log::debug!("Style grammar {name} unavailable, skipping block in {file}");
                    }
                    Err(e) => return Err(e),
                }
            }
        }
    }

    Ok(features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn script_parser_picks_grammar_from_extension() {
        let parser = ScriptParser::new(GrammarSet::shared());
        let features = parser
            .parse_features("let v: string = x ?? 'd';", Path::new("src/a.ts"))
            .unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].feature, "nullish-coalescing");
        assert_eq!(features[0].file, "src/a.ts");
    }

    #[test]
    fn markup_parser_covers_inline_regions() {
        let source = "<!doctype html>\n<html>\n<head>\n<style>\n  body { accent-color: red; }\n</style>\n</head>\n<body>\n<dialog></dialog>\n<script type=\"module\">\n  await boot();\n</script>\n</body>\n</html>\n";
        let parser = MarkupParser::new(GrammarSet::shared());
        let features = parser.parse_features(source, Path::new("index.html")).unwrap();

        let found: Vec<_> = features
            .iter()
            .map(|f| (f.feature.as_str(), f.line))
            .collect();
        assert!(found.contains(&("accent-color", 5)));
        assert!(found.contains(&("top-level-await", 11)));
        assert!(found.contains(&("dialog", 9)));
    }

    #[test]
    fn json_script_blocks_are_ignored() {
        let source = "<script type=\"application/json\">{\"a\": a ?? b}</script>";
        let parser = MarkupParser::new(GrammarSet::shared());
        assert!(parser
            .parse_features(source, Path::new("index.html"))
            .unwrap()
            .is_empty());
    }
}
