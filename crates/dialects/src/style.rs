use crate::catalog::MODERN_PSEUDO_CLASSES;
use crate::error::Result;
use crate::grammar::{Grammar, GrammarSet};
use crate::region::{first_error, Region};
use crate::types::{DetectedFeature, FeatureType};
use tree_sitter::Node;

/// Walks a stylesheet and reports declarations, modern pseudo-classes, and at-rules.
///
/// Stylesheets are walked even when the grammar reports errors: preprocessor syntax inside
/// component style blocks routinely trips the CSS grammar while the surrounding rules stay
/// well-formed.
pub(crate) struct StyleScanner<'a> {
    source: &'a str,
    file: &'a str,
    region: Region,
}

impl<'a> StyleScanner<'a> {
    pub fn new(source: &'a str, file: &'a str, region: Region) -> Self {
        Self {
            source,
            file,
            region,
        }
    }

    pub fn scan(&self, grammars: &GrammarSet) -> Result<Vec<DetectedFeature>> {
        let tree = grammars.parse(Grammar::Css, self.source)?;
        let root = tree.root_node();

        if let Some(point) = first_error(root) {
            let (line, _) = self.region.translate(point);
            log::debug!(
                "Partial stylesheet parse in {} near line {line}, continuing",
                self.file
            );
        }

        let mut features = Vec::new();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            self.visit(node, &mut features);

            let mut cursor = node.walk();
            let children: Vec<_> = node.children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }
        Ok(features)
    }

    fn visit(&self, node: Node<'_>, out: &mut Vec<DetectedFeature>) {
        let kind = node.kind();
        match kind {
            "declaration" => {
                let mut cursor = node.walk();
                let property = node
                    .children(&mut cursor)
                    .find(|c| c.kind() == "property_name");
                if let Some(name) = property.and_then(|p| self.text(p)) {
                    let name = normalize_property(name);
                    let context = self.text(node).unwrap_or_default().trim_end_matches(';');
                    self.emit(&name, context, node, out);
                }
            }
            "selectors" => {
                let Some(text) = self.text(node) else {
                    return;
                };
                for (needle, name) in MODERN_PSEUDO_CLASSES {
                    if text.contains(needle) {
                        self.emit(name, text, node, out);
                    }
                }
            }
            _ if kind == "at_rule" || kind.ends_with("_statement") => {
                let Some(keyword) = node.child(0).and_then(|c| self.text(c)) else {
                    return;
                };
                if keyword.starts_with('@') {
                    let context = self.text(node).unwrap_or_default();
                    self.emit(&keyword.to_lowercase(), context, node, out);
                }
            }
            _ => {}
        }
    }

    fn emit(&self, feature: &str, context: &str, node: Node<'_>, out: &mut Vec<DetectedFeature>) {
        let (line, column) = self.region.translate(node.start_position());
        out.push(DetectedFeature::new(
            feature,
            FeatureType::Style,
            context,
            self.file,
            line,
            column,
        ));
    }

    fn text(&self, node: Node<'_>) -> Option<&'a str> {
        node.utf8_text(self.source.as_bytes()).ok()
    }
}

/// Property names are ASCII case-insensitive; custom properties are not.
fn normalize_property(name: &str) -> String {
    let name = name.trim();
    if name.starts_with("--") {
        name.to_string()
    } else {
        name.to_ascii_lowercase()
    }
}
