use crate::catalog::{is_modern_attribute, is_modern_element};
use crate::region::Region;
use crate::types::{DetectedFeature, FeatureType};
use tree_sitter::Node;

/// Per-dialect markup conventions
#[derive(Debug, Clone, Copy)]
pub(crate) struct MarkupRules {
    /// Attribute prefixes that mark dialect directives (`v-`, `:`, `on:`, ...)
    pub directive_prefixes: &'static [&'static str],
    /// Tag prefixes that mark dialect-owned elements (`svelte:`)
    pub tag_prefixes: &'static [&'static str],
    /// Treat capitalized tags as components, not HTML elements
    pub skip_component_tags: bool,
    /// Elements that are dialect control flow when they carry a directive
    /// (Vue's `<template v-if>`)
    pub directive_wrappers: &'static [&'static str],
}

impl MarkupRules {
    pub const HTML: Self = Self {
        directive_prefixes: &[],
        tag_prefixes: &[],
        skip_component_tags: false,
        directive_wrappers: &[],
    };

    fn is_directive(&self, attribute: &str) -> bool {
        self.directive_prefixes
            .iter()
            .any(|prefix| attribute.starts_with(prefix))
    }

    fn is_dialect_tag(&self, tag: &str) -> bool {
        if self.skip_component_tags && tag.starts_with(|c: char| c.is_ascii_uppercase()) {
            return true;
        }
        self.tag_prefixes.iter().any(|prefix| tag.starts_with(prefix))
    }
}

/// Walks markup nodes reporting allow-listed elements and attributes.
pub(crate) struct MarkupScanner<'a> {
    source: &'a str,
    file: &'a str,
    region: Region,
    rules: MarkupRules,
}

impl<'a> MarkupScanner<'a> {
    pub fn new(source: &'a str, file: &'a str, region: Region, rules: MarkupRules) -> Self {
        Self {
            source,
            file,
            region,
            rules,
        }
    }

    /// Scan `node` and its descendants; `<script>` and `<style>` bodies are left to their own
    /// region scanners.
    pub fn scan(&self, node: Node<'_>, out: &mut Vec<DetectedFeature>) {
        let mut stack = vec![node];
        while let Some(node) = stack.pop() {
            match node.kind() {
                "script_element" | "style_element" => continue,
                "start_tag" | "self_closing_tag" => self.visit_tag(node, out),
                _ => {}
            }

            let mut cursor = node.walk();
            let children: Vec<_> = node.children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }
    }

    fn visit_tag(&self, tag: Node<'_>, out: &mut Vec<DetectedFeature>) {
        let context = self.text(tag).unwrap_or_default();

        let mut cursor = tag.walk();
        let children: Vec<_> = tag.children(&mut cursor).collect();
        let has_directive = children
            .iter()
            .filter_map(|child| self.attribute_name(*child))
            .any(|name| self.rules.is_directive(name));

        for child in children {
            match child.kind() {
                "tag_name" => {
                    let Some(name) = self.text(child) else {
                        continue;
                    };
                    if self.rules.is_dialect_tag(name) {
                        // Attributes of a component are props, not HTML attributes.
                        return;
                    }
                    let name = name.to_ascii_lowercase();
                    if has_directive && self.rules.directive_wrappers.contains(&name.as_str()) {
                        continue;
                    }
                    if is_modern_element(&name) {
                        self.emit(&name, context, tag, out);
                    }
                }
                "attribute" => {
                    let Some(name) = self.attribute_name(child) else {
                        continue;
                    };
                    if self.rules.is_directive(name) {
                        continue;
                    }
                    let name = name.to_ascii_lowercase();
                    if is_modern_attribute(&name) {
                        let attr_context = self.text(child).unwrap_or_default();
                        self.emit(&name, attr_context, child, out);
                    }
                }
                _ => {}
            }
        }
    }

    fn attribute_name(&self, node: Node<'_>) -> Option<&'a str> {
        if node.kind() != "attribute" {
            return None;
        }
        let mut cursor = node.walk();
        let name = node
            .children(&mut cursor)
            .find(|c| c.kind() == "attribute_name");
        name.and_then(|n| self.text(n))
    }

    fn emit(&self, feature: &str, context: &str, node: Node<'_>, out: &mut Vec<DetectedFeature>) {
        let (line, column) = self.region.translate(node.start_position());
        out.push(DetectedFeature::new(
            feature,
            FeatureType::Markup,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{Grammar, GrammarSet};
    use pretty_assertions::assert_eq;

    const VUE_LIKE: MarkupRules = MarkupRules {
        directive_prefixes: &["v-", ":", "@"],
        tag_prefixes: &[],
        skip_component_tags: true,
        directive_wrappers: &["template"],
    };

    fn scan(source: &str, rules: MarkupRules) -> Vec<DetectedFeature> {
        let tree = GrammarSet::acquire().parse(Grammar::Html, source).unwrap();
        let mut out = Vec::new();
        MarkupScanner::new(source, "page.html", Region::origin(), rules)
            .scan(tree.root_node(), &mut out);
        out
    }

    #[test]
    fn reports_allow_listed_elements() {
        let features = scan("<div>\n  <dialog open>hi</dialog>\n</div>", MarkupRules::HTML);
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].feature, "dialog");
        assert_eq!(features[0].context, "<dialog open>");
        assert_eq!((features[0].line, features[0].column), (2, 2));
    }

    #[test]
    fn reports_allow_listed_attributes() {
        let features = scan(
            "<img loading=\"lazy\" src=\"a.png\"><div popover id=\"p\"></div>",
            MarkupRules::HTML,
        );
        let names: Vec<_> = features.iter().map(|f| f.feature.as_str()).collect();
        assert_eq!(names, vec!["loading", "popover"]);
        assert_eq!(features[0].context, "loading=\"lazy\"");
    }

    #[test]
    fn skips_directives_and_components() {
        let source = "<div v-if=\"open\" :popover=\"mode\" @click=\"go\" inert></div><Dialog loading=\"x\" />";
        let features = scan(source, VUE_LIKE);
        let names: Vec<_> = features.iter().map(|f| f.feature.as_str()).collect();
        assert_eq!(names, vec!["inert"]);
    }

    #[test]
    fn directive_wrappers_are_not_elements() {
        let source = "<template v-if=\"ok\"><p>a</p></template>\n<template id=\"row\"></template>";
        let features = scan(source, VUE_LIKE);
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].feature, "template");
        assert_eq!(features[0].line, 2);

        let plain = scan(source, MarkupRules::HTML);
        assert_eq!(plain.len(), 2);
    }

    #[test]
    fn does_not_descend_into_script_or_style() {
        let source = "<script>const d = '<dialog>';</script><style>.a{}</style><details></details>";
        let features = scan(source, MarkupRules::HTML);
        let names: Vec<_> = features.iter().map(|f| f.feature.as_str()).collect();
        assert_eq!(names, vec!["details"]);
    }
}
