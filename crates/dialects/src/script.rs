use crate::catalog::is_platform_api;
use crate::error::{DialectError, Result};
use crate::grammar::{Grammar, GrammarSet};
use crate::region::{first_error, line_at, Region};
use crate::types::{DetectedFeature, FeatureType};
use tree_sitter::Node;

/// Global object prefixes stripped before catalog lookup (`window.fetch` → `fetch`).
const GLOBAL_PREFIXES: &[&str] = &["window.", "globalThis.", "self."];

const FUNCTION_KINDS: &[&str] = &[
    "function_declaration",
    "function_expression",
    "function",
    "arrow_function",
    "method_definition",
    "generator_function_declaration",
    "generator_function",
];

const LOGICAL_ASSIGNMENT_OPERATORS: &[&str] = &["??=", "||=", "&&="];

/// Walks a script syntax tree and reports platform API usages and modern syntax.
pub(crate) struct ScriptScanner<'a> {
    source: &'a str,
    file: &'a str,
    region: Region,
    exclusions: &'a [&'a str],
}

impl<'a> ScriptScanner<'a> {
    pub fn new(source: &'a str, file: &'a str, region: Region, exclusions: &'a [&'a str]) -> Self {
        Self {
            source,
            file,
            region,
            exclusions,
        }
    }

    /// Parse the script with `grammar` and collect features. Syntax errors fail the whole scan.
    pub fn scan(&self, grammars: &GrammarSet, grammar: Grammar) -> Result<Vec<DetectedFeature>> {
        let tree = grammars.parse(grammar, self.source)?;
        let root = tree.root_node();

        if let Some(point) = first_error(root) {
            let (line, _) = self.region.translate(point);
            return Err(DialectError::syntax(
                self.file,
                line,
                format!("unparseable {} region", grammar.as_str()),
            ));
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
        match node.kind() {
            "optional_chain" => self.emit("optional-chaining", node, out),
            "binary_expression" => {
                if self.operator(node) == Some("??") {
                    self.emit("nullish-coalescing", node, out);
                }
            }
            "augmented_assignment_expression" => {
                if self
                    .operator(node)
                    .is_some_and(|op| LOGICAL_ASSIGNMENT_OPERATORS.contains(&op))
                {
                    self.emit("logical-assignment", node, out);
                }
            }
            "private_property_identifier" => self.emit("private-class-fields", node, out),
            "class_static_block" => self.emit("class-static-initialization-blocks", node, out),
            "await_expression" => {
                if !inside_function(node) {
                    self.emit("top-level-await", node, out);
                }
            }
            "subscript_expression" => self.emit_bare_optional(node, out),
            "member_expression" => {
                self.emit_bare_optional(node, out);
                if let Some(name) = self.dotted_name(node) {
                    self.emit_api(&name, node, out);
                }
                if let Some(object) = node.child_by_field_name("object") {
                    if object.kind() == "identifier" {
                        if let Some(name) = self.text(object) {
                            self.emit_api(name, object, out);
                        }
                    }
                }
            }
            "call_expression" => {
                self.emit_bare_optional(node, out);
                if let Some(callee) = node.child_by_field_name("function") {
                    if callee.kind() == "identifier" {
                        if let Some(name) = self.text(callee) {
                            self.emit_api(name, callee, out);
                        }
                    }
                }
            }
            "new_expression" => {
                if let Some(constructor) = node.child_by_field_name("constructor") {
                    if constructor.kind() == "identifier" {
                        if let Some(name) = self.text(constructor) {
                            self.emit_api(name, constructor, out);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    /// The TypeScript grammars leave `?.` as a bare token on some chains instead of
    /// wrapping it in an `optional_chain` node.
    fn emit_bare_optional(&self, node: Node<'_>, out: &mut Vec<DetectedFeature>) {
        let mut cursor = node.walk();
        let token = node.children(&mut cursor).find(|c| c.kind() == "?.");
        if let Some(token) = token {
            self.emit("optional-chaining", token, out);
        }
    }

    fn emit_api(&self, name: &str, node: Node<'_>, out: &mut Vec<DetectedFeature>) {
        let name = strip_global_prefix(name);
        if !is_platform_api(name) || self.is_excluded(name) {
            return;
        }
        self.emit(name, node, out);
    }

    fn emit(&self, feature: &str, node: Node<'_>, out: &mut Vec<DetectedFeature>) {
        let (line, column) = self.region.translate(node.start_position());
        out.push(DetectedFeature::new(
            feature,
            FeatureType::Script,
            line_at(self.source, node.start_byte()),
            self.file,
            line,
            column,
        ));
    }

    fn is_excluded(&self, name: &str) -> bool {
        let leading = name.split('.').next().unwrap_or(name);
        self.exclusions
            .iter()
            .any(|excluded| *excluded == name || *excluded == leading)
    }

    fn operator(&self, node: Node<'_>) -> Option<&'a str> {
        node.child_by_field_name("operator")
            .and_then(|op| self.text(op))
    }

    fn text(&self, node: Node<'_>) -> Option<&'a str> {
        node.utf8_text(self.source.as_bytes()).ok()
    }

    /// Resolve `a.b.c` chains made of plain identifiers
    fn dotted_name(&self, node: Node<'_>) -> Option<String> {
        match node.kind() {
            "identifier" => self.text(node).map(str::to_string),
            "member_expression" => {
                let object = node.child_by_field_name("object")?;
                let property = node.child_by_field_name("property")?;
                if property.kind() != "property_identifier" {
                    return None;
                }
                let base = self.dotted_name(object)?;
                Some(format!("{base}.{}", self.text(property)?))
            }
            _ => None,
        }
    }
}

fn strip_global_prefix(name: &str) -> &str {
    GLOBAL_PREFIXES
        .iter()
        .find_map(|prefix| name.strip_prefix(prefix))
        .filter(|rest| !rest.is_empty())
        .unwrap_or(name)
}

fn inside_function(node: Node<'_>) -> bool {
    let mut current = node.parent();
    while let Some(parent) = current {
        if FUNCTION_KINDS.contains(&parent.kind()) {
            return true;
        }
        current = parent.parent();
    }
    false
}
