use tree_sitter::{Node, Point};

/// Origin of a sub-region inside its enclosing file.
///
/// Sub-region parsers report positions relative to the region text; `translate` maps them
/// back into the file's 1-based line / 0-based column space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Region {
    /// 0-based row of the first region character in the file
    pub row: usize,
    /// 0-based column of the first region character in the file
    pub column: usize,
}

impl Region {
    /// Region covering a whole file
    #[must_use]
    pub const fn origin() -> Self {
        Self { row: 0, column: 0 }
    }

    #[must_use]
    pub const fn at(point: Point) -> Self {
        Self {
            row: point.row,
            column: point.column,
        }
    }

    /// Map a region-relative point to `(line, column)` in the enclosing file
    #[must_use]
    pub const fn translate(&self, point: Point) -> (usize, usize) {
        let line = self.row + point.row + 1;
        // Only the first region row is indented by the region's starting column.
        let column = if point.row == 0 {
            self.column + point.column
        } else {
            point.column
        };
        (line, column)
    }
}

/// Script or style text embedded in a markup document
#[derive(Debug, Clone)]
pub(crate) struct EmbeddedBlock<'s> {
    pub kind: BlockKind,
    pub lang: Option<String>,
    pub script_type: Option<String>,
    pub text: &'s str,
    pub region: Region,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BlockKind {
    Script,
    Style,
}

impl EmbeddedBlock<'_> {
    /// Whether a `<script type="...">` block holds executable script
    pub fn is_executable_script(&self) -> bool {
        match self.script_type.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(t) => matches!(
                t.to_lowercase().as_str(),
                "module" | "text/javascript" | "application/javascript" | "text/typescript"
            ),
        }
    }
}

/// Collect every `<script>` and `<style>` body under `root` in document order.
pub(crate) fn collect_embedded<'s>(root: Node<'_>, source: &'s str) -> Vec<EmbeddedBlock<'s>> {
    let mut blocks = Vec::new();
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        let kind = match node.kind() {
            "script_element" => Some(BlockKind::Script),
            "style_element" => Some(BlockKind::Style),
            _ => None,
        };

        if let Some(kind) = kind {
            if let Some(block) = embedded_block(node, source, kind) {
                blocks.push(block);
            }
            continue;
        }

        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }

    blocks
}

fn embedded_block<'s>(
    element: Node<'_>,
    source: &'s str,
    kind: BlockKind,
) -> Option<EmbeddedBlock<'s>> {
    let mut cursor = element.walk();
    let children: Vec<_> = element.children(&mut cursor).collect();

    let start_tag = children.iter().find(|c| c.kind() == "start_tag")?;
    let raw = children.iter().find(|c| c.kind() == "raw_text")?;

    Some(EmbeddedBlock {
        kind,
        lang: attribute_value(*start_tag, source, "lang"),
        script_type: attribute_value(*start_tag, source, "type"),
        text: source.get(raw.start_byte()..raw.end_byte())?,
        region: Region::at(raw.start_position()),
    })
}

/// Tag name of an `element`, `script_element`, or `style_element` node
pub(crate) fn tag_name<'s>(element: Node<'_>, source: &'s str) -> Option<&'s str> {
    let mut cursor = element.walk();
    let tag = element
        .children(&mut cursor)
        .find(|c| matches!(c.kind(), "start_tag" | "self_closing_tag"))?;

    let mut tag_cursor = tag.walk();
    let name = tag
        .children(&mut tag_cursor)
        .find(|c| c.kind() == "tag_name")?;
    name.utf8_text(source.as_bytes()).ok()
}

/// Value of attribute `name` on a start tag, unquoted
pub(crate) fn attribute_value(tag: Node<'_>, source: &str, name: &str) -> Option<String> {
    let mut cursor = tag.walk();
    for attribute in tag.children(&mut cursor) {
        if attribute.kind() != "attribute" {
            continue;
        }

        let mut attr_cursor = attribute.walk();
        let parts: Vec<_> = attribute.children(&mut attr_cursor).collect();
        let matches_name = parts.iter().any(|p| {
            p.kind() == "attribute_name"
                && p.utf8_text(source.as_bytes())
                    .is_ok_and(|text| text.eq_ignore_ascii_case(name))
        });
        if !matches_name {
            continue;
        }

        let value = parts
            .iter()
            .find(|p| matches!(p.kind(), "quoted_attribute_value" | "attribute_value"))
            .and_then(|p| p.utf8_text(source.as_bytes()).ok())
            .map(|v| v.trim_matches(|c| c == '"' || c == '\'').to_string());
        return Some(value.unwrap_or_default());
    }
    None
}

/// Source line containing `byte`, trimmed
pub(crate) fn line_at(source: &str, byte: usize) -> &str {
    let byte = byte.min(source.len());
    let start = source[..byte].rfind('\n').map_or(0, |i| i + 1);
    let end = source[byte..].find('\n').map_or(source.len(), |i| byte + i);
    source[start..end].trim()
}

/// Position of the first error or missing node, if the tree has any
pub(crate) fn first_error(root: Node<'_>) -> Option<Point> {
    if !root.has_error() {
        return None;
    }

    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node.start_position());
        }
        if !node.has_error() {
            continue;
        }
        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
    Some(root.start_position())
}
