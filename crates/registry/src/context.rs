use baseline_dialects::FeatureType;

/// Default cap for validated context snippets, in characters
pub const MAX_CONTEXT_CHARS: usize = 100;

const ELLIPSIS: &str = "...";

/// Reshape a raw context snippet for output.
///
/// Style contexts take the `prop: value` shape, markup contexts are wrapped in angle
/// brackets, script contexts are whitespace-collapsed. Everything is capped at
/// `max_chars`.
#[must_use]
pub fn format_context(
    feature_type: FeatureType,
    raw_feature: &str,
    context: &str,
    max_chars: usize,
) -> String {
    let collapsed = collapse_whitespace(context);
    let shaped = match feature_type {
        FeatureType::Style => style_context(raw_feature, &collapsed),
        FeatureType::Markup => markup_context(&collapsed),
        FeatureType::Script => collapsed,
    };
    truncate(&shaped, max_chars)
}

fn style_context(raw_feature: &str, context: &str) -> String {
    let body = context.trim().trim_end_matches('{').trim().trim_end_matches(';').trim();
    let value = strip_prefix_ignore_case(body, raw_feature)
        .map(|rest| rest.trim_start().trim_start_matches(':').trim())
        .unwrap_or(body);
    if value.is_empty() {
        raw_feature.to_string()
    } else {
        format!("{raw_feature}: {value}")
    }
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        text.get(prefix.len()..)
    } else {
        None
    }
}

fn markup_context(context: &str) -> String {
    let body = context.trim();
    if body.starts_with('<') {
        body.to_string()
    } else {
        format!("<{body}>")
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}
