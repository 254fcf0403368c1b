use once_cell::sync::Lazy;
use regex::Regex;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));

/// Remove every `<...>` tag-shaped substring.
///
/// This is a denylist strip, not HTML escaping: a lone `<` or `>` survives,
/// as does the empty `<>`.
pub fn sanitize(text: &str) -> String {
    TAG_RE.replace_all(text, "").into_owned()
}

/// Sanitize an optional field in place. Absent fields stay absent.
pub fn sanitize_field(field: &mut Option<String>) {
    if let Some(text) = field.as_mut() {
        if TAG_RE.is_match(text) {
            let cleaned = sanitize(text);
            *text = cleaned;
        }
    }
}
