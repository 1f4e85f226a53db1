//! Placeholder extraction
//!
//! A placeholder is a `{{name}}` token whose trimmed inner text is a bare
//! variable reference. Block helpers (`{{#if x}}`, `{{/if}}`, `{{else}}`) and
//! helper calls with arguments (`{{lookup a b}}`) are not placeholders.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

// Inner text may not contain braces, so a dangling `{{` never swallows the
// next well-formed token.
static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{([^{}]+?)\}\}").expect("placeholder pattern is a valid regex")
});

/// Extract the unique variable names referenced by `text`, in order of first
/// occurrence.
///
/// ```
/// use studio_template::extract_placeholders;
///
/// let names = extract_placeholders("{{greeting}} {{#if name}}{{name}}{{else}}no name{{/if}}");
/// assert_eq!(names, vec!["greeting", "name"]);
/// ```
pub fn extract_placeholders(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();

    for cap in PLACEHOLDER_RE.captures_iter(text) {
        let Some(token) = cap.get(1) else {
            continue;
        };
        let inner = token.as_str().trim();
        if !is_variable_reference(inner) {
            continue;
        }
        if seen.insert(inner) {
            names.push(inner.to_string());
        }
    }

    names
}

/// Whether trimmed token content names a variable rather than a helper
pub fn is_variable_reference(inner: &str) -> bool {
    !inner.is_empty()
        && !inner.starts_with('#')
        && !inner.starts_with('/')
        && inner != "else"
        && !inner.chars().any(char::is_whitespace)
}

/// Rebuild a minimal template that references each name once
pub fn placeholder_template<S: AsRef<str>>(names: &[S]) -> String {
    names
        .iter()
        .map(|n| format!("{{{{{}}}}}", n.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}
