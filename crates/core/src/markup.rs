//! HTML entity escaping and tag slug helpers used by the rendering pipeline.
//!
//! Live post content is handed out HTML-escaped; history reconstruction works
//! on the raw form, so both directions must round-trip exactly.

/// Entity table shared by [`escape_html`] and [`unescape_html`].
const ENTITIES: &[(char, &str)] = &[
    ('&', "&amp;"),
    ('<', "&lt;"),
    ('>', "&gt;"),
    ('"', "&quot;"),
    ('\'', "&#x27;"),
    ('/', "&#x2F;"),
    ('\\', "&#x5C;"),
    ('`', "&#96;"),
];

/// Escape HTML-significant characters.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match ENTITIES.iter().find(|(ch, _)| *ch == c) {
            Some((_, entity)) => out.push_str(entity),
            None => out.push(c),
        }
    }
    out
}

/// Reverse [`escape_html`] in a single pass, so `&amp;lt;` becomes `&lt;`.
pub fn unescape_html(escaped: &str) -> String {
    let mut out = String::with_capacity(escaped.len());
    let mut rest = escaped;

    while let Some(idx) = rest.find('&') {
        out.push_str(&rest[..idx]);
        rest = &rest[idx..];
        match ENTITIES
            .iter()
            .find(|(_, entity)| rest.starts_with(entity))
        {
            Some((ch, entity)) => {
                out.push(*ch);
                rest = &rest[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Neutralise translation placeholders (`[[namespace:key]]`) so user content
/// is never interpreted as a translation key downstream.
pub fn escape_translation(text: &str) -> String {
    text.replace("[[", "&lsqb;&lsqb;").replace("]]", "&rsqb;&rsqb;")
}

/// Generate a CSS/URL-safe slug from a tag value.
///
/// Converts to lowercase, replaces non-alphanumeric characters with hyphens,
/// collapses consecutive hyphens, and trims leading/trailing hyphens.
pub fn slugify(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut prev_hyphen = false;
    for c in value.to_lowercase().chars() {
        if c.is_alphanumeric() {
            result.push(c);
            prev_hyphen = false;
        } else {
            if !prev_hyphen {
                result.push('-');
            }
            prev_hyphen = true;
        }
    }
    result.trim_matches('-').to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_covers_html_specials() {
        assert_eq!(
            escape_html(r#"<a href="/x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;&#x2F;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;&#x2F;a&gt;"
        );
    }

    #[test]
    fn unescape_reverses_escape() {
        let raw = "if a < b && c > d { `run` \\ \"quote\" }";
        assert_eq!(unescape_html(&escape_html(raw)), raw);
    }

    #[test]
    fn unescape_is_single_pass() {
        assert_eq!(unescape_html("&amp;lt;"), "&lt;");
    }

    #[test]
    fn unescape_keeps_unknown_entities() {
        assert_eq!(unescape_html("a &nbsp; b & c"), "a &nbsp; b & c");
    }

    #[test]
    fn translation_brackets_are_escaped() {
        assert_eq!(
            escape_translation("see [[error:invalid-data]]"),
            "see &lsqb;&lsqb;error:invalid-data&rsqb;&rsqb;"
        );
    }

    #[test]
    fn slugify_basic() {
        assert_eq!(slugify("Rust Async"), "rust-async");
        assert_eq!(slugify("  C++ / FFI  "), "c-ffi");
        assert_eq!(slugify("---"), "");
    }
}
