//! Markup stripping and URL encoding for resolved placeholder values.

use std::sync::LazyLock;

use regex::Regex;

/// HTML-like tags, including quoted and unquoted attributes. Emotes and
/// cheermotes are carried as `<img>` markup in rendered text.
static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)</?\w+(?:\s+[^\s/>"'=]+(?:\s*=\s*(?:".*?[^"\\]"|'.*?[^'\\]'|[^\s>"']+))?)*?>"#,
    )
    .expect("static html tag pattern")
});

pub fn strip_html(value: &str) -> String {
    HTML_TAG.replace_all(value, "").into_owned()
}

/// Characters a URI component may carry verbatim besides `A-Za-z0-9-_.~`.
const COMPONENT_SAFE: [(&str, &str); 5] =
    [("%21", "!"), ("%27", "'"), ("%28", "("), ("%29", ")"), ("%2A", "*")];

/// Percent-encode a value for use as one URI component.
pub fn url_encode(value: &str) -> String {
    let mut encoded = urlencoding::encode(value).into_owned();
    for (escape, raw) in COMPONENT_SAFE {
        if encoded.contains(escape) {
            encoded = encoded.replace(escape, raw);
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_and_attributes() {
        assert_eq!(strip_html("<b>hi</b> there"), "hi there");
        assert_eq!(
            strip_html(r#"gg <img src="https://cdn/x.png" alt='cheer100'> wp"#),
            "gg  wp"
        );
        assert_eq!(strip_html("1 < 2 > 0"), "1 < 2 > 0");
    }

    #[test]
    fn encodes_reserved_characters() {
        assert_eq!(url_encode("a b&c/d"), "a%20b%26c%2Fd");
        assert_eq!(url_encode("wow! (it's *fine*)"), "wow!%20(it's%20*fine*)");
    }
}
