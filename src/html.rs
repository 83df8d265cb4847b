//! Whitespace-insensitive HTML comparison
//!
//! The service reformats stored HTML, and hand-written templates are full of
//! indentation. Both sides are reduced to a canonical form before they are
//! compared so that layout alone never shows up as a change.
//!
//! The comparison is textual: attribute order, quoting style and
//! self-closing tags are not considered equivalent.

use declarative::{StringPlanModifier, StringRequest};
use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

static BETWEEN_TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r">\s*<").expect("valid inter-tag regex"));

/// Reduce HTML to its canonical whitespace form
///
/// In order: CRLF becomes LF, the ends are trimmed, every whitespace run
/// collapses to one space, and whitespace between `>` and `<` is dropped.
pub fn normalize(raw: &str) -> String {
    let unix = raw.replace("\r\n", "\n");
    let collapsed = WHITESPACE_RUN.replace_all(unix.trim(), " ");
    BETWEEN_TAGS.replace_all(&collapsed, "><").into_owned()
}

/// Whether two HTML documents only differ in whitespace
pub fn equivalent(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

/// Plan modifier that keeps the recorded HTML when the configured HTML is
/// the same document laid out differently
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlWhitespaceInsensitive;

impl StringPlanModifier for HtmlWhitespaceInsensitive {
    fn description(&self) -> String {
        "Ignores insignificant whitespace differences in HTML content.".to_string()
    }

    fn markdown_description(&self) -> String {
        "Ignores insignificant whitespace differences in `html` content.".to_string()
    }

    fn plan_modify_string(&self, req: StringRequest<'_>) -> Option<String> {
        match (req.state_value, req.plan_value) {
            (Some(stored), Some(planned)) if equivalent(stored, planned) => {
                log::debug!("HTML only differs in whitespace, keeping recorded value");
                Some(stored.to_string())
            }
            (_, planned) => planned.map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn modify(state: Option<&str>, plan: Option<&str>) -> Option<String> {
        HtmlWhitespaceInsensitive.plan_modify_string(StringRequest {
            state_value: state,
            plan_value: plan,
        })
    }

    #[test]
    fn test_normalize_steps() {
        assert_eq!(normalize("  <p>a</p>\r\n"), "<p>a</p>");
        assert_eq!(normalize("<p>hello    big\t\nworld</p>"), "<p>hello big world</p>");
        assert_eq!(normalize("<ul>\n  <li>1</li>\n  <li>2</li>\n</ul>"), "<ul><li>1</li><li>2</li></ul>");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \r\n\t "), "");
    }

    #[test]
    fn test_normalize_keeps_text_spacing() {
        // Only whitespace between a closing '>' and an opening '<' goes away.
        assert_eq!(normalize("<b>a</b> text <i>b</i>"), "<b>a</b> text <i>b</i>");
        assert_eq!(normalize("a > b < c"), "a > b < c");
        assert_eq!(normalize("<p>a</p> <p>b</p>"), "<p>a</p><p>b</p>");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "",
            "plain",
            "<html>\n  <head></head>\n  <body><h2>Welcome</h2></body>\n</html>",
            "\r\n<div>\r\n\t<span> x </span>   y\r\n</div>  ",
            "a > b <  c",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_whitespace_variants_are_equivalent() {
        let base = "<div><p>Hello world</p></div>";
        assert!(equivalent(base, "<div>\n  <p>Hello   world</p>\n</div>"));
        assert!(equivalent(base, "<div>\r\n<p>Hello world</p>\r\n</div>"));
        assert!(equivalent(base, "   <div> <p>Hello\tworld</p> </div>   "));
        assert!(!equivalent(base, "<div><p>Hello, world</p></div>"));
        assert!(!equivalent("<img/>", "<img />"));
    }

    #[test]
    fn test_modifier_keeps_stored_html() {
        let stored = "<html><head></head><body><h2>Welcome</h2></body></html>";
        let planned = "<html>\n  <head></head>\n  <body><h2>Welcome</h2></body>\n</html>";
        assert_eq!(modify(Some(stored), Some(planned)).as_deref(), Some(stored));
    }

    #[test]
    fn test_modifier_passes_real_changes_through() {
        let stored = "<p>Old</p>";
        let planned = "<p>New</p>";
        assert_eq!(modify(Some(stored), Some(planned)).as_deref(), Some(planned));
    }

    #[test]
    fn test_modifier_without_both_values() {
        assert_eq!(modify(None, Some("<p>x</p>")).as_deref(), Some("<p>x</p>"));
        assert_eq!(modify(Some("<p>x</p>"), None), None);
        assert_eq!(modify(None, None), None);
    }

    #[test]
    fn test_modifier_description() {
        assert_eq!(
            HtmlWhitespaceInsensitive.description(),
            "Ignores insignificant whitespace differences in HTML content."
        );
        assert!(HtmlWhitespaceInsensitive.markdown_description().contains("`html`"));
    }

    /// One token of a generated document and the layout around it
    #[derive(Debug, Clone)]
    struct Piece {
        token: String,
        spaced: bool,
        run: String,
    }

    fn token() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("<p>".to_string()),
            Just("</p>".to_string()),
            Just("<div class=\"x\">".to_string()),
            Just("</div>".to_string()),
            Just("<br/>".to_string()),
            "[a-z]{1,6}",
        ]
    }

    fn whitespace(min: usize) -> impl Strategy<Value = String> {
        let unit = prop_oneof![Just(" "), Just("\t"), Just("\n"), Just("\r\n")];
        prop::collection::vec(unit, min..4).prop_map(|parts| parts.concat())
    }

    fn piece() -> impl Strategy<Value = Piece> {
        (token(), any::<bool>(), whitespace(1)).prop_map(|(token, spaced, run)| Piece {
            token,
            spaced,
            run,
        })
    }

    /// Compact rendering and a re-spaced rendering of the same document
    fn layouts(pieces: &[Piece], lead: &str, tail: &str) -> (String, String) {
        let mut compact = String::new();
        let mut spread = lead.to_string();
        for (i, piece) in pieces.iter().enumerate() {
            if i > 0 {
                let prev = &pieces[i - 1].token;
                if piece.spaced {
                    compact.push(' ');
                    spread.push_str(&piece.run);
                } else if prev.ends_with('>') && piece.token.starts_with('<') {
                    spread.push_str(&piece.run);
                }
            }
            compact.push_str(&piece.token);
            spread.push_str(&piece.token);
        }
        spread.push_str(tail);
        (compact, spread)
    }

    proptest! {
        #[test]
        fn test_normalize_is_idempotent_for_any_string(raw in any::<String>()) {
            let once = normalize(&raw);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn test_normalize_is_idempotent_for_html_like_text(raw in "[<>a-z \t\r\n/]{0,40}") {
            let once = normalize(&raw);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn test_respaced_documents_are_equivalent(
            pieces in prop::collection::vec(piece(), 1..12),
            lead in whitespace(0),
            tail in whitespace(0),
        ) {
            let (compact, spread) = layouts(&pieces, &lead, &tail);
            prop_assert!(equivalent(&compact, &spread), "{:?} vs {:?}", compact, spread);
            prop_assert!(!normalize(&spread).contains('\n'));
        }
    }
}
