//! Parse/serialize tests for cleanse-html
//!
//! Malformed input goes through HTML5 repair and comes back as well-formed markup.

use cleanse_html::{parse_fragment, serialize};
use pretty_assertions::assert_eq;

fn roundtrip(html: &str) -> String {
    serialize(&parse_fragment(html))
}

// ============================================================================
// EMPTY AND MINIMAL INPUT
// ============================================================================

#[test]
fn test_empty_input() {
    assert_eq!(roundtrip(""), "");
}

#[test]
fn test_text_only() {
    assert_eq!(roundtrip("no html string"), "no html string");
}

#[test]
fn test_only_whitespace_survives_parsing() {
    assert_eq!(roundtrip("  \t "), "  \t ");
}

// ============================================================================
// MALFORMED HTML
// ============================================================================

#[test]
fn test_unclosed_tag_is_closed() {
    assert_eq!(roundtrip("a <em>fixed tag"), "a <em>fixed tag</em>");
}

#[test]
fn test_extra_closing_tags_dropped() {
    assert_eq!(roundtrip("<div></div></div></div>"), "<div></div>");
}

#[test]
fn test_nested_paragraphs_split() {
    assert_eq!(roundtrip("<p><p>x"), "<p></p><p>x</p>");
}

#[test]
fn test_table_text_is_foster_parented() {
    assert_eq!(roundtrip("<table>test</table>"), "test<table></table>");
}

#[test]
fn test_broken_end_tag_becomes_comment() {
    assert_eq!(roundtrip("</3"), "<!--3-->");
}

#[test]
fn test_unterminated_comment_gets_closed() {
    assert_eq!(roundtrip("<!-- open comment"), "<!-- open comment-->");
}

// ============================================================================
// ESCAPING
// ============================================================================

#[test]
fn test_bare_characters_escaped() {
    assert_eq!(roundtrip("an & entity"), "an &amp; entity");
    assert_eq!(roundtrip("an < entity"), "an &lt; entity");
}

#[test]
fn test_entities_not_double_escaped() {
    assert_eq!(roundtrip("&amp;"), "&amp;");
    assert_eq!(
        roundtrip("&lt;em&gt;strong&lt;/em&gt;"),
        "&lt;em&gt;strong&lt;/em&gt;"
    );
}

#[test]
fn test_void_and_empty_attribute() {
    assert_eq!(roundtrip("<br/>"), "<br>");
    assert_eq!(roundtrip(r#"<b style="">x</b>"#), r#"<b style="">x</b>"#);
}

#[test]
fn test_script_content_raw() {
    assert_eq!(
        roundtrip("a <script>safe()</script> test"),
        "a <script>safe()</script> test"
    );
}
