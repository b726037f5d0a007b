//! Cleanse HTML
//!
//! Boundary between markup text and the [`cleanse_dom::DomTree`]: html5ever
//! does the tokenizing and tag-soup repair, this crate converts its output and
//! writes trees back out as HTML5 fragment markup.

mod parser;
mod serializer;

pub use parser::HtmlParser;
pub use serializer::{HtmlSerializer, RAW_TEXT_ELEMENTS, VOID_ELEMENTS, escape_attribute, escape_text};

use cleanse_dom::DomTree;

/// Parse an HTML fragment into a tree
pub fn parse_fragment(html: &str) -> DomTree {
    HtmlParser::new().parse_fragment(html)
}

/// Serialize the children of the tree root back to markup
pub fn serialize(tree: &DomTree) -> String {
    HtmlSerializer::new().serialize_inner(tree, tree.root())
}
