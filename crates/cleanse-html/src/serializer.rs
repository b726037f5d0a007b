//! HTML Serialization
//!
//! Writes a [`DomTree`] back out as HTML5 fragment markup:
//! - attributes always as `name="value"`, empty values included
//! - void elements without end tags
//! - raw text elements (`script`, `style`, ...) unescaped
//! - comments re-closed with `-->`

use cleanse_dom::{DomTree, ElementData, NodeData, NodeId};

/// Void elements (no end tag)
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// Raw text elements (no escaping for content)
pub const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

/// HTML serializer
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlSerializer;

impl HtmlSerializer {
    pub fn new() -> Self {
        Self
    }

    /// Serialize innerHTML of a node (children only)
    pub fn serialize_inner(&self, tree: &DomTree, node_id: NodeId) -> String {
        let mut output = String::new();
        self.serialize_children(tree, node_id, &mut output);
        tracing::debug!("Serialized {} bytes", output.len());
        output
    }

    /// Start tag as literal text, e.g. `<a href="x&y">`. Attribute values
    /// are left as-is; the text node holding the result is escaped when
    /// it is serialized.
    pub fn literal_start_tag(&self, elem: &ElementData) -> String {
        let mut output = String::new();
        write_start_tag(elem, &mut output, |value, out| out.push_str(value));
        output
    }

    /// Markup of an element's end tag, `None` for void elements
    pub fn end_tag(&self, elem: &ElementData) -> Option<String> {
        if is_void(&elem.name) {
            None
        } else {
            Some(format!("</{}>", elem.name))
        }
    }

    fn serialize_node(&self, tree: &DomTree, node_id: NodeId, output: &mut String) {
        let Some(node) = tree.get(node_id) else {
            return;
        };

        match &node.data {
            NodeData::Fragment => {
                self.serialize_children(tree, node_id, output);
            }
            NodeData::Element(elem) => {
                write_start_tag(elem, output, escape_attribute);
                if is_void(&elem.name) {
                    return;
                }
                if is_raw_text(&elem.name) {
                    self.serialize_children_raw(tree, node_id, output);
                } else {
                    self.serialize_children(tree, node_id, output);
                }
                output.push_str("</");
                output.push_str(&elem.name);
                output.push('>');
            }
            NodeData::Text(text) => {
                escape_text(&text.content, output);
            }
            NodeData::Comment(text) => {
                output.push_str("<!--");
                output.push_str(text);
                output.push_str("-->");
            }
        }
    }

    fn serialize_children(&self, tree: &DomTree, parent_id: NodeId, output: &mut String) {
        for (child_id, _) in tree.children(parent_id) {
            self.serialize_node(tree, child_id, output);
        }
    }

    fn serialize_children_raw(&self, tree: &DomTree, parent_id: NodeId, output: &mut String) {
        for (child_id, child) in tree.children(parent_id) {
            match &child.data {
                NodeData::Text(text) => output.push_str(&text.content),
                _ => self.serialize_node(tree, child_id, output),
            }
        }
    }
}

fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

fn is_raw_text(tag: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&tag)
}

fn write_start_tag(elem: &ElementData, output: &mut String, write_value: fn(&str, &mut String)) {
    output.push('<');
    output.push_str(&elem.name);
    for attr in &elem.attrs {
        output.push(' ');
        output.push_str(&attr.name);
        output.push_str("=\"");
        write_value(&attr.value, output);
        output.push('"');
    }
    output.push('>');
}

/// Escape text content for HTML
pub fn escape_text(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '\u{a0}' => output.push_str("&nbsp;"),
            _ => output.push(c),
        }
    }
}

/// Escape attribute value
pub fn escape_attribute(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '"' => output.push_str("&quot;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '\u{a0}' => output.push_str("&nbsp;"),
            _ => output.push(c),
        }
    }
}
