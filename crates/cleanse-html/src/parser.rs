//! HTML5 fragment parser
//!
//! Uses html5ever's RcDom and converts it to our arena tree. Fragment parsing
//! runs with a `<body>` context element, so input such as `a <em>b` is treated
//! as body content and repaired per the HTML5 tree construction rules.

use cleanse_dom::{DomTree, ElementData, NodeId};
use html5ever::tendril::TendrilSink;
use html5ever::{LocalName, Namespace, ParseOpts, QualName, parse_fragment};
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// HTML5 fragment parser
pub struct HtmlParser {
    context: &'static str,
}

impl HtmlParser {
    /// Create a parser that treats input as `<body>` content
    pub fn new() -> Self {
        Self { context: "body" }
    }

    /// Parse markup into a fragment tree. Never fails; malformed input is
    /// repaired by the HTML5 parsing algorithm.
    pub fn parse_fragment(&self, html: &str) -> DomTree {
        tracing::debug!("Parsing HTML fragment ({} bytes)", html.len());

        let context = QualName::new(
            None,
            Namespace::from(HTML_NAMESPACE),
            LocalName::from(self.context),
        );
        let dom = parse_fragment(RcDom::default(), ParseOpts::default(), context, Vec::new(), false)
            .one(html);

        let mut tree = DomTree::new();
        let root = tree.root();

        // The fragment parser hangs everything off a synthetic <html> element
        for child in dom.document.children.borrow().iter() {
            if let RcNodeData::Element { .. } = child.data {
                for grandchild in child.children.borrow().iter() {
                    self.convert_node(grandchild, &mut tree, root);
                }
            }
        }

        tracing::debug!("Parsed {} nodes", tree.len());
        tree
    }

    /// Convert an RcDom node to our DOM format
    fn convert_node(&self, handle: &Handle, tree: &mut DomTree, parent: NodeId) {
        match &handle.data {
            RcNodeData::Document => {
                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, parent);
                }
            }
            RcNodeData::Text { contents } => {
                let id = tree.create_text(&contents.borrow());
                tree.append_child(parent, id);
            }
            RcNodeData::Comment { contents } => {
                let id = tree.create_comment(contents);
                tree.append_child(parent, id);
            }
            RcNodeData::Element {
                name,
                attrs,
                template_contents,
                ..
            } => {
                let mut elem = ElementData::new(name.local.to_string());
                for attr in attrs.borrow().iter() {
                    let attr_name = match &attr.name.prefix {
                        Some(prefix) => format!("{}:{}", prefix, attr.name.local),
                        None => attr.name.local.to_string(),
                    };
                    elem.set_attr(attr_name, attr.value.to_string());
                }
                let id = tree.create_element_with(elem);
                tree.append_child(parent, id);

                // <template> keeps its content in a separate fragment
                if let Some(contents) = template_contents.borrow().as_ref() {
                    for child in contents.children.borrow().iter() {
                        self.convert_node(child, tree, id);
                    }
                }
                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, id);
                }
            }
            RcNodeData::Doctype { .. } | RcNodeData::ProcessingInstruction { .. } => {
                // Not representable in a body fragment
            }
        }
    }
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self::new()
    }
}
