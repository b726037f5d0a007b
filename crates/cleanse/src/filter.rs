//! Tree filter
//!
//! Depth-first, pre-order walk that enforces a [`Policy`] on a parsed tree:
//! - allowed elements keep their allowed attributes and filtered styles
//! - disallowed elements are unwrapped (strip mode) or turned into text
//!   showing their markup (escape mode)
//! - comments go through the comment rule
//!
//! Text needs no work here; the serializer escapes it.

use cleanse_dom::{DomTree, Node, NodeData, NodeId};
use cleanse_html::HtmlSerializer;

use crate::comments::{self, CommentAction};
use crate::{Policy, style, tables};

/// Policy-enforcing tree walker
pub struct TreeFilter<'a> {
    policy: &'a Policy,
    serializer: HtmlSerializer,
}

impl<'a> TreeFilter<'a> {
    pub fn new(policy: &'a Policy) -> Self {
        Self {
            policy,
            serializer: HtmlSerializer::new(),
        }
    }

    /// Filter the whole tree in place, then merge adjacent text runs and
    /// put leftover table content where a reparse would put it
    pub fn filter(&self, tree: &mut DomTree) {
        let root = tree.root();
        for child in tree.child_ids(root) {
            self.filter_node(tree, child);
        }
        tree.normalize(root);
        tables::repair(tree);
        tree.normalize(root);
    }

    fn filter_node(&self, tree: &mut DomTree, id: NodeId) {
        let Some(node) = tree.get(id) else {
            return;
        };

        match &node.data {
            NodeData::Element(elem) => {
                if self.policy.allows_tag(&elem.name) {
                    self.filter_attributes(tree, id);
                    for child in tree.child_ids(id) {
                        self.filter_node(tree, child);
                    }
                } else if self.policy.strip() {
                    tracing::trace!("unwrapping <{}>", elem.name);
                    // A disallowed child may sit inside a disallowed parent
                    for child in tree.unwrap(id) {
                        self.filter_node(tree, child);
                    }
                } else {
                    tracing::trace!("escaping <{}>", elem.name);
                    self.escape_element(tree, id);
                }
            }
            NodeData::Comment(_) => {
                comments::apply(tree, id, self.policy);
            }
            NodeData::Text(_) | NodeData::Fragment => {}
        }
    }

    /// Drop attributes the policy does not name for this tag and filter
    /// the declarations of a surviving `style`
    fn filter_attributes(&self, tree: &mut DomTree, id: NodeId) {
        let policy = self.policy;
        let Some(elem) = tree.get_mut(id).and_then(Node::as_element_mut) else {
            return;
        };

        let tag = elem.name.clone();
        elem.attrs.retain(|attr| {
            let allowed = policy.allows_attribute(&tag, &attr.name);
            if !allowed {
                tracing::trace!("dropping attribute {} on <{}>", attr.name, tag);
            }
            allowed
        });

        for attr in elem.attrs.iter_mut().filter(|a| a.name.eq_ignore_ascii_case("style")) {
            attr.value = style::filter_style(&attr.value, policy);
        }
    }

    /// Replace a disallowed element by text pieces holding its markup
    fn escape_element(&self, tree: &mut DomTree, id: NodeId) {
        let mut pieces = Vec::new();
        self.escape_into(tree, id, &mut pieces);
        tree.replace_with(id, &pieces);
    }

    /// Collect the text rendering of a subtree. Existing text nodes are reused
    /// as-is; comments still follow the comment rule.
    fn escape_into(&self, tree: &mut DomTree, id: NodeId, pieces: &mut Vec<NodeId>) {
        let Some(node) = tree.get(id) else {
            return;
        };

        match &node.data {
            NodeData::Element(elem) => {
                let open = self.serializer.literal_start_tag(elem);
                let close = self.serializer.end_tag(elem);

                pieces.push(tree.create_text(&open));
                for child in tree.child_ids(id) {
                    self.escape_into(tree, child, pieces);
                }
                if let Some(close) = close {
                    pieces.push(tree.create_text(&close));
                }
            }
            NodeData::Text(_) => pieces.push(id),
            NodeData::Comment(_) => {
                if comments::comment_action(self.policy) == CommentAction::Keep {
                    pieces.push(id);
                }
            }
            NodeData::Fragment => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CleanOptions;
    use cleanse_html::{parse_fragment, serialize};
    use pretty_assertions::assert_eq;

    fn run(html: &str, options: CleanOptions) -> String {
        let policy = Policy::new(&options);
        let mut tree = parse_fragment(html);
        TreeFilter::new(&policy).filter(&mut tree);
        serialize(&tree)
    }

    #[test]
    fn test_allowed_element_unchanged() {
        assert_eq!(run("<em></em>", CleanOptions::default()), "<em></em>");
        assert_eq!(
            run("an <strong>allowed</strong> tag", CleanOptions::default()),
            "an <strong>allowed</strong> tag"
        );
    }

    #[test]
    fn test_disallowed_attribute_dropped() {
        assert_eq!(
            run(r#"<em href="fail">no link</em>"#, CleanOptions::default()),
            "<em>no link</em>"
        );
    }

    #[test]
    fn test_escape_mode_renders_subtree_as_text() {
        assert_eq!(
            run("a <script>safe()</script> test", CleanOptions::default()),
            "a &lt;script&gt;safe()&lt;/script&gt; test"
        );
    }

    #[test]
    fn test_escape_mode_escapes_nested_markup() {
        assert_eq!(
            run(r#"<div class="x"><em>hi</em></div>"#, CleanOptions::default()),
            r#"&lt;div class="x"&gt;&lt;em&gt;hi&lt;/em&gt;&lt;/div&gt;"#
        );
    }

    #[test]
    fn test_escape_mode_attribute_escaped_once() {
        assert_eq!(
            run(r#"<div title="a&b">x</div>"#, CleanOptions::default()),
            r#"&lt;div title="a&amp;b"&gt;x&lt;/div&gt;"#
        );
    }

    #[test]
    fn test_strip_mode_text_left_in_table_moves_out() {
        let options = CleanOptions::default().with_tags(["table"]).strip(true);
        assert_eq!(
            run("<table><tr><td>x</td></tr></table>", options),
            "x<table></table>"
        );
    }

    #[test]
    fn test_escape_mode_text_left_in_table_moves_out() {
        let options = CleanOptions::default().with_tags(["table"]);
        assert_eq!(
            run("<table><tr><td>x</td></tr></table>", options),
            "&lt;tbody&gt;&lt;tr&gt;&lt;td&gt;x&lt;/td&gt;&lt;/tr&gt;&lt;/tbody&gt;<table></table>"
        );
    }

    #[test]
    fn test_escape_mode_void_element_has_no_end_tag() {
        assert_eq!(
            run(r#"x <img src="a.png"> y"#, CleanOptions::default()),
            r#"x &lt;img src="a.png"&gt; y"#
        );
    }

    #[test]
    fn test_escape_mode_merges_into_single_text_run() {
        let policy = Policy::default();
        let mut tree = parse_fragment("a <script>x()</script> b");
        TreeFilter::new(&policy).filter(&mut tree);
        assert_eq!(tree.children(tree.root()).count(), 1);
    }

    #[test]
    fn test_strip_mode_unwraps() {
        let options = CleanOptions::default().with_tags(["p"]).strip(true);
        assert_eq!(
            run("<p><span>multiply <span>nested <span>text</span></span></span></p>", options),
            "<p>multiply nested text</p>"
        );
    }

    #[test]
    fn test_strip_mode_filters_spliced_children() {
        let options = CleanOptions::default().with_tags(["p", "a"]).strip(true);
        assert_eq!(
            run(
                r#"<p><a href="http://example.com/"><img src="http://example.com/"></a></p>"#,
                options
            ),
            r#"<p><a href="http://example.com/"></a></p>"#
        );
    }

    #[test]
    fn test_style_filtered_on_allowed_attribute() {
        let options = CleanOptions::default()
            .with_tags(["span"])
            .with_attributes([("span", vec!["style"])]);
        assert_eq!(
            run(r#"a <span style="color:red">test</span>"#, options),
            r#"a <span style="">test</span>"#
        );
    }

    #[test]
    fn test_comments_inside_escaped_element_follow_rule() {
        assert_eq!(
            run("<div><!-- c -->x</div>", CleanOptions::default()),
            "&lt;div&gt;x&lt;/div&gt;"
        );
        assert_eq!(
            run("<div><!-- c -->x</div>", CleanOptions::default().strip_comments(false)),
            "&lt;div&gt;<!-- c -->x&lt;/div&gt;"
        );
    }
}
