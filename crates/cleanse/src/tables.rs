//! Table structure repair
//!
//! Unwrapping or escaping table parts can leave content where the HTML5
//! tree builder never puts it. Reparsing such output would move that
//! content around, so the filtered tree is brought into the shape the
//! parser itself produces:
//! - non-whitespace text and non-table elements directly inside `table`,
//!   `thead`, `tbody`, `tfoot` or `tr` move before the enclosing table
//!   (foster parenting)
//! - table parts outside a valid container are unwrapped, since the
//!   parser ignores those tags there

use cleanse_dom::{DomTree, Node, NodeData, NodeId};

/// Elements whose insertion location triggers foster parenting
const TABLE_SECTIONS: &[&str] = &["table", "thead", "tbody", "tfoot", "tr"];

/// Children a table section keeps in place
const TABLE_CONTENT: &[&str] = &[
    "caption", "colgroup", "col", "thead", "tbody", "tfoot", "tr", "td", "th", "script", "style",
    "template",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Keep,
    Foster,
    Unwrap,
}

/// Containers a table part may sit in, empty for other elements
fn valid_parents(tag: &str) -> &'static [&'static str] {
    match tag {
        "caption" | "colgroup" | "thead" | "tbody" | "tfoot" => &["table"],
        "tr" => &["table", "thead", "tbody", "tfoot"],
        "td" | "th" => &["tr", "table", "thead", "tbody", "tfoot"],
        "col" => &["colgroup", "table"],
        _ => &[],
    }
}

fn is_section(tag: Option<&str>) -> bool {
    tag.is_some_and(|t| TABLE_SECTIONS.contains(&t))
}

fn placement(parent_tag: Option<&str>, node: &Node) -> Placement {
    match &node.data {
        NodeData::Element(elem) => {
            let parents = valid_parents(&elem.name);
            if !parents.is_empty() {
                // `template` contents accept any table part
                let fits = parent_tag.is_some_and(|p| p == "template" || parents.contains(&p));
                if !fits {
                    return Placement::Unwrap;
                }
            }
            if is_section(parent_tag) && !TABLE_CONTENT.contains(&elem.name.as_str()) {
                Placement::Foster
            } else {
                Placement::Keep
            }
        }
        NodeData::Text(text) if is_section(parent_tag) => {
            if text.content.chars().all(|c| c.is_ascii_whitespace()) {
                Placement::Keep
            } else {
                Placement::Foster
            }
        }
        _ => Placement::Keep,
    }
}

/// Nearest `table` at or above `id`
fn enclosing_table(tree: &DomTree, id: NodeId) -> Option<NodeId> {
    let mut current = id;
    while let Some(node) = tree.get(current) {
        if node.tag_name() == Some("table") {
            return Some(current);
        }
        current = node.parent;
    }
    None
}

/// Repair the whole tree. Expects merged text runs, since the parser
/// fosters a run as a whole.
pub fn repair(tree: &mut DomTree) {
    let root = tree.root();
    repair_children(tree, root);
}

fn repair_children(tree: &mut DomTree, parent: NodeId) {
    for child in tree.child_ids(parent) {
        place(tree, parent, child);
    }
}

fn place(tree: &mut DomTree, parent: NodeId, id: NodeId) {
    let Some(node) = tree.get(id) else {
        return;
    };
    let parent_tag = tree.get(parent).and_then(Node::tag_name);

    match placement(parent_tag, node) {
        Placement::Keep => repair_children(tree, id),
        Placement::Unwrap => {
            tracing::trace!("unwrapping misplaced <{}>", node.tag_name().unwrap_or_default());
            for child in tree.unwrap(id) {
                place(tree, parent, child);
            }
        }
        Placement::Foster => {
            let Some(table) = enclosing_table(tree, parent) else {
                repair_children(tree, id);
                return;
            };
            let target = tree.get(table).map_or(NodeId::NONE, |t| t.parent);
            if !target.is_valid() {
                return;
            }
            tracing::trace!("fostering {:?} before table {:?}", id, table);
            tree.insert_before(target, id, table);
            place(tree, target, id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cleanse_html::{parse_fragment, serialize};
    use pretty_assertions::assert_eq;

    fn repaired(build: impl FnOnce(&mut DomTree)) -> String {
        let mut tree = DomTree::new();
        build(&mut tree);
        repair(&mut tree);
        tree.normalize(tree.root());
        serialize(&tree)
    }

    #[test]
    fn test_text_in_table_moves_before_it() {
        let html = repaired(|tree| {
            let table = tree.create_element("table");
            let text = tree.create_text("x");
            tree.append_child(tree.root(), table);
            tree.append_child(table, text);
        });
        assert_eq!(html, "x<table></table>");
    }

    #[test]
    fn test_whitespace_and_comments_stay_in_table() {
        let html = repaired(|tree| {
            let table = tree.create_element("table");
            let space = tree.create_text(" ");
            let comment = tree.create_comment("c");
            tree.append_child(tree.root(), table);
            tree.append_child(table, space);
            tree.append_child(table, comment);
        });
        assert_eq!(html, "<table> <!--c--></table>");
    }

    #[test]
    fn test_element_in_row_moves_before_table() {
        let html = repaired(|tree| {
            let div = tree.create_element("div");
            let table = tree.create_element("table");
            let tr = tree.create_element("tr");
            let b = tree.create_element("b");
            let text = tree.create_text("y");
            tree.append_child(tree.root(), div);
            tree.append_child(div, table);
            tree.append_child(table, tr);
            tree.append_child(tr, b);
            tree.append_child(b, text);
        });
        assert_eq!(html, "<div><b>y</b><table><tr></tr></table></div>");
    }

    #[test]
    fn test_nested_table_in_row_moves_out() {
        let html = repaired(|tree| {
            let outer = tree.create_element("table");
            let tr = tree.create_element("tr");
            let inner = tree.create_element("table");
            let text = tree.create_text("z");
            tree.append_child(tree.root(), outer);
            tree.append_child(outer, tr);
            tree.append_child(tr, inner);
            tree.append_child(inner, text);
        });
        assert_eq!(html, "z<table></table><table><tr></tr></table>");
    }

    #[test]
    fn test_orphan_table_parts_unwrapped() {
        let html = repaired(|tree| {
            let tr = tree.create_element("tr");
            let td = tree.create_element("td");
            let text = tree.create_text("cell");
            tree.append_child(tree.root(), tr);
            tree.append_child(tr, td);
            tree.append_child(td, text);
        });
        assert_eq!(html, "cell");
    }

    #[test]
    fn test_parsed_table_is_left_alone() {
        let mut tree = parse_fragment("<table><tr><td>a <b>b</b></td></tr></table>");
        let before = serialize(&tree);
        repair(&mut tree);
        assert_eq!(serialize(&tree), before);
    }
}
