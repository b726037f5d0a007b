//! Linkifier
//!
//! Finds URL-like and e-mail-like runs inside text nodes and turns them into
//! `<a>` elements. Text that already sits inside an anchor (or inside raw
//! text elements such as `<script>`) is never scanned, so existing links are
//! left exactly as they were.

use std::sync::LazyLock;

use cleanse_dom::{DomTree, ElementData, NodeId};
use cleanse_html::RAW_TEXT_ELEMENTS;
use regex::Regex;

/// E-mail first so that `name@www.host.com` is not cut at `www.`
static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)",
        r"(?P<email>\b[\w.+-]+@[\w-]+(?:\.[\w-]+)+\b)",
        r"|(?P<url>",
        r"(?:\b(?:https?|ftp)://(?:[\w.%-]+@)?[\w-]+(?:\.[\w-]+)*|\bwww\.[\w-]+(?:\.[\w-]+)+)",
        r"(?::\d+)?",
        r#"(?:[/?#][^\s<>"{}|\\^\[\]`]*)?"#,
        r")",
    ))
    .expect("link pattern is valid")
});

/// Elements whose text is never linkified
const SKIP_ELEMENTS: &[&str] = &["a"];

/// What kind of target a span points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Scheme-prefixed URL, used verbatim
    Url,
    /// `www.` host without a scheme
    BareHost,
    /// `local@domain` address
    Email,
}

/// A link found inside a text run (byte offsets into that run)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSpan {
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub kind: LinkKind,
}

impl LinkSpan {
    /// Normalized link target
    pub fn href(&self) -> String {
        match self.kind {
            LinkKind::Url => self.text.clone(),
            LinkKind::BareHost => format!("http://{}", self.text),
            LinkKind::Email => format!("mailto:{}", self.text),
        }
    }
}

/// Drop prose punctuation from the end of a match. A closing parenthesis is
/// only dropped while it has no opening partner inside the match.
fn trim_trailing_punctuation(candidate: &str) -> &str {
    let mut end = candidate.len();
    while let Some(last) = candidate[..end].chars().next_back() {
        let current = &candidate[..end];
        let trim = match last {
            '.' | ',' | ';' | ':' | '!' | '?' | '\'' | '"' => true,
            ')' => current.matches(')').count() > current.matches('(').count(),
            _ => false,
        };
        if !trim {
            break;
        }
        end -= last.len_utf8();
    }
    &candidate[..end]
}

/// Find all non-overlapping links in a text run, leftmost first
pub fn find_links(text: &str) -> Vec<LinkSpan> {
    let mut spans = Vec::new();
    for caps in LINK_RE.captures_iter(text) {
        let (m, kind) = if let Some(m) = caps.name("email") {
            (m, LinkKind::Email)
        } else if let Some(m) = caps.name("url") {
            let kind = if m.as_str().get(..4).is_some_and(|p| p.eq_ignore_ascii_case("www.")) {
                LinkKind::BareHost
            } else {
                LinkKind::Url
            };
            (m, kind)
        } else {
            continue;
        };

        let trimmed = trim_trailing_punctuation(m.as_str());
        if trimmed.is_empty() {
            continue;
        }
        spans.push(LinkSpan {
            start: m.start(),
            end: m.start() + trimmed.len(),
            text: trimmed.to_owned(),
            kind,
        });
    }
    spans
}

/// Tree pass that converts link-like text into anchors
#[derive(Debug, Clone, Copy)]
pub struct Linkifier {
    nofollow: bool,
}

impl Linkifier {
    /// `nofollow` adds `rel="nofollow"` to every anchor this pass creates
    pub fn new(nofollow: bool) -> Self {
        Self { nofollow }
    }

    /// Linkify every eligible text node. Returns the number of links created.
    pub fn linkify(&self, tree: &mut DomTree) -> usize {
        let mut created = 0;
        self.walk(tree, tree.root(), &mut created);
        tracing::debug!("Created {} links", created);
        created
    }

    fn walk(&self, tree: &mut DomTree, parent: NodeId, created: &mut usize) {
        for child in tree.child_ids(parent) {
            let Some(node) = tree.get(child) else {
                continue;
            };
            if let Some(tag) = node.tag_name() {
                if !is_skipped(tag) {
                    self.walk(tree, child, created);
                }
            } else if let Some(text) = node.as_text() {
                let text = text.to_owned();
                *created += self.link_text(tree, child, &text);
            }
        }
    }

    /// Split one text node around its links
    fn link_text(&self, tree: &mut DomTree, id: NodeId, text: &str) -> usize {
        let spans = find_links(text);
        if spans.is_empty() {
            return 0;
        }

        let mut pieces = Vec::with_capacity(spans.len() * 2 + 1);
        let mut cursor = 0;
        for span in &spans {
            if span.start > cursor {
                pieces.push(tree.create_text(&text[cursor..span.start]));
            }
            pieces.push(self.create_anchor(tree, span));
            cursor = span.end;
        }
        if cursor < text.len() {
            pieces.push(tree.create_text(&text[cursor..]));
        }

        tree.replace_with(id, &pieces);
        spans.len()
    }

    fn create_anchor(&self, tree: &mut DomTree, span: &LinkSpan) -> NodeId {
        let mut anchor = ElementData::new("a");
        anchor.set_attr("href", span.href());
        if self.nofollow {
            anchor.set_attr("rel", "nofollow");
        }
        tracing::trace!("linking {}", span.text);

        let id = tree.create_element_with(anchor);
        let label = tree.create_text(&span.text);
        tree.append_child(id, label);
        id
    }
}

impl Default for Linkifier {
    fn default() -> Self {
        Self::new(true)
    }
}

fn is_skipped(tag: &str) -> bool {
    SKIP_ELEMENTS.contains(&tag) || RAW_TEXT_ELEMENTS.contains(&tag)
}
