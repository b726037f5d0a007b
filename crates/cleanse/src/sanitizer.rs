//! Sanitizer entry points
//!
//! markup → parse → filter → (linkify) → serialize. Every call works on its
//! own freshly parsed tree; the sanitizer itself is read-only and can be
//! shared across threads.

use cleanse_dom::DomTree;
use cleanse_html::{parse_fragment, serialize};

use crate::filter::TreeFilter;
use crate::linkify::Linkifier;
use crate::{CleanOptions, Policy};

/// HTML sanitizer
#[derive(Debug, Clone)]
pub struct Sanitizer {
    policy: Policy,
    nofollow: bool,
}

impl Sanitizer {
    pub fn new(policy: Policy) -> Self {
        Self {
            policy,
            nofollow: true,
        }
    }

    /// Build a sanitizer from options, including the linkify `nofollow` flag
    pub fn from_options(options: &CleanOptions) -> Self {
        Self {
            policy: Policy::new(options),
            nofollow: options.nofollow,
        }
    }

    /// Set whether generated links get `rel="nofollow"`
    pub fn with_nofollow(mut self, nofollow: bool) -> Self {
        self.nofollow = nofollow;
        self
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Sanitize markup against the policy
    pub fn clean(&self, html: &str) -> String {
        let mut tree = parse_fragment(html);
        self.filter_tree(&mut tree);
        finish(&tree)
    }

    /// Turn link-like text into anchors without filtering
    pub fn linkify(&self, html: &str) -> String {
        let mut tree = parse_fragment(html);
        self.linkify_tree(&mut tree);
        finish(&tree)
    }

    /// Sanitize, then linkify the result
    pub fn clean_and_linkify(&self, html: &str) -> String {
        let mut tree = parse_fragment(html);
        self.filter_tree(&mut tree);
        self.linkify_tree(&mut tree);
        finish(&tree)
    }

    /// Apply the policy to an already parsed tree
    pub fn filter_tree(&self, tree: &mut DomTree) {
        TreeFilter::new(&self.policy).filter(tree);
    }

    /// Linkify an already parsed tree, returning the number of links created
    pub fn linkify_tree(&self, tree: &mut DomTree) -> usize {
        Linkifier::new(self.nofollow).linkify(tree)
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::from_options(&CleanOptions::default())
    }
}

/// Serialize, collapsing whitespace-only results to the empty string
fn finish(tree: &DomTree) -> String {
    let html = serialize(tree);
    if html.trim().is_empty() {
        String::new()
    } else {
        html
    }
}
