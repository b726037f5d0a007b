//! Comment handling
//!
//! Comments are either removed or kept verbatim, per
//! [`Policy::strip_comments`]. Unterminated comments arrive from the parser as
//! ordinary comment nodes, so they follow the same rule.

use cleanse_dom::{DomTree, NodeId};

use crate::Policy;

/// What happened to a comment node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentAction {
    Keep,
    Remove,
}

/// Decide the fate of comments under a policy
pub fn comment_action(policy: &Policy) -> CommentAction {
    if policy.strip_comments() {
        CommentAction::Remove
    } else {
        CommentAction::Keep
    }
}

/// Apply the comment rule to one node
pub(crate) fn apply(tree: &mut DomTree, id: NodeId, policy: &Policy) -> CommentAction {
    let action = comment_action(policy);
    if action == CommentAction::Remove {
        tree.detach(id);
    }
    action
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CleanOptions;

    #[test]
    fn test_comment_removed_by_default() {
        let mut tree = DomTree::new();
        let comment = tree.create_comment(" x ");
        tree.append_child(tree.root(), comment);

        assert_eq!(apply(&mut tree, comment, &Policy::default()), CommentAction::Remove);
        assert_eq!(tree.children(tree.root()).count(), 0);
    }

    #[test]
    fn test_comment_kept_when_allowed() {
        let policy = Policy::new(&CleanOptions::default().strip_comments(false));
        let mut tree = DomTree::new();
        let comment = tree.create_comment(" x ");
        tree.append_child(tree.root(), comment);

        assert_eq!(apply(&mut tree, comment, &policy), CommentAction::Keep);
        assert_eq!(tree.children(tree.root()).count(), 1);
    }
}
