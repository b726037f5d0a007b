//! Whitelist policy
//!
//! Immutable lookup tables built once from [`CleanOptions`]. All names are
//! stored lower-cased and compared case-insensitively.

use std::collections::{HashMap, HashSet};

use crate::config::{AttributeRules, CleanOptions};

/// Attribute bucket that applies to every tag
pub const ANY_TAG: &str = "*";

/// Allowed tags, attributes and style properties plus the handling flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    tags: HashSet<String>,
    attributes: HashMap<String, HashSet<String>>,
    styles: HashSet<String>,
    strip: bool,
    strip_comments: bool,
}

impl Policy {
    /// Build a policy from options
    pub fn new(options: &CleanOptions) -> Self {
        let tags = options.tags.iter().map(|t| t.to_ascii_lowercase()).collect();

        let mut attributes: HashMap<String, HashSet<String>> = HashMap::new();
        match &options.attributes {
            AttributeRules::PerTag(rules) => {
                for (tag, attrs) in rules {
                    attributes
                        .entry(tag.to_ascii_lowercase())
                        .or_default()
                        .extend(attrs.iter().map(|a| a.to_ascii_lowercase()));
                }
            }
            AttributeRules::Global(attrs) => {
                attributes.insert(
                    ANY_TAG.to_owned(),
                    attrs.iter().map(|a| a.to_ascii_lowercase()).collect(),
                );
            }
        }

        let styles = options.styles.iter().map(|s| s.to_ascii_lowercase()).collect();

        Self {
            tags,
            attributes,
            styles,
            strip: options.strip,
            strip_comments: options.strip_comments,
        }
    }

    /// Is the tag on the whitelist?
    pub fn allows_tag(&self, tag: &str) -> bool {
        self.tags.contains(&tag.to_ascii_lowercase())
    }

    /// Is the attribute allowed on this tag, directly or through `*`?
    pub fn allows_attribute(&self, tag: &str, attr: &str) -> bool {
        let attr = attr.to_ascii_lowercase();
        let in_bucket = |bucket: &str| {
            self.attributes
                .get(bucket)
                .is_some_and(|allowed| allowed.contains(&attr))
        };
        in_bucket(&tag.to_ascii_lowercase()) || in_bucket(ANY_TAG)
    }

    /// Is the inline style property allowed?
    pub fn allows_style(&self, property: &str) -> bool {
        self.styles.contains(&property.to_ascii_lowercase())
    }

    /// Unwrap disallowed tags (`true`) or escape them to text (`false`)
    pub fn strip(&self) -> bool {
        self.strip
    }

    /// Remove comments (`true`) or keep them verbatim (`false`)
    pub fn strip_comments(&self) -> bool {
        self.strip_comments
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self::new(&CleanOptions::default())
    }
}

impl From<&CleanOptions> for Policy {
    fn from(options: &CleanOptions) -> Self {
        Self::new(options)
    }
}

impl From<CleanOptions> for Policy {
    fn from(options: CleanOptions) -> Self {
        Self::new(&options)
    }
}
