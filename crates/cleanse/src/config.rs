//! Sanitizer options
//!
//! Plain option record that callers fill in (or load from TOML) before
//! building an immutable [`crate::Policy`] from it.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::ConfigError;

/// Tags allowed when no list is given
pub const DEFAULT_TAGS: &[&str] = &[
    "a", "abbr", "acronym", "b", "blockquote", "code", "em", "i", "li", "ol", "strong", "ul",
];

/// Attributes allowed per tag when no rules are given
pub const DEFAULT_ATTRIBUTES: &[(&str, &[&str])] = &[
    ("a", &["href", "title"]),
    ("abbr", &["title"]),
    ("acronym", &["title"]),
];

/// Allowed attributes, either per tag or one list for every tag
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AttributeRules {
    /// Tag name (or `*`) to attribute names
    PerTag(BTreeMap<String, Vec<String>>),
    /// Attribute names allowed on any tag
    Global(Vec<String>),
}

impl Default for AttributeRules {
    fn default() -> Self {
        Self::PerTag(
            DEFAULT_ATTRIBUTES
                .iter()
                .map(|(tag, attrs)| {
                    (
                        (*tag).to_owned(),
                        attrs.iter().map(|a| (*a).to_owned()).collect(),
                    )
                })
                .collect(),
        )
    }
}

/// Options recognized by the sanitizer and linkifier
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CleanOptions {
    /// Allowed tag names
    pub tags: Vec<String>,
    /// Allowed attribute names
    pub attributes: AttributeRules,
    /// Allowed inline style properties
    pub styles: Vec<String>,
    /// Unwrap disallowed tags instead of escaping them
    pub strip: bool,
    /// Remove HTML comments
    pub strip_comments: bool,
    /// Add `rel="nofollow"` to generated links
    pub nofollow: bool,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            tags: DEFAULT_TAGS.iter().map(|t| (*t).to_owned()).collect(),
            attributes: AttributeRules::default(),
            styles: Vec::new(),
            strip: false,
            strip_comments: true,
            nofollow: true,
        }
    }
}

impl CleanOptions {
    /// Parse options from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML options file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loading sanitizer options from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Replace the allowed tag list
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Allow the given attributes on every tag
    pub fn with_global_attributes<I, S>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes = AttributeRules::Global(attrs.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the per-tag attribute rules
    pub fn with_attributes<I, T, A, S>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = (T, A)>,
        T: Into<String>,
        A: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes = AttributeRules::PerTag(
            rules
                .into_iter()
                .map(|(tag, attrs)| (tag.into(), attrs.into_iter().map(Into::into).collect()))
                .collect(),
        );
        self
    }

    /// Replace the allowed style properties
    pub fn with_styles<I, S>(mut self, styles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.styles = styles.into_iter().map(Into::into).collect();
        self
    }

    pub fn strip(mut self, strip: bool) -> Self {
        self.strip = strip;
        self
    }

    pub fn strip_comments(mut self, strip_comments: bool) -> Self {
        self.strip_comments = strip_comments;
        self
    }

    pub fn nofollow(mut self, nofollow: bool) -> Self {
        self.nofollow = nofollow;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let options = CleanOptions::default();
        assert!(options.tags.iter().any(|t| t == "strong"));
        assert!(!options.strip);
        assert!(options.strip_comments);
        assert!(options.nofollow);
        assert!(options.styles.is_empty());
    }

    #[test]
    fn test_toml_partial_keeps_defaults() {
        let options = CleanOptions::from_toml_str("strip = true\nstyles = [\"color\"]").unwrap();
        assert!(options.strip);
        assert_eq!(options.styles, vec!["color"]);
        assert_eq!(options.tags, CleanOptions::default().tags);
    }

    #[test]
    fn test_toml_attribute_forms() {
        let per_tag = CleanOptions::from_toml_str("[attributes]\nspan = [\"style\"]").unwrap();
        let mut expected = BTreeMap::new();
        expected.insert("span".to_owned(), vec!["style".to_owned()]);
        assert_eq!(per_tag.attributes, AttributeRules::PerTag(expected));

        let global = CleanOptions::from_toml_str("attributes = [\"style\"]").unwrap();
        assert_eq!(global.attributes, AttributeRules::Global(vec!["style".to_owned()]));
    }

    #[test]
    fn test_toml_unknown_key_rejected() {
        let err = CleanOptions::from_toml_str("stripp = true").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = CleanOptions::from_toml_file("/nonexistent/cleanse.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
