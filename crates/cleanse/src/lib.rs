//! Cleanse - whitelist HTML sanitizer
//!
//! Parses untrusted markup with an HTML5 parser, walks the tree enforcing a
//! [`Policy`] (allowed tags, attributes and inline style properties), and can
//! rewrite plain-text URLs and e-mail addresses into links.
//!
//! ```
//! let html = cleanse::clean("an <script>evil()</script> <em>example</em>");
//! assert_eq!(html, "an &lt;script&gt;evil()&lt;/script&gt; <em>example</em>");
//! ```

pub mod comments;
pub mod config;
mod error;
pub mod filter;
pub mod linkify;
pub mod policy;
mod sanitizer;
pub mod style;
mod tables;

pub use config::{AttributeRules, CleanOptions};
pub use error::ConfigError;
pub use filter::TreeFilter;
pub use linkify::{LinkKind, LinkSpan, Linkifier, find_links};
pub use policy::{ANY_TAG, Policy};
pub use sanitizer::Sanitizer;

/// Sanitize markup with the default policy
pub fn clean(html: &str) -> String {
    Sanitizer::default().clean(html)
}

/// Sanitize markup with the given options
pub fn clean_with(html: &str, options: &CleanOptions) -> String {
    Sanitizer::from_options(options).clean(html)
}

/// Linkify markup (or plain text), adding `rel="nofollow"` to new links
pub fn linkify(html: &str) -> String {
    Sanitizer::default().linkify(html)
}

/// Linkify markup (or plain text) with an explicit `nofollow` choice
pub fn linkify_with(html: &str, nofollow: bool) -> String {
    Sanitizer::default().with_nofollow(nofollow).linkify(html)
}
