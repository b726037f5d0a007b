//! Inline style filtering
//!
//! `style` attribute values are read declaration by declaration with a small
//! state machine (property, colon, value, semicolon). Malformed declarations
//! are dropped one at a time; the rest of the attribute survives.

use crate::Policy;

/// A single `property: value` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Lower-cased property name
    pub property: String,
    /// Trimmed value
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Property,
    Value,
}

/// Parser state for one declaration list
struct DeclarationParser {
    state: State,
    property: String,
    value: String,
    quote: Option<char>,
    escaped: bool,
    paren_depth: u32,
    saw_colon: bool,
    out: Vec<Declaration>,
}

impl DeclarationParser {
    fn new() -> Self {
        Self {
            state: State::Property,
            property: String::new(),
            value: String::new(),
            quote: None,
            escaped: false,
            paren_depth: 0,
            saw_colon: false,
            out: Vec::new(),
        }
    }

    fn feed(&mut self, c: char) {
        match self.state {
            State::Property => match c {
                ':' => {
                    self.saw_colon = true;
                    self.state = State::Value;
                }
                ';' => self.finish(),
                _ => self.property.push(c),
            },
            State::Value => {
                if let Some(q) = self.quote {
                    self.value.push(c);
                    if self.escaped {
                        self.escaped = false;
                    } else if c == '\\' {
                        self.escaped = true;
                    } else if c == q {
                        self.quote = None;
                    }
                    return;
                }
                match c {
                    ';' if self.paren_depth == 0 => self.finish(),
                    '"' | '\'' => {
                        self.quote = Some(c);
                        self.value.push(c);
                    }
                    '(' => {
                        self.paren_depth += 1;
                        self.value.push(c);
                    }
                    ')' => {
                        self.paren_depth = self.paren_depth.saturating_sub(1);
                        self.value.push(c);
                    }
                    _ => self.value.push(c),
                }
            }
        }
    }

    /// Close the current declaration, keeping it only if well-formed
    fn finish(&mut self) {
        let property = self.property.trim().to_ascii_lowercase();
        let value = self.value.trim().to_owned();

        let blank = property.is_empty() && value.is_empty() && !self.saw_colon;
        if !blank {
            if !self.saw_colon || !is_property_name(&property) || value.is_empty() {
                tracing::trace!("dropping malformed declaration {:?}", self.property);
            } else if !is_safe_value(&value) {
                tracing::trace!("dropping unsafe value for {}", property);
            } else {
                self.out.push(Declaration { property, value });
            }
        }

        self.state = State::Property;
        self.property.clear();
        self.value.clear();
        self.quote = None;
        self.escaped = false;
        self.paren_depth = 0;
        self.saw_colon = false;
    }

    fn into_declarations(mut self) -> Vec<Declaration> {
        self.finish();
        self.out
    }
}

fn is_property_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

fn is_safe_value(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    !(lower.contains("expression(")
        || lower.contains("javascript:")
        || lower.contains("vbscript:")
        || lower.contains(['\\', '<', '>']))
}

/// Parse a `style` attribute value into its well-formed declarations
pub fn parse_declarations(style: &str) -> Vec<Declaration> {
    let mut parser = DeclarationParser::new();
    for c in style.chars() {
        parser.feed(c);
    }
    parser.into_declarations()
}

/// Keep only declarations whose property the policy allows.
///
/// Survivors are joined with `; `. A trailing `;` on the input is kept when
/// anything survives; nothing surviving yields an empty string.
pub fn filter_style(style: &str, policy: &Policy) -> String {
    let kept: Vec<String> = parse_declarations(style)
        .into_iter()
        .filter(|decl| {
            let allowed = policy.allows_style(&decl.property);
            if !allowed {
                tracing::trace!("dropping style property {}", decl.property);
            }
            allowed
        })
        .map(|decl| format!("{}: {}", decl.property, decl.value))
        .collect();

    let mut out = kept.join("; ");
    if !out.is_empty() && style.trim_end().ends_with(';') {
        out.push(';');
    }
    out
}
