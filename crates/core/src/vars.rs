//! Variable substitution for target paths and source locators.
//!
//! # Syntax
//!
//! - `$name` - `name` is a run of ASCII letters, digits and underscores
//! - `${name}` - `name` is everything up to the closing brace
//!
//! A `$` that starts neither form is kept as is, as is an unterminated `${`.
//! Unknown names expand to `??`. Substituted values are never re-scanned.
//!
//! # Example
//!
//! ```
//! use mkpkg_core::vars::VariableSet;
//!
//! let mut vars = VariableSet::new();
//! vars.insert("version", "1.2");
//! assert_eq!(vars.expand("mods/foo-${version}.jar"), "mods/foo-1.2.jar");
//! assert_eq!(vars.expand("$missing/x"), "??/x");
//! ```

use std::collections::BTreeMap;

use tracing::warn;

use crate::error::DescriptorError;

/// Replacement text for a variable with no binding.
pub const UNKNOWN_VALUE: &str = "??";

/// A segment of parsed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Literal text
    Literal(&'a str),

    /// A variable reference, by name
    Variable(&'a str),
}

/// Split a string into literal text and variable references.
pub fn parse(input: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let bytes = input.as_bytes();
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'$' {
            i += 1;
            continue;
        }

        let reference = match bytes.get(i + 1) {
            Some(b'{') => input[i + 2..].find('}').map(|close| {
                let name = &input[i + 2..i + 2 + close];
                (name, i + 2 + close + 1)
            }),
            Some(_) => {
                let len = bytes[i + 1..]
                    .iter()
                    .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
                    .count();
                (len > 0).then(|| (&input[i + 1..i + 1 + len], i + 1 + len))
            }
            None => None,
        };

        match reference {
            Some((name, end)) => {
                if literal_start < i {
                    segments.push(Segment::Literal(&input[literal_start..i]));
                }
                segments.push(Segment::Variable(name));
                i = end;
                literal_start = end;
            }
            None => i += 1,
        }
    }

    if literal_start < input.len() {
        segments.push(Segment::Literal(&input[literal_start..]));
    }

    segments
}

/// Named string bindings used to expand `$name` references.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableSet {
    values: BTreeMap<String, String>,
}

impl VariableSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `value`, replacing any earlier binding.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parse command-line style `KEY=VALUE` definitions.
    ///
    /// The value is everything after the first `=`.
    pub fn parse_definition(definition: &str) -> Result<(String, String), DescriptorError> {
        match definition.split_once('=') {
            Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
            _ => Err(DescriptorError::InvalidVariable(definition.to_string())),
        }
    }

    /// Expand every variable reference in `input`.
    pub fn expand(&self, input: &str) -> String {
        let mut result = String::with_capacity(input.len());

        for segment in parse(input) {
            match segment {
                Segment::Literal(s) => result.push_str(s),
                Segment::Variable(name) => match self.get(name) {
                    Some(value) => result.push_str(value),
                    None => {
                        warn!(variable = %name, text = %input, "undefined variable");
                        result.push_str(UNKNOWN_VALUE);
                    }
                },
            }
        }

        result
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for VariableSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut vars = VariableSet::new();
        for (k, v) in iter {
            vars.insert(k, v);
        }
        vars
    }
}
