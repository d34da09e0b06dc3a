//! Version specifier normalization
//!
//! Descriptors may write a version or a version constraint as a bare YAML
//! number, a string, or leave it empty. Everything is turned into a string,
//! and the wildcard spellings collapse into the open range `(,)`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Range expression that matches every version.
pub const ANY_RANGE: &str = "(,)";

/// A scalar as written in the descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Integer(n) => write!(f, "{}", n),
            Scalar::Float(x) => write_float(f, *x),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

/// Shortest round-trip form with a fractional part (`1.0`), and a signed
/// two-digit exponent (`1e+20`, `1e-05`) for very large or small values.
fn write_float(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    let repr = format!("{:?}", x);
    match repr.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            write!(f, "{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => f.write_str(&repr),
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

/// Convert a raw dependency or conflict specifier into a range expression.
///
/// Numbers become their string form, a missing specifier or `any`/`all`
/// (any case) becomes [`ANY_RANGE`], and anything else is returned as is.
pub fn normalize(raw: Option<&Scalar>) -> String {
    match raw {
        None => ANY_RANGE.to_string(),
        Some(Scalar::Text(s)) if s.eq_ignore_ascii_case("any") || s.eq_ignore_ascii_case("all") => {
            ANY_RANGE.to_string()
        }
        Some(other) => other.to_string(),
    }
}
