//! Value Module
//!
//! The scalar kinds the cache accepts and how each is written to the backend
//! and rendered into the call history.

use crate::history::CallArgs;

// == Value ==
/// A scalar accepted by `Cache::store`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Binary(Vec<u8>),
    Integer(i64),
    Float(f64),
}

impl Value {
    // == Encoding ==
    /// Bytes written to the backend. Numbers are stored as their decimal text.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Value::Text(s) => s.as_bytes().to_vec(),
            Value::Binary(b) => b.clone(),
            Value::Integer(i) => i.to_string().into_bytes(),
            Value::Float(f) => float_repr(*f).into_bytes(),
        }
    }

    // == Repr ==
    /// Literal form used in the inputs history: `'world'`, `b'hello'`, `123`, `45.67`.
    pub fn repr(&self) -> String {
        match self {
            Value::Text(s) => quote_text(s),
            Value::Binary(b) => quote_bytes(b),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => float_repr(*f),
        }
    }
}

impl CallArgs for Value {
    fn render_args(&self) -> String {
        format!("({},)", self.repr())
    }
}

// == Conversions ==
impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Binary(b.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Value {
    fn from(b: &[u8; N]) -> Self {
        Value::Binary(b.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Binary(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i.into())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

// == Rendering Helpers ==
/// Shortest round-trip decimal, always carrying a fractional part or exponent.
///
/// Exponents carry a sign and at least two digits: `1e+16`, `1.5e-05`.
fn float_repr(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_string();
    }
    if f.is_infinite() {
        let inf = if f > 0.0 { "inf" } else { "-inf" };
        return inf.to_string();
    }

    let shortest = format!("{:?}", f);
    match shortest.split_once('e') {
        None => shortest,
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
    }
}

/// Single quotes unless the content holds a `'` and no `"`.
fn pick_quote(has_single: bool, has_double: bool) -> char {
    if has_single && !has_double {
        '"'
    } else {
        '\''
    }
}

fn quote_text(s: &str) -> String {
    let quote = pick_quote(s.contains('\''), s.contains('"'));
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() || (c.is_whitespace() && c != ' ') => {
                let code = c as u32;
                if code <= 0xff {
                    out.push_str(&format!("\\x{:02x}", code));
                } else if code <= 0xffff {
                    out.push_str(&format!("\\u{:04x}", code));
                } else {
                    out.push_str(&format!("\\U{:08x}", code));
                }
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

fn quote_bytes(b: &[u8]) -> String {
    let quote = pick_quote(b.contains(&b'\''), b.contains(&b'"'));
    let mut out = String::with_capacity(b.len() + 3);
    out.push('b');
    out.push(quote);
    for &byte in b {
        match byte {
            b'\\' => out.push_str("\\\\"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            byte if byte as char == quote => {
                out.push('\\');
                out.push(quote);
            }
            0x20..=0x7e => out.push(byte as char),
            _ => out.push_str(&format!("\\x{:02x}", byte)),
        }
    }
    out.push(quote);
    out
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_args() {
        assert_eq!(Value::from(b"hello").render_args(), "(b'hello',)");
        assert_eq!(Value::from("world").render_args(), "('world',)");
        assert_eq!(Value::from(123).render_args(), "(123,)");
        assert_eq!(Value::from(45.67).render_args(), "(45.67,)");
    }

    #[test]
    fn test_to_bytes() {
        assert_eq!(Value::from("world").to_bytes(), b"world");
        assert_eq!(Value::from(123).to_bytes(), b"123");
        assert_eq!(Value::from(-7i64).to_bytes(), b"-7");
        assert_eq!(Value::from(45.67).to_bytes(), b"45.67");
        assert_eq!(Value::from(2.0).to_bytes(), b"2.0");
    }

    #[test]
    fn test_repr_escapes() {
        assert_eq!(Value::from("it's").repr(), "\"it's\"");
        assert_eq!(Value::from("say \"hi\"").repr(), "'say \"hi\"'");
        assert_eq!(Value::from("it's \"x\"").repr(), "'it\\'s \"x\"'");
        assert_eq!(Value::from(b"it's").repr(), "b\"it's\"");
        assert_eq!(Value::from("a\\b").repr(), "'a\\\\b'");
        assert_eq!(Value::from("nbsp\u{a0}").repr(), "'nbsp\\xa0'");
        assert_eq!(Value::from("café").repr(), "'café'");
        assert_eq!(Value::from("a\nb").repr(), "'a\\nb'");
        assert_eq!(Value::from(vec![0u8, 0xff, b'A']).repr(), "b'\\x00\\xffA'");
    }

    #[test]
    fn test_float_specials() {
        assert_eq!(Value::from(f64::NAN).repr(), "nan");
        assert_eq!(Value::from(f64::INFINITY).repr(), "inf");
        assert_eq!(Value::from(f64::NEG_INFINITY).repr(), "-inf");
    }

    #[test]
    fn test_float_exponent_form() {
        assert_eq!(Value::from(1e16).repr(), "1e+16");
        assert_eq!(Value::from(1.5e-5).repr(), "1.5e-05");
        assert_eq!(Value::from(-2.5e100).repr(), "-2.5e+100");
        assert_eq!(Value::from(1e-4).repr(), "0.0001");
        assert_eq!(Value::from(1e15).repr(), "1000000000000000.0");
        assert_eq!(Value::from(1e16).to_bytes(), b"1e+16");
    }
}
