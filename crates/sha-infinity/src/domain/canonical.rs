//! Canonical JSON serialization
//!
//! Produces a byte encoding of structured data that does not depend on map
//! key insertion order:
//!
//! - scalars use standard JSON text
//! - sequences keep element order: `[a,b,c]`
//! - mappings are sorted by key: `{"a":1,"b":2}`
//! - no whitespace
//! - strings are escaped to printable ASCII, with `\uXXXX` (lowercase hex)
//!   for everything else, so records produced by older ASCII-only tooling
//!   verify byte for byte

use serde::Serialize;
use serde_json::Value;

use crate::error::IntegrityError;

/// Deepest sequence/mapping nesting accepted before failing.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Canonical JSON text of any serializable value
pub fn to_canonical_json<T: Serialize + ?Sized>(value: &T) -> Result<String, IntegrityError> {
    let value = serde_json::to_value(value)?;
    canonicalize(&value)
}

/// Canonical bytes of any serializable value
pub fn to_canonical_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, IntegrityError> {
    to_canonical_json(value).map(String::into_bytes)
}

/// Canonical JSON text of a `serde_json::Value`
pub fn canonicalize(value: &Value) -> Result<String, IntegrityError> {
    let mut out = String::new();
    write_value(&mut out, value, 0)?;
    Ok(out)
}

fn write_value(out: &mut String, value: &Value, depth: usize) -> Result<(), IntegrityError> {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Number(n) => match n.as_f64() {
            Some(x) if n.is_f64() => write_float(out, x),
            _ => out.push_str(&n.to_string()),
        },
        Value::String(s) => write_string(out, s),
        Value::Array(items) => {
            let depth = enter(depth)?;
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item, depth)?;
            }
            out.push(']');
        }
        Value::Object(map) => {
            let depth = enter(depth)?;
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(out, key);
                out.push(':');
                write_value(out, item, depth)?;
            }
            out.push('}');
        }
    }
    Ok(())
}

fn enter(depth: usize) -> Result<usize, IntegrityError> {
    if depth >= MAX_NESTING_DEPTH {
        return Err(IntegrityError::Serialization(format!(
            "nesting exceeds {} levels (cyclic or runaway structure)",
            MAX_NESTING_DEPTH
        )));
    }
    Ok(depth + 1)
}

/// Shortest round-trip digits; exponent form outside `1e-4 <= |x| < 1e16`
fn write_float(out: &mut String, x: f64) {
    let sci = format!("{:e}", x.abs());
    let parsed = sci
        .split_once('e')
        .and_then(|(mantissa, exp)| exp.parse::<i32>().ok().map(|exp| (mantissa.replace('.', ""), exp)));
    let Some((digits, exp)) = parsed else {
        out.push_str(&x.to_string());
        return;
    };

    if x.is_sign_negative() {
        out.push('-');
    }

    if !(-4..16).contains(&exp) {
        out.push_str(&digits[..1]);
        if digits.len() > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        }
        let sign = if exp < 0 { '-' } else { '+' };
        out.push_str(&format!("e{}{:02}", sign, exp.unsigned_abs()));
    } else if exp < 0 {
        out.push_str("0.");
        out.extend(std::iter::repeat('0').take((-exp - 1) as usize));
        out.push_str(&digits);
    } else {
        let int_len = exp as usize + 1;
        if digits.len() <= int_len {
            out.push_str(&digits);
            out.extend(std::iter::repeat('0').take(int_len - digits.len()));
            out.push_str(".0");
        } else {
            out.push_str(&digits[..int_len]);
            out.push('.');
            out.push_str(&digits[int_len..]);
        }
    }
}

fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            ' '..='~' => out.push(ch),
            _ => {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    out.push_str(&format!("\\u{:04x}", unit));
                }
            }
        }
    }
    out.push('"');
}
