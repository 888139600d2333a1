use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    node::{Scalar, ScalarStyle},
    value::Value,
};

/// Turns scalar text into a typed [`Value`].
pub trait ScalarResolver {
    /// Resolves one scalar.
    fn resolve(&self, scalar: &Scalar) -> Value;
}

/// YAML 1.1 style resolution.
///
/// Quoted scalars are strings. Plain scalars are tried as null, bool, integer and float, in that
/// order, and fall back to string. Integers become `I32` when they fit and `I64` otherwise;
/// integers wider than 64 bits stay strings.
#[derive(Debug, Default, Clone, Copy)]
pub struct CoreSchema;

static NULL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:~|null|Null|NULL)?$").unwrap());

static BOOL_TRUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:yes|Yes|YES|true|True|TRUE|on|On|ON)$").unwrap());

static BOOL_FALSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:no|No|NO|false|False|FALSE|off|Off|OFF)$").unwrap());

static INT_DECIMAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-+]?(?:0|[1-9][0-9_]*)$").unwrap());

static INT_HEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-+]?0x[0-9a-fA-F_]+$").unwrap());

static INT_OCTAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-+]?0o?[0-7_]+$").unwrap());

static INT_BINARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-+]?0b[01_]+$").unwrap());

static FLOAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[-+]?(?:\.[0-9]+|[0-9][0-9_]*(?:\.[0-9_]*)?)(?:[eE][-+]?[0-9]+)?$").unwrap()
});

static FLOAT_INF: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([-+]?)\.(?:inf|Inf|INF)$").unwrap());

static FLOAT_NAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\.(?:nan|NaN|NAN)$").unwrap());

impl ScalarResolver for CoreSchema {
    fn resolve(&self, scalar: &Scalar) -> Value {
        let text = scalar.value();
        if scalar.style() == ScalarStyle::Quoted {
            return Value::String(text.to_owned());
        }
        if NULL.is_match(text) {
            return Value::Null;
        }
        if BOOL_TRUE.is_match(text) {
            return Value::Bool(true);
        }
        if BOOL_FALSE.is_match(text) {
            return Value::Bool(false);
        }
        if let Some(value) = resolve_int(text) {
            return value;
        }
        if let Some(value) = resolve_float(text) {
            return Value::F64(value);
        }
        Value::String(text.to_owned())
    }
}

fn resolve_int(text: &str) -> Option<Value> {
    let (radix, digits_start) = if INT_DECIMAL.is_match(text) {
        (10, 0)
    } else if INT_HEX.is_match(text) {
        (16, 2)
    } else if INT_BINARY.is_match(text) {
        (2, 2)
    } else if INT_OCTAL.is_match(text) {
        let prefix = if text.trim_start_matches(['-', '+']).starts_with("0o") {
            2
        } else {
            1
        };
        (8, prefix)
    } else {
        return None;
    };

    let (negative, unsigned) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let digits: String = unsigned[digits_start..]
        .chars()
        .filter(|c| *c != '_')
        .collect();
    if digits.is_empty() {
        return None;
    }

    let signed = if negative {
        format!("-{digits}")
    } else {
        digits
    };
    let Ok(n) = i64::from_str_radix(&signed, radix) else {
        // Too wide for i64: keep the text.
        return Some(Value::String(text.to_owned()));
    };
    Some(match i32::try_from(n) {
        Ok(n) => Value::I32(n),
        Err(_) => Value::I64(n),
    })
}

fn resolve_float(text: &str) -> Option<f64> {
    if let Some(captures) = FLOAT_INF.captures(text) {
        let negative = captures.get(1).is_some_and(|sign| sign.as_str() == "-");
        return Some(if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }
    if FLOAT_NAN.is_match(text) {
        return Some(f64::NAN);
    }
    if !FLOAT.is_match(text) {
        return None;
    }
    text.replace('_', "").parse().ok()
}
