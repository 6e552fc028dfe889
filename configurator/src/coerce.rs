//! Conversion of raw strings into typed field values.

use chrono::DateTime;
use tracing::{trace, warn};

use crate::error::{Error, ParseError};
use crate::types::{Bindable, DeclaredType, Value};

/// Parse `raw` according to `declared` and store the result into `handle`.
///
/// `Option<T>` targets get a freshly allocated `T`; whatever the option held
/// before is replaced. Sequences are accepted but left untouched.
///
/// # Errors
///
/// - [`Error::UnsupportedType`] for structs, maps, nested options and other
///   types without a rule
/// - [`Error::Parse`] carrying the literal parser's own error otherwise
pub fn coerce(handle: &mut dyn Bindable, declared: &DeclaredType, raw: &str) -> Result<(), Error> {
    if let DeclaredType::Sequence(_) = declared {
        warn!(%declared, "sequence coercion is not implemented, value ignored");
        return Ok(());
    }

    let (operation, rule) = match declared {
        DeclaredType::Pointer(target) => ("coerce pointer", target.as_ref()),
        other => ("coerce", other),
    };
    let Some(parsed) = parse_literal(rule, raw) else {
        return Err(Error::unsupported(operation, declared));
    };

    trace!(%declared, "coerced value");
    handle.store(parsed?)
}

/// `None` when `declared` has no scalar rule.
fn parse_literal(declared: &DeclaredType, raw: &str) -> Option<Result<Value, ParseError>> {
    let parsed = match declared {
        DeclaredType::Bool => parse_bool(raw).map(Value::Bool),
        DeclaredType::I8 | DeclaredType::I16 | DeclaredType::I32 | DeclaredType::Isize => {
            parse_platform_int(raw).map(Value::Int)
        }
        DeclaredType::I64 => parse_int(raw).map(Value::Int),
        DeclaredType::U8 | DeclaredType::U16 | DeclaredType::U32 | DeclaredType::Usize => {
            parse_platform_uint(raw).map(Value::Uint)
        }
        DeclaredType::U64 => parse_uint(raw).map(Value::Uint),
        DeclaredType::F32 | DeclaredType::F64 => {
            raw.parse::<f64>().map(Value::Float).map_err(ParseError::from)
        }
        DeclaredType::String => Ok(Value::Str(raw.to_string())),
        DeclaredType::Duration => humantime::parse_duration(raw)
            .map(Value::Duration)
            .map_err(ParseError::from),
        DeclaredType::Timestamp => DateTime::parse_from_rfc3339(raw)
            .map(Value::Timestamp)
            .map_err(ParseError::from),
        DeclaredType::Pointer(_)
        | DeclaredType::Sequence(_)
        | DeclaredType::Map
        | DeclaredType::Struct(_)
        | DeclaredType::Other(_) => return None,
    };
    Some(parsed)
}

fn parse_bool(raw: &str) -> Result<bool, ParseError> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(ParseError::Bool {
            literal: raw.to_string(),
        }),
    }
}

/// Split an unsigned integer literal into its radix and digits.
///
/// Recognizes `0x`, `0o`, `0b` and a bare leading `0` (octal). Underscores
/// between digits are dropped; misplaced ones are kept so the digit parser
/// rejects them.
fn split_radix(literal: &str) -> (u32, String) {
    let lower = literal.get(..2).map(str::to_ascii_lowercase);
    let (radix, digits) = match lower.as_deref() {
        Some("0x") => (16, &literal[2..]),
        Some("0o") => (8, &literal[2..]),
        Some("0b") => (2, &literal[2..]),
        _ if literal.len() > 1 && literal.starts_with('0') => (8, &literal[1..]),
        _ => (10, literal),
    };

    let well_formed = !digits.starts_with('_') && !digits.ends_with('_') && !digits.contains("__");
    if well_formed {
        (radix, digits.replace('_', ""))
    } else {
        (radix, digits.to_string())
    }
}

/// `from_str_radix` accepts a sign of its own; only one in front of the
/// radix prefix is valid.
fn has_sign(digits: &str) -> bool {
    digits.starts_with(['+', '-'])
}

fn parse_int(raw: &str) -> Result<i64, ParseError> {
    let (sign, body) = match raw.as_bytes().first() {
        Some(b'+' | b'-') => raw.split_at(1),
        _ => ("", raw),
    };
    let (radix, digits) = split_radix(body);
    if has_sign(&digits) {
        return Err(ParseError::Sign {
            literal: raw.to_string(),
        });
    }
    let wide = i128::from_str_radix(&format!("{sign}{digits}"), radix)?;
    i64::try_from(wide).map_err(|_| ParseError::out_of_range(raw, &DeclaredType::I64))
}

fn parse_uint(raw: &str) -> Result<u64, ParseError> {
    let (radix, digits) = split_radix(raw);
    if has_sign(raw) || has_sign(&digits) {
        return Err(ParseError::Sign {
            literal: raw.to_string(),
        });
    }
    Ok(u64::from_str_radix(&digits, radix)?)
}

fn parse_platform_int(raw: &str) -> Result<i64, ParseError> {
    let value = parse_int(raw)?;
    match isize::try_from(value) {
        Ok(_) => Ok(value),
        Err(_) => Err(ParseError::out_of_range(raw, &DeclaredType::Isize)),
    }
}

fn parse_platform_uint(raw: &str) -> Result<u64, ParseError> {
    let value = parse_uint(raw)?;
    match usize::try_from(value) {
        Ok(_) => Ok(value),
        Err(_) => Err(ParseError::out_of_range(raw, &DeclaredType::Usize)),
    }
}
