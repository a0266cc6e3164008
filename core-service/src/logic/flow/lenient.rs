//! Lenient Field Decoding
//!
//! Upstream feature extraction writes flags as booleans or 0/1 numbers and
//! counts as floats (`25.0`). These `deserialize_with` helpers accept every
//! such encoding. A value that cannot be read as the target type becomes
//! `None` (the field's documented default) instead of failing the batch.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

/// Flag field: `true`/`false`, `1`/`0`, `1.0`/`0.0` or their string forms.
/// Only a set flag decodes to `Some(1)`; any other readable value is `Some(0)`.
pub fn flag<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Option::<RawValue>::deserialize(deserializer)? {
        Some(raw) => raw,
        None => return Ok(None),
    };

    let set = match raw {
        RawValue::Bool(b) => Some(b),
        RawValue::Int(n) => Some(n == 1),
        RawValue::Float(f) => Some(f == 1.0),
        RawValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "1.0" => Some(true),
            "false" | "0" | "0.0" => Some(false),
            _ => None,
        },
    };

    match set {
        Some(set) => Ok(Some(u8::from(set))),
        None => {
            log::warn!("Unreadable flag value, treating as absent");
            Ok(None)
        }
    }
}

/// Integer field: accepts integers and integral floats (`25.0`). Fractional,
/// negative-for-unsigned or out-of-range values are treated as absent.
pub fn count<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let raw = match Option::<RawValue>::deserialize(deserializer)? {
        Some(raw) => raw,
        None => return Ok(None),
    };

    let whole = match raw {
        RawValue::Int(n) => Some(n),
        RawValue::Float(f) => integral(f),
        RawValue::Text(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| s.parse::<f64>().ok().and_then(integral))
        }
        RawValue::Bool(_) => None,
    };

    match whole.and_then(|n| T::try_from(n).ok()) {
        Some(value) => Ok(Some(value)),
        None => {
            log::warn!("Unreadable count value, treating as absent");
            Ok(None)
        }
    }
}

fn integral(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}
