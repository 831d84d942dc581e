//! Lenient field decoding for node responses.
//!
//! The node encodes large quantities (`weave_size`, `diff`, `reward`, ...) as
//! decimal strings and small ones as JSON numbers, and omits fields freely.
//! Anything that can't be read as the expected kind decodes to `None`.

use serde::Deserializer;
use serde_derive::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum Numeric {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Text(String),
    Other(serde_json::Value),
}

impl Numeric {
    fn as_u64(&self) -> Option<u64> {
        match self {
            Numeric::Unsigned(n) => Some(*n),
            Numeric::Signed(n) => u64::try_from(*n).ok(),
            Numeric::Float(f) if f.is_finite() && *f >= 0.0 => Some(*f as u64),
            Numeric::Float(_) => None,
            Numeric::Text(s) => {
                let s = s.trim();
                s.parse::<u64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().filter(|f| *f >= 0.0).map(|f| f as u64))
            }
            Numeric::Other(_) => None,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Numeric::Unsigned(n) => Some(*n as f64),
            Numeric::Signed(n) => Some(*n as f64),
            Numeric::Float(f) => Some(*f),
            Numeric::Text(s) => s.trim().parse::<f64>().ok(),
            Numeric::Other(_) => None,
        }
        .filter(|f| f.is_finite())
    }

    fn into_text(self) -> Option<String> {
        match self {
            Numeric::Unsigned(n) => Some(n.to_string()),
            Numeric::Signed(n) => Some(n.to_string()),
            Numeric::Float(f) => Some(f.to_string()),
            Numeric::Text(s) => Some(s),
            Numeric::Other(_) => None,
        }
    }
}

fn numeric<'de, D>(deserializer: D) -> Result<Option<Numeric>, D::Error>
where
    D: Deserializer<'de>,
{
    <Option<Numeric> as serde::Deserialize>::deserialize(deserializer)
}

pub fn opt_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(numeric(deserializer)?.and_then(|n| n.as_u64()))
}

pub fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(numeric(deserializer)?.and_then(|n| n.as_f64()))
}

/// Keeps winston amounts as text, they don't fit in a u64
pub fn opt_amount<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(numeric(deserializer)?.and_then(Numeric::into_text))
}

pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = <Option<serde_json::Value> as serde::Deserialize>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// A list field that may be missing, `null`, or not a list at all
pub fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = <Option<serde_json::Value> as serde::Deserialize>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}
