// Field helpers for hand-edited rule files. An explicit `null` reads the
// same as a missing field, and stats may be written as any number.

use serde::{Deserialize, Deserializer};

/// `null` becomes `T::default()`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawStat {
    Number(f64),
    Text(String),
}

/// A base stat: integers, fractional numbers (rounded) and numeric strings
/// are accepted. Anything else reads as 0.
pub fn lenient_stat<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Option::<RawStat>::deserialize(deserializer)? {
        Some(RawStat::Number(n)) => n,
        Some(RawStat::Text(text)) => text.trim().parse::<f64>().unwrap_or(0.0),
        None => 0.0,
    };
    Ok(round_stat(value))
}

fn round_stat(value: f64) -> i32 {
    if !value.is_finite() {
        return 0;
    }
    value.round().clamp(i32::MIN as f64, i32::MAX as f64) as i32
}
