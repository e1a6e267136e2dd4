//! Tolerant decoding of opaque page hits into typed records.
//!
//! Every record type marks its fields with [`lenient`], so a field that is
//! missing, `null` or of the wrong JSON type falls back to its zero value
//! instead of failing the whole record. The upstream payloads are
//! heterogeneous (`username`, `imageUrl`, `birthdate` are frequently `null`),
//! and a sparse record is still worth keeping.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Field-level deserializer: decode `T` or fall back to `T::default()`.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// A typed shape that page hits can be decoded into.
pub trait Record: DeserializeOwned + Default {
    /// Short name used in log fields.
    const KIND: &'static str;
}

/// Decode one hit into `T`.
///
/// Never fails: a hit that is not an object at all (a bare string, `null`)
/// yields `T::default()` and a warning.
pub fn decode<T: Record>(hit: Value) -> T {
    match serde_json::from_value::<T>(hit) {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!(kind = T::KIND, error = %e, "Hit is not a record, using empty value");
            T::default()
        }
    }
}

/// Decode every hit in order.
pub fn decode_all<T: Record>(hits: Vec<Value>) -> Vec<T> {
    hits.into_iter().map(decode::<T>).collect()
}
