//! Identifier decoding
//!
//! Ids are UUIDs. Documents from older tools carry numeric ids (millisecond
//! timestamps, sometimes with a random fraction); those map to a fixed UUID
//! derived from the number's bits, so the same number always yields the same
//! id.

use serde::{Deserialize, Deserializer};
use uuid::Uuid;

/// High half of every UUID derived from a numeric id
const NUMERIC_ID_PREFIX: u64 = 0x5348_4150_4552_0000;

/// Deterministic UUID for a numeric id
pub fn numeric_id(value: f64) -> Uuid {
    // -0.0 and 0.0 are the same id
    let value = if value == 0.0 { 0.0 } else { value };
    Uuid::from_u64_pair(NUMERIC_ID_PREFIX, value.to_bits())
}

/// Deserialize an id given either as a UUID string or as a number
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<Uuid, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Uuid(Uuid),
        Number(f64),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Uuid(id) => Ok(id),
        RawId::Number(value) if value.is_finite() => Ok(numeric_id(value)),
        RawId::Number(value) => Err(serde::de::Error::custom(format!(
            "invalid numeric id {value}"
        ))),
    }
}
