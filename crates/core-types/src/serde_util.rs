// In crates/core-types/src/serde_util.rs

use serde::{Deserialize, Deserializer};

/// Reads an explicit JSON `null` as the type's default, so `"bids": null` is an empty list.
///
/// Pair with `#[serde(default)]` to cover a missing field as well.
pub fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
