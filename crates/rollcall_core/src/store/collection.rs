//! Whole-collection JSON load/save over a `KeyValueStore`.

use super::{KeyValueStore, StoreError, StoreResult};
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Records decoded from a stored collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedCollection<T> {
    pub items: Vec<T>,
    /// Entries of a well-formed array that did not fit the record schema.
    pub skipped: usize,
}

/// Loads the JSON array stored under `key`, decoding each entry on its own.
///
/// A missing key yields an empty collection. A payload that is not a JSON
/// array is logged and also yields an empty collection so the tracker stays
/// usable. Entries that do not decode are logged, skipped and counted.
pub fn load_records<T, S>(store: &S, key: &str) -> StoreResult<LoadedCollection<T>>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let mut loaded = LoadedCollection {
        items: Vec::new(),
        skipped: 0,
    };
    let Some(raw) = store.get(key)? else {
        return Ok(loaded);
    };

    let entries = match serde_json::from_str::<Vec<Value>>(&raw) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(
                "event=collection_load module=store status=corrupt key={} error={}",
                key, err
            );
            return Ok(loaded);
        }
    };

    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<T>(entry) {
            Ok(item) => loaded.items.push(item),
            Err(err) => {
                warn!(
                    "event=collection_load module=store status=skipped key={} index={} error={}",
                    key, index, err
                );
                loaded.skipped += 1;
            }
        }
    }
    Ok(loaded)
}

/// Loads the decodable records stored under `key`; see [`load_records`].
pub fn load_collection<T, S>(store: &S, key: &str) -> StoreResult<Vec<T>>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    Ok(load_records(store, key)?.items)
}

/// Replaces the collection stored under `key` with `items`.
pub fn save_collection<T, S>(store: &S, key: &str, items: &[T]) -> StoreResult<()>
where
    T: Serialize,
    S: KeyValueStore + ?Sized,
{
    let encoded = serde_json::to_string(items).map_err(|source| StoreError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &encoded)
}
