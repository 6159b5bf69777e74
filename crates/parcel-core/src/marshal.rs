// crates/parcel-core/src/marshal.rs
//
// Strict serde helpers for optional mapping fields.
//
// An absent map decodes as `None`, an empty map as `Some(empty)`, and a wire
// object that repeats a key is rejected instead of collapsing to the last entry.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};

/// `deserialize_with` target for `Option<BTreeMap<K, V>>` fields.
///
/// Pair with `#[serde(default)]` so a missing field stays `None`.
pub fn unique_keys<'de, D, K, V>(deserializer: D) -> Result<Option<BTreeMap<K, V>>, D::Error>
where
    D: Deserializer<'de>,
    K: Deserialize<'de> + Ord + fmt::Display,
    V: Deserialize<'de>,
{
    deserializer.deserialize_option(UniqueKeys(PhantomData))
}

struct UniqueKeys<K, V>(PhantomData<(K, V)>);

impl<'de, K, V> Visitor<'de> for UniqueKeys<K, V>
where
    K: Deserialize<'de> + Ord + fmt::Display,
    V: Deserialize<'de>,
{
    type Value = Option<BTreeMap<K, V>>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map with unique keys, or null")
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(self)
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut map = BTreeMap::new();
        while let Some((key, value)) = access.next_entry::<K, V>()? {
            if map.contains_key(&key) {
                return Err(de::Error::custom(format!("duplicate map key `{}`", key)));
            }
            map.insert(key, value);
        }
        Ok(Some(map))
    }
}

/// Write an optional value as `null` when absent.
pub(crate) fn fmt_opt<T: fmt::Display>(f: &mut fmt::Formatter<'_>, value: &Option<T>) -> fmt::Result {
    match value {
        Some(v) => write!(f, "{}", v),
        None => f.write_str("null"),
    }
}

/// Write optional text quoted, so `''` and `null` stay distinguishable.
pub(crate) fn fmt_opt_text(f: &mut fmt::Formatter<'_>, value: &Option<String>) -> fmt::Result {
    match value {
        Some(v) => write!(f, "'{}'", v),
        None => f.write_str("null"),
    }
}

/// Write an optional map as `{k=v, ...}`, `{}` when empty, `null` when absent.
pub(crate) fn fmt_opt_map<K, V>(f: &mut fmt::Formatter<'_>, value: &Option<BTreeMap<K, V>>) -> fmt::Result
where
    K: fmt::Display,
    V: fmt::Display,
{
    let Some(map) = value else {
        return f.write_str("null");
    };
    f.write_str("{")?;
    for (i, (k, v)) in map.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}={}", k, v)?;
    }
    f.write_str("}")
}
