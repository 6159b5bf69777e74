// crates/parcel-core/src/payload.rs
//
// Records exchanged across the RPC boundary.
//
// Every field is optional: all records construct with zero arguments and
// fields are set individually. Absent fields are omitted on the wire and
// render as `null`; empty collections render as `{}` / `[]`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::decimal::ExactDecimal;
use crate::marshal::{fmt_opt, fmt_opt_map, fmt_opt_text, unique_keys};

// ---------------------------------------------------------------------------
// Sex
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::Male => f.write_str("male"),
            Sex::Female => f.write_str("female"),
        }
    }
}

impl FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "male" => Ok(Sex::Male),
            "female" => Ok(Sex::Female),
            other => Err(format!("unknown sex `{}` (expected male or female)", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// KeyedValueRequest
// ---------------------------------------------------------------------------

/// Identity-style request: who is asking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyedValueRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<Sex>,
}

impl KeyedValueRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_sex(mut self, sex: Sex) -> Self {
        self.sex = Some(sex);
        self
    }
}

impl fmt::Display for KeyedValueRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyedValueRequest{id=")?;
        fmt_opt(f, &self.id)?;
        f.write_str(", name=")?;
        fmt_opt_text(f, &self.name)?;
        f.write_str(", email=")?;
        fmt_opt_text(f, &self.email)?;
        f.write_str(", sex=")?;
        fmt_opt(f, &self.sex)?;
        f.write_str("}")
    }
}

// ---------------------------------------------------------------------------
// TypedScalarRequest
// ---------------------------------------------------------------------------

/// Request carrying a free-form attribute map and an exact amount.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedScalarRequest {
    #[serde(default, deserialize_with = "unique_keys", skip_serializing_if = "Option::is_none")]
    pub attributes: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<ExactDecimal>,
}

impl TypedScalarRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attributes(mut self, attributes: BTreeMap<String, String>) -> Self {
        self.attributes = Some(attributes);
        self
    }

    pub fn with_amount(mut self, amount: ExactDecimal) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Insert one attribute, creating the map if absent. Last write wins.
    pub fn insert_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.attributes
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into())
    }
}

impl fmt::Display for TypedScalarRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TypedScalarRequest{attributes=")?;
        fmt_opt_map(f, &self.attributes)?;
        f.write_str(", amount=")?;
        fmt_opt(f, &self.amount)?;
        f.write_str("}")
    }
}

// ---------------------------------------------------------------------------
// GenericListWrapper<T>
// ---------------------------------------------------------------------------

/// An optional ordered list of `T`. The wrapper knows nothing about `T`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericListWrapper<T> {
    // Missing decodes as `None`; `default` would bound `T: Default`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<T>>,
}

impl<T> GenericListWrapper<T> {
    /// A wrapper with no list at all (distinct from an empty list).
    pub fn new() -> Self {
        Self { items: None }
    }

    pub fn from_items(items: Vec<T>) -> Self {
        Self { items: Some(items) }
    }

    /// Append an item, creating the list if absent.
    pub fn push(&mut self, item: T) {
        self.items.get_or_insert_with(Vec::new).push(item);
    }

    pub fn is_absent(&self) -> bool {
        self.items.is_none()
    }

    pub fn len(&self) -> usize {
        self.items.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for GenericListWrapper<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for GenericListWrapper<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_items(iter.into_iter().collect())
    }
}

impl<T: fmt::Display> fmt::Display for GenericListWrapper<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("GenericListWrapper{items=")?;
        match &self.items {
            None => f.write_str("null")?,
            Some(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")?;
            }
        }
        f.write_str("}")
    }
}

// ---------------------------------------------------------------------------
// CompositeResponse
// ---------------------------------------------------------------------------

/// The canonical response shape. Fields were added over successive revisions,
/// so consumers must tolerate any subset being absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "unique_keys", skip_serializing_if = "Option::is_none")]
    pub info: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list: Option<GenericListWrapper<i64>>,
    #[serde(default, deserialize_with = "unique_keys", skip_serializing_if = "Option::is_none")]
    pub secondary_info: Option<BTreeMap<String, String>>,
    #[serde(default, deserialize_with = "unique_keys", skip_serializing_if = "Option::is_none")]
    pub orders: Option<BTreeMap<i64, String>>,
}

impl CompositeResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_info(mut self, info: BTreeMap<String, String>) -> Self {
        self.info = Some(info);
        self
    }

    pub fn with_list(mut self, list: GenericListWrapper<i64>) -> Self {
        self.list = Some(list);
        self
    }

    pub fn with_secondary_info(mut self, secondary_info: BTreeMap<String, String>) -> Self {
        self.secondary_info = Some(secondary_info);
        self
    }

    pub fn with_orders(mut self, orders: BTreeMap<i64, String>) -> Self {
        self.orders = Some(orders);
        self
    }

    pub fn insert_info(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.info.get_or_insert_with(BTreeMap::new).insert(key.into(), value.into())
    }

    pub fn insert_secondary_info(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.secondary_info
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into())
    }

    pub fn insert_order(&mut self, order_id: i64, state: impl Into<String>) -> Option<String> {
        self.orders.get_or_insert_with(BTreeMap::new).insert(order_id, state.into())
    }
}

impl fmt::Display for CompositeResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CompositeResponse{status=")?;
        fmt_opt_text(f, &self.status)?;
        f.write_str(", info=")?;
        fmt_opt_map(f, &self.info)?;
        f.write_str(", list=")?;
        fmt_opt(f, &self.list)?;
        f.write_str(", secondaryInfo=")?;
        fmt_opt_map(f, &self.secondary_info)?;
        f.write_str(", orders=")?;
        fmt_opt_map(f, &self.orders)?;
        f.write_str("}")
    }
}
