//! Find options and the shape check that recognizes them.
//!
//! Query-builder entry points are overloaded: the same argument may be an entity
//! id, a plain filter or a find-options object. [`FindOptions::from_value`]
//! decides structurally, parsing the value once into typed fields.

use std::str::FromStr;

use log::{debug, trace};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value as JsonValue};

use crate::errors::FindOptionsError;
use crate::filters::WhereNode;

/// Every field name recognized as a find option.
pub const FIND_OPTIONS_FIELDS: [&str; 9] = [
    "select",
    "where",
    "relations",
    "order",
    "options",
    "cache",
    "skip",
    "take",
    "lock",
];

/// Returns true when `value` is an object carrying at least one recognized
/// find-options field with an acceptable shape.
///
/// This is a heuristic for telling argument shapes apart, not schema validation.
pub fn is_find_options(value: &JsonValue) -> bool {
    value
        .as_object()
        .is_some_and(|map| map.iter().any(|(field, value)| field_qualifies(field, value)))
}

/// Whether `value` is an acceptable shape for the find option `field`.
///
/// Unknown fields never qualify.
pub fn field_qualifies(field: &str, value: &JsonValue) -> bool {
    match field {
        "select" | "where" | "relations" | "order" | "options" | "lock" => value.is_object() || value.is_array(),
        "cache" => value.is_object() || value.is_array() || value.is_boolean() || value.is_number(),
        "skip" | "take" => value.is_number() || value.is_string(),
        _ => false,
    }
}

/// Name of a JSON value's type, for messages.
pub fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// Result caching hint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CacheOption {
    Enabled(bool),
    /// Cache duration as given by the caller.
    Duration(Number),
    /// Dialect-specific cache settings, passed through.
    Settings(JsonValue),
}

impl CacheOption {
    fn from_json(value: JsonValue) -> Option<Self> {
        match value {
            JsonValue::Bool(enabled) => Some(Self::Enabled(enabled)),
            JsonValue::Number(duration) => Some(Self::Duration(duration)),
            settings @ (JsonValue::Object(_) | JsonValue::Array(_)) => Some(Self::Settings(settings)),
            _ => None,
        }
    }
}

/// `skip`/`take` value. Numeric strings are kept as text; interpreting them is
/// left to the query builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PageValue {
    Number(Number),
    Text(String),
}

impl PageValue {
    fn from_json(value: JsonValue) -> Option<Self> {
        match value {
            JsonValue::Number(number) => Some(Self::Number(number)),
            JsonValue::String(text) => Some(Self::Text(text)),
            _ => None,
        }
    }
}

impl From<u64> for PageValue {
    fn from(value: u64) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<&str> for PageValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Find options as accepted by the query builder.
///
/// Only `where` is interpreted (see [`crate::Normalizer`]); every other field is
/// carried through untouched. `lock` in particular is inert.
///
/// # Examples
///
/// ```
/// use findom::FindOptions;
/// use serde_json::json;
///
/// let options: FindOptions = r#"{ "where": { "id": 7 }, "take": "10" }"#.parse().unwrap();
/// assert!(options.where_clause.is_some());
///
/// assert!(FindOptions::from_value(json!({ "foo": "bar" })).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FindOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select: Option<JsonValue>,
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    pub where_clause: Option<WhereNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relations: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<PageValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take: Option<PageValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock: Option<JsonValue>,
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an arbitrary JSON value as find options.
    ///
    /// Fails when the value is not an object or has no qualifying field (see
    /// [`is_find_options`]). Once qualified, recognized fields with an unusable
    /// shape are dropped and unknown keys are ignored.
    pub fn from_value(value: JsonValue) -> Result<Self, FindOptionsError> {
        match value {
            JsonValue::Object(map) => Self::from_map(map),
            other => Err(FindOptionsError::NotAnObject {
                found: json_type_name(&other),
            }),
        }
    }

    fn from_map(map: Map<String, JsonValue>) -> Result<Self, FindOptionsError> {
        if !map.iter().any(|(field, value)| field_qualifies(field, value)) {
            return Err(FindOptionsError::Unrecognized {
                keys: map.keys().cloned().collect(),
            });
        }

        let mut options = Self::default();
        for (field, value) in map {
            if value.is_null() {
                trace!("ignoring null find option {field}");
                continue;
            }
            let found = json_type_name(&value);
            match field.as_str() {
                "select" => options.select = Some(value),
                "where" => options.where_clause = Some(WhereNode::from_json(value)),
                "relations" => options.relations = Some(value),
                "order" => options.order = Some(value),
                "options" => options.options = Some(value),
                "lock" => options.lock = Some(value),
                "cache" => options.cache = CacheOption::from_json(value).or_else(|| dropped(&field, found)),
                "skip" => options.skip = PageValue::from_json(value).or_else(|| dropped(&field, found)),
                "take" => options.take = PageValue::from_json(value).or_else(|| dropped(&field, found)),
                _ => trace!("ignoring unrecognized find option {field}"),
            }
        }
        Ok(options)
    }

    /// Copy of these options with `where` replaced.
    pub(crate) fn replace_where(&self, where_clause: Option<WhereNode>) -> Self {
        Self {
            select: self.select.clone(),
            where_clause,
            relations: self.relations.clone(),
            order: self.order.clone(),
            options: self.options.clone(),
            cache: self.cache.clone(),
            skip: self.skip.clone(),
            take: self.take.clone(),
            lock: self.lock.clone(),
        }
    }

    /// Names of the fields that are set, in declaration order.
    pub fn present_fields(&self) -> Vec<&'static str> {
        let present = [
            self.select.is_some(),
            self.where_clause.is_some(),
            self.relations.is_some(),
            self.order.is_some(),
            self.options.is_some(),
            self.cache.is_some(),
            self.skip.is_some(),
            self.take.is_some(),
            self.lock.is_some(),
        ];
        FIND_OPTIONS_FIELDS
            .iter()
            .zip(present)
            .filter_map(|(field, is_set)| is_set.then_some(*field))
            .collect()
    }

    // ========== Builders ==========

    #[inline]
    pub fn with_select(mut self, select: JsonValue) -> Self {
        self.select = Some(select);
        self
    }

    #[inline]
    pub fn with_where(mut self, where_clause: impl Into<WhereNode>) -> Self {
        self.where_clause = Some(where_clause.into());
        self
    }

    #[inline]
    pub fn with_relations(mut self, relations: JsonValue) -> Self {
        self.relations = Some(relations);
        self
    }

    #[inline]
    pub fn with_order(mut self, order: JsonValue) -> Self {
        self.order = Some(order);
        self
    }

    #[inline]
    pub fn with_cache(mut self, cache: CacheOption) -> Self {
        self.cache = Some(cache);
        self
    }

    #[inline]
    pub fn with_page(mut self, skip: impl Into<PageValue>, take: impl Into<PageValue>) -> Self {
        self.skip = Some(skip.into());
        self.take = Some(take.into());
        self
    }

    #[inline]
    pub fn with_lock(mut self, lock: JsonValue) -> Self {
        self.lock = Some(lock);
        self
    }
}

fn dropped<T>(field: &str, found: &str) -> Option<T> {
    debug!("dropping find option {field}: unsupported {found} value");
    None
}

impl TryFrom<JsonValue> for FindOptions {
    type Error = FindOptionsError;

    fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl FromStr for FindOptions {
    type Err = FindOptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_value(serde_json::from_str(s)?)
    }
}

impl<'de> Deserialize<'de> for FindOptions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = JsonValue::deserialize(deserializer)?;
        Self::from_value(value).map_err(serde::de::Error::custom)
    }
}
