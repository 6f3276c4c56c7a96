//! Filter-tree model for `where` clauses.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value as JsonValue};

use crate::operators::FindOperator;

/// A node of a `where` filter tree.
///
/// # Examples
///
/// ```
/// use findom::filters::{WhereMap, WhereNode};
/// use findom::operators::like;
///
/// // { name: "john", email: Like("%@example.com") }
/// let node = WhereNode::Mapping(WhereMap::from([
///     ("name", WhereNode::from("john")),
///     ("email", WhereNode::from(like("%@example.com"))),
/// ]));
/// assert_eq!(node.operator_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum WhereNode {
    /// Scalar or array literal, compared by the query builder as-is. Objects are
    /// parsed into mappings on the way in.
    Literal(JsonValue),
    /// Canonical operator; never rewritten.
    Operator(FindOperator),
    /// Field name to condition, conjunctive. May be a shorthand operator object.
    Mapping(WhereMap),
    /// Ordered list of filter trees.
    Sequence(Vec<WhereNode>),
}

impl WhereNode {
    /// Parse the value of a top-level `where` field.
    ///
    /// Arrays at this level are sequences of filter trees. Inside a mapping, only
    /// objects become nested nodes; arrays and scalars stay literal.
    pub fn from_json(value: JsonValue) -> Self {
        match value {
            JsonValue::Array(items) => Self::Sequence(items.into_iter().map(Self::from_json).collect()),
            JsonValue::Object(map) => Self::Mapping(WhereMap::from_json(map)),
            other => Self::Literal(other),
        }
    }

    fn from_json_field(value: JsonValue) -> Self {
        match value {
            JsonValue::Object(map) => Self::Mapping(WhereMap::from_json(map)),
            other => Self::Literal(other),
        }
    }

    #[inline]
    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }

    #[inline]
    pub fn is_operator(&self) -> bool {
        matches!(self, Self::Operator(_))
    }

    #[inline]
    pub fn as_operator(&self) -> Option<&FindOperator> {
        match self {
            Self::Operator(operator) => Some(operator),
            _ => None,
        }
    }

    #[inline]
    pub fn as_mapping(&self) -> Option<&WhereMap> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    #[inline]
    pub fn as_sequence(&self) -> Option<&[WhereNode]> {
        match self {
            Self::Sequence(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Number of canonical operators in the tree, counting nested operands.
    pub fn operator_count(&self) -> usize {
        match self {
            Self::Literal(_) => 0,
            Self::Operator(operator) => {
                let nested = match operator.bounds() {
                    Some((from, to)) => from.operator_count() + to.operator_count(),
                    None => operator.operand().map_or(0, WhereNode::operator_count),
                };
                1 + nested
            }
            Self::Mapping(map) => map.values().map(WhereNode::operator_count).sum(),
            Self::Sequence(items) => items.iter().map(WhereNode::operator_count).sum(),
        }
    }
}

impl Serialize for WhereNode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Literal(value) => value.serialize(serializer),
            Self::Operator(operator) => operator.serialize(serializer),
            Self::Mapping(map) => map.serialize(serializer),
            Self::Sequence(items) => items.serialize(serializer),
        }
    }
}

impl From<JsonValue> for WhereNode {
    /// Parses the value as a field condition: objects become mappings, while
    /// arrays and scalars stay literal. A `Literal` built this way never holds an object.
    fn from(value: JsonValue) -> Self {
        Self::from_json_field(value)
    }
}

impl From<FindOperator> for WhereNode {
    fn from(operator: FindOperator) -> Self {
        Self::Operator(operator)
    }
}

impl From<WhereMap> for WhereNode {
    fn from(map: WhereMap) -> Self {
        Self::Mapping(map)
    }
}

impl From<Vec<WhereNode>> for WhereNode {
    fn from(items: Vec<WhereNode>) -> Self {
        Self::Sequence(items)
    }
}

macro_rules! literal_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for WhereNode {
                fn from(value: $ty) -> Self {
                    Self::Literal(JsonValue::from(value))
                }
            }
        )*
    };
}

literal_from!(bool, i32, i64, u32, u64, f64, &str, String);

/// Insertion-ordered mapping from field name to filter node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WhereMap {
    entries: Vec<(String, WhereNode)>,
}

impl WhereMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_json(map: Map<String, JsonValue>) -> Self {
        Self {
            entries: map
                .into_iter()
                .map(|(key, value)| (key, WhereNode::from_json_field(value)))
                .collect(),
        }
    }

    /// Insert or replace the condition for `field`. A replaced field keeps its position.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<WhereNode>) -> Option<WhereNode> {
        let field = field.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == field) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((field, value));
                None
            }
        }
    }

    pub fn get(&self, field: &str) -> Option<&WhereNode> {
        self.entries.iter().find(|(key, _)| key == field).map(|(_, value)| value)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The only entry, if the mapping has exactly one.
    pub fn single_entry(&self) -> Option<(&str, &WhereNode)> {
        match self.entries.as_slice() {
            [(key, value)] => Some((key.as_str(), value)),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &WhereNode)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &WhereNode> {
        self.entries.iter().map(|(_, value)| value)
    }
}

impl<K, V> FromIterator<(K, V)> for WhereMap
where
    K: Into<String>,
    V: Into<WhereNode>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = WhereMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for WhereMap
where
    K: Into<String>,
    V: Into<WhereNode>,
{
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl IntoIterator for WhereMap {
    type Item = (String, WhereNode);
    type IntoIter = std::vec::IntoIter<(String, WhereNode)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for WhereMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
