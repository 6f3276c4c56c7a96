//! Canonical filter operators.
//!
//! A [`FindOperator`] is the normalized form of a shorthand operator object such as
//! `{"$like": "%foo%"}`. Operators are opaque to normalization: once a node holds
//! one, it is never rewritten again.

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value as JsonValue;

use crate::filters::WhereNode;

/// The closed set of operators that have a shorthand keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FindOperatorKind {
    Any,
    Between,
    Equal,
    ILike,
    In,
    LessThan,
    Like,
    MoreThan,
    Not,
    Raw,
}

impl FindOperatorKind {
    pub const ALL: [FindOperatorKind; 10] = [
        Self::Any,
        Self::Between,
        Self::Equal,
        Self::ILike,
        Self::In,
        Self::LessThan,
        Self::Like,
        Self::MoreThan,
        Self::Not,
        Self::Raw,
    ];

    /// Keyword used for this operator in shorthand filter objects.
    #[inline]
    pub const fn shorthand_key(self) -> &'static str {
        match self {
            Self::Any => "$any",
            Self::Between => "$between",
            Self::Equal => "$equal",
            Self::ILike => "$iLike",
            Self::In => "$in",
            Self::LessThan => "$lessThan",
            Self::Like => "$like",
            Self::MoreThan => "$moreThan",
            Self::Not => "$not",
            Self::Raw => "$raw",
        }
    }

    /// Keywords are case sensitive: `$ilike` is not `$iLike`.
    pub fn from_shorthand_key(key: &str) -> Option<Self> {
        match key {
            "$any" => Some(Self::Any),
            "$between" => Some(Self::Between),
            "$equal" => Some(Self::Equal),
            "$iLike" => Some(Self::ILike),
            "$in" => Some(Self::In),
            "$lessThan" => Some(Self::LessThan),
            "$like" => Some(Self::Like),
            "$moreThan" => Some(Self::MoreThan),
            "$not" => Some(Self::Not),
            "$raw" => Some(Self::Raw),
            _ => None,
        }
    }
}

impl fmt::Display for FindOperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.shorthand_key())
    }
}

/// A canonical filter operator.
///
/// Operands are filter-tree nodes, so operators nest (`Not(Like("%x%"))`).
#[derive(Debug, Clone, PartialEq)]
pub enum FindOperator {
    Any(Box<WhereNode>),
    Between { from: Box<WhereNode>, to: Box<WhereNode> },
    Equal(Box<WhereNode>),
    ILike(Box<WhereNode>),
    In(Box<WhereNode>),
    LessThan(Box<WhereNode>),
    Like(Box<WhereNode>),
    MoreThan(Box<WhereNode>),
    Not(Box<WhereNode>),
    Raw(Box<WhereNode>),
}

impl FindOperator {
    /// Build the operator for a shorthand keyword from its operand.
    ///
    /// Returns `None` only for `$between` when the operand is not a list with at
    /// least two bounds. Bounds past the second are ignored.
    pub fn from_shorthand(kind: FindOperatorKind, operand: WhereNode) -> Option<Self> {
        let operator = match kind {
            FindOperatorKind::Between => {
                let (from, to) = split_bounds(operand)?;
                Self::Between {
                    from: Box::new(from),
                    to: Box::new(to),
                }
            }
            FindOperatorKind::Any => Self::Any(Box::new(operand)),
            FindOperatorKind::Equal => Self::Equal(Box::new(operand)),
            FindOperatorKind::ILike => Self::ILike(Box::new(operand)),
            FindOperatorKind::In => Self::In(Box::new(operand)),
            FindOperatorKind::LessThan => Self::LessThan(Box::new(operand)),
            FindOperatorKind::Like => Self::Like(Box::new(operand)),
            FindOperatorKind::MoreThan => Self::MoreThan(Box::new(operand)),
            FindOperatorKind::Not => Self::Not(Box::new(operand)),
            FindOperatorKind::Raw => Self::Raw(Box::new(operand)),
        };
        Some(operator)
    }

    pub const fn kind(&self) -> FindOperatorKind {
        match self {
            Self::Any(_) => FindOperatorKind::Any,
            Self::Between { .. } => FindOperatorKind::Between,
            Self::Equal(_) => FindOperatorKind::Equal,
            Self::ILike(_) => FindOperatorKind::ILike,
            Self::In(_) => FindOperatorKind::In,
            Self::LessThan(_) => FindOperatorKind::LessThan,
            Self::Like(_) => FindOperatorKind::Like,
            Self::MoreThan(_) => FindOperatorKind::MoreThan,
            Self::Not(_) => FindOperatorKind::Not,
            Self::Raw(_) => FindOperatorKind::Raw,
        }
    }

    /// The single operand, or `None` for `Between`.
    pub fn operand(&self) -> Option<&WhereNode> {
        match self {
            Self::Between { .. } => None,
            Self::Any(value)
            | Self::Equal(value)
            | Self::ILike(value)
            | Self::In(value)
            | Self::LessThan(value)
            | Self::Like(value)
            | Self::MoreThan(value)
            | Self::Not(value)
            | Self::Raw(value) => Some(value.as_ref()),
        }
    }

    /// Lower and upper bound of a `Between`.
    pub fn bounds(&self) -> Option<(&WhereNode, &WhereNode)> {
        match self {
            Self::Between { from, to } => Some((from.as_ref(), to.as_ref())),
            _ => None,
        }
    }
}

fn split_bounds(operand: WhereNode) -> Option<(WhereNode, WhereNode)> {
    match operand {
        WhereNode::Literal(JsonValue::Array(values)) => {
            let mut values = values.into_iter();
            let from = values.next()?;
            let to = values.next()?;
            Some((WhereNode::Literal(from), WhereNode::Literal(to)))
        }
        WhereNode::Sequence(nodes) => {
            let mut nodes = nodes.into_iter();
            let from = nodes.next()?;
            let to = nodes.next()?;
            Some((from, to))
        }
        _ => None,
    }
}

/// Operators serialize back into their shorthand object, e.g. `{"$in": [1, 2]}`.
impl Serialize for FindOperator {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let key = self.kind().shorthand_key();
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Self::Between { from, to } => map.serialize_entry(key, &[from.as_ref(), to.as_ref()])?,
            _ => {
                if let Some(operand) = self.operand() {
                    map.serialize_entry(key, operand)?;
                }
            }
        }
        map.end()
    }
}

// ========== Constructors ==========

pub fn any(value: impl Into<WhereNode>) -> FindOperator {
    FindOperator::Any(Box::new(value.into()))
}

/// Inclusive range between `from` and `to`.
pub fn between(from: impl Into<WhereNode>, to: impl Into<WhereNode>) -> FindOperator {
    FindOperator::Between {
        from: Box::new(from.into()),
        to: Box::new(to.into()),
    }
}

pub fn equal(value: impl Into<WhereNode>) -> FindOperator {
    FindOperator::Equal(Box::new(value.into()))
}

/// Case-insensitive `like`.
pub fn ilike(value: impl Into<WhereNode>) -> FindOperator {
    FindOperator::ILike(Box::new(value.into()))
}

/// Membership in a list of values. Named `in_list` since `in` is reserved.
pub fn in_list(values: impl Into<WhereNode>) -> FindOperator {
    FindOperator::In(Box::new(values.into()))
}

pub fn less_than(value: impl Into<WhereNode>) -> FindOperator {
    FindOperator::LessThan(Box::new(value.into()))
}

pub fn like(value: impl Into<WhereNode>) -> FindOperator {
    FindOperator::Like(Box::new(value.into()))
}

pub fn more_than(value: impl Into<WhereNode>) -> FindOperator {
    FindOperator::MoreThan(Box::new(value.into()))
}

pub fn not(value: impl Into<WhereNode>) -> FindOperator {
    FindOperator::Not(Box::new(value.into()))
}

/// Raw query fragment, passed to the query builder untouched.
pub fn raw(value: impl Into<WhereNode>) -> FindOperator {
    FindOperator::Raw(Box::new(value.into()))
}
