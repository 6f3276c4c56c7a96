//! findom core library.
//!
//! Recognizes ORM find-options objects and normalizes their `where` clauses:
//! shorthand operator objects such as `{"$like": "%foo%"}` are rewritten into
//! canonical [`FindOperator`] values before a query builder consumes them.
//!
//! ```
//! use findom::{FindOptions, WhereMap, WhereNode, is_find_options, normalize_find_options};
//! use findom::operators::between;
//! use serde_json::json;
//!
//! let raw = json!({ "where": { "age": { "$between": [18, 65] } }, "take": 10 });
//! assert!(is_find_options(&raw));
//!
//! let normalized = normalize_find_options(&FindOptions::from_value(raw).unwrap());
//! let expected = WhereNode::from(WhereMap::from([("age", between(18, 65))]));
//! assert_eq!(normalized.where_clause, Some(expected));
//! ```

pub mod config;
pub mod errors;
pub mod filters;
pub mod operators;
pub mod options;

pub use config::{FindomConfig, NormalizerConfig};
pub use errors::*;
pub use filters::{Normalizer, WhereMap, WhereNode, normalize_find_options};
pub use operators::{FindOperator, FindOperatorKind};
pub use options::{CacheOption, FindOptions, PageValue, is_find_options};
