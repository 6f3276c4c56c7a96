//! Shorthand-operator normalization for `where` clauses
//!
//! Rewrites single-key operator objects (`{"$like": "%x%"}`) found under filter
//! fields into canonical [`FindOperator`] values. The rewrite is total: shapes
//! that are not shorthand operators are walked as nested filters or passed
//! through, and nothing here returns an error.

use log::{debug, trace, warn};
use serde_json::Value as JsonValue;

use crate::config::NormalizerConfig;
use crate::filters::tree::{WhereMap, WhereNode};
use crate::operators::{FindOperator, FindOperatorKind};
use crate::options::FindOptions;

/// Normalizes find options with the default configuration.
pub fn normalize_find_options(options: &FindOptions) -> FindOptions {
    Normalizer::default().normalize(options)
}

/// Rewrites shorthand operators in find options.
///
/// # Examples
///
/// ```
/// use findom::{FindOptions, Normalizer, NormalizerConfig};
/// use findom::operators::like;
/// use serde_json::json;
///
/// let options = FindOptions::from_value(json!({ "where": { "name": { "$like": "jo%" } } })).unwrap();
/// let normalized = Normalizer::new(NormalizerConfig::default()).normalize(&options);
///
/// let name = normalized.where_clause.as_ref().and_then(|w| w.as_mapping()).and_then(|m| m.get("name"));
/// assert_eq!(name.and_then(|n| n.as_operator()), Some(&like("jo%")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    config: NormalizerConfig,
}

impl Normalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Returns a copy of `options` with its `where` clause normalized. Every other
    /// field is copied unchanged.
    pub fn normalize(&self, options: &FindOptions) -> FindOptions {
        let where_clause = options.where_clause.as_ref().map(|node| self.normalize_where(node));
        options.replace_where(where_clause)
    }

    /// Normalizes a top-level `where` value.
    ///
    /// Scalar literals and canonical operators are returned as they are. A JSON
    /// object or array held as a literal is parsed first, the same way
    /// [`FindOptions::from_value`] parses `where`. A top-level mapping is never
    /// itself treated as a shorthand operator; only the values under its fields are.
    pub fn normalize_where(&self, node: &WhereNode) -> WhereNode {
        match node {
            WhereNode::Literal(value @ (JsonValue::Array(_) | JsonValue::Object(_))) => {
                self.normalize_where(&WhereNode::from_json(value.clone()))
            }
            WhereNode::Mapping(_) | WhereNode::Sequence(_) => {
                let rewritten = self.rewrite_where(node, 0);
                debug!(
                    "normalized where clause ({} canonical operator(s))",
                    rewritten.operator_count()
                );
                rewritten
            }
            WhereNode::Literal(_) | WhereNode::Operator(_) => node.clone(),
        }
    }

    fn rewrite_where(&self, node: &WhereNode, depth: usize) -> WhereNode {
        if depth > self.config.max_depth {
            warn!(
                "where clause is nested deeper than {} levels; passing the remainder through",
                self.config.max_depth
            );
            return node.clone();
        }

        match node {
            WhereNode::Sequence(items) => {
                WhereNode::Sequence(items.iter().map(|item| self.rewrite_where(item, depth + 1)).collect())
            }
            WhereNode::Mapping(map) => WhereNode::Mapping(
                map.iter()
                    .map(|(field, value)| (field, self.rewrite_field(field, value, depth + 1)))
                    .collect(),
            ),
            WhereNode::Literal(_) | WhereNode::Operator(_) => node.clone(),
        }
    }

    fn rewrite_field(&self, field: &str, value: &WhereNode, depth: usize) -> WhereNode {
        match value {
            WhereNode::Mapping(map) => match self.rewrite_shorthand(map, depth) {
                Some(operator) => {
                    trace!("rewrote {} shorthand on field {}", operator.kind(), field);
                    WhereNode::Operator(operator)
                }
                // not an operator object, so it is a nested filter
                None => self.rewrite_where(value, depth),
            },
            WhereNode::Sequence(_) => self.rewrite_where(value, depth),
            WhereNode::Literal(JsonValue::Object(map)) => {
                let parsed = WhereNode::Mapping(WhereMap::from_json(map.clone()));
                self.rewrite_field(field, &parsed, depth)
            }
            WhereNode::Literal(_) | WhereNode::Operator(_) => value.clone(),
        }
    }

    /// Resolves a single-key shorthand object into its operator. Object operands
    /// must themselves be shorthand objects and are resolved first, so operators
    /// nest; any other object operand is replaced by `false`.
    fn rewrite_shorthand(&self, map: &WhereMap, depth: usize) -> Option<FindOperator> {
        let (key, value) = map.single_entry()?;
        let kind = FindOperatorKind::from_shorthand_key(key)?;
        if depth > self.config.max_depth {
            return None;
        }

        let operand = match value {
            WhereNode::Mapping(inner) if depth < self.config.max_depth => {
                self.rewrite_operand(kind, inner, depth + 1)
            }
            WhereNode::Literal(JsonValue::Object(inner)) if depth < self.config.max_depth => {
                self.rewrite_operand(kind, &WhereMap::from_json(inner.clone()), depth + 1)
            }
            other => other.clone(),
        };

        let operator = FindOperator::from_shorthand(kind, operand);
        if operator.is_none() {
            warn!("{kind} shorthand needs a list of two bounds; treating it as a nested filter");
        }
        operator
    }

    fn rewrite_operand(&self, kind: FindOperatorKind, inner: &WhereMap, depth: usize) -> WhereNode {
        match self.rewrite_shorthand(inner, depth) {
            Some(operator) => WhereNode::Operator(operator),
            None => {
                debug!("{kind} operand is not a shorthand operator; using false");
                WhereNode::Literal(JsonValue::Bool(false))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::{between, equal, in_list, like, not, raw};
    use serde_json::{Value as JsonValue, json};

    fn normalized_where(input: JsonValue) -> WhereNode {
        let options = FindOptions::from_value(json!({ "where": input })).unwrap();
        normalize_find_options(&options).where_clause.unwrap()
    }

    fn field<'a>(node: &'a WhereNode, name: &str) -> &'a WhereNode {
        node.as_mapping().and_then(|map| map.get(name)).unwrap()
    }

    #[test]
    fn like_shorthand_becomes_operator() {
        let node = normalized_where(json!({ "age": { "$like": "%x%" } }));
        assert_eq!(field(&node, "age"), &WhereNode::from(like("%x%")));
    }

    #[test]
    fn between_shorthand_uses_both_bounds() {
        let node = normalized_where(json!({ "age": { "$between": [1, 10] } }));
        assert_eq!(field(&node, "age"), &WhereNode::from(between(1, 10)));
    }

    #[test]
    fn nested_shorthand_operand_is_resolved() {
        let node = normalized_where(json!({ "age": { "$not": { "$like": "%x%" } } }));
        assert_eq!(field(&node, "age"), &WhereNode::from(not(like("%x%"))));
    }

    #[test]
    fn shorthand_operands_nest_more_than_one_level() {
        let node = normalized_where(json!({ "age": { "$not": { "$not": { "$in": [1, 2] } } } }));
        assert_eq!(field(&node, "age"), &WhereNode::from(not(not(in_list(json!([1, 2]))))));
    }

    #[test]
    fn scalar_values_are_not_rewritten() {
        let node = normalized_where(json!({ "name": "john" }));
        assert_eq!(field(&node, "name"), &WhereNode::from("john"));
    }

    #[test]
    fn array_values_stay_literal() {
        let node = normalized_where(json!({ "id": [1, 2, 3] }));
        assert_eq!(field(&node, "id"), &WhereNode::Literal(json!([1, 2, 3])));
    }

    #[test]
    fn sequence_is_rewritten_element_wise() {
        let node = normalized_where(json!([{ "a": 1 }, { "b": { "$in": [1, 2] } }]));
        let items = node.as_sequence().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], WhereNode::Mapping(WhereMap::from([("a", 1)])));
        assert_eq!(field(&items[1], "b"), &WhereNode::from(in_list(json!([1, 2]))));
    }

    #[test]
    fn nested_filter_mapping_is_walked() {
        let node = normalized_where(json!({ "profile": { "city": { "$like": "B%" }, "zip": "10115" } }));
        let profile = field(&node, "profile");
        assert_eq!(field(profile, "city"), &WhereNode::from(like("B%")));
        assert_eq!(field(profile, "zip"), &WhereNode::from("10115"));
    }

    #[test]
    fn unknown_single_key_is_treated_as_nested_filter() {
        let node = normalized_where(json!({ "author": { "name": { "$iLike": "ann%" } } }));
        let author = field(&node, "author");
        assert!(author.as_mapping().is_some());
        assert_eq!(field(author, "name").as_operator().map(FindOperator::kind), Some(FindOperatorKind::ILike));
    }

    #[test]
    fn top_level_shorthand_is_not_rewritten() {
        let node = normalized_where(json!({ "$like": "x" }));
        assert_eq!(field(&node, "$like"), &WhereNode::from("x"));
    }

    #[test]
    fn malformed_between_falls_back_to_nested_filter() {
        let node = normalized_where(json!({ "age": { "$between": [1] } }));
        assert_eq!(
            field(&node, "age"),
            &WhereNode::Mapping(WhereMap::from([("$between", WhereNode::Literal(json!([1])))]))
        );
    }

    #[test]
    fn non_shorthand_inner_operand_becomes_false() {
        let node = normalized_where(json!({ "age": { "$not": { "a": 1, "b": 2 } } }));
        assert_eq!(field(&node, "age"), &WhereNode::from(not(false)));

        let node = normalized_where(json!({ "sql": { "$raw": { "name": "x" } } }));
        assert_eq!(field(&node, "sql"), &WhereNode::from(raw(false)));
    }

    #[test]
    fn where_built_from_json_is_rewritten() {
        let options = FindOptions::new().with_where(json!({ "age": { "$like": "%x%" } }));
        let normalized = normalize_find_options(&options);
        let expected = WhereNode::from(WhereMap::from([("age", like("%x%"))]));
        assert_eq!(normalized.where_clause, Some(expected));

        let map = WhereMap::from([("age", json!({ "$not": { "$in": [1, 2] } }))]);
        let normalized = normalize_find_options(&FindOptions::new().with_where(map));
        let age = field(normalized.where_clause.as_ref().unwrap(), "age");
        assert_eq!(age, &WhereNode::from(not(in_list(json!([1, 2])))));
    }

    #[test]
    fn object_literals_are_parsed_before_rewriting() {
        let normalizer = Normalizer::default();
        let node = normalizer.normalize_where(&WhereNode::Literal(json!([{ "a": { "$equal": 1 } }])));
        let items = node.as_sequence().unwrap();
        assert_eq!(field(&items[0], "a"), &WhereNode::from(equal(1)));

        let mut map = WhereMap::new();
        map.insert("b", WhereNode::Literal(json!({ "$like": "y" })));
        let node = normalizer.normalize_where(&WhereNode::from(map));
        assert_eq!(field(&node, "b"), &WhereNode::from(like("y")));

        // operators are opaque, even around an object literal
        let opaque = WhereNode::from(WhereMap::from([("c", not(WhereNode::Literal(json!({ "$in": [3] }))))]));
        assert_eq!(normalizer.normalize_where(&opaque), opaque);
    }

    #[test]
    fn canonical_operators_pass_through() {
        let mut map = WhereMap::new();
        map.insert("age", not(like("%x%")));
        let options = FindOptions::new().with_where(map);
        let normalized = normalize_find_options(&options);
        assert_eq!(normalized, options);
    }

    #[test]
    fn top_level_operator_where_is_untouched() {
        let options = FindOptions::new().with_where(like("x"));
        let normalized = normalize_find_options(&options);
        assert_eq!(normalized.where_clause, options.where_clause);
    }

    #[test]
    fn key_order_is_preserved() {
        let node = normalized_where(json!({ "z": { "$like": "a" }, "a": 1, "m": { "$in": [1] } }));
        let keys: Vec<&str> = node.as_mapping().unwrap().keys().collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn depth_limit_passes_deep_subtrees_through() {
        let normalizer = Normalizer::new(NormalizerConfig::default().with_max_depth(1));
        let where_clause = WhereNode::from_json(json!({ "a": { "b": { "c": { "$like": "x" } } } }));
        let normalized = normalizer.normalize_where(&where_clause);
        assert_eq!(normalized, where_clause);
    }

    #[test]
    fn normalization_is_idempotent() {
        let options = FindOptions::from_value(json!({
            "where": [{ "a": { "$moreThan": 3 } }, { "b": { "$not": { "$equal": null } } }],
            "take": 10
        }))
        .unwrap();
        let once = normalize_find_options(&options);
        let twice = normalize_find_options(&once);
        assert_eq!(once, twice);
    }
}
