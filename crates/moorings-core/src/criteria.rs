//! Declarative criteria trees and their typed clause form.
//!
//! Criteria arrive as the JSON shapes the record layer produces
//! (`where`, `sort`, `groupBy`, aggregates, `limit`).
//! [`Criteria::where_nodes`] parses the raw `where` subtree into a tagged
//! clause tree up front, so dialects dispatch on enums instead of
//! operator strings and malformed trees fail before any statement text
//! exists.

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Criteria parse errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CriteriaError {
    /// A comparator or combinator key the compiler does not implement.
    #[error("unsupported operator: {0}")]
    UnsupportedOperator(String),

    /// A structurally malformed criteria tree.
    #[error("invalid criteria: {0}")]
    Invalid(String),
}

/// Sort direction. The wire form is `1` for ascending, anything else
/// for descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl<'de> Deserialize<'de> for SortOrder {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let direction = Value::deserialize(deserializer)?;
        Ok(if direction.as_i64() == Some(1) {
            SortOrder::Ascending
        } else {
            SortOrder::Descending
        })
    }
}

/// Ordered sort specification. Iteration order is the order given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sort(Vec<(String, SortOrder)>);

impl Sort {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, column: impl Into<String>, order: SortOrder) {
        self.0.push((column.into(), order));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, SortOrder)> {
        self.0.iter().map(|(column, order)| (column.as_str(), *order))
    }
}

impl<'de> Deserialize<'de> for Sort {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SortVisitor;

        impl<'de> Visitor<'de> for SortVisitor {
            type Value = Sort;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of column sort directions")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut sort = Sort::default();
                while let Some((column, order)) = map.next_entry::<String, SortOrder>()? {
                    sort.push(column, order);
                }
                Ok(sort)
            }
        }

        deserializer.deserialize_map(SortVisitor)
    }
}

/// Comparison operators with a relational rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}

/// A single column criterion.
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    Equals(Value),
    NotEquals(Value),
    In(Vec<Value>),
    Compare(CompareOp, Value),
    Like(String),
    Contains(String),
    StartsWith(String),
    EndsWith(String),
}

/// A node of the parsed where tree.
#[derive(Debug, Clone, PartialEq)]
pub enum WhereNode {
    And(Vec<WhereNode>),
    Or(Vec<WhereNode>),
    Predicate {
        attribute: String,
        criterion: Criterion,
    },
}

/// A declarative query specification.
///
/// All keys are optional; `Default` is the match-everything query.
/// `skip` is carried for callers that page above the dialect but is not
/// rendered by it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Criteria {
    /// Raw filter subtree; parse with [`Criteria::where_nodes`].
    #[serde(rename = "where")]
    pub where_clause: Option<Value>,
    pub sort: Sort,
    #[serde(rename = "groupBy", deserialize_with = "one_or_many")]
    pub group_by: Vec<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub sum: Vec<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub average: Vec<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub min: Vec<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub max: Vec<String>,
    pub limit: Option<u64>,
    pub skip: Option<u64>,
}

impl Criteria {
    /// True when any aggregate or grouping key is present. The SELECT
    /// head is either all-columns or aggregate, never both.
    pub fn is_aggregate(&self) -> bool {
        !(self.group_by.is_empty()
            && self.sum.is_empty()
            && self.average.is_empty()
            && self.min.is_empty()
            && self.max.is_empty())
    }

    /// Parse the raw `where` subtree into clause nodes.
    ///
    /// The returned list is an implicit conjunction. Fails on the first
    /// unsupported operator or malformed shape; nothing is ever rendered
    /// from a partially-parsed tree.
    pub fn where_nodes(&self) -> Result<Vec<WhereNode>, CriteriaError> {
        match &self.where_clause {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Object(entries)) => parse_entries(entries),
            Some(other) => Err(CriteriaError::Invalid(format!(
                "where must be an object, got {other}"
            ))),
        }
    }
}

fn parse_entries(entries: &Map<String, Value>) -> Result<Vec<WhereNode>, CriteriaError> {
    let mut nodes = Vec::new();
    for (key, value) in entries {
        nodes.extend(parse_entry(key, value)?);
    }
    Ok(nodes)
}

fn parse_entry(key: &str, value: &Value) -> Result<Vec<WhereNode>, CriteriaError> {
    if key.eq_ignore_ascii_case("and") || key.eq_ignore_ascii_case("or") {
        let branches = parse_branches(key, value)?;
        let node = if key.eq_ignore_ascii_case("or") {
            WhereNode::Or(branches)
        } else {
            WhereNode::And(branches)
        };
        return Ok(vec![node]);
    }
    if key.eq_ignore_ascii_case("like") {
        return parse_like_map(value);
    }
    if key.eq_ignore_ascii_case("not") {
        // Clause-level negation never shipped in this dialect.
        return Err(CriteriaError::UnsupportedOperator(key.to_string()));
    }
    let criterion = parse_criterion(value)?;
    Ok(vec![WhereNode::Predicate {
        attribute: key.to_string(),
        criterion,
    }])
}

fn parse_branches(key: &str, value: &Value) -> Result<Vec<WhereNode>, CriteriaError> {
    let Value::Array(items) = value else {
        return Err(CriteriaError::Invalid(format!(
            "{key} takes a list of where clauses"
        )));
    };
    if items.is_empty() {
        return Err(CriteriaError::Invalid(format!("{key} has no branches")));
    }
    let mut branches = Vec::new();
    for item in items {
        let Value::Object(entries) = item else {
            return Err(CriteriaError::Invalid(format!(
                "{key} branches must be objects"
            )));
        };
        let mut nodes = parse_entries(entries)?;
        match nodes.len() {
            0 => {
                return Err(CriteriaError::Invalid(format!(
                    "{key} has an empty branch"
                )))
            }
            1 => branches.push(nodes.remove(0)),
            _ => branches.push(WhereNode::And(nodes)),
        }
    }
    Ok(branches)
}

fn parse_like_map(value: &Value) -> Result<Vec<WhereNode>, CriteriaError> {
    let Value::Object(entries) = value else {
        return Err(CriteriaError::Invalid(
            "like takes an object of column patterns".to_string(),
        ));
    };
    Ok(entries
        .iter()
        .map(|(attribute, pattern)| WhereNode::Predicate {
            attribute: attribute.clone(),
            criterion: Criterion::Like(pattern_text(pattern)),
        })
        .collect())
}

fn parse_criterion(value: &Value) -> Result<Criterion, CriteriaError> {
    match value {
        Value::Array(items) => {
            if items.is_empty() {
                return Err(CriteriaError::Invalid(
                    "IN takes at least one value".to_string(),
                ));
            }
            Ok(Criterion::In(items.clone()))
        }
        Value::Object(entries) => parse_comparator_map(entries),
        scalar => Ok(Criterion::Equals(scalar.clone())),
    }
}

#[derive(Debug, Clone, Copy)]
enum ComparatorKey {
    Lt,
    Le,
    Gt,
    Ge,
    Not,
    Like,
    Contains,
    StartsWith,
    EndsWith,
}

/// Comparator spellings in tie-break priority order. When a sub-object
/// carries several recognized keys, the first spelling listed here wins.
const COMPARATORS: &[(&str, ComparatorKey)] = &[
    ("<", ComparatorKey::Lt),
    ("lessThan", ComparatorKey::Lt),
    ("<=", ComparatorKey::Le),
    ("lessThanOrEqual", ComparatorKey::Le),
    (">", ComparatorKey::Gt),
    ("greaterThan", ComparatorKey::Gt),
    (">=", ComparatorKey::Ge),
    ("greaterThanOrEqual", ComparatorKey::Ge),
    ("!", ComparatorKey::Not),
    ("not", ComparatorKey::Not),
    ("like", ComparatorKey::Like),
    ("contains", ComparatorKey::Contains),
    ("startsWith", ComparatorKey::StartsWith),
    ("endsWith", ComparatorKey::EndsWith),
];

/// Word spellings match case-insensitively, symbols exactly.
fn comparator_matches(key: &str, spelling: &str) -> bool {
    if spelling.chars().any(|c| c.is_ascii_alphabetic()) {
        key.eq_ignore_ascii_case(spelling)
    } else {
        key == spelling
    }
}

fn parse_comparator_map(entries: &Map<String, Value>) -> Result<Criterion, CriteriaError> {
    // Any unrecognized key fails first, so a typo never silently loses
    // to a recognized sibling.
    for key in entries.keys() {
        if !COMPARATORS
            .iter()
            .any(|(spelling, _)| comparator_matches(key, spelling))
        {
            return Err(CriteriaError::UnsupportedOperator(key.clone()));
        }
    }
    for (spelling, op) in COMPARATORS {
        if let Some((_, value)) = entries
            .iter()
            .find(|(key, _)| comparator_matches(key, spelling))
        {
            return Ok(build_criterion(*op, value));
        }
    }
    Err(CriteriaError::Invalid("empty comparator object".to_string()))
}

fn build_criterion(op: ComparatorKey, value: &Value) -> Criterion {
    match op {
        ComparatorKey::Lt => Criterion::Compare(CompareOp::LessThan, value.clone()),
        ComparatorKey::Le => Criterion::Compare(CompareOp::LessThanOrEqual, value.clone()),
        ComparatorKey::Gt => Criterion::Compare(CompareOp::GreaterThan, value.clone()),
        ComparatorKey::Ge => Criterion::Compare(CompareOp::GreaterThanOrEqual, value.clone()),
        ComparatorKey::Not => Criterion::NotEquals(value.clone()),
        ComparatorKey::Like => Criterion::Like(pattern_text(value)),
        ComparatorKey::Contains => Criterion::Contains(pattern_text(value)),
        ComparatorKey::StartsWith => Criterion::StartsWith(pattern_text(value)),
        ComparatorKey::EndsWith => Criterion::EndsWith(pattern_text(value)),
    }
}

/// Pattern text for LIKE-family operators; non-string scalars coerce the
/// way the record layer's string formatting does.
fn pattern_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(name) => Ok(vec![name]),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(name) => Ok(name),
                other => Err(de::Error::custom(format!(
                    "expected a column name, got {other}"
                ))),
            })
            .collect(),
        other => Err(de::Error::custom(format!(
            "expected a column name or list of names, got {other}"
        ))),
    }
}
