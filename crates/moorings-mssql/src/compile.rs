//! Clause rendering for parsed criteria.
//!
//! Pure tree-to-text: no state, no I/O, safe to run in parallel for
//! independent criteria. Each public function renders one clause family;
//! [`options_clause`] strings them together in statement order
//! (WHERE, GROUP BY, ORDER BY).

use crate::codec;
use crate::error::CompileResult;
use crate::escape::{quote_ident, SqlLiteral};
use moorings_core::{CompareOp, Criteria, Criterion, SortOrder, SqlValue, WhereNode};
use serde_json::Value;

/// Render the `WHERE` clause, if the criteria filter anything.
pub fn where_clause(criteria: &Criteria) -> CompileResult<Option<String>> {
    let nodes = criteria.where_nodes()?;
    if nodes.is_empty() {
        return Ok(None);
    }
    let fragments: Vec<String> = nodes.iter().map(render_node).collect();
    Ok(Some(format!("WHERE {}", fragments.join(" AND "))))
}

fn render_node(node: &WhereNode) -> String {
    match node {
        WhereNode::And(branches) => group(branches, " AND "),
        WhereNode::Or(branches) => group(branches, " OR "),
        WhereNode::Predicate {
            attribute,
            criterion,
        } => render_predicate(attribute, criterion),
    }
}

fn group(branches: &[WhereNode], joiner: &str) -> String {
    let body: Vec<String> = branches.iter().map(render_node).collect();
    format!("( {} )", body.join(joiner))
}

fn render_predicate(attribute: &str, criterion: &Criterion) -> String {
    let column = quote_ident(attribute);
    match criterion {
        Criterion::Equals(Value::Null) => format!("{column} IS NULL"),
        Criterion::Equals(value) => format!("{column}={}", encode_json(value)),
        Criterion::NotEquals(Value::Null) => format!("{column} IS NOT NULL"),
        Criterion::NotEquals(value) => format!("{column}<>{}", encode_json(value)),
        Criterion::Compare(op, value) => {
            format!("{column}{}{}", op_text(*op), encode_json(value))
        }
        Criterion::In(values) => {
            let list: Vec<String> = values
                .iter()
                .map(|value| encode_json(value).to_string())
                .collect();
            format!("{column} IN ({})", list.join(", "))
        }
        Criterion::Like(pattern) => format!("{column} LIKE {}", like_pattern(pattern)),
        Criterion::Contains(pattern) => {
            format!("{column} LIKE {}", affixed(pattern, "%", "%"))
        }
        Criterion::StartsWith(pattern) => {
            format!("{column} LIKE {}", affixed(pattern, "", "%"))
        }
        Criterion::EndsWith(pattern) => {
            format!("{column} LIKE {}", affixed(pattern, "%", ""))
        }
    }
}

fn op_text(op: CompareOp) -> &'static str {
    match op {
        CompareOp::LessThan => "<",
        CompareOp::LessThanOrEqual => "<=",
        CompareOp::GreaterThan => ">",
        CompareOp::GreaterThanOrEqual => ">=",
    }
}

fn encode_json(value: &Value) -> SqlLiteral {
    codec::encode(&SqlValue::from(value.clone()))
}

/// `%%%` in a caller's LIKE pattern stands for a literal percent; the
/// dialect spells that `[%]`.
fn like_pattern(pattern: &str) -> SqlLiteral {
    SqlLiteral::quote(&pattern.replace("%%%", "[%]"))
}

fn affixed(pattern: &str, prefix: &str, suffix: &str) -> SqlLiteral {
    SqlLiteral::quote(&format!("{prefix}{pattern}{suffix}"))
}

/// Render the `ORDER BY` clause in the sort's given order.
pub fn order_by_clause(criteria: &Criteria) -> Option<String> {
    if criteria.sort.is_empty() {
        return None;
    }
    let terms: Vec<String> = criteria
        .sort
        .iter()
        .map(|(column, order)| {
            let direction = match order {
                SortOrder::Ascending => "ASC",
                SortOrder::Descending => "DESC",
            };
            format!("{} {direction}", quote_ident(column))
        })
        .collect();
    Some(format!("ORDER BY {}", terms.join(", ")))
}

/// Render the `GROUP BY` clause.
pub fn group_by_clause(criteria: &Criteria) -> Option<String> {
    if criteria.group_by.is_empty() {
        return None;
    }
    let columns: Vec<String> = criteria.group_by.iter().map(|c| quote_ident(c)).collect();
    Some(format!("GROUP BY {}", columns.join(", ")))
}

/// The aggregate SELECT column list: group-by columns first, then
/// `AGG([col]) AS [col]` pairs in sum, average, min, max order.
pub fn aggregate_columns(criteria: &Criteria) -> String {
    let mut columns: Vec<String> = criteria.group_by.iter().map(|c| quote_ident(c)).collect();
    let functions = [
        ("SUM", &criteria.sum),
        ("AVG", &criteria.average),
        ("MIN", &criteria.min),
        ("MAX", &criteria.max),
    ];
    for (function, names) in functions {
        for name in names {
            let column = quote_ident(name);
            columns.push(format!("{function}({column}) AS {column}"));
        }
    }
    columns.join(", ")
}

/// WHERE / GROUP BY / ORDER BY tail, space-joined in statement order.
pub fn options_clause(criteria: &Criteria) -> CompileResult<String> {
    let mut parts = Vec::new();
    if let Some(clause) = where_clause(criteria)? {
        parts.push(clause);
    }
    if let Some(clause) = group_by_clause(criteria) {
        parts.push(clause);
    }
    if let Some(clause) = order_by_clause(criteria) {
        parts.push(clause);
    }
    Ok(parts.join(" "))
}

/// Render an UPDATE `SET` body from column/value pairs.
///
/// Null assignments come out of the shared null rendering as ` IS NULL`
/// and a global textual pass rewrites that to `=NULL` — SET requires
/// assignment form. The pass covers the whole clause, string literals
/// included, exactly as the record layer always applied it.
pub fn set_clause(values: &[(String, SqlValue)]) -> String {
    let assignments: Vec<String> = values
        .iter()
        .map(|(column, value)| {
            if value.is_null() {
                format!("{} IS NULL", quote_ident(column))
            } else {
                format!("{}={}", quote_ident(column), codec::encode(value))
            }
        })
        .collect();
    assignments.join(", ").replace(" IS NULL", "=NULL")
}
