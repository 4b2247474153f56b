//! Ordering clauses for record selection

use std::cmp::Ordering;

use serde_json::Value;

use super::filter::compare_values;
use crate::types::{LogError, LogResult, Row};

/// One `column [ASC|DESC]` key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderKey {
    pub column: String,
    pub descending: bool,
}

/// Parse a comma separated ordering clause such as `timecreated ASC, id ASC`
pub fn parse_order(order: &str) -> LogResult<Vec<OrderKey>> {
    let mut keys = Vec::new();
    for part in order.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let mut words = part.split_whitespace();
        let column = words.next().unwrap_or_default();
        if !column
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(LogError::InvalidFilter(format!(
                "invalid order column '{}'",
                column
            )));
        }
        let descending = match words.next() {
            None => false,
            Some(dir) if dir.eq_ignore_ascii_case("asc") => false,
            Some(dir) if dir.eq_ignore_ascii_case("desc") => true,
            Some(dir) => {
                return Err(LogError::InvalidFilter(format!(
                    "invalid order direction '{}'",
                    dir
                )))
            }
        };
        if let Some(extra) = words.next() {
            return Err(LogError::InvalidFilter(format!(
                "unexpected '{}' in order clause",
                extra
            )));
        }
        keys.push(OrderKey {
            column: column.to_string(),
            descending,
        });
    }
    Ok(keys)
}

/// Rank used when two values are not directly comparable
fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

fn compare_for_sort(a: &Value, b: &Value) -> Ordering {
    compare_values(a, b).unwrap_or_else(|| type_rank(a).cmp(&type_rank(b)))
}

/// Stable sort of `rows` by `keys`; missing columns sort first
pub fn sort_rows(rows: &mut [Row], keys: &[OrderKey]) {
    if keys.is_empty() {
        return;
    }
    rows.sort_by(|a, b| {
        for key in keys {
            let left = a.get(&key.column).unwrap_or(&Value::Null);
            let right = b.get(&key.column).unwrap_or(&Value::Null);
            let ordering = compare_for_sort(left, right);
            let ordering = if key.descending {
                ordering.reverse()
            } else {
                ordering
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(values: Vec<Value>) -> Vec<Row> {
        values
            .into_iter()
            .map(|v| v.as_object().cloned().unwrap())
            .collect()
    }

    #[test]
    fn test_parse_order() {
        let keys = parse_order("timecreated ASC, id desc,userid").unwrap();
        assert_eq!(keys.len(), 3);
        assert_eq!(keys[0].column, "timecreated");
        assert!(!keys[0].descending);
        assert!(keys[1].descending);
        assert!(!keys[2].descending);

        assert!(parse_order("").unwrap().is_empty());
        assert!(parse_order("id sideways").is_err());
        assert!(parse_order("id; DROP").is_err());
        assert!(parse_order("id asc nulls").is_err());
    }

    #[test]
    fn test_sort_rows_multi_key() {
        let mut data = rows(vec![
            json!({"id": 3, "timecreated": 20}),
            json!({"id": 2, "timecreated": 10}),
            json!({"id": 1, "timecreated": 20}),
            json!({"id": 4}),
        ]);
        sort_rows(&mut data, &parse_order("timecreated ASC, id ASC").unwrap());

        let ids: Vec<i64> = data.iter().map(|r| r["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![4, 2, 1, 3]);
    }

    #[test]
    fn test_sort_rows_mixed_large_numbers() {
        let mut data = rows(vec![
            json!({"id": 1, "v": 9_007_199_254_740_993_u64}),
            json!({"id": 2, "v": 9_007_199_254_740_994.0}),
            json!({"id": 3, "v": 9_007_199_254_740_992_u64}),
            json!({"id": 4, "v": 1.5}),
            json!({"id": 5, "v": 9_007_199_254_740_995_u64}),
        ]);
        sort_rows(&mut data, &parse_order("v ASC").unwrap());

        let ids: Vec<i64> = data.iter().map(|r| r["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![4, 3, 1, 2, 5]);
    }

    #[test]
    fn test_sort_rows_descending() {
        let mut data = rows(vec![
            json!({"id": 1, "eventname": "a"}),
            json!({"id": 2, "eventname": "c"}),
            json!({"id": 3, "eventname": "b"}),
        ]);
        sort_rows(&mut data, &parse_order("eventname DESC").unwrap());

        let ids: Vec<i64> = data.iter().map(|r| r["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }
}
