//! Filter expressions for record selection
//!
//! The grammar is deliberately small:
//!
//! ```text
//! filter := "" | "1" | term ("AND" term)*
//! term   := column op placeholder
//! op     := "=" | "<>" | "!=" | "<" | "<=" | ">" | ">="
//! placeholder := "?" | ":" name
//! ```
//!
//! `?` placeholders consume positional parameters left to right; `:name`
//! placeholders look up named parameters. Both backends share this module so
//! the same expression selects the same rows everywhere.

use std::cmp::Ordering;

use serde_json::{Number, Value};

use super::Params;
use crate::types::{LogError, LogResult, Row};

/// Trait for filtering rows during selection
pub trait RowFilter {
    /// Returns true if the row matches the filter criteria
    fn matches(&self, row: &Row) -> bool;
}

/// Comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "=" => Some(Self::Eq),
            "<>" | "!=" => Some(Self::Ne),
            "<" => Some(Self::Lt),
            "<=" => Some(Self::Le),
            ">" => Some(Self::Gt),
            ">=" => Some(Self::Ge),
            _ => None,
        }
    }
}

/// Single `column op value` comparison with its parameter already bound
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub column: String,
    pub op: CompareOp,
    pub value: Value,
}

impl RowFilter for Comparison {
    fn matches(&self, row: &Row) -> bool {
        let actual = row.get(&self.column).unwrap_or(&Value::Null);
        let ordering = compare_values(actual, &self.value);
        match self.op {
            CompareOp::Eq => ordering == Some(Ordering::Equal),
            CompareOp::Ne => match ordering {
                Some(o) => o != Ordering::Equal,
                None => actual.is_null() != self.value.is_null(),
            },
            CompareOp::Lt => ordering == Some(Ordering::Less),
            CompareOp::Le => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
            CompareOp::Gt => ordering == Some(Ordering::Greater),
            CompareOp::Ge => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
        }
    }
}

/// Composite filter: all comparisons must match (AND)
///
/// An empty filter matches every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AndFilter {
    pub filters: Vec<Comparison>,
}

impl RowFilter for AndFilter {
    fn matches(&self, row: &Row) -> bool {
        self.filters.iter().all(|f| f.matches(row))
    }
}

/// Compare two JSON scalars
///
/// Numbers compare by exact value, strings lexicographically, booleans as
/// false < true and null equals null. Any other pairing is incomparable.
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

fn compare_numbers(x: &Number, y: &Number) -> Option<Ordering> {
    match (integer_value(x), integer_value(y)) {
        (Some(a), Some(b)) => Some(a.cmp(&b)),
        (Some(a), None) => compare_int_float(a, y.as_f64()?),
        (None, Some(b)) => compare_int_float(b, x.as_f64()?).map(Ordering::reverse),
        (None, None) => x.as_f64()?.partial_cmp(&y.as_f64()?),
    }
}

fn integer_value(n: &Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

/// Exact comparison of an integer against a float, without rounding the
/// integer to the nearest `f64`
fn compare_int_float(i: i128, f: f64) -> Option<Ordering> {
    if f.is_nan() {
        return None;
    }
    // Outside the i64/u64 range every JSON integer is on one side
    if f >= 18_446_744_073_709_551_616.0 {
        return Some(Ordering::Less);
    }
    if f < -9_223_372_036_854_775_808.0 {
        return Some(Ordering::Greater);
    }
    let floor = f.floor();
    match i.cmp(&(floor as i128)) {
        Ordering::Equal if f > floor => Some(Ordering::Less),
        ordering => Some(ordering),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Op(String),
    Positional,
    Named(String),
}

fn tokenize(expr: &str) -> LogResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = expr.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c.is_ascii_alphabetic() || c == '_' {
            let mut ident = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_ascii_alphanumeric() || c == '_' {
                    ident.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
            tokens.push(Token::Ident(ident));
        } else if matches!(c, '=' | '<' | '>' | '!') {
            let mut op = String::new();
            while let Some(&c) = chars.peek() {
                if matches!(c, '=' | '<' | '>' | '!') {
                    op.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
            tokens.push(Token::Op(op));
        } else if c == '?' {
            chars.next();
            tokens.push(Token::Positional);
        } else if c == ':' {
            chars.next();
            let mut name = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_ascii_alphanumeric() || c == '_' {
                    name.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
            if name.is_empty() {
                return Err(LogError::InvalidFilter(
                    "named placeholder without a name".to_string(),
                ));
            }
            tokens.push(Token::Named(name));
        } else {
            return Err(LogError::InvalidFilter(format!(
                "unexpected character '{}' in '{}'",
                c, expr
            )));
        }
    }

    Ok(tokens)
}

/// Parse `expr` and bind its placeholders to `params`
pub fn compile(expr: &str, params: &Params) -> LogResult<AndFilter> {
    let expr = expr.trim();
    if expr.is_empty() || expr == "1" {
        if let Params::Positional(values) = params {
            if !values.is_empty() {
                return Err(LogError::InvalidFilter(format!(
                    "expected 0 parameters, got {}",
                    values.len()
                )));
            }
        }
        return Ok(AndFilter::default());
    }

    let tokens = tokenize(expr)?;
    let mut iter = tokens.into_iter();
    let mut filters = Vec::new();
    let mut next_positional = 0usize;

    loop {
        let column = match iter.next() {
            Some(Token::Ident(column)) => column,
            other => {
                return Err(LogError::InvalidFilter(format!(
                    "expected column name, found {:?}",
                    other
                )))
            }
        };
        let op = match iter.next() {
            Some(Token::Op(op)) => CompareOp::parse(&op)
                .ok_or_else(|| LogError::InvalidFilter(format!("unknown operator '{}'", op)))?,
            other => {
                return Err(LogError::InvalidFilter(format!(
                    "expected operator after '{}', found {:?}",
                    column, other
                )))
            }
        };
        let value = match (iter.next(), params) {
            (Some(Token::Positional), Params::Positional(values)) => {
                let value = values.get(next_positional).cloned().ok_or_else(|| {
                    LogError::InvalidFilter(format!(
                        "missing positional parameter {}",
                        next_positional + 1
                    ))
                })?;
                next_positional += 1;
                value
            }
            (Some(Token::Named(name)), Params::Named(values)) => {
                values.get(&name).cloned().ok_or_else(|| {
                    LogError::InvalidFilter(format!("missing named parameter ':{}'", name))
                })?
            }
            (Some(Token::Positional), _) => {
                return Err(LogError::InvalidFilter(
                    "'?' placeholder needs positional parameters".to_string(),
                ))
            }
            (Some(Token::Named(name)), _) => {
                return Err(LogError::InvalidFilter(format!(
                    "':{}' placeholder needs named parameters",
                    name
                )))
            }
            (other, _) => {
                return Err(LogError::InvalidFilter(format!(
                    "expected placeholder after '{}', found {:?}",
                    column, other
                )))
            }
        };
        filters.push(Comparison { column, op, value });

        match iter.next() {
            None => break,
            Some(Token::Ident(kw)) if kw.eq_ignore_ascii_case("and") => continue,
            Some(other) => {
                return Err(LogError::InvalidFilter(format!(
                    "expected AND, found {:?}",
                    other
                )))
            }
        }
    }

    if let Params::Positional(values) = params {
        if values.len() != next_positional {
            return Err(LogError::InvalidFilter(format!(
                "expected {} parameters, got {}",
                next_positional,
                values.len()
            )));
        }
    }

    Ok(AndFilter { filters })
}
