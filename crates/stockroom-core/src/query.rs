//! Query shapes: projections, row filters and sort orders.
//!
//! Filters are structured rather than raw SQL so that every store backend can
//! evaluate them and the SQLite backend can bind every value as a parameter.

use std::cmp::Ordering;

use crate::types::{Column, ItemId, Record, Value};

/// Which columns a query returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Projection {
    #[default]
    All,
    Columns(Vec<Column>),
}

impl Projection {
    pub fn columns(&self) -> &[Column] {
        match self {
            Projection::All => &Column::ALL,
            Projection::Columns(columns) => columns,
        }
    }
}

impl From<Vec<Column>> for Projection {
    fn from(columns: Vec<Column>) -> Self {
        Projection::Columns(columns)
    }
}

/// Comparison operator of a single condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    /// SQL `LIKE`: `%` and `_` wildcards, ASCII case-insensitive.
    Like,
}

impl Op {
    pub const fn sql(self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Ne => "<>",
            Op::Lt => "<",
            Op::Le => "<=",
            Op::Gt => ">",
            Op::Ge => ">=",
            Op::Like => "LIKE",
        }
    }
}

/// `column <op> value`.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: Column,
    pub op: Op,
    pub value: Value,
}

impl Condition {
    /// Evaluate against a record. Comparisons involving NULL never match.
    pub fn matches(&self, record: &Record) -> bool {
        let cell = match record.get(self.column) {
            Some(cell) if !cell.is_null() => cell,
            _ => return false,
        };
        let value = self.column.coerce(&self.value);
        if value.is_null() {
            return false;
        }

        let ord = || cell.total_cmp(&value);
        match self.op {
            Op::Eq => ord() == Ordering::Equal,
            Op::Ne => ord() != Ordering::Equal,
            Op::Lt => ord() == Ordering::Less,
            Op::Le => ord() != Ordering::Greater,
            Op::Gt => ord() == Ordering::Greater,
            Op::Ge => ord() != Ordering::Less,
            Op::Like => match (like_text(cell), like_text(&self.value)) {
                (Some(text), Some(pattern)) => like(&pattern, &text),
                _ => false,
            },
        }
    }
}

/// Conjunction of conditions. The empty filter matches every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter narrowed to a single row id.
    pub fn id(id: ItemId) -> Self {
        Self::all().and(Column::Id, Op::Eq, id)
    }

    pub fn and(mut self, column: Column, op: Op, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition {
            column,
            op,
            value: value.into(),
        });
        self
    }

    pub fn eq(self, column: Column, value: impl Into<Value>) -> Self {
        self.and(column, Op::Eq, value)
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.conditions.iter().all(|c| c.matches(record))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub column: Column,
    pub direction: Direction,
}

impl SortOrder {
    pub fn asc(column: Column) -> Self {
        Self {
            column,
            direction: Direction::Ascending,
        }
    }

    pub fn desc(column: Column) -> Self {
        Self {
            column,
            direction: Direction::Descending,
        }
    }

    /// Compare two records; missing cells sort as NULL, i.e. first.
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        let a = a.get(self.column).unwrap_or(&Value::Null);
        let b = b.get(self.column).unwrap_or(&Value::Null);
        let ord = a.total_cmp(b);
        match self.direction {
            Direction::Ascending => ord,
            Direction::Descending => ord.reverse(),
        }
    }
}

/// LIKE operands are compared as text; numbers are rendered first.
fn like_text(value: &Value) -> Option<String> {
    match value {
        Value::Text(s) => Some(s.clone()),
        Value::Integer(i) => Some(i.to_string()),
        Value::Real(r) => Some(format!("{:?}", r)),
        Value::Null | Value::Blob(_) => None,
    }
}

/// Case-insensitive (ASCII) LIKE with `%` and `_`, one character at a time.
///
/// Greedy with a single backtrack point: on a mismatch, only the most recent
/// `%` absorbs one more character. Worst case is `O(pattern * text)`.
fn like(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let (mut p, mut t) = (0, 0);
    let mut resume: Option<(usize, usize)> = None;
    while t < text.len() {
        match pattern.get(p) {
            Some('%') => {
                resume = Some((p + 1, t));
                p += 1;
            }
            Some(&c) if c == '_' || c.eq_ignore_ascii_case(&text[t]) => {
                p += 1;
                t += 1;
            }
            _ => match resume {
                Some((after_wildcard, absorbed)) => {
                    resume = Some((after_wildcard, absorbed + 1));
                    p = after_wildcard;
                    t = absorbed + 1;
                }
                None => return false,
            },
        }
    }
    pattern[p..].iter().all(|&c| c == '%')
}
