//! Filter/sort compiler.
//!
//! Filter keys are either a bare column name (exact match) or
//! `column__operator`. Recognised operators are `exact`, `in` and `between`.
//! Every entry compiles to exactly one [`Predicate`]; predicates are ANDed.

use std::cmp::Ordering;
use std::str::FromStr;

use sqlx::{Postgres, QueryBuilder};

use crate::modules::persistence::error::{DbError, DbResult};
use crate::modules::persistence::value::SqlValue;

const OPERATOR_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Exact,
    In,
    Between,
}

impl FromStr for Operator {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact" => Ok(Operator::Exact),
            "in" => Ok(Operator::In),
            "between" => Ok(Operator::Between),
            _ => Err(()),
        }
    }
}

/// Right-hand side of a filter entry
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Value(SqlValue),
    List(Vec<SqlValue>),
    Range(SqlValue, SqlValue),
}

impl Operand {
    pub fn value(value: impl Into<SqlValue>) -> Self {
        Operand::Value(value.into())
    }

    pub fn list<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<SqlValue>,
    {
        Operand::List(values.into_iter().map(Into::into).collect())
    }

    pub fn range(low: impl Into<SqlValue>, high: impl Into<SqlValue>) -> Self {
        Operand::Range(low.into(), high.into())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Exact {
        field: String,
        value: SqlValue,
    },
    In {
        field: String,
        values: Vec<SqlValue>,
    },
    /// Inclusive on both ends, `low <= high` whenever the bounds are comparable
    Between {
        field: String,
        low: SqlValue,
        high: SqlValue,
    },
}

impl Predicate {
    pub fn exact(field: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Predicate::Exact {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn one_of<I, T>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<SqlValue>,
    {
        Predicate::In {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Bounds are swapped when given in descending order
    pub fn between(
        field: impl Into<String>,
        low: impl Into<SqlValue>,
        high: impl Into<SqlValue>,
    ) -> Self {
        let (low, high) = (low.into(), high.into());
        let (low, high) = match low.compare(&high) {
            Some(Ordering::Greater) => (high, low),
            _ => (low, high),
        };
        Predicate::Between {
            field: field.into(),
            low,
            high,
        }
    }

    pub fn field(&self) -> &str {
        match self {
            Predicate::Exact { field, .. }
            | Predicate::In { field, .. }
            | Predicate::Between { field, .. } => field,
        }
    }

    /// Values the predicate accepts as a membership list.
    ///
    /// `Between` has no list form and is rejected.
    pub fn into_values(self) -> DbResult<Vec<SqlValue>> {
        match self {
            Predicate::Exact { value, .. } => Ok(vec![value]),
            Predicate::In { values, .. } => Ok(values),
            Predicate::Between { field, .. } => Err(DbError::Configuration(format!(
                "Field {field} only supports exact and in operators"
            ))),
        }
    }

    fn compile(expression: &str, operand: Operand) -> DbResult<Self> {
        let (field, operator) = match expression.split_once(OPERATOR_SEPARATOR) {
            Some((field, op_name)) => {
                let operator = op_name.parse::<Operator>().map_err(|_| {
                    DbError::Configuration(format!(
                        "Expression {expression} has incorrect operator {op_name}"
                    ))
                })?;
                (field, operator)
            }
            None => (expression, Operator::Exact),
        };

        if field.is_empty() {
            return Err(DbError::Configuration(format!(
                "Expression {expression} has no field"
            )));
        }

        match (operator, operand) {
            (Operator::Exact, Operand::Value(value)) => Ok(Predicate::exact(field, value)),
            (Operator::In, Operand::List(values)) => Ok(Predicate::one_of(field, values)),
            (Operator::Between, Operand::Range(low, high)) => {
                Ok(Predicate::between(field, low, high))
            }
            (operator, operand) => Err(DbError::Configuration(format!(
                "Expression {expression} cannot use {operator:?} with {}",
                match operand {
                    Operand::Value(_) => "a single value",
                    Operand::List(_) => "a list",
                    Operand::Range(..) => "a range",
                }
            ))),
        }
    }

    /// Render as SQL against `column`, which must already be qualified
    fn push_sql(&self, column: &str, builder: &mut QueryBuilder<'static, Postgres>) {
        match self {
            Predicate::Exact { value, .. } => {
                builder.push(column).push(" = ");
                value.clone().push_bind(builder);
            }
            Predicate::In { values, .. } if values.is_empty() => {
                builder.push("FALSE");
            }
            Predicate::In { values, .. } => {
                builder.push(column).push(" IN (");
                push_bind_list(builder, values);
                builder.push(")");
            }
            Predicate::Between { low, high, .. } => {
                builder.push(column).push(" BETWEEN ");
                low.clone().push_bind(builder);
                builder.push(" AND ");
                high.clone().push_bind(builder);
            }
        }
    }
}

/// Push `$1, $2, ...` for every value
pub fn push_bind_list(builder: &mut QueryBuilder<'static, Postgres>, values: &[SqlValue]) {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            builder.push(", ");
        }
        value.clone().push_bind(builder);
    }
}

/// An ordered set of predicates, ANDed together. Empty matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters(Vec<Predicate>);

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile `field[__operator] -> operand` entries in iteration order
    pub fn compile<I, K>(entries: I) -> DbResult<Self>
    where
        I: IntoIterator<Item = (K, Operand)>,
        K: AsRef<str>,
    {
        entries
            .into_iter()
            .map(|(expression, operand)| Predicate::compile(expression.as_ref(), operand))
            .collect::<DbResult<Vec<_>>>()
            .map(Filters)
    }

    pub fn with(mut self, predicate: Predicate) -> Self {
        self.0.push(predicate);
        self
    }

    /// Remove and return the first predicate on `field`
    pub fn take(&mut self, field: &str) -> Option<Predicate> {
        let index = self.0.iter().position(|p| p.field() == field)?;
        Some(self.0.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Predicate> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render `p1 AND p2 AND ...`, resolving each field through `column`
    pub fn push_sql<F>(
        &self,
        builder: &mut QueryBuilder<'static, Postgres>,
        column: F,
    ) -> DbResult<()>
    where
        F: Fn(&str) -> DbResult<String>,
    {
        for (i, predicate) in self.0.iter().enumerate() {
            if i > 0 {
                builder.push(" AND ");
            }
            let column = column(predicate.field())?;
            predicate.push_sql(&column, builder);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(DbError::Configuration(format!(
                "Sort direction {s} is not one of asc, desc"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    /// Compile `field -> direction` entries; the first entry is the primary key
    pub fn compile<I, K, D>(entries: I) -> DbResult<Vec<Sort>>
    where
        I: IntoIterator<Item = (K, D)>,
        K: Into<String>,
        D: AsRef<str>,
    {
        entries
            .into_iter()
            .map(|(field, direction)| {
                Ok(Sort {
                    field: field.into(),
                    direction: direction.as_ref().parse()?,
                })
            })
            .collect()
    }
}
