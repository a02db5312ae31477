//! Filter conditions for store queries
//!
//! A small comparison language applied to records. Conditions are
//! evaluated against the JSON projection of an entity by the memory
//! store; SQL-backed stores translate them into WHERE clauses
//! instead.
//!
//! # Example
//!
//! ```rust
//! use crudkit::store::FilterCondition;
//! use serde_json::json;
//!
//! let filters = vec![
//!     FilterCondition::eq("author", "alice"),
//!     FilterCondition::gte("priority", 3),
//! ];
//!
//! let record = json!({"author": "alice", "priority": 5});
//! assert!(filters.iter().all(|f| f.matches(&record)));
//! ```

use std::fmt;

use serde_json::Value;

/// Comparison operators for filter conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    /// Equal to (=)
    Equal,
    /// Not equal to (!=)
    NotEqual,
    /// Greater than (>)
    GreaterThan,
    /// Greater than or equal to (>=)
    GreaterThanOrEqual,
    /// Less than (<)
    LessThan,
    /// Less than or equal to (<=)
    LessThanOrEqual,
    /// Value is in a list (IN)
    In,
    /// Value is null or absent (IS NULL)
    IsNull,
    /// Value is present and non-null (IS NOT NULL)
    IsNotNull,
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equal => write!(f, "="),
            Self::NotEqual => write!(f, "!="),
            Self::GreaterThan => write!(f, ">"),
            Self::GreaterThanOrEqual => write!(f, ">="),
            Self::LessThan => write!(f, "<"),
            Self::LessThanOrEqual => write!(f, "<="),
            Self::In => write!(f, "IN"),
            Self::IsNull => write!(f, "IS NULL"),
            Self::IsNotNull => write!(f, "IS NOT NULL"),
        }
    }
}

/// A single filter condition on a field
///
/// The comparison value is a `serde_json::Value`, matching the JSON
/// projection the condition is evaluated against.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCondition {
    /// Field name, matched against top-level keys of the record
    pub field: String,
    /// The comparison operator
    pub operator: FilterOperator,
    /// The value to compare against (`Null` for the null checks)
    pub value: Value,
}

impl FilterCondition {
    /// Create a filter condition
    pub fn new(
        field: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    /// Field equals value
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::Equal, value)
    }

    /// Field does not equal value
    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::NotEqual, value)
    }

    /// Field is greater than value
    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::GreaterThan, value)
    }

    /// Field is greater than or equal to value
    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::GreaterThanOrEqual, value)
    }

    /// Field is less than value
    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::LessThan, value)
    }

    /// Field is less than or equal to value
    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::LessThanOrEqual, value)
    }

    /// Field value is one of the listed values
    pub fn is_in(field: impl Into<String>, values: Vec<Value>) -> Self {
        Self::new(field, FilterOperator::In, Value::Array(values))
    }

    /// Field is null or absent
    pub fn is_null(field: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::IsNull, Value::Null)
    }

    /// Field is present and non-null
    pub fn is_not_null(field: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::IsNotNull, Value::Null)
    }

    /// Evaluate this condition against the JSON projection of a record
    ///
    /// A missing field behaves like a null one: it satisfies
    /// `IsNull`, fails `IsNotNull`, and fails every comparison.
    #[must_use]
    pub fn matches(&self, record: &Value) -> bool {
        let field_value = record.get(&self.field).unwrap_or(&Value::Null);

        match self.operator {
            FilterOperator::IsNull => field_value.is_null(),
            FilterOperator::IsNotNull => !field_value.is_null(),
            FilterOperator::Equal => field_value == &self.value,
            FilterOperator::NotEqual => field_value != &self.value,
            FilterOperator::In => match &self.value {
                Value::Array(candidates) => candidates.contains(field_value),
                _ => false,
            },
            FilterOperator::GreaterThan => {
                compare(field_value, &self.value).is_some_and(|o| o == std::cmp::Ordering::Greater)
            }
            FilterOperator::GreaterThanOrEqual => {
                compare(field_value, &self.value).is_some_and(|o| o != std::cmp::Ordering::Less)
            }
            FilterOperator::LessThan => {
                compare(field_value, &self.value).is_some_and(|o| o == std::cmp::Ordering::Less)
            }
            FilterOperator::LessThanOrEqual => {
                compare(field_value, &self.value).is_some_and(|o| o != std::cmp::Ordering::Greater)
            }
        }
    }
}

/// Order two JSON scalars of the same shape; `None` when the types
/// are incomparable
fn compare(left: &Value, right: &Value) -> Option<std::cmp::Ordering> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Direction for ordering read results
///
/// # Example
///
/// ```rust
/// use crudkit::store::OrderDirection;
///
/// let asc = OrderDirection::Ascending;
/// let desc = OrderDirection::Descending;
///
/// assert_eq!(format!("{}", asc), "asc");
/// assert_eq!(format!("{}", desc), "desc");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    /// Sort in ascending order (A-Z, 0-9)
    #[default]
    Ascending,
    /// Sort in descending order (Z-A, 9-0)
    Descending,
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

/// Order two field values for sorting
///
/// Nulls (and missing fields, which project to null) sort first;
/// incomparable types keep their relative order under a stable sort.
pub(crate) fn order_values(left: &Value, right: &Value) -> std::cmp::Ordering {
    use std::cmp::Ordering;

    match (left.is_null(), right.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => compare(left, right).unwrap_or(Ordering::Equal),
    }
}
