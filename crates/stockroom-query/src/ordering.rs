//! Sort direction, sort clauses and the key comparator.
//!
//! Sort keys are compared with a natural ordering: numbers numerically
//! (numeric text included), dates chronologically, text lexicographically.
//! Values of different kinds rank as
//!
//! ```text
//! missing < number < date < text < bool
//! ```
//!
//! which keeps the comparator a total order even on columns that mix kinds.

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::QueryError;
use crate::value::{Number, Value};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dir {
    /// Smallest first.
    #[default]
    #[serde(alias = "asc")]
    Ascending,
    /// Largest first.
    #[serde(alias = "desc")]
    Descending,
}

impl Dir {
    /// Applies this direction to an ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Ascending => ordering,
            Dir::Descending => ordering.reverse(),
        }
    }

    /// Returns the other direction.
    pub fn toggled(self) -> Dir {
        match self {
            Dir::Ascending => Dir::Descending,
            Dir::Descending => Dir::Ascending,
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Ascending => "ascending",
            Dir::Descending => "descending",
        }
    }
}

impl std::fmt::Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Dir {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ascending" | "asc" => Ok(Dir::Ascending),
            "descending" | "desc" => Ok(Dir::Descending),
            _ => Err(QueryError::InvalidDirection(s.to_string())),
        }
    }
}

/// How a sort field's values are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKind {
    /// Numbers and numeric text numerically, everything else by kind.
    #[default]
    Natural,
    /// The field holds dates; text is parsed as a date and anything that
    /// does not parse sorts as missing.
    Date,
}

/// A sort clause: field, direction and key interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortBy {
    /// The field to sort by.
    pub field: String,
    /// The sort direction.
    pub dir: Dir,
    /// How values are compared.
    pub kind: SortKind,
}

impl SortBy {
    /// Creates a natural-order sort clause.
    pub fn new(field: impl Into<String>, dir: Dir) -> Self {
        SortBy {
            field: field.into(),
            dir,
            kind: SortKind::Natural,
        }
    }

    /// Creates an ascending sort clause.
    pub fn asc(field: impl Into<String>) -> Self {
        SortBy::new(field, Dir::Ascending)
    }

    /// Creates a descending sort clause.
    pub fn desc(field: impl Into<String>) -> Self {
        SortBy::new(field, Dir::Descending)
    }

    /// Interprets the field as a date.
    pub fn as_date(mut self) -> Self {
        self.kind = SortKind::Date;
        self
    }

    /// Compares two field values according to this clause.
    pub fn compare(&self, a: &Value<'_>, b: &Value<'_>) -> Ordering {
        self.dir.apply(compare_keys(a, b, self.kind))
    }
}

#[derive(Debug, PartialEq)]
enum SortKey<'a> {
    Missing,
    Number(Number),
    Date(NaiveDate),
    Text(&'a str),
    Bool(bool),
}

impl SortKey<'_> {
    fn rank(&self) -> u8 {
        match self {
            SortKey::Missing => 0,
            SortKey::Number(_) => 1,
            SortKey::Date(_) => 2,
            SortKey::Text(_) => 3,
            SortKey::Bool(_) => 4,
        }
    }
}

fn sort_key<'a>(value: &Value<'a>, kind: SortKind) -> SortKey<'a> {
    match kind {
        SortKind::Date => value.as_date().map_or(SortKey::Missing, SortKey::Date),
        SortKind::Natural => match value {
            Value::None => SortKey::Missing,
            Value::Number(n) => SortKey::Number(*n),
            Value::Date(d) => SortKey::Date(*d),
            Value::Bool(b) => SortKey::Bool(*b),
            Value::Text(s) => match Number::parse(s) {
                Some(n) => SortKey::Number(n),
                None => SortKey::Text(s),
            },
        },
    }
}

/// Compares two field values in ascending natural order.
///
/// Missing values are smaller than any present value. Numeric text is
/// coerced, so `"9" < "10" < "100"`.
///
/// ```
/// use std::cmp::Ordering;
/// use stockroom_query::{compare_keys, SortKind, Value};
///
/// assert_eq!(compare_keys(&Value::Text("9"), &Value::Text("10"), SortKind::Natural), Ordering::Less);
/// assert_eq!(compare_keys(&Value::None, &Value::Text("a"), SortKind::Natural), Ordering::Less);
/// ```
pub fn compare_keys(a: &Value<'_>, b: &Value<'_>, kind: SortKind) -> Ordering {
    let (ka, kb) = (sort_key(a, kind), sort_key(b, kind));
    match (&ka, &kb) {
        (SortKey::Number(x), SortKey::Number(y)) => x.total_cmp(*y),
        (SortKey::Date(x), SortKey::Date(y)) => x.cmp(y),
        (SortKey::Text(x), SortKey::Text(y)) => x.cmp(y),
        (SortKey::Bool(x), SortKey::Bool(y)) => x.cmp(y),
        _ => ka.rank().cmp(&kb.rank()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn natural(a: Value<'_>, b: Value<'_>) -> Ordering {
        compare_keys(&a, &b, SortKind::Natural)
    }

    #[test]
    fn dir_apply_and_parse() {
        assert_eq!(Dir::Ascending.apply(Ordering::Less), Ordering::Less);
        assert_eq!(Dir::Descending.apply(Ordering::Less), Ordering::Greater);
        assert_eq!("ascending".parse::<Dir>().unwrap(), Dir::Ascending);
        assert_eq!("DESC".parse::<Dir>().unwrap(), Dir::Descending);
        assert_eq!(
            "sideways".parse::<Dir>(),
            Err(QueryError::InvalidDirection("sideways".into()))
        );
        assert_eq!(Dir::Ascending.toggled(), Dir::Descending);
    }

    #[test]
    fn numeric_text_is_not_lexicographic() {
        assert_eq!(natural(Value::Text("9"), Value::Text("10")), Ordering::Less);
        assert_eq!(natural(Value::Text("100"), Value::Text("20")), Ordering::Greater);
        assert_eq!(
            natural(Value::Text("9.5"), Value::Number(Number::I64(10))),
            Ordering::Less
        );
    }

    #[test]
    fn text_is_lexicographic() {
        assert_eq!(natural(Value::Text("Oil"), Value::Text("Rice")), Ordering::Less);
        assert_eq!(natural(Value::Text("b"), Value::Text("a")), Ordering::Greater);
    }

    #[test]
    fn missing_is_smallest() {
        assert_eq!(natural(Value::None, Value::Number(Number::I64(-5))), Ordering::Less);
        assert_eq!(natural(Value::Text("a"), Value::None), Ordering::Greater);
        assert_eq!(natural(Value::None, Value::None), Ordering::Equal);
    }

    #[test]
    fn mixed_kinds_rank() {
        assert_eq!(natural(Value::Text("10"), Value::Text("1a")), Ordering::Less);
        assert_eq!(natural(Value::Text("2"), Value::Text("1a")), Ordering::Less);
        assert_eq!(natural(Value::Bool(false), Value::Text("z")), Ordering::Greater);
    }

    #[test]
    fn date_kind_parses_text() {
        let a = Value::Text("2024-01-05T10:00:00Z");
        let b = Value::Text("2023-12-31");
        assert_eq!(compare_keys(&a, &b, SortKind::Date), Ordering::Greater);
        assert_eq!(
            compare_keys(&Value::Text("soon"), &b, SortKind::Date),
            Ordering::Less
        );
    }

    #[test]
    fn sort_by_descending_reverses() {
        let clause = SortBy::desc("price");
        assert_eq!(
            clause.compare(&Value::Text("9"), &Value::Text("10")),
            Ordering::Greater
        );
        assert_eq!(clause.compare(&Value::None, &Value::Text("1")), Ordering::Greater);
        assert_eq!(SortBy::asc("d").as_date().kind, SortKind::Date);
    }
}
