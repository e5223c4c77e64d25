//! Runtime value types for field access.
//!
//! The [`Value`] enum is what an accessor hands back for a named field of a
//! record. The pipeline never looks at records directly, only at these values.

use std::borrow::Cow;
use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::date::{format_date, parse_date};

/// Runtime value of a record field, borrowed from the record.
///
/// # Example
///
/// ```
/// use stockroom_query::{Number, Value};
///
/// struct Product {
///     name: String,
///     quantity: u32,
/// }
///
/// fn accessor<'a>(product: &'a Product, field: &str) -> Value<'a> {
///     match field {
///         "name" => Value::Text(&product.name),
///         "quantity" => Value::Number(Number::from(product.quantity)),
///         _ => Value::None,
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// Text value (borrowed).
    Text(&'a str),
    /// Numeric value.
    Number(Number),
    /// Calendar date.
    Date(NaiveDate),
    /// Boolean value.
    Bool(bool),
    /// Field missing, null, or not exposed.
    None,
}

impl<'a> Value<'a> {
    /// Returns `true` if this is a `None` value.
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Extracts the text value, if present.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the number, coercing numeric text.
    ///
    /// Prices and amounts often arrive from JSON backends as strings, so
    /// `"20"` and `" 9.5 "` both yield a number here. Non-finite parses
    /// (`"NaN"`, `"inf"`) are not numbers.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(s) => Number::parse(s),
            _ => None,
        }
    }

    /// Extracts the date, parsing date-like text.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            Value::Text(s) => parse_date(s),
            _ => None,
        }
    }

    /// Extracts the boolean value, if present.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// String form used for search and category matching.
    ///
    /// Returns `None` for missing values so they never match a filter.
    pub fn to_text(&self) -> Option<Cow<'a, str>> {
        match self {
            Value::Text(s) => Some(Cow::Borrowed(s)),
            Value::Number(n) => Some(Cow::Owned(n.to_string())),
            Value::Date(d) => Some(Cow::Owned(format_date(*d))),
            Value::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
            Value::None => None,
        }
    }
}

impl From<NaiveDate> for Value<'_> {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<bool> for Value<'_> {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::Text(s)
    }
}

impl<'a, T> From<Option<T>> for Value<'a>
where
    T: Into<Value<'a>>,
{
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::None)
    }
}

/// Numeric value.
///
/// Integers keep their precision when both sides are the same variant;
/// mixed comparisons go through `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Converts the number to f64.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// Parses numeric text. Surrounding whitespace is ignored.
    pub fn parse(s: &str) -> Option<Number> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        if let Ok(n) = s.parse::<i64>() {
            return Some(Number::I64(n));
        }
        match s.parse::<f64>() {
            Ok(f) if f.is_finite() => Some(Number::F64(f)),
            _ => None,
        }
    }

    /// Total ordering between two numbers, mixed variants included.
    ///
    /// Integers compare exactly with each other and with floats, at any
    /// magnitude. NaN sorts after every other number and `-0.0` equals `0.0`.
    pub fn total_cmp(self, other: Number) -> Ordering {
        match (self, other) {
            (Number::F64(a), Number::F64(b)) => float_cmp(a, b),
            (Number::F64(a), b) => b.int_cmp_float(a).reverse(),
            (a, Number::F64(b)) => a.int_cmp_float(b),
            (a, b) => a.as_i128().cmp(&b.as_i128()),
        }
    }

    fn as_i128(self) -> i128 {
        match self {
            Number::I64(n) => i128::from(n),
            Number::U64(n) => i128::from(n),
            Number::F64(n) => n as i128,
        }
    }

    fn int_cmp_float(self, f: f64) -> Ordering {
        const LIMIT: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0; // 2^127
        if f.is_nan() || f >= LIMIT {
            return Ordering::Less;
        }
        if f < -LIMIT {
            return Ordering::Greater;
        }
        let whole = f.trunc();
        self.as_i128()
            .cmp(&(whole as i128))
            .then_with(|| float_cmp(whole, f))
    }
}

fn float_cmp(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::I64(n) => write!(f, "{}", n),
            Number::U64(n) => write!(f, "{}", n),
            Number::F64(n) => write!(f, "{}", n),
        }
    }
}

impl From<i32> for Number {
    fn from(n: i32) -> Self {
        Number::I64(n as i64)
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::I64(n)
    }
}

impl From<u32> for Number {
    fn from(n: u32) -> Self {
        Number::U64(n as u64)
    }
}

impl From<u64> for Number {
    fn from(n: u64) -> Self {
        Number::U64(n)
    }
}

impl From<usize> for Number {
    fn from(n: usize) -> Self {
        Number::U64(n as u64)
    }
}

impl From<f32> for Number {
    fn from(n: f32) -> Self {
        Number::F64(n as f64)
    }
}

impl From<f64> for Number {
    fn from(n: f64) -> Self {
        Number::F64(n)
    }
}

impl From<Number> for Value<'_> {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_text_coerces() {
        assert_eq!(Value::Text("20").as_number(), Some(Number::I64(20)));
        assert_eq!(Value::Text(" 9.5 ").as_number(), Some(Number::F64(9.5)));
        assert_eq!(Value::Text("abc").as_number(), None);
        assert_eq!(Value::Text("").as_number(), None);
        assert_eq!(Value::Text("NaN").as_number(), None);
        assert_eq!(Value::Bool(true).as_number(), None);
    }

    #[test]
    fn number_ordering_mixed() {
        assert_eq!(Number::I64(9).total_cmp(Number::I64(10)), Ordering::Less);
        assert_eq!(Number::U64(10).total_cmp(Number::F64(9.5)), Ordering::Greater);
        assert_eq!(Number::I64(5).total_cmp(Number::F64(5.0)), Ordering::Equal);
        assert_eq!(
            Number::F64(f64::NAN).total_cmp(Number::F64(1.0)),
            Ordering::Greater
        );
        assert_eq!(Number::I64(-1).total_cmp(Number::U64(u64::MAX)), Ordering::Less);
        assert_eq!(Number::I64(-2).total_cmp(Number::F64(-1.5)), Ordering::Less);
        assert_eq!(Number::I64(0).total_cmp(Number::F64(-0.0)), Ordering::Equal);
        assert_eq!(Number::F64(-0.0).total_cmp(Number::F64(0.0)), Ordering::Equal);
    }

    #[test]
    fn large_integers_compare_exactly_with_floats() {
        let two_53 = 1_i64 << 53;
        let a = Number::I64(two_53 + 1);
        let b = Number::I64(two_53);
        let f = Number::F64(two_53 as f64);

        assert_eq!(a.total_cmp(b), Ordering::Greater);
        assert_eq!(a.total_cmp(f), Ordering::Greater);
        assert_eq!(f.total_cmp(a), Ordering::Less);
        assert_eq!(b.total_cmp(f), Ordering::Equal);
        assert_eq!(Number::U64(u64::MAX).total_cmp(Number::F64(1e300)), Ordering::Less);
        assert_eq!(Number::I64(i64::MIN).total_cmp(Number::F64(-1e300)), Ordering::Greater);

        let mut numbers = vec![a, f, b, Number::U64((1 << 53) + 2), Number::F64(9.5)];
        numbers.sort_by(|x, y| x.total_cmp(*y));
        assert_eq!(
            numbers,
            vec![Number::F64(9.5), f, b, a, Number::U64((1 << 53) + 2)]
        );
    }

    #[test]
    fn text_forms() {
        assert_eq!(Value::Number(Number::I64(5)).to_text().as_deref(), Some("5"));
        assert_eq!(Value::Number(Number::F64(9.5)).to_text().as_deref(), Some("9.5"));
        assert_eq!(Value::Bool(false).to_text().as_deref(), Some("false"));
        let d = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(Value::Date(d).to_text().as_deref(), Some("2024-03-07"));
        assert_eq!(Value::None.to_text(), None);
    }

    #[test]
    fn option_into_value() {
        let missing: Option<bool> = None;
        assert_eq!(Value::from(missing), Value::None);
        assert_eq!(Value::from(Some(true)), Value::Bool(true));
    }
}
