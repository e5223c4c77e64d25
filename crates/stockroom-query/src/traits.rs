//! The [`Record`] trait.
//!
//! A record exposes its fields by name. Typed structs usually get the impl
//! from `#[derive(Record)]` in `stockroom-macros`; dynamic JSON objects are
//! covered by the impls in this crate's `json` module.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};

use crate::date::parse_date;
use crate::value::Value;

/// Trait for types the pipeline can query.
///
/// # Manual Implementation
///
/// ```
/// use stockroom_query::{Number, Record, Value};
///
/// struct Store {
///     name: String,
///     branch: String,
///     employees: u32,
/// }
///
/// impl Record for Store {
///     fn field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "name" => Value::Text(&self.name),
///             "branch" => Value::Text(&self.branch),
///             "employees" => Value::Number(Number::from(self.employees)),
///             _ => Value::None,
///         }
///     }
///
///     fn field_names() -> Option<&'static [&'static str]> {
///         Some(&["name", "branch", "employees"])
///     }
/// }
/// ```
pub trait Record {
    /// Returns the value of a field, or [`Value::None`] if the record has no
    /// such field or it is null.
    fn field_value(&self, field: &str) -> Value<'_>;

    /// Names of every field this type exposes, when they are known statically.
    ///
    /// Returning `Some` lets the pipeline reject queries that name a field the
    /// type does not have. Dynamic records return `None` and skip that check.
    fn field_names() -> Option<&'static [&'static str]>
    where
        Self: Sized,
    {
        None
    }

    /// Free-function form of [`Record::field_value`], usable wherever an
    /// accessor closure is expected.
    fn accessor<'a>(item: &'a Self, field: &str) -> Value<'a>
    where
        Self: Sized,
    {
        item.field_value(field)
    }
}

impl<T: Record> Record for &T {
    fn field_value(&self, field: &str) -> Value<'_> {
        (**self).field_value(field)
    }

    fn field_names() -> Option<&'static [&'static str]> {
        T::field_names()
    }
}

/// Conversion of date-like field types to a calendar day.
///
/// Used by `#[derive(Record)]` for fields marked `#[record(Date)]`. Text
/// implementations parse the forms accepted by [`parse_date`] and yield
/// `None` for anything else, which the pipeline treats as a missing date.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use stockroom_query::RecordDate;
///
/// struct Stamp(i64);
///
/// impl RecordDate for Stamp {
///     fn record_date(&self) -> Option<NaiveDate> {
///         chrono::DateTime::from_timestamp(self.0, 0).map(|dt| dt.date_naive())
///     }
/// }
///
/// assert_eq!(Stamp(0).record_date(), NaiveDate::from_ymd_opt(1970, 1, 1));
/// ```
pub trait RecordDate {
    /// Returns the calendar day, or `None` if there is no valid date.
    fn record_date(&self) -> Option<NaiveDate>;
}

impl RecordDate for NaiveDate {
    fn record_date(&self) -> Option<NaiveDate> {
        Some(*self)
    }
}

impl RecordDate for NaiveDateTime {
    fn record_date(&self) -> Option<NaiveDate> {
        Some(self.date())
    }
}

impl<Tz: TimeZone> RecordDate for DateTime<Tz> {
    fn record_date(&self) -> Option<NaiveDate> {
        Some(self.date_naive())
    }
}

impl RecordDate for String {
    fn record_date(&self) -> Option<NaiveDate> {
        parse_date(self)
    }
}

impl RecordDate for str {
    fn record_date(&self) -> Option<NaiveDate> {
        parse_date(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Number;

    struct Item {
        name: String,
        qty: i64,
    }

    impl Record for Item {
        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "name" => Value::Text(&self.name),
                "qty" => Value::Number(Number::I64(self.qty)),
                _ => Value::None,
            }
        }
    }

    #[test]
    fn manual_impl() {
        let item = Item {
            name: "Rice".into(),
            qty: 5,
        };
        assert_eq!(item.field_value("name"), Value::Text("Rice"));
        assert_eq!(item.field_value("qty"), Value::Number(Number::I64(5)));
        assert_eq!(item.field_value("price"), Value::None);
        assert_eq!(Item::field_names(), None);
    }

    #[test]
    fn record_date_conversions() {
        let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(day.record_date(), Some(day));
        assert_eq!("2024-06-01T08:00:00Z".record_date(), Some(day));
        assert_eq!(String::from("2024-06-01").record_date(), Some(day));
        assert_eq!("June".record_date(), None);
        let utc = chrono::Utc.with_ymd_and_hms(2024, 6, 1, 23, 0, 0).unwrap();
        assert_eq!(utc.record_date(), Some(day));
    }

    #[test]
    fn reference_delegates() {
        let item = Item {
            name: "Oil".into(),
            qty: 2,
        };
        let by_ref = &item;
        assert_eq!(Record::field_value(&by_ref, "name"), Value::Text("Oil"));
        assert_eq!(Item::accessor(&item, "qty"), Value::Number(Number::I64(2)));
    }
}
