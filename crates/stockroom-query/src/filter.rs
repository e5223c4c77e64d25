//! Search and category filters.

use crate::value::Value;

/// Case-insensitive substring search over one or more fields.
///
/// A record matches when the term occurs in at least one of the fields.
/// A blank term matches everything.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchFilter {
    /// The raw search term as typed.
    pub term: String,
    /// Fields searched, OR semantics.
    pub fields: Vec<String>,
}

impl SearchFilter {
    /// Creates a search over the given fields.
    pub fn new<I, S>(term: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SearchFilter {
            term: term.into(),
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns `true` if the term is blank and the filter keeps every record.
    pub fn is_blank(&self) -> bool {
        self.term.trim().is_empty()
    }

    /// The trimmed, lowercased needle, or `None` for a blank term.
    pub(crate) fn needle(&self) -> Option<String> {
        let term = self.term.trim();
        (!term.is_empty()).then(|| term.to_lowercase())
    }
}

/// Returns `true` if `value`'s text form contains `needle` (already lowercased).
pub(crate) fn contains_ci(value: &Value<'_>, needle: &str) -> bool {
    value
        .to_text()
        .is_some_and(|text| text.to_lowercase().contains(needle))
}

/// Exact, case-sensitive match of a field against a category value.
///
/// An empty value keeps every record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryFilter {
    /// Field compared.
    pub field: String,
    /// Required value.
    pub value: String,
}

impl CategoryFilter {
    /// Creates a category filter.
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        CategoryFilter {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Returns `true` if the value is empty and the filter keeps every record.
    pub fn is_blank(&self) -> bool {
        self.value.is_empty()
    }

    /// Returns `true` if the field value equals the category value.
    pub fn matches(&self, value: &Value<'_>) -> bool {
        value.to_text().is_some_and(|text| text == self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Number;

    #[test]
    fn blank_terms() {
        assert!(SearchFilter::new("", ["name"]).is_blank());
        assert!(SearchFilter::new("   ", ["name"]).is_blank());
        assert!(!SearchFilter::new(" ri ", ["name"]).is_blank());
        assert_eq!(SearchFilter::new(" RI ", ["name"]).needle().as_deref(), Some("ri"));
    }

    #[test]
    fn contains_is_case_insensitive() {
        assert!(contains_ci(&Value::Text("Rice"), "ri"));
        assert!(contains_ci(&Value::Text("BROWN RICE"), "rice"));
        assert!(!contains_ci(&Value::Text("Oil"), "ri"));
        assert!(contains_ci(&Value::Number(Number::I64(1042)), "04"));
        assert!(!contains_ci(&Value::None, ""));
    }

    #[test]
    fn category_is_exact() {
        let filter = CategoryFilter::new("category", "Grains");
        assert!(filter.matches(&Value::Text("Grains")));
        assert!(!filter.matches(&Value::Text("grains")));
        assert!(!filter.matches(&Value::Text("Grains ")));
        assert!(!filter.matches(&Value::None));
        assert!(CategoryFilter::new("category", "").is_blank());
    }
}
