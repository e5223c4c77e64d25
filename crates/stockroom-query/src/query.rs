//! Query builder and executor.
//!
//! A [`ListQuery`] describes one list screen's current controls: search box,
//! date range, category selector, sort column and page. Running it against a
//! collection applies the stages in a fixed order:
//!
//! ```text
//! search -> date range -> category -> sort -> paginate
//! ```
//!
//! Every stage is a pure function of the input; the collection is never
//! mutated and results borrow from it.

use chrono::NaiveDate;

use crate::date::DateRange;
use crate::error::{QueryError, Result};
use crate::filter::{contains_ci, CategoryFilter, SearchFilter};
use crate::ordering::{Dir, SortBy};
use crate::page::{paginate, ListPage, PageRequest};
use crate::traits::Record;
use crate::value::Value;

/// Search, filter, sort and page settings for a record list.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use stockroom_query::{Dir, ListQuery};
///
/// let products = vec![
///     json!({"name": "Rice", "qty": 5, "price": "20"}),
///     json!({"name": "Oil", "qty": 2, "price": "9"}),
///     json!({"name": "Salt", "qty": 8, "price": "100"}),
/// ];
///
/// let page = ListQuery::new()
///     .sort_by("price", Dir::Ascending)
///     .page(1, 2)
///     .build()
///     .execute(&products)
///     .unwrap();
///
/// assert_eq!(page.total_matching, 3);
/// assert_eq!(page.total_pages, 2);
/// assert_eq!(page.items[0]["name"], "Oil");
/// assert_eq!(page.items[1]["name"], "Rice");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    search: Option<SearchFilter>,
    date_range: Option<DateRange>,
    category: Option<CategoryFilter>,
    sort: Option<SortBy>,
    page: PageRequest,
    known_fields: Option<Vec<String>>,
}

impl ListQuery {
    /// Creates a query that keeps every record, in input order, on page 1.
    pub fn new() -> Self {
        ListQuery::default()
    }

    // ========================================================================
    // Builders
    // ========================================================================

    /// Searches `fields` for `term`, case-insensitively.
    pub fn search<I, S>(mut self, term: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search = Some(SearchFilter::new(term, fields));
        self
    }

    /// Keeps records whose `field` date lies in `[start, end]`.
    ///
    /// Either bound may be `None` for an open range.
    pub fn date_range(
        mut self,
        field: impl Into<String>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Self {
        self.date_range = Some(DateRange::new(field, start, end));
        self
    }

    /// Keeps records whose `field` equals `value` exactly.
    pub fn category(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.category = Some(CategoryFilter::new(field, value));
        self
    }

    /// Sorts by `field` in natural order.
    pub fn sort_by(mut self, field: impl Into<String>, dir: Dir) -> Self {
        self.sort = Some(SortBy::new(field, dir));
        self
    }

    /// Sorts by a prepared clause, e.g. `SortBy::desc("createdAt").as_date()`.
    pub fn sort(mut self, clause: SortBy) -> Self {
        self.sort = Some(clause);
        self
    }

    /// Selects page `number` (1-based) of `size` records.
    pub fn page(mut self, number: usize, size: usize) -> Self {
        self.page = PageRequest::new(number, size);
        self
    }

    /// Declares the field names records expose.
    ///
    /// Queries naming any other field fail with [`QueryError::UnknownField`].
    /// Takes precedence over [`Record::field_names`].
    pub fn known_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Finalizes the query.
    pub fn build(self) -> Self {
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The search clause, if any.
    pub fn search_filter(&self) -> Option<&SearchFilter> {
        self.search.as_ref()
    }

    /// The date range clause, if any.
    pub fn date_filter(&self) -> Option<&DateRange> {
        self.date_range.as_ref()
    }

    /// The category clause, if any.
    pub fn category_filter(&self) -> Option<&CategoryFilter> {
        self.category.as_ref()
    }

    /// The sort clause, if any.
    pub fn sort_clause(&self) -> Option<&SortBy> {
        self.sort.as_ref()
    }

    /// The requested page.
    pub fn page_request(&self) -> PageRequest {
        self.page
    }

    /// Returns `true` if no clause would drop or reorder any record.
    pub fn is_unfiltered(&self) -> bool {
        self.search.as_ref().map_or(true, SearchFilter::is_blank)
            && !self.date_range.as_ref().is_some_and(DateRange::is_active)
            && self.category.as_ref().map_or(true, CategoryFilter::is_blank)
            && self.sort.is_none()
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Checks the query against the caller contract.
    ///
    /// `schema` lists the fields the records expose; declared
    /// [`known_fields`](Self::known_fields) override it. With neither, field
    /// names are not checked.
    pub fn validate(&self, schema: Option<&[&str]>) -> Result<()> {
        if self.page.size == 0 {
            return Err(QueryError::InvalidPageSize);
        }

        if let Some(search) = &self.search {
            if !search.is_blank() && search.fields.is_empty() {
                return Err(QueryError::NoSearchFields {
                    term: search.term.clone(),
                });
            }
        }

        let is_known = |field: &str| -> bool {
            match (&self.known_fields, schema) {
                (Some(known), _) => known.iter().any(|k| k == field),
                (None, Some(names)) => names.iter().any(|n| *n == field),
                (None, None) => true,
            }
        };
        let check = |field: &str, clause: &'static str| -> Result<()> {
            if is_known(field) {
                Ok(())
            } else {
                Err(QueryError::UnknownField {
                    field: field.to_string(),
                    clause,
                })
            }
        };

        if let Some(search) = &self.search {
            for field in &search.fields {
                check(field, "search")?;
            }
        }
        if let Some(range) = &self.date_range {
            check(&range.field, "date range")?;
        }
        if let Some(category) = &self.category {
            check(&category.field, "category")?;
        }
        if let Some(sort) = &self.sort {
            check(&sort.field, "sort")?;
        }
        Ok(())
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Returns `true` if `item` passes the search, date and category filters.
    pub fn matches<T, F>(&self, item: &T, accessor: F) -> bool
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        let needle = self.search.as_ref().and_then(SearchFilter::needle);
        self.matches_with_needle(item, &accessor, needle.as_deref())
    }

    fn matches_with_needle<T, F>(&self, item: &T, accessor: &F, needle: Option<&str>) -> bool
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        if let (Some(needle), Some(search)) = (needle, &self.search) {
            let found = search
                .fields
                .iter()
                .any(|field| contains_ci(&accessor(item, field), needle));
            if !found {
                return false;
            }
        }

        if let Some(range) = self.date_range.as_ref().filter(|r| r.is_active()) {
            match accessor(item, &range.field).as_date() {
                Some(day) if range.contains(day) => {}
                _ => return false,
            }
        }

        if let Some(category) = self.category.as_ref().filter(|c| !c.is_blank()) {
            if !category.matches(&accessor(item, &category.field)) {
                return false;
            }
        }

        true
    }

    fn filter_and_sort<'a, T, F>(&self, items: &'a [T], accessor: &F) -> Vec<&'a T>
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        let needle = self.search.as_ref().and_then(SearchFilter::needle);
        let mut results: Vec<&'a T> = items
            .iter()
            .filter(|item| self.matches_with_needle(*item, accessor, needle.as_deref()))
            .collect();

        // sort_by is stable, equal keys keep their filtered order
        if let Some(sort) = &self.sort {
            results.sort_by(|a, b| {
                sort.compare(&accessor(*a, &sort.field), &accessor(*b, &sort.field))
            });
        }

        results
    }

    /// Filters and sorts `items` without paginating.
    ///
    /// This is the full result the pages are cut from, e.g. for export.
    pub fn matching_with<'a, T, F>(&self, items: &'a [T], accessor: F) -> Result<Vec<&'a T>>
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        self.validate(None)?;
        Ok(self.filter_and_sort(items, &accessor))
    }

    /// Filters and sorts records without paginating.
    pub fn matching<'a, T: Record>(&self, items: &'a [T]) -> Result<Vec<&'a T>> {
        self.validate(T::field_names())?;
        Ok(self.filter_and_sort(items, &T::accessor))
    }

    /// Runs the full pipeline with a caller-supplied accessor.
    pub fn execute_with<'a, T, F>(&self, items: &'a [T], accessor: F) -> Result<ListPage<'a, T>>
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        let matching = self.matching_with(items, accessor)?;
        Ok(paginate(matching, self.page))
    }

    /// Runs the full pipeline over records.
    pub fn execute<'a, T: Record>(&self, items: &'a [T]) -> Result<ListPage<'a, T>> {
        let matching = self.matching(items)?;
        Ok(paginate(matching, self.page))
    }

    /// Counts the records passing the filters.
    pub fn count<T: Record>(&self, items: &[T]) -> Result<usize> {
        self.validate(T::field_names())?;
        let needle = self.search.as_ref().and_then(SearchFilter::needle);
        Ok(items
            .iter()
            .filter(|item| self.matches_with_needle(*item, &T::accessor, needle.as_deref()))
            .count())
    }
}

/// Runs `query` over `records`.
///
/// Shorthand for [`ListQuery::execute`].
pub fn execute<'a, T: Record>(records: &'a [T], query: &ListQuery) -> Result<ListPage<'a, T>> {
    query.execute(records)
}

/// Runs `query` over `records` with a caller-supplied field accessor.
///
/// Shorthand for [`ListQuery::execute_with`].
pub fn execute_with<'a, T, F>(
    records: &'a [T],
    query: &ListQuery,
    accessor: F,
) -> Result<ListPage<'a, T>>
where
    for<'b> F: Fn(&'b T, &str) -> Value<'b>,
{
    query.execute_with(records, accessor)
}
