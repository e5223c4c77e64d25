//! Stockroom Query - search, filter, sort and paginate record collections.
//!
//! Every list screen of an inventory dashboard does the same thing with the
//! records it fetched: narrow them by a search box, a date range and a
//! category selector, order them by a column, and show one page. This crate
//! is that pipeline, written once and parameterized by field names.
//!
//! - Records expose fields through the [`Record`] trait or an accessor closure
//! - Text search is case-insensitive over several fields (OR semantics)
//! - Date ranges compare whole days, bounds inclusive, either side optional
//! - Sorting is stable and natural: numeric text sorts as numbers
//! - Page numbers are clamped, an overshoot returns the last page
//!
//! # Quick Start
//!
//! ```rust
//! use stockroom_query::{Dir, ListQuery, Number, Record, Value};
//!
//! struct Product {
//!     name: String,
//!     price: String,
//! }
//!
//! impl Record for Product {
//!     fn field_value(&self, field: &str) -> Value<'_> {
//!         match field {
//!             "name" => Value::Text(&self.name),
//!             "price" => Value::Text(&self.price),
//!             _ => Value::None,
//!         }
//!     }
//! }
//!
//! let products = vec![
//!     Product { name: "Rice".into(), price: "20".into() },
//!     Product { name: "Oil".into(), price: "9".into() },
//!     Product { name: "Salt".into(), price: "100".into() },
//! ];
//!
//! let page = ListQuery::new()
//!     .sort_by("price", Dir::Ascending)
//!     .page(1, 2)
//!     .build()
//!     .execute(&products)
//!     .unwrap();
//!
//! assert_eq!(page.items[0].name, "Oil");
//! assert_eq!(page.items[1].name, "Rice");
//! assert_eq!(page.total_pages, 2);
//! ```
//!
//! # Pipeline
//!
//! ```text
//! records -> search -> date range -> category -> sort -> paginate -> ListPage
//! ```
//!
//! Pagination always runs last. `total_matching` counts records after
//! filtering; `total_pages` is at least one, so an empty result still has a
//! page 1 to show.

mod date;
mod error;
mod filter;
mod json;
mod ordering;
mod page;
mod query;
mod traits;
mod value;

pub use date::{format_date, parse_date, DateRange};
pub use error::{QueryError, Result};
pub use filter::{CategoryFilter, SearchFilter};
pub use json::json_value;
pub use ordering::{compare_keys, Dir, SortBy, SortKind};
pub use page::{ListPage, PageRequest, DEFAULT_PAGE_SIZE};
pub use query::{execute, execute_with, ListQuery};
pub use traits::{Record, RecordDate};
pub use value::{Number, Value};
