//! Derive macro for Stockroom records.
//!
//! - [`Record`] - Implement `stockroom_query::Record` from field annotations
//!
//! For working examples, see `stockroom-macros/tests/record_derive.rs` and the
//! models in the `stockroom` crate.

mod record;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives the `Record` trait for list-queryable structs.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `Text` | Text field, anything that is `AsRef<str>` |
/// | `Number` | Numeric field, anything `stockroom_query::Number` converts from |
/// | `Date` | Date field, requires a `RecordDate` impl |
/// | `Bool` | Boolean field |
/// | `optional` | The field is an `Option<_>` of the declared type |
/// | `skip` | Exclude this field from queries |
/// | `rename = "..."` | Use a custom name for queries |
///
/// Fields without a `#[record(...)]` attribute are not queryable.
///
/// # Generated Code
///
/// 1. Field name constants (e.g., `Product::NAME`, `Product::BUYING_PRICE`)
/// 2. `FIELDS`, the slice of every queryable name
/// 3. Implementation of `Record::field_value()` and `Record::field_names()`
///
/// # Example
///
/// ```ignore
/// use stockroom_macros::Record;
/// use stockroom_query::{Dir, ListQuery};
///
/// #[derive(Record)]
/// struct Product {
///     #[record(Text, rename = "productId")]
///     product_id: String,
///
///     #[record(Text)]
///     name: String,
///
///     #[record(Number, rename = "buyingPrice")]
///     buying_price: f64,
///
///     #[record(Date, optional, rename = "expiryDate")]
///     expiry_date: Option<chrono::NaiveDate>,
///
///     #[record(skip)]
///     notes: String,
/// }
///
/// let query = ListQuery::new()
///     .search("rice", [Product::NAME, Product::PRODUCT_ID])
///     .sort_by(Product::BUYING_PRICE, Dir::Descending);
/// ```
#[proc_macro_derive(Record, attributes(record))]
pub fn record_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::record_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
