//! Stockroom - inventory, order and sales listings.
//!
//! The library half of the `stockroom` command. It holds the record models of
//! the inventory backend, the dashboard figures computed from them, the
//! record sources and the cached view that list screens read through, and the
//! per-view configuration that turns command-line options into a
//! [`stockroom_query::ListQuery`].
//!
//! ```text
//! JsonFileSource -> RecordView (cache) -> ListQuery -> ListPage -> table / JSON / export
//! ```

pub mod config;
pub mod models;
pub mod source;
pub mod summary;
pub mod table;
pub mod view;

pub use config::{Config, ConfigError, ListOptions, RecordKind, ViewConfig, CONFIG_ENV};
pub use models::{LineItem, Order, Party, Product, Sale, Store, Supplier};
pub use source::{JsonFileSource, RecordSource, SourceError};
pub use summary::{
    monthly_totals, CategoryStat, InventorySummary, MonthlyTotal, SalesOverview, StockStatus,
};
pub use view::{RecordView, ViewError};
