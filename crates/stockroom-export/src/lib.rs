//! Export of record listings to CSV, JSON and YAML.
//!
//! The list screens offer a download of whatever the current filters and sort
//! select. [`Exporter`] turns an ordered slice of serializable records into
//! one of the supported formats, optionally restricted to a set of
//! [`Column`]s, and [`ExportDestination`] writes the result out.
//!
//! ```rust
//! use serde::Serialize;
//! use stockroom_export::{ExportFormat, Exporter};
//!
//! #[derive(Serialize)]
//! #[serde(rename_all = "camelCase")]
//! struct Order {
//!     product_name: String,
//!     order_value: f64,
//! }
//!
//! let orders = vec![
//!     Order { product_name: "Rice".into(), order_value: 120.0 },
//!     Order { product_name: "Oil, 5L".into(), order_value: 42.5 },
//! ];
//!
//! let csv = Exporter::new(ExportFormat::Csv)
//!     .column("Product", "productName")
//!     .column("Value", "orderValue")
//!     .render(&orders)
//!     .unwrap();
//!
//! assert_eq!(csv, "Product,Value\nRice,120.0\n\"Oil, 5L\",42.5\n");
//! ```

mod destination;
mod error;
mod exporter;
mod format;

pub use destination::ExportDestination;
pub use error::ExportError;
pub use exporter::{Column, Exporter};
pub use format::ExportFormat;
