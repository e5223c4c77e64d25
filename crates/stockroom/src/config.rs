//! View configuration.
//!
//! Each list screen is a named view: which collection it shows, how many rows
//! per page, which fields the search box, date picker and category selector
//! read, the default sort and the export columns. The built-in views match the
//! dashboard screens; a YAML file can override any of their settings or add
//! new views.
//!
//! ```yaml
//! views:
//!   inventory:
//!     page_size: 20
//!   low-stock:
//!     kind: products
//!     search_fields: [name]
//!     default_sort: { field: quantity, dir: asc }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use stockroom_export::Column;
use stockroom_query::{Dir, ListQuery, SortBy, SortKind};
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "STOCKROOM_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("unknown view '{name}', expected one of: {}", .available.join(", "))]
    UnknownView { name: String, available: Vec<String> },

    #[error("view '{0}' is new and needs a kind")]
    MissingKind(String),

    #[error("view '{0}' has page_size 0")]
    ZeroPageSize(String),

    #[error("view '{view}' has no {setting}, {option} cannot be used")]
    Unsupported {
        view: String,
        setting: &'static str,
        option: &'static str,
    },
}

/// The collection a view lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Products,
    Orders,
    Sales,
    Stores,
    Suppliers,
}

/// Default ordering of a view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    pub field: String,
    #[serde(default)]
    pub dir: Dir,
    #[serde(default)]
    pub kind: SortKind,
}

/// An export column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub header: String,
    pub field: String,
}

/// Settings of one list screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewConfig {
    pub kind: RecordKind,
    pub page_size: usize,
    pub search_fields: Vec<String>,
    pub date_field: Option<String>,
    pub category_field: Option<String>,
    pub default_sort: Option<SortConfig>,
    pub columns: Vec<ColumnConfig>,
    pub id_field: String,
}

/// Filters, sort and page picked on a list screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub search: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub category: Option<String>,
    pub sort: Option<String>,
    pub descending: bool,
    pub page: usize,
    pub per_page: Option<usize>,
}

impl ViewConfig {
    fn new(kind: RecordKind, page_size: usize) -> Self {
        ViewConfig {
            kind,
            page_size,
            search_fields: Vec::new(),
            date_field: None,
            category_field: None,
            default_sort: None,
            columns: Vec::new(),
            id_field: "_id".to_string(),
        }
    }

    fn search(mut self, fields: &[&str]) -> Self {
        self.search_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    fn date(mut self, field: &str) -> Self {
        self.date_field = Some(field.to_string());
        self
    }

    fn category(mut self, field: &str) -> Self {
        self.category_field = Some(field.to_string());
        self
    }

    fn sorted(mut self, field: &str, kind: SortKind) -> Self {
        self.default_sort = Some(SortConfig {
            field: field.to_string(),
            dir: Dir::Ascending,
            kind,
        });
        self
    }

    fn columns(mut self, columns: &[(&str, &str)]) -> Self {
        self.columns = columns
            .iter()
            .map(|(header, field)| ColumnConfig {
                header: header.to_string(),
                field: field.to_string(),
            })
            .collect();
        self
    }

    /// Export columns, empty when every field is exported.
    pub fn export_columns(&self) -> Vec<Column> {
        self.columns
            .iter()
            .map(|c| Column::new(&c.header, &c.field))
            .collect()
    }

    /// Builds the list query for `options` on this view.
    ///
    /// An explicit sort on the view's date field orders by calendar day.
    pub fn list_query(&self, view: &str, options: &ListOptions) -> Result<ListQuery, ConfigError> {
        let unsupported = |setting, option| ConfigError::Unsupported {
            view: view.to_string(),
            setting,
            option,
        };

        let mut query = ListQuery::new().page(options.page, options.per_page.unwrap_or(self.page_size));

        if let Some(term) = &options.search {
            query = query.search(term.as_str(), self.search_fields.iter().cloned());
        }

        if options.from.is_some() || options.to.is_some() {
            let field = self
                .date_field
                .as_deref()
                .ok_or_else(|| unsupported("date_field", "--from/--to"))?;
            query = query.date_range(field, options.from, options.to);
        }

        if let Some(value) = &options.category {
            let field = self
                .category_field
                .as_deref()
                .ok_or_else(|| unsupported("category_field", "--category"))?;
            query = query.category(field, value.as_str());
        }

        let dir = if options.descending {
            Dir::Descending
        } else {
            Dir::Ascending
        };
        match (&options.sort, &self.default_sort) {
            (Some(field), _) => {
                let mut sort = SortBy::new(field.as_str(), dir);
                if self.date_field.as_deref() == Some(field.as_str()) {
                    sort = sort.as_date();
                }
                query = query.sort(sort);
            }
            (None, Some(default)) => {
                let dir = if options.descending { dir } else { default.dir };
                let mut sort = SortBy::new(default.field.as_str(), dir);
                if default.kind == SortKind::Date {
                    sort = sort.as_date();
                }
                query = query.sort(sort);
            }
            (None, None) => {}
        }

        Ok(query.build())
    }
}

/// All configured views by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    pub views: BTreeMap<String, ViewConfig>,
}

impl Default for Config {
    fn default() -> Self {
        let mut views = BTreeMap::new();

        views.insert(
            "inventory".to_string(),
            ViewConfig::new(RecordKind::Products, 8)
                .search(&["name", "productId"])
                .date("updatedAt")
                .category("category")
                .sorted("buyingPrice", SortKind::Natural)
                .columns(&[
                    ("Product ID", "productId"),
                    ("Name", "name"),
                    ("Category", "category"),
                    ("Buying Price", "buyingPrice"),
                    ("Quantity", "quantity"),
                    ("Unit", "unit"),
                    ("Expiry Date", "expiryDate"),
                    ("Threshold", "thresholdValue"),
                ]),
        );
        views.insert(
            "orders".to_string(),
            ViewConfig::new(RecordKind::Orders, 7)
                .search(&["productName", "productId"])
                .date("deliveryDate")
                .category("category")
                .sorted("orderValue", SortKind::Natural)
                .columns(&[
                    ("Product", "productName"),
                    ("Product ID", "productId"),
                    ("Category", "category"),
                    ("Order Value", "orderValue"),
                    ("Quantity", "quantity"),
                    ("Unit", "unit"),
                    ("Buying Price", "buyingPrice"),
                    ("Delivery Date", "deliveryDate"),
                    ("Status", "status"),
                ]),
        );
        views.insert(
            "sales".to_string(),
            ViewConfig::new(RecordKind::Sales, 10)
                .search(&["seller.name", "customer.name"])
                .date("createdAt")
                .sorted("createdAt", SortKind::Date)
                .columns(&[
                    ("Date", "createdAt"),
                    ("Seller", "seller.name"),
                    ("Customer", "customer.name"),
                    ("Total", "totalAmount"),
                ]),
        );
        views.insert(
            "stores".to_string(),
            ViewConfig::new(RecordKind::Stores, 10)
                .search(&["name", "branch"])
                .columns(&[
                    ("Name", "name"),
                    ("Branch", "branch"),
                    ("Address", "address"),
                    ("Contact", "contact"),
                ]),
        );
        views.insert(
            "suppliers".to_string(),
            ViewConfig::new(RecordKind::Suppliers, 8)
                .search(&["supplierName", "ProductName"])
                .category("category")
                .columns(&[
                    ("Supplier Name", "supplierName"),
                    ("Email", "email"),
                    ("Contact", "contact"),
                    ("Product Name", "ProductName"),
                    ("Category", "category"),
                    ("Buying Price", "BuyingPrice"),
                    ("Type", "Type"),
                    ("On the Way", "onTheWay"),
                ]),
        );
        views.insert(
            "reports".to_string(),
            ViewConfig::new(RecordKind::Products, 9)
                .search(&["name"])
                .category("category")
                .sorted("buyingPrice", SortKind::Natural)
                .columns(&[
                    ("Product", "name"),
                    ("Product ID", "productId"),
                    ("Category", "category"),
                    ("Remaining Quantity", "quantity"),
                    ("Buying Price", "buyingPrice"),
                ]),
        );

        Config { views }
    }
}

/// A view as written in the config file. Unset settings keep the built-in
/// value, or the empty default for a new view.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ViewOverride {
    kind: Option<RecordKind>,
    page_size: Option<usize>,
    search_fields: Option<Vec<String>>,
    date_field: Option<String>,
    category_field: Option<String>,
    default_sort: Option<SortConfig>,
    columns: Option<Vec<ColumnConfig>>,
    id_field: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    views: BTreeMap<String, ViewOverride>,
}

impl Config {
    /// Parses YAML and applies it over the built-in views.
    pub fn from_yaml(yaml: &str, path: &Path) -> Result<Self, ConfigError> {
        let mut config = Config::default();
        if yaml.trim().is_empty() {
            return Ok(config);
        }
        let file: ConfigFile = serde_yaml::from_str(yaml).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        for (name, over) in file.views {
            let base = match (config.views.remove(&name), over.kind) {
                (Some(base), Some(kind)) => ViewConfig { kind, ..base },
                (Some(base), None) => base,
                (None, Some(kind)) => ViewConfig::new(kind, stockroom_query::DEFAULT_PAGE_SIZE),
                (None, None) => return Err(ConfigError::MissingKind(name)),
            };
            let view = ViewConfig {
                kind: base.kind,
                page_size: over.page_size.unwrap_or(base.page_size),
                search_fields: over.search_fields.unwrap_or(base.search_fields),
                date_field: over.date_field.or(base.date_field),
                category_field: over.category_field.or(base.category_field),
                default_sort: over.default_sort.or(base.default_sort),
                columns: over.columns.unwrap_or(base.columns),
                id_field: over.id_field.unwrap_or(base.id_field),
            };
            if view.page_size == 0 {
                return Err(ConfigError::ZeroPageSize(name));
            }
            config.views.insert(name, view);
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Config::from_yaml(&yaml, path)?;
        info!(path = %path.display(), views = config.views.len(), "loaded config");
        Ok(config)
    }

    /// Loads the config from `explicit`, else from the file named by
    /// `STOCKROOM_CONFIG`, else returns the built-in views.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let from_env = std::env::var_os(CONFIG_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Config::resolve_with(explicit, from_env.as_deref())
    }

    fn resolve_with(explicit: Option<&Path>, from_env: Option<&Path>) -> Result<Self, ConfigError> {
        match (explicit, from_env) {
            (Some(path), _) => Config::load(path),
            (None, Some(path)) => {
                debug!(path = %path.display(), "config from {}", CONFIG_ENV);
                Config::load(path)
            }
            (None, None) => {
                debug!("using built-in views");
                Ok(Config::default())
            }
        }
    }

    pub fn view(&self, name: &str) -> Result<&ViewConfig, ConfigError> {
        self.views.get(name).ok_or_else(|| ConfigError::UnknownView {
            name: name.to_string(),
            available: self.views.keys().cloned().collect(),
        })
    }
}
