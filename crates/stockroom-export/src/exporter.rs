//! Serialization of record listings.
//!
//! Records are converted to JSON values first, then projected onto the
//! selected columns and written in the target format.

use serde::Serialize;
use serde_json::{Map, Value as Json};

use crate::{ExportDestination, ExportError, ExportFormat};

/// One exported column: the header text and the record field it reads.
///
/// `field` may be a dotted path into nested objects, e.g. `seller.name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub header: String,
    pub field: String,
}

impl Column {
    pub fn new(header: impl Into<String>, field: impl Into<String>) -> Self {
        Column {
            header: header.into(),
            field: field.into(),
        }
    }

    /// A column whose header is the field name itself.
    pub fn field(field: impl Into<String>) -> Self {
        let field = field.into();
        Column {
            header: field.clone(),
            field,
        }
    }
}

/// Renders records in an [`ExportFormat`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Exporter {
    format: ExportFormat,
    columns: Vec<Column>,
}

impl Exporter {
    pub fn new(format: ExportFormat) -> Self {
        Exporter {
            format,
            columns: Vec::new(),
        }
    }

    /// Adds a column. Without any columns every top-level field is exported.
    pub fn column(mut self, header: impl Into<String>, field: impl Into<String>) -> Self {
        self.columns.push(Column::new(header, field));
        self
    }

    pub fn columns(mut self, columns: impl IntoIterator<Item = Column>) -> Self {
        self.columns.extend(columns);
        self
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }

    /// Renders `records` in order.
    ///
    /// # Errors
    ///
    /// [`ExportError::DuplicateColumn`] when two columns share a header,
    /// [`ExportError::Empty`] when there are no records, or a serializer error.
    pub fn render<T: Serialize>(&self, records: &[T]) -> Result<String, ExportError> {
        self.check_headers()?;
        if records.is_empty() {
            return Err(ExportError::Empty);
        }
        let rows = records
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        let rows = self.project(rows);

        match self.format {
            ExportFormat::Csv => self.to_csv(&rows),
            ExportFormat::Json => Ok(serde_json::to_string_pretty(&rows)?),
            ExportFormat::Yaml => Ok(serde_yaml::to_string(&rows)?),
        }
    }

    /// Renders `records` and writes them to `destination`.
    pub fn export<T: Serialize>(
        &self,
        records: &[T],
        destination: &ExportDestination,
    ) -> Result<(), ExportError> {
        let content = self.render(records)?;
        destination.write(&content)?;
        Ok(())
    }

    fn check_headers(&self) -> Result<(), ExportError> {
        for (i, column) in self.columns.iter().enumerate() {
            if self.columns[..i].iter().any(|c| c.header == column.header) {
                return Err(ExportError::DuplicateColumn(column.header.clone()));
            }
        }
        Ok(())
    }

    fn project(&self, rows: Vec<Json>) -> Vec<Json> {
        if self.columns.is_empty() {
            return rows;
        }
        rows.iter()
            .map(|row| {
                let projected: Map<String, Json> = self
                    .columns
                    .iter()
                    .map(|c| {
                        let value = lookup(row, &c.field).cloned().unwrap_or(Json::Null);
                        (c.header.clone(), value)
                    })
                    .collect();
                Json::Object(projected)
            })
            .collect()
    }

    fn to_csv(&self, rows: &[Json]) -> Result<String, ExportError> {
        let mut wtr = csv::Writer::from_writer(vec![]);

        match rows.first() {
            Some(Json::Object(first)) => {
                let headers: Vec<&str> = first.keys().map(String::as_str).collect();
                wtr.write_record(&headers)?;
                for row in rows {
                    let cells: Vec<String> = headers
                        .iter()
                        .map(|h| row.get(*h).map(cell).unwrap_or_default())
                        .collect();
                    wtr.write_record(&cells)?;
                }
            }
            _ => {
                wtr.write_record(["value"])?;
                for row in rows {
                    wtr.write_record([cell(row)])?;
                }
            }
        }

        let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
        Ok(String::from_utf8(bytes)?)
    }
}

/// Finds `field` in an object: the exact key first, then a dotted path.
fn lookup<'a>(row: &'a Json, field: &str) -> Option<&'a Json> {
    let obj = row.as_object()?;
    if let Some(v) = obj.get(field) {
        return Some(v);
    }
    let mut parts = field.split('.');
    let mut current = obj.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

/// Text of a CSV cell. Null is empty, nested values are compact JSON.
fn cell(v: &Json) -> String {
    match v {
        Json::String(s) => s.clone(),
        Json::Null => String::new(),
        other => other.to_string(),
    }
}
