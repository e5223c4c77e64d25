use thiserror::Error;

/// Errors that can occur while exporting records.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no data available for export")]
    Empty,

    #[error("column header '{0}' is used more than once")]
    DuplicateColumn(String),

    #[error("unknown export format '{0}', expected csv, json or yaml")]
    UnknownFormat(String),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),
}
