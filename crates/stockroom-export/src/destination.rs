use std::io::Write;
use std::path::{Path, PathBuf};

/// Where an export is written.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExportDestination {
    /// Write to standard output
    #[default]
    Stdout,
    /// Write to a specific file, replacing it
    File(PathBuf),
}

impl ExportDestination {
    /// `Stdout` when no path is given.
    pub fn from_path(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => ExportDestination::File(path),
            None => ExportDestination::Stdout,
        }
    }

    pub fn write(&self, content: &str) -> std::io::Result<()> {
        match self {
            ExportDestination::Stdout => {
                let stdout = std::io::stdout();
                let mut handle = stdout.lock();
                handle.write_all(content.as_bytes())?;
                handle.flush()
            }
            ExportDestination::File(path) => {
                validate_path(path)?;
                std::fs::write(path, content)
            }
        }
    }
}

/// The parent directory of `path` must already exist.
fn validate_path(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Parent directory does not exist: {}", parent.display()),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_path() {
        assert_eq!(ExportDestination::from_path(None), ExportDestination::Stdout);
        assert_eq!(
            ExportDestination::from_path(Some("out.csv".into())),
            ExportDestination::File(PathBuf::from("out.csv"))
        );
    }

    #[test]
    fn relative_file_name_has_valid_parent() {
        assert!(validate_path(Path::new("orders.csv")).is_ok());
    }

    #[test]
    fn missing_parent_is_rejected() {
        let err = validate_path(Path::new("/definitely/not/here/orders.csv")).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }
}
