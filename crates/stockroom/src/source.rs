//! Record sources: where a view's collection comes from.
//!
//! [`RecordSource`] is the seam between the list screens and the backend.
//! The trait is sync-only. [`JsonFileSource`] keeps a collection as a JSON
//! array in a file, the shape the backend's list endpoints return.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value as Json};
use thiserror::Error;
use tracing::{debug, info};

/// Errors from fetching or storing records.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a JSON array of records: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid record: {0}")]
    InvalidRecord(#[source] serde_json::Error),

    #[error("record data must be a JSON object")]
    NotAnObject,

    #[error("no record with {field} = '{id}'")]
    NotFound { field: String, id: String },

    #[error("a record with {field} = '{id}' already exists")]
    DuplicateId { field: String, id: String },
}

/// A backend that can list, create and update one kind of record.
pub trait RecordSource {
    /// The record type.
    type Item;

    /// Fetches the whole collection in backend order.
    fn fetch_all(&self) -> Result<Vec<Self::Item>, SourceError>;

    /// Creates a record from a JSON object and returns it. A record without
    /// an id is given one.
    fn create(&self, data: Json) -> Result<Self::Item, SourceError>;

    /// Applies the fields of `data` to the record whose id is `id`.
    fn update(&self, id: &str, data: Json) -> Result<Self::Item, SourceError>;
}

/// A collection stored as a JSON array in a file.
///
/// Records are matched for updates by `id_field`, compared as text so that
/// numeric ids work too. Ids are unique within the file: `create` assigns a
/// fresh one when the data has none. A missing file reads as an empty
/// collection.
#[derive(Debug)]
pub struct JsonFileSource<T> {
    path: PathBuf,
    id_field: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for JsonFileSource<T> {
    fn clone(&self) -> Self {
        JsonFileSource {
            path: self.path.clone(),
            id_field: self.id_field.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> JsonFileSource<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileSource {
            path: path.into(),
            id_field: "_id".to_string(),
            _marker: PhantomData,
        }
    }

    /// Sets the field used to find records for updates. Defaults to `_id`.
    pub fn id_field(mut self, field: impl Into<String>) -> Self {
        self.id_field = field.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_raw(&self) -> Result<Vec<Json>, SourceError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "source file missing, treating as empty");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(SourceError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&text).map_err(|source| SourceError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    fn position_of(&self, raw: &[Json], id: &str) -> Option<usize> {
        raw.iter()
            .position(|r| id_text(r.get(&self.id_field)).as_deref() == Some(id))
    }

    fn duplicate(&self, id: String) -> SourceError {
        SourceError::DuplicateId {
            field: self.id_field.clone(),
            id,
        }
    }

    fn write_raw(&self, records: &[Json]) -> Result<(), SourceError> {
        let text = serde_json::to_string_pretty(records).map_err(SourceError::InvalidRecord)?;
        std::fs::write(&self.path, text + "\n").map_err(|source| SourceError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

impl<T> RecordSource for JsonFileSource<T>
where
    T: Serialize + DeserializeOwned,
{
    type Item = T;

    fn fetch_all(&self) -> Result<Vec<T>, SourceError> {
        let raw = self.read_raw()?;
        let records = raw
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<T>, _>>()
            .map_err(|source| SourceError::Malformed {
                path: self.path.clone(),
                source,
            })?;
        info!(path = %self.path.display(), count = records.len(), "fetched records");
        Ok(records)
    }

    fn create(&self, data: Json) -> Result<T, SourceError> {
        let Json::Object(mut data) = data else {
            return Err(SourceError::NotAnObject);
        };

        let mut raw = self.read_raw()?;
        match id_text(data.get(&self.id_field)) {
            Some(id) if self.position_of(&raw, &id).is_some() => {
                return Err(self.duplicate(id));
            }
            Some(_) => {}
            None => {
                let id = next_id(&raw, &self.id_field);
                debug!(id = %id, "assigned id to new record");
                data.insert(self.id_field.clone(), Json::String(id));
            }
        }

        let item: T = serde_json::from_value(Json::Object(data)).map_err(SourceError::InvalidRecord)?;
        let stored = serde_json::to_value(&item).map_err(SourceError::InvalidRecord)?;
        raw.push(stored);
        self.write_raw(&raw)?;
        info!(path = %self.path.display(), count = raw.len(), "created record");
        Ok(item)
    }

    fn update(&self, id: &str, data: Json) -> Result<T, SourceError> {
        let Json::Object(patch) = data else {
            return Err(SourceError::NotAnObject);
        };

        let mut raw = self.read_raw()?;
        let position = self
            .position_of(&raw, id)
            .ok_or_else(|| SourceError::NotFound {
                field: self.id_field.clone(),
                id: id.to_string(),
            })?;
        if let Some(new_id) = id_text(patch.get(&self.id_field)) {
            if new_id != id && self.position_of(&raw, &new_id).is_some() {
                return Err(self.duplicate(new_id));
            }
        }

        let mut merged: Map<String, Json> = match raw[position].take() {
            Json::Object(obj) => obj,
            _ => Map::new(),
        };
        merged.extend(patch);

        let item: T = serde_json::from_value(Json::Object(merged)).map_err(SourceError::InvalidRecord)?;
        raw[position] = serde_json::to_value(&item).map_err(SourceError::InvalidRecord)?;
        self.write_raw(&raw)?;
        info!(path = %self.path.display(), id, "updated record");
        Ok(item)
    }
}

/// A 24-digit hex id: creation time in seconds, then a sequence number that
/// skips ids already in the collection.
fn next_id(raw: &[Json], id_field: &str) -> String {
    let seconds = chrono::Utc::now().timestamp().max(0) as u64;
    let taken: Vec<String> = raw.iter().filter_map(|r| id_text(r.get(id_field))).collect();
    let mut sequence = raw.len() as u64;
    loop {
        let id = format!("{:08x}{:016x}", seconds & 0xffff_ffff, sequence);
        if !taken.contains(&id) {
            return id;
        }
        sequence += 1;
    }
}

fn id_text(value: Option<&Json>) -> Option<String> {
    match value? {
        Json::String(s) => Some(s.clone()),
        Json::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Store {
        #[serde(rename = "_id")]
        id: u32,
        name: String,
    }

    fn source(dir: &TempDir) -> JsonFileSource<Store> {
        JsonFileSource::new(dir.path().join("stores.json"))
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(source(&dir).fetch_all().unwrap().is_empty());
    }

    #[test]
    fn create_then_fetch() {
        let dir = TempDir::new().unwrap();
        let src = source(&dir);
        src.create(json!({"_id": 1, "name": "North"})).unwrap();
        src.create(json!({"_id": 2, "name": "South"})).unwrap();

        let all = src.fetch_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].name, "South");
    }

    #[test]
    fn create_rejects_invalid_data() {
        let dir = TempDir::new().unwrap();
        let src = source(&dir);
        assert!(matches!(
            src.create(json!([1, 2])),
            Err(SourceError::NotAnObject)
        ));
        assert!(matches!(
            src.create(json!({"name": "no id"})),
            Err(SourceError::InvalidRecord(_))
        ));
        assert!(!src.path().exists());
    }

    #[test]
    fn update_by_numeric_id() {
        let dir = TempDir::new().unwrap();
        let src = source(&dir);
        src.create(json!({"_id": 7, "name": "Old"})).unwrap();

        let updated = src.update("7", json!({"name": "New"})).unwrap();
        assert_eq!(updated, Store { id: 7, name: "New".into() });
        assert_eq!(src.fetch_all().unwrap()[0].name, "New");
    }

    #[test]
    fn update_unknown_id() {
        let dir = TempDir::new().unwrap();
        let src = source(&dir);
        src.create(json!({"_id": 1, "name": "North"})).unwrap();
        let err = src.update("9", json!({"name": "x"})).unwrap_err();
        assert!(matches!(err, SourceError::NotFound { ref id, .. } if id == "9"));
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Supplier {
        #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        name: String,
    }

    fn suppliers(dir: &TempDir) -> JsonFileSource<Supplier> {
        JsonFileSource::new(dir.path().join("suppliers.json"))
    }

    #[test]
    fn create_assigns_missing_id() {
        let dir = TempDir::new().unwrap();
        let src = suppliers(&dir);
        let first = src.create(json!({"name": "Acme"})).unwrap();
        let second = src.create(json!({"_id": null, "name": "Globex"})).unwrap();

        let first_id = first.id.expect("assigned id");
        let second_id = second.id.expect("assigned id");
        assert_eq!(first_id.len(), 24);
        assert_ne!(first_id, second_id);

        let updated = src.update(&first_id, json!({"name": "Acme Ltd"})).unwrap();
        assert_eq!(updated.name, "Acme Ltd");
        assert_eq!(src.fetch_all().unwrap()[1].name, "Globex");
    }

    #[test]
    fn create_rejects_duplicate_id() {
        let dir = TempDir::new().unwrap();
        let src = suppliers(&dir);
        src.create(json!({"_id": "s1", "name": "Acme"})).unwrap();

        let err = src.create(json!({"_id": "s1", "name": "Copy"})).unwrap_err();
        assert!(matches!(err, SourceError::DuplicateId { ref id, .. } if id == "s1"));
        assert_eq!(src.fetch_all().unwrap().len(), 1);
    }

    #[test]
    fn duplicate_numeric_id_matches_as_text() {
        let dir = TempDir::new().unwrap();
        let src = source(&dir);
        src.create(json!({"_id": 3, "name": "North"})).unwrap();
        assert!(matches!(
            src.create(json!({"_id": "3", "name": "South"})),
            Err(SourceError::DuplicateId { .. })
        ));
    }

    #[test]
    fn update_rejects_id_taken_by_another_record() {
        let dir = TempDir::new().unwrap();
        let src = suppliers(&dir);
        src.create(json!({"_id": "s1", "name": "Acme"})).unwrap();
        src.create(json!({"_id": "s2", "name": "Globex"})).unwrap();

        let err = src.update("s2", json!({"_id": "s1"})).unwrap_err();
        assert!(matches!(err, SourceError::DuplicateId { ref id, .. } if id == "s1"));
        assert!(src.update("s2", json!({"_id": "s2", "name": "Globex Inc"})).is_ok());
    }

    #[test]
    fn malformed_file() {
        let dir = TempDir::new().unwrap();
        let src = source(&dir);
        std::fs::write(src.path(), "{\"not\": \"an array\"}").unwrap();
        assert!(matches!(src.fetch_all(), Err(SourceError::Malformed { .. })));
    }
}
