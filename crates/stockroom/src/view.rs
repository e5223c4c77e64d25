//! A list screen's view of one collection.

use serde_json::Value as Json;
use stockroom_query::{ListPage, ListQuery, QueryError, Record};
use thiserror::Error;
use tracing::debug;

use crate::source::{RecordSource, SourceError};

#[derive(Debug, Error)]
pub enum ViewError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Query(#[from] QueryError),
}

/// Caches the collection fetched from a [`RecordSource`].
///
/// The first read fetches, later reads reuse the cached records until a
/// create or update goes through the view, which drops the cache so the next
/// read fetches again.
pub struct RecordView<S: RecordSource> {
    source: S,
    cache: Option<Vec<S::Item>>,
}

impl<S: RecordSource> RecordView<S> {
    pub fn new(source: S) -> Self {
        RecordView {
            source,
            cache: None,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn is_cached(&self) -> bool {
        self.cache.is_some()
    }

    /// The whole collection, fetched on first use.
    pub fn records(&mut self) -> Result<&[S::Item], SourceError> {
        if self.cache.is_none() {
            let records = self.source.fetch_all()?;
            debug!(count = records.len(), "view cache filled");
            self.cache = Some(records);
        }
        Ok(self.cache.as_deref().unwrap_or_default())
    }

    /// Runs `query` over the cached collection.
    pub fn list(&mut self, query: &ListQuery) -> Result<ListPage<'_, S::Item>, ViewError>
    where
        S::Item: Record,
    {
        let records = self.records()?;
        Ok(query.execute(records)?)
    }

    pub fn create(&mut self, data: Json) -> Result<S::Item, SourceError> {
        let item = self.source.create(data)?;
        self.invalidate();
        Ok(item)
    }

    pub fn update(&mut self, id: &str, data: Json) -> Result<S::Item, SourceError> {
        let item = self.source.update(id, data)?;
        self.invalidate();
        Ok(item)
    }

    /// Drops the cached collection.
    pub fn invalidate(&mut self) {
        if self.cache.take().is_some() {
            debug!("view cache invalidated");
        }
    }
}
