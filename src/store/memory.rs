use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use super::text_index::TextIndex;
use super::{new_posting_id, PostingStore};
use crate::error::{Error, Result};
use crate::models::posting::Posting;

#[derive(Debug, Default)]
struct Inner {
    postings: Vec<Posting>,
    ids: HashSet<String>,
    index: TextIndex,
}

/// Process-local store with an embedded text index.
#[derive(Debug, Clone, Default)]
pub struct MemoryPostingStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryPostingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> Error {
    Error::StoreUnavailable("memory store lock poisoned".to_string())
}

#[async_trait]
impl PostingStore for MemoryPostingStore {
    async fn insert(&self, mut posting: Posting) -> Result<Posting> {
        let mut inner = self.inner.write().map_err(poisoned)?;

        if !posting.has_id() {
            posting.id = Some(new_posting_id());
        }
        let id = posting.id.clone().unwrap_or_default();
        if !inner.ids.insert(id.clone()) {
            return Err(Error::WriteRejected(format!(
                "posting with id {} already exists",
                id
            )));
        }

        let position = inner.postings.len();
        inner.index.add(position, posting.indexed_text());
        inner.postings.push(posting.clone());
        Ok(posting)
    }

    async fn list_all(&self) -> Result<Vec<Posting>> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner.postings.clone())
    }

    async fn search_by_text(&self, query: &str) -> Result<Vec<Posting>> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner
            .index
            .search(query)
            .into_iter()
            .filter_map(|position| inner.postings.get(position).cloned())
            .collect())
    }
}
