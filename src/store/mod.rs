pub mod memory;
pub mod postgres;
pub mod text_index;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::posting::Posting;

pub use memory::MemoryPostingStore;
pub use postgres::PgPostingStore;

/// Durable collection of postings.
///
/// Implementations must be safe to share between request tasks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostingStore: Send + Sync {
    /// Persists `posting`, assigning an id when it has none, and returns the
    /// stored record.
    async fn insert(&self, posting: Posting) -> Result<Posting>;

    /// Every stored posting in insertion order.
    async fn list_all(&self) -> Result<Vec<Posting>>;

    /// Postings whose indexed text matches any term of `query`.
    async fn search_by_text(&self, query: &str) -> Result<Vec<Posting>>;
}

pub fn new_posting_id() -> String {
    Uuid::new_v4().to_string()
}
