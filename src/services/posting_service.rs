use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::error::{Error, Result};
use crate::models::posting::{Posting, DEFAULT_STATUS};
use crate::store::PostingStore;
use crate::utils::time;

#[derive(Clone)]
pub struct PostingService {
    store: Arc<dyn PostingStore>,
    timeout: Duration,
}

impl PostingService {
    pub fn new(store: Arc<dyn PostingStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    pub async fn create(&self, mut candidate: Posting) -> Result<Posting> {
        info!(
            profile = ?candidate.profile,
            company = ?candidate.company,
            location = ?candidate.location,
            exp = candidate.experience_years,
            techs = ?candidate.technologies,
            contact_email = ?candidate.contact_email,
            application_deadline = ?candidate.application_deadline,
            "Received job posting request"
        );

        if !candidate.has_id() {
            candidate.id = None;
            candidate.posted_date = Some(time::now());
            candidate.status = Some(DEFAULT_STATUS.to_string());
            candidate.application_count = 0;
            candidate.view_count = 0;
        }

        let saved = self.bounded(self.store.insert(candidate)).await?;
        info!(id = ?saved.id, "Job posting saved");
        Ok(saved)
    }

    pub async fn list_all(&self) -> Result<Vec<Posting>> {
        self.bounded(self.store.list_all()).await
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Posting>> {
        self.bounded(self.store.search_by_text(query)).await
    }

    async fn bounded<T>(&self, call: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| Error::StoreTimeout(self.timeout))?
    }
}
