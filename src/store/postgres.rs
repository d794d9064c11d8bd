use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use super::text_index::tokenize;
use super::{new_posting_id, PostingStore};
use crate::error::{Error, Result};
use crate::models::posting::Posting;

const POSTING_COLUMNS: &str = "id, profile, description, exp, techs, company, location, \
     employment_type, salary, requirements, benefits, contact_email, application_deadline, \
     status, applications, views, posted_date, employer_id";

#[derive(Debug, FromRow)]
struct PostingRow {
    id: String,
    profile: Option<String>,
    description: Option<String>,
    exp: i64,
    techs: Option<Vec<String>>,
    company: Option<String>,
    location: Option<String>,
    employment_type: Option<String>,
    salary: Option<String>,
    requirements: Option<String>,
    benefits: Option<String>,
    contact_email: Option<String>,
    application_deadline: Option<DateTime<Utc>>,
    status: Option<String>,
    applications: i64,
    views: i64,
    posted_date: Option<DateTime<Utc>>,
    employer_id: Option<String>,
}

fn counter(name: &str, value: i64) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| Error::StoreUnavailable(format!("stored {} out of range: {}", name, value)))
}

impl TryFrom<PostingRow> for Posting {
    type Error = Error;

    fn try_from(row: PostingRow) -> Result<Self> {
        Ok(Self {
            id: Some(row.id),
            profile: row.profile,
            description: row.description,
            experience_years: counter("exp", row.exp)?,
            technologies: row.techs,
            company: row.company,
            location: row.location,
            employment_type: row.employment_type,
            salary: row.salary,
            requirements: row.requirements,
            benefits: row.benefits,
            contact_email: row.contact_email,
            application_deadline: row.application_deadline,
            status: row.status,
            application_count: counter("applications", row.applications)?,
            view_count: counter("views", row.views)?,
            posted_date: row.posted_date,
            employer_id: row.employer_id,
        })
    }
}

fn into_postings(rows: Vec<PostingRow>) -> Result<Vec<Posting>> {
    rows.into_iter().map(Posting::try_from).collect()
}

/// The indexed text reduced to the same terms the in-memory index uses, so
/// Postgres' parser never sees punctuation it would fold into one lexeme.
pub fn search_terms(posting: &Posting) -> String {
    tokenize(&posting.search_document()).join(" ")
}

/// Builds an OR-of-prefixes `tsquery`; `None` when the text has no terms.
pub fn to_prefix_tsquery(text: &str) -> Option<String> {
    let terms = tokenize(text);
    if terms.is_empty() {
        return None;
    }
    Some(
        terms
            .iter()
            .map(|term| format!("{}:*", term))
            .collect::<Vec<_>>()
            .join(" | "),
    )
}

/// Postgres-backed store using a `tsvector` index for search.
#[derive(Clone)]
pub struct PgPostingStore {
    pool: PgPool,
}

impl PgPostingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl PostingStore for PgPostingStore {
    async fn insert(&self, posting: Posting) -> Result<Posting> {
        let id = posting
            .id
            .clone()
            .filter(|_| posting.has_id())
            .unwrap_or_else(new_posting_id);
        let search_text = search_terms(&posting);

        let sql = format!(
            r#"
            INSERT INTO postings (
                id, profile, description, exp, techs, company, location,
                employment_type, salary, requirements, benefits, contact_email,
                application_deadline, status, applications, views, posted_date,
                employer_id, search_text
            ) VALUES (
                $1,$2,$3,$4,$5,$6,$7,
                $8,$9,$10,$11,$12,
                $13,$14,$15,$16,$17,
                $18,$19
            )
            RETURNING {}
            "#,
            POSTING_COLUMNS
        );

        let row = sqlx::query_as::<_, PostingRow>(&sql)
            .bind(id)
            .bind(posting.profile)
            .bind(posting.description)
            .bind(i64::from(posting.experience_years))
            .bind(posting.technologies)
            .bind(posting.company)
            .bind(posting.location)
            .bind(posting.employment_type)
            .bind(posting.salary)
            .bind(posting.requirements)
            .bind(posting.benefits)
            .bind(posting.contact_email)
            .bind(posting.application_deadline)
            .bind(posting.status)
            .bind(i64::from(posting.application_count))
            .bind(i64::from(posting.view_count))
            .bind(posting.posted_date)
            .bind(posting.employer_id)
            .bind(search_text)
            .fetch_one(&self.pool)
            .await?;

        row.try_into()
    }

    async fn list_all(&self) -> Result<Vec<Posting>> {
        let sql = format!("SELECT {} FROM postings ORDER BY seq", POSTING_COLUMNS);
        let rows = sqlx::query_as::<_, PostingRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        into_postings(rows)
    }

    async fn search_by_text(&self, query: &str) -> Result<Vec<Posting>> {
        let Some(tsquery) = to_prefix_tsquery(query) else {
            return Ok(Vec::new());
        };

        let sql = format!(
            r#"
            SELECT {}
            FROM postings
            WHERE to_tsvector('simple', search_text) @@ to_tsquery('simple', $1)
            ORDER BY ts_rank(to_tsvector('simple', search_text), to_tsquery('simple', $1)) DESC, seq
            "#,
            POSTING_COLUMNS
        );
        let rows = sqlx::query_as::<_, PostingRow>(&sql)
            .bind(tsquery)
            .fetch_all(&self.pool)
            .await?;
        into_postings(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_prefix_tsquery() {
        assert_eq!(
            to_prefix_tsquery("Backend Engineer").as_deref(),
            Some("backend:* | engineer:*")
        );
        assert_eq!(to_prefix_tsquery("C++ & 'Go'").as_deref(), Some("c:* | go:*"));
        assert_eq!(to_prefix_tsquery(" !! "), None);
    }

    #[test]
    fn search_terms_split_dotted_names() {
        let posting = Posting {
            profile: Some("Frontend Developer".into()),
            technologies: Some(vec!["Node.js".into(), "Vue.js".into()]),
            ..Default::default()
        };
        assert_eq!(search_terms(&posting), "frontend developer node js vue js");
    }
}
