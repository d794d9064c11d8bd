use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::utils::{null_as_default, time::iso_millis_opt};

pub const DEFAULT_STATUS: &str = "Active";

/// One job advertisement. Field names on the wire follow the JSON shape
/// existing clients already send and read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Posting {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub profile: Option<String>,
    #[serde(default, rename = "desc")]
    pub description: Option<String>,
    #[serde(default, rename = "exp", deserialize_with = "null_as_default")]
    pub experience_years: u32,
    #[serde(default, rename = "techs")]
    pub technologies: Option<Vec<String>>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, rename = "type")]
    pub employment_type: Option<String>,
    #[serde(default)]
    pub salary: Option<String>,
    #[serde(default)]
    pub requirements: Option<String>,
    #[serde(default)]
    pub benefits: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default, with = "iso_millis_opt")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub application_deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "applications", deserialize_with = "null_as_default")]
    pub application_count: u32,
    #[serde(default, rename = "views", deserialize_with = "null_as_default")]
    pub view_count: u32,
    #[serde(default, with = "iso_millis_opt")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub posted_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub employer_id: Option<String>,
}

impl Posting {
    /// Whether the posting carries a usable id; blank ids count as unset.
    pub fn has_id(&self) -> bool {
        self.id.as_deref().is_some_and(|id| !id.trim().is_empty())
    }

    /// Free-text fields covered by search, in a fixed order.
    pub fn indexed_text(&self) -> impl Iterator<Item = &str> {
        [
            self.profile.as_deref(),
            self.description.as_deref(),
            self.company.as_deref(),
            self.location.as_deref(),
            self.employment_type.as_deref(),
            self.requirements.as_deref(),
            self.benefits.as_deref(),
        ]
        .into_iter()
        .flatten()
        .chain(self.technologies.iter().flatten().map(String::as_str))
    }

    /// The indexed fields joined into one document, as persisted for search.
    pub fn search_document(&self) -> String {
        self.indexed_text().collect::<Vec<_>>().join(" ")
    }
}
