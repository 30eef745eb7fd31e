use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Requirement lists attached to a job. Either list may be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRequirements {
    #[serde(default)]
    pub must_have: Vec<String>,
    #[serde(default)]
    pub preferred: Vec<String>,
}

impl JobRequirements {
    /// Must-haves followed by preferred, in declared order.
    pub fn all(&self) -> impl Iterator<Item = &String> {
        self.must_have.iter().chain(self.preferred.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.must_have.is_empty() && self.preferred.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: Uuid,
    pub title: String,
    pub organization: String,
    pub requirements: JobRequirements,
}

#[derive(Debug, Clone, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub title: String,
    pub organization: String,
    pub must_have: Vec<String>,
    pub preferred: Vec<String>,
}

impl From<JobRow> for JobRecord {
    fn from(row: JobRow) -> Self {
        JobRecord {
            id: row.id,
            title: row.title,
            organization: row.organization,
            requirements: JobRequirements {
                must_have: row.must_have,
                preferred: row.preferred,
            },
        }
    }
}
