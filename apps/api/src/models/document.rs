use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;

/// Version stamped into the metadata of every generated document.
pub const DOCUMENT_VERSION: &str = "1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Resume,
    CoverLetter,
    Email,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Resume => "resume",
            DocumentType::CoverLetter => "cover_letter",
            DocumentType::Email => "email",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "resume" => Ok(DocumentType::Resume),
            "cover_letter" => Ok(DocumentType::CoverLetter),
            "email" => Ok(DocumentType::Email),
            other => Err(AppError::UnsupportedDocumentType(other.to_string())),
        }
    }
}

// Non-default tones only arrive through request bodies
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    #[default]
    Professional,
    Casual,
    Enthusiastic,
}

/// Caller preferences. Accepted and recorded, but template wording does not vary with them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TailorPreferences {
    #[serde(default)]
    pub tone: Tone,
    #[serde(default)]
    pub length: Option<String>,
    #[serde(default)]
    pub focus: Option<String>,
}

/// Links one generated document back to one source bullet. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub id: Uuid,
    pub bullet_id: Uuid,
    pub text: String,
    pub criterion: String,
    pub evidence_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailoredDocument {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub content: String,
    pub citations: Vec<Citation>,
    pub metadata: DocumentMetadata,
}

#[derive(Debug, Clone, FromRow)]
pub struct TailoredDocumentRow {
    pub id: Uuid,
    pub doc_type: String,
    pub content: String,
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    pub version: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct CitationRow {
    pub id: Uuid,
    pub document_id: Uuid,
    pub bullet_id: Uuid,
    pub text: String,
    pub criterion: String,
    pub evidence_type: String,
    pub link: Option<String>,
}

impl From<CitationRow> for Citation {
    fn from(row: CitationRow) -> Self {
        Citation {
            id: row.id,
            bullet_id: row.bullet_id,
            text: row.text,
            criterion: row.criterion,
            evidence_type: row.evidence_type,
            link: row.link,
        }
    }
}

impl TailoredDocumentRow {
    /// Reassembles a stored document. Citations must already be in position order.
    pub fn into_document(self, citations: Vec<Citation>) -> Result<TailoredDocument, AppError> {
        let doc_type = self.doc_type.parse::<DocumentType>()?;
        Ok(TailoredDocument {
            id: self.id,
            doc_type,
            content: self.content,
            citations,
            metadata: DocumentMetadata {
                job_id: self.job_id,
                candidate_id: self.candidate_id,
                created_at: self.created_at,
                version: self.version,
            },
        })
    }
}
