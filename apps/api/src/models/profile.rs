use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::bullet::Bullet;

/// The parts of a candidate's identity that appear in generated documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateIdentity {
    pub display_name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub candidate_id: Uuid,
    pub identity: CandidateIdentity,
    pub bullets: Vec<Bullet>,
}

#[derive(Debug, Clone, FromRow)]
pub struct CandidateProfileRow {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
}
