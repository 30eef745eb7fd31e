//! Shared test fixtures: a healthcare frontend job and a candidate whose first two
//! bullets match it while the third matches nothing.

use uuid::Uuid;

use crate::models::bullet::{Bullet, BulletTags};
use crate::models::job::{JobRecord, JobRequirements};
use crate::models::profile::{CandidateIdentity, CandidateProfile};
use crate::tailor::memory::InMemoryStore;

pub fn make_job() -> JobRecord {
    JobRecord {
        id: Uuid::new_v4(),
        title: "Senior Frontend Engineer".to_string(),
        organization: "MediCore".to_string(),
        requirements: JobRequirements {
            must_have: vec![
                "React".to_string(),
                "TypeScript".to_string(),
                "5+ years experience".to_string(),
            ],
            preferred: vec!["Healthcare domain".to_string(), "Team leadership".to_string()],
        },
    }
}

pub fn make_profile() -> CandidateProfile {
    CandidateProfile {
        candidate_id: Uuid::new_v4(),
        identity: CandidateIdentity {
            display_name: "Jordan Rivera".to_string(),
            email: "jordan@example.com".to_string(),
        },
        bullets: vec![
            Bullet {
                id: Uuid::new_v4(),
                text: "Led a team of 8 engineers to deliver a React-based healthcare application"
                    .to_string(),
                tags: BulletTags {
                    criterion: Some("Team Leadership".to_string()),
                    tool: Some("React".to_string()),
                    evidence_type: Some("result".to_string()),
                    metric: Some("8 engineers".to_string()),
                    domain: Some("Healthcare".to_string()),
                    link: None,
                },
            },
            Bullet {
                id: Uuid::new_v4(),
                text: "Built advanced TypeScript components with 95% test coverage".to_string(),
                tags: BulletTags {
                    criterion: Some("TypeScript".to_string()),
                    tool: Some("TypeScript".to_string()),
                    evidence_type: Some("result".to_string()),
                    metric: Some("95% coverage".to_string()),
                    ..Default::default()
                },
            },
            Bullet {
                id: Uuid::new_v4(),
                text: "Organized the office charity bake sale".to_string(),
                tags: BulletTags::default(),
            },
        ],
    }
}

/// Store holding one job and one matching profile. Returns `(store, job_id, candidate_id)`.
pub async fn seeded_store() -> (InMemoryStore, Uuid, Uuid) {
    let store = InMemoryStore::new();
    let job = make_job();
    let profile = make_profile();
    let ids = (job.id, profile.candidate_id);
    store.insert_job(job).await;
    store.insert_profile(profile).await;
    (store, ids.0, ids.1)
}
