//! Relevance selection: scores evidence bullets against a job's requirement lists.
//!
//! Pure keyword matching, no I/O. The output feeds both the renderer and the
//! citation builder, so they always see the same ranked subset.

use serde::{Deserialize, Serialize};

use crate::models::bullet::Bullet;
use crate::models::job::JobRequirements;

/// Upper bound on bullets returned by a single selection.
pub const MAX_SELECTED_BULLETS: usize = 8;

const TEXT_OR_TAG_MATCH_POINTS: u32 = 10;
const CRITERION_MATCH_POINTS: u32 = 8;
const QUANTIFIED_RESULT_POINTS: u32 = 5;

/// A bullet ranked against one job. Built fresh per call, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredBullet {
    pub bullet: Bullet,
    pub relevance_score: u32,
    pub matched_criteria: Vec<String>,
}

/// Returns up to `MAX_SELECTED_BULLETS` bullets with a positive score, best first.
///
/// Per requirement `r` (lower-cased), per bullet:
/// - `r` in text, or in all tag values joined by a space → +10
/// - criterion contains `r`, or `r` contains criterion → +8
/// - quantified result (`evidenceType == "result"` with a metric) → +5, on every
///   requirement iteration whether or not `r` matched, so it compounds with the
///   number of requirements
///
/// Ties keep input order.
pub fn select_relevant_bullets(
    bullets: &[Bullet],
    requirements: &JobRequirements,
) -> Vec<ScoredBullet> {
    let requirements: Vec<(&String, String)> = requirements
        .all()
        .map(|r| (r, r.to_lowercase()))
        .collect();

    let mut scored: Vec<ScoredBullet> = bullets
        .iter()
        .map(|bullet| score_bullet(bullet, &requirements))
        .filter(|sb| sb.relevance_score > 0)
        .collect();

    // sort_by is stable: equal scores keep input order
    scored.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));
    scored.truncate(MAX_SELECTED_BULLETS);
    scored
}

fn score_bullet(bullet: &Bullet, requirements: &[(&String, String)]) -> ScoredBullet {
    let text = bullet.text.to_lowercase();
    let tag_blob = bullet
        .tags
        .values()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    let criterion = bullet
        .tags
        .criterion
        .as_deref()
        .map(str::to_lowercase)
        .filter(|c| !c.is_empty());
    let quantified = bullet.tags.is_quantified_result();

    let mut relevance_score = 0;
    let mut matched_criteria = Vec::new();

    for (original, req) in requirements {
        if text.contains(req.as_str()) || tag_blob.contains(req.as_str()) {
            relevance_score += TEXT_OR_TAG_MATCH_POINTS;
            matched_criteria.push((*original).clone());
        }

        if let Some(criterion) = &criterion {
            if criterion.contains(req.as_str()) || req.contains(criterion.as_str()) {
                relevance_score += CRITERION_MATCH_POINTS;
                matched_criteria.push((*original).clone());
            }
        }

        // Independent of the two checks above
        if quantified {
            relevance_score += QUANTIFIED_RESULT_POINTS;
        }
    }

    ScoredBullet {
        bullet: bullet.clone(),
        relevance_score,
        matched_criteria,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::bullet::BulletTags;
    use uuid::Uuid;

    fn make_bullet(text: &str, tags: BulletTags) -> Bullet {
        Bullet {
            id: Uuid::new_v4(),
            text: text.to_string(),
            tags,
        }
    }

    fn make_requirements(must_have: &[&str], preferred: &[&str]) -> JobRequirements {
        JobRequirements {
            must_have: must_have.iter().map(|s| s.to_string()).collect(),
            preferred: preferred.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn react_lead_bullet() -> Bullet {
        make_bullet(
            "Led a team of 8 engineers to deliver a React-based healthcare application",
            BulletTags {
                criterion: Some("Team Leadership".to_string()),
                tool: Some("React".to_string()),
                evidence_type: Some("result".to_string()),
                metric: Some("8 engineers".to_string()),
                domain: Some("Healthcare".to_string()),
                link: None,
            },
        )
    }

    fn typescript_bullet() -> Bullet {
        make_bullet(
            "Built advanced TypeScript components with 95% test coverage",
            BulletTags {
                criterion: Some("TypeScript".to_string()),
                tool: Some("TypeScript".to_string()),
                evidence_type: Some("result".to_string()),
                metric: Some("95% coverage".to_string()),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_empty_requirements_select_nothing() {
        let bullets = vec![react_lead_bullet(), typescript_bullet()];
        let result = select_relevant_bullets(&bullets, &JobRequirements::default());
        assert!(result.is_empty());
    }

    #[test]
    fn test_empty_bullets_select_nothing() {
        let reqs = make_requirements(&["React"], &[]);
        assert!(select_relevant_bullets(&[], &reqs).is_empty());
    }

    #[test]
    fn test_react_typescript_scenario_ranks_both() {
        let bullets = vec![react_lead_bullet(), typescript_bullet()];
        let reqs = make_requirements(
            &["React", "TypeScript", "5+ years experience"],
            &["Healthcare domain", "Team leadership"],
        );
        let result = select_relevant_bullets(&bullets, &reqs);

        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|sb| sb.relevance_score > 0));

        // React bullet: "react" in text (+10); "team leadership" in tags (+10) and in
        // criterion (+8); quantified bonus on all five requirements (+25)
        let react = result
            .iter()
            .find(|sb| sb.bullet.id == bullets[0].id)
            .unwrap();
        assert_eq!(react.relevance_score, 53);
        assert_eq!(
            react.matched_criteria,
            vec!["React", "Team leadership", "Team leadership"]
        );

        // TypeScript bullet: text +10, criterion +8, bonus 5 x 5 = 43
        let ts = result
            .iter()
            .find(|sb| sb.bullet.id == bullets[1].id)
            .unwrap();
        assert_eq!(ts.relevance_score, 43);
        assert_eq!(ts.matched_criteria, vec!["TypeScript", "TypeScript"]);

        assert_eq!(result[0].bullet.id, bullets[0].id, "higher score ranks first");
    }

    #[test]
    fn test_quantified_bonus_compounds_per_requirement() {
        let bullet = make_bullet(
            "Cut Rust build times with Kafka batching",
            BulletTags {
                evidence_type: Some("result".to_string()),
                metric: Some("40%".to_string()),
                ..Default::default()
            },
        );
        let reqs = make_requirements(&["rust", "kafka", "golang"], &[]);
        let result = select_relevant_bullets(&[bullet], &reqs);
        // Two text matches (+20) and the bonus on each of three requirements (+15)
        assert_eq!(result[0].relevance_score, 35);
    }

    #[test]
    fn test_quantified_result_is_selected_without_any_keyword_match() {
        let bullet = make_bullet(
            "Cut cloud spend",
            BulletTags {
                evidence_type: Some("result".to_string()),
                metric: Some("30%".to_string()),
                ..Default::default()
            },
        );
        let reqs = make_requirements(&["React", "Go"], &[]);
        let result = select_relevant_bullets(&[bullet], &reqs);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].relevance_score, 10);
        assert!(result[0].matched_criteria.is_empty());
    }

    #[test]
    fn test_result_without_metric_earns_no_bonus() {
        let bullet = make_bullet(
            "Cut cloud spend",
            BulletTags {
                evidence_type: Some("result".to_string()),
                ..Default::default()
            },
        );
        let reqs = make_requirements(&["React", "Go"], &[]);
        assert!(select_relevant_bullets(&[bullet], &reqs).is_empty());
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let bullet = make_bullet("Migrated services to KUBERNETES", BulletTags::default());
        let reqs = make_requirements(&["kubernetes"], &[]);
        let result = select_relevant_bullets(&[bullet], &reqs);
        assert_eq!(result[0].relevance_score, 10);
    }

    #[test]
    fn test_tag_values_are_searched() {
        let bullet = make_bullet(
            "Shipped a claims portal",
            BulletTags {
                domain: Some("Healthcare".to_string()),
                ..Default::default()
            },
        );
        let reqs = make_requirements(&[], &["healthcare"]);
        let result = select_relevant_bullets(&[bullet], &reqs);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].matched_criteria, vec!["healthcare"]);
    }

    #[test]
    fn test_requirement_containing_criterion_matches() {
        let bullet = make_bullet(
            "Mentored four junior developers",
            BulletTags {
                criterion: Some("Mentoring".to_string()),
                ..Default::default()
            },
        );
        let reqs = make_requirements(&["Mentoring and coaching"], &[]);
        let result = select_relevant_bullets(&[bullet], &reqs);
        assert_eq!(result[0].relevance_score, 8);
    }

    #[test]
    fn test_empty_criterion_never_matches() {
        let bullet = make_bullet(
            "Wrote documentation",
            BulletTags {
                criterion: Some(String::new()),
                ..Default::default()
            },
        );
        let reqs = make_requirements(&["Go"], &[]);
        assert!(select_relevant_bullets(&[bullet], &reqs).is_empty());
    }

    #[test]
    fn test_output_capped_and_sorted() {
        let bullets: Vec<_> = (0..20)
            .map(|i| {
                let text = if i % 2 == 0 {
                    "rust and postgres"
                } else {
                    "rust only"
                };
                make_bullet(text, BulletTags::default())
            })
            .collect();
        let reqs = make_requirements(&["rust", "postgres"], &[]);
        let result = select_relevant_bullets(&bullets, &reqs);

        assert_eq!(result.len(), MAX_SELECTED_BULLETS);
        assert!(result
            .windows(2)
            .all(|w| w[0].relevance_score >= w[1].relevance_score));
        assert!(result.iter().all(|sb| sb.relevance_score == 20));
    }

    #[test]
    fn test_ties_keep_input_order() {
        let bullets: Vec<_> = (0..3)
            .map(|i| make_bullet(&format!("python project {i}"), BulletTags::default()))
            .collect();
        let reqs = make_requirements(&["python"], &[]);
        let result = select_relevant_bullets(&bullets, &reqs);
        let ids: Vec<_> = result.iter().map(|sb| sb.bullet.id).collect();
        let expected: Vec<_> = bullets.iter().map(|b| b.id).collect();
        assert_eq!(ids, expected);
    }
}
