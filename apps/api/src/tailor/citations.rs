use uuid::Uuid;

use crate::models::document::Citation;
use crate::tailor::relevance::ScoredBullet;

const DEFAULT_CRITERION: &str = "General";
const DEFAULT_EVIDENCE_TYPE: &str = "experience";

/// One citation per ranked bullet, in the same order.
///
/// Citations snapshot the bullet text at generation time; `bullet_id` is a lookup
/// reference only, so later edits to the bullet never change a stored citation.
pub fn build_citations(ranked: &[ScoredBullet]) -> Vec<Citation> {
    ranked
        .iter()
        .map(|sb| {
            let tags = &sb.bullet.tags;
            Citation {
                id: Uuid::new_v4(),
                bullet_id: sb.bullet.id,
                text: sb.bullet.text.clone(),
                criterion: tags
                    .criterion
                    .clone()
                    .unwrap_or_else(|| DEFAULT_CRITERION.to_string()),
                evidence_type: tags
                    .evidence_type
                    .clone()
                    .unwrap_or_else(|| DEFAULT_EVIDENCE_TYPE.to_string()),
                link: tags.link.clone(),
            }
        })
        .collect()
}
