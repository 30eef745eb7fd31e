use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Classification tags attached to an evidence bullet. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulletTags {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criterion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl BulletTags {
    /// Present tag values in declaration order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        [
            &self.criterion,
            &self.tool,
            &self.evidence_type,
            &self.metric,
            &self.domain,
            &self.link,
        ]
        .into_iter()
        .filter_map(|v| v.as_deref())
    }

    /// `evidenceType == "result"` with a metric attached.
    pub fn is_quantified_result(&self) -> bool {
        self.evidence_type.as_deref() == Some("result") && self.metric.is_some()
    }
}

/// An atomic evidence statement describing one candidate accomplishment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub id: Uuid,
    pub text: String,
    #[serde(default)]
    pub tags: BulletTags,
}

/// Row shape of `evidence_bullets`. Tags are stored as JSONB.
#[derive(Debug, Clone, FromRow)]
pub struct EvidenceBulletRow {
    pub id: Uuid,
    pub text: String,
    pub tags: Value,
}

impl EvidenceBulletRow {
    pub fn into_bullet(self) -> Result<Bullet, serde_json::Error> {
        let tags = if self.tags.is_null() {
            BulletTags::default()
        } else {
            serde_json::from_value(self.tags)?
        };
        Ok(Bullet {
            id: self.id,
            text: self.text,
            tags,
        })
    }
}
