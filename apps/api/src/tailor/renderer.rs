//! Document Renderer: fills fixed section templates from a job, a candidate
//! identity, and the ranked bullets produced by the relevance selector.
//!
//! Output is deterministic for identical inputs. Preferences are accepted so the
//! call shape stays stable, but no template branches on them.

use tracing::debug;

use crate::models::document::{DocumentType, TailorPreferences};
use crate::models::job::JobRecord;
use crate::models::profile::CandidateIdentity;
use crate::tailor::relevance::ScoredBullet;

pub const SECTION_PROFESSIONAL_SUMMARY: &str = "Professional Summary";
pub const SECTION_KEY_ACHIEVEMENTS: &str = "Key Achievements";
pub const SECTION_TECHNICAL_SKILLS: &str = "Technical Skills";
pub const SECTION_EXPERIENCE_HIGHLIGHTS: &str = "Experience Highlights";
pub const SECTION_GREAT_FIT: &str = "Why I'm a Great Fit";
pub const SECTION_QUICK_HIGHLIGHTS: &str = "Quick Highlights";
pub const COVER_LETTER_SALUTATION: &str = "Dear Hiring Manager,";

const KEY_SKILL_COUNT: usize = 3;
const RESUME_ACHIEVEMENT_LIMIT: usize = 6;
const COVER_LETTER_BULLET_LIMIT: usize = 3;
const EMAIL_HIGHLIGHT_LIMIT: usize = 2;

const SKILLS_FALLBACK: &str = "delivering high-quality solutions";
const REQUIREMENT_FALLBACK: &str = "relevant experience";

const LEADERSHIP_MARKERS: &[&str] = &["led", "managed"];
const INNOVATION_MARKERS: &[&str] = &["innovative", "improved", "optimized"];
const COLLABORATION_MARKERS: &[&str] = &["team", "collaborat", "cross-functional"];

/// Renders one document of the requested type.
pub fn render_document(
    doc_type: DocumentType,
    job: &JobRecord,
    identity: &CandidateIdentity,
    ranked: &[ScoredBullet],
    preferences: &TailorPreferences,
) -> String {
    debug!(
        "Rendering {} with {} bullets (tone={:?}, length={:?}, focus={:?})",
        doc_type,
        ranked.len(),
        preferences.tone,
        preferences.length,
        preferences.focus
    );

    match doc_type {
        DocumentType::Resume => render_resume(job, identity, ranked),
        DocumentType::CoverLetter => render_cover_letter(job, ranked),
        DocumentType::Email => render_email(job, ranked),
    }
}

/// Distinct `tags.tool` values in ranked order.
pub fn extract_tools(ranked: &[ScoredBullet]) -> Vec<&str> {
    let mut tools: Vec<&str> = Vec::new();
    for tool in ranked.iter().filter_map(|sb| sb.bullet.tags.tool.as_deref()) {
        if !tools.contains(&tool) {
            tools.push(tool);
        }
    }
    tools
}

fn key_skills_phrase(tools: &[&str]) -> String {
    if tools.is_empty() {
        return SKILLS_FALLBACK.to_string();
    }
    tools
        .iter()
        .take(KEY_SKILL_COUNT)
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
}

fn first_where<'a>(
    ranked: &'a [ScoredBullet],
    predicate: impl Fn(&ScoredBullet) -> bool,
) -> Option<&'a ScoredBullet> {
    ranked.iter().find(|sb| predicate(*sb))
}

fn is_result(sb: &ScoredBullet) -> bool {
    sb.bullet.tags.evidence_type.as_deref() == Some("result")
}

fn text_contains_any(sb: &ScoredBullet, markers: &[&str]) -> bool {
    let text = sb.bullet.text.to_lowercase();
    markers.iter().any(|m| text.contains(m))
}

fn is_leadership(sb: &ScoredBullet) -> bool {
    text_contains_any(sb, LEADERSHIP_MARKERS)
        || sb
            .bullet
            .tags
            .criterion
            .as_deref()
            .map(|c| c.to_lowercase().contains("leadership"))
            .unwrap_or(false)
}

fn has_metric(sb: &ScoredBullet) -> bool {
    sb.bullet
        .tags
        .metric
        .as_deref()
        .map(|m| !m.trim().is_empty())
        .unwrap_or(false)
}

/// First job requirement (must-have, then preferred) found in the bullet text.
fn best_matching_requirement<'a>(sb: &ScoredBullet, job: &'a JobRecord) -> &'a str {
    let text = sb.bullet.text.to_lowercase();
    job.requirements
        .all()
        .find(|r| text.contains(&r.to_lowercase()))
        .map(String::as_str)
        .unwrap_or(REQUIREMENT_FALLBACK)
}

// ────────────────────────────────────────────────────────────────────────────
// Resume
// ────────────────────────────────────────────────────────────────────────────

fn render_resume(job: &JobRecord, identity: &CandidateIdentity, ranked: &[ScoredBullet]) -> String {
    let tools = extract_tools(ranked);

    let mut doc = format!("# {}\n{}\n\n", identity.display_name, identity.email);

    doc.push_str(&format!("## {SECTION_PROFESSIONAL_SUMMARY}\n"));
    doc.push_str(&format!(
        "Results-driven professional with proven expertise in {}. \
         Track record of turning complex requirements into measurable outcomes, \
         ready to contribute to {}'s success.\n\n",
        key_skills_phrase(&tools),
        job.organization
    ));

    doc.push_str(&format!("## {SECTION_KEY_ACHIEVEMENTS}\n"));
    for sb in ranked.iter().take(RESUME_ACHIEVEMENT_LIMIT) {
        doc.push_str(&format!("• {}\n", sb.bullet.text));
    }
    doc.push('\n');

    doc.push_str(&format!("## {SECTION_TECHNICAL_SKILLS}\n"));
    doc.push_str(&tools.join(" • "));
    doc.push_str("\n\n");

    doc.push_str(&format!("## {SECTION_EXPERIENCE_HIGHLIGHTS}\n"));
    let result_line = match first_where(ranked, is_result) {
        Some(sb) => format!("Delivered measurable results: {}", sb.bullet.text),
        None => "Consistently delivered results aligned with business objectives".to_string(),
    };
    let leadership_line = match first_where(ranked, is_leadership) {
        Some(sb) => format!("Demonstrated leadership: {}", sb.bullet.text),
        None => "Collaborated effectively with stakeholders across teams".to_string(),
    };
    let metric_line = match first_where(ranked, has_metric) {
        Some(sb) => format!(
            "Quantified impact: {} ({})",
            sb.bullet.tags.metric.as_deref().unwrap_or_default(),
            sb.bullet.text
        ),
        None => "Drove continuous improvement across key initiatives".to_string(),
    };
    for line in [result_line, leadership_line, metric_line] {
        doc.push_str(&format!("• {line}\n"));
    }

    doc
}

// ────────────────────────────────────────────────────────────────────────────
// Cover letter
// ────────────────────────────────────────────────────────────────────────────

fn render_cover_letter(job: &JobRecord, ranked: &[ScoredBullet]) -> String {
    let tools = extract_tools(ranked);
    let org = &job.organization;

    let mut doc = format!("{COVER_LETTER_SALUTATION}\n\n");
    doc.push_str(&format!(
        "I am excited to apply for the {} position at {}. With expertise in {}, \
         I am confident I can make an immediate contribution to your team.\n\n",
        job.title,
        org,
        key_skills_phrase(&tools)
    ));

    doc.push_str(&format!("{SECTION_GREAT_FIT}\n\n"));
    for sb in ranked.iter().take(COVER_LETTER_BULLET_LIMIT) {
        doc.push_str(&format!("• {}\n", sb.bullet.text));
        doc.push_str(&format!(
            "  This directly addresses your need for {}.\n",
            best_matching_requirement(sb, job)
        ));
    }
    doc.push('\n');

    doc.push_str(&format!("What I Bring to {org}\n\n"));
    let value = match first_where(ranked, is_result) {
        Some(sb) => format!("Proven value: {}", sb.bullet.text),
        None => "Proven value: a consistent record of delivering results that matter".to_string(),
    };
    let innovation = match first_where(ranked, |sb| text_contains_any(sb, INNOVATION_MARKERS)) {
        Some(sb) => format!("Innovation: {}", sb.bullet.text),
        None => "Innovation: a habit of finding better ways to solve familiar problems".to_string(),
    };
    let collaboration =
        match first_where(ranked, |sb| text_contains_any(sb, COLLABORATION_MARKERS)) {
            Some(sb) => format!("Collaboration: {}", sb.bullet.text),
            None => "Collaboration: a track record of working well across functions".to_string(),
        };
    for line in [value, innovation, collaboration] {
        doc.push_str(&format!("• {line}\n"));
    }
    doc.push('\n');

    doc.push_str(&format!(
        "Thank you for considering my application. I would welcome the opportunity \
         to discuss how my background can support {org}'s goals.\n\n"
    ));
    doc.push_str("Sincerely,\n[Your Name]\n");

    doc
}

// ────────────────────────────────────────────────────────────────────────────
// Outreach email
// ────────────────────────────────────────────────────────────────────────────

fn render_email(job: &JobRecord, ranked: &[ScoredBullet]) -> String {
    let tools = extract_tools(ranked);

    let mut doc = format!("Subject: Interest in the {} Role\n\n", job.title);
    doc.push_str("Hi [Hiring Manager's Name],\n\n");
    doc.push_str(&format!(
        "I came across the {} opening at {} and wanted to reach out directly. \
         My background in {} lines up closely with what your team is looking for.\n\n",
        job.title,
        job.organization,
        key_skills_phrase(&tools)
    ));

    doc.push_str(&format!("{SECTION_QUICK_HIGHLIGHTS}:\n"));
    for sb in ranked.iter().take(EMAIL_HIGHLIGHT_LIMIT) {
        doc.push_str(&format!("• {}\n", sb.bullet.text));
    }
    doc.push('\n');

    doc.push_str("Would you be open to a brief call to discuss the role?\n\n");
    doc.push_str("Best regards,\n[Your Name]\n[Your Contact Information]\n");

    doc
}
