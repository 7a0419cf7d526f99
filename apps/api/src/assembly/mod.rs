//! Document Assemblers: pure mappings from an import result plus the signed-in
//! identity to the two renderer-ready models.
//!
//! Both must produce a usable model with no import at all; that path falls back
//! to an identity-only document.

pub mod handlers;
pub mod portfolio;
pub mod resume;
pub mod skills;

/// Number of leading skills named in a generated summary.
const SUMMARY_SKILL_COUNT: usize = 3;

/// "Experienced developer with expertise in A, B, C and other modern technologies."
/// `None` when there are no skills to name.
fn expertise_sentence(skills: &[String]) -> Option<String> {
    if skills.is_empty() {
        return None;
    }
    let lead = skills
        .iter()
        .take(SUMMARY_SKILL_COUNT)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    Some(format!(
        "Experienced developer with expertise in {lead} and other modern technologies."
    ))
}
