use std::collections::HashSet;

use crate::models::analysis::SkillRecord;

/// Flattens every record's skills then tools, in record order, keeping the first
/// occurrence of each exact (case-sensitive) string.
pub fn aggregate_skills(records: &[SkillRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .flat_map(|record| record.skills.iter().chain(record.tools.iter()))
        .filter(|skill| seen.insert(skill.as_str()))
        .cloned()
        .collect()
}
