use crate::core::{Olympiad, OlympiadFilter};

/// Narrows `olympiads` by text, then grades, then subjects. Every stage is
/// skipped when its criterion is empty, so an empty filter is the identity.
pub fn apply_filter(olympiads: Vec<Olympiad>, filter: &OlympiadFilter) -> Vec<Olympiad> {
    let query = filter.normalized_query().map(str::to_lowercase);

    olympiads
        .into_iter()
        .filter(|o| query.as_deref().map_or(true, |q| matches_query(o, q)))
        .filter(|o| matches_grades(o, &filter.grades))
        .filter(|o| matches_subjects(o, &filter.subject_ids))
        .collect()
}

/// Case-insensitive substring match on name, description and keywords.
/// `needle` must already be lowercase.
pub fn matches_query(olympiad: &Olympiad, needle: &str) -> bool {
    let contains = |text: &str| text.to_lowercase().contains(needle);

    contains(&olympiad.name)
        || olympiad.description.as_deref().is_some_and(contains)
        || olympiad.keywords.as_deref().is_some_and(contains)
}

/// Any selected grade inside the olympiad's range passes.
pub fn matches_grades(olympiad: &Olympiad, grades: &[u32]) -> bool {
    grades.is_empty() || grades.iter().any(|&g| olympiad.accepts_grade(g))
}

/// Any olympiad subject among the selected ids passes.
pub fn matches_subjects(olympiad: &Olympiad, subject_ids: &[i64]) -> bool {
    subject_ids.is_empty() || subject_ids.iter().any(|&id| olympiad.has_subject(id))
}
