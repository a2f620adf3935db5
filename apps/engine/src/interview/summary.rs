//! Deterministic free-text summaries attached to the sealed simulation.
//! Synthesized from the assessment record, no generation calls.

use crate::interview::assessment::{InterviewAssessment, Recommendation};

/// Short HR verdict: recommendation, strongest competencies, red flags.
pub fn hr_assessment(assessment: &InterviewAssessment) -> String {
    let verdict = match assessment.overall_recommendation {
        Recommendation::Hire => "Рекомендован к найму",
        Recommendation::ConditionalHire => "Рекомендован к найму с оговорками",
        Recommendation::Reject => "Не рекомендован к найму",
    };

    let mut best: Vec<_> = assessment.competency_scores.iter().collect();
    best.sort_by(|a, b| b.score.cmp(&a.score));
    let top = best
        .iter()
        .take(2)
        .map(|s| s.area.name_ru().to_lowercase())
        .collect::<Vec<_>>()
        .join(", ");

    let mut text = format!("{verdict}. Наиболее сильные компетенции: {top}.");
    if !assessment.red_flags.is_empty() {
        text.push_str(&format!(
            " Обратите внимание: {}.",
            assessment.red_flags.join("; ").to_lowercase()
        ));
    }
    text
}

/// Per-competency score lines.
pub fn performance_analysis(assessment: &InterviewAssessment) -> String {
    let mut lines: Vec<String> = assessment
        .competency_scores
        .iter()
        .map(|s| format!("{}: {}/5", s.area.name_ru(), s.score))
        .collect();
    lines.push(format!(
        "Культурное соответствие: {}/5",
        assessment.cultural_fit_score
    ));
    lines.join("\n")
}

/// Improvement notes from competencies scoring at or below 3.
pub fn improvement_recommendations(assessment: &InterviewAssessment) -> String {
    let notes: Vec<String> = assessment
        .competency_scores
        .iter()
        .filter(|s| s.score <= 3)
        .map(|s| format!("{}: {}", s.area.name_ru(), s.improvement_notes))
        .collect();

    if notes.is_empty() {
        "Выраженных зон роста по итогам интервью не выявлено.".to_string()
    } else {
        notes.join("\n")
    }
}
