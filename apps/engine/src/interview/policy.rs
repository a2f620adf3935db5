//! Round Policy — maps `(round_number, profile, already_asked)` to the next
//! question type via a fixed per-round table.
//!
//! Deterministic and pure. No question type is asked twice unless the table
//! for the candidate is exhausted, in which case `Final` may repeat.

use serde::{Deserialize, Serialize};

use crate::interview::profile::{CandidateProfile, SeniorityLevel};

/// Interview question categories, in rough escalation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Introduction,
    TechnicalSkills,
    ExperienceDeepDive,
    BehavioralStar,
    ProblemSolving,
    Motivation,
    CultureFit,
    Leadership,
    Final,
}

/// Candidate question types per round, in preference order.
/// Rounds beyond the table default to `Final`.
const ROUND_TABLE: &[&[QuestionType]] = &[
    &[QuestionType::Introduction],
    &[QuestionType::TechnicalSkills, QuestionType::ExperienceDeepDive],
    &[QuestionType::ExperienceDeepDive, QuestionType::ProblemSolving],
    &[QuestionType::BehavioralStar, QuestionType::ProblemSolving],
    &[QuestionType::Motivation, QuestionType::CultureFit],
    &[QuestionType::CultureFit, QuestionType::BehavioralStar],
    &[QuestionType::Final],
];

/// Selects the question type for `round_number` (1-based).
///
/// Eligible types come from the fixed table; a senior/lead candidate with
/// management experience additionally gets `Leadership` appended until it has
/// been asked once. Types already present in `asked` are filtered out; the
/// first remaining entry in table order wins; an empty set yields `Final`.
pub fn next_question_type(
    round_number: u32,
    profile: &CandidateProfile,
    asked: &[QuestionType],
) -> QuestionType {
    let mut eligible: Vec<QuestionType> = ROUND_TABLE
        .get(round_number.saturating_sub(1) as usize)
        .copied()
        .unwrap_or(&[QuestionType::Final])
        .to_vec();

    let leadership_track = profile.management_experience
        && matches!(
            profile.detected_level,
            SeniorityLevel::Senior | SeniorityLevel::Lead
        );
    if leadership_track && !asked.contains(&QuestionType::Leadership) {
        eligible.push(QuestionType::Leadership);
    }

    eligible
        .into_iter()
        .find(|qt| !asked.contains(qt))
        .unwrap_or(QuestionType::Final)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::profile::RoleCategory;
    use std::collections::BTreeSet;

    fn profile(level: SeniorityLevel, management: bool) -> CandidateProfile {
        CandidateProfile {
            detected_level: level,
            detected_role: RoleCategory::Developer,
            years_of_experience: Some(5),
            key_technologies: BTreeSet::new(),
            management_experience: management,
        }
    }

    #[test]
    fn test_round_one_is_introduction() {
        let p = profile(SeniorityLevel::Junior, false);
        assert_eq!(next_question_type(1, &p, &[]), QuestionType::Introduction);
    }

    #[test]
    fn test_already_asked_types_are_skipped() {
        let p = profile(SeniorityLevel::Middle, false);
        let asked = [QuestionType::Introduction, QuestionType::TechnicalSkills];
        assert_eq!(
            next_question_type(2, &p, &asked),
            QuestionType::ExperienceDeepDive
        );
    }

    #[test]
    fn test_exhausted_round_falls_back_to_final() {
        let p = profile(SeniorityLevel::Middle, false);
        let asked = [
            QuestionType::TechnicalSkills,
            QuestionType::ExperienceDeepDive,
        ];
        assert_eq!(next_question_type(2, &p, &asked), QuestionType::Final);
    }

    #[test]
    fn test_rounds_beyond_table_default_to_final() {
        let p = profile(SeniorityLevel::Senior, false);
        assert_eq!(next_question_type(8, &p, &[]), QuestionType::Final);
        assert_eq!(next_question_type(42, &p, &[]), QuestionType::Final);
    }

    #[test]
    fn test_leadership_appended_for_senior_manager() {
        let p = profile(SeniorityLevel::Senior, true);
        // Both table entries for round 2 already asked, so the appended
        // leadership candidate is the one that survives the filter.
        let asked = [
            QuestionType::TechnicalSkills,
            QuestionType::ExperienceDeepDive,
        ];
        assert_eq!(next_question_type(2, &p, &asked), QuestionType::Leadership);
    }

    #[test]
    fn test_leadership_never_offered_to_junior() {
        let p = profile(SeniorityLevel::Junior, true);
        for round in 1..=7 {
            assert_ne!(
                next_question_type(round, &p, &[]),
                QuestionType::Leadership,
                "round {round} offered leadership to a junior"
            );
        }
    }

    #[test]
    fn test_leadership_asked_at_most_once() {
        let p = profile(SeniorityLevel::Lead, true);
        let asked = [
            QuestionType::TechnicalSkills,
            QuestionType::ExperienceDeepDive,
            QuestionType::Leadership,
        ];
        assert_eq!(next_question_type(2, &p, &asked), QuestionType::Final);
    }

    #[test]
    fn test_policy_is_deterministic() {
        let p = profile(SeniorityLevel::Middle, false);
        let asked = [QuestionType::Introduction];
        let first = next_question_type(3, &p, &asked);
        for _ in 0..10 {
            assert_eq!(next_question_type(3, &p, &asked), first);
        }
    }

    #[test]
    fn test_full_seven_round_walk_has_no_duplicates() {
        let p = profile(SeniorityLevel::Senior, true);
        let mut asked: Vec<QuestionType> = Vec::new();
        for round in 1..=7 {
            let qt = next_question_type(round, &p, &asked);
            if qt != QuestionType::Final {
                assert!(!asked.contains(&qt), "duplicate {qt:?} in round {round}");
            }
            asked.push(qt);
        }
    }
}
