//! Answer Quality Heuristic — a deterministic 1–5 scorer applied to every
//! candidate answer as it is produced. Used both as an immediate per-turn
//! confidence signal and as the fallback scoring path when the generation
//! backend fails during assessment.

use crate::interview::policy::QuestionType;

/// Markers of a concrete, non-generic answer.
const CONCRETENESS_MARKERS: &[&str] = &[
    "например",
    "проект",
    "результат",
    "example",
    "project",
    "result",
];

/// STAR-method vocabulary. Stems, so inflected Russian forms match.
const STAR_KEYWORDS: &[&str] = &["ситуаци", "задач", "действ", "результат", "итог", "решени"];

/// Scores a candidate answer on the fixed 1–5 scale.
///
/// Starts at 3; short answers lose a point, long answers gain one,
/// concreteness markers gain one, and behavioral answers gain one more when
/// at least 3 of the 6 STAR keywords are present. Lengths are measured in
/// characters, not bytes, so Cyrillic text is not double-counted.
pub fn score_answer(answer: &str, question_type: QuestionType) -> u8 {
    let mut score: i32 = 3;
    let text = answer.to_lowercase();
    let len = text.chars().count();

    if len < 50 {
        score -= 1;
    }
    if len > 300 {
        score += 1;
    }
    if CONCRETENESS_MARKERS.iter().any(|m| text.contains(m)) {
        score += 1;
    }
    if question_type == QuestionType::BehavioralStar {
        let star_hits = STAR_KEYWORDS.iter().filter(|kw| text.contains(*kw)).count();
        if star_hits >= 3 {
            score += 1;
        }
    }

    score.clamp(1, 5) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_answer_scores_two() {
        assert_eq!(score_answer("", QuestionType::Introduction), 2);
    }

    #[test]
    fn test_plain_medium_answer_scores_three() {
        let answer = "Я работал с несколькими командами и занимался поддержкой сервисов компании.";
        assert_eq!(score_answer(answer, QuestionType::Motivation), 3);
    }

    #[test]
    fn test_long_concrete_answer_scores_five() {
        let answer = format!(
            "Например, в последнем проекте я отвечал за миграцию базы данных. {}",
            "Подробности процесса и его этапов. ".repeat(12)
        );
        assert_eq!(score_answer(&answer, QuestionType::TechnicalSkills), 5);
    }

    #[test]
    fn test_star_bonus_requires_three_keywords() {
        // Two STAR keywords: no bonus.
        let two = "Была сложная ситуация, и результат оказался хорошим для компании в целом и для команды тоже.";
        // Four STAR keywords: bonus applies.
        let four = "Ситуация была сложной, задача срочной, мои действия точными, а результат превзошёл ожидания.";
        let base = score_answer(two, QuestionType::BehavioralStar);
        let bonus = score_answer(four, QuestionType::BehavioralStar);
        assert_eq!(bonus, base + 1);
    }

    #[test]
    fn test_star_bonus_only_for_behavioral_questions() {
        let answer = "Ситуация, задача, действия и результат — всё было под моим контролем в этом случае.";
        let behavioral = score_answer(answer, QuestionType::BehavioralStar);
        let technical = score_answer(answer, QuestionType::TechnicalSkills);
        assert!(behavioral > technical);
    }

    #[test]
    fn test_score_always_in_bounds() {
        let long = "очень длинный ответ с примерами и результатами проекта ".repeat(50);
        let cases = ["", "да", long.as_str()];
        for answer in cases {
            for qt in [
                QuestionType::Introduction,
                QuestionType::BehavioralStar,
                QuestionType::Final,
            ] {
                let s = score_answer(answer, qt);
                assert!((1..=5).contains(&s), "score {s} out of bounds");
            }
        }
    }

    #[test]
    fn test_cyrillic_length_counted_in_chars() {
        // 49 Cyrillic chars is ~98 bytes; must still count as a short answer.
        let answer = "а".repeat(49);
        assert_eq!(score_answer(&answer, QuestionType::Introduction), 2);
        let answer = "а".repeat(51);
        assert_eq!(score_answer(&answer, QuestionType::Introduction), 3);
    }
}
