//! Dialogue Turn Generator — produces one HR question and one candidate
//! answer per round, shaped by a level-keyed interviewer persona, role
//! guidance, and the question type picked by the round policy.
//!
//! Generation failures propagate as errors; the orchestrator converts them
//! into an aborted round. There is no retry at this layer.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::EngineError;
use crate::interview::policy::{next_question_type, QuestionType};
use crate::interview::profile::{CandidateProfile, RoleCategory, SeniorityLevel};
use crate::interview::prompts::{
    CANDIDATE_ANSWER_SYSTEM, CANDIDATE_ANSWER_TEMPLATE, HR_QUESTION_SYSTEM, HR_QUESTION_TEMPLATE,
    STAR_INSTRUCTION,
};
use crate::interview::simulator::InterviewConfig;
use crate::llm_client::GenerationClient;

const HR_TEMPERATURE: f32 = 0.7;
const CANDIDATE_TEMPERATURE: f32 = 0.8;
/// Only the tail of the transcript is sent with each turn.
const TRANSCRIPT_TAIL: usize = 12;

/// Who produced a dialogue message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    Hr,
    Candidate,
}

/// One message in the interview transcript. Appended in strict chronological
/// order and never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogMessage {
    pub speaker: Speaker,
    pub message: String,
    pub round_number: u32,
    /// Set only for HR messages.
    pub question_type: Option<QuestionType>,
    /// Set only for candidate messages, from the quality heuristic.
    pub response_quality: Option<u8>,
    pub key_points: Vec<String>,
}

/// Interviewer persona selected by candidate level. Unknown candidates get
/// the middle-tier persona.
pub fn persona_for_level(level: SeniorityLevel) -> &'static str {
    match level {
        SeniorityLevel::Junior => {
            "Поддерживающий наставник: доброжелательный тон, простые формулировки, \
             помогает кандидату раскрыться, избегает давления."
        }
        SeniorityLevel::Middle | SeniorityLevel::Unknown => {
            "Требовательный эксперт: точные технические формулировки, просит \
             конкретику и примеры, переспрашивает при расплывчатых ответах."
        }
        SeniorityLevel::Senior => {
            "Оценщик лидерских качеств: фокус на архитектурных решениях, \
             ответственности и влиянии на команду и продукт."
        }
        SeniorityLevel::Lead => {
            "Равный стратег: разговор на уровне целей бизнеса, стратегии найма \
             и развития инженерной культуры."
        }
    }
}

/// Role-specific interviewer guidance.
pub fn guidance_for_role(role: RoleCategory) -> &'static str {
    match role {
        RoleCategory::Developer => {
            "Спрашивайте про архитектуру, качество кода, отладку и выбор технологий."
        }
        RoleCategory::Qa => {
            "Спрашивайте про тест-дизайн, автоматизацию, регрессии и работу с багами."
        }
        RoleCategory::Devops => {
            "Спрашивайте про CI/CD, инфраструктуру как код, мониторинг и инциденты."
        }
        RoleCategory::Analyst => {
            "Спрашивайте про сбор требований, метрики, работу с данными и стейкхолдерами."
        }
        RoleCategory::ProjectManager => {
            "Спрашивайте про планирование, риски, коммуникацию и управление командой."
        }
        RoleCategory::Designer => {
            "Спрашивайте про процесс дизайна, исследования пользователей и метрики UX."
        }
        RoleCategory::DataScientist => {
            "Спрашивайте про постановку ML-задач, валидацию моделей и работу с данными."
        }
        RoleCategory::SystemAdmin => {
            "Спрашивайте про администрирование, отказоустойчивость и безопасность."
        }
        RoleCategory::Other => {
            "Спрашивайте про профессиональный опыт, рабочие процессы и достижения."
        }
    }
}

/// What the HR persona should probe for each question type.
pub fn guidance_for_question(question_type: QuestionType) -> &'static str {
    match question_type {
        QuestionType::Introduction => {
            "Вводный вопрос: попросите кандидата рассказать о себе и своём пути."
        }
        QuestionType::TechnicalSkills => {
            "Технический вопрос: проверьте глубину владения заявленными технологиями."
        }
        QuestionType::ExperienceDeepDive => {
            "Углубление в опыт: подробно разберите один значимый проект кандидата."
        }
        QuestionType::BehavioralStar => {
            "Поведенческий вопрос по методу STAR: попросите описать конкретную \
             ситуацию, задачу, действия и результат."
        }
        QuestionType::ProblemSolving => {
            "Вопрос на решение проблем: предложите реалистичную рабочую ситуацию."
        }
        QuestionType::Motivation => {
            "Вопрос о мотивации: почему эта позиция и что движет кандидатом."
        }
        QuestionType::CultureFit => {
            "Вопрос о ценностях: как кандидат работает в команде и переживает конфликты."
        }
        QuestionType::Leadership => {
            "Вопрос о лидерстве: опыт управления людьми, найма и развития команды."
        }
        QuestionType::Final => {
            "Завершающий вопрос: остались ли у кандидата вопросы, финальные темы."
        }
    }
}

/// Generates the HR question for `round_number` and returns it with the
/// question type chosen by the round policy.
pub async fn generate_hr_question(
    client: &GenerationClient,
    profile: &CandidateProfile,
    config: &InterviewConfig,
    transcript: &[DialogMessage],
    round_number: u32,
) -> Result<(String, QuestionType), EngineError> {
    let mut asked: Vec<QuestionType> = transcript
        .iter()
        .filter_map(|m| m.question_type)
        .collect();
    // Question categories disabled by config are treated as already asked so
    // the policy skips them without special-casing.
    if !config.include_behavioral {
        asked.push(QuestionType::BehavioralStar);
    }
    if !config.include_technical {
        asked.push(QuestionType::TechnicalSkills);
    }
    let question_type = next_question_type(round_number, profile, &asked);
    debug!("round {round_number}: selected question type {question_type:?}");

    let prompt = HR_QUESTION_TEMPLATE
        .replace("{persona}", persona_for_level(profile.detected_level))
        .replace("{role_guidance}", guidance_for_role(profile.detected_role))
        .replace("{question_guidance}", guidance_for_question(question_type))
        .replace("{difficulty}", config.difficulty.as_str())
        .replace("{profile_json}", &profile_json(profile))
        .replace("{transcript}", &render_transcript(transcript))
        .replace("{round_number}", &round_number.to_string())
        .replace("{target_rounds}", &config.target_rounds.to_string());

    let text = client
        .generate(HR_QUESTION_SYSTEM, &prompt, HR_TEMPERATURE)
        .await?;
    Ok((text.trim().to_string(), question_type))
}

/// Generates the candidate's answer to `question`.
pub async fn generate_candidate_answer(
    client: &GenerationClient,
    profile: &CandidateProfile,
    transcript: &[DialogMessage],
    question: &str,
    question_type: QuestionType,
) -> Result<String, EngineError> {
    let star_instruction = if question_type == QuestionType::BehavioralStar {
        STAR_INSTRUCTION
    } else {
        ""
    };

    let prompt = CANDIDATE_ANSWER_TEMPLATE
        .replace("{profile_json}", &profile_json(profile))
        .replace("{star_instruction}", star_instruction)
        .replace("{transcript}", &render_transcript(transcript))
        .replace("{question}", question);

    let text = client
        .generate(CANDIDATE_ANSWER_SYSTEM, &prompt, CANDIDATE_TEMPERATURE)
        .await?;
    Ok(text.trim().to_string())
}

/// Renders the transcript tail for prompt inclusion.
pub fn render_transcript(transcript: &[DialogMessage]) -> String {
    if transcript.is_empty() {
        return "(интервью ещё не началось)".to_string();
    }
    let start = transcript.len().saturating_sub(TRANSCRIPT_TAIL);
    transcript[start..]
        .iter()
        .map(|m| {
            let who = match m.speaker {
                Speaker::Hr => "HR",
                Speaker::Candidate => "Кандидат",
            };
            format!("{who}: {}", m.message)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extracts up to three concrete-sounding sentences as key points.
pub fn extract_key_points(answer: &str) -> Vec<String> {
    answer
        .split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| {
            s.chars().count() > 40
                && ["проект", "результат", "например", "project", "result"]
                    .iter()
                    .any(|m| s.to_lowercase().contains(m))
        })
        .take(3)
        .map(|s| s.to_string())
        .collect()
}

fn profile_json(profile: &CandidateProfile) -> String {
    serde_json::to_string_pretty(profile).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn profile(level: SeniorityLevel) -> CandidateProfile {
        CandidateProfile {
            detected_level: level,
            detected_role: RoleCategory::Developer,
            years_of_experience: Some(4),
            key_technologies: BTreeSet::new(),
            management_experience: false,
        }
    }

    #[test]
    fn test_unknown_level_uses_middle_persona() {
        assert_eq!(
            persona_for_level(SeniorityLevel::Unknown),
            persona_for_level(SeniorityLevel::Middle)
        );
    }

    #[test]
    fn test_all_personas_are_distinct() {
        let personas = [
            persona_for_level(SeniorityLevel::Junior),
            persona_for_level(SeniorityLevel::Middle),
            persona_for_level(SeniorityLevel::Senior),
            persona_for_level(SeniorityLevel::Lead),
        ];
        for (i, a) in personas.iter().enumerate() {
            for b in personas.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_render_transcript_empty() {
        assert!(render_transcript(&[]).contains("не началось"));
    }

    #[test]
    fn test_render_transcript_labels_speakers() {
        let transcript = vec![
            DialogMessage {
                speaker: Speaker::Hr,
                message: "Расскажите о себе".to_string(),
                round_number: 1,
                question_type: Some(QuestionType::Introduction),
                response_quality: None,
                key_points: vec![],
            },
            DialogMessage {
                speaker: Speaker::Candidate,
                message: "Я разработчик".to_string(),
                round_number: 1,
                question_type: None,
                response_quality: Some(3),
                key_points: vec![],
            },
        ];
        let rendered = render_transcript(&transcript);
        assert!(rendered.contains("HR: Расскажите о себе"));
        assert!(rendered.contains("Кандидат: Я разработчик"));
    }

    #[test]
    fn test_render_transcript_bounded_to_tail() {
        let transcript: Vec<DialogMessage> = (1..=20)
            .map(|i| DialogMessage {
                speaker: Speaker::Hr,
                message: format!("вопрос номер {i}"),
                round_number: i,
                question_type: None,
                response_quality: None,
                key_points: vec![],
            })
            .collect();
        let rendered = render_transcript(&transcript);
        assert!(!rendered.contains("вопрос номер 8"));
        assert!(rendered.contains("вопрос номер 9"));
        assert!(rendered.contains("вопрос номер 20"));
    }

    #[test]
    fn test_extract_key_points_picks_concrete_sentences() {
        let answer = "Да. Например, в прошлом проекте я полностью переписал модуль оплаты \
                      и сократил время ответа. Там было сложно. Результатом стало снижение \
                      количества инцидентов на проде почти в два раза.";
        let points = extract_key_points(answer);
        assert_eq!(points.len(), 2);
        assert!(points[0].contains("проекте"));
    }

    #[test]
    fn test_extract_key_points_empty_for_vague_answer() {
        assert!(extract_key_points("Не знаю. Наверное, да.").is_empty());
    }

    #[test]
    fn test_question_guidance_mentions_star_for_behavioral() {
        assert!(guidance_for_question(QuestionType::BehavioralStar).contains("STAR"));
    }

    #[test]
    fn test_profile_json_is_valid_json() {
        let rendered = profile_json(&profile(SeniorityLevel::Junior));
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed["detected_level"], "junior");
    }
}
