//! Competency Assessment Engine — transforms a completed (possibly partial)
//! transcript into an [`InterviewAssessment`].
//!
//! Every generation sub-call has a deterministic fallback: a backend failure
//! degrades that one competency to heuristic-derived scoring, a malformed
//! response degrades to explicit defaults. The assessment as a whole never
//! fails.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::interview::dialogue::{DialogMessage, Speaker};
use crate::interview::policy::QuestionType;
use crate::interview::profile::{CandidateProfile, RoleCategory, SeniorityLevel};
use crate::interview::prompts::{
    COMPETENCY_EVAL_SYSTEM, COMPETENCY_EVAL_TEMPLATE, CULTURE_FIT_SYSTEM, CULTURE_FIT_TEMPLATE,
    SCORE_RUBRIC, STRENGTHS_SYSTEM, STRENGTHS_TEMPLATE,
};
use crate::interview::quality::score_answer;
use crate::interview::red_flags::detect_red_flags;
use crate::llm_client::GenerationClient;

const EVAL_TEMPERATURE: f32 = 0.2;
/// Rounds 1-2 are exploratory; cultural fit is judged from round 3 onward.
const CULTURE_FIT_MIN_ROUND: u32 = 3;

const DEFAULT_SCORE: u8 = 3;
const DEFAULT_NOTE: &str =
    "Рекомендуется давать более развёрнутые ответы с конкретными примерами и результатами.";
const FALLBACK_NOTE: &str =
    "Автоматическая оценка не была завершена; балл рассчитан по эвристике качества ответов.";
const STRENGTHS_PLACEHOLDER: &str = "Сильные стороны не удалось выделить автоматически";
const WEAKNESSES_PLACEHOLDER: &str = "Слабые стороны не удалось выделить автоматически";

/// Skill/trait dimensions scored 1–5 at the end of a simulation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CompetencyArea {
    TechnicalExpertise,
    ProblemSolving,
    Communication,
    Teamwork,
    Adaptability,
    Leadership,
    LearningAbility,
    Motivation,
    CulturalFit,
}

impl CompetencyArea {
    pub fn name_ru(self) -> &'static str {
        match self {
            Self::TechnicalExpertise => "Техническая экспертиза",
            Self::ProblemSolving => "Решение проблем",
            Self::Communication => "Коммуникация",
            Self::Teamwork => "Работа в команде",
            Self::Adaptability => "Адаптивность",
            Self::Leadership => "Лидерство",
            Self::LearningAbility => "Обучаемость",
            Self::Motivation => "Мотивация",
            Self::CulturalFit => "Культурное соответствие",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::TechnicalExpertise => "глубина и актуальность технических знаний",
            Self::ProblemSolving => "умение разбирать и решать нетривиальные задачи",
            Self::Communication => "ясность, структура и полнота ответов",
            Self::Teamwork => "опыт эффективной работы в команде",
            Self::Adaptability => "готовность работать в изменяющихся условиях",
            Self::Leadership => "опыт управления людьми и ответственности за результат",
            Self::LearningAbility => "скорость освоения новых технологий и подходов",
            Self::Motivation => "осознанность выбора позиции и вовлечённость",
            Self::CulturalFit => "совместимость с ценностями и культурой команды",
        }
    }
}

/// Which question types feed evidence into each competency.
fn mapped_question_types(area: CompetencyArea) -> &'static [QuestionType] {
    use QuestionType::*;
    match area {
        CompetencyArea::TechnicalExpertise => &[TechnicalSkills, ExperienceDeepDive],
        CompetencyArea::ProblemSolving => &[ProblemSolving, TechnicalSkills],
        CompetencyArea::Communication => &[Introduction, BehavioralStar, CultureFit],
        CompetencyArea::Teamwork => &[BehavioralStar, CultureFit],
        CompetencyArea::Adaptability => &[BehavioralStar, ProblemSolving],
        CompetencyArea::Leadership => &[Leadership, BehavioralStar],
        CompetencyArea::LearningAbility => &[ExperienceDeepDive, Motivation],
        CompetencyArea::Motivation => &[Motivation, Final],
        CompetencyArea::CulturalFit => &[CultureFit, Motivation],
    }
}

/// One scored competency. Produced once per area per simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetencyScore {
    pub area: CompetencyArea,
    pub score: u8,
    pub evidence: Vec<String>,
    pub improvement_notes: String,
}

/// The final hire signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Hire,
    ConditionalHire,
    Reject,
}

/// The complete end-of-interview evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewAssessment {
    pub overall_recommendation: Recommendation,
    pub competency_scores: Vec<CompetencyScore>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub red_flags: Vec<String>,
    pub cultural_fit_score: u8,
}

/// Picks the competencies relevant to a profile. Deterministic.
pub fn select_competencies(profile: &CandidateProfile) -> BTreeSet<CompetencyArea> {
    let mut areas = BTreeSet::from([
        CompetencyArea::TechnicalExpertise,
        CompetencyArea::Communication,
        CompetencyArea::ProblemSolving,
        CompetencyArea::Motivation,
    ]);

    if matches!(
        profile.detected_level,
        SeniorityLevel::Middle | SeniorityLevel::Senior | SeniorityLevel::Lead
    ) {
        areas.insert(CompetencyArea::Teamwork);
        areas.insert(CompetencyArea::Adaptability);
    }
    if matches!(
        profile.detected_level,
        SeniorityLevel::Senior | SeniorityLevel::Lead
    ) {
        areas.insert(CompetencyArea::Leadership);
    }
    if matches!(
        profile.detected_role,
        RoleCategory::DataScientist | RoleCategory::Developer
    ) {
        areas.insert(CompetencyArea::LearningAbility);
    }
    areas.insert(CompetencyArea::CulturalFit);
    areas
}

/// A candidate answer paired with the question type that prompted it.
#[derive(Debug, Clone)]
struct AnsweredQuestion<'a> {
    question_type: Option<QuestionType>,
    round_number: u32,
    answer: &'a str,
}

fn answered_questions(transcript: &[DialogMessage]) -> Vec<AnsweredQuestion<'_>> {
    let mut out = Vec::new();
    let mut last_question_type: Option<QuestionType> = None;
    for message in transcript {
        match message.speaker {
            Speaker::Hr => last_question_type = message.question_type,
            Speaker::Candidate => out.push(AnsweredQuestion {
                question_type: last_question_type,
                round_number: message.round_number,
                answer: &message.message,
            }),
        }
    }
    out
}

/// Answers relevant to `area`; falls back to all candidate answers when no
/// mapped question was asked.
fn gather_answers<'a>(
    answered: &'a [AnsweredQuestion<'a>],
    area: CompetencyArea,
) -> Vec<&'a AnsweredQuestion<'a>> {
    let mapped = mapped_question_types(area);
    let relevant: Vec<&AnsweredQuestion> = answered
        .iter()
        .filter(|a| a.question_type.is_some_and(|qt| mapped.contains(&qt)))
        .collect();
    if relevant.is_empty() {
        answered.iter().collect()
    } else {
        relevant
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tolerant tagged-format parsing
// ────────────────────────────────────────────────────────────────────────────

/// Raw extraction result of the tagged evaluation format. Missing fields are
/// first-class `None`s resolved by explicit defaulting — parsing is total.
#[derive(Debug, Default, PartialEq)]
struct EvaluationFields {
    score: Option<u8>,
    evidence: Vec<String>,
    note: Option<String>,
}

fn parse_evaluation(text: &str) -> EvaluationFields {
    let mut fields = EvaluationFields::default();
    let mut in_evidence = false;

    for line in text.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("ОЦЕНКА") {
            fields.score = rest.chars().find_map(|c| c.to_digit(10)).and_then(|d| {
                let d = d as u8;
                (1..=5).contains(&d).then_some(d)
            });
            in_evidence = false;
        } else if let Some(rest) = line.strip_prefix("ОБОСНОВАНИЕ") {
            in_evidence = true;
            let inline = rest.trim_start_matches(':').trim();
            if !inline.is_empty() {
                fields.evidence.push(inline.to_string());
            }
        } else if let Some(rest) = line.strip_prefix("РЕКОМЕНДАЦИЯ") {
            in_evidence = false;
            let note = rest.trim_start_matches(':').trim();
            if !note.is_empty() {
                fields.note = Some(note.to_string());
            }
        } else if in_evidence {
            let item = line.trim_start_matches('-').trim();
            if !item.is_empty() {
                fields.evidence.push(item.to_string());
            }
        }
    }
    fields
}

fn resolve_evaluation(area: CompetencyArea, fields: EvaluationFields) -> CompetencyScore {
    if fields.score.is_none() {
        warn!("evaluation for {area:?} missing score tag, defaulting to {DEFAULT_SCORE}");
    }
    CompetencyScore {
        area,
        score: fields.score.unwrap_or(DEFAULT_SCORE),
        evidence: fields.evidence,
        improvement_notes: fields.note.unwrap_or_else(|| DEFAULT_NOTE.to_string()),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Per-competency evaluation with deterministic fallback
// ────────────────────────────────────────────────────────────────────────────

async fn evaluate_competency(
    client: &GenerationClient,
    profile: &CandidateProfile,
    answered: &[AnsweredQuestion<'_>],
    area: CompetencyArea,
) -> CompetencyScore {
    let gathered = gather_answers(answered, area);
    let answers_text = gathered
        .iter()
        .map(|a| format!("Раунд {}: {}", a.round_number, a.answer))
        .collect::<Vec<_>>()
        .join("\n\n");

    let prompt = COMPETENCY_EVAL_TEMPLATE
        .replace("{competency_name}", area.name_ru())
        .replace("{competency_description}", area.description())
        .replace("{rubric}", SCORE_RUBRIC)
        .replace("{profile_json}", &profile_json(profile))
        .replace("{answers}", &answers_text);

    match client
        .generate(COMPETENCY_EVAL_SYSTEM, &prompt, EVAL_TEMPERATURE)
        .await
    {
        Ok(text) => resolve_evaluation(area, parse_evaluation(&text)),
        Err(e) => {
            warn!("evaluation call for {area:?} failed ({e}), using heuristic fallback");
            fallback_competency_score(area, &gathered)
        }
    }
}

/// Deterministic fallback: the rounded mean of heuristic answer scores.
fn fallback_competency_score(
    area: CompetencyArea,
    gathered: &[&AnsweredQuestion<'_>],
) -> CompetencyScore {
    let score = if gathered.is_empty() {
        DEFAULT_SCORE
    } else {
        let sum: u32 = gathered
            .iter()
            .map(|a| {
                u32::from(score_answer(
                    a.answer,
                    a.question_type.unwrap_or(QuestionType::Final),
                ))
            })
            .sum();
        let mean = (sum as f64 / gathered.len() as f64).round() as u8;
        mean.clamp(1, 5)
    };

    CompetencyScore {
        area,
        score,
        evidence: gathered
            .iter()
            .map(|a| format!("Ответ в раунде {}", a.round_number))
            .collect(),
        improvement_notes: FALLBACK_NOTE.to_string(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Recommendation decision
// ────────────────────────────────────────────────────────────────────────────

/// Folds competency scores into the hire decision. Missing technical or
/// communication scores are treated as a neutral 3 for the threshold test.
pub fn decide_recommendation(scores: &[CompetencyScore]) -> Recommendation {
    if scores.is_empty() {
        return Recommendation::Reject;
    }

    let average =
        scores.iter().map(|s| f64::from(s.score)).sum::<f64>() / scores.len() as f64;
    let score_for = |area: CompetencyArea| {
        scores
            .iter()
            .find(|s| s.area == area)
            .map(|s| s.score)
            .unwrap_or(DEFAULT_SCORE)
    };
    let technical = score_for(CompetencyArea::TechnicalExpertise);
    let communication = score_for(CompetencyArea::Communication);

    if average >= 4.0 && technical >= 4 && communication >= 3 {
        Recommendation::Hire
    } else if average >= 3.0 && technical >= 3 && communication >= 3 {
        Recommendation::ConditionalHire
    } else {
        Recommendation::Reject
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Strengths/weaknesses and cultural fit
// ────────────────────────────────────────────────────────────────────────────

fn parse_strengths_weaknesses(text: &str) -> (Vec<String>, Vec<String>) {
    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();
    let mut current: Option<&mut Vec<String>> = None;

    for line in text.lines() {
        let line = line.trim();
        if line.starts_with("СИЛЬНЫЕ СТОРОНЫ") {
            current = Some(&mut strengths);
        } else if line.starts_with("СЛАБЫЕ СТОРОНЫ") {
            current = Some(&mut weaknesses);
        } else if let Some(items) = current.as_deref_mut() {
            let item = line.trim_start_matches('-').trim();
            if !item.is_empty() {
                items.push(item.to_string());
            }
        }
    }
    (strengths, weaknesses)
}

async fn summarize_strengths(
    client: &GenerationClient,
    profile: &CandidateProfile,
    answered: &[AnsweredQuestion<'_>],
) -> (Vec<String>, Vec<String>) {
    let answers_text = answered
        .iter()
        .map(|a| a.answer)
        .collect::<Vec<_>>()
        .join("\n\n");
    let prompt = STRENGTHS_TEMPLATE
        .replace("{profile_json}", &profile_json(profile))
        .replace("{answers}", &answers_text);

    let (mut strengths, mut weaknesses) = match client
        .generate(STRENGTHS_SYSTEM, &prompt, EVAL_TEMPERATURE)
        .await
    {
        Ok(text) => parse_strengths_weaknesses(&text),
        Err(e) => {
            warn!("strengths/weaknesses call failed ({e}), using placeholders");
            (vec![], vec![])
        }
    };

    if strengths.is_empty() {
        strengths.push(STRENGTHS_PLACEHOLDER.to_string());
    }
    if weaknesses.is_empty() {
        weaknesses.push(WEAKNESSES_PLACEHOLDER.to_string());
    }
    (strengths, weaknesses)
}

async fn score_cultural_fit(
    client: &GenerationClient,
    answered: &[AnsweredQuestion<'_>],
) -> u8 {
    let diagnostic: Vec<&str> = answered
        .iter()
        .filter(|a| a.round_number >= CULTURE_FIT_MIN_ROUND)
        .map(|a| a.answer)
        .collect();
    if diagnostic.is_empty() {
        return DEFAULT_SCORE;
    }

    let prompt = CULTURE_FIT_TEMPLATE.replace("{answers}", &diagnostic.join("\n\n"));
    match client
        .generate(CULTURE_FIT_SYSTEM, &prompt, EVAL_TEMPERATURE)
        .await
    {
        Ok(text) => text
            .chars()
            .find_map(|c| c.to_digit(10))
            .map(|d| d as u8)
            .filter(|d| (1..=5).contains(d))
            .unwrap_or(DEFAULT_SCORE),
        Err(e) => {
            warn!("cultural fit call failed ({e}), defaulting to {DEFAULT_SCORE}");
            DEFAULT_SCORE
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Top-level assessment
// ────────────────────────────────────────────────────────────────────────────

/// Builds the complete assessment over whatever transcript exists. Never
/// fails: every generation sub-call degrades to its deterministic fallback.
pub async fn generate_comprehensive_assessment(
    client: &GenerationClient,
    profile: &CandidateProfile,
    transcript: &[DialogMessage],
) -> InterviewAssessment {
    let answered = answered_questions(transcript);
    let areas = select_competencies(profile);
    info!("assessing {} competencies", areas.len());

    let mut competency_scores = Vec::with_capacity(areas.len());
    for area in areas {
        competency_scores.push(evaluate_competency(client, profile, &answered, area).await);
    }

    let (strengths, weaknesses) = summarize_strengths(client, profile, &answered).await;
    let cultural_fit_score = score_cultural_fit(client, &answered).await;

    let candidate_answers: Vec<&str> = answered.iter().map(|a| a.answer).collect();
    let red_flags = detect_red_flags(&candidate_answers);

    let overall_recommendation = decide_recommendation(&competency_scores);

    InterviewAssessment {
        overall_recommendation,
        competency_scores,
        strengths,
        weaknesses,
        red_flags,
        cultural_fit_score,
    }
}

fn profile_json(profile: &CandidateProfile) -> String {
    serde_json::to_string_pretty(profile).unwrap_or_else(|_| "{}".to_string())
}
