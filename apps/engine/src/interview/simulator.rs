//! Simulation Orchestrator — drives the round loop and assembles the sealed
//! [`Simulation`] record.
//!
//! State machine: INIT → ROUND_LOOP(1..=target_rounds) → ASSESSING → DONE.
//! A failed generation call inside the loop yields `RoundOutcome::Aborted`,
//! which ends the loop early; the partial transcript still proceeds to
//! ASSESSING, so the caller always receives a complete simulation.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::EngineError;
use crate::interview::assessment::{
    generate_comprehensive_assessment, select_competencies, CompetencyArea, InterviewAssessment,
};
use crate::interview::dialogue::{
    extract_key_points, generate_candidate_answer, generate_hr_question, DialogMessage, Speaker,
};
use crate::interview::profile::{classify, CandidateProfile, ResumeData, SeniorityLevel, VacancyData};
use crate::interview::quality::score_answer;
use crate::interview::summary;
use crate::llm_client::GenerationClient;

pub const MIN_ROUNDS: u32 = 3;
pub const MAX_ROUNDS: u32 = 7;
const DEFAULT_ROUNDS: u32 = 5;

/// Interview difficulty, derived from the detected level unless overridden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// Immutable interview parameters, fixed before the round loop begins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewConfig {
    pub target_rounds: u32,
    pub focus_areas: BTreeSet<CompetencyArea>,
    pub include_behavioral: bool,
    pub include_technical: bool,
    pub difficulty: Difficulty,
}

impl InterviewConfig {
    /// Profile-derived defaults.
    pub fn for_profile(profile: &CandidateProfile) -> Self {
        let difficulty = match profile.detected_level {
            SeniorityLevel::Junior => Difficulty::Easy,
            SeniorityLevel::Middle | SeniorityLevel::Unknown => Difficulty::Medium,
            SeniorityLevel::Senior | SeniorityLevel::Lead => Difficulty::Hard,
        };
        Self {
            target_rounds: DEFAULT_ROUNDS,
            focus_areas: select_competencies(profile),
            include_behavioral: true,
            include_technical: true,
            difficulty,
        }
    }

    fn validate(&self) -> Result<(), EngineError> {
        if !(MIN_ROUNDS..=MAX_ROUNDS).contains(&self.target_rounds) {
            return Err(EngineError::Configuration(format!(
                "target_rounds must be in [{MIN_ROUNDS},{MAX_ROUNDS}], got {}",
                self.target_rounds
            )));
        }
        Ok(())
    }
}

/// Caller-supplied overrides applied at INIT, before the first round.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigOverrides {
    pub target_rounds: Option<u32>,
    pub focus_areas: Option<BTreeSet<CompetencyArea>>,
    pub include_behavioral: Option<bool>,
    pub include_technical: Option<bool>,
    pub difficulty: Option<Difficulty>,
}

impl ConfigOverrides {
    fn apply(self, config: &mut InterviewConfig) {
        if let Some(v) = self.target_rounds {
            config.target_rounds = v;
        }
        if let Some(v) = self.focus_areas {
            config.focus_areas = v;
        }
        if let Some(v) = self.include_behavioral {
            config.include_behavioral = v;
        }
        if let Some(v) = self.include_technical {
            config.include_technical = v;
        }
        if let Some(v) = self.difficulty {
            config.difficulty = v;
        }
    }
}

/// Progress hook fired after each completed round with `(round, total)`.
pub type ProgressFn = Box<dyn Fn(u32, u32) + Send + Sync>;

#[derive(Default)]
pub struct SimulationOptions {
    pub overrides: Option<ConfigOverrides>,
    pub progress: Option<ProgressFn>,
}

/// What one round of the loop produced.
enum RoundOutcome {
    Completed {
        question: DialogMessage,
        answer: DialogMessage,
    },
    Aborted {
        reason: String,
    },
}

/// The sealed root aggregate handed to the caller. Never mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Simulation {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub profile: CandidateProfile,
    pub config: InterviewConfig,
    pub dialog: Vec<DialogMessage>,
    pub assessment: InterviewAssessment,
    pub hr_assessment: String,
    pub performance_analysis: String,
    pub improvement_recommendations: String,
    pub completed_rounds: u32,
}

/// Runs one full simulation. Two invocations are fully independent; nothing
/// is cached between them.
///
/// Only configuration errors and a disabled backend surface as `Err`; any
/// generation failure after INIT degrades to a shorter transcript and/or
/// fallback assessment scoring.
pub async fn simulate_interview(
    client: &GenerationClient,
    resume: &ResumeData,
    vacancy: &VacancyData,
    options: SimulationOptions,
) -> Result<Simulation, EngineError> {
    // INIT: a disabled backend is a hard failure before any round.
    client.ensure_enabled()?;

    let profile = classify(resume, vacancy);
    let mut config = InterviewConfig::for_profile(&profile);
    if let Some(overrides) = options.overrides {
        overrides.apply(&mut config);
    }
    config.validate()?;

    info!(
        "starting simulation: level={:?} role={:?} rounds={}",
        profile.detected_level, profile.detected_role, config.target_rounds
    );

    // ROUND_LOOP: strictly sequential, each round depends on the transcript.
    let mut dialog: Vec<DialogMessage> = Vec::with_capacity(config.target_rounds as usize * 2);
    let mut completed_rounds = 0;
    for round_number in 1..=config.target_rounds {
        match run_round(client, &profile, &config, &dialog, round_number).await {
            RoundOutcome::Completed { question, answer } => {
                dialog.push(question);
                dialog.push(answer);
                completed_rounds = round_number;
                if let Some(progress) = &options.progress {
                    progress(round_number, config.target_rounds);
                }
            }
            RoundOutcome::Aborted { reason } => {
                warn!("round {round_number} aborted: {reason}; ending interview early");
                break;
            }
        }
    }

    // ASSESSING: always produces a complete assessment, possibly via fallback.
    let assessment = generate_comprehensive_assessment(client, &profile, &dialog).await;

    // DONE: seal the record.
    Ok(Simulation {
        id: Uuid::new_v4(),
        created_at: Utc::now(),
        hr_assessment: summary::hr_assessment(&assessment),
        performance_analysis: summary::performance_analysis(&assessment),
        improvement_recommendations: summary::improvement_recommendations(&assessment),
        profile,
        config,
        dialog,
        assessment,
        completed_rounds,
    })
}

async fn run_round(
    client: &GenerationClient,
    profile: &CandidateProfile,
    config: &InterviewConfig,
    transcript: &[DialogMessage],
    round_number: u32,
) -> RoundOutcome {
    let (question_text, question_type) =
        match generate_hr_question(client, profile, config, transcript, round_number).await {
            Ok(q) => q,
            Err(e) => {
                return RoundOutcome::Aborted {
                    reason: format!("HR question generation failed: {e}"),
                }
            }
        };

    let answer_text = match generate_candidate_answer(
        client,
        profile,
        transcript,
        &question_text,
        question_type,
    )
    .await
    {
        Ok(a) => a,
        Err(e) => {
            return RoundOutcome::Aborted {
                reason: format!("candidate answer generation failed: {e}"),
            }
        }
    };

    let question = DialogMessage {
        speaker: Speaker::Hr,
        message: question_text,
        round_number,
        question_type: Some(question_type),
        response_quality: None,
        key_points: vec![],
    };
    let answer = DialogMessage {
        speaker: Speaker::Candidate,
        response_quality: Some(score_answer(&answer_text, question_type)),
        key_points: extract_key_points(&answer_text),
        message: answer_text,
        round_number,
        question_type: None,
    };

    RoundOutcome::Completed { question, answer }
}
