// Adaptive interview simulation.
// Implements: profile classification, round policy, dialogue generation,
// answer scoring, competency assessment, red-flag detection, orchestration.
// All LLM calls go through llm_client — no direct Anthropic calls here.

pub mod assessment;
pub mod dialogue;
pub mod policy;
pub mod profile;
pub mod prompts;
pub mod quality;
pub mod red_flags;
pub mod simulator;
pub mod summary;
