//! Adaptive interview simulation engine.
//!
//! Runs a bounded multi-round mock interview between a synthetic HR persona
//! and a synthetic candidate persona, adapts question selection to the
//! detected seniority and role, scores every answer, and aggregates
//! per-competency evaluations into a hire/no-hire decision. Every path that
//! touches the text-generation backend has a deterministic fallback, so a
//! caller always receives a complete, sealed [`Simulation`](interview::Simulation).

pub mod config;
pub mod errors;
pub mod interview;
pub mod llm_client;
pub mod usage;

pub use errors::EngineError;
pub use interview::simulator::{simulate_interview, Simulation, SimulationOptions};
pub use llm_client::{AnthropicClient, GenerationBackend, GenerationClient};
pub use usage::{UsageCounter, UsageRecorder, UsageStats};
