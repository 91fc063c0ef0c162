#![forbid(unsafe_code)]

//! Core domain model and business logic for the Yard workout system.
//!
//! This crate provides:
//! - Domain types (cards, modes, records, profile)
//! - Rule sets and deck generation
//! - Flip policy engine
//! - Workout session state machine
//! - Persistence (history log, CSV archive, profile)
//! - Rec Yard remote service client

pub mod types;
pub mod error;
pub mod rules;
pub mod deck;
pub mod flip;
pub mod session;
pub mod config;
pub mod logging;
pub mod history;
pub mod csv_rollup;
pub mod profile;
pub mod recyard;
pub mod completion;
pub mod feedback;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use rules::{build_default_rule_book, get_default_rule_book, RuleBook, RuleSet};
pub use config::Config;
pub use deck::{deal, generate_deck, DECK_SIZE};
pub use flip::{FlipOutcome, FlipSelector, RevealPolicy};
pub use session::{Phase, WorkoutSession};
pub use history::{best_duration, load_records, load_recent_records, JsonlSink, RecordSink};
pub use completion::{finish_local, finish_official, abandon_official, CompletionSummary};
pub use recyard::{RecYardClient, RunStatus};
pub use feedback::{FeedbackSink, NoopFeedback};
