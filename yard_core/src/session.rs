//! Workout session state machine.
//!
//! A session owns one dealt deck and walks it tap by tap:
//!
//! ```text
//! idle -> (countdown) -> active <-> paused -> complete
//!                           |
//!                           +-> dnf   (official runs only, via quit)
//! ```
//!
//! The timer is wall-clock based: elapsed time is derived from a captured
//! start timestamp plus seconds banked across pauses, never from
//! accumulated ticks. All time-dependent methods take `now` so callers
//! (and tests) control the clock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::deck;
use crate::flip::{self, FlipOutcome, FlipSelector};
use crate::rules::RuleSet;
use crate::types::{Card, Exercise, ExerciseType, FlipMode, RunKind, SupersetMode, WorkoutRecord};
use crate::{Error, Result};

/// Lifecycle phase of a workout session
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Countdown,
    Active,
    Paused,
    Complete,
    /// Did not finish: an abandoned official run
    Dnf,
}

/// One workout in progress
#[derive(Clone, Debug)]
pub struct WorkoutSession {
    rule_set_id: String,
    rule_set_name: String,
    kind: RunKind,
    selector: FlipSelector,
    deck: Vec<Card>,
    next_index: usize,
    active_cards: Vec<Card>,
    total_pushups: u32,
    total_squats: u32,
    alternating: Exercise,
    phase: Phase,
    countdown_remaining: u32,
    started_at: Option<DateTime<Utc>>,
    banked_seconds: u32,
    /// Remote run row id, set once an official run is registered
    run_id: Option<Uuid>,
}

impl WorkoutSession {
    /// Deal a fresh shuffled deck and start a session.
    ///
    /// With a countdown the session waits in `countdown` until the ticks
    /// run out; otherwise it is `active` immediately. The alternating
    /// toggle always starts on squats.
    pub fn start(
        rules: &RuleSet,
        kind: RunKind,
        selector: FlipSelector,
        countdown_seconds: u32,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let deck = deck::deal(rules, selector.exercise_type)?;
        Ok(Self::start_with_deck(
            rules,
            kind,
            selector,
            countdown_seconds,
            deck,
            now,
        ))
    }

    /// Start a session over a caller-supplied deck (deterministic tests).
    pub fn start_with_deck(
        rules: &RuleSet,
        kind: RunKind,
        selector: FlipSelector,
        countdown_seconds: u32,
        deck: Vec<Card>,
        now: DateTime<Utc>,
    ) -> Self {
        let (phase, started_at) = if countdown_seconds > 0 {
            (Phase::Countdown, None)
        } else {
            (Phase::Active, Some(now))
        };

        tracing::info!(
            "Starting {:?} session: rules={} mode={:?} exercise={:?}",
            kind,
            rules.id,
            selector.flip_mode,
            selector.exercise_type
        );

        Self {
            rule_set_id: rules.id.clone(),
            rule_set_name: rules.name.clone(),
            kind,
            selector,
            deck,
            next_index: 0,
            active_cards: Vec::new(),
            total_pushups: 0,
            total_squats: 0,
            alternating: Exercise::Squats,
            phase,
            countdown_remaining: countdown_seconds,
            started_at,
            banked_seconds: 0,
            run_id: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn kind(&self) -> RunKind {
        self.kind
    }

    pub fn rule_set_id(&self) -> &str {
        &self.rule_set_id
    }

    pub fn total_pushups(&self) -> u32 {
        self.total_pushups
    }

    pub fn total_squats(&self) -> u32 {
        self.total_squats
    }

    /// Cards consumed so far
    pub fn cards_completed(&self) -> u32 {
        self.next_index as u32
    }

    pub fn cards_remaining(&self) -> usize {
        self.deck.len() - self.next_index
    }

    /// The group revealed by the most recent flip
    pub fn active_cards(&self) -> &[Card] {
        &self.active_cards
    }

    pub fn countdown_remaining(&self) -> u32 {
        self.countdown_remaining
    }

    pub fn run_id(&self) -> Option<Uuid> {
        self.run_id
    }

    pub fn set_run_id(&mut self, run_id: Uuid) {
        self.run_id = Some(run_id);
    }

    /// Whole seconds spent active, derived from wall-clock timestamps.
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> u32 {
        let running = self
            .started_at
            .map(|started| (now - started).num_seconds().max(0) as u32)
            .unwrap_or(0);
        self.banked_seconds + running
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Consume one countdown tick; the last tick activates the session.
    ///
    /// Returns the seconds still remaining.
    pub fn countdown_tick(&mut self, now: DateTime<Utc>) -> Result<u32> {
        if self.phase != Phase::Countdown {
            return Err(Error::Session(format!(
                "Cannot tick countdown while {:?}",
                self.phase
            )));
        }

        self.countdown_remaining = self.countdown_remaining.saturating_sub(1);
        if self.countdown_remaining == 0 {
            self.phase = Phase::Active;
            self.started_at = Some(now);
        }
        Ok(self.countdown_remaining)
    }

    /// Reveal the next group of cards and account the reps.
    ///
    /// Consuming the final card transitions to `complete` and freezes the
    /// duration.
    pub fn flip(&mut self, now: DateTime<Utc>) -> Result<FlipOutcome> {
        if self.phase != Phase::Active {
            return Err(Error::Session(format!(
                "Cannot flip while {:?}",
                self.phase
            )));
        }

        let outcome = flip::flip(
            &self.deck,
            self.next_index,
            &self.selector,
            &mut self.alternating,
        );

        self.total_pushups += outcome.pushups_added;
        self.total_squats += outcome.squats_added;
        self.next_index = outcome.next_index;
        // The previous group is replaced, not accumulated.
        self.active_cards = outcome.revealed.clone();

        if outcome.finished {
            self.freeze_timer(now);
            self.phase = Phase::Complete;
            tracing::info!(
                "Session complete: {} pushups, {} squats in {}s",
                self.total_pushups,
                self.total_squats,
                self.banked_seconds
            );
        }

        Ok(outcome)
    }

    /// Freeze the timer; deck position and counters are untouched.
    pub fn pause(&mut self, now: DateTime<Utc>) -> Result<()> {
        if self.phase != Phase::Active {
            return Err(Error::Session(format!(
                "Cannot pause while {:?}",
                self.phase
            )));
        }
        self.freeze_timer(now);
        self.phase = Phase::Paused;
        Ok(())
    }

    /// Restart the timer from a fresh reference timestamp.
    pub fn resume(&mut self, now: DateTime<Utc>) -> Result<()> {
        if self.phase != Phase::Paused {
            return Err(Error::Session(format!(
                "Cannot resume while {:?}",
                self.phase
            )));
        }
        self.started_at = Some(now);
        self.phase = Phase::Active;
        Ok(())
    }

    /// Abandon the session.
    ///
    /// Official runs end in the terminal `dnf` phase; casual sessions are
    /// simply reset to `idle` and their progress discarded.
    pub fn quit(&mut self, now: DateTime<Utc>) -> Phase {
        match self.phase {
            Phase::Active | Phase::Paused | Phase::Countdown => {
                if self.phase == Phase::Active {
                    self.freeze_timer(now);
                }
                self.phase = match self.kind {
                    RunKind::Official => Phase::Dnf,
                    RunKind::Casual => Phase::Idle,
                };
            }
            _ => {}
        }
        self.phase
    }

    /// Build the immutable record for a completed session.
    pub fn to_record(&self, id: Uuid, performed_at: DateTime<Utc>) -> Result<WorkoutRecord> {
        if self.phase != Phase::Complete {
            return Err(Error::Session(format!(
                "No record for a {:?} session",
                self.phase
            )));
        }

        let superset_mode = match self.selector.exercise_type {
            ExerciseType::Superset => self.selector.superset_mode,
            _ => None,
        };

        Ok(WorkoutRecord {
            id,
            performed_at,
            duration_seconds: self.banked_seconds,
            rule_set_id: self.rule_set_id.clone(),
            rule_set_name: self.rule_set_name.clone(),
            flip_mode: self.selector.flip_mode,
            exercise_type: self.selector.exercise_type,
            superset_mode,
            total_pushups: self.total_pushups,
            total_squats: self.total_squats,
            cards_completed: self.cards_completed(),
            official: self.kind == RunKind::Official,
        })
    }

    fn freeze_timer(&mut self, now: DateTime<Utc>) {
        if let Some(started) = self.started_at.take() {
            self.banked_seconds += (now - started).num_seconds().max(0) as u32;
        }
    }
}

/// Convenience constructor for a flip selector.
pub fn selector(
    flip_mode: FlipMode,
    exercise_type: ExerciseType,
    superset_mode: Option<SupersetMode>,
) -> FlipSelector {
    FlipSelector {
        flip_mode,
        exercise_type,
        superset_mode,
    }
}
