//! Core domain types for the Yard workout system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Playing cards (suits, ranks) and their workout values
//! - Exercise and mode identifiers
//! - Completed workout records
//! - The local profile

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Card Types
// ============================================================================

/// Playing card suit
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    /// Single-character symbol for display
    pub fn symbol(&self) -> char {
        match self {
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
            Suit::Clubs => '♣',
            Suit::Spades => '♠',
        }
    }
}

/// Playing card rank
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Rank {
    Ace,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Short label for display ("A", "2", ..., "K")
    pub fn label(&self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }

    /// Face value of the number cards (2-10); court cards and the ace
    /// take their value from the rule set alone.
    pub fn face_value(&self) -> Option<u32> {
        match self {
            Rank::Two => Some(2),
            Rank::Three => Some(3),
            Rank::Four => Some(4),
            Rank::Five => Some(5),
            Rank::Six => Some(6),
            Rank::Seven => Some(7),
            Rank::Eight => Some(8),
            Rank::Nine => Some(9),
            Rank::Ten => Some(10),
            _ => None,
        }
    }
}

/// Exercise prescribed by a card
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Exercise {
    Pushups,
    Squats,
}

impl Exercise {
    /// The other exercise; used by the alternating superset toggle.
    pub fn toggled(&self) -> Exercise {
        match self {
            Exercise::Pushups => Exercise::Squats,
            Exercise::Squats => Exercise::Pushups,
        }
    }
}

/// A single card in a dealt deck.
///
/// Immutable once drawn. Superset modes reassign the exercise for
/// accounting by building an overridden copy, never by mutation.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
    pub value: u32,
    pub exercise: Exercise,
}

impl Card {
    /// Copy of this card credited to a different exercise.
    pub fn with_exercise(&self, exercise: Exercise) -> Card {
        Card { exercise, ..*self }
    }
}

// ============================================================================
// Mode Types
// ============================================================================

/// Which exercises a session draws from
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseType {
    /// Every card counts as pushups
    Pushups,
    /// Every card counts as squats
    Squats,
    /// Each card keeps its suit-derived exercise
    SuitSplit,
    /// Pushups and squats combined; assignment comes from the superset mode
    Superset,
}

/// Policy governing how many cards a tap reveals
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FlipMode {
    /// One card per tap
    FreshFish,
    /// Two cards per tap
    Trustee,
    /// Draw until the revealed group is worth at least 20 reps
    Og,
    /// Draw until the revealed group is worth at least 30 reps
    Podfather,
}

/// Superset sub-mode; takes precedence over the flip mode when the
/// exercise type is superset.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SupersetMode {
    /// One card per tap, exercise toggling every card
    Alternating,
    /// Two cards per tap: first pushups, second squats
    Split2,
    /// Four cards per tap: first half pushups, second half squats
    Split4,
    /// Draw while the group is under 20 reps, exercise toggling every card
    SplitUnder20,
}

/// Whether a session counts toward the Rec Yard leaderboard
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunKind {
    Casual,
    Official,
}

// ============================================================================
// Record and Profile Types
// ============================================================================

/// A completed workout, as persisted to local history.
///
/// Created once at session completion and never mutated afterward.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub id: Uuid,
    pub performed_at: DateTime<Utc>,
    pub duration_seconds: u32,
    pub rule_set_id: String,
    pub rule_set_name: String,
    pub flip_mode: FlipMode,
    pub exercise_type: ExerciseType,
    pub superset_mode: Option<SupersetMode>,
    pub total_pushups: u32,
    pub total_squats: u32,
    pub cards_completed: u32,
    pub official: bool,
}

/// Local aggregate profile, updated after every completed workout.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Profile {
    pub display_name: Option<String>,
    pub total_workouts: u32,
    pub total_pushups: u64,
    pub total_squats: u64,
    pub last_rule_set_id: Option<String>,
}

impl Profile {
    /// Fold a completed workout into the aggregates.
    pub fn apply_record(&mut self, record: &WorkoutRecord) {
        self.total_workouts += 1;
        self.total_pushups += u64::from(record.total_pushups);
        self.total_squats += u64::from(record.total_squats);
        self.last_rule_set_id = Some(record.rule_set_id.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_labels_cover_all_ranks() {
        assert_eq!(Rank::ALL.len(), 13);
        for rank in Rank::ALL {
            assert!(!rank.label().is_empty());
        }
    }

    #[test]
    fn test_exercise_toggle_round_trips() {
        assert_eq!(Exercise::Pushups.toggled(), Exercise::Squats);
        assert_eq!(Exercise::Squats.toggled().toggled(), Exercise::Squats);
    }

    #[test]
    fn test_card_override_keeps_value() {
        let card = Card {
            rank: Rank::Seven,
            suit: Suit::Clubs,
            value: 7,
            exercise: Exercise::Squats,
        };
        let overridden = card.with_exercise(Exercise::Pushups);
        assert_eq!(overridden.value, 7);
        assert_eq!(overridden.exercise, Exercise::Pushups);
        // original untouched
        assert_eq!(card.exercise, Exercise::Squats);
    }

    #[test]
    fn test_profile_aggregates() {
        let mut profile = Profile::default();
        let record = WorkoutRecord {
            id: Uuid::new_v4(),
            performed_at: Utc::now(),
            duration_seconds: 900,
            rule_set_id: "standard".into(),
            rule_set_name: "Standard".into(),
            flip_mode: FlipMode::FreshFish,
            exercise_type: ExerciseType::SuitSplit,
            superset_mode: None,
            total_pushups: 104,
            total_squats: 98,
            cards_completed: 52,
            official: false,
        };
        profile.apply_record(&record);
        profile.apply_record(&record);

        assert_eq!(profile.total_workouts, 2);
        assert_eq!(profile.total_pushups, 208);
        assert_eq!(profile.last_rule_set_id.as_deref(), Some("standard"));
    }
}
