//! Built-in rule sets mapping cards to rep counts.
//!
//! A rule set assigns a rep value to each of the 13 ranks and an exercise
//! to each of the 4 suits. The rule book is the collection of selectable
//! rule sets.

use crate::types::{Exercise, Rank, Suit};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Mapping from card rank to rep count and suit to exercise
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RuleSet {
    pub id: String,
    pub name: String,
    pub description: String,
    pub card_values: HashMap<Rank, u32>,
    pub suit_exercises: HashMap<Suit, Exercise>,
}

/// The complete collection of selectable rule sets
#[derive(Clone, Debug)]
pub struct RuleBook {
    pub rule_sets: HashMap<String, RuleSet>,
}

impl RuleBook {
    pub fn get(&self, id: &str) -> Option<&RuleSet> {
        self.rule_sets.get(id)
    }

    /// Validate the rule book for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (id, rules) in &self.rule_sets {
            if id.is_empty() || rules.id.is_empty() {
                errors.push("Rule set has empty ID".to_string());
            }
            if id != &rules.id {
                errors.push(format!(
                    "Rule set key '{}' doesn't match rule_set.id '{}'",
                    id, rules.id
                ));
            }
            if rules.name.is_empty() {
                errors.push(format!("Rule set '{}' has empty name", id));
            }

            // Every rank must carry a positive rep value
            for rank in Rank::ALL {
                match rules.card_values.get(&rank) {
                    None => errors.push(format!(
                        "Rule set '{}' is missing a value for rank {}",
                        id,
                        rank.label()
                    )),
                    Some(0) => errors.push(format!(
                        "Rule set '{}' has a zero value for rank {}",
                        id,
                        rank.label()
                    )),
                    Some(_) => {}
                }
            }

            // Every suit must map to an exercise
            for suit in Suit::ALL {
                if !rules.suit_exercises.contains_key(&suit) {
                    errors.push(format!(
                        "Rule set '{}' is missing an exercise for {:?}",
                        id, suit
                    ));
                }
            }
        }

        errors
    }
}

/// Cached default rule book - built once and reused across all operations
static DEFAULT_RULE_BOOK: Lazy<RuleBook> = Lazy::new(build_default_rule_book_internal);

/// Get a reference to the cached default rule book
pub fn get_default_rule_book() -> &'static RuleBook {
    &DEFAULT_RULE_BOOK
}

/// Builds the default rule book with the built-in rule sets
///
/// **Note**: For production use, prefer `get_default_rule_book()` which
/// returns a cached reference. This function is retained for testing and
/// custom rule book creation.
pub fn build_default_rule_book() -> RuleBook {
    build_default_rule_book_internal()
}

/// Red suits prescribe pushups, black suits squats.
fn default_suit_exercises() -> HashMap<Suit, Exercise> {
    let mut suits = HashMap::new();
    suits.insert(Suit::Hearts, Exercise::Pushups);
    suits.insert(Suit::Diamonds, Exercise::Pushups);
    suits.insert(Suit::Clubs, Exercise::Squats);
    suits.insert(Suit::Spades, Exercise::Squats);
    suits
}

/// Number cards at face value, court cards and the ace per the arguments.
fn card_values(jack: u32, queen: u32, king: u32, ace: u32) -> HashMap<Rank, u32> {
    let mut values = HashMap::new();
    for rank in Rank::ALL {
        let value = match rank {
            Rank::Jack => jack,
            Rank::Queen => queen,
            Rank::King => king,
            Rank::Ace => ace,
            numbered => numbered.face_value().unwrap_or(0),
        };
        values.insert(rank, value);
    }
    values
}

fn build_default_rule_book_internal() -> RuleBook {
    let mut rule_sets = HashMap::new();

    rule_sets.insert(
        "standard".into(),
        RuleSet {
            id: "standard".into(),
            name: "Standard".into(),
            description: "Number cards at face value, court cards 10, aces 11.".into(),
            card_values: card_values(10, 10, 10, 11),
            suit_exercises: default_suit_exercises(),
        },
    );

    rule_sets.insert(
        "hard_time".into(),
        RuleSet {
            id: "hard_time".into(),
            name: "Hard Time".into(),
            description: "Court cards escalate: J 15, Q 20, K 25, A 30.".into(),
            card_values: card_values(15, 20, 25, 30),
            suit_exercises: default_suit_exercises(),
        },
    );

    // Every rank capped at 5 reps; an easier on-ramp deck.
    let mut short_values = card_values(5, 5, 5, 5);
    for value in short_values.values_mut() {
        *value = (*value).min(5);
    }
    rule_sets.insert(
        "short_stint".into(),
        RuleSet {
            id: "short_stint".into(),
            name: "Short Stint".into(),
            description: "Every card capped at 5 reps.".into(),
            card_values: short_values,
            suit_exercises: default_suit_exercises(),
        },
    );

    RuleBook { rule_sets }
}
