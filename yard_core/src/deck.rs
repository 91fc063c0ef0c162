//! Deck construction and shuffling.
//!
//! A deck is the full 52-card sequence for one workout: one card per
//! (suit, rank) pair, valued by the active rule set, shuffled uniformly.

use crate::rules::RuleSet;
use crate::types::{Card, Exercise, ExerciseType, Rank, Suit};
use crate::{Error, Result};
use rand::seq::SliceRandom;
use rand::Rng;

/// Number of cards in a full deck
pub const DECK_SIZE: usize = 52;

/// Build the 52-card deck for a rule set, in suit/rank order.
///
/// Each card takes its value from the rule set's rank table and its
/// exercise from the suit mapping, unless the exercise type forces a
/// single exercise for the whole deck. A missing rank or suit entry is a
/// configuration error.
pub fn generate_deck(rules: &RuleSet, exercise_type: ExerciseType) -> Result<Vec<Card>> {
    let mut deck = Vec::with_capacity(DECK_SIZE);

    for suit in Suit::ALL {
        let suit_exercise = *rules.suit_exercises.get(&suit).ok_or_else(|| {
            Error::RuleSet(format!(
                "Rule set '{}' has no exercise for {:?}",
                rules.id, suit
            ))
        })?;

        for rank in Rank::ALL {
            let value = *rules.card_values.get(&rank).ok_or_else(|| {
                Error::RuleSet(format!(
                    "Rule set '{}' has no value for rank {}",
                    rules.id,
                    rank.label()
                ))
            })?;

            let exercise = match exercise_type {
                ExerciseType::Pushups => Exercise::Pushups,
                ExerciseType::Squats => Exercise::Squats,
                // Superset assignment happens per flip; the suit default
                // is only a placeholder until then.
                ExerciseType::SuitSplit | ExerciseType::Superset => suit_exercise,
            };

            deck.push(Card {
                rank,
                suit,
                value,
                exercise,
            });
        }
    }

    Ok(deck)
}

/// Shuffle a deck in place (uniform Fisher-Yates).
pub fn shuffle_deck<R: Rng>(deck: &mut [Card], rng: &mut R) {
    deck.shuffle(rng);
}

/// Generate and shuffle a deck with the thread-local RNG.
pub fn deal(rules: &RuleSet, exercise_type: ExerciseType) -> Result<Vec<Card>> {
    deal_with_rng(rules, exercise_type, &mut rand::thread_rng())
}

/// Generate and shuffle a deck with a caller-supplied RNG.
///
/// Used by tests that need a deterministic ordering.
pub fn deal_with_rng<R: Rng>(
    rules: &RuleSet,
    exercise_type: ExerciseType,
    rng: &mut R,
) -> Result<Vec<Card>> {
    let mut deck = generate_deck(rules, exercise_type)?;
    shuffle_deck(&mut deck, rng);
    Ok(deck)
}
