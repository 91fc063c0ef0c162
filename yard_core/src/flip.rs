//! Flip policy engine.
//!
//! A tap reveals one group of cards. The policy decides how many cards
//! the group holds (a fixed count, or a draw-until-threshold loop) and
//! which exercise each revealed card is credited to.

use crate::types::{Card, Exercise, ExerciseType, FlipMode, SupersetMode};

/// Mode inputs selecting the reveal policy for a session
#[derive(Clone, Copy, Debug)]
pub struct FlipSelector {
    pub flip_mode: FlipMode,
    pub exercise_type: ExerciseType,
    pub superset_mode: Option<SupersetMode>,
}

/// How many cards one tap reveals
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealPolicy {
    /// Reveal exactly this many cards (fewer if the deck runs out)
    Fixed(usize),
    /// Reveal at least one card, then keep drawing while the group's
    /// cumulative value is below the threshold
    Threshold(u32),
}

/// Result of one flip
#[derive(Clone, Debug)]
pub struct FlipOutcome {
    /// The cards revealed by this tap, with their credited exercises
    pub revealed: Vec<Card>,
    pub pushups_added: u32,
    pub squats_added: u32,
    /// Index of the next undrawn card
    pub next_index: usize,
    /// True once the deck is fully consumed
    pub finished: bool,
}

/// Resolve the reveal policy for a mode selection.
///
/// The superset sub-mode takes precedence over the plain flip mode
/// whenever the exercise type is superset.
pub fn reveal_policy(selector: &FlipSelector) -> RevealPolicy {
    if selector.exercise_type == ExerciseType::Superset {
        if let Some(mode) = selector.superset_mode {
            return match mode {
                SupersetMode::Alternating => RevealPolicy::Fixed(1),
                SupersetMode::Split2 => RevealPolicy::Fixed(2),
                SupersetMode::Split4 => RevealPolicy::Fixed(4),
                SupersetMode::SplitUnder20 => RevealPolicy::Threshold(20),
            };
        }
    }

    match selector.flip_mode {
        FlipMode::FreshFish => RevealPolicy::Fixed(1),
        FlipMode::Trustee => RevealPolicy::Fixed(2),
        FlipMode::Og => RevealPolicy::Threshold(20),
        FlipMode::Podfather => RevealPolicy::Threshold(30),
    }
}

/// Reveal the next group of cards starting at `next_index`.
///
/// With the deck already exhausted this is a no-op whose outcome is
/// terminal; the caller treats it as session completion. `toggle` is the
/// session's alternating exercise, advanced once per superset-assigned
/// card so that alternation persists across taps.
pub fn flip(
    deck: &[Card],
    next_index: usize,
    selector: &FlipSelector,
    toggle: &mut Exercise,
) -> FlipOutcome {
    if next_index >= deck.len() {
        return FlipOutcome {
            revealed: Vec::new(),
            pushups_added: 0,
            squats_added: 0,
            next_index,
            finished: true,
        };
    }

    let end = match reveal_policy(selector) {
        RevealPolicy::Fixed(n) => (next_index + n).min(deck.len()),
        RevealPolicy::Threshold(threshold) => {
            let mut end = next_index;
            let mut total = 0u32;
            // Always draw at least one card; stop on exhaustion even if
            // the threshold was never reached.
            while end < deck.len() && (end == next_index || total < threshold) {
                total += deck[end].value;
                end += 1;
            }
            end
        }
    };

    let drawn = &deck[next_index..end];
    let revealed = assign_exercises(drawn, selector, toggle);

    let mut pushups_added = 0;
    let mut squats_added = 0;
    for card in &revealed {
        match card.exercise {
            Exercise::Pushups => pushups_added += card.value,
            Exercise::Squats => squats_added += card.value,
        }
    }

    FlipOutcome {
        revealed,
        pushups_added,
        squats_added,
        next_index: end,
        finished: end == deck.len(),
    }
}

/// Credit each drawn card to an exercise.
///
/// Split modes assign positionally; everything else keeps the card's
/// dealt exercise except superset, which consumes the alternating toggle
/// card by card.
fn assign_exercises(drawn: &[Card], selector: &FlipSelector, toggle: &mut Exercise) -> Vec<Card> {
    if selector.exercise_type == ExerciseType::Superset {
        match selector.superset_mode {
            Some(SupersetMode::Split2) | Some(SupersetMode::Split4) => {
                // First half pushups, second half squats; an odd short
                // group puts the extra card on the pushups side.
                let half = (drawn.len() + 1) / 2;
                return drawn
                    .iter()
                    .enumerate()
                    .map(|(i, card)| {
                        if i < half {
                            card.with_exercise(Exercise::Pushups)
                        } else {
                            card.with_exercise(Exercise::Squats)
                        }
                    })
                    .collect();
            }
            _ => {
                return drawn
                    .iter()
                    .map(|card| {
                        let exercise = *toggle;
                        *toggle = toggle.toggled();
                        card.with_exercise(exercise)
                    })
                    .collect();
            }
        }
    }

    // Non-superset decks were dealt with the right exercise already
    // (forced type or suit default).
    drawn.to_vec()
}
