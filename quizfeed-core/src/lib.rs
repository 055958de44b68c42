//! Grading and scheduling core of quizfeed.
//!
//! Everything in here is synchronous and effect-free: a card snapshot plus
//! an answer goes in, a grade plus a new snapshot comes out. Storage and UI
//! live with the host, behind the traits in [`provider`].

use std::fmt::Display;

pub mod card;
mod common;
pub mod deck;
pub mod grading;
pub mod provider;
pub mod review;
pub mod scheduler;
mod session;
pub mod settings;
pub mod selector;

pub use card::{
    AudioCard, CKind, Card, CardId, CardKind, ClozeCard, KindTrait, McqMultiCard, McqSingleCard,
    Schedule, TextCard,
};
pub use common::{current_time, days, days_to_duration, duration_to_days};
pub use deck::{Deck, DeckId};
pub use grading::{grade, Answer, STRICT_TAG};
pub use provider::{CardStore, TimeProvider};
pub use review::{retention_rate, Grade, ReviewRecord};
pub use scheduler::{preview_intervals, reschedule, sort_for_review};
pub use selector::{select_next, Selection};
pub use session::{answer_card, find_card, ReviewOutcome};
pub use settings::{FuzzyThresholds, Settings};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The answer's shape doesn't fit the card kind. Caller bug, not a
    /// wrong answer.
    AnswerShape { kind: CKind },
    /// The caller asked about a card that doesn't exist. The core does no
    /// lookups itself, so this is surfaced for hosts to report.
    CardNotFound(CardId),
}

impl Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoreError::AnswerShape { kind } => {
                write!(f, "answer shape doesn't fit a {kind} card")
            }
            CoreError::CardNotFound(id) => write!(f, "no card with id {id}"),
        }
    }
}

impl std::error::Error for CoreError {}
