use std::time::Duration;

use tracing::trace;

use crate::card::{Card, CardId};
use crate::grading::{grade, Answer};
use crate::review::{Grade, ReviewRecord};
use crate::scheduler::reschedule;
use crate::settings::Settings;
use crate::CoreError;

/// Everything a single answer produced. The caller saves the card snapshot
/// and appends the record; nothing here has been persisted yet.
#[derive(Clone, Debug, PartialEq)]
pub struct ReviewOutcome {
    pub grade: Grade,
    pub card: Card,
    pub record: ReviewRecord,
}

/// Grades an answer and reschedules the card in one step, keeping the
/// grade-then-reschedule order in one place instead of at every call site.
pub fn answer_card(
    card: &Card,
    answer: &Answer,
    settings: &Settings,
    now: Duration,
    response_ms: u32,
) -> Result<ReviewOutcome, CoreError> {
    let grade = grade(card, answer, settings)?;
    let updated = reschedule(card, grade, now);

    let record = ReviewRecord {
        card: card.id,
        deck: card.deck,
        timestamp: now,
        grade,
        response_ms,
    };

    trace!("card {} answered: {:?}", card.id, grade);

    Ok(ReviewOutcome {
        grade,
        card: updated,
        record,
    })
}

/// Looks a card up in a loaded batch. A missing card is reported, never
/// retried; validate before rescheduling.
pub fn find_card(cards: &[Card], id: CardId) -> Result<&Card, CoreError> {
    cards
        .iter()
        .find(|card| card.id == id)
        .ok_or(CoreError::CardNotFound(id))
}
