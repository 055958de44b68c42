use std::cmp::Ordering;
use std::time::Duration;

use tracing::trace;

use crate::card::Card;
use crate::common::days;
use crate::review::Grade;

pub const INITIAL_EASE: f32 = 2.5;
pub const MIN_EASE: f32 = 1.3;
pub const MAX_EASE: f32 = 3.5;

pub const MIN_INTERVAL_DAYS: u32 = 1;
pub const MAX_INTERVAL_DAYS: u32 = 365;

/// A failed card comes back within the session, not tomorrow.
const RELEARN_DELAY: Duration = Duration::from_secs(600);

/// Applies a grade to a card's schedule and returns the updated snapshot.
/// The input card is never touched; persisting the result is the caller's
/// business.
pub fn reschedule(card: &Card, grade: Grade, now: Duration) -> Card {
    let mut next = card.clone();
    let prev = card.schedule;

    match grade {
        Grade::Again => {
            next.schedule.repetitions = 0;
            next.schedule.lapses = prev.lapses + 1;
            next.schedule.ease = (prev.ease - 0.2).max(MIN_EASE);
            next.schedule.interval_days = 0;
            next.schedule.due = now + RELEARN_DELAY;
        }
        grade => {
            let interval = next_interval(prev.repetitions, prev.interval_days, prev.ease, grade);

            next.schedule.repetitions = prev.repetitions + 1;
            next.schedule.ease = (prev.ease + ease_delta(grade)).clamp(MIN_EASE, MAX_EASE);
            next.schedule.interval_days = interval;
            next.schedule.due = now + days(interval);
        }
    }

    trace!(
        "card {} graded {:?}: interval {} -> {} days",
        card.id,
        grade,
        prev.interval_days,
        next.schedule.interval_days
    );

    next
}

/// What-if intervals (in days) per grade, for hinting the choice in the UI.
/// Index is the grade value; a fail has no day interval.
pub fn preview_intervals(card: &Card) -> [u32; 4] {
    let prev = card.schedule;

    [
        0,
        next_interval(prev.repetitions, prev.interval_days, prev.ease, Grade::Hard),
        next_interval(prev.repetitions, prev.interval_days, prev.ease, Grade::Good),
        next_interval(prev.repetitions, prev.interval_days, prev.ease, Grade::Easy),
    ]
}

fn next_interval(repetitions: u32, interval_days: u32, ease: f32, grade: Grade) -> u32 {
    match (repetitions, grade) {
        (_, Grade::Again) => 0,
        // the first two successes use fixed steps rather than the formula
        (0, Grade::Hard) => 1,
        (0, Grade::Good) => 1,
        (0, Grade::Easy) => 4,
        (1, Grade::Hard) => 3,
        (1, Grade::Good) => 6,
        (1, Grade::Easy) => 10,
        (_, grade) => {
            let grown = (interval_days as f32 * ease * grade_factor(grade)).round() as u32;
            grown.clamp(MIN_INTERVAL_DAYS, MAX_INTERVAL_DAYS)
        }
    }
}

fn grade_factor(grade: Grade) -> f32 {
    match grade {
        Grade::Again => 0.,
        Grade::Hard => 0.8,
        Grade::Good => 1.0,
        Grade::Easy => 1.3,
    }
}

fn ease_delta(grade: Grade) -> f32 {
    match grade {
        Grade::Again => -0.2,
        Grade::Hard => -0.15,
        Grade::Good => 0.,
        Grade::Easy => 0.15,
    }
}

/// Stable review ordering: cards never seen before come first, the rest by
/// how overdue they are, most overdue first.
pub fn sort_for_review(mut cards: Vec<Card>, now: Duration) -> Vec<Card> {
    cards.sort_by(|a, b| match (a.is_new(), b.is_new()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (true, true) => Ordering::Equal,
        (false, false) => overdue(b, now).cmp(&overdue(a, now)),
    });

    cards
}

fn overdue(card: &Card, now: Duration) -> Duration {
    now.saturating_sub(card.schedule.due)
}
