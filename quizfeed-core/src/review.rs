use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::card::CardId;
use crate::common::days;
use crate::deck::DeckId;

#[derive(
    Ord, PartialOrd, Eq, PartialEq, Hash, Deserialize, Serialize, Debug, Default, Clone, Copy,
)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    #[default]
    Again,
    Hard,
    Good,
    Easy,
}

impl Grade {
    pub fn is_success(&self) -> bool {
        match self {
            Grade::Again => false,
            Grade::Hard => true,
            Grade::Good => true,
            Grade::Easy => true,
        }
    }

    pub fn value(&self) -> u8 {
        match self {
            Grade::Again => 0,
            Grade::Hard => 1,
            Grade::Good => 2,
            Grade::Easy => 3,
        }
    }

    pub fn desc(&self) -> &'static str {
        match self {
            Grade::Again => "No recall, the card resurfaces within the session",
            Grade::Hard => "Recalled, but only barely",
            Grade::Good => "Recalled with some effort",
            Grade::Easy => "No hesitation, perfect recall",
        }
    }
}

impl std::str::FromStr for Grade {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" => Ok(Self::Again),
            "1" => Ok(Self::Hard),
            "2" => Ok(Self::Good),
            "3" => Ok(Self::Easy),
            _ => Err(()),
        }
    }
}

/// Append-only fact about one answer. Analytics reads these; scheduling
/// never does, it works off the card's own state.
#[derive(Ord, PartialOrd, Eq, PartialEq, Hash, Clone, Debug, Deserialize, Serialize)]
pub struct ReviewRecord {
    pub card: CardId,
    pub deck: DeckId,
    // When (unix time) did the review take place?
    pub timestamp: Duration,
    pub grade: Grade,
    pub response_ms: u32,
}

impl ReviewRecord {
    pub fn is_success(&self) -> bool {
        self.grade.is_success()
    }
}

/// Fraction of reviews in the trailing window graded Good or better.
/// An empty window counts as 0.
pub fn retention_rate(records: &[ReviewRecord], window_days: u32, now: Duration) -> f32 {
    let since = now.saturating_sub(days(window_days));

    let mut total = 0u32;
    let mut retained = 0u32;

    for record in records {
        if record.timestamp < since || record.timestamp > now {
            continue;
        }

        total += 1;

        if record.grade >= Grade::Good {
            retained += 1;
        }
    }

    if total == 0 {
        return 0.0;
    }

    retained as f32 / total as f32
}
