use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use nonempty::NonEmpty;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::deck::DeckId;
use crate::scheduler::INITIAL_EASE;

mod kinds;

pub use kinds::*;

pub type CardId = Uuid;

/// Review state owned by the scheduler. Everything here is rewritten on each
/// answer; nothing else on the card ever is.
#[derive(PartialEq, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Schedule {
    /// Absolute unix instant the card comes due.
    pub due: Duration,
    pub interval_days: u32,
    pub ease: f32,
    pub repetitions: u32,
    pub lapses: u32,
}

impl Schedule {
    pub fn new(now: Duration) -> Self {
        Self {
            due: now,
            interval_days: 0,
            ease: INITIAL_EASE,
            repetitions: 0,
            lapses: 0,
        }
    }
}

/// A learnable unit. The content fields are shareable and never touched by
/// the core; the schedule is per-user state.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RawCard", into = "RawCard")]
pub struct Card {
    pub id: CardId,
    pub deck: DeckId,
    pub kind: CardKind,
    pub tags: BTreeMap<String, String>,
    pub schedule: Schedule,
}

impl Card {
    pub fn new(deck: DeckId, kind: impl Into<CardKind>, now: Duration) -> Self {
        Self::new_with_id(CardId::new_v4(), deck, kind, now)
    }

    pub fn new_with_id(id: CardId, deck: DeckId, kind: impl Into<CardKind>, now: Duration) -> Self {
        Self {
            id,
            deck,
            kind: kind.into(),
            tags: Default::default(),
            schedule: Schedule::new(now),
        }
    }

    /// Never answered, not even wrongly.
    pub fn is_new(&self) -> bool {
        self.schedule.repetitions == 0 && self.schedule.lapses == 0
    }

    pub fn is_due(&self, now: Duration) -> bool {
        self.schedule.due <= now
    }

    pub fn display_front(&self) -> String {
        self.kind.display_front()
    }

    pub fn ckind(&self) -> CKind {
        CKind::from(&self.kind)
    }

    pub fn tag(&self, key: &str) -> bool {
        self.tags.contains_key(key)
    }
}

/// Flat storage shape of a card; [`Card`] serializes through it so a stored
/// record is a single flat object regardless of kind.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RawCard {
    id: Uuid,
    deck: Uuid,
    ty: CKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    front: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    back: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    options: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    correct: BTreeSet<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    answers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    accept: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    tags: BTreeMap<String, String>,
    #[serde(flatten)]
    schedule: Schedule,
}

impl From<Card> for RawCard {
    fn from(card: Card) -> Self {
        let mut raw = RawCard {
            id: card.id,
            deck: card.deck,
            ty: card.ckind(),
            front: None,
            back: None,
            options: vec![],
            correct: Default::default(),
            answers: vec![],
            accept: None,
            tags: card.tags,
            schedule: card.schedule,
        };

        match card.kind {
            CardKind::Text(kind) => {
                raw.front = Some(kind.front);
                raw.back = Some(kind.back);
                raw.answers = kind.answers;
                raw.accept = kind.accept;
            }
            CardKind::McqSingle(kind) => {
                raw.front = Some(kind.front);
                raw.options = kind.options;
                raw.correct = BTreeSet::from([kind.correct]);
            }
            CardKind::McqMulti(kind) => {
                raw.front = Some(kind.front);
                raw.options = kind.options;
                raw.correct = kind.correct;
            }
            CardKind::Cloze(kind) => {
                raw.front = Some(kind.template);
                raw.answers = kind.answers.into_iter().collect();
            }
            CardKind::Audio(kind) => {
                raw.front = Some(kind.front);
                raw.back = Some(kind.back);
                raw.answers = kind.answers;
            }
        }

        raw
    }
}

impl From<RawCard> for Card {
    fn from(raw: RawCard) -> Self {
        let kind = match raw.ty {
            CKind::Text => CardKind::Text(TextCard {
                front: raw.front.unwrap_or_default(),
                back: raw.back.unwrap_or_default(),
                answers: raw.answers,
                accept: raw.accept,
            }),
            CKind::McqSingle => CardKind::McqSingle(McqSingleCard {
                front: raw.front.unwrap_or_default(),
                options: raw.options,
                correct: raw.correct.into_iter().next().unwrap_or(0),
            }),
            CKind::McqMulti => CardKind::McqMulti(McqMultiCard {
                front: raw.front.unwrap_or_default(),
                options: raw.options,
                correct: raw.correct,
            }),
            CKind::Cloze => CardKind::Cloze(ClozeCard {
                template: raw.front.unwrap_or_default(),
                answers: NonEmpty::from_vec(raw.answers)
                    .unwrap_or_else(|| NonEmpty::new(String::new())),
            }),
            CKind::Audio => CardKind::Audio(AudioCard {
                front: raw.front.unwrap_or_default(),
                back: raw.back.unwrap_or_default(),
                answers: raw.answers,
            }),
        };

        Self {
            id: raw.id,
            deck: raw.deck,
            kind,
            tags: raw.tags,
            schedule: raw.schedule,
        }
    }
}
