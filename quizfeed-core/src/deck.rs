use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type DeckId = Uuid;

/// Named grouping of cards. Decks own no review state; which deck is served
/// next is decided by the selector from the explicit `position` key, never
/// from whatever order storage happened to return them in.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deck {
    pub id: DeckId,
    pub name: String,
    pub position: u32,
}

impl Deck {
    pub fn new(name: impl Into<String>, position: u32) -> Self {
        Self {
            id: DeckId::new_v4(),
            name: name.into(),
            position,
        }
    }
}

/// Deck ids in serving order. Position first, name and id as deterministic
/// tie breakers.
pub fn canonical_order(decks: &[Deck]) -> Vec<DeckId> {
    let mut decks: Vec<&Deck> = decks.iter().collect();
    decks.sort_by(|a, b| {
        a.position
            .cmp(&b.position)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.id.cmp(&b.id))
    });

    decks.into_iter().map(|deck| deck.id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_follows_position_not_list_order() {
        let mut decks = vec![
            Deck::new("geography", 2),
            Deck::new("french", 0),
            Deck::new("chemistry", 1),
        ];
        let expected = vec![decks[1].id, decks[2].id, decks[0].id];

        assert_eq!(canonical_order(&decks), expected);

        decks.reverse();
        assert_eq!(canonical_order(&decks), expected);
    }

    #[test]
    fn order_ties_break_on_name() {
        let a = Deck::new("alpha", 0);
        let b = Deck::new("beta", 0);
        let decks = vec![b.clone(), a.clone()];

        assert_eq!(canonical_order(&decks), vec![a.id, b.id]);
    }
}
