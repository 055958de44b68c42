use indexmap::IndexSet;
use tracing::{info, trace};

use crate::card::{Card, CardId};
use crate::deck::{canonical_order, Deck, DeckId};

/// The card to serve, plus the new sticky deck pointer when it moved.
/// The caller persists the pointer; the selector itself writes nothing.
#[derive(Clone, Debug, PartialEq)]
pub struct Selection {
    pub card: Card,
    pub new_active_deck: Option<DeckId>,
}

/// Picks the next card to serve from the due pool.
///
/// The active deck is sticky: as long as it still has a due, non-snoozed
/// card, it keeps serving, so the user finishes one deck before the next one
/// starts. Only an exhausted (or vanished) deck advances the pointer, which
/// walks the canonical deck order and wraps.
///
/// `due_cards` is expected in review order already; within the chosen deck
/// the first card wins.
pub fn select_next(
    due_cards: &[Card],
    decks: &[Deck],
    active_deck: Option<DeckId>,
    is_snoozed: impl Fn(CardId) -> bool,
) -> Option<Selection> {
    let available: Vec<&Card> = due_cards.iter().filter(|card| !is_snoozed(card.id)).collect();

    if available.is_empty() {
        trace!("nothing due that isn't snoozed");
        return None;
    }

    // canonical order over the known decks, then decks we only know from
    // their cards, in the order the cards showed up
    let mut order: IndexSet<DeckId> = canonical_order(decks).into_iter().collect();

    for card in &available {
        order.insert(card.deck);
    }

    let has_available = |deck: &DeckId| available.iter().any(|card| card.deck == *deck);

    // a pointer to a deck that no longer exists means no pointer
    let active = active_deck.filter(|deck| order.contains(deck));

    let selected = match active {
        Some(deck) if has_available(&deck) => deck,
        Some(deck) => {
            // walk the order after the exhausted deck, wrapping
            let start = order.get_index_of(&deck).unwrap_or(0);

            order
                .iter()
                .cycle()
                .skip(start + 1)
                .take(order.len())
                .find(|deck| has_available(deck))
                .copied()?
        }
        None => *order.iter().find(|deck| has_available(deck))?,
    };

    let new_active_deck = (active_deck != Some(selected)).then_some(selected);

    if new_active_deck.is_some() {
        info!("active deck moved to {selected}");
    }

    let card = available.iter().find(|card| card.deck == selected)?;

    Some(Selection {
        card: (*card).clone(),
        new_active_deck,
    })
}
