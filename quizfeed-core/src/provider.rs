use std::time::Duration;

use crate::card::{Card, CardId};
use crate::deck::{Deck, DeckId};

/// Clock abstraction so "now" is injectable and tests can steer time.
pub trait TimeProvider {
    fn current_time(&self) -> Duration;
}

/// What the host's persistence layer must offer around the core. The core
/// never calls these itself; the host loads before and saves after each
/// core call, which keeps every core function pure and re-entrant.
pub trait CardStore {
    /// Cards with `due <= now`, in review order.
    fn load_due_cards(&self, now: Duration) -> Vec<Card>;

    fn load_decks(&self) -> Vec<Deck>;

    /// Whether the card is temporarily excluded from the due pool.
    fn is_snoozed(&self, id: CardId, now: Duration) -> bool;

    /// Single-key overwrite of the card snapshot.
    fn save_card(&self, card: Card);

    /// Single-key overwrite of the sticky deck pointer.
    fn save_active_deck(&self, deck: DeckId);
}
