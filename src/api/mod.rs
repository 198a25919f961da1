//! API clients for external services (Scryfall)

pub mod scryfall;

pub use scryfall::{search_cards, ScryfallCard};
