//! Wantslist checker library
//!
//! Parses text-format card lists, reconciles a wantslist against a
//! collection and looks up prices for the cards still missing.

pub mod api;
pub mod card_matching;
pub mod error;
pub mod formatters;
pub mod io;
pub mod line_parser;
pub mod list_parser;
pub mod models;
pub mod price_resolver;

// Re-export commonly used items
pub use api::scryfall::{search_cards, ScryfallCard};
pub use card_matching::{
    canonical_key, compare_lists, CardMatch, CompareResult, MissingCard, PartialMatch,
};
pub use error::{CheckerError, Result};
pub use formatters::{format_card, format_price_report, format_report};
pub use io::read_list;
pub use line_parser::parse_line;
pub use list_parser::parse_list;
pub use models::{CardEntry, ParseError, ParsedList};
pub use price_resolver::{PriceDecision, PriceProvider, PriceResolver, DEFAULT_PROVIDERS};
