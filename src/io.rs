//! File loading for wantslist and collection text files.

use log::info;

use crate::error::Result;
use crate::list_parser::parse_list;
use crate::models::ParsedList;

/// Reads a card list file and parses it with the line grammar.
pub fn read_list(path: &str, ignore_sideboard: bool) -> Result<ParsedList> {
    let text = std::fs::read_to_string(path)?;
    let parsed = parse_list(&text, ignore_sideboard);
    info!(
        "Read {} cards from {} ({} unreadable lines)",
        parsed.cards.len(),
        path,
        parsed.errors.len()
    );
    Ok(parsed)
}
