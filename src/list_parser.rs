//! List-level parsing: splits a pasted block into lines, applies the
//! line grammar and collects cards and per-line errors.

use log::debug;

use crate::line_parser::parse_line;
use crate::models::{ParseError, ParsedList};

/// Header token marking the start of the sideboard region in deck
/// exports. Matched case-insensitively anywhere in the line, so both
/// `SIDEBOARD:` and `// Sideboard` style headers count.
const SIDEBOARD_HEADER: &str = "SIDEBOARD";

const UNRECOGNIZED_LINE: &str = "unrecognized line format";

/// Parses a whole list text into cards plus per-line errors.
///
/// Blank lines are skipped. A sideboard header line is never parsed as a
/// card; with `ignore_sideboard` set, every line after the first header
/// is skipped too. Unreadable lines become errors carrying their 1-based
/// line number and do not stop the scan.
pub fn parse_list(text: &str, ignore_sideboard: bool) -> ParsedList {
    let mut cards = Vec::new();
    let mut errors = Vec::new();
    let mut in_sideboard = false;

    for (index, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        if line.to_uppercase().contains(SIDEBOARD_HEADER) {
            debug!("Sideboard region starts at line {}", index + 1);
            in_sideboard = true;
            continue;
        }
        if in_sideboard && ignore_sideboard {
            continue;
        }
        match parse_line(line) {
            Some(card) => cards.push(card),
            None => errors.push(ParseError {
                line: index + 1,
                content: line.to_string(),
                message: UNRECOGNIZED_LINE.to_string(),
            }),
        }
    }

    debug!(
        "Parsed {} cards and {} bad lines",
        cards.len(),
        errors.len()
    );
    ParsedList { cards, errors }
}

#[cfg(test)]
#[path = "list_parser_tests.rs"]
mod tests;
