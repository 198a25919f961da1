//! Line grammar for wantslist and collection entries.
//!
//! One line describes one card: `[quantity] name [(SET)] [number] [*F*]`.
//! Quantity, set and collector number are each optional, which makes the
//! grammar ambiguous. Resolution is an ordered list of shapes tried from
//! most specific to least, first accepted shape wins. The shapes without
//! a parenthesized set carry validity guards so that the last word of a
//! card name is not misread as a collector number.

use lazy_static::lazy_static;
use log::debug;
use regex::{Captures, Regex};

use crate::models::CardEntry;

/// Collector numbers use digits, uppercase letters, dashes and the ★
/// variant glyph, optionally followed by a lowercase variant suffix
/// (`"42a"`). The suffix is only legal next to a parenthesized set,
/// where it cannot be confused with an ordinary word.
const NUMBER_TOKEN: &str = r"[0-9A-Z★\-]+[a-z]*";
const FINISH_TOKEN: &str = r"(?:\s+\*([A-Za-z])\*)?";

/// The field layout of one grammar shape. Shapes are tried in the
/// declaration order of the table below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineShape {
    QtyNameSetNumber,
    NameSetNumber,
    QtyNameNumber,
    NameNumber,
    QtyNameSet,
    NameSet,
    QtyName,
    NameOnly,
}

lazy_static! {
    static ref SHAPES: Vec<(Regex, LineShape)> = vec![
        (
            Regex::new(&format!(
                r"^(\d+)\s+(.+?)\s+\(([^)]*)\)\s+({NUMBER_TOKEN}){FINISH_TOKEN}$"
            ))
            .unwrap(),
            LineShape::QtyNameSetNumber,
        ),
        (
            Regex::new(&format!(
                r"^(.+?)\s+\(([^)]*)\)\s+({NUMBER_TOKEN}){FINISH_TOKEN}$"
            ))
            .unwrap(),
            LineShape::NameSetNumber,
        ),
        (
            Regex::new(&format!(r"^(\d+)\s+(.+?)\s+(\S+){FINISH_TOKEN}$")).unwrap(),
            LineShape::QtyNameNumber,
        ),
        (
            Regex::new(&format!(r"^(.+?)\s+(\S+){FINISH_TOKEN}$")).unwrap(),
            LineShape::NameNumber,
        ),
        (
            Regex::new(&format!(r"^(\d+)\s+(.+?)\s+\(([^)]*)\){FINISH_TOKEN}$")).unwrap(),
            LineShape::QtyNameSet,
        ),
        (
            Regex::new(&format!(r"^(.+?)\s+\(([^)]*)\){FINISH_TOKEN}$")).unwrap(),
            LineShape::NameSet,
        ),
        (Regex::new(r"^(\d+)\s+(.+)$").unwrap(), LineShape::QtyName),
        (Regex::new(r"^(.+)$").unwrap(), LineShape::NameOnly),
    ];
}

/// Parses one trimmed line into a card entry.
///
/// Returns `None` when no shape accepts the line, including the empty
/// line. Quantity defaults to 1 when the line carries none.
pub fn parse_line(line: &str) -> Option<CardEntry> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    for (pattern, shape) in SHAPES.iter() {
        if let Some(caps) = pattern.captures(line) {
            if let Some(card) = build_entry(*shape, &caps) {
                debug!("Line '{}' parsed as {:?}", line, shape);
                return Some(card);
            }
            // Guard rejected the shape, keep trying less specific ones.
        }
    }

    debug!("No grammar shape accepted line '{}'", line);
    None
}

fn build_entry(shape: LineShape, caps: &Captures) -> Option<CardEntry> {
    match shape {
        LineShape::QtyNameSetNumber => Some(entry(
            quantity(caps, 1)?,
            &caps[2],
            &caps[3],
            &caps[4],
            finish_flags(caps, 5),
        )),
        LineShape::NameSetNumber => {
            Some(entry(1, &caps[1], &caps[2], &caps[3], finish_flags(caps, 4)))
        }
        LineShape::QtyNameNumber => {
            let number = &caps[3];
            if !is_bare_number_token(number) {
                return None;
            }
            Some(entry(
                quantity(caps, 1)?,
                &caps[2],
                "",
                number,
                finish_flags(caps, 4),
            ))
        }
        LineShape::NameNumber => {
            let number = &caps[2];
            if !is_bare_number_token(number) {
                return None;
            }
            Some(entry(1, &caps[1], "", number, finish_flags(caps, 3)))
        }
        LineShape::QtyNameSet => Some(entry(
            quantity(caps, 1)?,
            &caps[2],
            &caps[3],
            "",
            finish_flags(caps, 4),
        )),
        LineShape::NameSet => Some(entry(1, &caps[1], &caps[2], "", finish_flags(caps, 3))),
        LineShape::QtyName => {
            let name = &caps[2];
            if !is_plausible_name(name) {
                return None;
            }
            Some(entry(quantity(caps, 1)?, name, "", "", (false, false)))
        }
        LineShape::NameOnly => {
            let name = &caps[1];
            if !is_plausible_name(name) {
                return None;
            }
            Some(entry(1, name, "", "", (false, false)))
        }
    }
}

fn entry(quantity: u32, name: &str, set: &str, number: &str, finish: (bool, bool)) -> CardEntry {
    CardEntry {
        quantity,
        name: name.trim().to_string(),
        set_code: set.trim().to_string(),
        collector_number: number.to_string(),
        foil: finish.0,
        etched: finish.1,
    }
}

fn quantity(caps: &Captures, group: usize) -> Option<u32> {
    caps[group].parse().ok()
}

/// Maps the one-letter finish marker to (foil, etched). Markers other
/// than `F` and `E` are accepted but set neither flag.
fn finish_flags(caps: &Captures, group: usize) -> (bool, bool) {
    match caps.get(group).map(|m| m.as_str()) {
        Some("F") => (true, false),
        Some("E") => (false, true),
        _ => (false, false),
    }
}

/// A trailing token only counts as a collector number when every
/// character is in the number alphabet. Without a set on the line, a
/// lowercase variant suffix is not allowed, otherwise the last word of
/// most card names would qualify.
fn is_bare_number_token(token: &str) -> bool {
    !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase() || c == '★' || c == '-')
}

/// The bare-name shapes reject leftovers of more specific shapes: names
/// with parentheses, finish markers or digits, and tokens that read as a
/// collector number on their own.
fn is_plausible_name(name: &str) -> bool {
    if name.contains('(') || name.contains(')') || name.contains('*') {
        return false;
    }
    if name.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }
    !is_bare_number_token(name)
}

#[cfg(test)]
#[path = "line_parser_tests.rs"]
mod tests;
