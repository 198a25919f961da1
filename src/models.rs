/// A single card entry from a wantslist or collection.
///
/// Built from one parsed text line, or supplied by an upstream adapter
/// that already normalized an API payload into these fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardEntry {
    /// Number of copies. Zero is legal and kept as-is.
    pub quantity: u32,
    /// Card name as written. Compared case-insensitively.
    pub name: String,
    /// Set/edition code, empty when unspecified.
    pub set_code: String,
    /// Collector number, empty when unspecified. May carry the ★ variant
    /// glyph and a lowercase variant suffix.
    pub collector_number: String,
    /// Plain foil finish.
    pub foil: bool,
    /// Etched finish. Independent of `foil`; upstream data may set both.
    pub etched: bool,
}

impl CardEntry {
    /// Returns the premium finishes of this card (e.g., "Foil", "Etched")
    pub fn special_finishes(&self) -> Vec<&'static str> {
        let mut finishes = Vec::new();
        if self.foil {
            finishes.push("Foil");
        }
        if self.etched {
            finishes.push("Etched");
        }
        finishes
    }
}

/// A line the list parser could not read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// 1-based line number in the input block.
    pub line: usize,
    /// The trimmed original line.
    pub content: String,
    /// Fixed diagnostic text.
    pub message: String,
}

/// Result of parsing one multi-line list block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedList {
    pub cards: Vec<CardEntry>,
    pub errors: Vec<ParseError>,
}
