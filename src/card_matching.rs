//! Reconciles a wantslist against a collection.
//!
//! Collection records are aggregated under a canonical key, so printings
//! that canonicalize identically are interchangeable stock. Wants whose
//! key is absent get a scan for same-name near misses, reported with the
//! first field that differs.

use std::collections::HashMap;

use log::debug;

use crate::models::CardEntry;

/// Placeholder for empty set and collector number fields, so two records
/// that both leave a field unspecified still agree on it.
const UNKNOWN_FIELD: &str = "unknown";

/// A wantslist entry satisfied, fully or partly, by the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardMatch {
    pub wanted: CardEntry,
    /// Aggregated collection record sharing the canonical key.
    pub owned: CardEntry,
    /// `min(wanted, available)` copies.
    pub matched_quantity: u32,
    pub available_quantity: u32,
}

/// A collection card sharing a missing want's name but differing in an
/// identity field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialMatch {
    pub owned: CardEntry,
    /// Names the first differing field and both values.
    pub reason: String,
}

/// A wantslist entry, or the remainder of one, the collection cannot
/// cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingCard {
    /// The want with its quantity replaced by the unmet amount.
    pub card: CardEntry,
    pub needed_quantity: u32,
    /// Same-name near misses, empty for plain shortfalls.
    pub partial_matches: Vec<PartialMatch>,
}

/// Outcome of one wantslist/collection comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompareResult {
    pub matches: Vec<CardMatch>,
    pub missing: Vec<MissingCard>,
}

/// Derives the equivalence key of a card.
///
/// With `ignore_edition` the key is the lowercased name alone. Otherwise
/// set, collector number and both finish flags join it, with empty
/// fields mapped to a fixed placeholder. Quantity never participates.
pub fn canonical_key(card: &CardEntry, ignore_edition: bool) -> String {
    let name = card.name.to_lowercase();
    if ignore_edition {
        return name;
    }
    format!(
        "{}|{}|{}|{}|{}",
        name,
        field_or_unknown(&card.set_code).to_lowercase(),
        field_or_unknown(&card.collector_number).to_lowercase(),
        if card.foil { "foil" } else { "nonfoil" },
        if card.etched { "etched" } else { "nonetched" },
    )
}

/// Compares a wantslist against a collection.
///
/// Every want is checked against the full collection; copies are not
/// consumed, so two wants for the same printing both see the whole
/// stock. A want with more copies than stock produces both a match for
/// the covered part and a missing entry for the rest.
pub fn compare_lists(
    wants: &[CardEntry],
    collection: &[CardEntry],
    ignore_edition: bool,
) -> CompareResult {
    let mut stock: HashMap<String, CardEntry> = HashMap::new();
    for card in collection {
        stock
            .entry(canonical_key(card, ignore_edition))
            .and_modify(|aggregated| aggregated.quantity += card.quantity)
            .or_insert_with(|| card.clone());
    }
    debug!(
        "Aggregated {} collection cards into {} stock entries",
        collection.len(),
        stock.len()
    );

    let mut result = CompareResult::default();

    for wanted in wants {
        let key = canonical_key(wanted, ignore_edition);
        match stock.get(&key) {
            Some(owned) => {
                let matched_quantity = wanted.quantity.min(owned.quantity);
                debug!(
                    "Matched {} x {} ({} in stock)",
                    matched_quantity, wanted.name, owned.quantity
                );
                result.matches.push(CardMatch {
                    wanted: wanted.clone(),
                    owned: owned.clone(),
                    matched_quantity,
                    available_quantity: owned.quantity,
                });
                if wanted.quantity > owned.quantity {
                    let needed_quantity = wanted.quantity - owned.quantity;
                    let mut card = wanted.clone();
                    card.quantity = needed_quantity;
                    result.missing.push(MissingCard {
                        card,
                        needed_quantity,
                        partial_matches: Vec::new(),
                    });
                }
            }
            None => {
                result.missing.push(MissingCard {
                    card: wanted.clone(),
                    needed_quantity: wanted.quantity,
                    partial_matches: find_partial_matches(wanted, collection),
                });
            }
        }
    }

    result
}

fn find_partial_matches(wanted: &CardEntry, collection: &[CardEntry]) -> Vec<PartialMatch> {
    // Lowercased comparison, not ASCII folding, so the scan agrees with
    // key construction on non-ASCII names.
    let wanted_name = wanted.name.to_lowercase();
    collection
        .iter()
        .filter(|owned| owned.name.to_lowercase() == wanted_name)
        .map(|owned| PartialMatch {
            owned: owned.clone(),
            reason: classify_difference(wanted, owned),
        })
        .collect()
}

/// Names the first identity field that differs, checked in the order
/// set, collector number, foil, etched.
fn classify_difference(wanted: &CardEntry, owned: &CardEntry) -> String {
    if !wanted.set_code.eq_ignore_ascii_case(&owned.set_code) {
        return format!(
            "different set ({} vs {})",
            field_or_unknown(&wanted.set_code),
            field_or_unknown(&owned.set_code)
        );
    }
    if !wanted
        .collector_number
        .eq_ignore_ascii_case(&owned.collector_number)
    {
        return format!(
            "different collector number ({} vs {})",
            field_or_unknown(&wanted.collector_number),
            field_or_unknown(&owned.collector_number)
        );
    }
    if wanted.foil != owned.foil {
        return format!(
            "different finish ({} vs {})",
            finish_label(wanted.foil, "foil"),
            finish_label(owned.foil, "foil")
        );
    }
    if wanted.etched != owned.etched {
        return format!(
            "different finish ({} vs {})",
            finish_label(wanted.etched, "etched"),
            finish_label(owned.etched, "etched")
        );
    }
    // Key missed but no single field differs.
    "different edition".to_string()
}

fn field_or_unknown(value: &str) -> &str {
    if value.is_empty() {
        UNKNOWN_FIELD
    } else {
        value
    }
}

fn finish_label(set: bool, kind: &str) -> String {
    if set {
        kind.to_string()
    } else {
        format!("non-{}", kind)
    }
}

#[cfg(test)]
#[path = "card_matching_tests.rs"]
mod tests;
