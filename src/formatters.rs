//! Plain-text report rendering.

use crate::card_matching::{CompareResult, MissingCard};
use crate::models::{CardEntry, ParseError};
use crate::price_resolver::PriceDecision;

/// One-line display form of a card: name, set, number and finishes.
pub fn format_card(card: &CardEntry) -> String {
    let mut out = card.name.clone();
    if !card.set_code.is_empty() {
        out.push_str(&format!(" ({})", card.set_code));
    }
    if !card.collector_number.is_empty() {
        out.push_str(&format!(" {}", card.collector_number));
    }
    let finishes = card.special_finishes();
    if !finishes.is_empty() {
        out.push_str(&format!(" [{}]", finishes.join(", ")));
    }
    out
}

/// Renders the comparison outcome plus any unreadable input lines.
pub fn format_report(
    result: &CompareResult,
    wants_errors: &[ParseError],
    collection_errors: &[ParseError],
) -> String {
    let mut output = String::new();

    if result.matches.is_empty() {
        output.push_str("No cards from your wantslist were found in the collection.\n");
    } else {
        output.push_str("Found in collection:\n");
        for matched in &result.matches {
            output.push_str(&format!(
                "  {} x {} ({} in collection)\n",
                matched.matched_quantity,
                format_card(&matched.wanted),
                matched.available_quantity
            ));
        }
    }

    if !result.missing.is_empty() {
        output.push_str("\nMissing from collection:\n");
        for missing in &result.missing {
            output.push_str(&format_missing(missing));
        }
    }

    output.push_str(&format_parse_errors("wantslist", wants_errors));
    output.push_str(&format_parse_errors("collection", collection_errors));

    output
}

fn format_missing(missing: &MissingCard) -> String {
    let mut output = format!(
        "  {} x {}\n",
        missing.needed_quantity,
        format_card(&missing.card)
    );
    for partial in &missing.partial_matches {
        output.push_str(&format!(
            "      have instead: {} x {} ({})\n",
            partial.owned.quantity,
            format_card(&partial.owned),
            partial.reason
        ));
    }
    output
}

fn format_parse_errors(list_name: &str, errors: &[ParseError]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let mut output = format!("\nCould not read {} {} line(s):\n", errors.len(), list_name);
    for error in errors {
        output.push_str(&format!(
            "  line {}: {} ({})\n",
            error.line, error.content, error.message
        ));
    }
    output
}

/// Renders resolved prices for missing cards with per-currency totals.
pub fn format_price_report(priced: &[(CardEntry, PriceDecision)]) -> String {
    if priced.is_empty() {
        return String::new();
    }

    let mut output = String::from("\nPrices for missing cards:\n");
    let mut totals: Vec<(String, f64)> = Vec::new();

    for (card, decision) in priced {
        match (&decision.price, &decision.error) {
            (Some(price), _) => {
                let note = match &decision.fallback_reason {
                    Some(reason) if decision.is_fallback => format!(" ({})", reason),
                    _ => String::new(),
                };
                output.push_str(&format!(
                    "  {} x {}: {} {} each via {}{}\n",
                    card.quantity,
                    format_card(card),
                    price,
                    decision.currency,
                    decision.provider,
                    note
                ));
                if let Ok(value) = price.parse::<f64>() {
                    add_to_total(&mut totals, &decision.currency, value * card.quantity as f64);
                }
            }
            (None, Some(error)) => {
                output.push_str(&format!(
                    "  {} x {}: lookup failed ({})\n",
                    card.quantity,
                    format_card(card),
                    error
                ));
            }
            (None, None) => {
                output.push_str(&format!(
                    "  {} x {}: no price available\n",
                    card.quantity,
                    format_card(card)
                ));
            }
        }
    }

    if !totals.is_empty() {
        output.push_str("========================\n");
        for (currency, sum) in &totals {
            output.push_str(&format!("Total ({}): {:.2}\n", currency, sum));
        }
    }

    output
}

fn add_to_total(totals: &mut Vec<(String, f64)>, currency: &str, amount: f64) {
    match totals.iter_mut().find(|(label, _)| label == currency) {
        Some((_, sum)) => *sum += amount,
        None => totals.push((currency.to_string(), amount)),
    }
}

#[cfg(test)]
#[path = "formatters_tests.rs"]
mod tests;
