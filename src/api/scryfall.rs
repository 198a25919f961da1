//! Scryfall search client used for price lookups.
//!
//! Uses async reqwest for non-blocking HTTP requests.

use std::collections::HashMap;

use log::info;
use serde::Deserialize;

use crate::error::{CheckerError, Result};

/// Production Scryfall API endpoint.
pub const SCRYFALL_API: &str = "https://api.scryfall.com";

const USER_AGENT: &str = "WantslistChecker/1.0";

/// One candidate printing from a search response.
#[derive(Debug, Clone, Deserialize)]
pub struct ScryfallCard {
    pub name: String,
    /// Set code, lowercase on the wire.
    pub set: String,
    pub collector_number: String,
    /// Raw price map. Kept untyped because provider field selection
    /// walks `<base>`, `<base>_foil` and `<base>_etched` names
    /// data-driven, and absent prices arrive as JSON null.
    #[serde(default)]
    pub prices: HashMap<String, Option<String>>,
}

/// Paged search envelope. Only the first page is consumed.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    data: Vec<ScryfallCard>,
}

/// Scryfall API error response
#[derive(Debug, Deserialize)]
struct ScryfallError {
    code: String,
    details: String,
}

/// Searches for printings of a card by exact name, optionally narrowed
/// to one set.
pub async fn search_cards(name: &str, set_code: &str) -> Result<Vec<ScryfallCard>> {
    search_cards_from(SCRYFALL_API, name, set_code).await
}

/// Searches against the given base URL (for testing with mock servers).
pub(crate) async fn search_cards_from(
    base_url: &str,
    name: &str,
    set_code: &str,
) -> Result<Vec<ScryfallCard>> {
    let mut query = format!("!\"{}\"", name);
    if !set_code.is_empty() {
        query.push_str(&format!(" set:{}", set_code.to_lowercase()));
    }
    let url = format!(
        "{}/cards/search?q={}&unique=prints",
        base_url,
        urlencoding::encode(&query)
    );

    info!("Searching Scryfall for {}", query);

    let response = reqwest::Client::new()
        .get(&url)
        .header("User-Agent", USER_AGENT)
        .send()
        .await?;

    if response.status().is_success() {
        let page: SearchResponse = response.json().await?;
        Ok(page.data)
    } else {
        let status = response.status();
        match response.json::<ScryfallError>().await {
            Ok(error) => Err(CheckerError::ApiResponse {
                code: error.code,
                details: error.details,
            }),
            Err(_) => Err(CheckerError::HttpStatus(status)),
        }
    }
}

#[cfg(test)]
#[path = "scryfall_tests.rs"]
mod tests;
