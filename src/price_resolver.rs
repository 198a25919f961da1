//! Price lookup with provider selection, registry-order fallback and a
//! session cache.

use std::collections::HashMap;

use log::{debug, info, warn};

use crate::api::scryfall::{self, ScryfallCard, SCRYFALL_API};
use crate::models::CardEntry;

/// A price source read out of the raw prices map of a printing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceProvider {
    /// Stable identifier used in CLI flags and cache keys.
    pub id: &'static str,
    /// Display name used in reports and fallback reasons.
    pub name: &'static str,
    /// Base price field this provider reads.
    pub field: &'static str,
    /// Currency label attached to resolved prices.
    pub currency: &'static str,
}

/// Built-in providers, in fallback priority order.
pub const DEFAULT_PROVIDERS: &[PriceProvider] = &[
    PriceProvider {
        id: "tcgplayer",
        name: "TCGplayer",
        field: "usd",
        currency: "USD",
    },
    PriceProvider {
        id: "cardmarket",
        name: "Cardmarket",
        field: "eur",
        currency: "EUR",
    },
    PriceProvider {
        id: "cardhoarder",
        name: "Cardhoarder",
        field: "tix",
        currency: "TIX",
    },
];

/// Outcome of one price resolution.
///
/// Failures are data, not errors: a transport problem or an unknown
/// provider lands in `error` with `price` left empty, so one bad lookup
/// never aborts a whole report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceDecision {
    pub price: Option<String>,
    /// Display name of the provider that supplied the price, the
    /// requested one unless a fallback occurred.
    pub provider: String,
    pub currency: String,
    pub is_fallback: bool,
    pub fallback_reason: Option<String>,
    /// Name and set of the printing that was actually priced.
    pub card_name: String,
    pub set_code: String,
    pub error: Option<String>,
}

/// Resolves card prices, walking the provider registry when the
/// requested provider has no price and caching every decision for the
/// session.
pub struct PriceResolver {
    providers: Vec<PriceProvider>,
    base_url: String,
    cache: HashMap<String, PriceDecision>,
}

impl Default for PriceResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceResolver {
    /// Creates a resolver over the built-in provider registry.
    pub fn new() -> Self {
        Self::with_providers(DEFAULT_PROVIDERS.to_vec())
    }

    /// Creates a resolver over a custom registry. Registry order is
    /// fallback priority order.
    pub fn with_providers(providers: Vec<PriceProvider>) -> Self {
        Self {
            providers,
            base_url: SCRYFALL_API.to_string(),
            cache: HashMap::new(),
        }
    }

    /// Points the resolver at a different price source (for testing with
    /// mock servers).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    /// Looks up a provider by id.
    pub fn provider(&self, id: &str) -> Option<&PriceProvider> {
        self.providers.iter().find(|p| p.id == id)
    }

    /// Drops every cached decision, successes and failures alike.
    pub fn clear_cache(&mut self) {
        debug!("Clearing {} cached price decisions", self.cache.len());
        self.cache.clear();
    }

    /// Resolves the price of one card.
    ///
    /// Decisions are cached under the card identity, the requested
    /// provider and the fallback setting; repeated calls with the same
    /// inputs return the first decision without another request.
    pub async fn resolve(
        &mut self,
        card: &CardEntry,
        provider_id: &str,
        use_fallback: bool,
    ) -> PriceDecision {
        let key = cache_key(card, provider_id, use_fallback);
        if let Some(cached) = self.cache.get(&key) {
            debug!("Price cache hit for {}", key);
            return cached.clone();
        }

        let decision = self.lookup(card, provider_id, use_fallback).await;
        self.cache.insert(key, decision.clone());
        decision
    }

    async fn lookup(&self, card: &CardEntry, provider_id: &str, use_fallback: bool) -> PriceDecision {
        let requested = match self.provider(provider_id) {
            Some(provider) => *provider,
            None => {
                warn!("Unknown price provider requested: {}", provider_id);
                return PriceDecision {
                    price: None,
                    provider: provider_id.to_string(),
                    currency: String::new(),
                    is_fallback: false,
                    fallback_reason: None,
                    card_name: card.name.clone(),
                    set_code: card.set_code.clone(),
                    error: Some(format!("unknown price provider: {}", provider_id)),
                };
            }
        };

        let candidates =
            match scryfall::search_cards_from(&self.base_url, &card.name, &card.set_code).await {
                Ok(candidates) => candidates,
                Err(e) => {
                    warn!("Price lookup failed for {}: {}", card.name, e);
                    return failure(card, &requested, e.to_string());
                }
            };

        let printing = match best_candidate(&candidates, &card.set_code) {
            Some(printing) => printing,
            None => {
                info!("No printings found for {}", card.name);
                return failure(
                    card,
                    &requested,
                    format!("no printings found for {}", card.name),
                );
            }
        };

        if let Some(price) = select_price(&requested, &printing.prices, card.foil, card.etched) {
            return PriceDecision {
                price: Some(price),
                provider: requested.name.to_string(),
                currency: requested.currency.to_string(),
                is_fallback: false,
                fallback_reason: None,
                card_name: printing.name.clone(),
                set_code: printing.set.clone(),
                error: None,
            };
        }

        if use_fallback {
            for provider in self.providers.iter().filter(|p| p.id != requested.id) {
                if let Some(price) = select_price(provider, &printing.prices, card.foil, card.etched)
                {
                    warn!(
                        "{} has no price for {}, falling back to {}",
                        requested.name, card.name, provider.name
                    );
                    return PriceDecision {
                        price: Some(price),
                        provider: provider.name.to_string(),
                        currency: provider.currency.to_string(),
                        is_fallback: true,
                        fallback_reason: Some(format!(
                            "{} price unavailable, using {}",
                            requested.name, provider.name
                        )),
                        card_name: printing.name.clone(),
                        set_code: printing.set.clone(),
                        error: None,
                    };
                }
            }
            debug!("No provider has a price for {}", card.name);
        }

        PriceDecision {
            price: None,
            provider: requested.name.to_string(),
            currency: requested.currency.to_string(),
            is_fallback: false,
            fallback_reason: None,
            card_name: printing.name.clone(),
            set_code: printing.set.clone(),
            error: None,
        }
    }
}

fn failure(card: &CardEntry, requested: &PriceProvider, message: String) -> PriceDecision {
    PriceDecision {
        price: None,
        provider: requested.name.to_string(),
        currency: requested.currency.to_string(),
        is_fallback: false,
        fallback_reason: None,
        card_name: card.name.clone(),
        set_code: card.set_code.clone(),
        error: Some(message),
    }
}

fn cache_key(card: &CardEntry, provider_id: &str, use_fallback: bool) -> String {
    format!(
        "{}|{}|{}|{}|{}|{}",
        card.name.to_lowercase(),
        card.set_code.to_lowercase(),
        card.foil,
        card.etched,
        provider_id,
        if use_fallback { "fallback" } else { "direct" },
    )
}

/// Picks the printing to price: an exact set match when the card carries
/// a set code, otherwise the first candidate returned.
fn best_candidate<'a>(candidates: &'a [ScryfallCard], set_code: &str) -> Option<&'a ScryfallCard> {
    if !set_code.is_empty() {
        if let Some(exact) = candidates.iter().find(|c| c.set.eq_ignore_ascii_case(set_code)) {
            return Some(exact);
        }
    }
    candidates.first()
}

/// Price fields to probe for a provider, most preferred first.
///
/// The USD family has an etched-specific field; the EUR and Tix families
/// key on foil alone, an etched request reads their plain fields. Other
/// providers probe `<base>` and `<base>_foil`: a foil request prefers
/// the foil field, a plain request starts at the base field but still
/// takes a foil price over none.
fn price_fields(field: &str, foil: bool, etched: bool) -> Vec<String> {
    match field {
        "usd" => {
            if etched {
                vec!["usd_etched".into(), "usd_foil".into(), "usd".into()]
            } else if foil {
                vec!["usd_foil".into(), "usd".into()]
            } else {
                vec!["usd".into()]
            }
        }
        "eur" => {
            if foil {
                vec!["eur_foil".into(), "eur".into()]
            } else {
                vec!["eur".into()]
            }
        }
        "tix" => {
            if foil {
                vec!["tix_foil".into(), "tix".into()]
            } else {
                vec!["tix".into()]
            }
        }
        other => {
            if foil {
                vec![format!("{}_foil", other), other.to_string()]
            } else {
                vec![other.to_string(), format!("{}_foil", other)]
            }
        }
    }
}

/// Applies a provider's field rule to a raw prices map. Fields that are
/// absent or null are skipped.
fn select_price(
    provider: &PriceProvider,
    prices: &HashMap<String, Option<String>>,
    foil: bool,
    etched: bool,
) -> Option<String> {
    price_fields(provider.field, foil, etched)
        .iter()
        .find_map(|field| prices.get(field).and_then(|price| price.clone()))
}

#[cfg(test)]
#[path = "price_resolver_tests.rs"]
mod tests;
