use super::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn want(name: &str, set: &str) -> CardEntry {
    CardEntry {
        quantity: 1,
        name: name.to_string(),
        set_code: set.to_string(),
        collector_number: String::new(),
        foil: false,
        etched: false,
    }
}

fn printing(name: &str, set: &str, prices: serde_json::Value) -> serde_json::Value {
    json!({
        "name": name,
        "set": set,
        "collector_number": "1",
        "prices": prices,
    })
}

fn search_body(cards: Vec<serde_json::Value>) -> serde_json::Value {
    json!({
        "object": "list",
        "total_cards": cards.len(),
        "has_more": false,
        "data": cards,
    })
}

async fn mock_search(server: &MockServer, body: serde_json::Value, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/cards/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(expected_calls)
        .mount(server)
        .await;
}

mod field_selection_tests {
    use super::*;

    fn price_map(pairs: &[(&str, Option<&str>)]) -> HashMap<String, Option<String>> {
        pairs
            .iter()
            .map(|(field, value)| (field.to_string(), value.map(String::from)))
            .collect()
    }

    fn usd() -> PriceProvider {
        DEFAULT_PROVIDERS[0]
    }

    fn eur() -> PriceProvider {
        DEFAULT_PROVIDERS[1]
    }

    fn tix() -> PriceProvider {
        DEFAULT_PROVIDERS[2]
    }

    fn shop() -> PriceProvider {
        PriceProvider {
            id: "shopsite",
            name: "ShopSite",
            field: "shop",
            currency: "SHP",
        }
    }

    #[test]
    fn usd_plain_reads_only_the_base_field() {
        let prices = price_map(&[("usd", None), ("usd_foil", Some("9.99"))]);
        assert_eq!(select_price(&usd(), &prices, false, false), None);
    }

    #[test]
    fn usd_foil_prefers_the_foil_field() {
        let prices = price_map(&[("usd", Some("1.00")), ("usd_foil", Some("9.99"))]);
        assert_eq!(
            select_price(&usd(), &prices, true, false),
            Some("9.99".to_string())
        );
    }

    #[test]
    fn usd_foil_falls_back_to_the_base_field() {
        let prices = price_map(&[("usd", Some("1.00")), ("usd_foil", None)]);
        assert_eq!(
            select_price(&usd(), &prices, true, false),
            Some("1.00".to_string())
        );
    }

    #[test]
    fn usd_etched_walks_etched_then_foil_then_base() {
        let full = price_map(&[
            ("usd", Some("1.00")),
            ("usd_foil", Some("9.99")),
            ("usd_etched", Some("4.50")),
        ]);
        assert_eq!(
            select_price(&usd(), &full, false, true),
            Some("4.50".to_string())
        );

        let no_etched = price_map(&[("usd", Some("1.00")), ("usd_foil", Some("9.99"))]);
        assert_eq!(
            select_price(&usd(), &no_etched, false, true),
            Some("9.99".to_string())
        );

        let base_only = price_map(&[("usd", Some("1.00"))]);
        assert_eq!(
            select_price(&usd(), &base_only, false, true),
            Some("1.00".to_string())
        );
    }

    #[test]
    fn eur_etched_request_reads_the_plain_field() {
        let prices = price_map(&[("eur", Some("2.00")), ("eur_etched", Some("8.00"))]);
        assert_eq!(
            select_price(&eur(), &prices, false, true),
            Some("2.00".to_string())
        );
    }

    #[test]
    fn eur_foil_order() {
        let prices = price_map(&[("eur", Some("2.00")), ("eur_foil", Some("7.00"))]);
        assert_eq!(
            select_price(&eur(), &prices, true, false),
            Some("7.00".to_string())
        );
    }

    #[test]
    fn tix_foil_falls_back_to_base() {
        let prices = price_map(&[("tix", Some("0.03"))]);
        assert_eq!(
            select_price(&tix(), &prices, true, false),
            Some("0.03".to_string())
        );
    }

    #[test]
    fn generic_foil_prefers_the_foil_field() {
        let prices = price_map(&[("shop", Some("1.00")), ("shop_foil", Some("3.00"))]);
        assert_eq!(
            select_price(&shop(), &prices, true, false),
            Some("3.00".to_string())
        );
    }

    #[test]
    fn generic_plain_prefers_base_but_takes_a_foil_price() {
        let both = price_map(&[("shop", Some("1.00")), ("shop_foil", Some("3.00"))]);
        assert_eq!(
            select_price(&shop(), &both, false, false),
            Some("1.00".to_string())
        );

        let foil_only = price_map(&[("shop", None), ("shop_foil", Some("3.00"))]);
        assert_eq!(
            select_price(&shop(), &foil_only, false, false),
            Some("3.00".to_string())
        );
    }

    #[test]
    fn empty_map_selects_nothing() {
        let prices = price_map(&[]);
        assert_eq!(select_price(&usd(), &prices, false, false), None);
        assert_eq!(select_price(&usd(), &prices, true, true), None);
    }
}

mod resolver_tests {
    use super::*;

    #[tokio::test]
    async fn returns_the_requested_provider_price() {
        let server = MockServer::start().await;
        let body = search_body(vec![printing(
            "Lightning Bolt",
            "m10",
            json!({"usd": "1.50", "eur": "1.20", "tix": "0.03"}),
        )]);
        mock_search(&server, body, 1).await;

        let mut resolver = PriceResolver::new().with_base_url(&server.uri());
        let decision = resolver
            .resolve(&want("Lightning Bolt", "M10"), "tcgplayer", true)
            .await;

        assert_eq!(decision.price, Some("1.50".to_string()));
        assert_eq!(decision.provider, "TCGplayer");
        assert_eq!(decision.currency, "USD");
        assert!(!decision.is_fallback);
        assert_eq!(decision.fallback_reason, None);
        assert_eq!(decision.card_name, "Lightning Bolt");
        assert_eq!(decision.set_code, "m10");
        assert_eq!(decision.error, None);
    }

    #[tokio::test]
    async fn falls_back_in_registry_order() {
        let server = MockServer::start().await;
        let body = search_body(vec![printing(
            "Lightning Bolt",
            "m10",
            json!({"usd": "0.47", "eur": null, "tix": null}),
        )]);
        mock_search(&server, body, 1).await;

        let mut resolver = PriceResolver::new().with_base_url(&server.uri());
        let decision = resolver
            .resolve(&want("Lightning Bolt", "M10"), "cardmarket", true)
            .await;

        assert_eq!(decision.price, Some("0.47".to_string()));
        assert_eq!(decision.provider, "TCGplayer");
        assert_eq!(decision.currency, "USD");
        assert!(decision.is_fallback);
        let reason = decision.fallback_reason.unwrap();
        assert!(reason.contains("Cardmarket"));
        assert!(reason.contains("TCGplayer"));
    }

    #[tokio::test]
    async fn disabled_fallback_returns_an_empty_decision() {
        let server = MockServer::start().await;
        let body = search_body(vec![printing(
            "Lightning Bolt",
            "m10",
            json!({"usd": "0.47", "eur": null}),
        )]);
        mock_search(&server, body, 1).await;

        let mut resolver = PriceResolver::new().with_base_url(&server.uri());
        let decision = resolver
            .resolve(&want("Lightning Bolt", "M10"), "cardmarket", false)
            .await;

        assert_eq!(decision.price, None);
        assert_eq!(decision.provider, "Cardmarket");
        assert!(!decision.is_fallback);
        assert_eq!(decision.error, None);
    }

    #[tokio::test]
    async fn exhausted_fallback_returns_an_empty_decision() {
        let server = MockServer::start().await;
        let body = search_body(vec![printing(
            "Lightning Bolt",
            "m10",
            json!({"usd": null, "eur": null, "tix": null}),
        )]);
        mock_search(&server, body, 1).await;

        let mut resolver = PriceResolver::new().with_base_url(&server.uri());
        let decision = resolver
            .resolve(&want("Lightning Bolt", "M10"), "tcgplayer", true)
            .await;

        assert_eq!(decision.price, None);
        assert!(!decision.is_fallback);
        assert_eq!(decision.error, None);
    }

    #[tokio::test]
    async fn caches_decisions_for_the_session() {
        let server = MockServer::start().await;
        let body = search_body(vec![printing(
            "Lightning Bolt",
            "m10",
            json!({"usd": "1.50"}),
        )]);
        mock_search(&server, body, 1).await;

        let mut resolver = PriceResolver::new().with_base_url(&server.uri());
        let card = want("Lightning Bolt", "M10");
        let first = resolver.resolve(&card, "tcgplayer", true).await;
        let second = resolver.resolve(&card, "tcgplayer", true).await;

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn failed_lookups_are_cached_too() {
        let server = MockServer::start().await;
        let body = json!({
            "object": "error",
            "code": "not_found",
            "details": "Your query didn't match any cards.",
        });
        Mock::given(method("GET"))
            .and(path("/cards/search"))
            .respond_with(ResponseTemplate::new(404).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;

        let mut resolver = PriceResolver::new().with_base_url(&server.uri());
        let card = want("No Such Card", "");
        let first = resolver.resolve(&card, "tcgplayer", true).await;
        let second = resolver.resolve(&card, "tcgplayer", true).await;

        assert!(first.error.is_some());
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn clear_cache_allows_a_refetch() {
        let server = MockServer::start().await;
        let body = search_body(vec![printing(
            "Lightning Bolt",
            "m10",
            json!({"usd": "1.50"}),
        )]);
        mock_search(&server, body, 2).await;

        let mut resolver = PriceResolver::new().with_base_url(&server.uri());
        let card = want("Lightning Bolt", "M10");
        resolver.resolve(&card, "tcgplayer", true).await;
        resolver.clear_cache();
        resolver.resolve(&card, "tcgplayer", true).await;
    }

    #[tokio::test]
    async fn providers_cache_separately() {
        let server = MockServer::start().await;
        let body = search_body(vec![printing(
            "Lightning Bolt",
            "m10",
            json!({"usd": "1.50", "eur": "1.20"}),
        )]);
        mock_search(&server, body, 2).await;

        let mut resolver = PriceResolver::new().with_base_url(&server.uri());
        let card = want("Lightning Bolt", "M10");
        let usd = resolver.resolve(&card, "tcgplayer", true).await;
        let eur = resolver.resolve(&card, "cardmarket", true).await;

        assert_eq!(usd.currency, "USD");
        assert_eq!(eur.currency, "EUR");
    }

    #[tokio::test]
    async fn prefers_the_exact_set_among_candidates() {
        let server = MockServer::start().await;
        let body = search_body(vec![
            printing("Lightning Bolt", "m11", json!({"usd": "9.99"})),
            printing("Lightning Bolt", "m10", json!({"usd": "1.50"})),
        ]);
        mock_search(&server, body, 1).await;

        let mut resolver = PriceResolver::new().with_base_url(&server.uri());
        let decision = resolver
            .resolve(&want("Lightning Bolt", "M10"), "tcgplayer", true)
            .await;

        assert_eq!(decision.price, Some("1.50".to_string()));
        assert_eq!(decision.set_code, "m10");
    }

    #[tokio::test]
    async fn takes_the_first_candidate_without_a_set() {
        let server = MockServer::start().await;
        let body = search_body(vec![
            printing("Lightning Bolt", "m11", json!({"usd": "9.99"})),
            printing("Lightning Bolt", "m10", json!({"usd": "1.50"})),
        ]);
        mock_search(&server, body, 1).await;

        let mut resolver = PriceResolver::new().with_base_url(&server.uri());
        let decision = resolver
            .resolve(&want("Lightning Bolt", ""), "tcgplayer", true)
            .await;

        assert_eq!(decision.price, Some("9.99".to_string()));
        assert_eq!(decision.set_code, "m11");
    }

    #[tokio::test]
    async fn lookup_failure_lands_in_the_decision() {
        let server = MockServer::start().await;
        let body = json!({
            "object": "error",
            "code": "not_found",
            "details": "Your query didn't match any cards.",
        });
        Mock::given(method("GET"))
            .and(path("/cards/search"))
            .respond_with(ResponseTemplate::new(404).set_body_json(body))
            .mount(&server)
            .await;

        let mut resolver = PriceResolver::new().with_base_url(&server.uri());
        let decision = resolver
            .resolve(&want("No Such Card", ""), "tcgplayer", true)
            .await;

        assert_eq!(decision.price, None);
        assert_eq!(decision.provider, "TCGplayer");
        assert!(decision.error.unwrap().contains("not_found"));
    }

    #[tokio::test]
    async fn empty_search_results_report_no_printings() {
        let server = MockServer::start().await;
        mock_search(&server, search_body(vec![]), 1).await;

        let mut resolver = PriceResolver::new().with_base_url(&server.uri());
        let decision = resolver
            .resolve(&want("Imaginary Card", ""), "tcgplayer", true)
            .await;

        assert_eq!(decision.price, None);
        assert!(decision.error.unwrap().contains("no printings found"));
    }

    #[tokio::test]
    async fn unknown_provider_never_queries_the_source() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_body(vec![])))
            .expect(0)
            .mount(&server)
            .await;

        let mut resolver = PriceResolver::new().with_base_url(&server.uri());
        let decision = resolver
            .resolve(&want("Lightning Bolt", "M10"), "stockfish", true)
            .await;

        assert_eq!(decision.price, None);
        assert_eq!(decision.provider, "stockfish");
        assert!(decision.error.unwrap().contains("unknown price provider"));
    }

    #[tokio::test]
    async fn foil_want_prices_the_foil_field() {
        let server = MockServer::start().await;
        let body = search_body(vec![printing(
            "Lightning Bolt",
            "m10",
            json!({"usd": "1.00", "usd_foil": "9.99"}),
        )]);
        mock_search(&server, body, 1).await;

        let mut resolver = PriceResolver::new().with_base_url(&server.uri());
        let card = CardEntry {
            foil: true,
            ..want("Lightning Bolt", "M10")
        };
        let decision = resolver.resolve(&card, "tcgplayer", true).await;

        assert_eq!(decision.price, Some("9.99".to_string()));
    }

    #[tokio::test]
    async fn custom_registry_defines_the_fallback_chain() {
        let server = MockServer::start().await;
        let body = search_body(vec![printing(
            "Lightning Bolt",
            "m10",
            json!({"shop": null, "bazaar": "2.50"}),
        )]);
        mock_search(&server, body, 1).await;

        let providers = vec![
            PriceProvider {
                id: "shopsite",
                name: "ShopSite",
                field: "shop",
                currency: "SHP",
            },
            PriceProvider {
                id: "bazaar",
                name: "Bazaar",
                field: "bazaar",
                currency: "BZR",
            },
        ];
        let mut resolver =
            PriceResolver::with_providers(providers).with_base_url(&server.uri());
        let decision = resolver
            .resolve(&want("Lightning Bolt", "M10"), "shopsite", true)
            .await;

        assert_eq!(decision.price, Some("2.50".to_string()));
        assert_eq!(decision.provider, "Bazaar");
        assert!(decision.is_fallback);
    }
}
