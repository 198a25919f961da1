//! Command line entry point: compares a wantslist against a collection
//! export and optionally looks up prices for the missing cards.

use clap::Parser;
use log::{error, info};

use wantslist_checker::{
    compare_lists, format_price_report, format_report, read_list, PriceResolver,
    DEFAULT_PROVIDERS,
};

#[derive(Parser, Debug)]
#[command(name = "wantslist_checker")]
#[command(about = "Compares an MTG wantslist against a collection list", version)]
struct Args {
    /// Path to the wantslist text file, one card per line
    wantslist: String,

    /// Path to the collection text file, same line format
    collection: String,

    /// Match on card name only, ignoring set, number and finish
    #[arg(long)]
    ignore_edition: bool,

    /// Skip everything after a sideboard header in both lists
    #[arg(long)]
    ignore_sideboard: bool,

    /// Look up prices for the missing cards
    #[arg(long)]
    prices: bool,

    /// Price provider: tcgplayer, cardmarket or cardhoarder
    #[arg(long, default_value = "tcgplayer")]
    provider: String,

    /// Do not try other providers when the requested one has no price
    #[arg(long)]
    no_fallback: bool,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if args.prices && DEFAULT_PROVIDERS.iter().all(|p| p.id != args.provider) {
        error!(
            "Unknown price provider '{}', expected one of: {}",
            args.provider,
            DEFAULT_PROVIDERS
                .iter()
                .map(|p| p.id)
                .collect::<Vec<_>>()
                .join(", ")
        );
        std::process::exit(1);
    }

    let wants = match read_list(&args.wantslist, args.ignore_sideboard) {
        Ok(list) => list,
        Err(e) => {
            error!("Failed to read wantslist {}: {}", args.wantslist, e);
            std::process::exit(1);
        }
    };
    let collection = match read_list(&args.collection, args.ignore_sideboard) {
        Ok(list) => list,
        Err(e) => {
            error!("Failed to read collection {}: {}", args.collection, e);
            std::process::exit(1);
        }
    };

    info!(
        "Comparing {} wanted cards against {} collection cards",
        wants.cards.len(),
        collection.cards.len()
    );

    let result = compare_lists(&wants.cards, &collection.cards, args.ignore_edition);
    print!("{}", format_report(&result, &wants.errors, &collection.errors));

    if args.prices && !result.missing.is_empty() {
        let mut resolver = PriceResolver::new();
        let mut priced = Vec::new();
        for missing in &result.missing {
            let decision = resolver
                .resolve(&missing.card, &args.provider, !args.no_fallback)
                .await;
            priced.push((missing.card.clone(), decision));
        }
        print!("{}", format_price_report(&priced));
    }
}
