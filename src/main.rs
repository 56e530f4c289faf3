//! check_prices - console entry point
//!
//! Loads the marketplace catalog once, then checks each requested item
//! sequentially and prints a report block per item.

use check_prices::{
    format_report, parse_queries, run_query, CatalogIndex, OrderBookClient, CNY_TO_USD,
};
use clap::Parser;
use std::io;

/// CS2 price checker - resolves item names and reports Buff163 buy/sell prices
#[derive(Parser, Debug)]
#[command(name = "check_prices")]
#[command(version, about, long_about = None)]
struct Args {
    /// Item name(s), separated by ';' (prompted on stdin when omitted)
    queries: Option<String>,

    /// CNY to USD conversion rate applied to all prices
    #[arg(long, default_value_t = CNY_TO_USD)]
    rate: f64,
}

fn main() {
    // Initialize logger. Set RUST_LOG environment variable to control log level.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let catalog = match CatalogIndex::fetch() {
        Ok(catalog) => catalog,
        Err(e) => {
            log::error!("Failed to load marketplace catalog: {}", e);
            eprintln!("Failed to load marketplace catalog: {}", e);
            std::process::exit(1);
        }
    };

    let input = match args.queries {
        Some(queries) => queries,
        None => prompt_for_queries(),
    };

    let queries = parse_queries(&input);
    if queries.is_empty() {
        return;
    }

    let client = OrderBookClient::new();
    for query in &queries {
        match run_query(&catalog, &client, query, args.rate) {
            Some(report) => {
                println!();
                print!("{}", format_report(&report));
            }
            None => println!("No goods id found for '{}'", query),
        }
    }
}

fn prompt_for_queries() -> String {
    println!("Enter item name(s) (separate multiple items with ';'):");
    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_err() {
        return String::new();
    }
    line
}
