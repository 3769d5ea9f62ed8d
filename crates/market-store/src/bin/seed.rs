//! # Demo Cart Seeder
//!
//! Fills a cart database with demo products for development.
//!
//! ## Usage
//! ```bash
//! # Add 6 products (default) to the configured database
//! cargo run -p market-store --bin seed
//!
//! # Add a custom number of products
//! cargo run -p market-store --bin seed -- --count 12
//!
//! # Specify database path
//! cargo run -p market-store --bin seed -- --db ./data/cart.db
//! ```
//!
//! Running it twice against the same database raises quantities instead of
//! duplicating lines, since adds merge by product id.

use std::env;
use std::path::PathBuf;

use market_core::CatalogItem;
use market_store::{CartConfig, CartStore, SqliteConfig, SqliteStore};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

/// Demo catalog: (id, title, price)
const CATALOG: &[(&str, &str, f64)] = &[
    ("1", "Camiseta Hello World", 59.9),
    ("2", "Camiseta Ruby on Rails", 59.9),
    ("3", "Caneca Rust", 34.5),
    ("4", "Moletom Open Source", 149.0),
    ("5", "Boné GoStack", 45.0),
    ("6", "Adesivos Pack", 12.99),
    ("7", "Mochila Dev", 199.9),
    ("8", "Garrafa Térmica", 79.0),
];

const IMAGE_BASE: &str = "https://images.gomarketplace.dev/products";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut count: usize = 6;
    let mut db_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(6);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--config" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("GoMarketplace Demo Cart Seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>      Products to add (default: 6)");
                println!("  -d, --db <PATH>      Database file path (default: from config)");
                println!("      --config <PATH>  Config file (default: platform config dir)");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let config = CartConfig::load(config_path)?;
    let db_path = db_path
        .or_else(|| config.database_path())
        .unwrap_or_else(|| PathBuf::from("./cart_dev.db"));

    info!(db = %db_path.display(), key = %config.storage_key(), count, "Seeding cart");

    let kv = SqliteStore::open(SqliteConfig::new(&db_path)).await?;
    let cart = CartStore::new(kv.clone(), &config).start();

    let existing = cart.hydrate().await?;
    if !existing.is_empty() {
        info!(
            items = existing.item_count(),
            quantity = existing.total_quantity(),
            "Cart already has items, quantities will grow"
        );
    }

    for (id, title, price) in CATALOG.iter().cycle().take(count) {
        let item = CatalogItem::new(*id, *title, format!("{}/{}.png", IMAGE_BASE, id), *price);
        cart.add_to_cart(item).await?;
    }

    let seeded = cart.current();
    for line in seeded.items() {
        info!(id = %line.id, title = %line.title, quantity = line.quantity, "Line");
    }
    info!(
        items = seeded.item_count(),
        quantity = seeded.total_quantity(),
        "Seed complete"
    );

    cart.shutdown().await?;
    kv.close().await;

    Ok(())
}

/// Initializes the tracing subscriber for logging.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,market=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::TRACE)
        .init();
}
