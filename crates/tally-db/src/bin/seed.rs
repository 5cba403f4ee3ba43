//! # Seed Data Generator
//!
//! Loads a small demo catalog for development.
//!
//! ## Usage
//! ```bash
//! cargo run -p tally-db --bin seed
//! cargo run -p tally-db --bin seed -- --db ./data/tally.db
//! ```
//!
//! Skips seeding when the catalog already has products.

use std::env;

use tally_core::{Amount, NewProduct};
use tally_db::{Database, DbConfig};

/// (code, name, price, stock)
const DEMO_PRODUCTS: &[(&str, &str, &str, i64)] = &[
    ("ESP-1001", "Espresso", "3.50", 10),
    ("ESP-1002", "Double Espresso", "4.75", 10),
    ("LAT-2001", "Caffe Latte", "4.95", 25),
    ("CAP-2002", "Cappuccino", "4.50", 25),
    ("AMR-2003", "Americano", "3.25", 30),
    ("MOC-2004", "Mocha", "5.25", 15),
    ("TEA-3001", "Green Tea", "2.80", 40),
    ("TEA-3002", "Chai Latte", "4.60", 20),
    ("PST-4001", "Butter Croissant", "3.10", 12),
    ("PST-4002", "Blueberry Muffin", "2.95", 12),
    ("PST-4003", "Cinnamon Roll", "3.65", 8),
    ("SND-5001", "Ham & Cheese Panini", "7.90", 6),
    ("SND-5002", "Caprese Sandwich", "8.40", 6),
    ("BEV-6001", "Sparkling Water", "1.99", 48),
    ("BEV-6002", "Orange Juice", "3.49", 24),
    ("MRC-7001", "House Blend Beans 250g", "12.500", 18),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = env::var("TALLY_DATABASE_PATH").unwrap_or_else(|_| "./tally.db".to_string());

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Tally POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path");
                println!("                     (default: $TALLY_DATABASE_PATH or ./tally.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Tally POS Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        return Ok(());
    }

    let mut inserted = 0;
    for (code, name, price, stock) in DEMO_PRODUCTS {
        let product = NewProduct {
            product_code: code.to_string(),
            name: name.to_string(),
            price: price.parse::<Amount>()?,
            stock_quantity: *stock,
            image_url: None,
        };

        if let Err(e) = db.products().insert(&product).await {
            eprintln!("Failed to insert {}: {}", code, e);
            continue;
        }
        inserted += 1;
    }

    println!();
    println!("✓ Inserted {} products", inserted);

    db.close().await;
    Ok(())
}
