//! # Seed Data Generator
//!
//! Populates the database with a small demo catalog for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./till.db
//! cargo run -p till-db --bin seed
//!
//! # Specify database path
//! cargo run -p till-db --bin seed -- --db ./data/till.db
//! ```
//!
//! Seeding is skipped when the catalog already has items.

use std::env;

use till_core::validation::validate_new_item;
use till_db::{Database, DbConfig};

/// Demo catalog: (title, price, quantity per receipt line).
const CATALOG: &[(&str, &str, i64)] = &[
    ("Espresso", "2.40", 1),
    ("Cappuccino", "3.20", 1),
    ("Croissant", "1.95", 2),
    ("Sparkling water 0.5l", "1.10", 3),
    ("Orange juice", "2.75", 1),
    ("Cheese sandwich", "4.50", 1),
    ("Chocolate bar", "0.99", 4),
    ("Green tea", "19.99", 2),
    ("Paper cups (pack)", "5.50", 3),
    ("Gift card", "25.00", 1),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./till.db");

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
                println!("Till Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./till.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Database: {}", db_path);

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let repo = db.items();

    let existing = repo.count().await?;
    if existing > 0 {
        println!("Catalog already has {} items, skipping.", existing);
        return Ok(());
    }

    for (title, price, quantity) in CATALOG {
        let body = serde_json::json!({ "title": title, "price": price, "quantity": quantity });
        let new_item = validate_new_item(&body)?;
        let item = repo.insert(&new_item).await?;
        println!("  #{:<3} {:<24} {:>7} x{}", item.id, item.title, item.price(), item.quantity);
    }

    println!("Seeded {} items.", CATALOG.len());
    db.close().await;

    Ok(())
}
