//! # Seed Data Generator
//!
//! Fills an empty blob store with a demo catalog and roster.
//!
//! ## Usage
//! ```bash
//! # Seed ./till_dev.db with 40 products (default)
//! cargo run -p till-db --bin seed
//!
//! # Custom amount and path
//! cargo run -p till-db --bin seed -- --count 200 --db ./data/till.db
//! ```
//!
//! Products get codes like `BEV-003`, retail prices between 0.99 and 24.99
//! and a cost of 55-75% of retail. Existing collections are left alone.

use chrono::{Duration, Utc};
use std::env;
use till_core::{Money, Product, ProductInput, Record, Salesperson, SalespersonInput};
use till_db::{Database, DbConfig};

/// Product families for demo data.
const FAMILIES: &[(&str, &[&str])] = &[
    (
        "BEV",
        &[
            "Cola", "Lemon Soda", "Mineral Water", "Orange Juice", "Iced Tea",
            "Green Tea", "Espresso", "Mango Lassi",
        ],
    ),
    (
        "SNK",
        &[
            "Salted Chips", "Masala Chips", "Chocolate Bar", "Peanut Brittle",
            "Oat Cookies", "Trail Mix",
        ],
    ),
    (
        "DRY",
        &["Milk 1L", "Yogurt Cup", "Cheddar Slice", "Butter 200g", "Paneer 250g"],
    ),
    (
        "HOM",
        &["Dish Soap", "Paper Towels", "Trash Bags", "Sponge Pack", "Hand Wash"],
    ),
];

const SALESPEOPLE: &[(&str, &str)] = &[
    ("SP-01", "Ayesha Khan"),
    ("SP-02", "Bilal Ahmed"),
    ("SP-03", "Sara Malik"),
    ("SP-04", "Omar Farooq"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 40;
    let mut db_path = String::from("./till_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(40);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Till POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 40)");
                println!("  -d, --db <PATH>    Database file path (default: ./till_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Till POS Seed Data Generator");
    println!("============================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let blobs = db.blobs();

    let existing: Vec<Product> = blobs.load_collection().await?;
    if existing.is_empty() {
        let products = generate_products(count)?;
        blobs.save_collection(&products).await?;
        println!("✓ Wrote {} products under '{}'", products.len(), Product::STORAGE_KEY);
    } else {
        println!("⚠ '{}' already holds {} products, skipping", Product::STORAGE_KEY, existing.len());
    }

    let roster: Vec<Salesperson> = blobs.load_collection().await?;
    if roster.is_empty() {
        let now = Utc::now();
        let roster = SALESPEOPLE
            .iter()
            .map(|(code, name)| {
                Salesperson::create(
                    SalespersonInput {
                        name: name.to_string(),
                        code: code.to_string(),
                    },
                    now,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        blobs.save_collection(&roster).await?;
        println!("✓ Wrote {} salespersons under '{}'", roster.len(), Salesperson::STORAGE_KEY);
    } else {
        println!("⚠ '{}' already holds {} salespersons, skipping", Salesperson::STORAGE_KEY, roster.len());
    }

    println!();
    println!("✓ Seed complete!");
    Ok(())
}

/// Builds `count` products, spreading creation dates over the last 60 days
/// so the list stats have something to show.
fn generate_products(count: usize) -> Result<Vec<Product>, till_core::CoreError> {
    let now = Utc::now();
    let names: Vec<(&str, &str)> = FAMILIES
        .iter()
        .flat_map(|(family, names)| names.iter().map(move |name| (*family, *name)))
        .collect();

    let mut products = Vec::with_capacity(count);
    for seed in 0..count {
        let (family, name) = names[seed % names.len()];
        let batch = seed / names.len();
        let display = if batch == 0 {
            name.to_string()
        } else {
            format!("{} #{}", name, batch + 1)
        };

        let retail = 99 + ((seed * 137) % 2400) as i64;
        let cost = retail * (55 + (seed % 21) as i64) / 100;

        let created = now - Duration::days((seed % 60) as i64) - Duration::minutes(seed as i64);
        let product = Product::create(
            ProductInput {
                name: display,
                code: format!("{}-{:03}", family, seed + 1),
                image_url: None,
                cost_price: Money::from_cents(cost),
                retail_price: Money::from_cents(retail),
            },
            created,
        )?;
        products.push(product);
    }
    Ok(products)
}
