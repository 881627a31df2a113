//! # Seed Data Generator
//!
//! Populates the database with a realistic salon setup for development.
//!
//! ## Usage
//! ```bash
//! cargo run -p salon-db --bin seed
//!
//! # Specify database path
//! cargo run -p salon-db --bin seed -- --db ./data/salon.db
//! ```
//!
//! ## Generated Data
//! - Service catalog (hair, skin, nails) and retail products
//! - Clients with loyalty points, wallet balances, and packages
//! - Vouchers and promotions
//! - One pending order in the companion-app inbox

use chrono::Utc;
use std::env;
use uuid::Uuid;

use salon_core::{
    CatalogItem, Client, ClientPackage, Discount, ItemKind, Money, Promotion, Voucher,
};
use salon_db::{Database, DbConfig};

/// (name, category, price in rupees, commission bps) service entries
const SERVICES: &[(&str, &str, i64, u32)] = &[
    ("Haircut", "Hair", 600, 1000),
    ("Hair Spa", "Hair", 1200, 1000),
    ("Hair Colour", "Hair", 2500, 1500),
    ("Beard Trim", "Hair", 250, 1000),
    ("Facial", "Skin", 1500, 1200),
    ("Clean Up", "Skin", 800, 1200),
    ("Threading", "Skin", 100, 800),
    ("Manicure", "Nails", 700, 1000),
    ("Pedicure", "Nails", 900, 1000),
    ("Bridal Makeup", "Makeup", 12000, 2000),
];

/// (name, category, price in rupees, code) retail products
const PRODUCTS: &[(&str, &str, i64, &str)] = &[
    ("Argan Oil Shampoo 250ml", "Retail", 850, "RT-SHAM-250"),
    ("Keratin Conditioner 200ml", "Retail", 780, "RT-COND-200"),
    ("Hair Serum 100ml", "Retail", 650, "RT-SERUM-100"),
    ("Face Wash 150ml", "Retail", 450, "RT-FW-150"),
    ("Sunscreen SPF50 100ml", "Retail", 999, "RT-SUN-100"),
    ("Cuticle Oil 15ml", "Retail", 350, "RT-CUT-15"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./salon_dev.db");

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
                println!("Salon POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./salon_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Salon POS Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.catalog().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} catalog items", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Seeding catalog...");

    let now = Utc::now();
    let mut first_service_id = None;

    for (name, category, price_rupees, commission_bps) in SERVICES {
        let item = CatalogItem {
            id: Uuid::new_v4().to_string(),
            kind: ItemKind::Service,
            code: None,
            name: name.to_string(),
            category: category.to_string(),
            price_paise: price_rupees * 100,
            commission_rate_bps: *commission_bps,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        if first_service_id.is_none() {
            first_service_id = Some(item.id.clone());
        }
        db.catalog().insert(&item).await?;
    }

    for (name, category, price_rupees, code) in PRODUCTS {
        db.catalog()
            .insert(&CatalogItem {
                id: Uuid::new_v4().to_string(),
                kind: ItemKind::Product,
                code: Some(code.to_string()),
                name: name.to_string(),
                category: category.to_string(),
                price_paise: price_rupees * 100,
                commission_rate_bps: 0,
                is_active: true,
                created_at: now,
                updated_at: now,
            })
            .await?;
    }

    println!("  {} services, {} products", SERVICES.len(), PRODUCTS.len());

    println!("Seeding clients...");

    let clients = [
        ("Asha Verma", "9876512345", 450_00, 0, vec![("Hair Spa", 3)]),
        ("Meera Nair", "9876523456", 120_00, 2000_00, vec![]),
        ("Rohan Gupta", "9876534567", 0, 500_00, vec![("Facial", 1)]),
        ("Priya Singh", "9876545678", 1062_00, 0, vec![]),
    ];

    let mut first_client_id = None;
    for (name, phone, loyalty_paise, wallet_paise, packages) in clients {
        let client = Client {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            phone: phone.to_string(),
            loyalty_points_paise: loyalty_paise,
            wallet_balance_paise: wallet_paise,
            packages: packages
                .into_iter()
                .map(|(pkg, sessions)| ClientPackage {
                    name: pkg.to_string(),
                    sessions_left: sessions,
                })
                .collect(),
            created_at: now,
            updated_at: now,
        };
        if first_client_id.is_none() {
            first_client_id = Some(client.id.clone());
        }
        db.clients().insert(&client).await?;
    }

    println!("  4 clients");

    println!("Seeding vouchers and promotions...");

    db.vouchers()
        .insert_voucher(&Voucher {
            code: "WELCOME50".to_string(),
            discount: Discount::Fixed(Money::from_rupees(50)),
            is_active: true,
        })
        .await?;
    db.vouchers()
        .insert_voucher(&Voucher {
            code: "GLOW10".to_string(),
            discount: Discount::Percentage(1000),
            is_active: true,
        })
        .await?;

    db.vouchers()
        .insert_promotion(&Promotion {
            id: Uuid::new_v4().to_string(),
            name: "Festive 10% Off".to_string(),
            discount: Discount::Percentage(1000),
            is_active: true,
        })
        .await?;
    db.vouchers()
        .insert_promotion(&Promotion {
            id: Uuid::new_v4().to_string(),
            name: "Flat ₹100 Off".to_string(),
            discount: Discount::Fixed(Money::from_rupees(100)),
            is_active: true,
        })
        .await?;

    println!("  2 vouchers, 2 promotions");

    if let (Some(client_id), Some(item_id)) = (first_client_id, first_service_id) {
        db.inbox().queue(Some(&client_id), &[item_id]).await?;
        println!("  1 pending order queued");
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
