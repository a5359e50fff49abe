//! Helpers for integration tests.
#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use vtex_orders_etl::db::{DbPool, establish_connection_pool};
use vtex_orders_etl::domain::order::Order;
use vtex_orders_etl::domain::order_item::OrderItem;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!(); // assumes migrations/ exists

/// Temporary database used in integration tests.
pub struct TestDb {
    filename: String,
    pool: DbPool,
}

impl TestDb {
    pub fn new(filename: &str) -> Self {
        std::fs::remove_file(filename).ok(); // Clean up old DB

        let pool =
            establish_connection_pool(filename).expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");
        TestDb {
            filename: filename.to_string(),
            pool,
        }
    }
    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        std::fs::remove_file(&self.filename).ok();
        std::fs::remove_file(format!("{}-shm", &self.filename)).ok();
        std::fs::remove_file(format!("{}-wal", &self.filename)).ok();
    }
}

pub fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, day)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .expect("valid timestamp")
}

pub fn sample_order(order_id: &str, creation_date: NaiveDateTime) -> Order {
    Order {
        order_id: order_id.to_string(),
        creation_date,
        client_name: "Ana Souza".to_string(),
        total_value: 155.5,
        payment_names: "Pix".to_string(),
        status: "invoiced".to_string(),
        status_description: "Faturado".to_string(),
        sales_channel: "1".to_string(),
        origin: "Marketplace".to_string(),
        order_is_complete: true,
        total_items: 1,
        hostname: "store".to_string(),
        last_change: Some(creation_date),
        item_values: 150.0,
        discount_value: 0.0,
        shipping_value: 5.5,
        coupon: None,
        client_email: "ana@example.com".to_string(),
        client_id: Some("12345678900".to_string()),
        state: "SP".to_string(),
        city: "Campinas".to_string(),
    }
}

pub fn sample_item(order_id: &str, id: &str, unique_id: &str) -> OrderItem {
    OrderItem {
        id: id.to_string(),
        unique_id: unique_id.to_string(),
        product_id: "77".to_string(),
        order_id: order_id.to_string(),
        ean: "7891234567890".to_string(),
        quantity: 2,
        seller: Some("1".to_string()),
        name: "Shampoo".to_string(),
        ref_id: None,
        price: 50.0,
        selling_price: 45.0,
        seller_sku: "77".to_string(),
        measurement_unit: "un".to_string(),
        is_gift: false,
        total_price: 90.0,
    }
}
