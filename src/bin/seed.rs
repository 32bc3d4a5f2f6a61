//! Loads the fixture products into the configured database. Skips seeding
//! when the products table already has rows, so it is safe to run repeatedly.

use std::sync::Arc;

use anyhow::Context;
use sea_orm::{ActiveValue::Set, EntityTrait, PaginatorTrait};
use serde::Deserialize;
use tracing::info;

use catalog_api::config::{init_tracing, load_config};
use catalog_api::db::{establish_connection_from_app_config, run_migrations};
use catalog_api::entities::{product, Product};

#[derive(Deserialize)]
struct SeedProduct {
    name: String,
    category: String,
    price: i64,
    quantity: i64,
    #[serde(default)]
    description: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config().context("failed to load configuration")?;
    init_tracing(config.log_level(), config.log_json);

    let db = Arc::new(
        establish_connection_from_app_config(&config)
            .await
            .context("failed to connect to the database")?,
    );
    run_migrations(&db).await.context("migrations failed")?;

    let existing = Product::find().count(db.as_ref()).await?;
    if existing > 0 {
        info!(existing, "products table already populated, skipping seed");
        return Ok(());
    }

    let fixtures: Vec<SeedProduct> =
        serde_json::from_str(include_str!("../../data/products.json"))
            .context("invalid seed data")?;
    let count = fixtures.len();
    let models = fixtures.into_iter().map(|seed| product::ActiveModel {
        name: Set(seed.name),
        category: Set(seed.category),
        price: Set(seed.price),
        quantity: Set(seed.quantity),
        description: Set(seed.description),
        ..Default::default()
    });
    Product::insert_many(models).exec(db.as_ref()).await?;
    info!(count, "seeded products");
    Ok(())
}
