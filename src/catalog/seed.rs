//! Master-data seeding: simple products first, composite dishes on top.

use std::collections::HashSet;

use anyhow::Context;
use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;

use super::dto::{NewProduct, NutrientProfile, ProductState};
use super::repo::Product;
use crate::dishes;
use crate::dishes::dto::{NewDish, NewDishIngredient};

#[derive(Debug, Deserialize)]
pub struct SeedItem {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub nutrients_per_100g: Option<NutrientProfile>,
    #[serde(default)]
    pub nutrients_per_100ml: Option<NutrientProfile>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub average_weight_g: Option<f64>,
    #[serde(default)]
    pub category: Option<serde_json::Value>,
    #[serde(default)]
    pub deconstruction: Vec<SeedIngredient>,
}

#[derive(Debug, Deserialize)]
pub struct SeedIngredient {
    pub ingredient_name: String,
    #[serde(default)]
    pub weight_g: f64,
}

#[derive(Debug, Default)]
pub struct SeedReport {
    pub products: usize,
    pub dishes: usize,
    pub skipped: usize,
}

// The category field appears both as a bare string and as {"name": ...}.
fn category_name(raw: Option<serde_json::Value>) -> Option<String> {
    match raw {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Object(map)) => map
            .get("name")
            .and_then(|v| v.as_str())
            .map(str::to_string),
        _ => None,
    }
}

/// Splits master data into the products to insert first and the composite
/// dishes built on top of them. An item with a deconstruction list becomes a
/// dish, but still seeds its own product row when it carries a profile, so
/// dish ingredients and direct lookups share one catalog. For duplicate
/// names the first occurrence wins.
pub(crate) fn classify(items: Vec<SeedItem>) -> (Vec<NewProduct>, Vec<NewDish>, usize) {
    let mut seen: HashSet<String> = HashSet::new();
    let mut products = Vec::new();
    let mut dishes = Vec::new();
    let mut skipped = 0;

    for item in items {
        if item.name.is_empty() {
            skipped += 1;
            continue;
        }

        if !item.deconstruction.is_empty() {
            dishes.push(NewDish {
                name: item.name.clone(),
                category: category_name(item.category.clone()),
                aliases: item.aliases.clone(),
                ingredients: item
                    .deconstruction
                    .iter()
                    .map(|ing| NewDishIngredient {
                        product_name: ing.ingredient_name.clone(),
                        weight_g: ing.weight_g,
                    })
                    .collect(),
            });
        }

        let nutrients = item.nutrients_per_100g.or(item.nutrients_per_100ml);
        match nutrients {
            Some(nutrients) if seen.insert(item.name.to_lowercase()) => {
                let state = item
                    .state
                    .as_deref()
                    .map(ProductState::parse)
                    .unwrap_or(ProductState::Solid);
                products.push(NewProduct {
                    name: item.name,
                    aliases: item.aliases,
                    nutrients,
                    state,
                    average_unit_g: item.average_weight_g.unwrap_or(0.0),
                });
            }
            Some(_) => skipped += 1,
            None if item.deconstruction.is_empty() => skipped += 1,
            None => {}
        }
    }

    (products, dishes, skipped)
}

pub async fn run(db: &PgPool, path: &str) -> anyhow::Result<SeedReport> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("read seed file {path}"))?;
    let items: Vec<SeedItem> = serde_json::from_str(&raw).context("parse seed file")?;
    info!(items = items.len(), "loaded master data");

    let (products, dishes, skipped) = classify(items);
    let mut report = SeedReport {
        skipped,
        ..Default::default()
    };

    for product in &products {
        Product::upsert(db, product).await?;
        report.products += 1;
    }

    for dish in dishes {
        if dishes::repo::Dish::find_by_name(db, &dish.name).await?.is_some() {
            report.skipped += 1;
            continue;
        }
        dishes::services::create_dish(db, dish).await?;
        report.dishes += 1;
    }

    Ok(report)
}
