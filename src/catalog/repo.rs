use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, PgPool};
use tracing::warn;
use uuid::Uuid;

use super::dto::{NewProduct, NutrientProfile, ProductState};

/// Canonical catalog food item. Dish ingredients and decomposition traces
/// reference products by identity/name, never by copied nutrient values, so
/// catalog curation is picked up transparently.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub aliases: Vec<String>,
    pub nutrients: Json<NutrientProfile>,
    pub state: String,
    pub average_unit_g: f64,
}

impl Product {
    /// Case-insensitive exact match on the name only; aliases are not
    /// consulted at lookup time.
    pub async fn find_by_name(db: &PgPool, name: &str) -> anyhow::Result<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, aliases, nutrients, state, average_unit_g
            FROM products
            WHERE lower(name) = lower($1)
            "#,
        )
        .bind(name)
        .fetch_optional(db)
        .await?;
        Ok(product)
    }

    pub async fn create(db: &PgPool, new: &NewProduct) -> anyhow::Result<Product> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (id, name, aliases, nutrients, state, average_unit_g)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, aliases, nutrients, state, average_unit_g
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(&new.aliases)
        .bind(Json(new.nutrients))
        .bind(new.state.as_str())
        .bind(new.average_unit_g)
        .fetch_one(db)
        .await?;
        Ok(product)
    }

    /// Upsert keyed on `lower(name)`: inserts or overwrites the curated
    /// attributes while keeping the existing row id, so dish and entry
    /// references survive re-seeding and placeholders get upgraded in place.
    pub async fn upsert(db: &PgPool, new: &NewProduct) -> anyhow::Result<Product> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (id, name, aliases, nutrients, state, average_unit_g)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT ((lower(name))) DO UPDATE
            SET aliases = EXCLUDED.aliases,
                nutrients = EXCLUDED.nutrients,
                state = EXCLUDED.state,
                average_unit_g = EXCLUDED.average_unit_g
            RETURNING id, name, aliases, nutrients, state, average_unit_g
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(&new.aliases)
        .bind(Json(new.nutrients))
        .bind(new.state.as_str())
        .bind(new.average_unit_g)
        .fetch_one(db)
        .await?;
        Ok(product)
    }

    /// Resolves a name to its product, creating a zero-default placeholder
    /// when no match exists. Never fails for the unresolved case; the
    /// idempotency key is the lowercased name, so concurrent calls with the
    /// same name converge on one row.
    pub async fn ensure(
        db: &PgPool,
        name: &str,
        fallback: NutrientProfile,
    ) -> anyhow::Result<Product> {
        if let Some(existing) = Self::find_by_name(db, name).await? {
            return Ok(existing);
        }

        warn!(%name, "catalog miss, creating placeholder product");
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (id, name, aliases, nutrients, state, average_unit_g)
            VALUES ($1, $2, '{}'::text[], $3, $4, 0)
            ON CONFLICT ((lower(name))) DO UPDATE SET name = products.name
            RETURNING id, name, aliases, nutrients, state, average_unit_g
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(Json(fallback))
        .bind(ProductState::Solid.as_str())
        .fetch_one(db)
        .await?;
        Ok(product)
    }

    /// Current profiles for a batch of names, keyed by lowercased name.
    /// Names missing from the catalog are simply absent from the map.
    pub async fn nutrients_for_names(
        db: &PgPool,
        names: &[String],
    ) -> anyhow::Result<HashMap<String, NutrientProfile>> {
        if names.is_empty() {
            return Ok(HashMap::new());
        }
        let lowered: Vec<String> = names.iter().map(|n| n.to_lowercase()).collect();
        let rows = sqlx::query_as::<_, (String, Json<NutrientProfile>)>(
            r#"
            SELECT name, nutrients
            FROM products
            WHERE lower(name) = ANY($1)
            "#,
        )
        .bind(&lowered)
        .fetch_all(db)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(name, nutrients)| (name.to_lowercase(), nutrients.0))
            .collect())
    }
}
