use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, PgPool};
use uuid::Uuid;

use super::dto::IngredientLink;
use crate::catalog::dto::NutrientProfile;
use crate::catalog::repo::Product;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Dish {
    pub id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub aliases: Vec<String>,
}

#[derive(Debug, FromRow)]
struct IngredientRow {
    product_id: Uuid,
    name: String,
    aliases: Vec<String>,
    nutrients: Json<NutrientProfile>,
    state: String,
    average_unit_g: f64,
    weight_g: f64,
}

impl Dish {
    pub async fn find_by_name(db: &PgPool, name: &str) -> anyhow::Result<Option<Dish>> {
        let dish = sqlx::query_as::<_, Dish>(
            r#"
            SELECT id, name, category, aliases
            FROM dishes
            WHERE lower(name) = lower($1)
            "#,
        )
        .bind(name)
        .fetch_optional(db)
        .await?;
        Ok(dish)
    }

    pub async fn create(
        db: &PgPool,
        name: &str,
        category: Option<&str>,
        aliases: &[String],
    ) -> anyhow::Result<Dish> {
        let dish = sqlx::query_as::<_, Dish>(
            r#"
            INSERT INTO dishes (id, name, category, aliases)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, category, aliases
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(category)
        .bind(aliases)
        .fetch_one(db)
        .await?;
        Ok(dish)
    }

    pub async fn link_ingredient(
        db: &PgPool,
        dish_id: Uuid,
        product_id: Uuid,
        weight_g: f64,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO dish_ingredients (id, dish_id, product_id, weight_g)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(dish_id)
        .bind(product_id)
        .bind(weight_g)
        .execute(db)
        .await?;
        Ok(())
    }

    /// Ingredient links joined with their current product rows. Nutrient data
    /// is read live from the catalog, never copied into the link.
    pub async fn ingredients(db: &PgPool, dish_id: Uuid) -> anyhow::Result<Vec<IngredientLink>> {
        let rows = sqlx::query_as::<_, IngredientRow>(
            r#"
            SELECT p.id AS product_id, p.name, p.aliases, p.nutrients, p.state,
                   p.average_unit_g, di.weight_g
            FROM dish_ingredients di
            JOIN products p ON p.id = di.product_id
            WHERE di.dish_id = $1
            ORDER BY di.id
            "#,
        )
        .bind(dish_id)
        .fetch_all(db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| IngredientLink {
                product: Product {
                    id: r.product_id,
                    name: r.name,
                    aliases: r.aliases,
                    nutrients: r.nutrients,
                    state: r.state,
                    average_unit_g: r.average_unit_g,
                },
                weight_g: r.weight_g,
            })
            .collect())
    }
}
