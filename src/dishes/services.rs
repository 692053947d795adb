use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::dto::{DishWithIngredients, IngredientLink, NewDish};
use super::repo::Dish;
use crate::catalog::dto::NutrientProfile;
use crate::catalog::repo::Product;

/// Builds a composite dish, resolving every ingredient through the catalog.
/// Ingredients without a catalog match are linked via zero-nutrient
/// placeholders; nothing here is fatal.
pub async fn create_dish(db: &PgPool, new: NewDish) -> anyhow::Result<DishWithIngredients> {
    let dish = Dish::create(db, &new.name, new.category.as_deref(), &new.aliases).await?;

    let mut ingredients = Vec::with_capacity(new.ingredients.len());
    for ing in &new.ingredients {
        let product = Product::ensure(db, &ing.product_name, NutrientProfile::ZERO).await?;
        Dish::link_ingredient(db, dish.id, product.id, ing.weight_g).await?;
        ingredients.push(IngredientLink {
            product,
            weight_g: ing.weight_g,
        });
    }

    debug!(dish = %dish.name, ingredients = ingredients.len(), "dish created");
    Ok(DishWithIngredients { dish, ingredients })
}

/// A dish re-read later reflects current catalog nutrient data, including
/// placeholder rows that have since been curated.
pub async fn get_dish(db: &PgPool, dish_id: Uuid) -> anyhow::Result<Option<DishWithIngredients>> {
    let dish = sqlx::query_as::<_, Dish>(
        r#"
        SELECT id, name, category, aliases
        FROM dishes
        WHERE id = $1
        "#,
    )
    .bind(dish_id)
    .fetch_optional(db)
    .await?;

    let Some(dish) = dish else { return Ok(None) };
    let ingredients = Dish::ingredients(db, dish.id).await?;
    Ok(Some(DishWithIngredients { dish, ingredients }))
}
