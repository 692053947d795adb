use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, PgPool};
use time::{Date, Time};
use uuid::Uuid;

use super::dto::{NewMeal, NewMealEntry, TraceComponent};

/// Named, dated, time-of-day-categorized container for logged entries.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Meal {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub category: String,
    pub date: Date,
    pub time: Option<Time>,
}

/// One logged food occurrence. The macro columns are a snapshot frozen at
/// logging time; `trace` is a serialized sub-document re-parsed on each read
/// and only ever replaced as a whole.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MealEntry {
    pub id: Uuid,
    pub meal_id: Uuid,
    pub product_name: String,
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    pub original_amount: f64,
    pub original_unit: String,
    pub standardized_grams: f64,
    pub trace: Option<Json<Vec<TraceComponent>>>,
    pub display_quantity_text: Option<String>,
    pub is_default_quantity: bool,
}

impl Meal {
    pub async fn create(db: &PgPool, owner_id: Uuid, new: &NewMeal) -> anyhow::Result<Meal> {
        let meal = sqlx::query_as::<_, Meal>(
            r#"
            INSERT INTO meals (id, owner_id, name, category, date, time)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, owner_id, name, category, date, time
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(&new.name)
        .bind(&new.category)
        .bind(new.date)
        .bind(new.time)
        .fetch_one(db)
        .await?;
        Ok(meal)
    }

    pub async fn find_owned(
        db: &PgPool,
        meal_id: Uuid,
        owner_id: Uuid,
    ) -> anyhow::Result<Option<Meal>> {
        let meal = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, owner_id, name, category, date, time
            FROM meals
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(meal_id)
        .bind(owner_id)
        .fetch_optional(db)
        .await?;
        Ok(meal)
    }

    pub async fn by_date(db: &PgPool, owner_id: Uuid, date: Date) -> anyhow::Result<Vec<Meal>> {
        let meals = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, owner_id, name, category, date, time
            FROM meals
            WHERE owner_id = $1 AND date = $2
            ORDER BY time NULLS LAST
            "#,
        )
        .bind(owner_id)
        .bind(date)
        .fetch_all(db)
        .await?;
        Ok(meals)
    }

    pub async fn in_range(
        db: &PgPool,
        owner_id: Uuid,
        start: Date,
        end: Date,
    ) -> anyhow::Result<Vec<Meal>> {
        let meals = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, owner_id, name, category, date, time
            FROM meals
            WHERE owner_id = $1 AND date BETWEEN $2 AND $3
            ORDER BY date
            "#,
        )
        .bind(owner_id)
        .bind(start)
        .bind(end)
        .fetch_all(db)
        .await?;
        Ok(meals)
    }

    /// Deletes the meal and cascades its entries. Owner-checked; `false`
    /// covers both not-found and not-mine.
    pub async fn delete(db: &PgPool, meal_id: Uuid, owner_id: Uuid) -> anyhow::Result<bool> {
        sqlx::query(
            r#"
            DELETE FROM meal_entries
            WHERE meal_id IN (SELECT id FROM meals WHERE id = $1 AND owner_id = $2)
            "#,
        )
        .bind(meal_id)
        .bind(owner_id)
        .execute(db)
        .await?;

        let result = sqlx::query(
            r#"
            DELETE FROM meals
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(meal_id)
        .bind(owner_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

impl MealEntry {
    pub async fn insert(
        db: &PgPool,
        meal_id: Uuid,
        new: &NewMealEntry,
        standardized_grams: f64,
    ) -> anyhow::Result<MealEntry> {
        let entry = sqlx::query_as::<_, MealEntry>(
            r#"
            INSERT INTO meal_entries
                (id, meal_id, product_name, calories, protein, fat, carbs,
                 original_amount, original_unit, standardized_grams, trace,
                 display_quantity_text, is_default_quantity)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id, meal_id, product_name, calories, protein, fat, carbs,
                      original_amount, original_unit, standardized_grams, trace,
                      display_quantity_text, is_default_quantity
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(meal_id)
        .bind(&new.product_name)
        .bind(new.calories)
        .bind(new.protein)
        .bind(new.fat)
        .bind(new.carbs)
        .bind(new.amount)
        .bind(&new.unit)
        .bind(standardized_grams)
        .bind(new.trace.clone().map(Json))
        .bind(&new.display_quantity_text)
        .bind(new.is_default_quantity)
        .fetch_one(db)
        .await?;
        Ok(entry)
    }

    pub async fn get(db: &PgPool, entry_id: Uuid) -> anyhow::Result<Option<MealEntry>> {
        let entry = sqlx::query_as::<_, MealEntry>(
            r#"
            SELECT id, meal_id, product_name, calories, protein, fat, carbs,
                   original_amount, original_unit, standardized_grams, trace,
                   display_quantity_text, is_default_quantity
            FROM meal_entries
            WHERE id = $1
            "#,
        )
        .bind(entry_id)
        .fetch_optional(db)
        .await?;
        Ok(entry)
    }

    /// Writes the full row back, including the trace column; the JSONB
    /// rewrite is the explicit "this nested structure changed" signal.
    pub async fn update_row(db: &PgPool, entry: &MealEntry) -> anyhow::Result<MealEntry> {
        let updated = sqlx::query_as::<_, MealEntry>(
            r#"
            UPDATE meal_entries
            SET product_name = $2, calories = $3, protein = $4, fat = $5, carbs = $6,
                original_amount = $7, original_unit = $8, standardized_grams = $9,
                trace = $10, display_quantity_text = $11, is_default_quantity = $12
            WHERE id = $1
            RETURNING id, meal_id, product_name, calories, protein, fat, carbs,
                      original_amount, original_unit, standardized_grams, trace,
                      display_quantity_text, is_default_quantity
            "#,
        )
        .bind(entry.id)
        .bind(&entry.product_name)
        .bind(entry.calories)
        .bind(entry.protein)
        .bind(entry.fat)
        .bind(entry.carbs)
        .bind(entry.original_amount)
        .bind(&entry.original_unit)
        .bind(entry.standardized_grams)
        .bind(entry.trace.clone())
        .bind(&entry.display_quantity_text)
        .bind(entry.is_default_quantity)
        .fetch_one(db)
        .await?;
        Ok(updated)
    }

    /// Deletes only when the parent meal belongs to `owner_id`; `false`
    /// otherwise, including not-found.
    pub async fn delete_owned(
        db: &PgPool,
        entry_id: Uuid,
        owner_id: Uuid,
    ) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM meal_entries e
            USING meals m
            WHERE e.id = $1 AND e.meal_id = m.id AND m.owner_id = $2
            "#,
        )
        .bind(entry_id)
        .bind(owner_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn for_meals(db: &PgPool, meal_ids: &[Uuid]) -> anyhow::Result<Vec<MealEntry>> {
        if meal_ids.is_empty() {
            return Ok(Vec::new());
        }
        let entries = sqlx::query_as::<_, MealEntry>(
            r#"
            SELECT id, meal_id, product_name, calories, protein, fat, carbs,
                   original_amount, original_unit, standardized_grams, trace,
                   display_quantity_text, is_default_quantity
            FROM meal_entries
            WHERE meal_id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(meal_ids)
        .fetch_all(db)
        .await?;
        Ok(entries)
    }
}
