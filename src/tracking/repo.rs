use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, Time};
use uuid::Uuid;

use super::dto::{NewWaterEntry, NewWorkout};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Workout {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub calories_burned: i32,
    pub date: Date,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WaterEntry {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub amount_ml: i32,
    pub date: Date,
    pub time: Option<Time>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WeightEntry {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub weight_kg: f64,
    pub date: Date,
}

impl Workout {
    pub async fn create(db: &PgPool, owner_id: Uuid, new: &NewWorkout) -> anyhow::Result<Workout> {
        let workout = sqlx::query_as::<_, Workout>(
            r#"
            INSERT INTO workouts (id, owner_id, name, calories_burned, date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, owner_id, name, calories_burned, date
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(&new.name)
        .bind(new.calories_burned)
        .bind(new.date)
        .fetch_one(db)
        .await?;
        Ok(workout)
    }

    pub async fn by_date(db: &PgPool, owner_id: Uuid, date: Date) -> anyhow::Result<Vec<Workout>> {
        let workouts = sqlx::query_as::<_, Workout>(
            r#"
            SELECT id, owner_id, name, calories_burned, date
            FROM workouts
            WHERE owner_id = $1 AND date = $2
            "#,
        )
        .bind(owner_id)
        .bind(date)
        .fetch_all(db)
        .await?;
        Ok(workouts)
    }

    pub async fn in_range(
        db: &PgPool,
        owner_id: Uuid,
        start: Date,
        end: Date,
    ) -> anyhow::Result<Vec<Workout>> {
        let workouts = sqlx::query_as::<_, Workout>(
            r#"
            SELECT id, owner_id, name, calories_burned, date
            FROM workouts
            WHERE owner_id = $1 AND date BETWEEN $2 AND $3
            ORDER BY date
            "#,
        )
        .bind(owner_id)
        .bind(start)
        .bind(end)
        .fetch_all(db)
        .await?;
        Ok(workouts)
    }

    pub async fn delete(db: &PgPool, workout_id: Uuid, owner_id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM workouts
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(workout_id)
        .bind(owner_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

impl WaterEntry {
    pub async fn add(
        db: &PgPool,
        owner_id: Uuid,
        new: &NewWaterEntry,
    ) -> anyhow::Result<WaterEntry> {
        let entry = sqlx::query_as::<_, WaterEntry>(
            r#"
            INSERT INTO water_entries (id, owner_id, amount_ml, date, time)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, owner_id, amount_ml, date, time
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(new.amount_ml)
        .bind(new.date)
        .bind(new.time)
        .fetch_one(db)
        .await?;
        Ok(entry)
    }

    pub async fn by_date(
        db: &PgPool,
        owner_id: Uuid,
        date: Date,
    ) -> anyhow::Result<Vec<WaterEntry>> {
        let entries = sqlx::query_as::<_, WaterEntry>(
            r#"
            SELECT id, owner_id, amount_ml, date, time
            FROM water_entries
            WHERE owner_id = $1 AND date = $2
            ORDER BY time NULLS LAST
            "#,
        )
        .bind(owner_id)
        .bind(date)
        .fetch_all(db)
        .await?;
        Ok(entries)
    }

    pub async fn delete(db: &PgPool, entry_id: Uuid, owner_id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM water_entries
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(entry_id)
        .bind(owner_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

impl WeightEntry {
    /// One weight row per user per calendar day; a same-day write replaces
    /// the value instead of duplicating the entry.
    pub async fn upsert_for_day(
        db: &PgPool,
        owner_id: Uuid,
        weight_kg: f64,
        date: Date,
    ) -> anyhow::Result<WeightEntry> {
        let entry = sqlx::query_as::<_, WeightEntry>(
            r#"
            INSERT INTO weight_entries (id, owner_id, weight_kg, date)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (owner_id, date) DO UPDATE SET weight_kg = EXCLUDED.weight_kg
            RETURNING id, owner_id, weight_kg, date
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(weight_kg)
        .bind(date)
        .fetch_one(db)
        .await?;
        Ok(entry)
    }

    pub async fn history_in_range(
        db: &PgPool,
        owner_id: Uuid,
        start: Date,
        end: Date,
    ) -> anyhow::Result<Vec<WeightEntry>> {
        let entries = sqlx::query_as::<_, WeightEntry>(
            r#"
            SELECT id, owner_id, weight_kg, date
            FROM weight_entries
            WHERE owner_id = $1 AND date BETWEEN $2 AND $3
            ORDER BY date
            "#,
        )
        .bind(owner_id)
        .bind(start)
        .bind(end)
        .fetch_all(db)
        .await?;
        Ok(entries)
    }

    pub async fn latest(db: &PgPool, owner_id: Uuid) -> anyhow::Result<Option<WeightEntry>> {
        let entry = sqlx::query_as::<_, WeightEntry>(
            r#"
            SELECT id, owner_id, weight_kg, date
            FROM weight_entries
            WHERE owner_id = $1
            ORDER BY date DESC
            LIMIT 1
            "#,
        )
        .bind(owner_id)
        .fetch_optional(db)
        .await?;
        Ok(entry)
    }
}
