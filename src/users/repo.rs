use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// The goals/policy slice of the user row. Account identity and credentials
/// are owned by the serving layer and never read here.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Goals {
    pub id: Uuid,
    pub calorie_goal: i32,
    pub protein_goal: i32,
    pub fat_goal: i32,
    pub carb_goal: i32,
    pub water_goal: i32,
    pub add_workout_calories_to_goal: bool,
    pub activity_level: String,
    pub target_weight_kg: Option<f64>,
    pub weekly_goal_kg: f64,
    pub preferences: Option<Json<serde_json::Value>>,
    pub diet_plan_requests: i32,
    pub last_request_date: Option<Date>,
    #[serde(skip_serializing)]
    pub last_diet_plan: Option<String>,
    #[serde(skip_serializing)]
    pub last_weekly_analysis: Option<String>,
    pub last_analysis_generated_at: Option<OffsetDateTime>,
}

const GOALS_COLUMNS: &str = r#"id, calorie_goal, protein_goal, fat_goal, carb_goal, water_goal,
       add_workout_calories_to_goal, activity_level, target_weight_kg, weekly_goal_kg,
       preferences, diet_plan_requests, last_request_date, last_diet_plan,
       last_weekly_analysis, last_analysis_generated_at"#;

impl Goals {
    pub async fn get(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<Goals>> {
        let goals = sqlx::query_as::<_, Goals>(&format!(
            "SELECT {GOALS_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(goals)
    }

    pub async fn update_row(db: &PgPool, goals: &Goals) -> anyhow::Result<Goals> {
        let updated = sqlx::query_as::<_, Goals>(&format!(
            r#"
            UPDATE users
            SET calorie_goal = $2, protein_goal = $3, fat_goal = $4, carb_goal = $5,
                water_goal = $6, add_workout_calories_to_goal = $7, activity_level = $8,
                target_weight_kg = $9, weekly_goal_kg = $10, preferences = $11
            WHERE id = $1
            RETURNING {GOALS_COLUMNS}
            "#
        ))
        .bind(goals.id)
        .bind(goals.calorie_goal)
        .bind(goals.protein_goal)
        .bind(goals.fat_goal)
        .bind(goals.carb_goal)
        .bind(goals.water_goal)
        .bind(goals.add_workout_calories_to_goal)
        .bind(&goals.activity_level)
        .bind(goals.target_weight_kg)
        .bind(goals.weekly_goal_kg)
        .bind(goals.preferences.clone())
        .fetch_one(db)
        .await?;
        Ok(updated)
    }

    /// Persists the latest windowed analysis payload with its generation
    /// timestamp. Served as-is until the next regeneration.
    pub async fn store_weekly_analysis(
        db: &PgPool,
        user_id: Uuid,
        payload: &str,
        generated_at: OffsetDateTime,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET last_weekly_analysis = $2, last_analysis_generated_at = $3
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(payload)
        .bind(generated_at)
        .execute(db)
        .await?;
        Ok(())
    }

    /// Advisory counter bump: resets on the first request of a new day,
    /// increments otherwise, and caches the plan payload. Best-effort under
    /// concurrency; a race may admit one extra request.
    pub async fn record_plan_request(
        db: &PgPool,
        user_id: Uuid,
        today: Date,
        plan_payload: &str,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET diet_plan_requests = CASE
                    WHEN last_request_date = $2 THEN diet_plan_requests + 1
                    ELSE 1
                END,
                last_request_date = $2,
                last_diet_plan = $3
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(today)
        .bind(plan_payload)
        .execute(db)
        .await?;
        Ok(())
    }
}
