use sqlx::{types::Json, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::GoalsPatch;
use super::repo::Goals;
use crate::error::EngineError;
use crate::tracking::repo::WeightEntry;

pub async fn get_goals(db: &PgPool, user_id: Uuid) -> Result<Goals, EngineError> {
    Goals::get(db, user_id).await?.ok_or(EngineError::NotFound)
}

/// Applies a partial goals update. A supplied weight becomes today's weight
/// entry (replacing any same-day value); it is never written to the user row
/// itself.
pub async fn update_goals(
    db: &PgPool,
    user_id: Uuid,
    patch: GoalsPatch,
) -> Result<Goals, EngineError> {
    let Some(mut goals) = Goals::get(db, user_id).await? else {
        return Err(EngineError::NotFound);
    };

    if let Some(weight) = patch.weight_kg {
        let today = OffsetDateTime::now_utc().date();
        WeightEntry::upsert_for_day(db, user_id, weight, today).await?;
    }

    if let Some(v) = patch.calorie_goal {
        goals.calorie_goal = v;
    }
    if let Some(v) = patch.protein_goal {
        goals.protein_goal = v;
    }
    if let Some(v) = patch.fat_goal {
        goals.fat_goal = v;
    }
    if let Some(v) = patch.carb_goal {
        goals.carb_goal = v;
    }
    if let Some(v) = patch.water_goal {
        goals.water_goal = v;
    }
    if let Some(v) = patch.add_workout_calories_to_goal {
        goals.add_workout_calories_to_goal = v;
    }
    if let Some(v) = patch.activity_level {
        goals.activity_level = v;
    }
    if let Some(v) = patch.target_weight_kg {
        goals.target_weight_kg = Some(v);
    }
    if let Some(v) = patch.weekly_goal_kg {
        goals.weekly_goal_kg = v;
    }
    if let Some(v) = patch.preferences {
        goals.preferences = Some(Json(v));
    }

    let updated = Goals::update_row(db, &goals).await?;
    Ok(updated)
}
