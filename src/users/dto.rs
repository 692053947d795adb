use serde::Deserialize;

/// Partial goals update. `weight_kg` is not a column on the user row; it is
/// routed to the per-day weight entry upsert.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoalsPatch {
    pub calorie_goal: Option<i32>,
    pub protein_goal: Option<i32>,
    pub fat_goal: Option<i32>,
    pub carb_goal: Option<i32>,
    pub water_goal: Option<i32>,
    pub add_workout_calories_to_goal: Option<bool>,
    pub activity_level: Option<String>,
    pub target_weight_kg: Option<f64>,
    pub weekly_goal_kg: Option<f64>,
    pub preferences: Option<serde_json::Value>,
    pub weight_kg: Option<f64>,
}
