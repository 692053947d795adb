use serde::Serialize;
use time::Date;
use uuid::Uuid;

use crate::catalog::dto::NutrientProfile;
use crate::meals::dto::TraceComponent;
use crate::meals::repo::Meal;
use crate::tracking::repo::{WaterEntry, Workout};

/// Read-time view of a stored trace component, joined with the catalog's
/// current per-100 g profile. Derived on every read; the stored snapshot is
/// never mutated. `nutrients_per_100g` is omitted when the name does not
/// resolve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedComponent {
    #[serde(flatten)]
    pub component: TraceComponent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutrients_per_100g: Option<NutrientProfile>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MealEntryView {
    pub id: Uuid,
    pub product_name: String,
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    pub original_amount: f64,
    pub original_unit: String,
    pub standardized_grams: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<Vec<EnrichedComponent>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_quantity_text: Option<String>,
    pub is_default_quantity: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MealView {
    #[serde(flatten)]
    pub meal: Meal,
    pub entries: Vec<MealEntryView>,
}

/// Full picture of one day, goal-relative. `calorie_goal` is the effective
/// goal (base plus burned calories when the user counts workouts toward it).
#[derive(Debug, Clone, Serialize)]
pub struct DailySummary {
    pub date: Date,
    pub calories_consumed: f64,
    pub protein_consumed: f64,
    pub fat_consumed: f64,
    pub carbs_consumed: f64,
    pub water_consumed: i64,
    pub calories_burned: i64,
    pub calorie_goal: i64,
    pub protein_goal: i32,
    pub fat_goal: i32,
    pub carb_goal: i32,
    pub water_goal: i32,
    pub meals: Vec<MealView>,
    pub workouts: Vec<Workout>,
    pub water_entries: Vec<WaterEntry>,
    pub goal_achievement_date: Option<String>,
}
