use serde::{Deserialize, Serialize};
use time::Date;

/// Daily averages over the analysis window. Calories are rounded to a whole
/// number, the remaining macros to one decimal place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvgMacros {
    pub calories: i64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
}

/// Index-aligned chart series: `labels[i]` (ISO date) pairs with
/// `values[i]`, date-ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightChart {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowStats {
    pub avg_macros: AvgMacros,
    pub total_workouts: i64,
    pub total_calories_burned: i64,
    pub weight_chart_data: WeightChart,
}

/// The windowed analysis served to the user and persisted verbatim as the
/// per-user cache payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyAnalysis {
    pub ai_coach_summary: String,
    pub avg_macros: AvgMacros,
    pub total_workouts: i64,
    pub total_calories_burned: i64,
    pub weight_chart_data: WeightChart,
    pub analysis_start_date: Date,
    pub analysis_end_date: Date,
}
