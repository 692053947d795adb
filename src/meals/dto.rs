use serde::{Deserialize, Serialize};
use time::{Date, Time};

use super::repo::{Meal, MealEntry};

/// One named sub-component of a decomposed entry, as persisted. The macro
/// numbers are frozen at logging time; the read-time view
/// (`summary::dto::EnrichedComponent`) is a separate type that joins in
/// current catalog data without touching this snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceComponent {
    pub name: String,
    pub quantity_grams: f64,
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_quantity_text: Option<String>,
    #[serde(default)]
    pub is_default_quantity: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewMeal {
    pub name: String,
    pub category: String,
    pub date: Date,
    #[serde(default)]
    pub time: Option<Time>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewMealEntry {
    pub product_name: String,
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    pub amount: f64,
    pub unit: String,
    #[serde(default)]
    pub trace: Option<Vec<TraceComponent>>,
    #[serde(default)]
    pub display_quantity_text: Option<String>,
    #[serde(default)]
    pub is_default_quantity: bool,
}

/// Partial update. A present `trace` replaces the stored list wholesale;
/// absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MealEntryPatch {
    pub product_name: Option<String>,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub fat: Option<f64>,
    pub carbs: Option<f64>,
    pub amount: Option<f64>,
    pub unit: Option<String>,
    pub trace: Option<Vec<TraceComponent>>,
    pub display_quantity_text: Option<String>,
    pub is_default_quantity: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MealWithEntries {
    #[serde(flatten)]
    pub meal: Meal,
    pub entries: Vec<MealEntry>,
}
