use std::collections::HashMap;

use tracing::instrument;
use uuid::Uuid;

use super::dto::{DailySummary, EnrichedComponent, MealEntryView, MealView};
use super::projection;
use crate::catalog::dto::NutrientProfile;
use crate::catalog::repo::Product;
use crate::error::EngineError;
use crate::meals::dto::{MealWithEntries, TraceComponent};
use crate::meals::services::meals_with_entries_by_date;
use crate::state::AppState;
use crate::tracking::repo::{WaterEntry, WeightEntry, Workout};
use crate::users::repo::Goals;
use time::Date;

#[derive(Debug, Default, PartialEq)]
pub(crate) struct DayTotals {
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    pub water: i64,
    pub burned: i64,
}

// Sums are taken over the frozen per-entry snapshots; later catalog changes
// never alter them.
pub(crate) fn day_totals(
    meals: &[MealWithEntries],
    workouts: &[Workout],
    water: &[WaterEntry],
) -> DayTotals {
    let mut totals = DayTotals::default();
    for entry in meals.iter().flat_map(|m| m.entries.iter()) {
        totals.calories += entry.calories;
        totals.protein += entry.protein;
        totals.fat += entry.fat;
        totals.carbs += entry.carbs;
    }
    totals.burned = workouts.iter().map(|w| w.calories_burned as i64).sum();
    totals.water = water.iter().map(|w| w.amount_ml as i64).sum();
    totals
}

pub(crate) fn effective_calorie_goal(base: i32, burned: i64, count_workouts: bool) -> i64 {
    if count_workouts {
        base as i64 + burned
    } else {
        base as i64
    }
}

/// Joins stored trace components with the catalog's current profiles, keyed
/// by lowercased name. Unresolved components are kept, just without the
/// `nutrients_per_100g` field. Pure and idempotent: the input snapshot is
/// untouched and re-running produces the same view.
pub fn enrich_trace(
    components: &[TraceComponent],
    catalog: &HashMap<String, NutrientProfile>,
) -> Vec<EnrichedComponent> {
    components
        .iter()
        .map(|component| EnrichedComponent {
            component: component.clone(),
            nutrients_per_100g: catalog.get(&component.name.to_lowercase()).copied(),
        })
        .collect()
}

fn trace_names(meals: &[MealWithEntries]) -> Vec<String> {
    let mut names: Vec<String> = meals
        .iter()
        .flat_map(|m| m.entries.iter())
        .filter_map(|e| e.trace.as_ref())
        .flat_map(|trace| trace.0.iter().map(|c| c.name.clone()))
        .collect();
    names.sort();
    names.dedup();
    names
}

fn entry_views(
    meals: Vec<MealWithEntries>,
    catalog: &HashMap<String, NutrientProfile>,
) -> Vec<MealView> {
    meals
        .into_iter()
        .map(|m| MealView {
            entries: m
                .entries
                .into_iter()
                .map(|e| MealEntryView {
                    id: e.id,
                    product_name: e.product_name,
                    calories: e.calories,
                    protein: e.protein,
                    fat: e.fat,
                    carbs: e.carbs,
                    original_amount: e.original_amount,
                    original_unit: e.original_unit,
                    standardized_grams: e.standardized_grams,
                    trace: e.trace.map(|t| enrich_trace(&t.0, catalog)),
                    display_quantity_text: e.display_quantity_text,
                    is_default_quantity: e.is_default_quantity,
                })
                .collect(),
            meal: m.meal,
        })
        .collect()
}

/// Aggregates one day of logs into a goal-relative summary over a single
/// snapshot of the stores, with read-time trace enrichment against the
/// current catalog.
#[instrument(skip(state))]
pub async fn daily_summary(
    state: &AppState,
    user_id: Uuid,
    date: Date,
) -> Result<DailySummary, EngineError> {
    let Some(goals) = Goals::get(&state.db, user_id).await? else {
        return Err(EngineError::NotFound);
    };

    let meals = meals_with_entries_by_date(&state.db, user_id, date).await?;
    let workouts = Workout::by_date(&state.db, user_id, date).await?;
    let water_entries = WaterEntry::by_date(&state.db, user_id, date).await?;

    let catalog = Product::nutrients_for_names(&state.db, &trace_names(&meals)).await?;
    let totals = day_totals(&meals, &workouts, &water_entries);
    let meal_views = entry_views(meals, &catalog);

    let goal_achievement_date = match (
        WeightEntry::latest(&state.db, user_id).await?,
        goals.target_weight_kg,
    ) {
        (Some(current), Some(target)) => {
            projection::goal_achievement_date(current.weight_kg, target, goals.weekly_goal_kg)
                .map(|d| d.to_string())
        }
        _ => None,
    };

    Ok(DailySummary {
        date,
        calories_consumed: totals.calories,
        protein_consumed: totals.protein,
        fat_consumed: totals.fat,
        carbs_consumed: totals.carbs,
        water_consumed: totals.water,
        calories_burned: totals.burned,
        calorie_goal: effective_calorie_goal(
            goals.calorie_goal,
            totals.burned,
            goals.add_workout_calories_to_goal,
        ),
        protein_goal: goals.protein_goal,
        fat_goal: goals.fat_goal,
        carb_goal: goals.carb_goal,
        water_goal: goals.water_goal,
        meals: meal_views,
        workouts,
        water_entries,
        goal_achievement_date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meals::repo::{Meal, MealEntry};
    use sqlx::types::Json;
    use time::macros::date;

    fn meal_with(entries: Vec<MealEntry>) -> MealWithEntries {
        MealWithEntries {
            meal: Meal {
                id: Uuid::new_v4(),
                owner_id: Uuid::new_v4(),
                name: "Breakfast".into(),
                category: "breakfast".into(),
                date: date!(2026 - 08 - 06),
                time: None,
            },
            entries,
        }
    }

    fn entry(calories: f64, protein: f64, fat: f64, carbs: f64) -> MealEntry {
        MealEntry {
            id: Uuid::new_v4(),
            meal_id: Uuid::new_v4(),
            product_name: "Oatmeal".into(),
            calories,
            protein,
            fat,
            carbs,
            original_amount: 100.0,
            original_unit: "g".into(),
            standardized_grams: 100.0,
            trace: None,
            display_quantity_text: None,
            is_default_quantity: false,
        }
    }

    fn component(name: &str) -> TraceComponent {
        TraceComponent {
            name: name.into(),
            quantity_grams: 120.0,
            calories: 150.0,
            protein: 8.0,
            fat: 3.0,
            carbs: 20.0,
            display_quantity_text: Some("1 serving".into()),
            is_default_quantity: true,
        }
    }

    fn workout(calories_burned: i32) -> Workout {
        Workout {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            name: "Run".into(),
            calories_burned,
            date: date!(2026 - 08 - 06),
        }
    }

    fn water(amount_ml: i32) -> WaterEntry {
        WaterEntry {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            amount_ml,
            date: date!(2026 - 08 - 06),
            time: None,
        }
    }

    #[test]
    fn totals_sum_frozen_snapshots_across_meals() {
        let meals = vec![
            meal_with(vec![
                entry(350.0, 20.0, 10.0, 40.0),
                entry(150.0, 5.0, 2.0, 25.0),
            ]),
            meal_with(vec![entry(500.0, 30.0, 20.0, 45.0)]),
        ];
        let totals = day_totals(&meals, &[workout(300), workout(200)], &[water(250), water(500)]);

        assert_eq!(totals.calories, 1000.0);
        assert_eq!(totals.protein, 55.0);
        assert_eq!(totals.fat, 32.0);
        assert_eq!(totals.carbs, 110.0);
        assert_eq!(totals.burned, 500);
        assert_eq!(totals.water, 750);
    }

    #[test]
    fn totals_ignore_current_catalog_state() {
        // The entry carries a trace whose product now has different catalog
        // numbers; the day's sums still come from the stored snapshot.
        let mut e = entry(350.0, 20.0, 10.0, 40.0);
        e.trace = Some(Json(vec![component("oats")]));
        let totals = day_totals(&[meal_with(vec![e])], &[], &[]);
        assert_eq!(totals.calories, 350.0);
    }

    #[test]
    fn effective_goal_counts_workouts_only_when_enabled() {
        assert_eq!(effective_calorie_goal(2000, 450, false), 2000);
        assert_eq!(effective_calorie_goal(2000, 450, true), 2450);
    }

    #[test]
    fn enrichment_attaches_current_profile_case_insensitively() {
        let catalog = HashMap::from([(
            "oats".to_string(),
            NutrientProfile {
                calories: 389.0,
                protein: 16.9,
                fat: 6.9,
                carbs: 66.3,
            },
        )]);
        let enriched = enrich_trace(&[component("Oats")], &catalog);

        assert_eq!(enriched.len(), 1);
        let profile = enriched[0]
            .nutrients_per_100g
            .expect("profile should resolve");
        assert_eq!(profile.calories, 389.0);
        // the stored snapshot is carried over untouched
        assert_eq!(enriched[0].component.calories, 150.0);
    }

    #[test]
    fn enrichment_keeps_unresolved_components_without_profile() {
        let enriched = enrich_trace(&[component("mystery sauce")], &HashMap::new());
        assert_eq!(enriched.len(), 1);
        assert!(enriched[0].nutrients_per_100g.is_none());

        let json = serde_json::to_value(&enriched[0]).expect("serializes");
        assert!(json.get("nutrients_per_100g").is_none());
        assert_eq!(json["name"], "mystery sauce");
    }

    #[test]
    fn enrichment_is_idempotent() {
        let catalog = HashMap::from([("oats".to_string(), NutrientProfile::ZERO)]);
        let components = vec![component("oats"), component("milk")];

        let once = enrich_trace(&components, &catalog);
        let twice = enrich_trace(&components, &catalog);
        assert_eq!(once, twice);

        // re-enriching the already-enriched carrier must not stack fields
        let json_once = serde_json::to_value(&once).expect("serializes");
        let json_twice = serde_json::to_value(&twice).expect("serializes");
        assert_eq!(json_once, json_twice);
    }

    #[test]
    fn trace_names_are_deduplicated() {
        let mut a = entry(1.0, 0.0, 0.0, 0.0);
        a.trace = Some(Json(vec![component("Oats"), component("milk")]));
        let mut b = entry(2.0, 0.0, 0.0, 0.0);
        b.trace = Some(Json(vec![component("Oats")]));

        let names = trace_names(&[meal_with(vec![a, b])]);
        assert_eq!(names, vec!["Oats".to_string(), "milk".to_string()]);
    }
}
