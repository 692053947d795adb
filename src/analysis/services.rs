use sqlx::PgPool;
use time::{Date, Duration, OffsetDateTime};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::dto::{AvgMacros, WeeklyAnalysis, WeightChart, WindowStats};
use crate::analyzer::{MacroGoals, MealDecomposition};
use crate::error::EngineError;
use crate::meals::dto::MealWithEntries;
use crate::meals::services::meals_with_entries_in_range;
use crate::state::AppState;
use crate::tracking::repo::{WeightEntry, Workout};
use crate::users::repo::Goals;

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Windowed statistics over an inclusive date range. The day count is
/// `end - start + 1`; a non-positive count (prevented upstream) degrades to
/// zero averages instead of dividing by zero.
pub fn window_stats(
    start: Date,
    end: Date,
    meals: &[MealWithEntries],
    workouts: &[Workout],
    weights: &[WeightEntry],
) -> WindowStats {
    let day_count = (end - start).whole_days() + 1;

    let mut calories = 0.0;
    let mut protein = 0.0;
    let mut fat = 0.0;
    let mut carbs = 0.0;
    for entry in meals.iter().flat_map(|m| m.entries.iter()) {
        calories += entry.calories;
        protein += entry.protein;
        fat += entry.fat;
        carbs += entry.carbs;
    }

    let avg_macros = if day_count <= 0 {
        AvgMacros {
            calories: 0,
            protein: 0.0,
            fat: 0.0,
            carbs: 0.0,
        }
    } else {
        let days = day_count as f64;
        AvgMacros {
            calories: (calories / days).round() as i64,
            protein: round1(protein / days),
            fat: round1(fat / days),
            carbs: round1(carbs / days),
        }
    };

    let mut points: Vec<(Date, f64)> = weights.iter().map(|w| (w.date, w.weight_kg)).collect();
    points.sort_by_key(|(date, _)| *date);

    WindowStats {
        avg_macros,
        total_workouts: workouts.len() as i64,
        total_calories_burned: workouts.iter().map(|w| w.calories_burned as i64).sum(),
        weight_chart_data: WeightChart {
            labels: points.iter().map(|(date, _)| date.to_string()).collect(),
            values: points.iter().map(|(_, value)| *value).collect(),
        },
    }
}

/// Advisory regeneration check: true when no analysis exists yet or the
/// cooldown has passed. Compared, not locked; enforcement stays best-effort.
pub fn cooldown_elapsed(
    last_generated_at: Option<OffsetDateTime>,
    now: OffsetDateTime,
    cooldown_hours: i64,
) -> bool {
    match last_generated_at {
        None => true,
        Some(t) => now - t >= Duration::hours(cooldown_hours),
    }
}

fn parse_cached(payload: &str) -> Result<WeeklyAnalysis, EngineError> {
    serde_json::from_str(payload).map_err(EngineError::CorruptedCache)
}

/// Computes the windowed analysis, folds in the collaborator's narrative,
/// and persists the result as the user's latest-analysis cache.
#[instrument(skip(state))]
pub async fn generate_analysis(
    state: &AppState,
    user_id: Uuid,
    start: Date,
    end: Date,
) -> Result<WeeklyAnalysis, EngineError> {
    if end < start {
        return Err(EngineError::InvalidWindow);
    }
    let Some(goals) = Goals::get(&state.db, user_id).await? else {
        return Err(EngineError::NotFound);
    };

    // Advisory only; blocking early regenerations is the serving layer's call.
    if !cooldown_elapsed(
        goals.last_analysis_generated_at,
        OffsetDateTime::now_utc(),
        state.config.analysis_cooldown_hours,
    ) {
        warn!(%user_id, "regenerating analysis within the cooldown window");
    }

    let meals = meals_with_entries_in_range(&state.db, user_id, start, end).await?;
    let workouts = Workout::in_range(&state.db, user_id, start, end).await?;
    let weights = WeightEntry::history_in_range(&state.db, user_id, start, end).await?;

    let stats = window_stats(start, end, &meals, &workouts, &weights);
    let narrative = state
        .analyzer
        .weekly_narrative(&stats, start, end)
        .await
        .map_err(EngineError::Db)?;

    let WindowStats {
        avg_macros,
        total_workouts,
        total_calories_burned,
        weight_chart_data,
    } = stats;
    let analysis = WeeklyAnalysis {
        ai_coach_summary: narrative,
        avg_macros,
        total_workouts,
        total_calories_burned,
        weight_chart_data,
        analysis_start_date: start,
        analysis_end_date: end,
    };

    let payload = serde_json::to_string(&analysis).map_err(|e| EngineError::Db(e.into()))?;
    Goals::store_weekly_analysis(&state.db, user_id, &payload, OffsetDateTime::now_utc()).await?;
    info!(%user_id, %start, %end, "weekly analysis generated");

    Ok(analysis)
}

/// Serves the cached analysis as-is. Missing cache is a not-found outcome;
/// an unreadable payload is a read error, never silently replaced.
pub async fn latest_analysis(db: &PgPool, user_id: Uuid) -> Result<WeeklyAnalysis, EngineError> {
    let Some(goals) = Goals::get(db, user_id).await? else {
        return Err(EngineError::NotFound);
    };
    let Some(payload) = goals.last_weekly_analysis else {
        return Err(EngineError::NotFound);
    };
    parse_cached(&payload)
}

/// Free-text meal interpretation through the collaborator. A null result is
/// a recoverable "could not analyze", never zero nutrients.
pub async fn analyze_free_text(
    state: &AppState,
    text: &str,
) -> Result<MealDecomposition, EngineError> {
    state
        .analyzer
        .decompose(text)
        .await
        .map_err(EngineError::Db)?
        .ok_or(EngineError::CouldNotAnalyze)
}

/// Requests a diet plan within the advisory daily quota and caches the
/// returned payload on the user row.
#[instrument(skip(state))]
pub async fn suggest_diet_plan(
    state: &AppState,
    user_id: Uuid,
) -> Result<serde_json::Value, EngineError> {
    let Some(goals) = Goals::get(&state.db, user_id).await? else {
        return Err(EngineError::NotFound);
    };

    let today = OffsetDateTime::now_utc().date();
    if goals.last_request_date == Some(today)
        && goals.diet_plan_requests >= state.config.plan_requests_per_day
    {
        return Err(EngineError::QuotaExhausted);
    }

    let macro_goals = MacroGoals {
        calorie_goal: goals.calorie_goal,
        protein_goal: goals.protein_goal,
        fat_goal: goals.fat_goal,
        carb_goal: goals.carb_goal,
    };
    let plan = state
        .analyzer
        .suggest_plan(goals.preferences.as_ref().map(|p| &p.0), &macro_goals)
        .await
        .map_err(EngineError::Db)?;
    let Some(plan) = plan else {
        return Err(EngineError::CouldNotAnalyze);
    };

    let payload = serde_json::to_string(&plan).map_err(|e| EngineError::Db(e.into()))?;
    Goals::record_plan_request(&state.db, user_id, today, &payload).await?;

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meals::repo::{Meal, MealEntry};
    use time::macros::{date, datetime};

    fn meal_with(entries: Vec<MealEntry>) -> MealWithEntries {
        MealWithEntries {
            meal: Meal {
                id: Uuid::new_v4(),
                owner_id: Uuid::new_v4(),
                name: "Lunch".into(),
                category: "lunch".into(),
                date: date!(2026 - 08 - 01),
                time: None,
            },
            entries,
        }
    }

    fn entry(calories: f64, protein: f64) -> MealEntry {
        MealEntry {
            id: Uuid::new_v4(),
            meal_id: Uuid::new_v4(),
            product_name: "Rice".into(),
            calories,
            protein,
            fat: 0.0,
            carbs: 0.0,
            original_amount: 100.0,
            original_unit: "g".into(),
            standardized_grams: 100.0,
            trace: None,
            display_quantity_text: None,
            is_default_quantity: false,
        }
    }

    fn weight(date: Date, weight_kg: f64) -> WeightEntry {
        WeightEntry {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            weight_kg,
            date,
        }
    }

    fn workout(calories_burned: i32) -> Workout {
        Workout {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            name: "Bike".into(),
            calories_burned,
            date: date!(2026 - 08 - 02),
        }
    }

    #[test]
    fn seven_day_window_averages_with_integer_rounding() {
        // entries on three days only, totalling 14000 kcal over 7 days
        let meals = vec![
            meal_with(vec![entry(6000.0, 70.0)]),
            meal_with(vec![entry(5000.0, 0.0)]),
            meal_with(vec![entry(3000.0, 0.0)]),
        ];
        let stats = window_stats(
            date!(2026 - 08 - 01),
            date!(2026 - 08 - 07),
            &meals,
            &[],
            &[],
        );

        assert_eq!(stats.avg_macros.calories, 2000);
        assert_eq!(stats.avg_macros.protein, 10.0);
    }

    #[test]
    fn macro_averages_round_to_one_decimal() {
        // 100 / 3 days = 33.333...
        let meals = vec![meal_with(vec![entry(100.0, 100.0)])];
        let stats = window_stats(
            date!(2026 - 08 - 01),
            date!(2026 - 08 - 03),
            &meals,
            &[],
            &[],
        );

        assert_eq!(stats.avg_macros.calories, 33);
        assert_eq!(stats.avg_macros.protein, 33.3);
    }

    #[test]
    fn inverted_window_degrades_to_zero_averages() {
        let meals = vec![meal_with(vec![entry(1000.0, 50.0)])];
        let stats = window_stats(
            date!(2026 - 08 - 07),
            date!(2026 - 08 - 01),
            &meals,
            &[],
            &[],
        );

        assert_eq!(stats.avg_macros.calories, 0);
        assert_eq!(stats.avg_macros.protein, 0.0);
    }

    #[test]
    fn workout_totals_count_and_sum() {
        let stats = window_stats(
            date!(2026 - 08 - 01),
            date!(2026 - 08 - 07),
            &[],
            &[workout(300), workout(450)],
            &[],
        );

        assert_eq!(stats.total_workouts, 2);
        assert_eq!(stats.total_calories_burned, 750);
    }

    #[test]
    fn weight_chart_is_date_ascending_and_index_aligned() {
        let weights = vec![
            weight(date!(2026 - 08 - 05), 79.2),
            weight(date!(2026 - 08 - 01), 80.0),
            weight(date!(2026 - 08 - 03), 79.6),
        ];
        let stats = window_stats(
            date!(2026 - 08 - 01),
            date!(2026 - 08 - 07),
            &[],
            &[],
            &weights,
        );

        let chart = &stats.weight_chart_data;
        assert_eq!(chart.labels.len(), chart.values.len());
        assert_eq!(
            chart.labels,
            vec!["2026-08-01", "2026-08-03", "2026-08-05"]
        );
        assert_eq!(chart.values, vec![80.0, 79.6, 79.2]);
    }

    #[test]
    fn cooldown_compares_against_the_configured_hours() {
        let generated = datetime!(2026-08-05 12:00 UTC);
        assert!(!cooldown_elapsed(
            Some(generated),
            datetime!(2026-08-06 11:59 UTC),
            24
        ));
        assert!(cooldown_elapsed(
            Some(generated),
            datetime!(2026-08-06 12:00 UTC),
            24
        ));
        assert!(cooldown_elapsed(None, generated, 24));
    }

    #[test]
    fn cached_payload_round_trips() {
        let analysis = WeeklyAnalysis {
            ai_coach_summary: "Steady week.".into(),
            avg_macros: AvgMacros {
                calories: 2000,
                protein: 101.5,
                fat: 70.0,
                carbs: 240.2,
            },
            total_workouts: 3,
            total_calories_burned: 1250,
            weight_chart_data: WeightChart {
                labels: vec!["2026-08-01".into(), "2026-08-07".into()],
                values: vec![80.0, 79.4],
            },
            analysis_start_date: date!(2026 - 08 - 01),
            analysis_end_date: date!(2026 - 08 - 07),
        };

        let payload = serde_json::to_string(&analysis).expect("serializes");
        let parsed = parse_cached(&payload).expect("parses back");
        assert_eq!(parsed, analysis);
    }

    #[test]
    fn corrupted_cache_payload_is_a_read_error() {
        let err = parse_cached("{not valid json").expect_err("must not parse");
        assert!(matches!(err, EngineError::CorruptedCache(_)));
    }
}
