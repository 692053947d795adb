use std::collections::HashMap;

use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use super::dto::{MealEntryPatch, MealWithEntries, NewMeal, NewMealEntry};
use super::repo::{Meal, MealEntry};
use super::units;
use crate::catalog::repo::Product;
use time::Date;

pub async fn create_meal(db: &PgPool, owner_id: Uuid, new: &NewMeal) -> anyhow::Result<Meal> {
    Meal::create(db, owner_id, new).await
}

async fn average_unit_mass(db: &PgPool, product_name: &str) -> anyhow::Result<Option<f64>> {
    Ok(Product::find_by_name(db, product_name)
        .await?
        .map(|p| p.average_unit_g)
        .filter(|g| *g > 0.0))
}

/// Records an entry with the quantity/unit exactly as entered plus the
/// standardized mass used by aggregation. Piece-style units resolve the
/// product's average single-unit mass from the catalog.
pub async fn add_entry(
    db: &PgPool,
    meal_id: Uuid,
    new: &NewMealEntry,
) -> anyhow::Result<MealEntry> {
    let avg = average_unit_mass(db, &new.product_name).await?;
    let grams = units::standardized_grams(new.amount, &new.unit, avg);
    MealEntry::insert(db, meal_id, new, grams).await
}

// Returns whether the entered quantity changed, which forces a
// re-standardization of the mass.
fn apply_patch(entry: &mut MealEntry, patch: MealEntryPatch) -> bool {
    let quantity_changed = patch.amount.is_some() || patch.unit.is_some();

    if let Some(v) = patch.product_name {
        entry.product_name = v;
    }
    if let Some(v) = patch.calories {
        entry.calories = v;
    }
    if let Some(v) = patch.protein {
        entry.protein = v;
    }
    if let Some(v) = patch.fat {
        entry.fat = v;
    }
    if let Some(v) = patch.carbs {
        entry.carbs = v;
    }
    if let Some(v) = patch.amount {
        entry.original_amount = v;
    }
    if let Some(v) = patch.unit {
        entry.original_unit = v;
    }
    if let Some(v) = patch.trace {
        entry.trace = Some(Json(v));
    }
    if let Some(v) = patch.display_quantity_text {
        entry.display_quantity_text = Some(v);
    }
    if let Some(v) = patch.is_default_quantity {
        entry.is_default_quantity = v;
    }

    quantity_changed
}

/// Applies a partial update; a present trace replaces the stored trace
/// wholesale. No ownership check happens at this layer; callers verify the
/// entry belongs to the requesting user before updating.
pub async fn update_entry(
    db: &PgPool,
    entry_id: Uuid,
    patch: MealEntryPatch,
) -> anyhow::Result<Option<MealEntry>> {
    let Some(mut entry) = MealEntry::get(db, entry_id).await? else {
        return Ok(None);
    };

    if apply_patch(&mut entry, patch) {
        let avg = average_unit_mass(db, &entry.product_name).await?;
        entry.standardized_grams =
            units::standardized_grams(entry.original_amount, &entry.original_unit, avg);
    }

    let updated = MealEntry::update_row(db, &entry).await?;
    Ok(Some(updated))
}

pub async fn delete_entry(db: &PgPool, entry_id: Uuid, owner_id: Uuid) -> anyhow::Result<bool> {
    MealEntry::delete_owned(db, entry_id, owner_id).await
}

async fn attach_entries(db: &PgPool, meals: Vec<Meal>) -> anyhow::Result<Vec<MealWithEntries>> {
    let ids: Vec<Uuid> = meals.iter().map(|m| m.id).collect();
    let entries = MealEntry::for_meals(db, &ids).await?;

    let mut by_meal: HashMap<Uuid, Vec<MealEntry>> = HashMap::new();
    for entry in entries {
        by_meal.entry(entry.meal_id).or_default().push(entry);
    }

    Ok(meals
        .into_iter()
        .map(|meal| MealWithEntries {
            entries: by_meal.remove(&meal.id).unwrap_or_default(),
            meal,
        })
        .collect())
}

pub async fn meals_with_entries_by_date(
    db: &PgPool,
    owner_id: Uuid,
    date: Date,
) -> anyhow::Result<Vec<MealWithEntries>> {
    let meals = Meal::by_date(db, owner_id, date).await?;
    attach_entries(db, meals).await
}

pub async fn meals_with_entries_in_range(
    db: &PgPool,
    owner_id: Uuid,
    start: Date,
    end: Date,
) -> anyhow::Result<Vec<MealWithEntries>> {
    let meals = Meal::in_range(db, owner_id, start, end).await?;
    attach_entries(db, meals).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meals::dto::TraceComponent;

    fn sample_entry() -> MealEntry {
        MealEntry {
            id: Uuid::new_v4(),
            meal_id: Uuid::new_v4(),
            product_name: "Oatmeal".into(),
            calories: 389.0,
            protein: 16.9,
            fat: 6.9,
            carbs: 66.3,
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
            quantity_grams: 50.0,
            calories: 10.0,
            protein: 1.0,
            fat: 0.5,
            carbs: 2.0,
            display_quantity_text: None,
            is_default_quantity: false,
        }
    }

    #[test]
    fn patch_replaces_trace_wholesale() {
        let mut entry = sample_entry();
        entry.trace = Some(Json(vec![component("rice"), component("chicken")]));

        let patch = MealEntryPatch {
            trace: Some(vec![component("salmon")]),
            ..Default::default()
        };
        apply_patch(&mut entry, patch);

        let trace = entry.trace.expect("trace should remain present");
        assert_eq!(trace.0.len(), 1);
        assert_eq!(trace.0[0].name, "salmon");
    }

    #[test]
    fn patch_leaves_absent_fields_untouched() {
        let mut entry = sample_entry();
        let patch = MealEntryPatch {
            calories: Some(400.0),
            ..Default::default()
        };
        let quantity_changed = apply_patch(&mut entry, patch);

        assert!(!quantity_changed);
        assert_eq!(entry.calories, 400.0);
        assert_eq!(entry.protein, 16.9);
        assert_eq!(entry.product_name, "Oatmeal");
    }

    #[test]
    fn quantity_fields_flag_restandardization() {
        let mut entry = sample_entry();
        let patch = MealEntryPatch {
            amount: Some(2.0),
            unit: Some("piece".into()),
            ..Default::default()
        };
        assert!(apply_patch(&mut entry, patch));
        assert_eq!(entry.original_amount, 2.0);
        assert_eq!(entry.original_unit, "piece");
    }
}
