use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::analysis::dto::WindowStats;
use crate::meals::dto::TraceComponent;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroTotals {
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
}

/// One interpreted meal description: aggregated totals plus the
/// per-component breakdown that becomes a meal entry's stored trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealDecomposition {
    pub aggregated: MacroTotals,
    pub components: Vec<TraceComponent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroGoals {
    pub calorie_goal: i32,
    pub protein_goal: i32,
    pub fat_goal: i32,
    pub carb_goal: i32,
}

/// External AI collaborator, consumed through this seam only.
///
/// `Ok(None)` from `decompose` or `suggest_plan` means the input could not
/// be interpreted; callers surface that as a recoverable failure, never as
/// zero nutrients.
#[async_trait]
pub trait MealAnalyzer: Send + Sync {
    async fn decompose(&self, text: &str) -> anyhow::Result<Option<MealDecomposition>>;

    async fn weekly_narrative(
        &self,
        stats: &WindowStats,
        start: Date,
        end: Date,
    ) -> anyhow::Result<String>;

    async fn suggest_plan(
        &self,
        preferences: Option<&serde_json::Value>,
        goals: &MacroGoals,
    ) -> anyhow::Result<Option<serde_json::Value>>;
}

/// Stand-in for contexts with no analyzer wired up (seeding, tests).
pub struct NoopAnalyzer;

#[async_trait]
impl MealAnalyzer for NoopAnalyzer {
    async fn decompose(&self, _text: &str) -> anyhow::Result<Option<MealDecomposition>> {
        Ok(None)
    }

    async fn weekly_narrative(
        &self,
        _stats: &WindowStats,
        _start: Date,
        _end: Date,
    ) -> anyhow::Result<String> {
        Ok("No coaching summary is available.".to_string())
    }

    async fn suggest_plan(
        &self,
        _preferences: Option<&serde_json::Value>,
        _goals: &MacroGoals,
    ) -> anyhow::Result<Option<serde_json::Value>> {
        Ok(None)
    }
}
