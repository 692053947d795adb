use serde::Deserialize;
use time::{Date, Time};

#[derive(Debug, Clone, Deserialize)]
pub struct NewWorkout {
    pub name: String,
    pub calories_burned: i32,
    pub date: Date,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewWaterEntry {
    pub amount_ml: i32,
    pub date: Date,
    #[serde(default)]
    pub time: Option<Time>,
}
