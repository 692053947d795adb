use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub seed_file: String,
    /// Advisory daily quota for diet plan generation.
    pub plan_requests_per_day: i32,
    /// Advisory cooldown between weekly analysis regenerations.
    pub analysis_cooldown_hours: i64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let seed_file =
            std::env::var("SEED_FILE").unwrap_or_else(|_| "data/master_data.json".into());
        let plan_requests_per_day = std::env::var("PLAN_REQUESTS_PER_DAY")
            .ok()
            .and_then(|v| v.parse::<i32>().ok())
            .unwrap_or(3);
        let analysis_cooldown_hours = std::env::var("ANALYSIS_COOLDOWN_HOURS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(24);
        Ok(Self {
            database_url,
            seed_file,
            plan_requests_per_day,
            analysis_cooldown_hours,
        })
    }
}
