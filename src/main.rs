use nutrilog::catalog::seed;
use nutrilog::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "nutrilog=debug,sqlx=warn".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let state = AppState::init().await?;

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| state.config.seed_file.clone());
    tracing::info!(%path, "seeding catalog");

    let report = seed::run(&state.db, &path).await?;
    tracing::info!(
        products = report.products,
        dishes = report.dishes,
        skipped = report.skipped,
        "seed complete"
    );

    Ok(())
}
