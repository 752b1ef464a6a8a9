use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use fruitquest_core::score::UserId;
use fruitquest_headless::driver::share;
use fruitquest_headless::{ReplayScript, describe, run_session};
use fruitquest_level::FruitLevel;
use fruitquest_level::collectibles::{load_object_layer, spawn_collectibles};
use fruitquest_level::config::{LevelCatalog, LevelConfig};
use fruitquest_scores::{ScoreClient, ScoreReporter, ScoreServiceConfig};

/// How long to wait for the fire-and-forget submission before exiting.
const REPORT_GRACE: Duration = Duration::from_secs(15);

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn fruit_for(
    level: &LevelConfig,
    script: &ReplayScript,
) -> Vec<fruitquest_level::collectibles::ObjectEntry> {
    if !script.fruit.is_empty() {
        return script.fruit.clone();
    }
    let assets = env_or("FRUITQUEST_ASSETS", "assets");
    let path = format!("{assets}/{}", level.map.tilemap);
    let layer = level.theme.object_layer();
    match std::fs::read_to_string(&path) {
        Ok(json) => load_object_layer(&json, layer).unwrap_or_else(|e| {
            tracing::warn!("Failed to read layer {layer} from {path}: {e}, level has no fruit");
            Vec::new()
        }),
        Err(e) => {
            tracing::warn!("Cannot open {path}: {e}, level has no fruit");
            Vec::new()
        },
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let catalog = LevelCatalog::load();
    let level_name = env_or("FRUITQUEST_LEVEL", "cherry_grove");
    let Some(config) = catalog.get(&level_name).cloned() else {
        tracing::error!("Unknown level {level_name:?}");
        std::process::exit(1);
    };

    let user_id = match std::env::var("FRUITQUEST_USER_ID") {
        Ok(id) if !id.is_empty() => UserId::new(id),
        _ => {
            tracing::error!("FRUITQUEST_USER_ID must be set");
            std::process::exit(1);
        },
    };

    let script = match std::env::var("FRUITQUEST_SCRIPT") {
        Ok(path) => match ReplayScript::load(&path) {
            Ok(script) => script,
            Err(e) => {
                tracing::error!("{path}: {e}");
                std::process::exit(1);
            },
        },
        Err(_) => ReplayScript::default(),
    };

    let tick_ms = env_or("FRUITQUEST_TICK_MS", "1000")
        .parse::<u64>()
        .unwrap_or(1000)
        .max(1);

    let client = match ScoreClient::new(ScoreServiceConfig::from_env()) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        },
    };
    let (reporter, mut reports) =
        ScoreReporter::with_reports(client, tokio::runtime::Handle::current());

    let fruit = spawn_collectibles(&fruit_for(&config, &script));
    tracing::info!(
        level = %config.name,
        level_id = config.level_id,
        fruit = fruit.len(),
        countdown = config.countdown_secs,
        "Starting level"
    );

    let level = share(FruitLevel::new(config, fruit, user_id, Arc::new(reporter)));
    let summary = run_session(level, script, Duration::from_millis(tick_ms)).await;
    for event in &summary.events {
        tracing::debug!("{}", describe(event));
    }
    println!(
        "final score {} after {}s",
        summary.final_score, summary.seconds_elapsed
    );

    match tokio::time::timeout(REPORT_GRACE, reports.recv()).await {
        Ok(Some(report)) => match report.result {
            Ok(outcome) => tracing::info!(?outcome, "Score submitted"),
            Err(e) => tracing::warn!("Score not stored: {e}"),
        },
        Ok(None) => tracing::warn!("Score reporter closed without a report"),
        Err(_) => tracing::warn!("Gave up waiting for the score service"),
    }
}
