use chrono::NaiveDate;
use clap::Parser;
use courtside::cli::{Args, is_config_operation};
use courtside::config::Config;
use courtside::data_fetcher::api::BallDontLieClient;
use courtside::error::AppError;
use courtside::logging::setup_logging;
use courtside::server::{self, AppState};
use courtside::storage::Database;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Handles `--list-config`, `--set-api-key` and `--set-db-path`.
///
/// Works on the raw config file so a missing API key does not block setting one.
async fn handle_config_operation(args: &Args) -> Result<(), AppError> {
    if args.list_config {
        return Config::display().await;
    }

    let config_path = Config::get_config_path();
    let mut config = if Path::new(&config_path).exists() {
        Config::load_from_path(&config_path).await?
    } else {
        Config::default()
    };

    if let Some(key) = &args.new_api_key {
        let key = key.trim();
        if key.is_empty() {
            return Err(AppError::config_error("API key must not be empty"));
        }
        config.api_key = Some(key.to_string());
        println!("API key updated");
    }

    if let Some(db_path) = &args.new_db_path {
        config.database_path = Some(db_path.clone());
        println!("Database path set to: {db_path}");
    }

    config.save().await?;
    println!("Configuration saved to {config_path}");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();

    if is_config_operation(&args) {
        return handle_config_operation(&args).await;
    }

    // Missing or invalid configuration aborts startup before anything is served
    let mut config = Config::load().await?;
    if let Some(bind) = &args.bind {
        config.bind_address = bind.clone();
        config.validate()?;
    }

    let (log_file_path, _guard) = setup_logging(&args, &config).await?;
    info!("Logs are being written to: {log_file_path}");

    let db = Arc::new(Database::open(config.database_path())?);
    let client = BallDontLieClient::new(&config)?;
    info!("Upstream API: {}", client.base_url());
    let state = AppState::new(db, client);

    if let Some(raw_date) = &args.hydrate_date {
        let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d").map_err(|e| {
            AppError::datetime_parse_error(format!("Invalid --hydrate-date {raw_date:?}: {e}"))
        })?;
        let games = state.games.list_games_for_date(date).await?;
        info!("{} games stored for {date}", games.len());
        return Ok(());
    }

    match state.teams.ensure_loaded().await {
        Ok(index) => info!("Team directory warm with {} teams", index.len()),
        Err(e) => warn!("Could not warm team directory, will retry on first request: {e}"),
    }

    let addr: SocketAddr = config.bind_address.parse().map_err(|e| {
        AppError::config_error(format!("Invalid bind address {:?}: {e}", config.bind_address))
    })?;
    server::serve(addr, state).await
}
