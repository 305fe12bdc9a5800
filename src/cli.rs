use clap::Parser;
use clap::builder::styling::{AnsiColor, Effects, Styles};

fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Red.on_default())
}

/// Config-only invocations print or edit settings and exit without serving.
pub fn is_config_operation(args: &Args) -> bool {
    args.list_config || args.new_api_key.is_some() || args.new_db_path.is_some()
}

/// Courtside: a read-through cache over the balldontlie NBA API
///
/// Serves games and teams from a local SQLite store, hydrating it from the
/// upstream API on a miss, and streams per-team aggregate stats as CSV.
///
/// The API key is read from BALLDONTLIE_API_KEY or the config file.
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
#[command(styles = get_styles())]
pub struct Args {
    /// Address to listen on, e.g. 0.0.0.0:8080. Overrides config and COURTSIDE_BIND.
    #[arg(long = "bind", short = 'b', value_name = "ADDR")]
    pub bind: Option<String>,

    /// Hydrate games for one date (YYYY-MM-DD) into the store and exit.
    /// Intended for a daily scheduler.
    #[arg(long = "hydrate-date", value_name = "DATE", help_heading = "Maintenance")]
    pub hydrate_date: Option<String>,

    /// List current configuration settings
    #[arg(long = "list-config", short = 'l', help_heading = "Configuration")]
    pub list_config: bool,

    /// Store the upstream API key in the config file.
    #[arg(long = "set-api-key", value_name = "KEY", help_heading = "Configuration")]
    pub new_api_key: Option<String>,

    /// Store a custom database path in the config file.
    #[arg(long = "set-db-path", value_name = "PATH", help_heading = "Configuration")]
    pub new_db_path: Option<String>,

    /// Enable debug-level logging for this crate.
    #[arg(long = "debug", help_heading = "Debug")]
    pub debug: bool,

    /// Custom log file path. Defaults to the platform log directory.
    #[arg(long = "log-file", help_heading = "Debug")]
    pub log_file: Option<String>,
}
