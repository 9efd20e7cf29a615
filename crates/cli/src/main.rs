mod announcement_commands;
mod channel_commands;
mod config_commands;
mod db_commands;

use std::path::PathBuf;

use {
    clap::{Parser, Subcommand},
    herald_config::HeraldConfig,
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "herald", about = "Herald, Telegram announcement broadcaster", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file to load instead of searching the standard locations.
    #[arg(long, global = true, env = "HERALD_CONFIG")]
    config: Option<PathBuf>,
    /// Address for the admin API (overrides config value).
    #[arg(long, global = true)]
    bind: Option<String>,
    /// Port for the admin API (overrides config value).
    #[arg(long, global = true)]
    port: Option<u16>,
    /// Database URL (overrides config value).
    #[arg(long, global = true)]
    database_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the bot and the admin API (default when no subcommand is provided).
    Serve,
    /// Destination channel management.
    Channels {
        #[command(subcommand)]
        action: channel_commands::ChannelAction,
    },
    /// Announcement history.
    Announcements {
        #[command(subcommand)]
        action: announcement_commands::AnnouncementAction,
    },
    /// Database management.
    Db {
        #[command(subcommand)]
        action: db_commands::DbAction,
    },
    /// Configuration checks.
    Config {
        #[command(subcommand)]
        action: config_commands::ConfigAction,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Resolve the effective config: file, then environment, then CLI flags.
/// Resolve the effective config and the file it was read from, if any.
fn load_config(cli: &Cli) -> anyhow::Result<(HeraldConfig, Option<PathBuf>)> {
    let (mut config, source) = match cli.config {
        Some(ref path) => {
            let mut config = herald_config::load_config(path)?;
            herald_config::apply_env_overrides(&mut config, |name| std::env::var(name).ok());
            (config, Some(path.clone()))
        },
        None => (
            herald_config::discover_and_load(),
            herald_config::find_config_file(),
        ),
    };
    if let Some(ref bind) = cli.bind {
        config.server.bind = bind.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(ref url) = cli.database_url {
        config.database.url = url.clone();
    }
    Ok((config, source))
}

async fn serve(config: HeraldConfig) -> anyhow::Result<()> {
    let result = herald_config::validate(&config);
    for d in &result.diagnostics {
        tracing::warn!(path = d.path, severity = %d.severity, "{}", d.message);
    }
    if result.has_errors() {
        anyhow::bail!("invalid configuration, run `herald config check` for details");
    }
    herald_gateway::server::start(config).await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "herald starting");

    let (config, config_source) = load_config(&cli)?;

    match cli.command {
        None | Some(Commands::Serve) => serve(config).await,
        Some(Commands::Channels { action }) => {
            channel_commands::handle_channels(action, &config).await
        },
        Some(Commands::Announcements { action }) => {
            announcement_commands::handle_announcements(action, &config).await
        },
        Some(Commands::Db { action }) => db_commands::handle_db(action, &config).await,
        Some(Commands::Config { action }) => {
            config_commands::handle_config(action, &config, config_source.as_deref())
        },
    }
}
