use clap::Parser;
use streamdash::cli::commands::{self, BigWinsArgs, GamesArgs};
use streamdash::cli::{Cli, Commands};
use streamdash::client::ApiClient;
use streamdash::types::config::{Config, CONFIG_FILE_NAME};
use streamdash::StreamdashResult;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> StreamdashResult<()> {
    let cli = Cli::parse();

    // Load configuration first (no logging yet)
    let config = (if cli.config.exists() {
        Config::load(&cli.config).unwrap_or_else(|e| {
            eprintln!("Warning: ignoring invalid {}: {}", cli.config.display(), e);
            Config::default_config()
        })
    } else if cli.config.as_os_str() == CONFIG_FILE_NAME {
        Config::load_or_default()
    } else {
        Config::default_config()
    })
    .with_env_overrides();

    // CLI flags take precedence over config
    let log_level = if cli.quiet {
        "error".to_string()
    } else if cli.verbose {
        "debug".to_string()
    } else {
        config.general.log_level.clone()
    };

    let filter = EnvFilter::from_default_env().add_directive(
        format!("streamdash={}", log_level)
            .parse()
            .unwrap_or_else(|_| "streamdash=info".parse().expect("fallback directive is valid")),
    );

    if config.general.log_format == "json" {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }

    tracing::debug!("Configuration loaded from: {}", cli.config.display());

    let json = cli.json;

    match cli.command {
        Commands::Init { path } => commands::init(path).await?,
        Commands::Config => commands::config_cmd(&cli.config).await?,
        Commands::Version => commands::version(),
        command => {
            let api = ApiClient::new(&config)?;
            run(command, &cli.config, &config, &api, json).await?;
        }
    }

    Ok(())
}

async fn run(
    command: Commands,
    config_path: &std::path::Path,
    config: &Config,
    api: &ApiClient,
    json: bool,
) -> StreamdashResult<()> {
    match command {
        Commands::Doctor => commands::doctor(config_path, config, api).await,
        Commands::Status => commands::status(config, api).await,
        Commands::Games {
            limit,
            skip,
            provider,
            search,
            sort,
        } => {
            let args = GamesArgs {
                limit,
                skip,
                provider,
                search,
                sort,
            };
            commands::games(api, args, json).await
        }
        Commands::Game { slug } => commands::game(api, &slug, json).await,
        Commands::Streamers {
            limit,
            skip,
            platform,
            search,
        } => commands::streamers(api, limit, skip, platform, search, json).await,
        Commands::Streamer { id, sessions } => {
            commands::streamer(api, &id, sessions, json).await
        }
        Commands::Sessions {
            limit,
            skip,
            streamer,
            game,
        } => commands::sessions(api, limit, skip, streamer, game, json).await,
        Commands::BigWins {
            limit,
            skip,
            min_multiplier,
            streamer,
            live,
        } => {
            let args = BigWinsArgs {
                limit,
                skip,
                min_multiplier,
                streamer,
                live,
            };
            commands::big_wins(api, args, json).await
        }
        Commands::Rtp {
            limit,
            provider,
            period,
        } => commands::rtp(api, limit, provider, period, json).await,
        Commands::Leaderboard {
            period,
            metric,
            limit,
        } => commands::leaderboard(api, period, metric, limit, json).await,
        Commands::BonusHunts {
            limit,
            skip,
            streamer,
            status,
        } => commands::bonus_hunts(api, limit, skip, streamer, status, json).await,
        Commands::BonusHunt { id } => commands::bonus_hunt(api, &id, json).await,
        Commands::Watch {
            interval,
            limit,
            count,
        } => commands::watch(api, interval, limit, count).await,
        Commands::Init { .. } | Commands::Config | Commands::Version => Ok(()),
    }
}
