//! Streamdash CLI command implementations.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;

use crate::client::ApiClient;
use crate::format::{
    format_count, format_currency, format_duration, format_multiplier, format_percent,
    format_profit,
};
use crate::types::config::{Config, CONFIG_FILE_NAME, ENV_API_TOKEN, ENV_API_URL};
use crate::types::models::{BigWin, BonusHunt, Game, Session, Streamer};
use crate::types::requests::{
    BigWinQuery, BonusHuntQuery, GameQuery, LeaderboardMetric, Paging, Period, RtpQuery,
    SessionQuery, StreamerQuery,
};
use crate::types::responses::{ApiResult, Listing};
use crate::{StreamdashError, StreamdashResult};

/// Prints `result` as JSON or via `render`, turning failures into an error.
fn output<T: Serialize>(
    result: ApiResult<T>,
    json: bool,
    render: impl FnOnce(&T),
) -> StreamdashResult<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    match result.data() {
        Some(data) => {
            if !json {
                render(data);
            }
            Ok(())
        }
        None => Err(request_error(&result)),
    }
}

fn request_error<T>(result: &ApiResult<T>) -> StreamdashError {
    let message = result.error().unwrap_or("unknown error");
    if result.status() == 0 {
        StreamdashError::other(format!("Backend unreachable: {}", message))
    } else {
        StreamdashError::other(format!("{} (HTTP {})", message, result.status()))
    }
}

fn paging(limit: u32, skip: Option<u32>) -> Paging {
    Paging {
        limit: Some(limit),
        skip,
    }
}

fn print_footer<T>(listing: &Listing<T>) {
    println!();
    println!("Showing {} of {}", listing.len(), listing.total());
}

fn or_dash(value: Option<String>) -> String {
    value.unwrap_or_else(|| "-".to_string())
}

/// Initializes configuration in the specified directory.
pub async fn init(path: Option<PathBuf>) -> StreamdashResult<()> {
    let target_dir = path.unwrap_or_else(|| PathBuf::from("."));

    if !target_dir.exists() {
        std::fs::create_dir_all(&target_dir)?;
        tracing::info!("Directory created: {}", target_dir.display());
    }

    let config_path = target_dir.join(CONFIG_FILE_NAME);

    if config_path.exists() {
        println!("Configuration already exists at: {}", config_path.display());
        println!("Use 'streamdash config' to modify.");
        return Ok(());
    }

    let config = Config::default_config();
    config.save(&config_path)?;

    println!("Streamdash initialized successfully!");
    println!("Configuration created at: {}", config_path.display());
    println!();
    println!("Next steps:");
    println!("  1. Point api.base_url at your backend (or set {})", ENV_API_URL);
    println!("  2. Check connectivity: streamdash doctor");
    println!("  3. Browse data: streamdash games, streamdash big-wins --live");

    Ok(())
}

/// Edits configuration interactively.
pub async fn config_cmd(config_path: &Path) -> StreamdashResult<()> {
    use super::interactive::{run_interactive_config, show_config_summary};

    if config_path.exists() {
        let config = Config::load(config_path)?;
        show_config_summary(&config);
    }

    run_interactive_config(config_path)
}

/// Diagnoses configuration and backend connectivity.
pub async fn doctor(config_path: &Path, config: &Config, api: &ApiClient) -> StreamdashResult<()> {
    println!("Diagnosing Streamdash configuration...\n");

    let mut issues: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    if config_path.exists() {
        match Config::load(config_path) {
            Ok(_) => println!("✓ Configuration file: {}", config_path.display()),
            Err(e) => issues.push(format!("Configuration file is invalid: {}", e)),
        }
    } else {
        warnings.push(format!(
            "No configuration file at {} - using defaults (run 'streamdash init')",
            config_path.display()
        ));
    }

    match reqwest::Url::parse(&config.api.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            println!("✓ Backend URL: {}", config.api.base_url)
        }
        Ok(url) => issues.push(format!("Unsupported URL scheme '{}'", url.scheme())),
        Err(e) => issues.push(format!("Invalid api.base_url '{}': {}", config.api.base_url, e)),
    }

    if config.api.token.is_some() {
        println!("✓ Bearer token configured (cache is scoped per token)");
    }

    if !config.cache.enabled {
        warnings.push("Response cache is disabled".to_string());
    } else if config.cache.ttl_secs == 0 {
        warnings.push("cache.ttl_secs is 0 - responses are never cached".to_string());
    }

    if issues.is_empty() {
        let health = api.health().await;
        match (health.data(), health.error()) {
            (Some(h), _) if h.is_healthy() => println!("✓ Backend is healthy"),
            (Some(h), _) => warnings.push(format!("Backend reports status '{}'", h.status)),
            (None, Some(e)) => issues.push(format!(
                "Backend health check failed: {} (status {})",
                e,
                health.status()
            )),
            (None, None) => issues.push("Backend health check failed".to_string()),
        }
    }

    println!();
    if issues.is_empty() && warnings.is_empty() {
        println!("✓ All good! Streamdash is ready to use.");
    } else {
        if !warnings.is_empty() {
            println!("Warnings:");
            for warning in warnings {
                println!("  ⚠ {}", warning);
            }
        }
        if !issues.is_empty() {
            println!("Problems:");
            for issue in issues {
                println!("  ✗ {}", issue);
            }
        }
    }

    Ok(())
}

/// Shows backend health and cache settings.
pub async fn status(config: &Config, api: &ApiClient) -> StreamdashResult<()> {
    println!("Backend: {}", api.base_url());

    let health = api.health().await;
    match health.data() {
        Some(h) => {
            let icon = if h.is_healthy() { "✓" } else { "⚠" };
            println!("  {} status: {}", icon, h.status);
            if let Some(version) = &h.version {
                println!("    version: {}", version);
            }
        }
        None => println!(
            "  ✗ unreachable: {} (status {})",
            health.error().unwrap_or("unknown error"),
            health.status()
        ),
    }

    println!();
    println!("Cache:");
    if config.cache.enabled {
        println!("  capacity: {}", config.cache.capacity);
        println!("  ttl: {}s (live feeds: {}s)", config.cache.ttl_secs, config.cache.live_ttl_secs);
    } else {
        println!("  disabled");
    }

    if std::env::var(ENV_API_URL).is_ok() {
        println!();
        println!("Note: backend URL overridden by {}", ENV_API_URL);
    }
    if std::env::var(ENV_API_TOKEN).is_ok() {
        println!("Note: token provided by {}", ENV_API_TOKEN);
    }

    Ok(())
}

/// Shows version.
pub fn version() {
    println!("streamdash {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Terminal dashboard for gambling-stream analytics");
}

pub struct GamesArgs {
    pub limit: u32,
    pub skip: Option<u32>,
    pub provider: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
}

/// Lists slot games.
pub async fn games(api: &ApiClient, args: GamesArgs, json: bool) -> StreamdashResult<()> {
    let mut query = GameQuery::new().with_paging(paging(args.limit, args.skip));
    query.provider = args.provider;
    query.search = args.search;
    query.sort = args.sort;

    output(api.games(&query).await, json, |listing| {
        println!("{:<32} {:<20} {:>8} {:>12}", "GAME", "PROVIDER", "RTP", "MAX WIN");
        for game in listing.items() {
            println!(
                "{:<32} {:<20} {:>8} {:>12}",
                game.name,
                game.provider,
                or_dash(game.rtp.map(format_percent)),
                or_dash(game.max_win.map(format_multiplier)),
            );
        }
        print_footer(listing);
    })
}

/// Shows one game.
pub async fn game(api: &ApiClient, slug: &str, json: bool) -> StreamdashResult<()> {
    output(api.game(slug).await, json, print_game)
}

fn print_game(game: &Game) {
    println!("{}", game.name);
    println!("  provider:   {}", game.provider);
    println!("  slug:       {}", game.slug);
    println!("  rtp:        {}", or_dash(game.rtp.map(format_percent)));
    println!("  volatility: {}", or_dash(game.volatility.clone()));
    println!("  max win:    {}", or_dash(game.max_win.map(format_multiplier)));
    if let Some(date) = &game.release_date {
        println!("  released:   {}", date);
    }
}

/// Lists tracked streamers.
pub async fn streamers(
    api: &ApiClient,
    limit: u32,
    skip: Option<u32>,
    platform: Option<String>,
    search: Option<String>,
    json: bool,
) -> StreamdashResult<()> {
    let mut query = StreamerQuery::new().with_paging(paging(limit, skip));
    query.platform = platform;
    query.search = search;

    output(api.streamers(&query).await, json, |listing| {
        println!(
            "{:<24} {:<10} {:>10} {:>16} {:>16}",
            "STREAMER", "PLATFORM", "FOLLOWERS", "WAGERED", "PROFIT"
        );
        for s in listing.items() {
            println!(
                "{:<24} {:<10} {:>10} {:>16} {:>16}{}",
                s.label(),
                s.platform,
                format_count(s.followers),
                format_currency(s.total_wagered),
                format_profit(s.profit()),
                if s.is_live { "  ● live" } else { "" },
            );
        }
        print_footer(listing);
    })
}

/// Shows a streamer profile, optionally with recent sessions.
pub async fn streamer(
    api: &ApiClient,
    id: &str,
    sessions: Option<u32>,
    json: bool,
) -> StreamdashResult<()> {
    output(api.streamer(id).await, json, print_streamer)?;

    if let Some(limit) = sessions {
        let result = api.streamer_sessions(id, Some(limit)).await;
        output(result, json, |listing| {
            println!();
            print_sessions(listing.items());
        })?;
    }

    Ok(())
}

fn print_streamer(s: &Streamer) {
    println!("{}{}", s.label(), if s.is_live { "  ● live" } else { "" });
    println!("  platform:    {}", s.platform);
    println!("  followers:   {}", format_count(s.followers));
    println!("  wagered:     {}", format_currency(s.total_wagered));
    println!("  won:         {}", format_currency(s.total_won));
    println!("  profit:      {}", format_profit(s.profit()));
    println!("  biggest win: {}", or_dash(s.biggest_win.map(format_currency)));
}

fn print_sessions(sessions: &[Session]) {
    let now = chrono::Utc::now();
    println!(
        "{:<20} {:>10} {:>14} {:>14} {:>8}",
        "STARTED", "DURATION", "WAGERED", "PROFIT", "GAMES"
    );
    for session in sessions {
        println!(
            "{:<20} {:>10} {:>14} {:>14} {:>8}",
            or_dash(session.started_at.map(|t| t.format("%Y-%m-%d %H:%M").to_string())),
            or_dash(session.duration(now).map(format_duration)),
            format_currency(session.total_wagered),
            session.profit().map(format_profit).unwrap_or_else(|| "live".to_string()),
            session.games_played,
        );
    }
}

/// Lists stream sessions.
pub async fn sessions(
    api: &ApiClient,
    limit: u32,
    skip: Option<u32>,
    streamer: Option<String>,
    game: Option<String>,
    json: bool,
) -> StreamdashResult<()> {
    let mut query = SessionQuery::new().with_paging(paging(limit, skip));
    query.streamer_id = streamer;
    query.game = game;

    output(api.sessions(&query).await, json, |listing| {
        print_sessions(listing.items());
        print_footer(listing);
    })
}

pub struct BigWinsArgs {
    pub limit: u32,
    pub skip: Option<u32>,
    pub min_multiplier: Option<f64>,
    pub streamer: Option<String>,
    pub live: bool,
}

/// Lists big wins (gallery or live feed).
pub async fn big_wins(api: &ApiClient, args: BigWinsArgs, json: bool) -> StreamdashResult<()> {
    let result = if args.live {
        api.live_big_wins(Some(args.limit)).await
    } else {
        let mut query = BigWinQuery::new().with_paging(paging(args.limit, args.skip));
        query.min_multiplier = args.min_multiplier;
        query.streamer_id = args.streamer;
        api.big_wins(&query).await
    };

    output(result, json, |listing| {
        print_big_wins_header();
        for win in listing.items() {
            print_big_win(win);
        }
        print_footer(listing);
    })
}

fn print_big_wins_header() {
    println!(
        "{:<18} {:<28} {:>10} {:>14} {:>12}",
        "STREAMER", "GAME", "BET", "PAYOUT", "MULTI"
    );
}

fn print_big_win(win: &BigWin) {
    println!(
        "{:<18} {:<28} {:>10} {:>14} {:>12}",
        win.streamer_name.as_deref().unwrap_or(&win.streamer_id),
        win.game_name,
        format_currency(win.bet),
        format_currency(win.payout),
        format_multiplier(win.multiplier),
    );
}

/// Shows observed RTP per game.
pub async fn rtp(
    api: &ApiClient,
    limit: u32,
    provider: Option<String>,
    period: Option<Period>,
    json: bool,
) -> StreamdashResult<()> {
    let mut query = RtpQuery::new().with_limit(limit);
    query.provider = provider;
    query.period = period;

    output(api.rtp_tracker(&query).await, json, |listing| {
        println!(
            "{:<32} {:>10} {:>10} {:>9} {:>10}",
            "GAME", "OBSERVED", "THEORY", "DELTA", "SPINS"
        );
        for entry in listing.items() {
            println!(
                "{:<32} {:>10} {:>10} {:>9} {:>10}",
                entry.game_name,
                format_percent(entry.observed_rtp),
                or_dash(entry.theoretical_rtp.map(format_percent)),
                or_dash(entry.deviation().map(|d| format!("{:+.2}", d))),
                format_count(entry.spins),
            );
        }
        print_footer(listing);
    })
}

/// Shows the streamer leaderboard.
pub async fn leaderboard(
    api: &ApiClient,
    period: Period,
    metric: LeaderboardMetric,
    limit: u32,
    json: bool,
) -> StreamdashResult<()> {
    let result = api.leaderboard(period, metric, Some(limit)).await;

    output(result, json, |listing| {
        println!("Leaderboard by {} ({})\n", metric, period);
        for entry in listing.items() {
            let value = match metric {
                LeaderboardMetric::Profit => format_profit(entry.value),
                LeaderboardMetric::Wagered | LeaderboardMetric::BiggestWin => {
                    format_currency(entry.value)
                }
                LeaderboardMetric::Multiplier => format_multiplier(entry.value),
            };
            println!("{:>3}. {:<24} {:>16}", entry.rank, entry.streamer_name, value);
        }
    })
}

/// Lists bonus hunts.
pub async fn bonus_hunts(
    api: &ApiClient,
    limit: u32,
    skip: Option<u32>,
    streamer: Option<String>,
    status: Option<String>,
    json: bool,
) -> StreamdashResult<()> {
    let mut query = BonusHuntQuery::new().with_paging(paging(limit, skip));
    query.streamer_id = streamer;
    query.status = status;

    output(api.bonus_hunts(&query).await, json, |listing| {
        println!(
            "{:<12} {:<28} {:<11} {:>12} {:>12} {:>8}",
            "ID", "TITLE", "STATUS", "COST", "PAYOUT", "BONUSES"
        );
        for hunt in listing.items() {
            println!(
                "{:<12} {:<28} {:<11} {:>12} {:>12} {:>8}",
                hunt.id,
                hunt.title.as_deref().unwrap_or("-"),
                hunt.status,
                format_currency(hunt.start_cost),
                format_currency(hunt.total_payout),
                hunt.entries.len(),
            );
        }
        print_footer(listing);
    })
}

/// Shows one bonus hunt with its bonuses.
pub async fn bonus_hunt(api: &ApiClient, id: &str, json: bool) -> StreamdashResult<()> {
    output(api.bonus_hunt(id).await, json, print_bonus_hunt)
}

fn print_bonus_hunt(hunt: &BonusHunt) {
    println!("{} [{}]", hunt.title.as_deref().unwrap_or(&hunt.id), hunt.status);
    println!("  cost:      {}", format_currency(hunt.start_cost));
    println!("  payout:    {}", format_currency(hunt.total_payout));
    println!(
        "  return:    {}",
        or_dash(hunt.return_multiplier().map(format_multiplier))
    );
    println!("  remaining: {}/{}", hunt.remaining(), hunt.entries.len());
    if let Some(be) = hunt.break_even_multiplier() {
        println!("  break-even avg: {}", format_multiplier(be));
    }
    println!();
    for (i, entry) in hunt.entries.iter().enumerate() {
        println!(
            "{:>3}. {:<28} {:>10} {:>14} {:>12}",
            i + 1,
            entry.game_name,
            format_currency(entry.bet),
            or_dash(entry.payout.map(format_currency)),
            or_dash(entry.multiplier().map(format_multiplier)),
        );
    }
}

/// Polls live big wins and prints the ones missing from the previous poll.
pub async fn watch(
    api: &ApiClient,
    interval_secs: u64,
    limit: u32,
    count: Option<u32>,
) -> StreamdashResult<()> {
    if interval_secs == 0 {
        return Err(StreamdashError::config("watch interval must be at least 1 second"));
    }

    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
    let mut seen: HashSet<String> = HashSet::new();
    let mut polls = 0u32;

    println!("Watching live big wins every {}s (Ctrl-C to stop)\n", interval_secs);
    print_big_wins_header();

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                println!("\nStopped.");
                return Ok(());
            }
        }

        let result = api.live_big_wins(Some(limit)).await;
        match result.into_result() {
            Ok(listing) => {
                let (fresh, current) = new_wins(&seen, listing.into_items());
                fresh.iter().for_each(print_big_win);
                seen = current;
            }
            Err(e) => eprintln!("⚠ poll failed: {} (status {})", e, e.status()),
        }

        let swept = api.cleanup_expired().await;
        if swept > 0 {
            tracing::debug!(swept, "expired cache entries removed");
        }

        polls += 1;
        if count.is_some_and(|max| polls >= max) {
            return Ok(());
        }
    }
}

/// Splits one poll into the wins absent from the previous poll, oldest
/// first, and the ids to compare the next poll against.
fn new_wins(previous: &HashSet<String>, wins: Vec<BigWin>) -> (Vec<BigWin>, HashSet<String>) {
    let current: HashSet<String> = wins.iter().map(|win| win.id.clone()).collect();
    let fresh: Vec<BigWin> = wins
        .into_iter()
        .rev()
        .filter(|win| !previous.contains(&win.id))
        .collect();
    (fresh, current)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn win(id: &str) -> BigWin {
        BigWin {
            id: id.to_string(),
            ..Default::default()
        }
    }

    fn ids(wins: &[BigWin]) -> Vec<&str> {
        wins.iter().map(|w| w.id.as_str()).collect()
    }

    #[test]
    fn test_new_wins_tracks_only_latest_poll() {
        // Feed lists newest first.
        let (fresh, seen) = new_wins(&HashSet::new(), vec![win("b"), win("a")]);
        assert_eq!(ids(&fresh), ["a", "b"]);

        let (fresh, seen) = new_wins(&seen, vec![win("c"), win("b")]);
        assert_eq!(ids(&fresh), ["c"]);
        assert_eq!(seen.len(), 2);
        assert!(!seen.contains("a"));

        // Remembered ids never outgrow one poll.
        let mut seen = seen;
        for n in 0..1_000 {
            let id = format!("w{}", n);
            let (fresh, current) = new_wins(&seen, vec![win(&id)]);
            assert_eq!(ids(&fresh), [id.as_str()]);
            seen = current;
        }
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn test_version() {
        version();
    }

    #[test]
    fn test_request_error_messages() {
        let unreachable: ApiResult<()> = ApiResult::err("connection refused", 0);
        assert!(request_error(&unreachable)
            .to_string()
            .contains("Backend unreachable"));

        let missing: ApiResult<()> = ApiResult::err("Streamer not found", 404);
        assert_eq!(
            request_error(&missing).to_string(),
            "Streamer not found (HTTP 404)"
        );
    }

    #[test]
    fn test_output_failure_is_error() {
        let result: ApiResult<Vec<u32>> = ApiResult::err("down", 503);
        assert!(output(result, false, |_| {}).is_err());

        let result = ApiResult::ok(vec![1u32], 200);
        let mut rendered = false;
        output(result, false, |_| rendered = true).unwrap();
        assert!(rendered);
    }

    #[tokio::test]
    async fn test_init_writes_config() {
        let dir = tempfile::TempDir::new().unwrap();
        init(Some(dir.path().to_path_buf())).await.unwrap();

        let path = dir.path().join(CONFIG_FILE_NAME);
        assert!(path.exists());
        assert!(Config::load(&path).is_ok());
    }
}
