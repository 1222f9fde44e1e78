//! Streamdash command-line interface.

pub mod commands;
pub mod interactive;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::types::requests::{LeaderboardMetric, Period};

/// Streamdash - terminal dashboard for gambling-stream analytics.
#[derive(Parser, Debug)]
#[command(name = "streamdash")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file.
    #[arg(short, long, default_value = "streamdash.toml")]
    pub config: PathBuf,

    /// Verbose mode.
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode.
    #[arg(short, long)]
    pub quiet: bool,

    /// Print raw `{ data, error, status }` JSON instead of tables.
    #[arg(long, global = true)]
    pub json: bool,

    /// Command to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Writes a default configuration file.
    Init {
        /// Target directory (default: current directory).
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Edits configuration interactively.
    Config,

    /// Diagnoses configuration and backend connectivity.
    Doctor,

    /// Shows backend health and cache settings.
    Status,

    /// Shows version.
    Version,

    /// Lists slot games.
    Games {
        #[arg(short, long, default_value_t = 20)]
        limit: u32,

        #[arg(long)]
        skip: Option<u32>,

        #[arg(long)]
        provider: Option<String>,

        #[arg(short, long)]
        search: Option<String>,

        #[arg(long)]
        sort: Option<String>,
    },

    /// Shows one game.
    Game {
        /// Game slug or id.
        slug: String,
    },

    /// Lists tracked streamers.
    Streamers {
        #[arg(short, long, default_value_t = 20)]
        limit: u32,

        #[arg(long)]
        skip: Option<u32>,

        #[arg(long)]
        platform: Option<String>,

        #[arg(short, long)]
        search: Option<String>,
    },

    /// Shows a streamer profile.
    Streamer {
        /// Streamer id.
        id: String,

        /// Also list this many recent sessions.
        #[arg(long)]
        sessions: Option<u32>,
    },

    /// Lists stream sessions.
    Sessions {
        #[arg(short, long, default_value_t = 20)]
        limit: u32,

        #[arg(long)]
        skip: Option<u32>,

        #[arg(long)]
        streamer: Option<String>,

        #[arg(long)]
        game: Option<String>,
    },

    /// Lists big wins.
    BigWins {
        #[arg(short, long, default_value_t = 20)]
        limit: u32,

        #[arg(long)]
        skip: Option<u32>,

        #[arg(long)]
        min_multiplier: Option<f64>,

        #[arg(long)]
        streamer: Option<String>,

        /// Only wins from streams currently live.
        #[arg(long)]
        live: bool,
    },

    /// Shows observed RTP per game.
    Rtp {
        #[arg(short, long, default_value_t = 20)]
        limit: u32,

        #[arg(long)]
        provider: Option<String>,

        /// day, week, month or all-time.
        #[arg(long)]
        period: Option<Period>,
    },

    /// Shows the streamer leaderboard.
    Leaderboard {
        /// day, week, month or all-time.
        #[arg(long, default_value = "week")]
        period: Period,

        /// profit, wagered, biggest-win or multiplier.
        #[arg(long, default_value = "profit")]
        metric: LeaderboardMetric,

        #[arg(short, long, default_value_t = 10)]
        limit: u32,
    },

    /// Lists bonus hunts.
    BonusHunts {
        #[arg(short, long, default_value_t = 20)]
        limit: u32,

        #[arg(long)]
        skip: Option<u32>,

        #[arg(long)]
        streamer: Option<String>,

        /// collecting, opening or finished.
        #[arg(long)]
        status: Option<String>,
    },

    /// Shows one bonus hunt with its bonuses.
    BonusHunt {
        /// Bonus hunt id.
        id: String,
    },

    /// Polls live big wins and prints new ones.
    Watch {
        /// Poll interval (in seconds).
        #[arg(short, long, default_value_t = 15)]
        interval: u64,

        #[arg(short, long, default_value_t = 20)]
        limit: u32,

        /// Stop after this many polls.
        #[arg(long)]
        count: Option<u32>,
    },
}
