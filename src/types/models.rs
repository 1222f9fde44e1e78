//! Domain records returned by the backend.
//!
//! Every field beyond the identifier is defaulted so that older or newer
//! backend versions with missing fields still decode.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A slot game from the games directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub slug: String,

    #[serde(default)]
    pub provider: String,

    /// Theoretical RTP in percent.
    #[serde(default)]
    pub rtp: Option<f64>,

    #[serde(default)]
    pub volatility: Option<String>,

    /// Maximum win as a multiplier of the bet.
    #[serde(default, alias = "max_multiplier")]
    pub max_win: Option<f64>,

    #[serde(default, alias = "image")]
    pub thumbnail_url: Option<String>,

    #[serde(default)]
    pub release_date: Option<String>,
}

/// A tracked streamer profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Streamer {
    pub id: String,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub display_name: Option<String>,

    /// Streaming platform (kick, twitch, ...).
    #[serde(default)]
    pub platform: String,

    #[serde(default, alias = "follower_count")]
    pub followers: u64,

    #[serde(default)]
    pub is_live: bool,

    #[serde(default)]
    pub total_wagered: f64,

    #[serde(default)]
    pub total_won: f64,

    #[serde(default)]
    pub biggest_win: Option<f64>,

    #[serde(default, alias = "avatar")]
    pub avatar_url: Option<String>,
}

impl Streamer {
    /// Name to show in listings.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.username)
    }

    /// Net result of everything tracked for this streamer.
    pub fn profit(&self) -> f64 {
        self.total_won - self.total_wagered
    }
}

/// A single stream session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,

    #[serde(default)]
    pub streamer_id: String,

    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub start_balance: f64,

    #[serde(default)]
    pub end_balance: Option<f64>,

    #[serde(default)]
    pub total_wagered: f64,

    #[serde(default)]
    pub games_played: u32,

    #[serde(default)]
    pub peak_viewers: Option<u64>,
}

impl Session {
    /// Balance delta, when the session has ended.
    pub fn profit(&self) -> Option<f64> {
        self.end_balance.map(|end| end - self.start_balance)
    }

    /// Session length; for live sessions measured up to `now`.
    pub fn duration(&self, now: DateTime<Utc>) -> Option<chrono::Duration> {
        let start = self.started_at?;
        Some(self.ended_at.unwrap_or(now) - start)
    }
}

/// A recorded big win.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BigWin {
    pub id: String,

    #[serde(default)]
    pub streamer_id: String,

    #[serde(default)]
    pub streamer_name: Option<String>,

    #[serde(default, alias = "game")]
    pub game_name: String,

    #[serde(default)]
    pub bet: f64,

    #[serde(default, alias = "win")]
    pub payout: f64,

    #[serde(default)]
    pub multiplier: f64,

    #[serde(default, alias = "timestamp")]
    pub occurred_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub clip_url: Option<String>,
}

/// Observed RTP for one game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RtpEntry {
    #[serde(default)]
    pub game_id: String,

    #[serde(default)]
    pub game_name: String,

    #[serde(default)]
    pub provider: String,

    #[serde(default)]
    pub theoretical_rtp: Option<f64>,

    #[serde(default)]
    pub observed_rtp: f64,

    #[serde(default)]
    pub spins: u64,

    #[serde(default)]
    pub total_wagered: f64,
}

impl RtpEntry {
    /// Observed minus theoretical RTP, in percentage points.
    pub fn deviation(&self) -> Option<f64> {
        self.theoretical_rtp.map(|t| self.observed_rtp - t)
    }
}

/// One row of the leaderboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    #[serde(default)]
    pub rank: u32,

    #[serde(default)]
    pub streamer_id: String,

    #[serde(default, alias = "username")]
    pub streamer_name: String,

    #[serde(default)]
    pub value: f64,

    #[serde(default)]
    pub sessions: u32,
}

/// A bonus hunt: a batch of bonuses collected then opened on stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BonusHunt {
    pub id: String,

    #[serde(default)]
    pub streamer_id: String,

    #[serde(default)]
    pub title: Option<String>,

    /// `collecting`, `opening` or `finished`.
    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub start_cost: f64,

    #[serde(default)]
    pub total_payout: f64,

    #[serde(default)]
    pub entries: Vec<BonusHuntEntry>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl BonusHunt {
    /// Payout divided by cost, as a multiplier.
    pub fn return_multiplier(&self) -> Option<f64> {
        (self.start_cost > 0.0).then(|| self.total_payout / self.start_cost)
    }

    /// Bonuses not opened yet.
    pub fn remaining(&self) -> usize {
        self.entries.iter().filter(|e| e.payout.is_none()).count()
    }

    /// Average multiplier the unopened bonuses need for the hunt to break even.
    pub fn break_even_multiplier(&self) -> Option<f64> {
        let remaining_bets: f64 = self
            .entries
            .iter()
            .filter(|e| e.payout.is_none())
            .map(|e| e.bet)
            .sum();
        let missing = self.start_cost - self.total_payout;
        (remaining_bets > 0.0).then(|| (missing / remaining_bets).max(0.0))
    }
}

/// A single bonus inside a hunt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BonusHuntEntry {
    #[serde(default, alias = "game")]
    pub game_name: String,

    #[serde(default)]
    pub bet: f64,

    /// `None` until the bonus is opened.
    #[serde(default)]
    pub payout: Option<f64>,
}

impl BonusHuntEntry {
    pub fn multiplier(&self) -> Option<f64> {
        match self.payout {
            Some(p) if self.bet > 0.0 => Some(p / self.bet),
            _ => None,
        }
    }
}

/// Backend health report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub version: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self.status.to_lowercase().as_str(), "ok" | "healthy" | "up")
    }
}
