//! Request parameter types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Query parameters of a GET request, kept sorted by name.
///
/// Sorting makes the serialized form (and therefore the cache key)
/// independent of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams(BTreeMap<String, String>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, replacing any previous value for `name`.
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.insert(name, value);
        self
    }

    /// Adds a parameter only when `value` is `Some`.
    pub fn with_opt<V: ToString>(mut self, name: impl Into<String>, value: Option<V>) -> Self {
        if let Some(v) = value {
            self.insert(name, v);
        }
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl ToString) {
        self.0.insert(name.into(), value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Pairs in sorted order, ready to hand to the HTTP layer.
    pub fn pairs(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// `name=value&...` in sorted order, with `&`, `=`, `%` and whitespace escaped.
    pub fn serialize(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{}={}", escape(k), escape(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '%' => out.push_str("%25"),
            '&' => out.push_str("%26"),
            '=' => out.push_str("%3D"),
            '?' => out.push_str("%3F"),
            '#' => out.push_str("%23"),
            '/' => out.push_str("%2F"),
            c if c.is_whitespace() => out.push_str(&format!("%{:02X}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

/// Percent-encodes a single path segment (e.g. a slug or streamer id).
pub fn encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for b in segment.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}

/// Pagination shared by the list endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Paging {
    pub limit: Option<u32>,
    pub skip: Option<u32>,
}

impl Paging {
    pub fn new(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            skip: None,
        }
    }

    pub fn with_skip(mut self, skip: u32) -> Self {
        self.skip = Some(skip);
        self
    }

    fn apply(&self, params: QueryParams) -> QueryParams {
        params
            .with_opt("limit", self.limit)
            .with_opt("skip", self.skip)
    }
}

/// Filters for the games directory.
#[derive(Debug, Clone, Default)]
pub struct GameQuery {
    pub paging: Paging,
    pub provider: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
}

impl GameQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_paging(mut self, paging: Paging) -> Self {
        self.paging = paging;
        self
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn to_params(&self) -> QueryParams {
        self.paging
            .apply(QueryParams::new())
            .with_opt("provider", self.provider.as_deref())
            .with_opt("search", self.search.as_deref())
            .with_opt("sort", self.sort.as_deref())
    }
}

/// Filters for the streamer list.
#[derive(Debug, Clone, Default)]
pub struct StreamerQuery {
    pub paging: Paging,
    pub platform: Option<String>,
    pub search: Option<String>,
}

impl StreamerQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_paging(mut self, paging: Paging) -> Self {
        self.paging = paging;
        self
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn to_params(&self) -> QueryParams {
        self.paging
            .apply(QueryParams::new())
            .with_opt("platform", self.platform.as_deref())
            .with_opt("search", self.search.as_deref())
    }
}

/// Filters for stream sessions.
#[derive(Debug, Clone, Default)]
pub struct SessionQuery {
    pub paging: Paging,
    pub streamer_id: Option<String>,
    pub game: Option<String>,
}

impl SessionQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_paging(mut self, paging: Paging) -> Self {
        self.paging = paging;
        self
    }

    pub fn with_streamer(mut self, streamer_id: impl Into<String>) -> Self {
        self.streamer_id = Some(streamer_id.into());
        self
    }

    pub fn with_game(mut self, game: impl Into<String>) -> Self {
        self.game = Some(game.into());
        self
    }

    pub fn to_params(&self) -> QueryParams {
        self.paging
            .apply(QueryParams::new())
            .with_opt("streamer_id", self.streamer_id.as_deref())
            .with_opt("game", self.game.as_deref())
    }
}

/// Filters for the big-wins gallery.
#[derive(Debug, Clone, Default)]
pub struct BigWinQuery {
    pub paging: Paging,
    pub min_multiplier: Option<f64>,
    pub streamer_id: Option<String>,
}

impl BigWinQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_paging(mut self, paging: Paging) -> Self {
        self.paging = paging;
        self
    }

    pub fn with_min_multiplier(mut self, multiplier: f64) -> Self {
        self.min_multiplier = Some(multiplier);
        self
    }

    pub fn with_streamer(mut self, streamer_id: impl Into<String>) -> Self {
        self.streamer_id = Some(streamer_id.into());
        self
    }

    pub fn to_params(&self) -> QueryParams {
        self.paging
            .apply(QueryParams::new())
            .with_opt("min_multiplier", self.min_multiplier)
            .with_opt("streamer_id", self.streamer_id.as_deref())
    }
}

/// Filters for the RTP tracker.
#[derive(Debug, Clone, Default)]
pub struct RtpQuery {
    pub limit: Option<u32>,
    pub provider: Option<String>,
    pub period: Option<Period>,
}

impl RtpQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn with_period(mut self, period: Period) -> Self {
        self.period = Some(period);
        self
    }

    pub fn to_params(&self) -> QueryParams {
        QueryParams::new()
            .with_opt("limit", self.limit)
            .with_opt("provider", self.provider.as_deref())
            .with_opt("period", self.period)
    }
}

/// Filters for bonus hunts.
#[derive(Debug, Clone, Default)]
pub struct BonusHuntQuery {
    pub paging: Paging,
    pub streamer_id: Option<String>,
    pub status: Option<String>,
}

impl BonusHuntQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_paging(mut self, paging: Paging) -> Self {
        self.paging = paging;
        self
    }

    pub fn with_streamer(mut self, streamer_id: impl Into<String>) -> Self {
        self.streamer_id = Some(streamer_id.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn to_params(&self) -> QueryParams {
        self.paging
            .apply(QueryParams::new())
            .with_opt("streamer_id", self.streamer_id.as_deref())
            .with_opt("status", self.status.as_deref())
    }
}

/// Aggregation window for leaderboards and the RTP tracker.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Day,
    #[default]
    Week,
    Month,
    AllTime,
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Period::Day => write!(f, "day"),
            Period::Week => write!(f, "week"),
            Period::Month => write!(f, "month"),
            Period::AllTime => write!(f, "all_time"),
        }
    }
}

impl std::str::FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "day" | "daily" | "24h" => Ok(Period::Day),
            "week" | "weekly" | "7d" => Ok(Period::Week),
            "month" | "monthly" | "30d" => Ok(Period::Month),
            "all" | "all_time" => Ok(Period::AllTime),
            other => Err(format!("unknown period '{}'", other)),
        }
    }
}

/// Ranking metric for the leaderboard.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LeaderboardMetric {
    #[default]
    Profit,
    Wagered,
    BiggestWin,
    Multiplier,
}

impl std::fmt::Display for LeaderboardMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeaderboardMetric::Profit => write!(f, "profit"),
            LeaderboardMetric::Wagered => write!(f, "wagered"),
            LeaderboardMetric::BiggestWin => write!(f, "biggest_win"),
            LeaderboardMetric::Multiplier => write!(f, "multiplier"),
        }
    }
}

impl std::str::FromStr for LeaderboardMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "profit" => Ok(LeaderboardMetric::Profit),
            "wagered" | "wager" => Ok(LeaderboardMetric::Wagered),
            "biggest_win" | "win" => Ok(LeaderboardMetric::BiggestWin),
            "multiplier" | "multi" => Ok(LeaderboardMetric::Multiplier),
            other => Err(format!("unknown metric '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_sorted_regardless_of_insertion_order() {
        let a = QueryParams::new().with("skip", 5).with("limit", 20);
        let b = QueryParams::new().with("limit", 20).with("skip", 5);
        assert_eq!(a.serialize(), "limit=20&skip=5");
        assert_eq!(a.serialize(), b.serialize());
    }

    #[test]
    fn test_with_opt_skips_none() {
        let params = QueryParams::new()
            .with_opt("provider", None::<&str>)
            .with_opt("limit", Some(10));
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("limit"), Some("10"));
    }

    #[test]
    fn test_serialize_escapes_separators() {
        let params = QueryParams::new().with("search", "book of dead&x=1");
        assert_eq!(params.serialize(), "search=book%20of%20dead%26x%3D1");
    }

    #[test]
    fn test_encode_segment() {
        assert_eq!(encode_segment("sweet-bonanza"), "sweet-bonanza");
        assert_eq!(encode_segment("a/b c"), "a%2Fb%20c");
    }

    #[test]
    fn test_game_query_params() {
        let query = GameQuery::new()
            .with_paging(Paging::new(20).with_skip(5))
            .with_provider("pragmatic");
        let params = query.to_params();
        assert_eq!(params.serialize(), "limit=20&provider=pragmatic&skip=5");
    }

    #[test]
    fn test_period_parse_and_display() {
        assert_eq!("weekly".parse::<Period>().unwrap(), Period::Week);
        assert_eq!("all-time".parse::<Period>().unwrap(), Period::AllTime);
        assert_eq!(Period::AllTime.to_string(), "all_time");
        assert!("yearly".parse::<Period>().is_err());
    }

    #[test]
    fn test_metric_parse() {
        assert_eq!(
            "biggest-win".parse::<LeaderboardMetric>().unwrap(),
            LeaderboardMetric::BiggestWin
        );
    }
}
