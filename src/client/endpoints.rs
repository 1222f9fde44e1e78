//! Typed fetch functions for the backend endpoints.

use std::time::Duration;

use super::api::ApiClient;
use crate::types::models::{
    BigWin, BonusHunt, Game, HealthStatus, LeaderboardEntry, RtpEntry, Session, Streamer,
};
use crate::types::requests::{
    encode_segment, BigWinQuery, BonusHuntQuery, GameQuery, LeaderboardMetric, Period,
    QueryParams, RtpQuery, SessionQuery, StreamerQuery,
};
use crate::types::responses::{ApiResult, Listing};

impl ApiClient {
    /// Games directory.
    pub async fn games(&self, query: &GameQuery) -> ApiResult<Listing<Game>> {
        self.request("games", &query.to_params(), self.default_ttl())
            .await
    }

    /// A single game by slug or id.
    pub async fn game(&self, slug: &str) -> ApiResult<Game> {
        let endpoint = format!("games/{}", encode_segment(slug));
        self.request(&endpoint, &QueryParams::new(), self.default_ttl())
            .await
    }

    pub async fn streamers(&self, query: &StreamerQuery) -> ApiResult<Listing<Streamer>> {
        self.request("streamers", &query.to_params(), self.default_ttl())
            .await
    }

    /// A single streamer profile.
    pub async fn streamer(&self, id: &str) -> ApiResult<Streamer> {
        let endpoint = format!("streamers/{}", encode_segment(id));
        self.request(&endpoint, &QueryParams::new(), self.default_ttl())
            .await
    }

    /// Recent sessions of one streamer.
    pub async fn streamer_sessions(
        &self,
        id: &str,
        limit: Option<u32>,
    ) -> ApiResult<Listing<Session>> {
        let endpoint = format!("streamers/{}/sessions", encode_segment(id));
        let params = QueryParams::new().with_opt("limit", limit);
        self.request(&endpoint, &params, self.default_ttl()).await
    }

    pub async fn sessions(&self, query: &SessionQuery) -> ApiResult<Listing<Session>> {
        self.request("sessions", &query.to_params(), self.default_ttl())
            .await
    }

    /// Big-wins gallery.
    pub async fn big_wins(&self, query: &BigWinQuery) -> ApiResult<Listing<BigWin>> {
        self.request("big-wins", &query.to_params(), self.default_ttl())
            .await
    }

    /// Wins from streams currently live. Cached only for the live TTL.
    pub async fn live_big_wins(&self, limit: Option<u32>) -> ApiResult<Listing<BigWin>> {
        let params = QueryParams::new().with_opt("limit", limit);
        self.request("big-wins/live", &params, self.live_ttl()).await
    }

    pub async fn rtp_tracker(&self, query: &RtpQuery) -> ApiResult<Listing<RtpEntry>> {
        self.request("rtp-tracker", &query.to_params(), self.default_ttl())
            .await
    }

    pub async fn leaderboard(
        &self,
        period: Period,
        metric: LeaderboardMetric,
        limit: Option<u32>,
    ) -> ApiResult<Listing<LeaderboardEntry>> {
        let params = QueryParams::new()
            .with("period", period)
            .with("metric", metric)
            .with_opt("limit", limit);
        self.request("leaderboard", &params, self.default_ttl())
            .await
    }

    pub async fn bonus_hunts(&self, query: &BonusHuntQuery) -> ApiResult<Listing<BonusHunt>> {
        self.request("bonus-hunts", &query.to_params(), self.default_ttl())
            .await
    }

    pub async fn bonus_hunt(&self, id: &str) -> ApiResult<BonusHunt> {
        let endpoint = format!("bonus-hunts/{}", encode_segment(id));
        self.request(&endpoint, &QueryParams::new(), self.default_ttl())
            .await
    }

    /// Backend health. Never cached.
    pub async fn health(&self) -> ApiResult<HealthStatus> {
        self.request("health", &QueryParams::new(), Duration::ZERO)
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use serde_json::json;

    use crate::client::transport::{RawResponse, Transport};
    use crate::types::config::Config;
    use crate::types::errors::ApiError;
    use crate::types::requests::Paging;

    use super::*;

    /// Records requested URLs and answers with a fixed body.
    struct Recorder {
        body: String,
        seen: Mutex<Vec<(String, Vec<(String, String)>)>>,
    }

    impl Recorder {
        fn new(body: serde_json::Value) -> Arc<Self> {
            Arc::new(Self {
                body: body.to_string(),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn last(&self) -> (String, Vec<(String, String)>) {
            self.seen.lock().unwrap().last().cloned().unwrap()
        }

        fn count(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Transport for Recorder {
        fn name(&self) -> &str {
            "recorder"
        }

        async fn get(
            &self,
            url: &str,
            query: &[(String, String)],
        ) -> Result<RawResponse, ApiError> {
            self.seen
                .lock()
                .unwrap()
                .push((url.to_string(), query.to_vec()));
            Ok(RawResponse::new(200, self.body.clone()))
        }
    }

    fn client(recorder: Arc<Recorder>) -> ApiClient {
        let mut config = Config::default_config();
        config.api.base_url = "http://backend/api".to_string();
        ApiClient::with_transport(&config, recorder)
    }

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    #[tokio::test]
    async fn test_games_url_and_params() {
        let recorder = Recorder::new(json!({"items": [{"id": "g1"}], "total": 1, "page": 1, "limit": 20}));
        let api = client(recorder.clone());

        let query = GameQuery::new()
            .with_paging(Paging::new(20))
            .with_provider("hacksaw");
        let result = api.games(&query).await;

        assert_eq!(result.data().unwrap().len(), 1);
        let (url, params) = recorder.last();
        assert_eq!(url, "http://backend/api/games");
        assert_eq!(params, vec![pair("limit", "20"), pair("provider", "hacksaw")]);
    }

    #[tokio::test]
    async fn test_streamer_id_is_encoded() {
        let recorder = Recorder::new(json!({"id": "a b", "username": "ab"}));
        let api = client(recorder.clone());

        let result = api.streamer("a b").await;
        assert_eq!(result.data().unwrap().username, "ab");
        assert_eq!(recorder.last().0, "http://backend/api/streamers/a%20b");
    }

    #[tokio::test]
    async fn test_leaderboard_params() {
        let recorder = Recorder::new(json!([{"rank": 1, "streamer_name": "x", "value": 10.0}]));
        let api = client(recorder.clone());

        let result = api
            .leaderboard(Period::Month, LeaderboardMetric::Wagered, Some(10))
            .await;
        assert_eq!(result.data().unwrap().items()[0].rank, 1);
        assert_eq!(
            recorder.last().1,
            vec![
                pair("limit", "10"),
                pair("metric", "wagered"),
                pair("period", "month")
            ]
        );
    }

    #[tokio::test]
    async fn test_health_is_never_cached() {
        let recorder = Recorder::new(json!({"status": "ok"}));
        let api = client(recorder.clone());

        assert!(api.health().await.data().unwrap().is_healthy());
        assert!(api.health().await.is_ok());
        assert_eq!(recorder.count(), 2);
    }

    #[tokio::test]
    async fn test_live_big_wins_cached_separately_from_gallery() {
        let recorder = Recorder::new(json!([]));
        let api = client(recorder.clone());

        api.live_big_wins(Some(10)).await;
        api.live_big_wins(Some(10)).await;
        api.big_wins(&BigWinQuery::new().with_paging(Paging::new(10))).await;

        assert_eq!(recorder.count(), 2);
        assert_eq!(recorder.last().0, "http://backend/api/big-wins");
    }

    #[tokio::test]
    async fn test_streamer_sessions_path() {
        let recorder = Recorder::new(json!([]));
        let api = client(recorder.clone());

        let result = api.streamer_sessions("s1", Some(5)).await;
        assert!(result.data().unwrap().is_empty());
        assert_eq!(recorder.last().0, "http://backend/api/streamers/s1/sessions");
    }
}
