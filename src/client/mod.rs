//! Backend API client.
//!
//! [`ApiClient`] wraps a [`Transport`] with the response cache and exposes
//! typed fetch functions (games, streamers, sessions, big wins, RTP tracker,
//! leaderboard, bonus hunts). All of them return an
//! [`ApiResult`](crate::types::responses::ApiResult).

mod api;
mod endpoints;
mod transport;

pub use api::ApiClient;
pub use transport::{HttpTransport, RawResponse, Transport};
