//! # Streamdash
//!
//! Data-access layer and terminal dashboard for a gambling-streaming
//! analytics backend (streamers, leaderboards, bonus hunts, slot games,
//! big wins, RTP tracker).
//!
//! ## Modules
//!
//! - [`cache`] - TTL + LRU cache for backend GET responses
//! - [`client`] - Caching API client and typed fetch functions
//! - [`format`] - Display helpers for amounts, counts and durations
//! - [`cli`] - Command line interface
//! - [`types`] - Shared types
//!
//! ```no_run
//! use streamdash::client::ApiClient;
//! use streamdash::types::requests::{GameQuery, Paging};
//! use streamdash::Config;
//!
//! # async fn run() -> streamdash::StreamdashResult<()> {
//! let api = ApiClient::new(&Config::load_or_default().with_env_overrides())?;
//! let games = api.games(&GameQuery::new().with_paging(Paging::new(20))).await;
//! match games.data() {
//!     Some(listing) => println!("{} games", listing.len()),
//!     None => eprintln!("{:?} (status {})", games.error(), games.status()),
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
#[cfg(feature = "cli")]
pub mod cli;
pub mod client;
pub mod format;
pub mod types;

pub use types::config::Config;
pub use types::errors::{ApiError, StreamdashError, StreamdashResult};
pub use types::responses::ApiResult;
