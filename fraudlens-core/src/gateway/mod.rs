//! Analyst backend gateway
//!
//! The console talks to one HTTP service that serves videos, like series,
//! the risk-ranked account list, account details, hourly activity, and the
//! assistant chat. [`DataGateway`] is the seam the engine depends on;
//! [`HttpGateway`] is the production implementation.
//!
//! No retry or caching happens here. Every failure is returned as an
//! [`Error`](crate::Error) and handled by the component that asked.
//!
//! ## Usage
//!
//! Point the console at a backend in `~/.config/fraudlens/config.toml`:
//!
//! ```toml
//! [gateway]
//! base_url = "http://localhost:8000/api"
//! timeout_secs = 30
//! ```

mod client;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{HourActivityRecord, HourBucket, LikesSeries, RiskUser, UserDetail, Video};

pub use client::HttpGateway;

/// The six backend operations the console needs.
///
/// All are idempotent reads except [`DataGateway::post_chat`].
#[async_trait]
pub trait DataGateway: Send + Sync {
    /// All videos, in server order
    async fn list_videos(&self) -> Result<Vec<Video>>;

    /// Hourly like counts for a video
    async fn likes_series(&self, video_id: i64) -> Result<LikesSeries>;

    /// Risk-ranked accounts, optionally filtered by a username search
    async fn risk_users(&self, limit: usize, search: Option<&str>) -> Result<Vec<RiskUser>>;

    /// Full account profile; a missing account is [`Error::NotFound`](crate::Error::NotFound)
    async fn user_detail(&self, username: &str) -> Result<UserDetail>;

    /// Account events for one video during one hour, possibly empty
    async fn hour_activity(&self, video_id: i64, hour: &HourBucket)
        -> Result<Vec<HourActivityRecord>>;

    /// Send one analyst message to the assistant and return its reply
    async fn post_chat(&self, message: &str) -> Result<String>;
}
