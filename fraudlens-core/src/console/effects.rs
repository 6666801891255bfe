//! Requests the console wants performed and the completions that answer them.
//!
//! Console operations never touch the network. They queue a [`Request`],
//! something outside runs it (see [`Dispatcher`](crate::dispatch::Dispatcher)),
//! and the outcome comes back as a [`Completion`] through
//! [`ViewState::apply`](super::ViewState::apply).

use crate::error::{Error, Result};
use crate::types::{HourActivityRecord, HourBucket, LikesSeries, RiskUser, UserDetail, Video};

use super::ticket::Ticket;

/// A backend call the console is waiting on.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    ListVideos,
    LikesSeries {
        ticket: Ticket,
        video_id: i64,
    },
    RiskUsers {
        ticket: Ticket,
        limit: usize,
        search: Option<String>,
    },
    UserDetail {
        ticket: Ticket,
        username: String,
    },
    HourActivity {
        ticket: Ticket,
        video_id: i64,
        hour: HourBucket,
    },
    Chat {
        ticket: Ticket,
        message: String,
    },
}

impl Request {
    /// Short operation name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Request::ListVideos => "list_videos",
            Request::LikesSeries { .. } => "likes_series",
            Request::RiskUsers { .. } => "risk_users",
            Request::UserDetail { .. } => "user_detail",
            Request::HourActivity { .. } => "hour_activity",
            Request::Chat { .. } => "chat",
        }
    }

    /// The completion reporting that this request failed with `error`.
    pub fn fail(self, error: Error) -> Completion {
        match self {
            Request::ListVideos => Completion::Videos(Err(error)),
            Request::LikesSeries { ticket, video_id } => Completion::LikesSeries {
                ticket,
                video_id,
                result: Err(error),
            },
            Request::RiskUsers { ticket, .. } => Completion::RiskUsers {
                ticket,
                result: Err(error),
            },
            Request::UserDetail { ticket, username } => Completion::UserDetail {
                ticket,
                username,
                result: Err(error),
            },
            Request::HourActivity { ticket, .. } => Completion::HourActivity {
                ticket,
                result: Err(error),
            },
            Request::Chat { ticket, .. } => Completion::Chat {
                ticket,
                result: Err(error),
            },
        }
    }
}

/// Outcome of a [`Request`].
#[derive(Debug)]
pub enum Completion {
    Videos(Result<Vec<Video>>),
    LikesSeries {
        ticket: Ticket,
        video_id: i64,
        result: Result<LikesSeries>,
    },
    RiskUsers {
        ticket: Ticket,
        result: Result<Vec<RiskUser>>,
    },
    UserDetail {
        ticket: Ticket,
        username: String,
        result: Result<UserDetail>,
    },
    HourActivity {
        ticket: Ticket,
        result: Result<Vec<HourActivityRecord>>,
    },
    Chat {
        ticket: Ticket,
        result: Result<String>,
    },
}
