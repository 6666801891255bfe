//! Runs console requests against a [`DataGateway`].
//!
//! Each request becomes one tokio task. Its completion is sent back over an
//! unbounded channel that the UI loop drains between frames. Every task
//! reports exactly once: if it is cancelled or panics before sending, its
//! guard reports [`Error::Aborted`] instead, so no component can be left
//! waiting on a request that will never answer.

use std::sync::Arc;
use std::time::Instant;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::console::{Completion, Request};
use crate::error::Error;
use crate::gateway::DataGateway;

/// Spawns gateway calls and forwards their completions.
#[derive(Clone)]
pub struct Dispatcher {
    gateway: Arc<dyn DataGateway>,
    handle: Handle,
    tx: UnboundedSender<Completion>,
}

impl Dispatcher {
    /// Create a dispatcher running on `handle`, plus the completion receiver.
    pub fn new(gateway: Arc<dyn DataGateway>, handle: Handle) -> (Self, UnboundedReceiver<Completion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                gateway,
                handle,
                tx,
            },
            rx,
        )
    }

    /// Start `request` in the background.
    pub fn dispatch(&self, request: Request) {
        let gateway = Arc::clone(&self.gateway);
        let guard = CompletionGuard {
            request: Some(request.clone()),
            tx: self.tx.clone(),
        };
        self.handle.spawn(async move {
            let completion = execute(gateway.as_ref(), request).await;
            guard.complete(completion);
        });
    }

    /// Start every request in order.
    pub fn dispatch_all(&self, requests: impl IntoIterator<Item = Request>) {
        for request in requests {
            self.dispatch(request);
        }
    }
}

/// Reports a request exactly once, falling back to `Aborted` on drop.
struct CompletionGuard {
    request: Option<Request>,
    tx: UnboundedSender<Completion>,
}

impl CompletionGuard {
    fn complete(mut self, completion: Completion) {
        self.request = None;
        // Receiver gone means the console is shutting down.
        let _ = self.tx.send(completion);
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        if let Some(request) = self.request.take() {
            tracing::warn!(request = request.name(), "Request ended without a result");
            let _ = self.tx.send(request.fail(Error::Aborted));
        }
    }
}

/// Perform one request and wrap the outcome as a [`Completion`].
pub async fn execute(gateway: &dyn DataGateway, request: Request) -> Completion {
    let name = request.name();
    let started = Instant::now();
    tracing::debug!(request = name, "Executing request");

    let completion = match request {
        Request::ListVideos => Completion::Videos(gateway.list_videos().await),
        Request::LikesSeries { ticket, video_id } => Completion::LikesSeries {
            ticket,
            video_id,
            result: gateway.likes_series(video_id).await,
        },
        Request::RiskUsers {
            ticket,
            limit,
            search,
        } => Completion::RiskUsers {
            ticket,
            result: gateway.risk_users(limit, search.as_deref()).await,
        },
        Request::UserDetail { ticket, username } => {
            let result = gateway.user_detail(&username).await;
            Completion::UserDetail {
                ticket,
                username,
                result,
            }
        }
        Request::HourActivity {
            ticket,
            video_id,
            hour,
        } => Completion::HourActivity {
            ticket,
            result: gateway.hour_activity(video_id, &hour).await,
        },
        Request::Chat { ticket, message } => Completion::Chat {
            ticket,
            result: gateway.post_chat(&message).await,
        },
    };

    tracing::debug!(
        request = name,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Request finished"
    );
    completion
}
