//! # fraudlens-core
//!
//! Core library for fraudlens - an analyst console for reviewing suspicious
//! engagement on a video platform.
//!
//! This library provides:
//! - Domain types for videos, like series, accounts, and chat
//! - The [`DataGateway`] seam and its HTTP implementation
//! - The console engine: drill-down, account browser, overlays, and chat
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! The console is a plain state machine. Operations on [`ViewState`] queue
//! [`Request`](console::Request)s; a [`Dispatcher`] runs them against a
//! gateway on tokio and sends back [`Completion`](console::Completion)s,
//! which the front end applies on its own thread. Only the latest request
//! of each kind is allowed to change what is shown.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use fraudlens_core::{Config, ConsoleSettings, Dispatcher, HttpGateway, ViewState};
//!
//! # async fn run() -> fraudlens_core::Result<()> {
//! let config = Config::load()?;
//! let gateway = Arc::new(HttpGateway::new(&config.gateway)?);
//! let (dispatcher, mut completions) =
//!     Dispatcher::new(gateway, tokio::runtime::Handle::current());
//!
//! let mut state = ViewState::new(ConsoleSettings::from(&config.console));
//! state.bootstrap();
//! dispatcher.dispatch_all(state.take_requests());
//!
//! while let Some(completion) = completions.recv().await {
//!     state.apply(completion);
//!     dispatcher.dispatch_all(state.take_requests());
//! }
//! # Ok(())
//! # }
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use console::{ConsoleSettings, ViewState};
pub use dispatch::Dispatcher;
pub use error::{Error, Result};
pub use gateway::{DataGateway, HttpGateway};
pub use types::*;

// Public modules
pub mod config;
pub mod console;
pub mod dispatch;
pub mod error;
pub mod format;
pub mod gateway;
pub mod logging;
pub mod types;
