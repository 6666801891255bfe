//! The analyst console engine.
//!
//! Pure state: nothing in here performs I/O. Components turn user intents
//! into [`Request`]s and fold [`Completion`]s back into their state.
//! [`ViewState`] owns all of them and is the only thing front ends talk to.
//!
//! | Component | Owns |
//! |-----------|------|
//! | [`TimeSeriesDrillDown`] | video list, selected video, likes series |
//! | [`EntityBrowser`] | risk-ranked accounts, search query |
//! | [`ModalStack`] | the one visible overlay |
//! | [`ChatSession`] | assistant transcript |

pub mod browser;
pub mod chat;
pub mod controller;
pub mod debounce;
pub mod drilldown;
pub mod effects;
pub mod modal;
pub mod ticket;

pub use browser::EntityBrowser;
pub use chat::{ChatSession, FALLBACK_REPLY, GREETING};
pub use controller::{ConsoleSettings, Notice, Section, ViewState};
pub use debounce::Debouncer;
pub use drilldown::{resolve_point, HourSelection, SeriesState, TimeSeriesDrillDown};
pub use effects::{Completion, Request};
pub use modal::{ActivityLoad, ClickTarget, HourDrillDown, ModalStack, Overlay};
pub use ticket::{Ticket, TicketCounter};
