//! Risk-ranked account list with live search.

use std::time::{Duration, Instant};

use crate::error::Result;
use crate::types::RiskUser;

use super::debounce::Debouncer;
use super::effects::Request;
use super::ticket::{Ticket, TicketCounter};

/// Owns the account list, the search query, and detail lookups.
#[derive(Debug)]
pub struct EntityBrowser {
    /// `None` until the first list response arrives
    users: Option<Vec<RiskUser>>,
    query: String,
    page_size: usize,
    /// Highlighted row
    cursor: usize,
    search: Debouncer<String>,
    list_tickets: TicketCounter,
    detail_tickets: TicketCounter,
}

impl EntityBrowser {
    pub fn new(page_size: usize, debounce: Duration) -> Self {
        Self {
            users: None,
            query: String::new(),
            page_size,
            cursor: 0,
            search: Debouncer::new(debounce),
            list_tickets: TicketCounter::new(),
            detail_tickets: TicketCounter::new(),
        }
    }

    /// Accounts in server order; empty before the first response.
    pub fn users(&self) -> &[RiskUser] {
        self.users.as_deref().unwrap_or(&[])
    }

    /// Whether any list response has arrived yet.
    pub fn is_loaded(&self) -> bool {
        self.users.is_some()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// A typed query is waiting for the quiet period to pass.
    pub fn search_pending(&self) -> bool {
        self.search.is_pending()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected_user(&self) -> Option<&RiskUser> {
        self.users().get(self.cursor)
    }

    /// Request the list for the current query right away.
    pub fn refresh(&mut self) -> Request {
        self.search.flush();
        self.list_request(self.query.clone())
    }

    /// Update the query. The fetch goes out once typing settles.
    pub fn set_search(&mut self, query: String, now: Instant) -> Option<Request> {
        self.query = query.clone();
        self.search
            .push(query, now)
            .map(|query| self.list_request(query))
    }

    /// Release a settled query, if any.
    pub fn tick(&mut self, now: Instant) -> Option<Request> {
        self.search
            .poll(now)
            .map(|query| self.list_request(query))
    }

    fn list_request(&mut self, query: String) -> Request {
        let ticket = self.list_tickets.issue();
        tracing::debug!(%ticket, query = %query, "Requesting risk list");
        Request::RiskUsers {
            ticket,
            limit: self.page_size,
            search: Some(query).filter(|q| !q.is_empty()),
        }
    }

    /// Replace the list wholesale with the latest response.
    ///
    /// Failures and stale responses leave the current list untouched.
    pub fn on_users_loaded(&mut self, ticket: Ticket, result: Result<Vec<RiskUser>>) -> bool {
        if !self.list_tickets.is_latest(ticket) {
            tracing::debug!(%ticket, "Discarding stale risk list");
            return false;
        }
        match result {
            Ok(users) => {
                self.cursor = self.cursor.min(users.len().saturating_sub(1));
                self.users = Some(users);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load risk list");
                false
            }
        }
    }

    pub fn select_next(&mut self) {
        let len = self.users().len();
        if len > 0 {
            self.cursor = (self.cursor + 1).min(len - 1);
        }
    }

    pub fn select_previous(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.cursor = 0;
    }

    pub fn select_last(&mut self) {
        self.cursor = self.users().len().saturating_sub(1);
    }

    /// Request the full profile for `username`.
    pub fn select_entity(&mut self, username: &str) -> Request {
        let ticket = self.detail_tickets.issue();
        tracing::info!(%ticket, username, "Requesting account detail");
        Request::UserDetail {
            ticket,
            username: username.to_string(),
        }
    }

    /// Whether a detail response answers the most recent selection.
    pub fn accepts_detail(&self, ticket: Ticket) -> bool {
        self.detail_tickets.is_latest(ticket)
    }
}
