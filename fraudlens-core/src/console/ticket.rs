//! Request tickets for "last request wins" ordering.
//!
//! Each component owns a [`TicketCounter`] and stamps every outgoing request
//! with a fresh [`Ticket`]. A completion is applied only if its ticket is
//! still the latest one the component issued; anything older is stale.

/// Sequence number attached to an outgoing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Ticket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic ticket source for one component.
#[derive(Debug, Default)]
pub struct TicketCounter {
    latest: u64,
}

impl TicketCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket that supersedes every earlier one.
    pub fn issue(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    /// Whether `ticket` is the most recently issued one.
    pub fn is_latest(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }

    /// Make every outstanding ticket stale without issuing a new request.
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }
}
