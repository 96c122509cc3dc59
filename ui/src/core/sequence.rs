//! Per-panel request ordering.
//!
//! Fetches are never cancelled, so responses can land out of order. Every
//! request takes a ticket; a response is applied only if no newer ticket has
//! been applied to the same panel already.

use std::cell::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
pub struct Sequencer {
    issued: Cell<u64>,
    applied: Cell<u64>,
    in_flight: Cell<u32>,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> Ticket {
        let next = self.issued.get() + 1;
        self.issued.set(next);
        Ticket(next)
    }

    /// Claim the panel for `ticket`. False when a newer response already won.
    pub fn accept(&self, ticket: Ticket) -> bool {
        if ticket.0 <= self.applied.get() {
            return false;
        }
        self.applied.set(ticket.0);
        true
    }

    pub fn last_applied(&self) -> u64 {
        self.applied.get()
    }

    pub(crate) fn enter(&self) -> u32 {
        let count = self.in_flight.get() + 1;
        self.in_flight.set(count);
        count
    }

    pub(crate) fn leave(&self) -> u32 {
        let count = self.in_flight.get().saturating_sub(1);
        self.in_flight.set(count);
        count
    }
}
