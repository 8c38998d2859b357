//! Debounced autosave bookkeeping.
//!
//! The core owns no timers. Hosts report mutations with [`Autosave::touch`],
//! poll [`Autosave::due`] from whatever clock they have, and bracket each
//! save with [`Autosave::begin`] / [`Autosave::finish`]. A save only clears
//! the dirty flag if no mutation happened after it was issued, so a stale
//! response can never mark newer edits as persisted.

#[cfg(test)]
#[path = "autosave_test.rs"]
mod autosave_test;

use tracing::{debug, warn};

/// Receipt for one issued save, carrying the revision it captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveTicket {
    pub revision: u64,
}

/// Dirty flag plus debounce deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Autosave {
    debounce_ms: i64,
    revision: u64,
    saved_revision: u64,
    deadline: Option<i64>,
    in_flight: Option<SaveTicket>,
}

impl Autosave {
    #[must_use]
    pub fn new(debounce_ms: i64) -> Self {
        Self { debounce_ms: debounce_ms.max(0), revision: 0, saved_revision: 0, deadline: None, in_flight: None }
    }

    /// Record a mutation at `now_ms`, rescheduling the deadline.
    pub fn touch(&mut self, now_ms: i64) {
        self.revision += 1;
        self.deadline = Some(now_ms + self.debounce_ms);
    }

    /// Unsaved mutations exist.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.revision != self.saved_revision
    }

    /// When the pending save should fire, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<i64> {
        self.deadline
    }

    #[must_use]
    pub fn in_flight(&self) -> Option<SaveTicket> {
        self.in_flight
    }

    /// Dirty, past the deadline, and not already saving.
    #[must_use]
    pub fn due(&self, now_ms: i64) -> bool {
        self.is_dirty() && self.in_flight.is_none() && self.deadline.is_some_and(|d| now_ms >= d)
    }

    /// Issue a save for the current revision, if there is anything to save.
    ///
    /// Ignores the deadline, so it also serves manual saves.
    pub fn begin(&mut self) -> Option<SaveTicket> {
        if !self.is_dirty() {
            return None;
        }
        let ticket = SaveTicket { revision: self.revision };
        self.in_flight = Some(ticket);
        self.deadline = None;
        debug!(revision = ticket.revision, "save issued");
        Some(ticket)
    }

    /// Settle a save issued by [`Autosave::begin`].
    ///
    /// On success the captured revision is recorded as persisted. On failure
    /// the document stays dirty and the deadline is re-armed from `now_ms`.
    pub fn finish(&mut self, ticket: SaveTicket, ok: bool, now_ms: i64) {
        if self.in_flight == Some(ticket) {
            self.in_flight = None;
        }
        if ok {
            self.saved_revision = self.saved_revision.max(ticket.revision);
            if self.is_dirty() && self.deadline.is_none() {
                self.deadline = Some(now_ms + self.debounce_ms);
            }
        } else {
            warn!(revision = ticket.revision, "save failed; will retry");
            if self.deadline.is_none() {
                self.deadline = Some(now_ms + self.debounce_ms);
            }
        }
    }

    /// Forget all pending work (document switch).
    ///
    /// Revisions stay monotonic: the current one counts as saved, so a
    /// ticket issued before the switch can never cover edits made after it.
    pub fn reset(&mut self) {
        self.saved_revision = self.revision;
        self.deadline = None;
        self.in_flight = None;
    }
}
