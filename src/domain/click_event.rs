//! Click event passed from the redirect path to the background worker.

/// A single redirect hit, queued for asynchronous click counting.
///
/// The redirect handler `try_send`s one of these onto a bounded channel and
/// returns immediately; the worker turns it into an atomic increment against
/// the store. If the queue is full the event is dropped: click counts are an
/// analytics convenience, not a ledger.
#[derive(Debug, Clone)]
pub struct ClickEvent {
    pub code: String,
}

impl ClickEvent {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}
