/// Delay between the last selection change and the catalog refresh it triggers.
pub const CATALOG_DEBOUNCE_MS: u64 = 400;

/// Single-slot debounce timer.
///
/// At most one payload is pending. Scheduling again replaces the pending payload
/// and restarts the delay, so only the most recent request ever fires. Time is
/// passed in by the caller (milliseconds from any monotonic origin), which keeps
/// the state machine independent of the browser timer that drives it.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay_ms: u64,
    pending: Option<Pending<T>>,
    generation: u64,
}

#[derive(Debug, Clone)]
struct Pending<T> {
    due_at: u64,
    generation: u64,
    payload: T,
}

impl<T> Debouncer<T> {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
            generation: 0,
        }
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    /// Replaces any pending payload. Returns the ticket of the new slot; a timer
    /// callback holding an older ticket must not fire.
    pub fn schedule(&mut self, now: u64, payload: T) -> u64 {
        self.generation += 1;
        self.pending = Some(Pending {
            due_at: now + self.delay_ms,
            generation: self.generation,
            payload,
        });
        self.generation
    }

    /// Pending payload, if any.
    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref().map(|p| &p.payload)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|p| p.generation == ticket)
    }

    /// Takes the payload once its delay has elapsed.
    pub fn take_due(&mut self, now: u64) -> Option<T> {
        let due = self.pending.as_ref().is_some_and(|p| now >= p.due_at);
        if !due {
            return None;
        }
        self.pending.take().map(|p| p.payload)
    }

    /// Timer callback entry point: fires only for the current ticket.
    pub fn fire(&mut self, ticket: u64, now: u64) -> Option<T> {
        if !self.is_current(ticket) {
            return None;
        }
        self.take_due(now)
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.payload)
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(CATALOG_DEBOUNCE_MS)
    }
}
