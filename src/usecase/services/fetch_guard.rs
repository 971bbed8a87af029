use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

/// Hands out monotonically increasing tickets; only the latest one may
/// publish its result.
#[derive(Debug, Clone, Default)]
pub struct RequestSequencer {
    latest: u64,
}

impl RequestSequencer {
    pub fn issue(&mut self) -> RequestTicket {
        self.latest += 1;
        RequestTicket(self.latest)
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.latest
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceTicket(u64);

/// Coalesces bursts of input: each keystroke takes a ticket, and only the
/// ticket still current after the quiet window fires.
#[derive(Debug, Clone)]
pub struct Debouncer {
    generation: u64,
    window: Duration,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            generation: 0,
            window,
        }
    }

    pub fn bump(&mut self) -> DebounceTicket {
        self.generation += 1;
        DebounceTicket(self.generation)
    }

    pub fn is_current(&self, ticket: DebounceTicket) -> bool {
        ticket.0 == self.generation
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}
