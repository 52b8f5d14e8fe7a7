use std::time::{Duration, Instant};

/// Identifies one scheduled tick. Tokens from cancelled or replaced ticks
/// never match again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickToken(u64);

#[derive(Debug, Clone, Copy)]
struct Pending {
    token: TickToken,
    deadline: Instant,
}

/// A single delayed-tick handle: at most one tick is pending at a time.
#[derive(Debug, Default)]
pub struct TickTimer {
    generation: u64,
    pending: Option<Pending>,
}

impl TickTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a tick `delay` after `from`, replacing any pending one.
    pub fn schedule(&mut self, from: Instant, delay: Duration) -> TickToken {
        self.generation = self.generation.wrapping_add(1);
        let token = TickToken(self.generation);
        self.pending = Some(Pending {
            token,
            deadline: from + delay,
        });
        token
    }

    /// Drop the pending tick; any token handed out so far becomes stale.
    pub fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|p| p.deadline)
    }

    /// The pending tick's token if its deadline has passed
    pub fn due(&self, now: Instant) -> Option<TickToken> {
        self.pending
            .filter(|p| p.deadline <= now)
            .map(|p| p.token)
    }

    /// Consume the pending tick if `token` still identifies it.
    /// Returns the tick's deadline, or `None` for a stale token.
    pub fn fire(&mut self, token: TickToken) -> Option<Instant> {
        match self.pending {
            Some(p) if p.token == token => {
                self.pending = None;
                Some(p.deadline)
            }
            _ => None,
        }
    }
}
