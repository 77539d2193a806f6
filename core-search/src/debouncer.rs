//! Debounce and sequence-gating state machine
//!
//! [`QueryDebouncer`] holds no timers and never reads the clock: every
//! operation takes the current [`Instant`] from the caller. The async
//! [`SearchController`](crate::SearchController) feeds it readings from a
//! host [`Clock`](bridge_traits::Clock), tests feed it hand-made instants.
//!
//! Phases of one query session:
//!
//! ```text
//!   Idle --keystroke--> Pending --window elapsed--> InFlight(n) --resolve(n)--> Idle
//!                        ^   |                          |
//!                        +---+ keystroke re-arms        +--keystroke--> Pending
//! ```
//!
//! A keystroke while a request is in flight does not cancel it; its result
//! resolves as [`Resolution::Stale`] once a newer request has been issued.

use core_catalog::EffectiveQuery;
use std::time::{Duration, Instant};

/// A request the caller must now send to the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedRequest {
    pub seq: u64,
    pub query: EffectiveQuery,
}

/// Outcome of [`QueryDebouncer::poll`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebouncePoll {
    /// The window elapsed; send this request.
    Fire(IssuedRequest),
    /// A timer is armed and expires at the given instant.
    Wait(Instant),
    /// Nothing is pending.
    Idle,
}

/// Whether a response may be applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Current,
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Pending,
    InFlight(u64),
}

#[derive(Debug)]
pub struct QueryDebouncer {
    window: Duration,
    trim: bool,
    text: String,
    deadline: Option<Instant>,
    latest_seq: u64,
    in_flight: Option<u64>,
}

impl QueryDebouncer {
    pub fn new(window: Duration, trim: bool) -> Self {
        Self {
            window,
            trim,
            text: String::new(),
            deadline: None,
            latest_seq: 0,
            in_flight: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Text of the most recent keystroke
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Sequence number of the most recently issued request, 0 if none
    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    pub fn phase(&self) -> Phase {
        match (self.deadline, self.in_flight) {
            (Some(_), _) => Phase::Pending,
            (None, Some(seq)) => Phase::InFlight(seq),
            (None, None) => Phase::Idle,
        }
    }

    /// Record a keystroke at `now`, replacing any armed timer.
    ///
    /// Returns the instant at which the new timer expires.
    pub fn query_changed(&mut self, text: &str, now: Instant) -> Instant {
        let deadline = now + self.window;
        self.text = text.to_string();
        self.deadline = Some(deadline);
        deadline
    }

    /// Fire the armed timer if its window has elapsed at `now`.
    pub fn poll(&mut self, now: Instant) -> DebouncePoll {
        match self.deadline {
            None => DebouncePoll::Idle,
            Some(deadline) if now < deadline => DebouncePoll::Wait(deadline),
            Some(_) => {
                self.deadline = None;
                DebouncePoll::Fire(self.issue())
            }
        }
    }

    /// Issue a request for the current text without waiting for the window.
    ///
    /// Any armed timer is disarmed.
    pub fn issue_now(&mut self) -> IssuedRequest {
        self.deadline = None;
        self.issue()
    }

    /// Classify the response to request `seq`.
    ///
    /// Only the latest issued request is current. Resolving it leaves the
    /// in-flight phase.
    pub fn resolve(&mut self, seq: u64) -> Resolution {
        if seq != self.latest_seq {
            return Resolution::Stale;
        }
        if self.in_flight == Some(seq) {
            self.in_flight = None;
        }
        Resolution::Current
    }

    fn issue(&mut self) -> IssuedRequest {
        self.latest_seq += 1;
        self.in_flight = Some(self.latest_seq);
        IssuedRequest {
            seq: self.latest_seq,
            query: EffectiveQuery::from_input(&self.text, self.trim),
        }
    }
}
