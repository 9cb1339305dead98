//! Entity up/down state machine.
//!
//! # States
//! - Up: last extreme reading was 100% availability
//! - Down: last extreme reading was 0% availability
//!
//! # State Transitions
//! ```text
//! (none) → Up/Down: first extreme reading, silent
//! Up → Down: availability == 0.0
//! Down → Up: availability == 100.0
//! ```
//!
//! Intermediate readings (partial check progress, unchecked servers) leave
//! the state untouched.

use std::collections::HashMap;
use std::fmt;

/// Tracked availability extreme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Down,
    Up,
}

impl Status {
    /// Only the exact extremes map to a state.
    pub fn from_availability(availability: f64) -> Option<Self> {
        if availability == 0.0 {
            Some(Status::Down)
        } else if availability == 100.0 {
            Some(Status::Up)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Down => "DOWN",
            Status::Up => "UP",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An UP ↔ DOWN edge observed for one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub proxy: String,
    pub server: String,
    pub from: Status,
    pub to: Status,
}

/// Last observed state per (proxy, server).
#[derive(Debug, Default)]
pub struct StatusTracker {
    /// proxy -> server -> status
    records: HashMap<String, HashMap<String, Status>>,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one availability reading. Returns the transition, if any.
    pub fn observe(&mut self, proxy: &str, server: &str, availability: f64) -> Option<Transition> {
        let target = Status::from_availability(availability)?;

        let servers = self.records.entry(proxy.to_owned()).or_default();

        match servers.get_mut(server) {
            None => {
                servers.insert(server.to_owned(), target);
                tracing::trace!(proxy, server, status = %target, "Status seeded");
                None
            }
            Some(current) if *current == target => None,
            Some(current) => {
                let from = *current;
                *current = target;
                Some(Transition {
                    proxy: proxy.to_owned(),
                    server: server.to_owned(),
                    from,
                    to: target,
                })
            }
        }
    }

    pub fn get(&self, proxy: &str, server: &str) -> Option<Status> {
        self.records.get(proxy)?.get(server).copied()
    }

    /// Number of tracked entities.
    pub fn len(&self) -> usize {
        self.records.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
