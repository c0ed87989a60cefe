//! Poll interface types
//!
//! The engine never blocks. Before each wait the caller collects an
//! [`Interest`] per connected or connecting device, hands them to its
//! own poll/select loop, then reports results back as [`PollEvents`].
//! The engine also tightens the caller's wait timeout so timed work
//! (action timeouts, delays, reconnect backoff, pings) fires on time.

use std::collections::HashMap;
use std::os::fd::RawFd;
use std::time::Duration;

/// What a device wants watched before the next wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interest {
    pub fd: RawFd,
    pub read: bool,
    pub write: bool,
}

/// Readiness reported for one descriptor after a wait
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Readiness {
    pub readable: bool,
    pub writable: bool,
    pub hangup: bool,
    pub error: bool,
    pub invalid: bool,
}

impl Readiness {
    pub fn any(&self) -> bool {
        self.readable || self.writable || self.hangup || self.error || self.invalid
    }
}

/// Readiness results for all watched descriptors
#[derive(Debug, Default)]
pub struct PollEvents {
    events: HashMap<RawFd, Readiness>,
}

impl PollEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, fd: RawFd, readiness: Readiness) {
        self.events.insert(fd, readiness);
    }

    pub fn get(&self, fd: RawFd) -> Readiness {
        self.events.get(&fd).copied().unwrap_or_default()
    }
}

/// Tighten a wait timeout to at most `d`. `None` means "no deadline
/// yet", so any concrete duration replaces it.
pub fn update_timeout(timeout: &mut Option<Duration>, d: Duration) {
    match timeout {
        Some(t) if *t <= d => {}
        _ => *timeout = Some(d),
    }
}
