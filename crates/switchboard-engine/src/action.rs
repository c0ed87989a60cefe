//! Actions and their completion reporting
//!
//! An action is one queued run of a script on one device. Completion
//! (success or classified failure) is reported through an
//! [`ActionObserver`] so the engine stays ignorant of the client
//! protocol above it.

use crate::arglist::ArgList;
use crate::exec::ExecCtx;
use crate::plug::Plug;
use std::sync::Arc;
use std::time::Instant;
use switchboard_script::{Script, ScriptKind};
use thiserror::Error;

/// How an action ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActError {
    #[error("success")]
    Success,

    /// Timed out before the connection came up
    #[error("connect timeout")]
    ConnectTimeout,

    /// Connected but timed out before login completed
    #[error("login timeout")]
    LoginTimeout,

    /// The device never produced the expected response
    #[error("timed out waiting for expected response")]
    ExpectFail,

    /// Dropped because an earlier action on this device failed
    #[error("aborted due to previous action failure")]
    Aborted,
}

/// Completion report delivered to the observer
#[derive(Debug, Clone)]
pub struct ActionOutcome {
    /// Caller-chosen tag identifying the request this action served
    pub client_id: u64,
    pub error: ActError,
    /// Human-readable failure description; `None` on success
    pub message: Option<String>,
}

/// Receives action completions and optional wire telemetry
pub trait ActionObserver: Send + Sync {
    fn completed(&self, outcome: ActionOutcome);

    /// Line-oriented trace of wire activity (sends, matched receives,
    /// delays). Default drops it.
    fn telemetry(&self, _client_id: u64, _msg: &str) {}
}

/// One queued script run
pub struct Action {
    pub kind: ScriptKind,
    /// Execution stack; bottom frame is the script body
    pub exec: Vec<ExecCtx>,
    pub observer: Option<Arc<dyn ActionObserver>>,
    pub client_id: u64,
    pub err: ActError,
    /// Set when the action reaches the queue head
    pub started: Option<Instant>,
    /// Set when a delay statement begins
    pub delay_start: Option<Instant>,
    /// Result accumulator shared across the request's actions
    pub args: Option<ArgList>,
}

impl Action {
    pub fn new(
        kind: ScriptKind,
        script: Script,
        plugs: Option<Vec<Arc<Plug>>>,
        observer: Option<Arc<dyn ActionObserver>>,
        client_id: u64,
        args: Option<ArgList>,
    ) -> Self {
        Self {
            kind,
            exec: vec![ExecCtx::new(script, plugs)],
            observer,
            client_id,
            err: ActError::Success,
            started: None,
            delay_start: None,
            args,
        }
    }

    /// Restart the action from the top of its script, dropping any
    /// inner frames. Used when a login preempts a partially-run head
    /// action; the head re-runs cleanly once login completes. The
    /// timeout clock keeps its original start, so time lost to the
    /// reconnect and login still counts against this action's budget.
    pub fn rewind(&mut self) {
        self.exec.truncate(1);
        if let Some(outer) = self.exec.first_mut() {
            outer.rewind();
        }
        self.delay_start = None;
    }
}

impl std::fmt::Debug for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Action")
            .field("kind", &self.kind)
            .field("client_id", &self.client_id)
            .field("err", &self.err)
            .field("depth", &self.exec.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use switchboard_script::Stmt;

    #[test]
    fn test_rewind_drops_inner_frames() {
        let script = Script::new(vec![Stmt::send("a"), Stmt::send("b")]);
        let inner = Script::new(vec![Stmt::send("c")]);
        let mut act = Action::new(ScriptKind::PowerOn, script, None, None, 7, None);
        act.exec[0].advance();
        act.exec.push(ExecCtx::new(inner, None));
        act.started = Some(Instant::now());
        act.delay_start = Some(Instant::now());
        act.rewind();
        assert_eq!(act.exec.len(), 1);
        // the deadline clock keeps running across a rewind
        assert!(act.started.is_some());
        assert!(act.delay_start.is_none());
        assert!(matches!(act.exec[0].current(), Some(Stmt::Send { fmt }) if fmt == "a"));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(ActError::ConnectTimeout.to_string(), "connect timeout");
        assert_eq!(
            ActError::Aborted.to_string(),
            "aborted due to previous action failure"
        );
    }
}
