//! Device state machine
//!
//! A device owns one transport, one action queue, and the execution
//! state of whichever action sits at the queue head. Only the head
//! action makes progress; everything behind it waits. The interpreter
//! runs statements until one blocks on I/O or a timer, then yields back
//! to the event loop with a tightened wake-up deadline.
//!
//! Failure handling is deliberately blunt. A script that times out or
//! hits an uninterpretable response leaves the device session in an
//! unknown protocol state, so the failed action's error is reported,
//! every queued action is drained with a cascading error, and the
//! connection is torn down and retried with backoff.

use crate::action::{ActError, Action, ActionObserver, ActionOutcome};
use crate::arglist::ArgList;
use crate::buffer::IoBuffer;
use crate::exec::ExecCtx;
use crate::plug::{Plug, PlugList};
use crate::poll::{update_timeout, Interest, Readiness};
use crate::transport::{ConnectProgress, Transport};
use std::collections::VecDeque;
use std::io::ErrorKind;
use std::os::fd::RawFd;
use std::sync::Arc;
use std::time::{Duration, Instant};
use switchboard_common::{NodeSet, PowerState};
use switchboard_script::{
    MatchCache, ResultInterp, Script, ScriptKind, ScriptTable, StateInterp, Stmt,
};
use tracing::{debug, warn};

/// Reconnect backoff schedule in seconds, indexed by attempt number
const RETRY_BACKOFF: [u64; 7] = [1, 2, 4, 8, 15, 30, 60];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectState {
    NotConnected,
    Connecting,
    Connected,
}

/// Lifetime counters, exposed for daemon status reporting
#[derive(Debug, Clone, Copy, Default)]
pub struct DeviceStats {
    pub successful_connects: u64,
    pub successful_actions: u64,
}

pub struct Device {
    name: String,
    specname: String,
    connect_state: ConnectState,
    logged_in: bool,
    matches: MatchCache,
    transport: Box<dyn Transport>,
    acts: VecDeque<Action>,
    /// Per-action wall-clock budget
    timeout: Duration,
    to: IoBuffer,
    from: IoBuffer,
    plugs: PlugList,
    scripts: ScriptTable,
    last_retry: Option<Instant>,
    retry_count: u32,
    last_ping: Option<Instant>,
    ping_period: Option<Duration>,
    stats: DeviceStats,
}

impl Device {
    pub fn new(
        name: impl Into<String>,
        specname: impl Into<String>,
        transport: Box<dyn Transport>,
        timeout: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            specname: specname.into(),
            connect_state: ConnectState::NotConnected,
            logged_in: false,
            matches: MatchCache::new(),
            transport,
            acts: VecDeque::new(),
            timeout,
            to: IoBuffer::default(),
            from: IoBuffer::default(),
            plugs: PlugList::new(),
            scripts: ScriptTable::new(),
            last_retry: None,
            retry_count: 0,
            last_ping: None,
            ping_period: None,
            stats: DeviceStats::default(),
        }
    }

    pub fn with_plugs(mut self, plugs: PlugList) -> Self {
        self.plugs = plugs;
        self
    }

    pub fn with_scripts(mut self, scripts: ScriptTable) -> Self {
        self.scripts = scripts;
        self
    }

    pub fn with_ping_period(mut self, period: Duration) -> Self {
        self.ping_period = Some(period);
        self
    }

    pub fn with_buffer_limit(mut self, limit: usize) -> Self {
        self.to = IoBuffer::new(limit);
        self.from = IoBuffer::new(limit);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the device definition this device was instantiated from
    pub fn specname(&self) -> &str {
        &self.specname
    }

    pub fn connect_state(&self) -> ConnectState {
        self.connect_state
    }

    pub fn logged_in(&self) -> bool {
        self.logged_in
    }

    pub fn plugs(&self) -> &PlugList {
        &self.plugs
    }

    pub fn scripts(&self) -> &ScriptTable {
        &self.scripts
    }

    pub fn stats(&self) -> DeviceStats {
        self.stats
    }

    pub fn queue_len(&self) -> usize {
        self.acts.len()
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    pub fn fd(&self) -> Option<RawFd> {
        self.transport.fd()
    }

    /// True if `node` is attached to one of this device's plugs
    pub fn has_node(&self, node: &str) -> bool {
        self.plugs
            .iter()
            .any(|p| p.node.as_deref() == Some(node))
    }

    /// True if any node in `targets` is attached here
    pub fn covers_any(&self, targets: &NodeSet) -> bool {
        self.plugs
            .iter()
            .any(|p| p.node.as_deref().is_some_and(|n| targets.contains(n)))
    }

    /// True if this device can run `kind` through any dispatch tier
    pub fn can_run(&self, kind: ScriptKind) -> bool {
        self.scripts.implements(kind)
            || kind
                .ranged_variant()
                .is_some_and(|k| self.scripts.implements(k))
            || kind
                .all_variant()
                .is_some_and(|k| self.scripts.implements(k))
    }

    /// Forget accumulated backoff debt. Called when a client hands new
    /// work to a disconnected device so the next reconnect attempt is
    /// not starved by delays earned from earlier failures.
    pub(crate) fn reset_retry(&mut self) {
        self.retry_count = 0;
    }

    /// Backoff delay before reconnect attempt number `retry_count`
    pub fn retry_delay(retry_count: u32) -> Duration {
        let i = (retry_count.saturating_sub(1) as usize).min(RETRY_BACKOFF.len() - 1);
        Duration::from_secs(RETRY_BACKOFF[i])
    }

    /// What to watch before the next poll, if anything
    pub fn interest(&self) -> Option<Interest> {
        let fd = self.transport.fd()?;
        match self.connect_state {
            ConnectState::NotConnected => None,
            ConnectState::Connecting => Some(Interest {
                fd,
                read: true,
                write: true,
            }),
            ConnectState::Connected => Some(Interest {
                fd,
                read: true,
                write: !self.to.is_empty(),
            }),
        }
    }

    /// Begin a connection attempt
    pub fn connect(&mut self) {
        self.last_retry = Some(Instant::now());
        self.retry_count += 1;
        match self.transport.connect() {
            ConnectProgress::Established => self.on_connected(),
            ConnectProgress::Pending => {
                debug!(device = %self.name, "connect in progress");
                self.connect_state = ConnectState::Connecting;
            }
            ConnectProgress::Failed => {
                debug!(device = %self.name, attempt = self.retry_count, "connect failed");
                self.connect_state = ConnectState::NotConnected;
            }
        }
    }

    fn on_connected(&mut self) {
        debug!(device = %self.name, "connected");
        self.connect_state = ConnectState::Connected;
        self.stats.successful_connects += 1;
        self.enqueue_login();
    }

    /// Tear the session down. Buffered bytes belong to the dead session
    /// and are discarded, as is a queued login that has not started.
    pub fn disconnect(&mut self) {
        self.transport.disconnect();
        self.connect_state = ConnectState::NotConnected;
        self.logged_in = false;
        self.to.clear();
        self.from.clear();
        if matches!(self.acts.front(), Some(a) if a.kind == ScriptKind::Login) {
            self.acts.pop_front();
        }
        debug!(device = %self.name, "disconnected");
    }

    /// Retry a dead connection once its backoff delay has elapsed;
    /// otherwise tighten `timeout` to the remaining delay. A zeroed
    /// retry count owes no backoff and connects at once.
    pub fn reconnect(&mut self, timeout: &mut Option<Duration>) {
        if self.connect_state != ConnectState::NotConnected {
            self.disconnect();
        }
        if self.retry_count == 0 {
            self.connect();
            return;
        }
        let delay = Self::retry_delay(self.retry_count);
        match self.last_retry {
            None => self.connect(),
            Some(last) => {
                let elapsed = Instant::now().duration_since(last);
                if elapsed >= delay {
                    self.connect();
                } else {
                    update_timeout(timeout, delay - elapsed);
                }
            }
        }
    }

    /// Put a login at the queue head. A head action that already ran
    /// partway is rewound so it re-runs cleanly once login completes.
    fn enqueue_login(&mut self) {
        if let Some(head) = self.acts.front_mut() {
            head.rewind();
        }
        match self.scripts.get(ScriptKind::Login) {
            Some(script) => {
                self.acts.push_front(Action::new(
                    ScriptKind::Login,
                    script.clone(),
                    None,
                    None,
                    0,
                    None,
                ));
            }
            // devices with no login handshake are usable immediately
            None => self.logged_in = true,
        }
    }

    /// Queue a keepalive when the ping period has elapsed; tighten
    /// `timeout` so the next one fires on schedule
    pub fn enqueue_ping(&mut self, timeout: &mut Option<Duration>) {
        let Some(period) = self.ping_period else {
            return;
        };
        let Some(script) = self.scripts.get(ScriptKind::Ping) else {
            return;
        };
        let now = Instant::now();
        let due = match self.last_ping {
            None => true,
            Some(last) => now.duration_since(last) >= period,
        };
        if due {
            self.last_ping = Some(now);
            self.acts.push_back(Action::new(
                ScriptKind::Ping,
                script.clone(),
                None,
                None,
                0,
                None,
            ));
            update_timeout(timeout, period);
        } else if let Some(last) = self.last_ping {
            update_timeout(timeout, period - now.duration_since(last));
        }
    }

    /// Queue a device-wide (untargeted) operation
    pub fn enqueue_device_wide(
        &mut self,
        kind: ScriptKind,
        observer: Option<Arc<dyn ActionObserver>>,
        client_id: u64,
    ) -> usize {
        let Some(script) = self.scripts.get(kind) else {
            return 0;
        };
        self.acts.push_back(Action::new(
            kind,
            script.clone(),
            None,
            observer,
            client_id,
            None,
        ));
        1
    }

    /// Queue actions covering every plug of this device whose node is
    /// in `targets`. Returns the number of actions queued.
    ///
    /// Dispatch prefers the cheapest script the device implements: a
    /// whole-device `_all` script when every node-bearing plug matched
    /// (or the operation is a harmless query), then a `_ranged` script
    /// addressing the matched subset, then one single-plug action per
    /// matched plug.
    pub fn enqueue_targeted(
        &mut self,
        kind: ScriptKind,
        targets: &NodeSet,
        observer: Option<Arc<dyn ActionObserver>>,
        client_id: u64,
        args: Option<&ArgList>,
    ) -> usize {
        let mut matched: Vec<Arc<Plug>> = Vec::new();
        let mut all = true;
        for plug in self.plugs.iter() {
            match plug.node.as_deref() {
                Some(node) if targets.contains(node) => matched.push(plug.clone()),
                // unbound plugs are live outlets; "all" must not
                // implicitly switch them
                _ => all = false,
            }
        }
        if matched.is_empty() {
            return 0;
        }
        if all || kind.is_query() {
            if let Some((all_kind, script)) = kind
                .all_variant()
                .and_then(|k| self.scripts.get(k).map(|s| (k, s.clone())))
            {
                self.acts.push_back(Action::new(
                    all_kind,
                    script,
                    None,
                    observer,
                    client_id,
                    args.cloned(),
                ));
                return 1;
            }
        }
        if let Some((ranged_kind, script)) = kind
            .ranged_variant()
            .and_then(|k| self.scripts.get(k).map(|s| (k, s.clone())))
        {
            self.acts.push_back(Action::new(
                ranged_kind,
                script,
                Some(matched),
                observer,
                client_id,
                args.cloned(),
            ));
            return 1;
        }
        if let Some(script) = self.scripts.get(kind).cloned() {
            let n = matched.len();
            for plug in matched {
                self.acts.push_back(Action::new(
                    kind,
                    script.clone(),
                    Some(vec![plug]),
                    observer.clone(),
                    client_id,
                    args.cloned(),
                ));
            }
            return n;
        }
        0
    }

    /// React to poll results for this device's descriptor. Returns true
    /// if the connection is no longer usable.
    pub fn handle_ready(&mut self, r: Readiness) -> bool {
        if r.error || r.hangup || r.invalid {
            debug!(device = %self.name, "connection dropped by peer");
            return true;
        }
        if r.writable {
            match self.connect_state {
                ConnectState::Connecting => {
                    return match self.transport.finish_connect() {
                        ConnectProgress::Established => {
                            self.on_connected();
                            false
                        }
                        ConnectProgress::Pending => false,
                        ConnectProgress::Failed => true,
                    };
                }
                ConnectState::Connected => {
                    if self.handle_write() {
                        return true;
                    }
                }
                ConnectState::NotConnected => {}
            }
        }
        if r.readable && self.connect_state == ConnectState::Connected && self.handle_read() {
            return true;
        }
        false
    }

    fn handle_write(&mut self) -> bool {
        match self.to.read_to(&mut *self.transport) {
            Ok(_) => {
                let _ = self.transport.flush();
                false
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => false,
            Err(e) => {
                warn!(device = %self.name, error = %e, "write failed");
                true
            }
        }
    }

    fn handle_read(&mut self) -> bool {
        match self.from.write_from(&mut *self.transport) {
            // zero bytes with room to spare is end of file
            Ok(0) => self.from.room() > 0,
            Ok(_) => {
                self.transport.preprocess(&mut self.from);
                false
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => false,
            Err(e) => {
                warn!(device = %self.name, error = %e, "read failed");
                true
            }
        }
    }

    /// Run the head action as far as it will go. Repeats for following
    /// actions as long as each completes; stops when one blocks on I/O,
    /// a timer, or the connection.
    pub fn process_actions(&mut self, timeout: &mut Option<Duration>, short_circuit: bool) {
        'queue: while let Some(mut act) = self.acts.pop_front() {
            let now = Instant::now();
            let started = *act.started.get_or_insert(now);

            if now.duration_since(started) >= self.timeout {
                let err = if self.connect_state != ConnectState::Connected {
                    ActError::ConnectTimeout
                } else if !self.logged_in {
                    ActError::LoginTimeout
                } else {
                    ActError::ExpectFail
                };
                if err == ActError::ConnectTimeout {
                    self.telemetry(&act, &format!("connect({}): timeout", self.name));
                } else {
                    let pending = self.from.as_slice().escape_ascii().to_string();
                    self.telemetry(&act, &format!("recv({}): '{}'", self.name, pending));
                }
                warn!(device = %self.name, kind = %act.kind, error = %err, "action timed out");
                self.fail_and_drain(act, err, timeout);
                continue 'queue;
            }

            if self.connect_state != ConnectState::Connected {
                let remaining = self.timeout - now.duration_since(started);
                update_timeout(timeout, remaining);
                self.acts.push_front(act);
                break 'queue;
            }

            loop {
                let depth = act.exec.len();
                let finished = self.process_stmt(&mut act, timeout, short_circuit);

                if act.err != ActError::Success {
                    let err = act.err;
                    warn!(device = %self.name, kind = %act.kind, error = %err, "action failed");
                    self.fail_and_drain(act, err, timeout);
                    continue 'queue;
                }
                if !finished {
                    let remaining = self
                        .timeout
                        .saturating_sub(Instant::now().duration_since(started));
                    update_timeout(timeout, remaining);
                    self.acts.push_front(act);
                    break 'queue;
                }
                if act.exec.len() == depth {
                    // statement ran to completion without entering a
                    // block; step past it and unwind exhausted frames
                    if let Some(top) = act.exec.last_mut() {
                        top.advance();
                    }
                    while act.exec.len() > 1
                        && act.exec.last().map(|e| e.exhausted()).unwrap_or(false)
                    {
                        act.exec.pop();
                    }
                    if act.exec.len() == 1 && act.exec[0].exhausted() {
                        match act.kind {
                            ScriptKind::Login => self.logged_in = true,
                            ScriptKind::Logout => self.logged_in = false,
                            _ => {}
                        }
                        self.stats.successful_actions += 1;
                        debug!(device = %self.name, kind = %act.kind, "action complete");
                        self.finish_action(act, ActError::Success);
                        continue 'queue;
                    }
                }
                // a pushed frame resumes here without advancing the
                // statement that entered it
            }
        }
    }

    /// Run the current statement. Returns false when the statement is
    /// waiting on I/O or a timer; a statement-level failure is recorded
    /// in `act.err`.
    fn process_stmt(
        &mut self,
        act: &mut Action,
        timeout: &mut Option<Duration>,
        short_circuit: bool,
    ) -> bool {
        let Some(stmt) = act.exec.last().and_then(|e| e.current()).cloned() else {
            return true;
        };
        match stmt {
            Stmt::Send { fmt } => self.process_send(act, &fmt),
            Stmt::Expect { pattern } => self.process_expect(act, &pattern),
            Stmt::SetPlugState {
                plug_name,
                plug_match,
                status_match,
                interps,
            } => self.process_setplugstate(act, plug_name, plug_match, status_match, &interps),
            Stmt::SetResult {
                plug_match,
                status_match,
                interps,
            } => self.process_setresult(act, plug_match, status_match, &interps),
            Stmt::Delay { duration } => self.process_delay(act, duration, timeout, short_circuit),
            Stmt::ForeachPlug { block } => self.process_foreach(act, block, false),
            Stmt::ForeachNode { block } => self.process_foreach(act, block, true),
            Stmt::IfOn { block } => self.process_ifonoff(act, block, PowerState::On),
            Stmt::IfOff { block } => self.process_ifonoff(act, block, PowerState::Off),
        }
    }

    fn process_send(&mut self, act: &mut Action, fmt: &str) -> bool {
        let already_sent = act.exec.last().map(|e| e.processing).unwrap_or(false);
        if !already_sent {
            let payload = match act.exec.last().and_then(|e| e.plugs.as_deref()) {
                Some([plug]) => fmt.replace("%s", &plug.name),
                Some(plugs) if !plugs.is_empty() => {
                    let names: NodeSet = plugs.iter().map(|p| p.name.as_str()).collect();
                    fmt.replace("%s", &names.ranged())
                }
                _ => fmt.to_string(),
            };
            let (_, dropped) = self.to.write(payload.as_bytes());
            if dropped > 0 {
                warn!(device = %self.name, dropped, "outbound buffer overflow");
            }
            self.telemetry(
                act,
                &format!(
                    "send({}): '{}'",
                    self.name,
                    payload.as_bytes().escape_ascii()
                ),
            );
            if let Some(top) = act.exec.last_mut() {
                top.processing = true;
            }
        }
        // finished only once the transport has drained the bytes
        self.to.is_empty()
    }

    fn process_expect(&mut self, act: &mut Action, pattern: &regex::bytes::Regex) -> bool {
        self.matches.recycle();
        match self.matches.exec(pattern, self.from.as_slice()) {
            Some(end) => {
                let seen = self.from.as_slice()[..end].escape_ascii().to_string();
                self.telemetry(act, &format!("recv({}): '{}'", self.name, seen));
                self.from.consume(end);
                true
            }
            None => false,
        }
    }

    fn process_setplugstate(
        &mut self,
        act: &mut Action,
        plug_name: Option<String>,
        plug_match: Option<usize>,
        status_match: usize,
        interps: &[StateInterp],
    ) -> bool {
        // name resolution: literal, then capture, then the context plug;
        // an unresolvable reference is a no-op rather than a failure so
        // one odd status line cannot kill a whole query
        let name = plug_name
            .or_else(|| plug_match.and_then(|p| self.matches.sub_string(p)))
            .or_else(|| {
                act.exec
                    .last()
                    .and_then(|e| e.plugs.as_deref())
                    .and_then(|ps| ps.first())
                    .map(|p| p.name.clone())
            });
        let Some(name) = name else {
            return true;
        };
        let Some(status) = self.matches.sub_string(status_match) else {
            return true;
        };
        let Some(node) = self.plugs.find(&name).and_then(|p| p.node.clone()) else {
            return true;
        };
        let state = interps
            .iter()
            .find(|i| i.pattern.is_match(status.as_bytes()))
            .map(|i| i.state)
            .unwrap_or(PowerState::Unknown);
        debug!(device = %self.name, node = %node, %state, "plug state");
        if let Some(args) = &act.args {
            args.update(&node, |arg| {
                arg.state = state;
                arg.val = Some(status.clone());
            });
        }
        true
    }

    fn process_setresult(
        &mut self,
        act: &mut Action,
        plug_match: Option<usize>,
        status_match: usize,
        interps: &[ResultInterp],
    ) -> bool {
        let name = plug_match
            .and_then(|p| self.matches.sub_string(p))
            .or_else(|| {
                act.exec
                    .last()
                    .and_then(|e| e.plugs.as_deref())
                    .and_then(|ps| ps.first())
                    .map(|p| p.name.clone())
            });
        let Some(name) = name else {
            return true;
        };
        let Some(status) = self.matches.sub_string(status_match) else {
            return true;
        };
        let Some(node) = self.plugs.find(&name).and_then(|p| p.node.clone()) else {
            return true;
        };
        let result = interps
            .iter()
            .find(|i| i.pattern.is_match(status.as_bytes()))
            .map(|i| i.result)
            .unwrap_or_default();
        debug!(device = %self.name, node = %node, ?result, "command result");
        if let Some(args) = &act.args {
            args.update(&node, |arg| {
                arg.result = result;
                arg.val = Some(status.clone());
            });
        }
        true
    }

    fn process_delay(
        &mut self,
        act: &mut Action,
        duration: Duration,
        timeout: &mut Option<Duration>,
        short_circuit: bool,
    ) -> bool {
        let now = Instant::now();
        let start = match act.delay_start {
            Some(s) => s,
            None => {
                self.telemetry(
                    act,
                    &format!("delay({}): {}ms", self.name, duration.as_millis()),
                );
                act.delay_start = Some(now);
                now
            }
        };
        if short_circuit {
            act.delay_start = None;
            return true;
        }
        let elapsed = now.duration_since(start);
        if elapsed >= duration {
            act.delay_start = None;
            true
        } else {
            update_timeout(timeout, duration - elapsed);
            false
        }
    }

    fn process_foreach(&mut self, act: &mut Action, block: Script, nodes_only: bool) -> bool {
        let mut i = act.exec.last().and_then(|e| e.plug_iter).unwrap_or(0);
        let mut found = None;
        while let Some(plug) = self.plugs.get(i) {
            i += 1;
            if nodes_only && plug.node.is_none() {
                continue;
            }
            found = Some(plug.clone());
            break;
        }
        if let Some(top) = act.exec.last_mut() {
            // None rearms the loop in case this frame is rewound
            top.plug_iter = found.is_some().then_some(i);
        }
        if let Some(plug) = found {
            act.exec.push(ExecCtx::new(block, Some(vec![plug])));
        }
        true
    }

    fn process_ifonoff(&mut self, act: &mut Action, block: Script, want: PowerState) -> bool {
        // second visit, after the block ran
        if act.exec.last().map(|e| e.processing).unwrap_or(false) {
            if let Some(top) = act.exec.last_mut() {
                top.processing = false;
            }
            return true;
        }
        let state = act
            .exec
            .last()
            .and_then(|e| e.plugs.as_deref())
            .and_then(|ps| ps.first())
            .and_then(|p| p.node.as_deref())
            .and_then(|node| act.args.as_ref().and_then(|a| a.get(node)))
            .map(|arg| arg.state);
        let Some(state) = state else {
            act.err = ActError::ExpectFail;
            return true;
        };
        if state == PowerState::Unknown {
            // conditional power sequencing on an unknown state is unsafe
            act.err = ActError::ExpectFail;
            return true;
        }
        if state == want {
            let plugs = act.exec.last().and_then(|e| e.plugs.clone());
            if let Some(top) = act.exec.last_mut() {
                top.processing = true;
            }
            act.exec.push(ExecCtx::new(block, plugs));
        }
        true
    }

    /// Report a failed head action, drain everything behind it, and
    /// recycle the connection
    fn fail_and_drain(&mut self, act: Action, err: ActError, timeout: &mut Option<Duration>) {
        self.finish_action(act, err);
        // an expect failure poisons only this device session; other
        // errors describe conditions that apply to the whole queue
        let cascade = if err == ActError::ExpectFail {
            ActError::Aborted
        } else {
            err
        };
        while let Some(queued) = self.acts.pop_front() {
            self.finish_action(queued, cascade);
        }
        if self.connect_state == ConnectState::Connected {
            self.disconnect();
            self.reconnect(timeout);
        }
    }

    fn finish_action(&mut self, act: Action, err: ActError) {
        if let Some(obs) = &act.observer {
            let message = match err {
                ActError::Success => None,
                e => Some(format!("{}: {}", self.name, e)),
            };
            obs.completed(ActionOutcome {
                client_id: act.client_id,
                error: err,
                message,
            });
        }
    }

    fn telemetry(&self, act: &Action, msg: &str) {
        debug!("{msg}");
        if let Some(obs) = &act.observer {
            obs.telemetry(act.client_id, msg);
        }
    }
}

impl std::fmt::Debug for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Device")
            .field("name", &self.name)
            .field("specname", &self.specname)
            .field("connect_state", &self.connect_state)
            .field("logged_in", &self.logged_in)
            .field("queued", &self.acts.len())
            .finish()
    }
}
