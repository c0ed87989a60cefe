//! Device manager
//!
//! Owns every device and fans client requests out across them. One
//! request usually touches several devices; the manager queues an
//! action on each relevant device and returns the count so the caller
//! knows how many completions to wait for.

use crate::action::ActionObserver;
use crate::arglist::ArgList;
use crate::device::{ConnectState, Device};
use crate::error::{EngineError, Result};
use crate::poll::{Interest, PollEvents};
use std::sync::Arc;
use std::time::Duration;
use switchboard_common::NodeSet;
use switchboard_script::ScriptKind;
use tracing::debug;

pub struct DeviceManager {
    devices: Vec<Device>,
    /// Skip delay statements; used by diagnostic dry runs
    short_circuit_delay: bool,
}

impl Default for DeviceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceManager {
    pub fn new() -> Self {
        Self {
            devices: Vec::new(),
            short_circuit_delay: false,
        }
    }

    pub fn with_short_circuit_delay(mut self, enable: bool) -> Self {
        self.short_circuit_delay = enable;
        self
    }

    pub fn add(&mut self, dev: Device) -> Result<()> {
        if self.devices.iter().any(|d| d.name() == dev.name()) {
            return Err(EngineError::DuplicateDevice(dev.name().to_string()));
        }
        debug!(device = %dev.name(), "registered");
        self.devices.push(dev);
        Ok(())
    }

    pub fn find(&self, name: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.name() == name)
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// Kick off the first connection attempt on every device
    pub fn initial_connect(&mut self) {
        for dev in &mut self.devices {
            dev.connect();
        }
    }

    /// True if every node in `targets` is reachable through some device
    /// that can run `kind`
    pub fn supports(&self, kind: ScriptKind, targets: &NodeSet) -> bool {
        targets
            .iter()
            .all(|node| self.devices.iter().any(|d| d.has_node(node) && d.can_run(kind)))
    }

    /// Queue `kind` on every device it applies to. Targeted kinds need
    /// `targets`; untargeted kinds (ping, logout) go to every device
    /// implementing them. Returns the number of actions queued.
    pub fn enqueue(
        &mut self,
        kind: ScriptKind,
        targets: Option<&NodeSet>,
        observer: Option<Arc<dyn ActionObserver>>,
        client_id: u64,
        args: Option<&ArgList>,
    ) -> usize {
        let mut total = 0;
        for dev in &mut self.devices {
            let count = if kind.is_targeted() {
                let Some(targets) = targets else {
                    break;
                };
                if !dev.covers_any(targets) {
                    continue;
                }
                dev.enqueue_targeted(kind, targets, observer.clone(), client_id, args)
            } else {
                dev.enqueue_device_wide(kind, observer.clone(), client_id)
            };
            if count > 0 {
                total += count;
                // fresh client work on a dead device should not sit out
                // a long backoff earned by earlier failures
                if dev.connect_state() != ConnectState::Connected {
                    dev.reset_retry();
                }
            }
        }
        debug!(%kind, actions = total, "enqueued");
        total
    }

    /// Descriptor interests for the next poll
    pub fn pre_poll(&self) -> Vec<Interest> {
        self.devices.iter().filter_map(|d| d.interest()).collect()
    }

    /// Apply poll results and run every device as far as it will go.
    /// `timeout` is tightened to the earliest pending deadline across
    /// all devices (action timeouts, delays, backoff, pings).
    pub fn post_poll(&mut self, events: &PollEvents, timeout: &mut Option<Duration>) {
        for dev in &mut self.devices {
            let mut ioerr = false;
            if let Some(fd) = dev.fd() {
                let readiness = events.get(fd);
                if readiness.any() {
                    ioerr = dev.handle_ready(readiness);
                }
            }
            if ioerr {
                dev.disconnect();
            }
            if dev.connect_state() == ConnectState::NotConnected {
                dev.reconnect(timeout);
            }
            if dev.connect_state() == ConnectState::Connected {
                dev.enqueue_ping(timeout);
            }
            dev.process_actions(timeout, self.short_circuit_delay);
        }
    }
}
