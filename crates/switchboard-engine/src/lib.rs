//! Switchboard engine
//!
//! The action-execution core of a power-control daemon. Each physical
//! device (serial PDU, telnet relay box, coprocess, BMC) gets a
//! [`Device`] that interprets per-operation scripts against a live,
//! possibly flaky connection: one action at a time per device, strict
//! FIFO, with timeouts, reconnect backoff, and cascading abort when a
//! script fails mid-protocol.
//!
//! The surrounding event loop is not part of this crate. It calls
//! [`DeviceManager::pre_poll`] to learn which descriptors to watch,
//! blocks in poll/select, then calls [`DeviceManager::post_poll`] with
//! the readiness results; everything else (I/O shuffling, statement
//! interpretation, reconnects, ping scheduling) happens synchronously
//! inside that call. Transports are supplied by the caller through the
//! [`Transport`] trait.
//!
//! # Example
//!
//! ```no_run
//! use switchboard_engine::{ArgList, Device, DeviceManager, PollEvents};
//! use switchboard_common::NodeSet;
//! use switchboard_script::ScriptKind;
//!
//! # fn example(dev: Device) -> switchboard_engine::Result<()> {
//! let mut mgr = DeviceManager::new();
//! mgr.add(dev)?;
//! mgr.initial_connect();
//!
//! let targets = NodeSet::parse("node[1-4]").unwrap();
//! let args = ArgList::new(&targets);
//! let count = mgr.enqueue(ScriptKind::PowerOn, Some(&targets), None, 0, Some(&args));
//! assert!(count > 0);
//!
//! // event loop (elided): poll pre_poll() interests, then:
//! let mut next_wake = None;
//! mgr.post_poll(&PollEvents::new(), &mut next_wake);
//! # Ok(())
//! # }
//! ```

pub mod action;
pub mod arglist;
pub mod buffer;
pub mod device;
pub mod error;
pub mod exec;
pub mod manager;
pub mod plug;
pub mod poll;
pub mod transport;

#[cfg(test)]
mod testutil;

pub use action::{ActError, Action, ActionObserver, ActionOutcome};
pub use arglist::{Arg, ArgList};
pub use buffer::IoBuffer;
pub use device::{ConnectState, Device, DeviceStats};
pub use error::{EngineError, Result};
pub use exec::ExecCtx;
pub use manager::DeviceManager;
pub use plug::{Plug, PlugError, PlugList};
pub use poll::{Interest, PollEvents, Readiness};
pub use transport::{ConnectProgress, Transport};
