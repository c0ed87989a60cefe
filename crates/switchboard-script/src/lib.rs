//! Switchboard script model
//!
//! Power-control devices speak ad-hoc textual protocols. Rather than
//! hard-coding each vendor's dialect, the engine interprets small
//! per-device scripts: ordered lists of send/expect/delay/conditional
//! statements compiled once at configuration time and executed against
//! a live connection.
//!
//! This crate holds the passive half of that design: the closed
//! [`ScriptKind`] enumeration (one slot per operation a device may
//! implement, including `_ranged` and `_all` variants), the [`Stmt`]
//! tagged union with nested owned blocks, and the [`MatchCache`] that
//! runs compiled regexes over raw inbound bytes and retains capture
//! groups for later `$N`-style back-references.
//!
//! Nothing here performs I/O; the engine crate drives these values.

pub mod error;
pub mod kind;
pub mod matchcache;
pub mod stmt;

pub use error::{Result, ScriptError};
pub use kind::{ScriptKind, ScriptTable};
pub use matchcache::MatchCache;
pub use stmt::{ResultInterp, Script, StateInterp, Stmt};
