//! Switchboard common types
//!
//! Leaf types shared by the script and engine crates: power state
//! interpretations and the `NodeSet` ordered node-name collection with
//! ranged-string compression (e.g. `node[1-3,5]`).

pub mod nodeset;
pub mod state;

pub use nodeset::{NodeSet, NodeSetError};
pub use state::{CmdResult, PowerState};
