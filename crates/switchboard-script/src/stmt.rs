//! Script statements
//!
//! Statements are parsed once at configuration time and are read-only
//! at runtime; only execution-context cursors move through them.
//! Blocks (`foreachplug`/`foreachnode`/`ifon`/`ifoff`) own their child
//! statement lists, so a script is a tree of values with no shared
//! mutable state.

use crate::error::{Result, ScriptError};
use crate::matchcache::MAX_MATCH_POS;
use regex::bytes::Regex;
use std::sync::Arc;
use std::time::Duration;
use switchboard_common::{CmdResult, PowerState};

/// An immutable, cheaply clonable list of statements.
///
/// Nested blocks hold their own `Script`, and execution contexts hold a
/// clone of the block they are walking, so sharing is by refcount
/// rather than by borrow.
#[derive(Debug, Clone)]
pub struct Script {
    stmts: Arc<Vec<Stmt>>,
}

impl Script {
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Self {
            stmts: Arc::new(stmts),
        }
    }

    pub fn get(&self, index: usize) -> Option<&Stmt> {
        self.stmts.get(index)
    }

    pub fn len(&self) -> usize {
        self.stmts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }
}

/// One rule mapping device status text onto a power state
#[derive(Debug, Clone)]
pub struct StateInterp {
    pub pattern: Regex,
    pub state: PowerState,
}

impl StateInterp {
    pub fn new(pattern: &str, state: PowerState) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            state,
        })
    }
}

/// One rule mapping device acknowledgement text onto a command result
#[derive(Debug, Clone)]
pub struct ResultInterp {
    pub pattern: Regex,
    pub result: CmdResult,
}

impl ResultInterp {
    pub fn new(pattern: &str, result: CmdResult) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            result,
        })
    }
}

/// One script statement
#[derive(Debug, Clone)]
pub enum Stmt {
    /// Write formatted bytes to the device. A `%s` placeholder is
    /// replaced with the context's plug name (or a sorted ranged list
    /// when the context targets more than one plug).
    Send { fmt: String },

    /// Match a regex against the inbound buffer; consumes exactly the
    /// bytes through the end of the match on success.
    Expect { pattern: Regex },

    /// Interpret status text from the previous expect's captures and
    /// record a plug's power state.
    SetPlugState {
        /// Literal plug name; when absent, `plug_match` then the
        /// context's target plug are tried in order.
        plug_name: Option<String>,
        /// Capture position of the plug name in the previous expect
        plug_match: Option<usize>,
        /// Capture position of the status text in the previous expect
        status_match: usize,
        /// Ordered interpretation rules; first match wins
        interps: Vec<StateInterp>,
    },

    /// Interpret per-plug acknowledgement text from the previous
    /// expect's captures and record a command result.
    SetResult {
        plug_match: Option<usize>,
        status_match: usize,
        interps: Vec<ResultInterp>,
    },

    /// Pause the script at this point
    Delay { duration: Duration },

    /// Run the block once per plug on the device
    ForeachPlug { block: Script },

    /// Run the block once per plug that has an associated node
    ForeachNode { block: Script },

    /// Run the block if the target plug was interpreted as on
    IfOn { block: Script },

    /// Run the block if the target plug was interpreted as off
    IfOff { block: Script },
}

impl Stmt {
    pub fn send(fmt: impl Into<String>) -> Stmt {
        Stmt::Send { fmt: fmt.into() }
    }

    pub fn expect(pattern: &str) -> Result<Stmt> {
        Ok(Stmt::Expect {
            pattern: Regex::new(pattern)?,
        })
    }

    pub fn set_plug_state(
        plug_name: Option<&str>,
        plug_match: Option<usize>,
        status_match: usize,
        interps: Vec<StateInterp>,
    ) -> Result<Stmt> {
        check_capture_pos(plug_match)?;
        check_capture_pos(Some(status_match))?;
        Ok(Stmt::SetPlugState {
            plug_name: plug_name.map(str::to_string),
            plug_match,
            status_match,
            interps,
        })
    }

    pub fn set_result(
        plug_match: Option<usize>,
        status_match: usize,
        interps: Vec<ResultInterp>,
    ) -> Result<Stmt> {
        check_capture_pos(plug_match)?;
        check_capture_pos(Some(status_match))?;
        Ok(Stmt::SetResult {
            plug_match,
            status_match,
            interps,
        })
    }

    pub fn delay(duration: Duration) -> Stmt {
        Stmt::Delay { duration }
    }

    pub fn foreach_plug(block: Vec<Stmt>) -> Stmt {
        Stmt::ForeachPlug {
            block: Script::new(block),
        }
    }

    pub fn foreach_node(block: Vec<Stmt>) -> Stmt {
        Stmt::ForeachNode {
            block: Script::new(block),
        }
    }

    pub fn if_on(block: Vec<Stmt>) -> Stmt {
        Stmt::IfOn {
            block: Script::new(block),
        }
    }

    pub fn if_off(block: Vec<Stmt>) -> Stmt {
        Stmt::IfOff {
            block: Script::new(block),
        }
    }
}

fn check_capture_pos(pos: Option<usize>) -> Result<()> {
    match pos {
        Some(p) if p > MAX_MATCH_POS => Err(ScriptError::BadCapturePos(p, MAX_MATCH_POS)),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expect_bad_regex() {
        assert!(matches!(
            Stmt::expect("(unclosed"),
            Err(ScriptError::BadRegex(_))
        ));
    }

    #[test]
    fn test_capture_pos_limit() {
        let interps = vec![StateInterp::new("^ON$", PowerState::On).unwrap()];
        assert!(Stmt::set_plug_state(None, Some(21), 1, interps.clone()).is_err());
        assert!(Stmt::set_plug_state(None, Some(1), 2, interps).is_ok());
    }

    #[test]
    fn test_script_sharing() {
        let script = Script::new(vec![Stmt::send("x"), Stmt::send("y")]);
        let clone = script.clone();
        assert_eq!(clone.len(), 2);
        assert!(matches!(clone.get(0), Some(Stmt::Send { .. })));
        assert!(clone.get(2).is_none());
    }

    #[test]
    fn test_nested_block_ownership() {
        let stmt = Stmt::foreach_node(vec![Stmt::send("query %s\n")]);
        let Stmt::ForeachNode { block } = stmt else {
            panic!("wrong variant");
        };
        assert_eq!(block.len(), 1);
    }
}
