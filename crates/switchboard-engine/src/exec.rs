//! Execution contexts
//!
//! An action runs as a stack of execution contexts. The bottom frame
//! walks the script itself; each `foreachplug`/`foreachnode`/`ifon`/
//! `ifoff` entered pushes a frame for its block, scoped to the plugs it
//! targets. Only the topmost frame's cursor moves.

use crate::plug::Plug;
use std::sync::Arc;
use switchboard_script::{Script, Stmt};

/// One frame of an action's execution stack
#[derive(Debug, Clone)]
pub struct ExecCtx {
    block: Script,
    pos: usize,
    /// Plugs this frame targets; `None` means the whole device
    pub plugs: Option<Vec<Arc<Plug>>>,
    /// Cursor for a foreach loop running at this frame
    pub plug_iter: Option<usize>,
    /// Statement-local "already started" flag (send flushing, delay
    /// timing, conditional block entered)
    pub processing: bool,
}

impl ExecCtx {
    pub fn new(block: Script, plugs: Option<Vec<Arc<Plug>>>) -> Self {
        Self {
            block,
            pos: 0,
            plugs,
            plug_iter: None,
            processing: false,
        }
    }

    /// The statement the cursor points at
    pub fn current(&self) -> Option<&Stmt> {
        self.block.get(self.pos)
    }

    /// Step past the current statement, clearing per-statement state
    pub fn advance(&mut self) {
        self.pos += 1;
        self.processing = false;
    }

    pub fn exhausted(&self) -> bool {
        self.pos >= self.block.len()
    }

    /// Reset the frame to the top of its block
    pub fn rewind(&mut self) {
        self.pos = 0;
        self.processing = false;
        self.plug_iter = None;
    }
}
