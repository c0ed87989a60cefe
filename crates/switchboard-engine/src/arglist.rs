//! Shared per-node result accumulators
//!
//! A query that fans out across several devices needs one place to
//! collect per-node answers. An [`ArgList`] holds exactly one slot per
//! requested node; every action spawned for the query clones the handle
//! and writes through it as its script interprets device output. When
//! the last action completes the caller reads the accumulated states.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use switchboard_common::{CmdResult, NodeSet, PowerState};

/// Accumulated answer for one node
#[derive(Debug, Clone)]
pub struct Arg {
    pub node: String,
    /// Raw status text as the device reported it
    pub val: Option<String>,
    pub state: PowerState,
    pub result: CmdResult,
}

#[derive(Debug)]
struct Inner {
    order: Vec<String>,
    args: HashMap<String, Arg>,
}

/// Shared, clonable handle to the per-node slots of one request
#[derive(Debug, Clone)]
pub struct ArgList(Arc<Mutex<Inner>>);

impl ArgList {
    /// One slot per node, initialized to unknown
    pub fn new(nodes: &NodeSet) -> Self {
        let mut order = Vec::new();
        let mut args = HashMap::new();
        for node in nodes.iter() {
            order.push(node.to_string());
            args.insert(
                node.to_string(),
                Arg {
                    node: node.to_string(),
                    val: None,
                    state: PowerState::Unknown,
                    result: CmdResult::Unknown,
                },
            );
        }
        Self(Arc::new(Mutex::new(Inner { order, args })))
    }

    /// Mutate the slot for `node`, if the request includes it
    pub fn update(&self, node: &str, f: impl FnOnce(&mut Arg)) {
        if let Ok(mut inner) = self.0.lock() {
            if let Some(arg) = inner.args.get_mut(node) {
                f(arg);
            }
        }
    }

    /// Snapshot of the slot for `node`
    pub fn get(&self, node: &str) -> Option<Arg> {
        self.0.lock().ok()?.args.get(node).cloned()
    }

    /// Snapshot of every slot, in request order
    pub fn snapshot(&self) -> Vec<Arg> {
        match self.0.lock() {
            Ok(inner) => inner
                .order
                .iter()
                .filter_map(|n| inner.args.get(n).cloned())
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.0.lock().map(|i| i.order.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_slot_per_node() {
        let args = ArgList::new(&NodeSet::parse("n[1-3]").unwrap());
        assert_eq!(args.len(), 3);
        let snap = args.snapshot();
        assert_eq!(snap[0].node, "n1");
        assert_eq!(snap[0].state, PowerState::Unknown);
    }

    #[test]
    fn test_clones_share_slots() {
        let args = ArgList::new(&NodeSet::parse("n1,n2").unwrap());
        let other = args.clone();
        other.update("n1", |a| {
            a.state = PowerState::On;
            a.val = Some("ON".into());
        });
        let arg = args.get("n1").unwrap();
        assert_eq!(arg.state, PowerState::On);
        assert_eq!(arg.val.as_deref(), Some("ON"));
    }

    #[test]
    fn test_update_unknown_node_ignored() {
        let args = ArgList::new(&NodeSet::parse("n1").unwrap());
        args.update("n9", |a| a.state = PowerState::On);
        assert!(args.get("n9").is_none());
        assert_eq!(args.get("n1").unwrap().state, PowerState::Unknown);
    }
}
