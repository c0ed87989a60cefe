//! Plugs and the per-device plug list
//!
//! A plug is one controllable outlet (or blade, or BMC target) on a
//! device. Plugs are created at configuration time, either hardwired
//! from the device definition or added as nodes are mapped onto them,
//! and each may carry the name of the node attached to it. A plug with
//! no node is a live outlet nobody cares about: scripts still see it,
//! but it never satisfies a node-targeted request.

use std::collections::HashMap;
use std::sync::Arc;
use switchboard_common::NodeSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlugError {
    /// Named plug does not exist on a hardwired device
    #[error("unknown plug: {0}")]
    UnknownPlug(String),

    /// Plug name appears more than once in a mapping
    #[error("duplicate plug: {0}")]
    DuplicatePlug(String),

    /// A mapping supplied fewer plugs than nodes
    #[error("more nodes than plugs in mapping")]
    NoPlugs,

    /// A mapping supplied fewer nodes than plugs
    #[error("more plugs than nodes in mapping")]
    NoNodes,
}

/// One outlet on a device
#[derive(Debug, Clone)]
pub struct Plug {
    pub name: String,
    /// Node attached to this plug, if any
    pub node: Option<String>,
    /// Enclosing plug in a chassis hierarchy, if any
    pub parent: Option<String>,
    /// Named auxiliary addresses for this plug (sensor paths etc.)
    pub paths: HashMap<String, String>,
}

impl Plug {
    fn new(name: impl Into<String>, node: Option<String>) -> Self {
        Self {
            name: name.into(),
            node,
            parent: None,
            paths: HashMap::new(),
        }
    }
}

/// The ordered plug list of one device.
///
/// Order is significant: foreach iteration and ranged sends follow it.
#[derive(Debug, Clone, Default)]
pub struct PlugList {
    plugs: Vec<Arc<Plug>>,
    hardwired: bool,
}

impl PlugList {
    /// An empty list that grows as nodes are mapped
    pub fn new() -> Self {
        Self::default()
    }

    /// A fixed list from the device definition; mappings may only bind
    /// nodes to these names
    pub fn hardwired<S: AsRef<str>>(names: impl IntoIterator<Item = S>) -> Self {
        Self {
            plugs: names
                .into_iter()
                .map(|n| Arc::new(Plug::new(n.as_ref(), None)))
                .collect(),
            hardwired: true,
        }
    }

    /// Bind nodes to plugs.
    ///
    /// With explicit `plugnames` the two lists pair up positionally and
    /// must be the same length. Without them, a hardwired device binds
    /// nodes to its plugs in order, and a soft device creates one plug
    /// per node named after the node.
    pub fn map(
        &mut self,
        nodes: &NodeSet,
        plugnames: Option<&NodeSet>,
    ) -> Result<(), PlugError> {
        match plugnames {
            Some(pnames) => {
                let nodes: Vec<_> = nodes.iter().collect();
                let pnames: Vec<_> = pnames.iter().collect();
                if pnames.len() < nodes.len() {
                    return Err(PlugError::NoPlugs);
                }
                if nodes.len() < pnames.len() {
                    return Err(PlugError::NoNodes);
                }
                for (node, pname) in nodes.iter().zip(pnames.iter()) {
                    self.bind(pname, node)?;
                }
            }
            None if self.hardwired => {
                let mut free = self.plugs.iter().position(|p| p.node.is_none());
                for node in nodes.iter() {
                    let Some(i) = free else {
                        return Err(PlugError::NoPlugs);
                    };
                    Arc::make_mut(&mut self.plugs[i]).node = Some(node.to_string());
                    free = self.plugs[i + 1..]
                        .iter()
                        .position(|p| p.node.is_none())
                        .map(|off| i + 1 + off);
                }
            }
            None => {
                for node in nodes.iter() {
                    if self.find_any(node).is_some() {
                        return Err(PlugError::DuplicatePlug(node.to_string()));
                    }
                    self.plugs
                        .push(Arc::new(Plug::new(node, Some(node.to_string()))));
                }
            }
        }
        Ok(())
    }

    fn bind(&mut self, pname: &str, node: &str) -> Result<(), PlugError> {
        if self.hardwired {
            let i = self
                .plugs
                .iter()
                .position(|p| p.name == pname)
                .ok_or_else(|| PlugError::UnknownPlug(pname.to_string()))?;
            if self.plugs[i].node.is_some() {
                return Err(PlugError::DuplicatePlug(pname.to_string()));
            }
            Arc::make_mut(&mut self.plugs[i]).node = Some(node.to_string());
        } else {
            if self.find_any(pname).is_some() {
                return Err(PlugError::DuplicatePlug(pname.to_string()));
            }
            self.plugs
                .push(Arc::new(Plug::new(pname, Some(node.to_string()))));
        }
        Ok(())
    }

    /// Find a plug by name; only plugs with an attached node are
    /// visible here, since callers are resolving script targets
    pub fn find(&self, name: &str) -> Option<&Arc<Plug>> {
        self.plugs
            .iter()
            .find(|p| p.name == name && p.node.is_some())
    }

    fn find_any(&self, name: &str) -> Option<&Arc<Plug>> {
        self.plugs.iter().find(|p| p.name == name)
    }

    pub fn get(&self, index: usize) -> Option<&Arc<Plug>> {
        self.plugs.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Plug>> {
        self.plugs.iter()
    }

    pub fn len(&self) -> usize {
        self.plugs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugs.is_empty()
    }

    /// Record that `child` sits inside `parent` in a chassis hierarchy
    pub fn set_parent(&mut self, child: &str, parent: &str) -> Result<(), PlugError> {
        if self.find_any(parent).is_none() {
            return Err(PlugError::UnknownPlug(parent.to_string()));
        }
        let i = self
            .plugs
            .iter()
            .position(|p| p.name == child)
            .ok_or_else(|| PlugError::UnknownPlug(child.to_string()))?;
        Arc::make_mut(&mut self.plugs[i]).parent = Some(parent.to_string());
        Ok(())
    }

    /// Attach a named auxiliary address to a plug
    pub fn set_path(
        &mut self,
        plug: &str,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), PlugError> {
        let i = self
            .plugs
            .iter()
            .position(|p| p.name == plug)
            .ok_or_else(|| PlugError::UnknownPlug(plug.to_string()))?;
        Arc::make_mut(&mut self.plugs[i])
            .paths
            .insert(key.into(), value.into());
        Ok(())
    }

    /// True if `name` sits anywhere below `ancestor` in the hierarchy
    pub fn is_descendant(&self, name: &str, ancestor: &str) -> bool {
        let mut cur = name;
        // hop count bound guards against a parent cycle
        for _ in 0..self.plugs.len() {
            let Some(plug) = self.find_any(cur) else {
                return false;
            };
            match plug.parent.as_deref() {
                Some(p) if p == ancestor => return true,
                Some(p) => cur = p,
                None => return false,
            }
        }
        false
    }

    /// Walk the hierarchy up from `name` to its topmost ancestor
    pub fn find_root_parent(&self, name: &str) -> Option<&Arc<Plug>> {
        let mut cur = self.find_any(name)?;
        for _ in 0..self.plugs.len() {
            match cur.parent.as_deref().and_then(|p| self.find_any(p)) {
                Some(parent) => cur = parent,
                None => return Some(cur),
            }
        }
        Some(cur)
    }
}
