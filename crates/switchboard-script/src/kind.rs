//! Script kinds and the per-device script table

use crate::stmt::Script;
use std::collections::HashMap;

/// The closed set of operations a device script may implement.
///
/// `*Ranged` variants address an explicit plug subset in one device
/// round-trip; `*All` variants address every plug. A device is free to
/// implement any subset of these; dispatch falls back between tiers
/// (see the engine crate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptKind {
    Login,
    Logout,
    StatusPlugs,
    StatusPlugsAll,
    Ping,
    PowerOn,
    PowerOnRanged,
    PowerOnAll,
    PowerOff,
    PowerOffRanged,
    PowerOffAll,
    PowerCycle,
    PowerCycleRanged,
    PowerCycleAll,
    Reset,
    ResetRanged,
    ResetAll,
    StatusTemp,
    StatusTempAll,
    StatusBeacon,
    StatusBeaconAll,
    BeaconOn,
    BeaconOnRanged,
    BeaconOff,
    BeaconOffRanged,
    Resolve,
}

impl ScriptKind {
    /// The `_all` variant of this kind, if one exists
    pub fn all_variant(self) -> Option<ScriptKind> {
        use ScriptKind::*;
        match self {
            PowerOn => Some(PowerOnAll),
            PowerOff => Some(PowerOffAll),
            PowerCycle => Some(PowerCycleAll),
            Reset => Some(ResetAll),
            StatusPlugs => Some(StatusPlugsAll),
            StatusTemp => Some(StatusTempAll),
            StatusBeacon => Some(StatusBeaconAll),
            _ => None,
        }
    }

    /// The `_ranged` variant of this kind, if one exists
    pub fn ranged_variant(self) -> Option<ScriptKind> {
        use ScriptKind::*;
        match self {
            PowerOn => Some(PowerOnRanged),
            PowerOff => Some(PowerOffRanged),
            PowerCycle => Some(PowerCycleRanged),
            Reset => Some(ResetRanged),
            BeaconOn => Some(BeaconOnRanged),
            BeaconOff => Some(BeaconOffRanged),
            _ => None,
        }
    }

    /// Query kinds may use an `_all` script even when only a subset of
    /// nodes was requested; over-reading status is harmless while
    /// over-switching power is not.
    pub fn is_query(self) -> bool {
        use ScriptKind::*;
        matches!(
            self,
            StatusPlugs | StatusPlugsAll | StatusTemp | StatusTempAll | StatusBeacon
                | StatusBeaconAll
        )
    }

    /// Kinds that carry a target node list (as opposed to device-wide
    /// operations like login/logout/ping)
    pub fn is_targeted(self) -> bool {
        use ScriptKind::*;
        !matches!(self, Login | Logout | Ping)
    }
}

impl std::fmt::Display for ScriptKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ScriptKind::Login => "login",
            ScriptKind::Logout => "logout",
            ScriptKind::StatusPlugs => "status",
            ScriptKind::StatusPlugsAll => "status_all",
            ScriptKind::Ping => "ping",
            ScriptKind::PowerOn => "on",
            ScriptKind::PowerOnRanged => "on_ranged",
            ScriptKind::PowerOnAll => "on_all",
            ScriptKind::PowerOff => "off",
            ScriptKind::PowerOffRanged => "off_ranged",
            ScriptKind::PowerOffAll => "off_all",
            ScriptKind::PowerCycle => "cycle",
            ScriptKind::PowerCycleRanged => "cycle_ranged",
            ScriptKind::PowerCycleAll => "cycle_all",
            ScriptKind::Reset => "reset",
            ScriptKind::ResetRanged => "reset_ranged",
            ScriptKind::ResetAll => "reset_all",
            ScriptKind::StatusTemp => "status_temp",
            ScriptKind::StatusTempAll => "status_temp_all",
            ScriptKind::StatusBeacon => "status_beacon",
            ScriptKind::StatusBeaconAll => "status_beacon_all",
            ScriptKind::BeaconOn => "beacon_on",
            ScriptKind::BeaconOnRanged => "beacon_on_ranged",
            ScriptKind::BeaconOff => "beacon_off",
            ScriptKind::BeaconOffRanged => "beacon_off_ranged",
            ScriptKind::Resolve => "resolve",
        };
        write!(f, "{s}")
    }
}

/// The scripts a single device implements, indexed by kind.
///
/// Absent entries are legal; dispatch treats a missing script as "this
/// device does not implement that operation".
#[derive(Debug, Clone, Default)]
pub struct ScriptTable {
    scripts: HashMap<ScriptKind, Script>,
}

impl ScriptTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a script for a kind, replacing any previous entry
    pub fn insert(&mut self, kind: ScriptKind, script: Script) {
        self.scripts.insert(kind, script);
    }

    /// Look up the script for a kind
    pub fn get(&self, kind: ScriptKind) -> Option<&Script> {
        self.scripts.get(&kind)
    }

    /// True if a script is registered for `kind`
    pub fn implements(&self, kind: ScriptKind) -> bool {
        self.scripts.contains_key(&kind)
    }
}
