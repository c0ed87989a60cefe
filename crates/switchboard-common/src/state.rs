//! Interpreted device states

/// Interpreted power state of a plug, as reported by a device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PowerState {
    /// Plug is powered on
    On,
    /// Plug is powered off
    Off,
    /// Power state could not be interpreted
    #[default]
    Unknown,
}

impl std::fmt::Display for PowerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PowerState::On => write!(f, "on"),
            PowerState::Off => write!(f, "off"),
            PowerState::Unknown => write!(f, "unknown"),
        }
    }
}

/// Interpreted per-node outcome of a command, as reported by a device.
///
/// Some device protocols acknowledge each plug operation individually;
/// a `setresult` script statement maps that acknowledgement text onto
/// this type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CmdResult {
    /// Device acknowledged the operation
    Success,
    /// No acknowledgement was interpreted
    #[default]
    Unknown,
}

impl std::fmt::Display for CmdResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CmdResult::Success => write!(f, "success"),
            CmdResult::Unknown => write!(f, "unknown"),
        }
    }
}
