//! Capability checks for the platform services scanning depends on.
//!
//! Mirrors the mobile permission flow: check what is already granted, request
//! the rest once, and give up for the session on denial. Desktop hosts have
//! no runtime permission dialog, so the system gate answers from what the
//! Bluetooth stack actually exposes and `request` is a re-check.

use btleplug::api::Manager as _;
use btleplug::platform::Manager;
use log::debug;
use std::fmt;

/// Capabilities required before scanning may start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Location,
    BluetoothScan,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Location => write!(f, "location"),
            Capability::BluetoothScan => write!(f, "bluetooth-scan"),
        }
    }
}

/// One granted/denied result per requested capability.
#[derive(Debug, Clone)]
pub struct Grant {
    pub capability: Capability,
    pub granted: bool,
}

/// Seam over the host's permission surface.
pub trait CapabilityGate {
    /// Whether a capability is already granted.
    fn check(&self, capability: Capability) -> bool;

    /// Request a set of capabilities, yielding one result per capability.
    fn request(&mut self, capabilities: &[Capability]) -> Vec<Grant>;
}

/// Gate backed by the host Bluetooth stack.
pub struct SystemGate {
    adapter_present: bool,
}

impl SystemGate {
    /// Probe the host once; the answer holds for the session.
    pub async fn probe() -> Self {
        let adapter_present = match Manager::new().await {
            Ok(manager) => match manager.adapters().await {
                Ok(adapters) => !adapters.is_empty(),
                Err(e) => {
                    debug!("Adapter enumeration failed: {}", e);
                    false
                }
            },
            Err(e) => {
                debug!("Bluetooth manager unavailable: {}", e);
                false
            }
        };

        SystemGate { adapter_present }
    }
}

impl CapabilityGate for SystemGate {
    fn check(&self, capability: Capability) -> bool {
        match capability {
            Capability::Location => true,
            Capability::BluetoothScan => self.adapter_present,
        }
    }

    fn request(&mut self, capabilities: &[Capability]) -> Vec<Grant> {
        capabilities
            .iter()
            .map(|&capability| Grant {
                capability,
                granted: self.check(capability),
            })
            .collect()
    }
}

/// Gate with predetermined answers, for exercising the denial path.
#[derive(Debug, Clone, Default)]
pub struct FixedGate {
    granted: Vec<Capability>,
}

impl FixedGate {
    pub fn allow_all() -> Self {
        FixedGate {
            granted: vec![Capability::Location, Capability::BluetoothScan],
        }
    }

    pub fn deny_all() -> Self {
        FixedGate::default()
    }

    pub fn with_grants(granted: Vec<Capability>) -> Self {
        FixedGate { granted }
    }
}

impl CapabilityGate for FixedGate {
    fn check(&self, capability: Capability) -> bool {
        self.granted.contains(&capability)
    }

    fn request(&mut self, capabilities: &[Capability]) -> Vec<Grant> {
        capabilities
            .iter()
            .map(|&capability| Grant {
                capability,
                granted: self.check(capability),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_gate_denies_everything_by_default() {
        let mut gate = FixedGate::deny_all();
        assert!(!gate.check(Capability::Location));
        assert!(!gate.check(Capability::BluetoothScan));

        let grants = gate.request(&[Capability::Location, Capability::BluetoothScan]);
        assert_eq!(grants.len(), 2);
        assert!(grants.iter().all(|g| !g.granted));
    }

    #[test]
    fn test_fixed_gate_partial_grants() {
        let mut gate = FixedGate::with_grants(vec![Capability::Location]);
        let grants = gate.request(&[Capability::Location, Capability::BluetoothScan]);

        assert!(grants[0].granted);
        assert!(!grants[1].granted);
    }
}
