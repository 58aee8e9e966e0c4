//! Scan orchestration: permission flow, optional Wi-Fi refresh, continuous
//! BLE scanning. Events stream to a single consumer over an mpsc channel.

use anyhow::Result;
use log::{error, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::ble::{Advertisement, BleRadio};
use crate::config::Config;
use crate::error::ScanError;
use crate::permissions::{Capability, CapabilityGate};
use crate::wifi::{NetworkObservation, WifiScanner};

/// Capabilities that must be granted before any scanning starts.
pub const REQUIRED_CAPABILITIES: [Capability; 2] =
    [Capability::Location, Capability::BluetoothScan];

/// Events sent from the scan engine to the display loop
#[derive(Debug, Clone)]
pub enum ScanEvent {
    Advertisement(Advertisement),
    WifiResults(Vec<NetworkObservation>),
    ScanStarted,
    ScanStopped,
    PermissionDenied(Vec<Capability>),
    ScanFailed(String),
}

/// Drives one scanning session. Two states only: awaiting permission, then
/// scanning until the running flag clears. A denial or platform failure ends
/// the session; there is no retry.
pub struct ScanEngine<G: CapabilityGate> {
    config: Config,
    gate: G,
    running: Arc<AtomicBool>,
}

impl<G: CapabilityGate> ScanEngine<G> {
    pub fn new(config: Config, gate: G, running: Arc<AtomicBool>) -> Self {
        ScanEngine {
            config,
            gate,
            running,
        }
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub async fn run(&mut self, events: mpsc::Sender<ScanEvent>) -> Result<()> {
        self.running.store(true, Ordering::SeqCst);

        let missing: Vec<Capability> = REQUIRED_CAPABILITIES
            .iter()
            .copied()
            .filter(|&capability| !self.gate.check(capability))
            .collect();

        if !missing.is_empty() {
            info!("Requesting capabilities: {:?}", missing);
            let denied: Vec<Capability> = self
                .gate
                .request(&missing)
                .into_iter()
                .filter(|grant| !grant.granted)
                .map(|grant| grant.capability)
                .collect();

            if !denied.is_empty() {
                warn!("Capabilities denied: {:?}", denied);
                let _ = events.send(ScanEvent::PermissionDenied(denied)).await;
                return Ok(());
            }
        }

        if self.config.wifi.enabled {
            self.refresh_wifi(&events).await;
        }

        let radio = match BleRadio::acquire(self.config.scan.adapter.as_deref()).await {
            Ok(radio) => radio,
            Err(e) => {
                self.report_failure(&events, e).await;
                return Ok(());
            }
        };

        info!("Scanning on {}", radio.describe().await);
        let _ = events.send(ScanEvent::ScanStarted).await;

        if let Err(e) = radio.run(events.clone(), self.running.clone()).await {
            self.report_failure(&events, e).await;
        }

        let _ = events.send(ScanEvent::ScanStopped).await;
        Ok(())
    }

    async fn refresh_wifi(&self, events: &mpsc::Sender<ScanEvent>) {
        let scanner = WifiScanner::new(self.config.wifi.interface.clone());

        if let Err(e) = scanner.trigger() {
            warn!("Wi-Fi rescan failed: {}", e);
        }

        match scanner.results() {
            Ok(networks) => {
                let _ = events.send(ScanEvent::WifiResults(networks)).await;
            }
            Err(e) => warn!("Wi-Fi listing failed: {}", e),
        }
    }

    async fn report_failure(&self, events: &mpsc::Sender<ScanEvent>, error: ScanError) {
        error!("Scan aborted: {}", error);
        let event = match error {
            ScanError::PermissionDenied(capabilities) => ScanEvent::PermissionDenied(capabilities),
            other => ScanEvent::ScanFailed(other.to_string()),
        };
        let _ = events.send(event).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::FixedGate;

    #[tokio::test]
    async fn test_denial_never_starts_scanning() {
        let (tx, mut rx) = mpsc::channel(16);
        let running = Arc::new(AtomicBool::new(false));
        let mut engine = ScanEngine::new(Config::default(), FixedGate::deny_all(), running);

        engine.run(tx).await.unwrap();

        let mut saw_denied = false;
        while let Some(event) = rx.recv().await {
            match event {
                ScanEvent::PermissionDenied(denied) => {
                    saw_denied = true;
                    assert!(denied.contains(&Capability::Location));
                    assert!(denied.contains(&Capability::BluetoothScan));
                }
                ScanEvent::ScanStarted | ScanEvent::Advertisement(_) => {
                    panic!("scanning must not start after a denial")
                }
                _ => {}
            }
        }
        assert!(saw_denied);
    }

    #[tokio::test]
    async fn test_partial_denial_reports_only_missing() {
        let (tx, mut rx) = mpsc::channel(16);
        let running = Arc::new(AtomicBool::new(false));
        let gate = FixedGate::with_grants(vec![Capability::Location]);
        let mut engine = ScanEngine::new(Config::default(), gate, running);

        engine.run(tx).await.unwrap();

        while let Some(event) = rx.recv().await {
            if let ScanEvent::PermissionDenied(denied) = event {
                assert_eq!(denied, vec![Capability::BluetoothScan]);
                return;
            }
        }
        panic!("expected a denial event");
    }
}
