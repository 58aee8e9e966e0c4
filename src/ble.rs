//! Bluetooth LE scanning through the host adapter.
//!
//! The radio is acquired when scanning starts and released (scan stopped) on
//! every exit path, including consumer shutdown and platform failure.

use btleplug::api::{Central, CentralEvent, Manager as _, Peripheral as _, ScanFilter};
use btleplug::platform::{Adapter, Manager, PeripheralId};
use futures::stream::StreamExt;
use log::{debug, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::error::ScanError;
use crate::scanner::ScanEvent;

/// How often the scan loop re-checks the shutdown flag while idle
const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// One decoded advertisement, as delivered by the platform scan service.
#[derive(Debug, Clone)]
pub struct Advertisement {
    pub address: String,
    pub name: Option<String>,
    pub rssi_dbm: i32,
    /// Calibrated power at 1 meter, when the advertisement carries one
    pub tx_power_dbm: Option<i32>,
    /// First company identifier from manufacturer data, when present
    pub company_id: Option<u16>,
}

pub struct BleRadio {
    adapter: Adapter,
}

impl BleRadio {
    /// Acquire a Bluetooth adapter: the one whose name contains `preferred`,
    /// or the first available.
    pub async fn acquire(preferred: Option<&str>) -> Result<Self, ScanError> {
        let manager = Manager::new().await?;
        let adapters = manager.adapters().await?;

        let adapter = match preferred {
            Some(name) => {
                let mut chosen = None;
                for adapter in adapters {
                    let info = adapter.adapter_info().await.unwrap_or_default();
                    if info.contains(name) {
                        chosen = Some(adapter);
                        break;
                    }
                }
                chosen.ok_or(ScanError::AdapterUnavailable)?
            }
            None => adapters
                .into_iter()
                .next()
                .ok_or(ScanError::AdapterUnavailable)?,
        };

        Ok(BleRadio { adapter })
    }

    pub async fn describe(&self) -> String {
        self.adapter
            .adapter_info()
            .await
            .unwrap_or_else(|_| "unknown adapter".to_string())
    }

    /// Scan continuously, forwarding one advertisement per detection, until
    /// the running flag clears or the consumer goes away. The scan is
    /// stopped before returning.
    pub async fn run(
        &self,
        events: mpsc::Sender<ScanEvent>,
        running: Arc<AtomicBool>,
    ) -> Result<(), ScanError> {
        let mut stream = self.adapter.events().await?;
        self.adapter.start_scan(ScanFilter::default()).await?;
        debug!("BLE scan started on {}", self.describe().await);

        while running.load(Ordering::SeqCst) {
            match tokio::time::timeout(SHUTDOWN_POLL_INTERVAL, stream.next()).await {
                Err(_) => continue,
                Ok(None) => break,
                Ok(Some(event)) => {
                    let id = match event {
                        CentralEvent::DeviceDiscovered(id) | CentralEvent::DeviceUpdated(id) => id,
                        _ => continue,
                    };

                    if let Some(adv) = self.advertisement(&id).await {
                        if events.send(ScanEvent::Advertisement(adv)).await.is_err() {
                            break;
                        }
                    }
                }
            }
        }

        if let Err(e) = self.adapter.stop_scan().await {
            warn!("Failed to stop BLE scan: {}", e);
        }
        debug!("BLE scan stopped");

        Ok(())
    }

    /// Resolve a detection to an advertisement. Detections without an RSSI
    /// reading carry nothing to estimate from and are skipped.
    async fn advertisement(&self, id: &PeripheralId) -> Option<Advertisement> {
        let peripheral = self.adapter.peripheral(id).await.ok()?;
        let props = peripheral.properties().await.ok()??;
        let rssi = props.rssi?;

        Some(Advertisement {
            address: props.address.to_string(),
            name: props.local_name,
            rssi_dbm: i32::from(rssi),
            tx_power_dbm: props.tx_power_level.map(i32::from),
            company_id: props.manufacturer_data.keys().next().copied(),
        })
    }
}

/// List the names of all Bluetooth adapters on this host.
pub async fn list_adapters() -> Result<Vec<String>, ScanError> {
    let manager = Manager::new().await?;
    let adapters = manager.adapters().await?;

    let mut names = Vec::with_capacity(adapters.len());
    for adapter in adapters {
        names.push(
            adapter
                .adapter_info()
                .await
                .unwrap_or_else(|_| "unknown adapter".to_string()),
        );
    }

    Ok(names)
}
