use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::config::{Config, DistanceConfig};
use crate::scanner::ScanEvent;
use crate::wifi::NetworkObservation;
use crate::window::{DeviceObservation, ObservationWindow};

/// How long a transient notice stays on screen
const NOTICE_TTL: Duration = Duration::from_secs(5);

/// Active panel for focus/navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivePanel {
    Networks,
    #[default]
    Devices,
}

/// Statistics snapshot
#[derive(Debug, Clone, Default)]
pub struct Stats {
    pub sightings: usize,
    pub sightings_per_minute: f64,
    pub visible_devices: usize,
    pub networks: usize,
    pub scan_duration_secs: u64,
}

/// Transient user-visible message (permission denial, scan failure)
#[derive(Debug, Clone)]
pub struct Notice {
    pub text: String,
    raised: Instant,
}

/// Main application state. Sole writer of the observation window: a window
/// update and the display swap happen as one step, so rendering only ever
/// sees a fully applied snapshot.
pub struct App {
    /// Whether the app is running
    pub running: bool,

    /// Currently active/focused panel
    pub active_panel: ActivePanel,

    /// Devices visible in the retention window, nearest first
    pub devices: Vec<DeviceObservation>,

    /// Networks from the latest Wi-Fi refresh
    pub networks: Vec<NetworkObservation>,

    /// Whether Wi-Fi scanning is enabled in config (drives placeholder text)
    pub wifi_enabled: bool,

    /// Currently selected device index
    pub selected_device: usize,

    /// Network list scroll offset
    pub network_scroll: usize,

    /// Transient notice, if any
    pub notice: Option<Notice>,

    /// Scan status
    pub scan_active: bool,

    /// Help overlay visible
    pub show_help: bool,

    /// Statistics
    pub stats: Stats,

    /// Event receiver
    pub event_rx: mpsc::Receiver<ScanEvent>,

    window: ObservationWindow,
    distance: DistanceConfig,
    started: Instant,
}

impl App {
    pub fn new(event_rx: mpsc::Receiver<ScanEvent>, config: &Config) -> Self {
        App {
            running: true,
            active_panel: ActivePanel::Devices,
            devices: Vec::new(),
            networks: Vec::new(),
            wifi_enabled: config.wifi.enabled,
            selected_device: 0,
            network_scroll: 0,
            notice: None,
            scan_active: false,
            show_help: false,
            stats: Stats::default(),
            event_rx,
            window: ObservationWindow::new(Duration::from_millis(config.scan.retention_ms)),
            distance: config.distance.clone(),
            started: Instant::now(),
        }
    }

    pub fn handle_event(&mut self, event: ScanEvent) {
        match event {
            ScanEvent::Advertisement(adv) => {
                self.stats.sightings += 1;

                let observation = DeviceObservation::from_advertisement(&adv, &self.distance);
                self.devices = self.window.observe(observation, Instant::now());
                self.stats.visible_devices = self.devices.len();

                if self.selected_device >= self.devices.len() {
                    self.selected_device = self.devices.len().saturating_sub(1);
                }
            }
            ScanEvent::WifiResults(networks) => {
                self.stats.networks = networks.len();
                self.networks = networks;
                self.network_scroll = 0;
            }
            ScanEvent::ScanStarted => {
                // A session starts from an empty window
                self.window.clear();
                self.devices.clear();
                self.stats.visible_devices = 0;
                self.scan_active = true;
            }
            ScanEvent::ScanStopped => {
                self.scan_active = false;
            }
            ScanEvent::PermissionDenied(_) => {
                self.scan_active = false;
                self.raise_notice("Permissions required to scan networks");
            }
            ScanEvent::ScanFailed(code) => {
                self.scan_active = false;
                self.raise_notice(&format!("Bluetooth scan failed: {}", code));
            }
        }
    }

    pub fn tick(&mut self) {
        let elapsed = self.started.elapsed();
        self.stats.scan_duration_secs = elapsed.as_secs();

        if elapsed.as_secs() > 0 {
            self.stats.sightings_per_minute =
                self.stats.sightings as f64 / (elapsed.as_secs_f64() / 60.0);
        }

        if let Some(notice) = &self.notice {
            if notice.raised.elapsed() > NOTICE_TTL {
                self.notice = None;
            }
        }
    }

    fn raise_notice(&mut self, text: &str) {
        self.notice = Some(Notice {
            text: text.to_string(),
            raised: Instant::now(),
        });
    }

    pub fn next_panel(&mut self) {
        self.active_panel = match self.active_panel {
            ActivePanel::Networks => ActivePanel::Devices,
            ActivePanel::Devices => ActivePanel::Networks,
        };
    }

    pub fn prev_panel(&mut self) {
        self.next_panel(); // Only 2 panels, same as next
    }

    pub fn scroll_up(&mut self) {
        match self.active_panel {
            ActivePanel::Networks => {
                self.network_scroll = self.network_scroll.saturating_sub(1);
            }
            ActivePanel::Devices => {
                if self.selected_device > 0 {
                    self.selected_device -= 1;
                }
            }
        }
    }

    pub fn scroll_down(&mut self) {
        match self.active_panel {
            ActivePanel::Networks => {
                if self.network_scroll < self.networks.len().saturating_sub(1) {
                    self.network_scroll += 1;
                }
            }
            ActivePanel::Devices => {
                if self.selected_device < self.devices.len().saturating_sub(1) {
                    self.selected_device += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ble::Advertisement;
    use crate::permissions::Capability;

    fn advertisement(address: &str, rssi_dbm: i32) -> Advertisement {
        Advertisement {
            address: address.to_string(),
            name: None,
            rssi_dbm,
            tx_power_dbm: None,
            company_id: None,
        }
    }

    fn app() -> App {
        let (_tx, rx) = mpsc::channel(1);
        App::new(rx, &Config::default())
    }

    #[test]
    fn test_denial_leaves_device_list_empty() {
        let mut app = app();

        app.handle_event(ScanEvent::PermissionDenied(vec![
            Capability::Location,
            Capability::BluetoothScan,
        ]));

        assert!(app.devices.is_empty());
        assert!(!app.scan_active);
        let notice = app.notice.expect("denial must raise a notice");
        assert_eq!(notice.text, "Permissions required to scan networks");
    }

    #[test]
    fn test_advertisements_dedup_and_sort_nearest_first() {
        let mut app = app();

        // Weaker signal first, then a closer device, then the first again
        app.handle_event(ScanEvent::Advertisement(advertisement("AA:BB", -80)));
        app.handle_event(ScanEvent::Advertisement(advertisement("CC:DD", -59)));
        app.handle_event(ScanEvent::Advertisement(advertisement("AA:BB", -75)));

        assert_eq!(app.devices.len(), 2);
        assert_eq!(app.devices[0].address, "CC:DD");
        assert_eq!(app.devices[1].address, "AA:BB");
        assert!(app.devices[0].distance_m < app.devices[1].distance_m);
        assert_eq!(app.stats.sightings, 3);
        assert_eq!(app.stats.visible_devices, 2);
    }

    #[test]
    fn test_scan_failure_raises_notice_and_stops() {
        let mut app = app();
        app.handle_event(ScanEvent::ScanStarted);
        assert!(app.scan_active);

        app.handle_event(ScanEvent::ScanFailed("code 2".to_string()));

        assert!(!app.scan_active);
        assert!(app.notice.is_some());
    }
}
