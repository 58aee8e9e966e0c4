//! Time-windowed cache of recently sighted Bluetooth devices.
//!
//! Advertisements arrive once per detection with no ordering guarantee, so
//! each sighting replaces whatever was known about that address and anything
//! not heard from within the retention window drops out. The window has a
//! single writer: whoever owns it applies one sighting at a time and shows
//! the returned snapshot.

use std::cmp::Ordering;
use std::time::{Duration, Instant};

use crate::ble::Advertisement;
use crate::config::DistanceConfig;
use crate::distance::estimate_distance;

/// One fully-resolved sighting of a Bluetooth device. Never mutated; a newer
/// observation of the same address supersedes it.
#[derive(Debug, Clone)]
pub struct DeviceObservation {
    /// Opaque device address as reported by the platform
    pub address: String,
    /// Advertised local name, if any
    pub name: Option<String>,
    /// Measured signal strength (dBm)
    pub rssi_dbm: i32,
    /// Calibrated power at 1 meter from the advertisement, if present
    pub reference_rssi_dbm: Option<i32>,
    /// Bluetooth SIG company identifier from manufacturer data, if present
    pub company_id: Option<u16>,
    /// Estimated distance in meters
    pub distance_m: f64,
}

impl DeviceObservation {
    pub fn from_advertisement(adv: &Advertisement, distance: &DistanceConfig) -> Self {
        let reference = adv.tx_power_dbm.unwrap_or(distance.reference_rssi_dbm);
        let distance_m = estimate_distance(adv.rssi_dbm, reference, distance.path_loss_exponent);

        DeviceObservation {
            address: adv.address.clone(),
            name: adv.name.clone(),
            rssi_dbm: adv.rssi_dbm,
            reference_rssi_dbm: adv.tx_power_dbm,
            company_id: adv.company_id,
            distance_m,
        }
    }
}

/// Recently sighted devices, at most one entry per address, none older than
/// the retention window at the time of the last update.
#[derive(Debug)]
pub struct ObservationWindow {
    retention: Duration,
    entries: Vec<(Instant, DeviceObservation)>,
}

impl ObservationWindow {
    pub fn new(retention: Duration) -> Self {
        ObservationWindow {
            retention,
            entries: Vec::new(),
        }
    }

    /// Apply one sighting: drop the superseded entry for this address along
    /// with everything past the retention window, insert the new observation
    /// stamped `now`, and return the visible set nearest-first.
    pub fn observe(&mut self, observation: DeviceObservation, now: Instant) -> Vec<DeviceObservation> {
        self.entries.retain(|(seen, existing)| {
            existing.address != observation.address
                && now.saturating_duration_since(*seen) <= self.retention
        });
        self.entries.push((now, observation));
        self.snapshot()
    }

    /// Current observations sorted ascending by estimated distance; equal
    /// distances keep insertion order.
    fn snapshot(&self) -> Vec<DeviceObservation> {
        let mut visible: Vec<DeviceObservation> =
            self.entries.iter().map(|(_, obs)| obs.clone()).collect();
        visible.sort_by(|a, b| {
            a.distance_m
                .partial_cmp(&b.distance_m)
                .unwrap_or(Ordering::Equal)
        });
        visible
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation(address: &str, distance_m: f64) -> DeviceObservation {
        DeviceObservation {
            address: address.to_string(),
            name: None,
            rssi_dbm: -60,
            reference_rssi_dbm: None,
            company_id: None,
            distance_m,
        }
    }

    #[test]
    fn test_repeat_sighting_keeps_one_entry() {
        let mut window = ObservationWindow::new(Duration::from_millis(5000));
        let start = Instant::now();

        window.observe(observation("AA:BB", 2.0), start);
        let visible = window.observe(observation("AA:BB", 3.5), start + Duration::from_millis(100));

        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].address, "AA:BB");
        // The newer sighting wins
        assert_eq!(visible[0].distance_m, 3.5);
    }

    #[test]
    fn test_stale_entries_expire() {
        let mut window = ObservationWindow::new(Duration::from_millis(5000));
        let start = Instant::now();

        window.observe(observation("AA:BB", 1.0), start);
        let visible = window.observe(observation("CC:DD", 2.0), start + Duration::from_millis(6000));

        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].address, "CC:DD");
    }

    #[test]
    fn test_entry_at_retention_boundary_survives() {
        let mut window = ObservationWindow::new(Duration::from_millis(5000));
        let start = Instant::now();

        window.observe(observation("AA:BB", 1.0), start);
        let visible = window.observe(observation("CC:DD", 2.0), start + Duration::from_millis(5000));

        assert_eq!(visible.len(), 2);
    }

    #[test]
    fn test_snapshot_is_sorted_nearest_first() {
        let mut window = ObservationWindow::new(Duration::from_millis(5000));
        let start = Instant::now();

        window.observe(observation("AA:01", 3.0), start);
        window.observe(observation("AA:02", 1.0), start + Duration::from_millis(10));
        let visible = window.observe(observation("AA:03", 2.0), start + Duration::from_millis(20));

        let distances: Vec<f64> = visible.iter().map(|o| o.distance_m).collect();
        assert_eq!(distances, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_equal_distances_keep_insertion_order() {
        let mut window = ObservationWindow::new(Duration::from_millis(5000));
        let start = Instant::now();

        window.observe(observation("AA:01", 2.0), start);
        let visible = window.observe(observation("AA:02", 2.0), start + Duration::from_millis(10));

        assert_eq!(visible[0].address, "AA:01");
        assert_eq!(visible[1].address, "AA:02");
    }
}
