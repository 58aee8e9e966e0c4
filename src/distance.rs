/// Distance estimation from RSSI signal strength
///
/// Uses the Log-Distance Path Loss Model:
/// distance = 10 ^ ((reference - rssi) / (10 * n))
///
/// Where:
/// - reference: signal strength measured at 1 meter from the transmitter (dBm)
/// - rssi: measured signal strength (dBm)
/// - n: path loss exponent (environment dependent)

/// Reference signal strength assumed when an advertisement carries no
/// calibrated power level (dBm at 1 meter).
pub const DEFAULT_REFERENCE_RSSI_DBM: i32 = -59;

/// Free-space path loss exponent.
pub const FREE_SPACE_PATH_LOSS: f64 = 2.0;

/// Estimate distance in meters from RSSI
///
/// # Arguments
/// * `rssi_dbm` - Received signal strength in dBm
/// * `reference_rssi_dbm` - Reference signal at 1 meter (dBm)
/// * `path_loss_exponent` - Environment factor (2.0=free space, 3.0=indoor, 4.0=dense obstacles)
///
/// # Returns
/// Estimated distance in meters. Total over all integer inputs: exactly 1.0
/// when `rssi_dbm == reference_rssi_dbm`, growing without bound as the signal
/// weakens.
pub fn estimate_distance(rssi_dbm: i32, reference_rssi_dbm: i32, path_loss_exponent: f64) -> f64 {
    let exponent = f64::from(reference_rssi_dbm - rssi_dbm) / (10.0 * path_loss_exponent);
    10.0_f64.powf(exponent)
}

/// Get a human-readable distance category
pub fn distance_category(distance_m: f64) -> &'static str {
    match distance_m {
        d if d < 1.0 => "immediate (<1m)",
        d if d < 3.0 => "very close (1-3m)",
        d if d < 10.0 => "close (3-10m)",
        d if d < 20.0 => "nearby (10-20m)",
        d if d < 40.0 => "far (20-40m)",
        _ => "very far (>40m)",
    }
}

/// Format distance for display
pub fn format_distance(distance_m: f64) -> String {
    if distance_m < 10.0 {
        format!("{:.1}m", distance_m)
    } else {
        format!("{:.0}m", distance_m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_signal_is_one_meter() {
        // At the reference signal strength the estimate is exactly 1 meter,
        // regardless of where the reference sits
        for reference in [-80, -59, -45, 0, 40] {
            let d = estimate_distance(reference, reference, FREE_SPACE_PATH_LOSS);
            assert_eq!(d, 1.0);
        }
    }

    #[test]
    fn test_weaker_signal_is_farther() {
        // Strictly decreasing as the measured signal strengthens
        let mut previous = f64::INFINITY;
        for rssi in (-100..=-20).step_by(5) {
            let d = estimate_distance(rssi, DEFAULT_REFERENCE_RSSI_DBM, FREE_SPACE_PATH_LOSS);
            assert!(d < previous, "distance must shrink as RSSI rises: {} dBm", rssi);
            previous = d;
        }
    }

    #[test]
    fn test_known_values() {
        let d = estimate_distance(-59, -59, FREE_SPACE_PATH_LOSS);
        assert_eq!(d, 1.0);

        // 10 dBm below reference at n=2.0 is 10^(10/20) meters
        let d = estimate_distance(-69, -59, FREE_SPACE_PATH_LOSS);
        assert!((d - 10.0_f64.powf(0.5)).abs() < 1e-9);
        assert!((d - 3.1623).abs() < 1e-3);
    }

    #[test]
    fn test_extreme_inputs_stay_defined() {
        // No clamping: stronger-than-reference signals land under a meter,
        // absurdly weak ones get huge but well-defined estimates
        let near = estimate_distance(-30, -59, FREE_SPACE_PATH_LOSS);
        assert!(near > 0.0 && near < 1.0);

        let far = estimate_distance(-250, -59, FREE_SPACE_PATH_LOSS);
        assert!(far > 1e5);
    }

    #[test]
    fn test_distance_category() {
        assert_eq!(distance_category(0.5), "immediate (<1m)");
        assert_eq!(distance_category(2.0), "very close (1-3m)");
        assert_eq!(distance_category(5.0), "close (3-10m)");
        assert_eq!(distance_category(15.0), "nearby (10-20m)");
        assert_eq!(distance_category(30.0), "far (20-40m)");
        assert_eq!(distance_category(50.0), "very far (>40m)");
    }
}
