//! Wi-Fi network listing via NetworkManager.
//!
//! Wired up but not triggered in the default flow; the engine only calls in
//! here when `wifi.enabled` is set.

use anyhow::{Context, Result};
use log::debug;
use macaddr::MacAddr6;
use std::process::Command;

/// One visible network from the latest scan. Replaced wholesale on refresh.
#[derive(Debug, Clone)]
pub struct NetworkObservation {
    pub ssid: String,
    pub bssid: Option<MacAddr6>,
    pub signal_dbm: i32,
}

pub struct WifiScanner {
    interface: Option<String>,
}

impl WifiScanner {
    pub fn new(interface: Option<String>) -> Self {
        WifiScanner { interface }
    }

    /// Ask NetworkManager to rescan.
    pub fn trigger(&self) -> Result<()> {
        let mut args = vec!["dev", "wifi", "rescan"];
        if let Some(iface) = &self.interface {
            args.push("ifname");
            args.push(iface);
        }

        let output = Command::new("nmcli")
            .args(&args)
            .output()
            .context("Failed to execute nmcli")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("nmcli rescan failed: {}", stderr);
        }

        Ok(())
    }

    /// Retrieve the current list of visible networks.
    pub fn results(&self) -> Result<Vec<NetworkObservation>> {
        let mut args = vec!["-t", "-f", "SSID,BSSID,SIGNAL", "dev", "wifi", "list"];
        if let Some(iface) = &self.interface {
            args.push("ifname");
            args.push(iface);
        }

        let output = Command::new("nmcli")
            .args(&args)
            .output()
            .context("Failed to execute nmcli")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("nmcli list failed: {}", stderr);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let networks: Vec<NetworkObservation> =
            stdout.lines().filter_map(parse_network_line).collect();

        debug!("Wi-Fi scan returned {} networks", networks.len());
        Ok(networks)
    }
}

/// Parse one line of `nmcli -t -f SSID,BSSID,SIGNAL dev wifi list` output.
fn parse_network_line(line: &str) -> Option<NetworkObservation> {
    let fields = split_terse(line);
    if fields.len() < 3 {
        return None;
    }

    // NetworkManager reports signal as a 0-100 percentage derived from
    // 2 * (dbm + 100); invert to recover dBm
    let percent: i32 = fields[2].trim().parse().ok()?;
    let signal_dbm = percent / 2 - 100;

    Some(NetworkObservation {
        ssid: fields[0].clone(),
        bssid: fields[1].parse::<MacAddr6>().ok(),
        signal_dbm,
    })
}

/// Split nmcli terse output on unescaped colons, unescaping `\:` and `\\`.
fn split_terse(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            ':' => fields.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }
    fields.push(current);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_terse_unescapes_colons() {
        let fields = split_terse(r"HomeNet:AA\:BB\:CC\:DD\:EE\:FF:83");
        assert_eq!(fields, vec!["HomeNet", "AA:BB:CC:DD:EE:FF", "83"]);
    }

    #[test]
    fn test_split_terse_ssid_with_colon() {
        let fields = split_terse(r"cafe\: guest:AA\:BB\:CC\:DD\:EE\:FF:54");
        assert_eq!(fields[0], "cafe: guest");
        assert_eq!(fields.len(), 3);
    }

    #[test]
    fn test_parse_network_line() {
        let network = parse_network_line(r"HomeNet:AA\:BB\:CC\:DD\:EE\:FF:83").unwrap();
        assert_eq!(network.ssid, "HomeNet");
        assert_eq!(
            network.bssid,
            Some("AA:BB:CC:DD:EE:FF".parse::<MacAddr6>().unwrap())
        );
        // 83% maps back to -59 dBm
        assert_eq!(network.signal_dbm, -59);
    }

    #[test]
    fn test_parse_network_line_hidden_ssid() {
        let network = parse_network_line(r":AA\:BB\:CC\:DD\:EE\:FF:100").unwrap();
        assert_eq!(network.ssid, "");
        assert_eq!(network.signal_dbm, -50);
    }

    #[test]
    fn test_parse_network_line_rejects_garbage() {
        assert!(parse_network_line("").is_none());
        assert!(parse_network_line("just-a-name").is_none());
        assert!(parse_network_line(r"net:AA\:BB\:CC\:DD\:EE\:FF:strong").is_none());
    }
}
