//! Vendor identification from Bluetooth SIG company identifiers carried in
//! advertisement manufacturer data.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Common company identifiers mapped to vendor names
/// This is a subset of the Bluetooth SIG assigned-numbers registry
static COMPANY_DATABASE: Lazy<HashMap<u16, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();

    m.insert(0x0002, "Intel");
    m.insert(0x0006, "Microsoft");
    m.insert(0x000A, "Cambridge Silicon Radio");
    m.insert(0x000F, "Broadcom");
    m.insert(0x001D, "Qualcomm");
    m.insert(0x004C, "Apple");
    m.insert(0x0059, "Nordic Semiconductor");
    m.insert(0x006B, "Polar Electro");
    m.insert(0x0075, "Samsung Electronics");
    m.insert(0x0087, "Garmin");
    m.insert(0x009E, "Bose");
    m.insert(0x00C4, "LG Electronics");
    m.insert(0x00E0, "Google");
    m.insert(0x012D, "Sony");
    m.insert(0x0131, "Cypress Semiconductor");
    m.insert(0x0157, "Anhui Huami");
    m.insert(0x0171, "Amazon.com Services");
    m.insert(0x02E5, "Espressif");
    m.insert(0x038F, "Xiaomi");
    m.insert(0x0499, "Ruuvi Innovations");

    m
});

/// Look up the vendor name for a company identifier
pub fn lookup_company(company_id: u16) -> Option<&'static str> {
    COMPANY_DATABASE.get(&company_id).copied()
}

/// Display label for an optional company identifier: vendor name when known,
/// the raw identifier in hex when not, a dash when absent
pub fn company_label(company_id: Option<u16>) -> String {
    match company_id {
        Some(id) => lookup_company(id)
            .map(|name| name.to_string())
            .unwrap_or_else(|| format!("0x{:04X}", id)),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_company() {
        assert_eq!(lookup_company(0x004C), Some("Apple"));
        assert_eq!(lookup_company(0x0059), Some("Nordic Semiconductor"));
    }

    #[test]
    fn test_lookup_unknown_company() {
        assert_eq!(lookup_company(0xFFFE), None);
    }

    #[test]
    fn test_company_label() {
        assert_eq!(company_label(Some(0x0006)), "Microsoft");
        assert_eq!(company_label(Some(0xFFFE)), "0xFFFE");
        assert_eq!(company_label(None), "-");
    }
}
