use thiserror::Error;

use crate::permissions::Capability;

/// Errors surfaced by the scanning stack. Both variants are terminal for the
/// current session: a notice is shown and scanning does not restart.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("required capabilities denied: {0:?}")]
    PermissionDenied(Vec<Capability>),

    #[error("no Bluetooth adapter available")]
    AdapterUnavailable,

    #[error("scan failed: {0}")]
    ScanFailed(String),
}

impl From<btleplug::Error> for ScanError {
    fn from(err: btleplug::Error) -> Self {
        match err {
            btleplug::Error::PermissionDenied => {
                ScanError::PermissionDenied(vec![Capability::BluetoothScan])
            }
            other => ScanError::ScanFailed(other.to_string()),
        }
    }
}
