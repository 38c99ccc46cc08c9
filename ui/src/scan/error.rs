use thiserror::Error;

/// Everything that can go wrong between opening the camera and holding a payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("Invalid QR code: expected 3 comma-separated values, found {parts}")]
    InvalidPayloadFormat { parts: usize },

    #[error("Invalid date in QR code: {0}")]
    InvalidDateFormat(String),

    #[error("No camera available: {0}")]
    DeviceUnavailable(String),

    #[error("Camera could not start: {0}")]
    DeviceStartFailure(String),

    #[error("Failed to fetch: {0}")]
    FetchFailure(String),

    #[error("Camera release failed: {0}")]
    DeviceReleaseFailure(String),
}

impl ScanError {
    /// Release failures are logged, never shown.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, Self::DeviceReleaseFailure(_))
    }

    /// True when the failure happened before any request was sent.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidPayloadFormat { .. } | Self::InvalidDateFormat(_)
        )
    }
}

impl From<reqwest::Error> for ScanError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::FetchFailure(format!("HTTP {status}")),
            None => Self::FetchFailure(err.to_string()),
        }
    }
}
