//! Compile-time configuration. Nothing here is user-facing at runtime.

/// Base URL of the data endpoint; `FSQC_API_BASE` overrides it at build time.
pub const API_BASE_URL: &str = match option_env!("FSQC_API_BASE") {
    Some(base) => base,
    None => "https://sisccltd.com/QRWebApp",
};

/// DOM id of the element the QR library renders the camera preview into.
pub const READER_ELEMENT_ID: &str = "reader";

pub const SCAN_FPS: u32 = 10;

/// Edge length (px) of the square scan box.
pub const SCAN_BOX: u32 = 250;
