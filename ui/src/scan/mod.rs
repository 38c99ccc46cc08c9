//! Scan pipeline: camera → decoded text → query → fetched payload.

pub mod device;
pub mod error;
pub mod fetch;
pub mod payload;
pub mod session;

#[cfg(target_arch = "wasm32")]
mod html5;
#[cfg(target_arch = "wasm32")]
pub use html5::Camera;

#[cfg(not(target_arch = "wasm32"))]
mod headless;
#[cfg(not(target_arch = "wasm32"))]
pub use headless::Camera;

mod view;
pub use view::ScanView;

pub use error::ScanError;
pub use payload::ScanQuery;
pub use session::{ScanPhase, ScanSession};
