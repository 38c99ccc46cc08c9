//! Native camera backend. Desktop builds have no QR camera pipeline, so the
//! device list is always empty and codes are entered by hand.

use super::device::{CameraDevice, ScanDevice};
use super::error::ScanError;

pub struct Camera;

impl Camera {
    pub fn new(_element_id: &str) -> Self {
        Self
    }
}

impl ScanDevice for Camera {
    async fn list_devices(&self) -> Result<Vec<CameraDevice>, ScanError> {
        Ok(Vec::new())
    }

    async fn start(
        &self,
        camera: &CameraDevice,
        _on_decode: Box<dyn FnMut(String)>,
    ) -> Result<(), ScanError> {
        Err(ScanError::DeviceStartFailure(format!(
            "camera {} is not supported on this platform",
            camera.id
        )))
    }

    async fn stop(&self) -> Result<(), ScanError> {
        Ok(())
    }

    fn clear(&self) {}
}
