//! Camera access: the backend-neutral device contract, camera selection, and
//! the acquire/release sequence the scanner view runs.

use super::error::ScanError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    pub id: String,
    pub label: String,
}

impl CameraDevice {
    pub fn is_rear_facing(&self) -> bool {
        let label = self.label.to_lowercase();
        label.contains("rear") || label.contains("back")
    }
}

/// Rear/back camera when one is labelled as such, else the first listed.
pub fn pick_device(devices: &[CameraDevice]) -> Option<&CameraDevice> {
    devices
        .iter()
        .find(|device| device.is_rear_facing())
        .or_else(|| devices.first())
}

/// A QR-decoding camera backend.
#[allow(async_fn_in_trait)]
pub trait ScanDevice {
    async fn list_devices(&self) -> Result<Vec<CameraDevice>, ScanError>;

    /// Starts decoding from `camera`; `on_decode` may fire once per frame.
    async fn start(
        &self,
        camera: &CameraDevice,
        on_decode: Box<dyn FnMut(String)>,
    ) -> Result<(), ScanError>;

    async fn stop(&self) -> Result<(), ScanError>;

    fn clear(&self);
}

/// Lists cameras, picks one and starts decoding from it.
pub async fn acquire<D: ScanDevice>(
    device: &D,
    on_decode: Box<dyn FnMut(String)>,
) -> Result<CameraDevice, ScanError> {
    let devices = device.list_devices().await?;
    let Some(camera) = pick_device(&devices).cloned() else {
        return Err(ScanError::DeviceUnavailable("no camera found".into()));
    };

    tracing::info!(id = %camera.id, label = %camera.label, "starting camera");
    device.start(&camera, on_decode).await?;
    Ok(camera)
}

/// Best-effort stop + clear. Failures are logged and swallowed.
pub async fn release<D: ScanDevice>(device: &D) {
    match device.stop().await {
        Ok(()) => device.clear(),
        Err(err) => tracing::warn!(%err, "camera release failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    fn camera(id: &str, label: &str) -> CameraDevice {
        CameraDevice {
            id: id.into(),
            label: label.into(),
        }
    }

    #[test]
    fn rear_camera_is_preferred() {
        let devices = vec![
            camera("front", "Front Camera"),
            camera("wide", "Camera 2, facing BACK"),
            camera("rear", "Rear camera"),
        ];
        assert_eq!(pick_device(&devices).map(|d| d.id.as_str()), Some("wide"));
    }

    #[test]
    fn first_camera_is_the_fallback() {
        let devices = vec![camera("a", "Integrated Webcam"), camera("b", "USB")];
        assert_eq!(pick_device(&devices).map(|d| d.id.as_str()), Some("a"));
    }

    #[test]
    fn no_cameras_no_pick() {
        assert!(pick_device(&[]).is_none());
    }

    #[derive(Default)]
    struct FakeDevice {
        cameras: Vec<CameraDevice>,
        fail_start: bool,
        fail_stop: bool,
        started: RefCell<Option<String>>,
        cleared: Cell<bool>,
    }

    impl ScanDevice for FakeDevice {
        async fn list_devices(&self) -> Result<Vec<CameraDevice>, ScanError> {
            Ok(self.cameras.clone())
        }

        async fn start(
            &self,
            camera: &CameraDevice,
            _on_decode: Box<dyn FnMut(String)>,
        ) -> Result<(), ScanError> {
            if self.fail_start {
                return Err(ScanError::DeviceStartFailure("permission denied".into()));
            }
            self.started.replace(Some(camera.id.clone()));
            Ok(())
        }

        async fn stop(&self) -> Result<(), ScanError> {
            if self.fail_stop {
                Err(ScanError::DeviceReleaseFailure("not scanning".into()))
            } else {
                Ok(())
            }
        }

        fn clear(&self) {
            self.cleared.set(true);
        }
    }

    #[test]
    fn acquire_starts_the_preferred_camera() {
        let device = FakeDevice {
            cameras: vec![camera("f", "front"), camera("b", "back camera")],
            ..Default::default()
        };
        let picked = futures::executor::block_on(acquire(&device, Box::new(|_| {}))).unwrap();
        assert_eq!(picked.id, "b");
        assert_eq!(device.started.borrow().as_deref(), Some("b"));
    }

    #[test]
    fn acquire_without_cameras_is_unavailable() {
        let device = FakeDevice::default();
        let result = futures::executor::block_on(acquire(&device, Box::new(|_| {})));
        assert!(matches!(result, Err(ScanError::DeviceUnavailable(_))));
    }

    #[test]
    fn acquire_surfaces_start_failures() {
        let device = FakeDevice {
            cameras: vec![camera("a", "webcam")],
            fail_start: true,
            ..Default::default()
        };
        let result = futures::executor::block_on(acquire(&device, Box::new(|_| {})));
        assert!(matches!(result, Err(ScanError::DeviceStartFailure(_))));
    }

    #[test]
    fn release_swallows_stop_errors() {
        let device = FakeDevice {
            fail_stop: true,
            ..Default::default()
        };
        futures::executor::block_on(release(&device));
        assert!(!device.cleared.get());

        let healthy = FakeDevice::default();
        futures::executor::block_on(release(&healthy));
        assert!(healthy.cleared.get());
    }
}
