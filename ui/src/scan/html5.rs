//! Browser camera backend over the `html5-qrcode` library.
//!
//! The library is loaded as a global script by the web launcher. The
//! `Html5Qrcode` instance is created on first start, once the reader element
//! is in the DOM.

use std::cell::RefCell;

use js_sys::{Array, Function, Object, Promise, Reflect};
use wasm_bindgen::{prelude::*, JsCast};
use wasm_bindgen_futures::JsFuture;

use crate::config::{SCAN_BOX, SCAN_FPS};

use super::device::{CameraDevice, ScanDevice};
use super::error::ScanError;

#[wasm_bindgen]
extern "C" {
    type Html5Qrcode;

    #[wasm_bindgen(constructor, catch)]
    fn new(element_id: &str) -> Result<Html5Qrcode, JsValue>;

    #[wasm_bindgen(static_method_of = Html5Qrcode, js_name = getCameras, catch)]
    fn get_cameras() -> Result<Promise, JsValue>;

    #[wasm_bindgen(method, catch)]
    fn start(
        this: &Html5Qrcode,
        camera_id: &str,
        config: &JsValue,
        on_success: &Function,
    ) -> Result<Promise, JsValue>;

    #[wasm_bindgen(method, catch)]
    fn stop(this: &Html5Qrcode) -> Result<Promise, JsValue>;

    #[wasm_bindgen(method, catch)]
    fn clear(this: &Html5Qrcode) -> Result<(), JsValue>;
}

pub struct Camera {
    element_id: String,
    instance: RefCell<Option<Html5Qrcode>>,
    on_decode: RefCell<Option<Closure<dyn FnMut(String)>>>,
}

impl Camera {
    pub fn new(element_id: &str) -> Self {
        Self {
            element_id: element_id.to_string(),
            instance: RefCell::new(None),
            on_decode: RefCell::new(None),
        }
    }

    fn ensure_instance(&self) -> Result<(), ScanError> {
        if self.instance.borrow().is_some() {
            return Ok(());
        }
        let instance = Html5Qrcode::new(&self.element_id)
            .map_err(|err| ScanError::DeviceStartFailure(describe(&err)))?;
        self.instance.replace(Some(instance));
        Ok(())
    }
}

impl ScanDevice for Camera {
    async fn list_devices(&self) -> Result<Vec<CameraDevice>, ScanError> {
        let unavailable = |err: JsValue| ScanError::DeviceUnavailable(describe(&err));

        let promise = Html5Qrcode::get_cameras().map_err(unavailable)?;
        let listed = JsFuture::from(promise).await.map_err(unavailable)?;

        Ok(Array::from(&listed)
            .iter()
            .map(|entry| CameraDevice {
                id: read_string(&entry, "id"),
                label: read_string(&entry, "label"),
            })
            .filter(|device| !device.id.is_empty())
            .collect())
    }

    async fn start(
        &self,
        camera: &CameraDevice,
        on_decode: Box<dyn FnMut(String)>,
    ) -> Result<(), ScanError> {
        let start_failure = |err: JsValue| ScanError::DeviceStartFailure(describe(&err));

        self.ensure_instance()?;
        let config = scan_config().map_err(start_failure)?;
        let closure = Closure::wrap(on_decode);

        let promise = {
            let instance = self.instance.borrow();
            let Some(instance) = instance.as_ref() else {
                return Err(ScanError::DeviceStartFailure("scanner not initialised".into()));
            };
            instance
                .start(&camera.id, &config, closure.as_ref().unchecked_ref())
                .map_err(start_failure)?
        };
        self.on_decode.replace(Some(closure));

        JsFuture::from(promise).await.map_err(start_failure)?;
        Ok(())
    }

    async fn stop(&self) -> Result<(), ScanError> {
        if self.on_decode.borrow().is_none() {
            return Ok(());
        }
        let release_failure = |err: JsValue| ScanError::DeviceReleaseFailure(describe(&err));

        let promise = {
            let instance = self.instance.borrow();
            let Some(instance) = instance.as_ref() else {
                return Ok(());
            };
            instance.stop().map_err(release_failure)?
        };
        let stopped = JsFuture::from(promise).await.map_err(release_failure);
        self.on_decode.replace(None);
        stopped.map(|_| ())
    }

    fn clear(&self) {
        if let Some(instance) = self.instance.borrow().as_ref() {
            if let Err(err) = instance.clear() {
                tracing::warn!(error = %describe(&err), "scanner clear failed");
            }
        }
    }
}

fn scan_config() -> Result<JsValue, JsValue> {
    let qrbox = Object::new();
    Reflect::set(&qrbox, &JsValue::from_str("width"), &JsValue::from(SCAN_BOX))?;
    Reflect::set(&qrbox, &JsValue::from_str("height"), &JsValue::from(SCAN_BOX))?;

    let config = Object::new();
    Reflect::set(&config, &JsValue::from_str("fps"), &JsValue::from(SCAN_FPS))?;
    Reflect::set(&config, &JsValue::from_str("qrbox"), &qrbox)?;
    Ok(config.into())
}

fn read_string(entry: &JsValue, field: &str) -> String {
    Reflect::get(entry, &JsValue::from_str(field))
        .ok()
        .and_then(|value| value.as_string())
        .unwrap_or_default()
}

fn describe(err: &JsValue) -> String {
    if let Some(text) = err.as_string() {
        return text;
    }
    if let Some(error) = err.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    format!("{err:?}")
}
