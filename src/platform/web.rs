//! Browser tilt sensors
//!
//! Wraps `deviceorientation`/`devicemotion` window listeners and the
//! `requestPermission()` gate (iOS Safari) behind [`SensorPort`].

use std::cell::RefCell;
use std::future::Future;
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{DeviceMotionEvent, DeviceOrientationEvent};

use crate::input::{InputNormalizer, SensorCapabilities, SensorError, SensorPort, SensorSource};
use crate::settings::InputTuning;

#[wasm_bindgen(inline_js = "
    export function orientation_supported() {
        return typeof window.DeviceOrientationEvent !== 'undefined';
    }

    export function motion_supported() {
        return typeof window.DeviceMotionEvent !== 'undefined';
    }

    export function permission_gated() {
        const gated = (api) => api && typeof api.requestPermission === 'function';
        return gated(window.DeviceOrientationEvent) || gated(window.DeviceMotionEvent);
    }

    export function request_sensor_permission(kind) {
        const api = kind === 'motion' ? window.DeviceMotionEvent : window.DeviceOrientationEvent;
        if (!api || typeof api.requestPermission !== 'function') {
            return Promise.resolve('granted');
        }
        return api.requestPermission();
    }
")]
extern "C" {
    fn orientation_supported() -> bool;
    fn motion_supported() -> bool;
    fn permission_gated() -> bool;
    fn request_sensor_permission(kind: &str) -> js_sys::Promise;
}

/// Normalizer shared between event listeners and the frame loop
pub type SharedInput = Rc<RefCell<InputNormalizer<WebSensors>>>;

/// Window-level sensor listeners feeding a shared normalizer
pub struct WebSensors {
    input: Weak<RefCell<InputNormalizer<WebSensors>>>,
    listening: Option<SensorSource>,
}

impl WebSensors {
    /// Create the shared normalizer with its sensor port wired back to it
    pub fn shared(tuning: InputTuning) -> SharedInput {
        Rc::new_cyclic(|weak| {
            let port = WebSensors {
                input: weak.clone(),
                listening: None,
            };
            RefCell::new(InputNormalizer::with_tuning(port, tuning))
        })
    }
}

/// Start the browser permission prompt
///
/// The JS call happens immediately, so this must run inside the user gesture
/// handler; only the returned future may be awaited later.
pub fn prompt(source: SensorSource) -> impl Future<Output = Result<(), SensorError>> {
    let promise = request_sensor_permission(source.as_str());
    async move {
        match JsFuture::from(promise).await {
            Ok(state) if state.as_string().as_deref() == Some("granted") => Ok(()),
            Ok(_) => Err(SensorError::Denied),
            Err(e) => Err(SensorError::Platform(format!("{:?}", e))),
        }
    }
}

fn js_error(e: JsValue) -> SensorError {
    SensorError::Platform(format!("{:?}", e))
}

impl SensorPort for WebSensors {
    fn capabilities(&self) -> SensorCapabilities {
        SensorCapabilities {
            orientation: orientation_supported(),
            motion: motion_supported(),
            needs_permission: permission_gated(),
        }
    }

    fn request_access(
        &mut self,
        source: SensorSource,
    ) -> impl Future<Output = Result<(), SensorError>> {
        prompt(source)
    }

    fn enable(&mut self, source: SensorSource) -> Result<(), SensorError> {
        if self.listening == Some(source) {
            return Ok(());
        }
        let window = web_sys::window().ok_or(SensorError::Unsupported)?;
        let input = self.input.clone();

        match source {
            SensorSource::Orientation => {
                let closure =
                    Closure::<dyn FnMut(_)>::new(move |event: DeviceOrientationEvent| {
                        if let Some(input) = input.upgrade() {
                            if let Ok(mut input) = input.try_borrow_mut() {
                                input.handle_orientation(event.beta(), event.gamma());
                            }
                        }
                    });
                window
                    .add_event_listener_with_callback(
                        "deviceorientation",
                        closure.as_ref().unchecked_ref(),
                    )
                    .map_err(js_error)?;
                closure.forget();
            }
            SensorSource::Motion => {
                let closure = Closure::<dyn FnMut(_)>::new(move |event: DeviceMotionEvent| {
                    let Some(accel) = event.acceleration_including_gravity() else {
                        return;
                    };
                    if let Some(input) = input.upgrade() {
                        if let Ok(mut input) = input.try_borrow_mut() {
                            input.handle_motion(accel.x(), accel.y());
                        }
                    }
                });
                window
                    .add_event_listener_with_callback(
                        "devicemotion",
                        closure.as_ref().unchecked_ref(),
                    )
                    .map_err(js_error)?;
                closure.forget();
            }
        }

        log::info!("Listening for {} events", source);
        self.listening = Some(source);
        Ok(())
    }
}
