//! Platform abstraction layer
//!
//! Sensor access differs per target:
//! - Browser: `deviceorientation`/`devicemotion` listeners, with the
//!   permission prompt some mobile browsers require (`web`)
//! - Native: no tilt hardware (`HeadlessSensors`)

#[cfg(target_arch = "wasm32")]
pub mod web;

use std::future::Future;

use crate::input::{SensorCapabilities, SensorError, SensorPort, SensorSource};

/// Sensor port for targets without tilt hardware
///
/// Reports no capabilities, so the normalizer starts in keyboard mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessSensors;

impl SensorPort for HeadlessSensors {
    fn capabilities(&self) -> SensorCapabilities {
        SensorCapabilities::default()
    }

    fn request_access(
        &mut self,
        _source: SensorSource,
    ) -> impl Future<Output = Result<(), SensorError>> {
        std::future::ready(Err(SensorError::Unsupported))
    }

    fn enable(&mut self, _source: SensorSource) -> Result<(), SensorError> {
        Err(SensorError::Unsupported)
    }
}
