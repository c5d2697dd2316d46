//! Platform sensor capability
//!
//! The normalizer never touches window-level sensor events directly. A
//! `SensorPort` reports what the device supports, runs the platform permission
//! prompt, and starts delivering readings once enabled.

use std::fmt;
use std::future::Future;

use thiserror::Error;

/// A tilt sensor stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorSource {
    /// Device orientation angles (degrees)
    Orientation,
    /// Acceleration including gravity (m/s²), used when orientation is absent
    Motion,
}

impl SensorSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorSource::Orientation => "orientation",
            SensorSource::Motion => "motion",
        }
    }
}

impl fmt::Display for SensorSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the runtime offers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SensorCapabilities {
    pub orientation: bool,
    pub motion: bool,
    /// Access must be granted by an explicit user prompt
    pub needs_permission: bool,
}

impl SensorCapabilities {
    pub fn any(&self) -> bool {
        self.orientation || self.motion
    }

    /// Orientation first; motion only when orientation is unsupported
    pub fn preferred_source(&self) -> Option<SensorSource> {
        if self.orientation {
            Some(SensorSource::Orientation)
        } else if self.motion {
            Some(SensorSource::Motion)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SensorError {
    #[error("Tilt sensors not supported")]
    Unsupported,

    #[error("Sensor permission denied")]
    Denied,

    #[error("Sensor error: {0}")]
    Platform(String),
}

/// Injected access to device tilt sensors
pub trait SensorPort {
    fn capabilities(&self) -> SensorCapabilities;

    /// Run the platform permission prompt for `source`
    ///
    /// Only called when `capabilities().needs_permission` is set.
    fn request_access(
        &mut self,
        source: SensorSource,
    ) -> impl Future<Output = Result<(), SensorError>>;

    /// Start delivering readings from `source`
    fn enable(&mut self, source: SensorSource) -> Result<(), SensorError>;
}
