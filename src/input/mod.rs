//! Input normalization module
//!
//! Converts orientation sensors, motion sensors, keyboard and touch into one
//! smoothed control vector. Platform event plumbing stays behind
//! [`SensorPort`]; everything here is plain state and arithmetic.

pub mod keys;
pub mod normalizer;
pub mod port;
pub mod touch;

pub use keys::{Direction, KeyState};
pub use normalizer::{InputMode, InputNormalizer, InputNotice, PermissionStep, normalize_tilt};
pub use port::{SensorCapabilities, SensorError, SensorPort, SensorSource};
pub use touch::TouchDrag;
