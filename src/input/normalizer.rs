//! Input normalization
//!
//! Every source (orientation, motion, keyboard, touch) funnels into one
//! smoothed control vector in [-1, 1]². The active source is tracked as an
//! explicit mode rather than per-source objects.

use std::fmt;

use glam::Vec2;

use super::keys::{Direction, KeyState};
use super::port::{SensorError, SensorPort, SensorSource};
use super::touch::TouchDrag;
use crate::consts::TILT_JITTER_DEADZONE;
use crate::sanitize;
use crate::settings::InputTuning;

/// Which kind of source currently drives the control vector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Orientation/motion sensors (also the initial "awaiting sensor" mode)
    Sensor,
    /// Keyboard or touch drag
    Keyboard,
}

impl InputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputMode::Sensor => "sensor",
            InputMode::Keyboard => "keyboard",
        }
    }
}

/// Side-channel notifications for the UI
#[derive(Debug, Clone, PartialEq)]
pub enum InputNotice {
    ModeChanged(InputMode),
    Status(String),
    CalibrationStarted,
    CalibrationFinished,
}

impl fmt::Display for InputNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputNotice::ModeChanged(InputMode::Sensor) => f.write_str("Tilt control active"),
            InputNotice::ModeChanged(InputMode::Keyboard) => {
                f.write_str("Keyboard/touch control active")
            }
            InputNotice::Status(msg) => f.write_str(msg),
            InputNotice::CalibrationStarted => f.write_str("Calibrating..."),
            InputNotice::CalibrationFinished => f.write_str("Calibrated"),
        }
    }
}

/// Result of the synchronous part of a permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStep {
    /// Decided without a prompt
    Done(bool),
    /// The platform prompt must run for this source, then `finish_permission`
    Prompt(SensorSource),
}

/// Scale a raw reading to [-1, 1], snapping near-zero jitter to 0
pub fn normalize_tilt(value: f32, range: f32) -> f32 {
    normalize_axis(value, range, TILT_JITTER_DEADZONE)
}

fn normalize_axis(value: f32, range: f32, deadzone: f32) -> f32 {
    let n = value.clamp(-range, range) / range;
    if n.abs() < deadzone { 0.0 } else { n }
}

type NoticeListener = Box<dyn FnMut(&InputNotice)>;

fn fallback_status(reason: &str) -> InputNotice {
    InputNotice::Status(format!("{} - use arrow keys or drag to tilt", reason))
}

/// Turns raw device input into the ball's control vector
pub struct InputNormalizer<P: SensorPort> {
    port: P,
    tuning: InputTuning,
    mode: InputMode,
    sensor_active: bool,
    active_source: Option<SensorSource>,
    tilt: Vec2,
    /// Last sanitized sensor reading, before calibration
    last_raw: Vec2,
    calibration: Option<Vec2>,
    /// Pending "calibration finished" deadlines (ms)
    calibration_deadlines: Vec<f64>,
    keys: KeyState,
    touch: TouchDrag,
    listener: Option<NoticeListener>,
    /// Raised before any listener was attached; delivered by `set_listener`
    pending_notice: Option<InputNotice>,
}

impl<P: SensorPort> InputNormalizer<P> {
    pub fn new(port: P) -> Self {
        Self::with_tuning(port, InputTuning::default())
    }

    pub fn with_tuning(port: P, tuning: InputTuning) -> Self {
        let (mode, pending_notice) = if port.capabilities().any() {
            (InputMode::Sensor, None)
        } else {
            log::info!("No tilt sensors detected, using keyboard/touch");
            let reason = SensorError::Unsupported.to_string();
            (InputMode::Keyboard, Some(fallback_status(&reason)))
        };

        Self {
            port,
            tuning,
            mode,
            sensor_active: false,
            active_source: None,
            tilt: Vec2::ZERO,
            last_raw: Vec2::ZERO,
            calibration: None,
            calibration_deadlines: Vec::new(),
            keys: KeyState::default(),
            touch: TouchDrag::default(),
            listener: None,
            pending_notice,
        }
    }

    /// Receive mode/status notifications
    ///
    /// A status raised during construction is delivered immediately.
    pub fn set_listener(&mut self, listener: impl FnMut(&InputNotice) + 'static) {
        self.listener = Some(Box::new(listener));
        if let Some(notice) = self.pending_notice.take() {
            self.notify(notice);
        }
    }

    /// Current control vector (a copy)
    #[inline]
    pub fn tilt(&self) -> Vec2 {
        self.tilt
    }

    #[inline]
    pub fn mode(&self) -> InputMode {
        self.mode
    }

    #[inline]
    pub fn is_sensor_active(&self) -> bool {
        self.sensor_active
    }

    pub fn active_source(&self) -> Option<SensorSource> {
        self.active_source
    }

    /// Still in sensor mode but no sensor has been granted yet
    pub fn is_awaiting_sensor(&self) -> bool {
        self.mode == InputMode::Sensor && !self.sensor_active
    }

    pub fn is_calibrating(&self) -> bool {
        !self.calibration_deadlines.is_empty()
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    fn notify(&mut self, notice: InputNotice) {
        if let Some(listener) = self.listener.as_mut() {
            listener(&notice);
        }
    }

    fn set_mode(&mut self, mode: InputMode) {
        if self.mode != mode {
            self.mode = mode;
            log::info!("Input mode: {}", mode.as_str());
            self.notify(InputNotice::ModeChanged(mode));
        }
    }

    fn fall_back(&mut self, reason: &str) {
        log::warn!("{}, falling back to keyboard/touch", reason);
        self.sensor_active = false;
        self.active_source = None;
        self.set_mode(InputMode::Keyboard);
        self.notify(fallback_status(reason));
    }

    // === Permission ===

    /// Ask for tilt sensor access
    ///
    /// Must be triggered from a user gesture. Never fails: any denial or
    /// missing capability resolves to `false` with keyboard/touch as fallback.
    pub async fn request_permission(&mut self) -> bool {
        match self.begin_permission() {
            PermissionStep::Done(granted) => granted,
            PermissionStep::Prompt(source) => {
                let result = self.port.request_access(source).await;
                self.finish_permission(source, result)
            }
        }
    }

    /// Synchronous half of `request_permission`
    ///
    /// Callers that cannot hold `&mut self` across the prompt (e.g. a shared
    /// `RefCell`) run the prompt themselves and hand the result to
    /// `finish_permission`.
    pub fn begin_permission(&mut self) -> PermissionStep {
        if self.sensor_active {
            return PermissionStep::Done(true);
        }

        let caps = self.port.capabilities();
        let Some(source) = caps.preferred_source() else {
            self.fall_back(&SensorError::Unsupported.to_string());
            return PermissionStep::Done(false);
        };

        if caps.needs_permission {
            PermissionStep::Prompt(source)
        } else {
            PermissionStep::Done(self.finish_permission(source, Ok(())))
        }
    }

    /// Apply the prompt result and start the sensor stream if granted
    pub fn finish_permission(
        &mut self,
        source: SensorSource,
        result: Result<(), SensorError>,
    ) -> bool {
        match result.and_then(|()| self.port.enable(source)) {
            Ok(()) => {
                self.sensor_active = true;
                self.active_source = Some(source);
                log::info!("Tilt sensor enabled ({})", source);
                self.set_mode(InputMode::Sensor);
                self.notify(InputNotice::Status(format!("Tilt sensor active ({})", source)));
                true
            }
            Err(e) => {
                self.fall_back(&e.to_string());
                false
            }
        }
    }

    // === Calibration ===

    /// Treat the latest raw sensor reading as level
    ///
    /// Zeroes the control vector now; `frame` reports completion once the
    /// calibration window has passed. A second call does not cancel the first
    /// window.
    pub fn calibrate(&mut self, now_ms: f64) {
        if self.mode != InputMode::Sensor {
            log::debug!("Calibrating outside sensor mode");
        }
        self.calibration = Some(self.last_raw);
        self.tilt = Vec2::ZERO;
        self.calibration_deadlines
            .push(now_ms + self.tuning.calibration_ms);
        log::debug!(
            "Calibration offset ({:.2}, {:.2})",
            self.last_raw.x,
            self.last_raw.y
        );
        self.notify(InputNotice::CalibrationStarted);
    }

    // === Sensor readings ===

    /// Device orientation: `beta` front/back, `gamma` left/right (degrees)
    pub fn handle_orientation(&mut self, beta: Option<f64>, gamma: Option<f64>) {
        let raw = Vec2::new(sanitize(gamma), sanitize(beta));
        self.handle_sensor(raw, self.tuning.orientation_range_deg);
    }

    /// Acceleration including gravity (m/s²) as pseudo-tilt
    pub fn handle_motion(&mut self, accel_x: Option<f64>, accel_y: Option<f64>) {
        let raw = Vec2::new(sanitize(accel_x), sanitize(accel_y));
        self.handle_sensor(raw, self.tuning.motion_range);
    }

    fn handle_sensor(&mut self, raw: Vec2, range: f32) {
        self.sensor_active = true;
        self.set_mode(InputMode::Sensor);
        self.last_raw = raw;

        let level = raw - self.calibration.unwrap_or(Vec2::ZERO);
        let deadzone = self.tuning.jitter_deadzone;
        let target = Vec2::new(
            normalize_axis(level.x, range, deadzone),
            normalize_axis(level.y, range, deadzone),
        );
        self.smooth(target);
    }

    fn smooth(&mut self, target: Vec2) {
        let alpha = match self.mode {
            InputMode::Sensor => self.tuning.sensor_smoothing,
            InputMode::Keyboard => {
                // Keyboard release is instant
                if target == Vec2::ZERO {
                    self.tilt = Vec2::ZERO;
                    return;
                }
                self.tuning.keyboard_smoothing
            }
        };
        self.tilt = self.tilt * (1.0 - alpha) + target * alpha;
    }

    // === Keyboard ===

    /// Returns true if the key is a control key
    pub fn key_down(&mut self, key: &str) -> bool {
        let Some(dir) = Direction::from_key(key) else {
            return false;
        };
        if self.keys.press(dir) && !self.sensor_active {
            self.touch.cancel_fade();
            self.set_mode(InputMode::Keyboard);
        }
        true
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        let Some(dir) = Direction::from_key(key) else {
            return false;
        };
        self.keys.release(dir);
        true
    }

    // === Touch ===

    pub fn touch_start(&mut self, x: f32, y: f32) {
        self.touch.begin(Vec2::new(x, y));
    }

    pub fn touch_move(&mut self, x: f32, y: f32) {
        if self.sensor_active || !self.touch.is_active() {
            return;
        }
        // Only the latest position counts; `frame` smooths toward it once
        self.touch.update(Vec2::new(x, y));
        self.set_mode(InputMode::Keyboard);
    }

    pub fn touch_end(&mut self) {
        let fade = !self.sensor_active && self.mode == InputMode::Keyboard;
        self.touch.end(fade);
    }

    // === Per frame ===

    /// Called once per animation frame
    ///
    /// Fires due calibration completions and, in keyboard mode, keeps the
    /// vector converging toward the held keys / touch drag or fades it out
    /// after a touch release.
    pub fn frame(&mut self, now_ms: f64) {
        let before = self.calibration_deadlines.len();
        self.calibration_deadlines.retain(|&deadline| deadline > now_ms);
        for _ in self.calibration_deadlines.len()..before {
            log::debug!("Calibration finished");
            self.notify(InputNotice::CalibrationFinished);
        }

        if self.mode != InputMode::Keyboard {
            return;
        }

        if self.touch.is_active() {
            self.smooth(self.touch.target(self.tuning.touch_full_tilt_px));
        } else if self.touch.is_fading() && !self.keys.any() {
            self.tilt = self.touch.fade(
                self.tilt,
                self.tuning.keyboard_smoothing,
                self.tuning.fade_cutoff,
            );
        } else {
            self.touch.cancel_fade();
            self.smooth(self.keys.target());
        }
    }
}
