use crate::error::EvaluationError;
use std::collections::BTreeMap;

mod bank;
pub mod config;
mod registry;

pub use bank::{FrameReport, ServoBank, ServoOutcome};
pub use registry::FormulaRegistry;

/// Lowest position any servo accepts.
pub const MIN_SERVO_VALUE: i64 = 0;
/// Default highest position.
pub const MAX_SERVO_VALUE: i64 = 1023;
/// Upper bound for rotation-class servos, which take a raw angle range.
pub const EXTENDED_SERVO_MAX: i64 = 4095;

pub type ServoId = u8;

/// Inclusive output range of one servo.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ServoRange {
    min: i64,
    max: i64,
}

impl Default for ServoRange {
    fn default() -> Self {
        Self {
            min: MIN_SERVO_VALUE,
            max: MAX_SERVO_VALUE,
        }
    }
}

impl ServoRange {
    /// A `max` below `min` collapses the range to `min`.
    pub fn new(min: i64, max: i64) -> Self {
        Self {
            min,
            max: max.max(min),
        }
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    /// Clamps a raw formula result into the range and rounds it to the
    /// nearest position. NaN and infinities are rejected.
    pub fn apply(&self, raw: f64) -> Result<i64, EvaluationError> {
        if !raw.is_finite() {
            return Err(EvaluationError::NonFinite(raw));
        }
        Ok(raw.clamp(self.min as f64, self.max as f64).round() as i64)
    }
}

/// Per-servo output ranges: every servo uses `[MIN_SERVO_VALUE, MAX_SERVO_VALUE]`
/// unless it has its own maximum.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServoLimits {
    max_overrides: BTreeMap<ServoId, i64>,
}

impl ServoLimits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_max(&mut self, servo: ServoId, max: i64) -> &mut Self {
        self.max_overrides.insert(servo, max);
        self
    }

    /// Gives `servo` the rotation-class range `[MIN_SERVO_VALUE, EXTENDED_SERVO_MAX]`.
    pub fn set_rotation(&mut self, servo: ServoId) -> &mut Self {
        self.set_max(servo, EXTENDED_SERVO_MAX)
    }

    pub fn clear_max(&mut self, servo: ServoId) {
        self.max_overrides.remove(&servo);
    }

    pub fn range_for(&self, servo: ServoId) -> ServoRange {
        let max = self
            .max_overrides
            .get(&servo)
            .copied()
            .unwrap_or(MAX_SERVO_VALUE);
        ServoRange::new(MIN_SERVO_VALUE, max)
    }

    pub fn overrides(&self) -> impl Iterator<Item = (ServoId, i64)> + '_ {
        self.max_overrides.iter().map(|(servo, max)| (*servo, *max))
    }
}
