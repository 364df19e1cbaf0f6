//! Formula engine for hand-tracking teleoperation.
//!
//! Servo positions are described by short formulas over the 21 landmarks of
//! a tracked hand, e.g. `map(distance(4, 8), 0, 0.1, 0, 1023)`. A formula is
//! tokenized, parsed into an [`ast::Expr`] and evaluated against the current
//! frame, then rounded and clamped into the servo's range.

pub mod ast;
pub mod engine;
pub mod error;
pub mod functions;
pub mod landmarks;
pub mod servo;

use std::sync::OnceLock;

pub use engine::FormulaEngine;
pub use error::{EvaluationError, FormulaError, SyntaxError};
pub use landmarks::{EvalContext, HandLandmark, Landmark, LANDMARK_COUNT};
pub use servo::{ServoRange, MAX_SERVO_VALUE, MIN_SERVO_VALUE};

fn shared_engine() -> &'static FormulaEngine {
    static ENGINE: OnceLock<FormulaEngine> = OnceLock::new();
    ENGINE.get_or_init(FormulaEngine::new)
}

/// Whether `formula` is non-blank and grammatically valid.
pub fn validate(formula: &str) -> bool {
    shared_engine().validate(formula)
}

/// Human-readable reason `formula` is rejected, if any.
pub fn error_message(formula: &str) -> Option<String> {
    shared_engine().error_message(formula)
}

/// Evaluates `formula` against one frame into a position within `range`.
pub fn evaluate_formula(
    formula: &str,
    landmarks: Option<&[Landmark]>,
    range: ServoRange,
) -> Result<i64, FormulaError> {
    shared_engine().evaluate(formula, &EvalContext::from(landmarks), range)
}
