use crate::ast::Evaluator;
use crate::error::EvaluationError;
use crate::landmarks::EvalContext;
use handservo_macros::formula_fn;

pub fn register(evaluator: &mut Evaluator) {
    evaluator.register_function("map", map);
}

/// Linear remap of `value` from `[in_min, in_max]` onto `[out_min, out_max]`,
/// saturating at either end.
#[formula_fn("map")]
pub fn map(
    _ctx: &EvalContext<'_>,
    value: f64,
    in_min: f64,
    in_max: f64,
    out_min: f64,
    out_max: f64,
) -> Result<f64, EvaluationError> {
    if value <= in_min {
        return Ok(out_min);
    }
    if value >= in_max {
        return Ok(out_max);
    }
    Ok(out_min + ((value - in_min) / (in_max - in_min)) * (out_max - out_min))
}
