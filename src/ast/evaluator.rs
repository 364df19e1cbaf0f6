use crate::ast::Expr;
use crate::error::EvaluationError;
use crate::functions::register_functions;
use crate::landmarks::{Axis, EvalContext};
use log::trace;
use std::collections::HashMap;
use std::sync::Arc;

pub type Function =
    Arc<dyn Fn(&EvalContext<'_>, &[f64]) -> Result<f64, EvaluationError> + Send + Sync>;

/// Walks a parsed formula against a landmark frame.
///
/// Holds only the function table, which is filled once at construction, so a
/// single evaluator can be shared between threads.
#[derive(Clone)]
pub struct Evaluator {
    pub(crate) functions: HashMap<String, Function>,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl Evaluator {
    /// An evaluator that knows no functions at all.
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// An evaluator with `distance`, `rotationY` and `map` registered.
    pub fn with_builtins() -> Self {
        let mut evaluator = Self::new();
        register_functions(&mut evaluator);
        evaluator
    }

    /// Registers a function with the evaluator, replacing any previous one of the same name.
    pub fn register_function<F>(&mut self, name: &str, function: F)
    where
        F: Fn(&EvalContext<'_>, &[f64]) -> Result<f64, EvaluationError> + Send + Sync + 'static,
    {
        self.functions.insert(name.to_string(), Arc::new(function));
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Evaluates an `Expr` with a given context.
    pub fn evaluate(&self, ast: &Expr, ctx: &EvalContext<'_>) -> Result<f64, EvaluationError> {
        match ast {
            Expr::Number(n) => Ok(*n),

            Expr::Binary {
                operator,
                left,
                right,
            } => {
                let left_value = self.evaluate(left, ctx)?;
                let right_value = self.evaluate(right, ctx)?;
                operator.apply(left_value, right_value)
            }

            Expr::Negate(operand) => Ok(-self.evaluate(operand, ctx)?),

            Expr::Variable(name) => resolve_variable(name, ctx),

            Expr::FunctionCall { name, args } => {
                let values = args
                    .iter()
                    .map(|arg| self.evaluate(arg, ctx))
                    .collect::<Result<Vec<f64>, EvaluationError>>()?;

                let function = self
                    .functions
                    .get(name)
                    .ok_or_else(|| EvaluationError::UnknownFunction(name.clone()))?;

                let result = function(ctx, &values)?;
                trace!("{}({:?}) = {}", name, values, result);
                Ok(result)
            }
        }
    }
}

/// Splits `L[<id>].<axis>` and `L<axis>[<id>]` into their id and axis.
fn landmark_reference(name: &str) -> Option<(&str, Axis)> {
    let rest = name.strip_prefix('L')?;
    let (id, axis) = if let Some(rest) = rest.strip_prefix('[') {
        let (id, axis) = rest.split_once("].")?;
        (id, axis)
    } else {
        let (axis, rest) = rest.split_at_checked(1)?;
        let id = rest.strip_prefix('[')?.strip_suffix(']')?;
        (id, axis)
    };

    if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let axis = Axis::try_from(axis).ok()?;
    Some((id, axis))
}

fn resolve_variable(name: &str, ctx: &EvalContext<'_>) -> Result<f64, EvaluationError> {
    let (id, axis) =
        landmark_reference(name).ok_or_else(|| EvaluationError::UnknownVariable(name.to_string()))?;
    let id: f64 = id
        .parse()
        .map_err(|_| EvaluationError::InvalidLandmark(id.to_string()))?;
    Ok(ctx.landmark(id)?.coordinate(axis))
}
