use crate::ast::{Evaluator, Expr, Parser};
use crate::error::FormulaError;
use crate::landmarks::EvalContext;
use crate::servo::ServoRange;
use log::debug;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};

/// Parses a formula, treating blank input as [`FormulaError::Empty`].
pub fn parse_formula(formula: &str) -> Result<Expr, FormulaError> {
    if formula.trim().is_empty() {
        return Err(FormulaError::Empty);
    }
    Ok(Parser::parse_formula(formula)?)
}

/// Public boundary between formula strings and servo positions.
///
/// Without a cache the engine holds no mutable state. With one, parsed
/// formulas are kept in an LRU keyed by the formula text; results are the
/// same either way.
pub struct FormulaEngine {
    evaluator: Evaluator,
    cache: Option<Mutex<LruCache<String, Arc<Expr>>>>,
}

impl Default for FormulaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FormulaEngine {
    pub fn new() -> Self {
        Self::with_evaluator(Evaluator::with_builtins())
    }

    pub fn with_evaluator(evaluator: Evaluator) -> Self {
        Self {
            evaluator,
            cache: None,
        }
    }

    /// Keeps up to `capacity` parsed formulas. A capacity of zero disables caching.
    pub fn with_cache(capacity: usize) -> Self {
        let mut engine = Self::new();
        engine.cache = NonZeroUsize::new(capacity).map(|cap| Mutex::new(LruCache::new(cap)));
        engine
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// True iff the formula is non-blank and grammatically valid. Unknown
    /// variables and functions are not checked.
    pub fn validate(&self, formula: &str) -> bool {
        self.parse(formula).is_ok()
    }

    /// The message to show next to a formula, or `None` when it parses.
    /// Blank input reports `Empty formula`.
    pub fn error_message(&self, formula: &str) -> Option<String> {
        self.parse(formula).err().map(|err| err.to_string())
    }

    pub fn parse(&self, formula: &str) -> Result<Arc<Expr>, FormulaError> {
        let Some(cache) = &self.cache else {
            return Ok(Arc::new(parse_formula(formula)?));
        };

        if let Some(ast) = cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(formula)
        {
            return Ok(Arc::clone(ast));
        }

        let ast = Arc::new(parse_formula(formula)?);
        cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .put(formula.to_string(), Arc::clone(&ast));
        Ok(ast)
    }

    /// Evaluates a formula without rounding or clamping.
    pub fn evaluate_raw(&self, formula: &str, ctx: &EvalContext<'_>) -> Result<f64, FormulaError> {
        let ast = self.parse(formula)?;
        Ok(self.evaluator.evaluate(&ast, ctx)?)
    }

    /// Evaluates a formula into a servo position within `range`.
    pub fn evaluate(
        &self,
        formula: &str,
        ctx: &EvalContext<'_>,
        range: ServoRange,
    ) -> Result<i64, FormulaError> {
        let ast = self.parse(formula)?;
        self.evaluate_ast(&ast, ctx, range)
    }

    /// Evaluates an already parsed formula into a servo position within `range`.
    pub fn evaluate_ast(
        &self,
        ast: &Expr,
        ctx: &EvalContext<'_>,
        range: ServoRange,
    ) -> Result<i64, FormulaError> {
        let raw = self.evaluator.evaluate(ast, ctx)?;
        let position = range.apply(raw)?;
        debug!("Evaluated {} -> {}", raw, position);
        Ok(position)
    }
}
