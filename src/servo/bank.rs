use crate::engine::FormulaEngine;
use crate::error::FormulaError;
use crate::landmarks::{EvalContext, Landmark};
use crate::servo::{FormulaRegistry, ServoId, ServoLimits};
use log::{debug, warn};
use rayon::prelude::*;
use std::collections::BTreeMap;

const AST_CACHE_SIZE: usize = 64;

/// What happened to one servo when a frame was evaluated.
#[derive(Debug, Clone, PartialEq)]
pub enum ServoOutcome {
    Updated(i64),
    /// Evaluation failed and the last known position, if any, was kept.
    Retained {
        position: Option<i64>,
        error: FormulaError,
    },
}

impl ServoOutcome {
    pub fn position(&self) -> Option<i64> {
        match self {
            ServoOutcome::Updated(position) => Some(*position),
            ServoOutcome::Retained { position, .. } => *position,
        }
    }
}

pub type FrameReport = BTreeMap<ServoId, ServoOutcome>;

/// Drives every committed formula from incoming landmark frames and keeps the
/// last good position of each servo.
pub struct ServoBank {
    engine: FormulaEngine,
    registry: FormulaRegistry,
    limits: ServoLimits,
    positions: BTreeMap<ServoId, i64>,
}

impl ServoBank {
    pub fn new(registry: FormulaRegistry, limits: ServoLimits) -> Self {
        Self {
            engine: FormulaEngine::with_cache(AST_CACHE_SIZE),
            registry,
            limits,
            positions: BTreeMap::new(),
        }
    }

    pub fn registry(&self) -> &FormulaRegistry {
        &self.registry
    }

    pub fn limits(&self) -> &ServoLimits {
        &self.limits
    }

    pub fn engine(&self) -> &FormulaEngine {
        &self.engine
    }

    /// Commits a new formula for `servo`; see [`FormulaRegistry::commit`].
    pub fn commit(&mut self, servo: ServoId, formula: &str) -> Result<(), FormulaError> {
        self.registry.commit(servo, formula)
    }

    /// Drops the servo's formula and its last position.
    pub fn remove(&mut self, servo: ServoId) -> Option<String> {
        self.positions.remove(&servo);
        self.registry.remove(servo)
    }

    pub fn position(&self, servo: ServoId) -> Option<i64> {
        self.positions.get(&servo).copied()
    }

    pub fn positions(&self) -> &BTreeMap<ServoId, i64> {
        &self.positions
    }

    /// Evaluates all formulas against one frame. `None` means no hand was tracked.
    pub fn update(&mut self, landmarks: Option<&[Landmark]>) -> FrameReport {
        let ctx = EvalContext::from(landmarks);
        let mut report = FrameReport::new();

        for (servo, formula) in self.registry.iter() {
            let range = self.limits.range_for(servo);
            let outcome = match self.engine.evaluate(formula, &ctx, range) {
                Ok(position) => {
                    self.positions.insert(servo, position);
                    ServoOutcome::Updated(position)
                }
                Err(error) => {
                    let position = self.positions.get(&servo).copied();
                    warn!(
                        "Servo {} keeps position {:?}: {}",
                        servo, position, error
                    );
                    ServoOutcome::Retained { position, error }
                }
            };
            report.insert(servo, outcome);
        }

        debug!("Frame positions: {:?}", self.positions);
        report
    }

    /// Evaluates a recorded sequence of frames without touching the stored
    /// positions. Frames are processed in parallel; results keep frame order.
    pub fn evaluate_batch<F>(&self, frames: &[F]) -> Vec<BTreeMap<ServoId, Result<i64, FormulaError>>>
    where
        F: AsRef<[Landmark]> + Sync,
    {
        frames
            .par_iter()
            .map(|frame| {
                let ctx = EvalContext::new(frame.as_ref());
                self.registry
                    .iter()
                    .map(|(servo, formula)| {
                        let range = self.limits.range_for(servo);
                        (servo, self.engine.evaluate(formula, &ctx, range))
                    })
                    .collect()
            })
            .collect()
    }
}
