use crate::engine::parse_formula;
use crate::error::FormulaError;
use crate::servo::ServoId;
use log::{debug, warn};
use std::collections::BTreeMap;

/// Committed formula text for each servo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormulaRegistry {
    formulas: BTreeMap<ServoId, String>,
}

impl FormulaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `formula` for `servo` if it parses. A rejected formula leaves
    /// the previously committed one in place.
    pub fn commit(&mut self, servo: ServoId, formula: &str) -> Result<(), FormulaError> {
        if let Err(err) = parse_formula(formula) {
            warn!("Rejected formula for servo {}: {} ({})", servo, formula, err);
            return Err(err);
        }
        debug!("Committed formula for servo {}: {}", servo, formula);
        self.formulas.insert(servo, formula.to_string());
        Ok(())
    }

    pub fn remove(&mut self, servo: ServoId) -> Option<String> {
        self.formulas.remove(&servo)
    }

    pub fn get(&self, servo: ServoId) -> Option<&str> {
        self.formulas.get(&servo).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.formulas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty()
    }

    /// Formulas in ascending servo order.
    pub fn iter(&self) -> impl Iterator<Item = (ServoId, &str)> + '_ {
        self.formulas
            .iter()
            .map(|(servo, formula)| (*servo, formula.as_str()))
    }
}
