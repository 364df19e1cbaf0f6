//! JSON persistence of servo formulas.
//!
//! The controller configuration file also carries connection settings that
//! this crate does not interpret; they survive a load/save round trip as-is.

use crate::engine::parse_formula;
use crate::error::FormulaError;
use crate::servo::{FormulaRegistry, ServoId, ServoLimits};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid servo id: {0}")]
    InvalidServoId(String),
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Formula text keyed by stringified servo id.
    #[serde(default)]
    pub formulas: BTreeMap<String, String>,
    /// Maximum position overrides keyed by stringified servo id.
    #[serde(default, rename = "servoMax", skip_serializing_if = "BTreeMap::is_empty")]
    pub servo_max: BTreeMap<String, i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn servo_id(key: &str) -> Result<ServoId, ConfigError> {
    key.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidServoId(key.to_string()))
}

impl ControllerConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn limits(&self) -> Result<ServoLimits, ConfigError> {
        let mut limits = ServoLimits::new();
        for (key, max) in &self.servo_max {
            limits.set_max(servo_id(key)?, *max);
        }
        Ok(limits)
    }

    /// Commits every stored formula into a fresh registry.
    ///
    /// Formulas that fail to parse are left out and returned alongside the
    /// registry; a key that is not a servo id fails the whole load.
    pub fn registry(&self) -> Result<(FormulaRegistry, Vec<(ServoId, FormulaError)>), ConfigError> {
        let mut registry = FormulaRegistry::new();
        let mut rejected = Vec::new();
        for (key, formula) in &self.formulas {
            let servo = servo_id(key)?;
            if let Err(err) = registry.commit(servo, formula) {
                warn!("Skipping stored formula for servo {}: {}", servo, err);
                rejected.push((servo, err));
            }
        }
        Ok((registry, rejected))
    }

    /// Replaces the stored formulas and overrides, leaving other settings alone.
    ///
    /// Stored text that never made it into the registry because it does not
    /// parse is kept until the registry holds a formula for that servo.
    pub fn store(&mut self, registry: &FormulaRegistry, limits: &ServoLimits) {
        let mut formulas: BTreeMap<String, String> = self
            .formulas
            .iter()
            .filter(|(key, formula)| {
                let replaced = servo_id(key).is_ok_and(|servo| registry.get(servo).is_some());
                !replaced && parse_formula(formula).is_err()
            })
            .map(|(key, formula)| (key.clone(), formula.clone()))
            .collect();
        formulas.extend(
            registry
                .iter()
                .map(|(servo, formula)| (servo.to_string(), formula.to_string())),
        );
        self.formulas = formulas;
        self.servo_max = limits
            .overrides()
            .map(|(servo, max)| (servo.to_string(), max))
            .collect();
    }
}
