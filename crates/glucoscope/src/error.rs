use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::features::{Feature, FeatureRange};

pub type Result<T, E = PredictError> = std::result::Result<T, E>;

/// A single field outside its accepted interval
#[derive(Debug, Clone, PartialEq)]
pub struct RangeViolation {
  pub feature: Feature,
  pub value: f64,
  pub range: FeatureRange,
}

impl fmt::Display for RangeViolation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{} = {} (expected {} to {})",
      self.feature.key(),
      self.value,
      self.range.min,
      self.range.max
    )
  }
}

/// Every out-of-range field of a rejected input, in feature order
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Some input values are outside expected ranges: {}", list(.violations))]
pub struct ValidationError {
  pub violations: Vec<RangeViolation>,
}

fn list(violations: &[RangeViolation]) -> String {
  violations.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

#[derive(Debug, Error)]
pub enum PredictError {
  #[error("Invalid input values")]
  InvalidInput(#[from] ValidationError),
}

impl PredictError {
  pub fn violations(&self) -> &[RangeViolation] {
    match self {
      PredictError::InvalidInput(err) => &err.violations,
    }
  }
}

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("Failed to read config {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Failed to parse config {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("Failed to write config {path}: {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Invalid config: {0}")]
  Invalid(String),
}
