//! Fixed logistic-regression scorer
//!
//! Coefficients come from a model fitted on the Pima Indians dataset and are
//! baked in; nothing here is trained at runtime.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::error::Result;
use crate::features::{self, Feature, PatientInput};
use crate::risk::identify_risk_factors;

/// Probability at or above which the input is classified as diabetic
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Returned probabilities are rounded to this many decimal places
pub const PROBABILITY_DECIMALS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coefficients {
  pub intercept: f64,
  pub pregnancies: f64,
  pub glucose: f64,
  pub blood_pressure: f64,
  pub skin_thickness: f64,
  pub insulin: f64,
  pub bmi: f64,
  pub diabetes_pedigree: f64,
  pub age: f64,
}

pub const PIMA_COEFFICIENTS: Coefficients = Coefficients {
  intercept: -8.4,
  pregnancies: 0.12,
  glucose: 0.035,
  blood_pressure: -0.001,
  skin_thickness: 0.001,
  insulin: 0.0002,
  bmi: 0.089,
  diabetes_pedigree: 0.94,
  age: 0.014,
};

impl Coefficients {
  pub fn weight(&self, feature: Feature) -> f64 {
    match feature {
      Feature::Pregnancies => self.pregnancies,
      Feature::Glucose => self.glucose,
      Feature::BloodPressure => self.blood_pressure,
      Feature::SkinThickness => self.skin_thickness,
      Feature::Insulin => self.insulin,
      Feature::Bmi => self.bmi,
      Feature::DiabetesPedigree => self.diabetes_pedigree,
      Feature::Age => self.age,
    }
  }

  /// Weighted sum of the features plus intercept, accumulated in feature order
  pub fn linear_predictor(&self, input: &PatientInput) -> f64 {
    Feature::ALL
      .into_iter()
      .fold(self.intercept, |acc, feature| acc + self.weight(feature) * input.get(feature))
  }

  /// Per-feature terms of the linear predictor
  pub fn contributions(&self, input: &PatientInput) -> Vec<(Feature, f64)> {
    Feature::ALL.into_iter().map(|f| (f, self.weight(f) * input.get(f))).collect()
  }
}

pub fn sigmoid(z: f64) -> f64 {
  1.0 / (1.0 + (-z).exp())
}

/// Rounds the exact decimal expansion of `value`, so `2.55` (stored as
/// 2.5499...) goes to `2.5` at one place.
pub fn round_to(value: f64, decimals: usize) -> f64 {
  format!("{value:.decimals$}").parse().unwrap_or(value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Prediction {
  #[serde(rename = "Diabetic")]
  Diabetic,
  #[serde(rename = "Non-Diabetic")]
  NonDiabetic,
}

impl Prediction {
  pub fn from_probability(probability: f64) -> Self {
    if probability >= DECISION_THRESHOLD {
      Prediction::Diabetic
    } else {
      Prediction::NonDiabetic
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Prediction::Diabetic => "Diabetic",
      Prediction::NonDiabetic => "Non-Diabetic",
    }
  }
}

impl fmt::Display for Prediction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConfidenceLevel {
  Low,
  Medium,
  High,
}

impl ConfidenceLevel {
  /// Band the probability of the winning class
  pub fn from_certainty(certainty: f64) -> Self {
    if certainty < 0.6 {
      ConfidenceLevel::Low
    } else if certainty < 0.8 {
      ConfidenceLevel::Medium
    } else {
      ConfidenceLevel::High
    }
  }

  pub fn for_probability(probability: f64) -> Self {
    Self::from_certainty(probability.max(1.0 - probability))
  }
}

impl fmt::Display for ConfidenceLevel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let label = match self {
      ConfidenceLevel::Low => "Low",
      ConfidenceLevel::Medium => "Medium",
      ConfidenceLevel::High => "High",
    };
    f.write_str(label)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
  pub probability: f64,
  pub prediction: Prediction,
  pub confidence_level: ConfidenceLevel,
  pub risk_factors: Vec<String>,
}

/// Score `input` with the built-in coefficients
pub fn predict(input: &PatientInput) -> Result<PredictionResult> {
  predict_with(&PIMA_COEFFICIENTS, input)
}

/// Validation runs first; no scoring happens for out-of-range input.
/// Class and confidence use the unrounded probability.
pub fn predict_with(coefficients: &Coefficients, input: &PatientInput) -> Result<PredictionResult> {
  if let Err(err) = features::validate(input) {
    debug!(violations = err.violations.len(), "rejected prediction input: {err}");
    return Err(err.into());
  }

  let z = coefficients.linear_predictor(input);
  let probability = sigmoid(z);
  debug!(linear_predictor = z, probability, "scored input");

  Ok(PredictionResult {
    probability: round_to(probability, PROBABILITY_DECIMALS),
    prediction: Prediction::from_probability(probability),
    confidence_level: ConfidenceLevel::for_probability(probability),
    risk_factors: identify_risk_factors(input),
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::PredictError;

  fn first_sample_row() -> PatientInput {
    PatientInput {
      pregnancies: 6.0,
      glucose: 148.0,
      blood_pressure: 72.0,
      skin_thickness: 35.0,
      insulin: 0.0,
      bmi: 33.6,
      diabetes_pedigree: 0.627,
      age: 50.0,
    }
  }

  #[test]
  fn test_linear_predictor_for_default_form() {
    let z = PIMA_COEFFICIENTS.linear_predictor(&PatientInput::default());
    assert!((z - (-1.119)).abs() < 1e-9);
  }

  #[test]
  fn test_predict_default_form() {
    let result = predict(&PatientInput::default()).unwrap();
    assert_eq!(result.probability, 0.2462);
    assert_eq!(result.prediction, Prediction::NonDiabetic);
    assert_eq!(result.confidence_level, ConfidenceLevel::Medium);
    assert!(result.risk_factors.is_empty());
  }

  #[test]
  fn test_predict_diabetic_sample() {
    let result = predict(&first_sample_row()).unwrap();
    assert_eq!(result.probability, 0.851);
    assert_eq!(result.prediction, Prediction::Diabetic);
    assert_eq!(result.confidence_level, ConfidenceLevel::High);
    assert_eq!(
      result.risk_factors,
      vec!["High glucose level", "Obesity (high BMI)", "Age over 45"]
    );
  }

  #[test]
  fn test_extreme_inputs_round_to_bounds() {
    let high = predict(&PatientInput {
      pregnancies: 17.0,
      glucose: 199.0,
      blood_pressure: 0.0,
      skin_thickness: 99.0,
      insulin: 846.0,
      bmi: 67.1,
      diabetes_pedigree: 2.42,
      age: 81.0,
    })
    .unwrap();
    assert_eq!(high.probability, 1.0);
    assert_eq!(high.confidence_level, ConfidenceLevel::High);

    let low = predict(&PatientInput {
      pregnancies: 0.0,
      glucose: 0.0,
      blood_pressure: 122.0,
      skin_thickness: 0.0,
      insulin: 0.0,
      bmi: 0.0,
      diabetes_pedigree: 0.078,
      age: 21.0,
    })
    .unwrap();
    assert_eq!(low.probability, 0.0003);
    assert_eq!(low.prediction, Prediction::NonDiabetic);
    assert_eq!(low.risk_factors, vec!["High blood pressure"]);
  }

  #[test]
  fn test_invalid_input_fails_before_scoring() {
    let input = PatientInput { glucose: 250.0, ..PatientInput::default() };
    let err = predict(&input).unwrap_err();
    assert_eq!(err.to_string(), "Invalid input values");
    match &err {
      PredictError::InvalidInput(inner) => {
        assert_eq!(inner.violations.len(), 1);
        assert_eq!(inner.violations[0].feature, Feature::Glucose);
      }
    }
  }

  #[test]
  fn test_classification_threshold_is_inclusive() {
    assert_eq!(Prediction::from_probability(0.5), Prediction::Diabetic);
    assert_eq!(Prediction::from_probability(0.4999), Prediction::NonDiabetic);
  }

  #[test]
  fn test_confidence_bands() {
    assert_eq!(ConfidenceLevel::for_probability(0.5), ConfidenceLevel::Low);
    assert_eq!(ConfidenceLevel::for_probability(0.41), ConfidenceLevel::Low);
    assert_eq!(ConfidenceLevel::for_probability(0.6), ConfidenceLevel::Medium);
    assert_eq!(ConfidenceLevel::for_probability(0.25), ConfidenceLevel::Medium);
    assert_eq!(ConfidenceLevel::for_probability(0.8), ConfidenceLevel::High);
    assert_eq!(ConfidenceLevel::for_probability(0.05), ConfidenceLevel::High);
  }

  #[test]
  fn test_sigmoid_and_rounding() {
    assert_eq!(sigmoid(0.0), 0.5);
    assert!(sigmoid(40.0) > 0.999_999);
    assert_eq!(round_to(0.246_196_82, 4), 0.2462);
    assert_eq!(round_to(0.999_964_78, 4), 1.0);
  }

  #[test]
  fn test_rounding_follows_decimal_expansion() {
    // 2.55 is stored just below the tie, 2.35 just above it
    assert_eq!(round_to(2.55, 1), 2.5);
    assert_eq!(round_to(2.35, 1), 2.4);
    assert_eq!(round_to(1.005, 2), 1.0);
    assert_eq!(round_to(0.000_349_9, 4), 0.0003);
  }

  #[test]
  fn test_contributions_sum_to_predictor() {
    let input = first_sample_row();
    let total: f64 = PIMA_COEFFICIENTS.contributions(&input).iter().map(|(_, c)| c).sum();
    let z = PIMA_COEFFICIENTS.linear_predictor(&input);
    assert!((PIMA_COEFFICIENTS.intercept + total - z).abs() < 1e-9);
  }

  #[test]
  fn test_result_json_shape() {
    let result = predict(&first_sample_row()).unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["prediction"], "Diabetic");
    assert_eq!(json["confidenceLevel"], "High");
    assert_eq!(json["riskFactors"][0], "High glucose level");

    let non = serde_json::to_value(Prediction::NonDiabetic).unwrap();
    assert_eq!(non, "Non-Diabetic");
  }
}
