//! Model input features, their accepted ranges and the patient input record.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{RangeViolation, ValidationError};

/// Closed interval a feature value must fall into
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRange {
  pub min: f64,
  pub max: f64,
}

impl FeatureRange {
  pub const fn new(min: f64, max: f64) -> Self {
    Self { min, max }
  }

  /// NaN is never contained
  pub fn contains(&self, value: f64) -> bool {
    value >= self.min && value <= self.max
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Feature {
  Pregnancies,
  Glucose,
  BloodPressure,
  SkinThickness,
  Insulin,
  Bmi,
  DiabetesPedigree,
  Age,
}

impl Feature {
  pub const ALL: [Feature; 8] = [
    Feature::Pregnancies,
    Feature::Glucose,
    Feature::BloodPressure,
    Feature::SkinThickness,
    Feature::Insulin,
    Feature::Bmi,
    Feature::DiabetesPedigree,
    Feature::Age,
  ];

  /// camelCase field name used in JSON input
  pub fn key(self) -> &'static str {
    match self {
      Feature::Pregnancies => "pregnancies",
      Feature::Glucose => "glucose",
      Feature::BloodPressure => "bloodPressure",
      Feature::SkinThickness => "skinThickness",
      Feature::Insulin => "insulin",
      Feature::Bmi => "bmi",
      Feature::DiabetesPedigree => "diabetesPedigree",
      Feature::Age => "age",
    }
  }

  /// Name used on charts and in the correlation matrix
  pub fn label(self) -> &'static str {
    match self {
      Feature::Pregnancies => "Pregnancies",
      Feature::Glucose => "Glucose",
      Feature::BloodPressure => "BloodPressure",
      Feature::SkinThickness => "SkinThickness",
      Feature::Insulin => "Insulin",
      Feature::Bmi => "BMI",
      Feature::DiabetesPedigree => "DiabetesPedigree",
      Feature::Age => "Age",
    }
  }

  pub fn description(self) -> &'static str {
    match self {
      Feature::Pregnancies => "Number of times pregnant",
      Feature::Glucose => {
        "Plasma glucose concentration (2 hours in an oral glucose tolerance test)"
      }
      Feature::BloodPressure => "Diastolic blood pressure (mm Hg)",
      Feature::SkinThickness => "Triceps skin fold thickness (mm)",
      Feature::Insulin => "2-Hour serum insulin (mu U/ml)",
      Feature::Bmi => "Body mass index (weight in kg/(height in m)^2)",
      Feature::DiabetesPedigree => {
        "Diabetes pedigree function (a function which scores likelihood of diabetes based on family history)"
      }
      Feature::Age => "Age in years",
    }
  }

  pub fn range(self) -> FeatureRange {
    match self {
      Feature::Pregnancies => FeatureRange::new(0.0, 17.0),
      Feature::Glucose => FeatureRange::new(0.0, 199.0),
      Feature::BloodPressure => FeatureRange::new(0.0, 122.0),
      Feature::SkinThickness => FeatureRange::new(0.0, 99.0),
      Feature::Insulin => FeatureRange::new(0.0, 846.0),
      Feature::Bmi => FeatureRange::new(0.0, 67.1),
      Feature::DiabetesPedigree => FeatureRange::new(0.078, 2.42),
      Feature::Age => FeatureRange::new(21.0, 81.0),
    }
  }
}

impl fmt::Display for Feature {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFeature(pub String);

impl fmt::Display for UnknownFeature {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let known: Vec<&str> = Feature::ALL.iter().map(|f| f.key()).collect();
    write!(f, "unknown feature '{}' (expected one of: {})", self.0, known.join(", "))
  }
}

impl std::error::Error for UnknownFeature {}

/// Lowercase with separators removed, so `blood-pressure`, `blood_pressure`
/// and `BloodPressure` all compare equal.
pub(crate) fn normalize_name(name: &str) -> String {
  name.chars().filter(|c| c.is_alphanumeric()).flat_map(char::to_lowercase).collect()
}

impl FromStr for Feature {
  type Err = UnknownFeature;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let wanted = normalize_name(s);
    if wanted == "pedigree" {
      return Ok(Feature::DiabetesPedigree);
    }
    Feature::ALL
      .into_iter()
      .find(|f| normalize_name(f.key()) == wanted)
      .ok_or_else(|| UnknownFeature(s.to_string()))
  }
}

/// Values submitted for scoring
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientInput {
  pub pregnancies: f64,
  pub glucose: f64,
  pub blood_pressure: f64,
  pub skin_thickness: f64,
  pub insulin: f64,
  pub bmi: f64,
  pub diabetes_pedigree: f64,
  pub age: f64,
}

impl Default for PatientInput {
  fn default() -> Self {
    Self {
      pregnancies: 0.0,
      glucose: 120.0,
      blood_pressure: 70.0,
      skin_thickness: 20.0,
      insulin: 80.0,
      bmi: 25.0,
      diabetes_pedigree: 0.5,
      age: 30.0,
    }
  }
}

impl PatientInput {
  pub fn get(&self, feature: Feature) -> f64 {
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

  pub fn set(&mut self, feature: Feature, value: f64) {
    let slot = match feature {
      Feature::Pregnancies => &mut self.pregnancies,
      Feature::Glucose => &mut self.glucose,
      Feature::BloodPressure => &mut self.blood_pressure,
      Feature::SkinThickness => &mut self.skin_thickness,
      Feature::Insulin => &mut self.insulin,
      Feature::Bmi => &mut self.bmi,
      Feature::DiabetesPedigree => &mut self.diabetes_pedigree,
      Feature::Age => &mut self.age,
    };
    *slot = value;
  }

  /// Builder-style `set`
  pub fn with(mut self, feature: Feature, value: f64) -> Self {
    self.set(feature, value);
    self
  }
}

/// Check every field against its range, collecting all violations
pub fn validate(input: &PatientInput) -> Result<(), ValidationError> {
  let violations: Vec<RangeViolation> = Feature::ALL
    .into_iter()
    .filter_map(|feature| {
      let value = input.get(feature);
      let range = feature.range();
      (!range.contains(value)).then_some(RangeViolation { feature, value, range })
    })
    .collect();

  if violations.is_empty() {
    Ok(())
  } else {
    Err(ValidationError { violations })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_input_is_valid() {
    assert!(validate(&PatientInput::default()).is_ok());
  }

  #[test]
  fn test_range_bounds_are_inclusive() {
    for feature in Feature::ALL {
      let range = feature.range();
      let low = PatientInput::default().with(feature, range.min);
      let high = PatientInput::default().with(feature, range.max);
      assert!(validate(&low).is_ok(), "{feature} min should be accepted");
      assert!(validate(&high).is_ok(), "{feature} max should be accepted");
    }
  }

  #[test]
  fn test_out_of_range_values_rejected() {
    let input = PatientInput::default()
      .with(Feature::Glucose, 200.0)
      .with(Feature::Age, 20.0)
      .with(Feature::DiabetesPedigree, 0.05);

    let err = validate(&input).unwrap_err();
    let rejected: Vec<Feature> = err.violations.iter().map(|v| v.feature).collect();
    assert_eq!(rejected, vec![Feature::Glucose, Feature::DiabetesPedigree, Feature::Age]);
    assert_eq!(err.violations[0].value, 200.0);
  }

  #[test]
  fn test_nan_is_out_of_range() {
    let input = PatientInput::default().with(Feature::Bmi, f64::NAN);
    assert!(validate(&input).is_err());
  }

  #[test]
  fn test_bmi_upper_bound_is_fractional() {
    assert!(validate(&PatientInput::default().with(Feature::Bmi, 67.1)).is_ok());
    assert!(validate(&PatientInput::default().with(Feature::Bmi, 67.2)).is_err());
  }

  #[test]
  fn test_feature_parsing() {
    assert_eq!("glucose".parse::<Feature>().unwrap(), Feature::Glucose);
    assert_eq!("bloodPressure".parse::<Feature>().unwrap(), Feature::BloodPressure);
    assert_eq!("blood-pressure".parse::<Feature>().unwrap(), Feature::BloodPressure);
    assert_eq!("SKIN_THICKNESS".parse::<Feature>().unwrap(), Feature::SkinThickness);
    assert_eq!("BMI".parse::<Feature>().unwrap(), Feature::Bmi);
    assert_eq!("pedigree".parse::<Feature>().unwrap(), Feature::DiabetesPedigree);
    assert!("height".parse::<Feature>().is_err());
  }

  #[test]
  fn test_get_set_cover_every_feature() {
    let mut input = PatientInput::default();
    for (i, feature) in Feature::ALL.into_iter().enumerate() {
      input.set(feature, i as f64 + 0.5);
    }
    for (i, feature) in Feature::ALL.into_iter().enumerate() {
      assert_eq!(input.get(feature), i as f64 + 0.5);
    }
  }

  #[test]
  fn test_input_json_uses_camel_case() {
    let json = serde_json::to_value(PatientInput::default()).unwrap();
    assert_eq!(json["bloodPressure"], 70.0);
    assert_eq!(json["diabetesPedigree"], 0.5);

    let parsed: PatientInput = serde_json::from_str(
      r#"{"pregnancies":6,"glucose":148,"bloodPressure":72,"skinThickness":35,
          "insulin":0,"bmi":33.6,"diabetesPedigree":0.627,"age":50}"#,
    )
    .unwrap();
    assert_eq!(parsed.glucose, 148.0);
    assert_eq!(parsed.diabetes_pedigree, 0.627);
  }
}
