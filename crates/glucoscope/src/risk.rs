//! Threshold checks that flag individual risk factors

use crate::features::{Feature, PatientInput};

/// Flags `label` when the feature value is strictly above `threshold`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskRule {
  pub feature: Feature,
  pub threshold: f64,
  pub label: &'static str,
}

impl RiskRule {
  pub fn applies(&self, input: &PatientInput) -> bool {
    input.get(self.feature) > self.threshold
  }
}

/// Checked in order; output order follows this table
pub const RISK_RULES: [RiskRule; 5] = [
  RiskRule { feature: Feature::Glucose, threshold: 140.0, label: "High glucose level" },
  RiskRule { feature: Feature::Bmi, threshold: 30.0, label: "Obesity (high BMI)" },
  RiskRule { feature: Feature::Age, threshold: 45.0, label: "Age over 45" },
  RiskRule {
    feature: Feature::DiabetesPedigree,
    threshold: 0.8,
    label: "Family history of diabetes",
  },
  RiskRule { feature: Feature::BloodPressure, threshold: 90.0, label: "High blood pressure" },
];

pub fn identify_risk_factors(input: &PatientInput) -> Vec<String> {
  RISK_RULES.iter().filter(|rule| rule.applies(input)).map(|rule| rule.label.to_string()).collect()
}
