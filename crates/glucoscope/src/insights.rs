//! Precomputed chart data for the full 768-record dataset
//!
//! These figures are fixed; they describe the dataset and a set of models
//! evaluated offline and are shown for reference only.

use serde::Serialize;

use crate::features::Feature;
use Feature::{
  Age, BloodPressure, Bmi, DiabetesPedigree, Glucose, Insulin, Pregnancies, SkinThickness,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureImportance {
  pub feature: Feature,
  pub importance: f64,
}

const IMPORTANCE: [FeatureImportance; 8] = [
  FeatureImportance { feature: Feature::Glucose, importance: 0.242 },
  FeatureImportance { feature: Feature::Bmi, importance: 0.201 },
  FeatureImportance { feature: Feature::Age, importance: 0.152 },
  FeatureImportance { feature: Feature::DiabetesPedigree, importance: 0.118 },
  FeatureImportance { feature: Feature::Pregnancies, importance: 0.111 },
  FeatureImportance { feature: Feature::BloodPressure, importance: 0.088 },
  FeatureImportance { feature: Feature::SkinThickness, importance: 0.051 },
  FeatureImportance { feature: Feature::Insulin, importance: 0.037 },
];

/// Most important first
pub fn feature_importance() -> Vec<FeatureImportance> {
  let mut ranked = IMPORTANCE.to_vec();
  ranked.sort_by(|a, b| b.importance.total_cmp(&a.importance));
  ranked
}

/// The features shown on the "key risk factors" card
pub fn key_risk_factors(count: usize) -> Vec<FeatureImportance> {
  feature_importance().into_iter().take(count).collect()
}

/// Histogram of one feature: bin lower edges and their counts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
  pub feature: Feature,
  pub bins: &'static [u32],
  pub counts: &'static [u32],
}

impl Distribution {
  pub fn buckets(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
    self.bins.iter().copied().zip(self.counts.iter().copied())
  }

  pub fn max_count(&self) -> u32 {
    self.counts.iter().copied().max().unwrap_or(0)
  }

  pub fn total(&self) -> u32 {
    self.counts.iter().sum()
  }
}

/// Only six features have a precomputed histogram
pub fn distribution(feature: Feature) -> Option<Distribution> {
  let (bins, counts): (&'static [u32], &'static [u32]) = match feature {
    Feature::Pregnancies => (
      &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10],
      &[111, 135, 103, 75, 68, 57, 50, 45, 38, 28, 38],
    ),
    Feature::Glucose => (&[0, 40, 80, 120, 160, 200], &[5, 25, 190, 320, 170, 58]),
    Feature::BloodPressure => (&[0, 30, 60, 90, 120], &[35, 15, 410, 295, 13]),
    Feature::SkinThickness => {
      (&[0, 10, 20, 30, 40, 50, 60], &[227, 43, 213, 165, 95, 25, 0])
    }
    Feature::Insulin => (
      &[0, 100, 200, 300, 400, 500, 600, 700, 800],
      &[374, 170, 102, 55, 26, 16, 15, 8, 2],
    ),
    Feature::Bmi => (&[0, 10, 20, 30, 40, 50, 60, 70], &[11, 5, 133, 325, 168, 22, 3, 1]),
    Feature::DiabetesPedigree | Feature::Age => return None,
  };
  Some(Distribution { feature, bins, counts })
}

pub fn distribution_features() -> Vec<Feature> {
  Feature::ALL.into_iter().filter(|f| distribution(*f).is_some()).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassCount {
  pub name: &'static str,
  pub value: u32,
}

pub const CLASS_DISTRIBUTION: [ClassCount; 2] = [
  ClassCount { name: "Non-Diabetic", value: 500 },
  ClassCount { name: "Diabetic", value: 268 },
];

/// Each class with its share of the whole, in percent
pub fn class_shares() -> Vec<(ClassCount, f64)> {
  let total: u32 = CLASS_DISTRIBUTION.iter().map(|c| c.value).sum();
  CLASS_DISTRIBUTION
    .iter()
    .map(|c| (*c, f64::from(c.value) / f64::from(total) * 100.0))
    .collect()
}

/// Either one of the model inputs or the class label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Variable {
  Feature(Feature),
  Outcome,
}

impl Variable {
  pub fn all() -> Vec<Variable> {
    let mut all: Vec<Variable> = Feature::ALL.into_iter().map(Variable::Feature).collect();
    all.push(Variable::Outcome);
    all
  }

  pub fn label(self) -> &'static str {
    match self {
      Variable::Feature(f) => f.label(),
      Variable::Outcome => "Outcome",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Correlation {
  pub first: Variable,
  pub second: Variable,
  pub coefficient: f64,
}

const fn pair(first: Feature, second: Feature, coefficient: f64) -> Correlation {
  Correlation { first: Variable::Feature(first), second: Variable::Feature(second), coefficient }
}

const fn with_outcome(feature: Feature, coefficient: f64) -> Correlation {
  Correlation { first: Variable::Feature(feature), second: Variable::Outcome, coefficient }
}

/// Upper triangle of the correlation matrix
pub const CORRELATIONS: [Correlation; 36] = [
  pair(Pregnancies, Glucose, 0.129),
  pair(Pregnancies, BloodPressure, 0.141),
  pair(Pregnancies, SkinThickness, 0.018),
  pair(Pregnancies, Insulin, -0.012),
  pair(Pregnancies, Bmi, 0.017),
  pair(Pregnancies, DiabetesPedigree, -0.034),
  pair(Pregnancies, Age, 0.544),
  with_outcome(Pregnancies, 0.222),
  pair(Glucose, BloodPressure, 0.153),
  pair(Glucose, SkinThickness, 0.057),
  pair(Glucose, Insulin, 0.331),
  pair(Glucose, Bmi, 0.222),
  pair(Glucose, DiabetesPedigree, 0.137),
  pair(Glucose, Age, 0.264),
  with_outcome(Glucose, 0.467),
  pair(BloodPressure, SkinThickness, 0.207),
  pair(BloodPressure, Insulin, 0.089),
  pair(BloodPressure, Bmi, 0.282),
  pair(BloodPressure, DiabetesPedigree, 0.041),
  pair(BloodPressure, Age, 0.240),
  with_outcome(BloodPressure, 0.065),
  pair(SkinThickness, Insulin, 0.436),
  pair(SkinThickness, Bmi, 0.392),
  pair(SkinThickness, DiabetesPedigree, 0.184),
  pair(SkinThickness, Age, -0.114),
  with_outcome(SkinThickness, 0.075),
  pair(Insulin, Bmi, 0.197),
  pair(Insulin, DiabetesPedigree, 0.185),
  pair(Insulin, Age, -0.042),
  with_outcome(Insulin, 0.130),
  pair(Bmi, DiabetesPedigree, 0.141),
  pair(Bmi, Age, 0.036),
  with_outcome(Bmi, 0.293),
  pair(DiabetesPedigree, Age, 0.034),
  with_outcome(DiabetesPedigree, 0.174),
  with_outcome(Age, 0.238),
];

/// Symmetric lookup; a variable correlates perfectly with itself
pub fn correlation(a: Variable, b: Variable) -> Option<f64> {
  if a == b {
    return Some(1.0);
  }
  CORRELATIONS
    .iter()
    .find(|c| (c.first == a && c.second == b) || (c.first == b && c.second == a))
    .map(|c| c.coefficient)
}

/// Correlation of each feature with the outcome, strongest first
pub fn outcome_correlations() -> Vec<(Feature, f64)> {
  let mut ranked: Vec<(Feature, f64)> = CORRELATIONS
    .iter()
    .filter_map(|c| match (c.first, c.second) {
      (Variable::Feature(f), Variable::Outcome) => Some((f, c.coefficient)),
      _ => None,
    })
    .collect();
  ranked.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));
  ranked
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelPerformance {
  pub name: &'static str,
  pub accuracy: f64,
  pub precision: f64,
  pub recall: f64,
  pub f1_score: f64,
  pub auc: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
  Accuracy,
  Precision,
  Recall,
  F1Score,
  Auc,
}

impl Metric {
  pub const ALL: [Metric; 5] =
    [Metric::Accuracy, Metric::Precision, Metric::Recall, Metric::F1Score, Metric::Auc];

  pub fn label(self) -> &'static str {
    match self {
      Metric::Accuracy => "Accuracy",
      Metric::Precision => "Precision",
      Metric::Recall => "Recall",
      Metric::F1Score => "F1 Score",
      Metric::Auc => "AUC-ROC",
    }
  }
}

impl ModelPerformance {
  pub fn metric(&self, metric: Metric) -> f64 {
    match metric {
      Metric::Accuracy => self.accuracy,
      Metric::Precision => self.precision,
      Metric::Recall => self.recall,
      Metric::F1Score => self.f1_score,
      Metric::Auc => self.auc,
    }
  }
}

pub const MODEL_PERFORMANCE: [ModelPerformance; 4] = [
  ModelPerformance {
    name: "Logistic Regression",
    accuracy: 0.78,
    precision: 0.72,
    recall: 0.61,
    f1_score: 0.66,
    auc: 0.82,
  },
  ModelPerformance {
    name: "Decision Tree",
    accuracy: 0.74,
    precision: 0.67,
    recall: 0.66,
    f1_score: 0.66,
    auc: 0.70,
  },
  ModelPerformance {
    name: "Random Forest",
    accuracy: 0.82,
    precision: 0.77,
    recall: 0.69,
    f1_score: 0.73,
    auc: 0.86,
  },
  ModelPerformance {
    name: "Gradient Boosting",
    accuracy: 0.84,
    precision: 0.79,
    recall: 0.72,
    f1_score: 0.75,
    auc: 0.88,
  },
];

pub fn best_model() -> &'static ModelPerformance {
  MODEL_PERFORMANCE
    .iter()
    .max_by(|a, b| a.accuracy.total_cmp(&b.accuracy))
    .unwrap_or(&MODEL_PERFORMANCE[0])
}

/// Test-set confusion matrix of the best model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfusionMatrix {
  pub true_negative: u32,
  pub false_positive: u32,
  pub false_negative: u32,
  pub true_positive: u32,
}

pub const CONFUSION_MATRIX: ConfusionMatrix =
  ConfusionMatrix { true_negative: 102, false_positive: 23, false_negative: 15, true_positive: 38 };

fn ratio(numerator: u32, denominator: u32) -> f64 {
  if denominator == 0 {
    0.0
  } else {
    f64::from(numerator) / f64::from(denominator)
  }
}

impl ConfusionMatrix {
  pub fn total(&self) -> u32 {
    self.true_negative + self.false_positive + self.false_negative + self.true_positive
  }

  pub fn accuracy(&self) -> f64 {
    ratio(self.true_positive + self.true_negative, self.total())
  }

  pub fn precision(&self) -> f64 {
    ratio(self.true_positive, self.true_positive + self.false_positive)
  }

  pub fn recall(&self) -> f64 {
    ratio(self.true_positive, self.true_positive + self.false_negative)
  }

  pub fn specificity(&self) -> f64 {
    ratio(self.true_negative, self.true_negative + self.false_positive)
  }
}
