//! Static sample of the Pima Indians Diabetes dataset (first 20 records)

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::features::{normalize_name, Feature, PatientInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Outcome {
  NonDiabetic,
  Diabetic,
}

impl Outcome {
  pub fn code(self) -> u8 {
    match self {
      Outcome::NonDiabetic => 0,
      Outcome::Diabetic => 1,
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Outcome::NonDiabetic => "Non-Diabetic",
      Outcome::Diabetic => "Diabetic",
    }
  }
}

impl From<Outcome> for u8 {
  fn from(outcome: Outcome) -> Self {
    outcome.code()
  }
}

impl TryFrom<u8> for Outcome {
  type Error = String;

  fn try_from(code: u8) -> Result<Self, Self::Error> {
    match code {
      0 => Ok(Outcome::NonDiabetic),
      1 => Ok(Outcome::Diabetic),
      other => Err(format!("outcome must be 0 or 1, got {other}")),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPoint {
  pub id: u32,
  #[serde(flatten)]
  pub input: PatientInput,
  pub outcome: Outcome,
}

/// Sortable, displayable table column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
  Id,
  Feature(Feature),
  Outcome,
}

impl Column {
  pub fn all() -> Vec<Column> {
    let mut columns = vec![Column::Id];
    columns.extend(Feature::ALL.into_iter().map(Column::Feature));
    columns.push(Column::Outcome);
    columns
  }

  pub fn header(self) -> &'static str {
    match self {
      Column::Id => "ID",
      Column::Feature(Feature::Pregnancies) => "Pregnancies",
      Column::Feature(Feature::Glucose) => "Glucose",
      Column::Feature(Feature::BloodPressure) => "Blood Pressure",
      Column::Feature(Feature::SkinThickness) => "Skin Thickness",
      Column::Feature(Feature::Insulin) => "Insulin",
      Column::Feature(Feature::Bmi) => "BMI",
      Column::Feature(Feature::DiabetesPedigree) => "Pedigree",
      Column::Feature(Feature::Age) => "Age",
      Column::Outcome => "Outcome",
    }
  }

  /// Numeric value used for ordering
  pub fn value(self, row: &DataPoint) -> f64 {
    match self {
      Column::Id => f64::from(row.id),
      Column::Feature(feature) => row.input.get(feature),
      Column::Outcome => f64::from(row.outcome.code()),
    }
  }

  /// Display text for a cell
  pub fn format(self, row: &DataPoint) -> String {
    match self {
      Column::Id => row.id.to_string(),
      Column::Feature(Feature::Bmi) => format!("{:.1}", row.input.bmi),
      Column::Feature(Feature::DiabetesPedigree) => format!("{:.3}", row.input.diabetes_pedigree),
      Column::Feature(feature) => format!("{:.0}", row.input.get(feature)),
      Column::Outcome => row.outcome.label().to_string(),
    }
  }

  pub fn compare(self, a: &DataPoint, b: &DataPoint) -> Ordering {
    self.value(a).total_cmp(&self.value(b))
  }
}

impl fmt::Display for Column {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.header())
  }
}

impl FromStr for Column {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match normalize_name(s).as_str() {
      "id" => Ok(Column::Id),
      "outcome" => Ok(Column::Outcome),
      _ => s.parse::<Feature>().map(Column::Feature).map_err(|e| e.to_string()),
    }
  }
}

impl DataPoint {
  /// Plain text of every value, as matched by the table search
  pub fn search_values(&self) -> Vec<String> {
    let mut values = vec![self.id.to_string()];
    values.extend(Feature::ALL.into_iter().map(|f| self.input.get(f).to_string()));
    values.push(self.outcome.code().to_string());
    values
  }
}

#[allow(clippy::too_many_arguments)]
const fn row(
  id: u32,
  pregnancies: f64,
  glucose: f64,
  blood_pressure: f64,
  skin_thickness: f64,
  insulin: f64,
  bmi: f64,
  diabetes_pedigree: f64,
  age: f64,
  outcome: u8,
) -> DataPoint {
  DataPoint {
    id,
    input: PatientInput {
      pregnancies,
      glucose,
      blood_pressure,
      skin_thickness,
      insulin,
      bmi,
      diabetes_pedigree,
      age,
    },
    outcome: if outcome == 1 { Outcome::Diabetic } else { Outcome::NonDiabetic },
  }
}

// id, preg, glucose, bp, skin, insulin, bmi, pedigree, age, outcome
const SAMPLE: [DataPoint; 20] = [
  row(1, 6.0, 148.0, 72.0, 35.0, 0.0, 33.6, 0.627, 50.0, 1),
  row(2, 1.0, 85.0, 66.0, 29.0, 0.0, 26.6, 0.351, 31.0, 0),
  row(3, 8.0, 183.0, 64.0, 0.0, 0.0, 23.3, 0.672, 32.0, 1),
  row(4, 1.0, 89.0, 66.0, 23.0, 94.0, 28.1, 0.167, 21.0, 0),
  row(5, 0.0, 137.0, 40.0, 35.0, 168.0, 43.1, 2.288, 33.0, 1),
  row(6, 5.0, 116.0, 74.0, 0.0, 0.0, 25.6, 0.201, 30.0, 0),
  row(7, 3.0, 78.0, 50.0, 32.0, 88.0, 31.0, 0.248, 26.0, 1),
  row(8, 10.0, 115.0, 0.0, 0.0, 0.0, 35.3, 0.134, 29.0, 0),
  row(9, 2.0, 197.0, 70.0, 45.0, 543.0, 30.5, 0.158, 53.0, 1),
  row(10, 8.0, 125.0, 96.0, 0.0, 0.0, 0.0, 0.232, 54.0, 1),
  row(11, 4.0, 110.0, 92.0, 0.0, 0.0, 37.6, 0.191, 30.0, 0),
  row(12, 10.0, 168.0, 74.0, 0.0, 0.0, 38.0, 0.537, 34.0, 1),
  row(13, 10.0, 139.0, 80.0, 0.0, 0.0, 27.1, 1.441, 57.0, 0),
  row(14, 1.0, 189.0, 60.0, 23.0, 846.0, 30.1, 0.398, 59.0, 1),
  row(15, 5.0, 166.0, 72.0, 19.0, 175.0, 25.8, 0.587, 51.0, 1),
  row(16, 7.0, 100.0, 0.0, 0.0, 0.0, 30.0, 0.484, 32.0, 1),
  row(17, 0.0, 118.0, 84.0, 47.0, 230.0, 45.8, 0.551, 31.0, 1),
  row(18, 7.0, 107.0, 74.0, 0.0, 0.0, 29.6, 0.254, 31.0, 1),
  row(19, 1.0, 103.0, 30.0, 38.0, 83.0, 43.3, 0.183, 33.0, 0),
  row(20, 1.0, 115.0, 70.0, 30.0, 96.0, 34.6, 0.529, 32.0, 1),
];

pub fn sample() -> &'static [DataPoint] {
  &SAMPLE
}
