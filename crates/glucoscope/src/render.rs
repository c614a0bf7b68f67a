//! Terminal rendering of the dashboard sections
//!
//! Every function returns the finished text; printing is left to the caller.

use colored::*;
use std::fmt::Write;

use crate::dataset::Column;
use crate::error::ValidationError;
use crate::features::{Feature, PatientInput};
use crate::insights::{self, Distribution, Metric, Variable};
use crate::model::{ConfidenceLevel, Prediction, PredictionResult, PIMA_COEFFICIENTS};
use crate::table::{SortDirection, TableView};

const LABEL_WIDTH: usize = 18;
const BAR_CHAR: char = '█';

pub const DISCLAIMER: &str = "This prediction is based on a simplified logistic regression model \
trained on the Pima Indians Diabetes Dataset. It should not replace professional medical advice.";

/// Bar of up to `width` cells, proportional to `value / max`
pub fn bar(value: f64, max: f64, width: usize) -> String {
  if max <= 0.0 || value <= 0.0 {
    return String::new();
  }
  let cells = ((value / max).min(1.0) * width as f64).round() as usize;
  BAR_CHAR.to_string().repeat(cells)
}

fn bar_width(total_width: usize) -> usize {
  total_width.saturating_sub(LABEL_WIDTH + 12).max(10)
}

/// Section title framed by rules
pub fn section(title: &str, width: usize) -> String {
  let mut out = String::new();
  for line in herald::banner(title, width, '=') {
    let _ = writeln!(out, "{}", line.bold());
  }
  out
}

fn percent(value: f64) -> String {
  format!("{:.1}%", value * 100.0)
}

pub fn render_prediction(input: &PatientInput, result: &PredictionResult) -> String {
  let mut out = String::new();

  let verdict = match result.prediction {
    Prediction::Diabetic => result.prediction.label().red().bold(),
    Prediction::NonDiabetic => result.prediction.label().green().bold(),
  };
  let _ = writeln!(out, "{} ({} probability)", verdict, percent(result.probability));

  let confidence = match result.confidence_level {
    ConfidenceLevel::High => result.confidence_level.to_string().bold(),
    _ => result.confidence_level.to_string().normal(),
  };
  let _ = writeln!(out, "Confidence: {confidence}");
  out.push('\n');

  let _ = writeln!(out, "{}", "Input".bold());
  for feature in Feature::ALL {
    let _ = writeln!(out, "  {:<LABEL_WIDTH$} {}", feature.label(), input.get(feature));
  }
  out.push('\n');

  let _ = writeln!(out, "{}", "Contribution to linear predictor".bold());
  let _ = writeln!(out, "  {:<LABEL_WIDTH$} {:+.4}", "Intercept", PIMA_COEFFICIENTS.intercept);
  for (feature, term) in PIMA_COEFFICIENTS.contributions(input) {
    let _ = writeln!(out, "  {:<LABEL_WIDTH$} {:+.4}", feature.label(), term);
  }
  out.push('\n');

  if !result.risk_factors.is_empty() {
    let _ = writeln!(out, "{}", "Risk Factors Identified".yellow().bold());
    for factor in &result.risk_factors {
      let _ = writeln!(out, "  - {factor}");
    }
    out.push('\n');
  }

  let _ = writeln!(out, "{}", DISCLAIMER.dimmed());
  out
}

pub fn render_rejection(err: &ValidationError) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "{}", "Invalid input values".red().bold());
  let _ = writeln!(out, "Some input values are outside expected ranges:");
  for violation in &err.violations {
    let _ = writeln!(out, "  - {violation}");
  }
  out
}

pub fn render_feature_reference() -> String {
  let mut out = String::new();
  for feature in Feature::ALL {
    let range = feature.range();
    let _ = writeln!(
      out,
      "{} ({})  range {} - {}",
      feature.label().bold(),
      feature.key(),
      range.min,
      range.max
    );
    let _ = writeln!(out, "  {}", feature.description());
  }
  out
}

pub fn render_importance(width: usize) -> String {
  let ranked = insights::feature_importance();
  let max = ranked.first().map(|f| f.importance).unwrap_or(1.0);
  let mut out = String::new();
  for item in &ranked {
    let _ = writeln!(
      out,
      "{:<LABEL_WIDTH$} {} {}",
      item.feature.label(),
      bar(item.importance, max, bar_width(width)).cyan(),
      percent(item.importance)
    );
  }
  out
}

/// Top features by importance with their descriptions
pub fn render_key_factors(count: usize) -> String {
  let mut out = String::new();
  for item in insights::key_risk_factors(count) {
    let _ = writeln!(
      out,
      "{}  Importance: {}",
      item.feature.label().bold(),
      percent(item.importance)
    );
    let _ = writeln!(out, "  {}", bar(item.importance, 1.0, 40).blue());
    let _ = writeln!(out, "  {}", item.feature.description().dimmed());
  }
  out
}

pub fn render_distribution(distribution: &Distribution, width: usize) -> String {
  let max = f64::from(distribution.max_count());
  let mut out = String::new();
  let _ = writeln!(out, "{} (bin lower edge: frequency)", distribution.feature.label().bold());
  for (bin, count) in distribution.buckets() {
    let _ = writeln!(
      out,
      "{:>6} {} {}",
      bin,
      bar(f64::from(count), max, bar_width(width)).cyan(),
      count
    );
  }
  out
}

pub fn render_classes(width: usize) -> String {
  let mut out = String::new();
  for (class, share) in insights::class_shares() {
    let cells = bar(share, 100.0, bar_width(width));
    let colored_bar = if class.name == "Diabetic" { cells.red() } else { cells.cyan() };
    let _ = writeln!(
      out,
      "{:<LABEL_WIDTH$} {} {} patients ({:.0}%)",
      class.name, colored_bar, class.value, share
    );
  }
  out
}

pub fn render_outcome_correlations(width: usize) -> String {
  let mut out = String::new();
  let half = bar_width(width) / 2;
  for (feature, r) in insights::outcome_correlations() {
    // Axis spans -0.5..0.5
    let cells = bar(r.abs(), 0.5, half);
    let visual = if r < 0.0 {
      format!("{}|", format!("{cells:>half$}").red())
    } else {
      format!("{:>half$}|{}", "", cells.green())
    };
    let _ = writeln!(out, "{:<LABEL_WIDTH$} {visual} {r:+.3}", feature.label());
  }
  out
}

pub fn render_correlation_matrix() -> String {
  let vars = Variable::all();
  let mut out = String::new();
  let _ = write!(out, "{:<LABEL_WIDTH$}", "");
  for var in &vars {
    let _ = write!(out, "{:>8}", abbreviate(var.label()));
  }
  out.push('\n');

  for row in &vars {
    let _ = write!(out, "{:<LABEL_WIDTH$}", row.label());
    for col in &vars {
      let cell = match insights::correlation(*row, *col) {
        Some(r) => format!("{r:>8.3}"),
        None => format!("{:>8}", "-"),
      };
      let _ = write!(out, "{cell}");
    }
    out.push('\n');
  }
  out
}

fn abbreviate(label: &str) -> String {
  label.chars().take(7).collect()
}

pub fn render_models() -> String {
  let mut out = String::new();
  let _ = write!(out, "{}", herald::pad_visible(&"Model".bold().to_string(), 22));
  for metric in Metric::ALL {
    let _ = write!(out, "{:>10}", metric.label());
  }
  out.push('\n');

  let best = insights::best_model();
  for model in &insights::MODEL_PERFORMANCE {
    let name = if model.name == best.name { model.name.bold() } else { model.name.normal() };
    let _ = write!(out, "{}", herald::pad_visible(&name.to_string(), 22));
    for metric in Metric::ALL {
      let _ = write!(out, "{:>10}", percent(model.metric(metric)));
    }
    out.push('\n');
  }
  out
}

pub fn render_confusion_matrix() -> String {
  let cm = insights::CONFUSION_MATRIX;
  let best = insights::best_model();
  let mut out = String::new();
  let _ = writeln!(out, "Confusion matrix ({}, test data)", best.name);
  let _ = writeln!(out, "{:<22}{:>16}{:>16}", "", "Pred. negative", "Pred. positive");
  let _ = writeln!(
    out,
    "{:<22}{}{}",
    "Actual negative",
    format!("{:>16}", cm.true_negative).green(),
    format!("{:>16}", cm.false_positive).red()
  );
  let _ = writeln!(
    out,
    "{:<22}{}{}",
    "Actual positive",
    format!("{:>16}", cm.false_negative).red(),
    format!("{:>16}", cm.true_positive).green()
  );
  out.push('\n');
  let _ = writeln!(out, "Accuracy:    {}", percent(cm.accuracy()));
  let _ = writeln!(out, "Precision:   {}", percent(cm.precision()));
  let _ = writeln!(out, "Recall:      {}", percent(cm.recall()));
  let _ = writeln!(out, "Specificity: {}", percent(cm.specificity()));
  out
}

fn header_cell(column: Column, sort: Option<(Column, SortDirection)>) -> String {
  match sort {
    Some((sorted, direction)) if sorted == column => {
      format!("{} {}", column.header(), direction.arrow())
    }
    _ => column.header().to_string(),
  }
}

pub fn render_table(view: &TableView, sort: Option<(Column, SortDirection)>) -> String {
  let columns = Column::all();
  let headers: Vec<String> = columns.iter().map(|c| header_cell(*c, sort)).collect();
  let cells: Vec<Vec<String>> =
    view.rows.iter().map(|row| columns.iter().map(|c| c.format(row)).collect()).collect();

  let widths: Vec<usize> = (0..columns.len())
    .map(|i| {
      let longest = cells.iter().map(|r| r[i].chars().count()).max().unwrap_or(0);
      longest.max(headers[i].chars().count())
    })
    .collect();

  let mut out = String::new();
  let header_line: Vec<String> = headers
    .iter()
    .zip(&widths)
    .map(|(h, w)| herald::pad_visible(&h.bold().to_string(), *w))
    .collect();
  let _ = writeln!(out, "{}", header_line.join("  "));
  let total: usize = widths.iter().sum::<usize>() + 2 * (widths.len() - 1);
  let _ = writeln!(out, "{}", herald::rule(total, '-'));

  for (row, row_cells) in view.rows.iter().zip(&cells) {
    let line: Vec<String> = row_cells
      .iter()
      .zip(&widths)
      .zip(&columns)
      .map(|((text, w), column)| {
        let padded = format!("{text:<w$}", w = *w);
        match column {
          Column::Outcome if row.outcome.code() == 1 => padded.red().to_string(),
          Column::Outcome => padded.green().to_string(),
          _ => padded,
        }
      })
      .collect();
    let _ = writeln!(out, "{}", line.join("  "));
  }

  out.push('\n');
  let _ = writeln!(out, "{}   {}", view.summary(), view.page_label());
  out
}
