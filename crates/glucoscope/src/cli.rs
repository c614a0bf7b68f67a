//! Command-line interface and its command handlers
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::dataset::{self, Column};
use crate::error::PredictError;
use crate::features::{Feature, PatientInput};
use crate::insights;
use crate::model;
use crate::render;
use crate::table::{SortDirection, TableState};

#[derive(Parser)]
#[command(name = "glucoscope")]
#[command(
  about = "Glucoscope - Diabetes Risk Dashboard\nExplore the Pima Indians Diabetes sample and score patient values"
)]
#[command(version)]
pub struct Cli {
  /// Configuration file path
  #[arg(short, long, global = true, env = "GLUCOSCOPE_CONFIG")]
  pub config: Option<PathBuf>,

  /// Enable verbose logging
  #[arg(short, long, global = true)]
  pub verbose: bool,

  /// Disable colored output
  #[arg(long, global = true)]
  pub no_color: bool,

  #[command(subcommand)]
  pub command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum OutputFormat {
  #[default]
  Pretty,
  Json,
}

/// One optional flag per model input; unset flags fall back to form defaults
#[derive(Args, Debug, Default)]
pub struct FeatureArgs {
  /// Number of times pregnant (0-17)
  #[arg(long)]
  pub pregnancies: Option<f64>,
  /// Plasma glucose concentration (0-199)
  #[arg(long)]
  pub glucose: Option<f64>,
  /// Diastolic blood pressure in mm Hg (0-122)
  #[arg(long)]
  pub blood_pressure: Option<f64>,
  /// Triceps skin fold thickness in mm (0-99)
  #[arg(long)]
  pub skin_thickness: Option<f64>,
  /// 2-hour serum insulin in mu U/ml (0-846)
  #[arg(long)]
  pub insulin: Option<f64>,
  /// Body mass index (0-67.1)
  #[arg(long)]
  pub bmi: Option<f64>,
  /// Diabetes pedigree function (0.078-2.42)
  #[arg(long, alias = "pedigree")]
  pub diabetes_pedigree: Option<f64>,
  /// Age in years (21-81)
  #[arg(long)]
  pub age: Option<f64>,
}

impl FeatureArgs {
  fn value(&self, feature: Feature) -> Option<f64> {
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

  /// Flags override whatever `base` holds
  pub fn apply(&self, base: PatientInput) -> PatientInput {
    Feature::ALL
      .into_iter()
      .fold(base, |input, f| match self.value(f) {
        Some(v) => input.with(f, v),
        None => input,
      })
  }
}

#[derive(Subcommand)]
pub enum Commands {
  /// Score patient values with the logistic-regression model
  Predict {
    #[command(flatten)]
    features: FeatureArgs,
    /// Read a JSON PatientInput; flags still override its values
    #[arg(short, long)]
    input: Option<PathBuf>,
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,
  },
  /// Browse the 20-record dataset sample
  Data {
    /// Case-insensitive search across every value
    #[arg(short, long)]
    search: Option<String>,
    /// Column to sort by (id, glucose, bmi, outcome, ...)
    #[arg(long)]
    sort: Option<Column>,
    /// Sort descending
    #[arg(long, requires = "sort")]
    desc: bool,
    /// Page number, starting at 1
    #[arg(short, long, default_value_t = 1)]
    page: usize,
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,
  },
  /// Feature importance chart and key risk factors
  Importance,
  /// Histogram of a feature across the full dataset
  Distribution {
    /// Feature to show (pregnancies, glucose, bloodPressure, skinThickness, insulin, bmi)
    #[arg(default_value = "glucose")]
    feature: Feature,
  },
  /// Feature correlation with the outcome
  Correlations {
    /// Show the full correlation matrix
    #[arg(short, long)]
    matrix: bool,
  },
  /// Diabetic vs non-diabetic class balance
  Classes,
  /// Model comparison and confusion matrix of the best model
  Models,
  /// Describe every input feature and its accepted range
  Features,
  /// Every section in sequence
  Dashboard,
  /// Write a default configuration file
  Init {
    /// Destination file
    #[arg(default_value = ".glucoscope.json")]
    path: PathBuf,
    /// Overwrite an existing file
    #[arg(long)]
    force: bool,
  },
}

/// Outcome of a command that the binary maps to an exit code
#[derive(Debug, PartialEq, Eq)]
pub enum Status {
  Ok,
  Rejected,
}

impl Status {
  pub fn exit_code(&self) -> i32 {
    match self {
      Status::Ok => 0,
      Status::Rejected => 1,
    }
  }
}

impl Cli {
  /// `--no-color` wins over the config file
  pub fn color_enabled(&self, config: &Config) -> bool {
    config.color && !self.no_color
  }
}

/// Configuration for this invocation. `init` never reads an existing file,
/// so a broken config can be replaced with `init --force`.
pub fn load_config(cli: &Cli) -> Result<Config> {
  if let Commands::Init { .. } = cli.command {
    return Ok(Config::default());
  }
  Config::resolve(cli.config.as_deref()).context("Failed to load configuration")
}

pub fn run(cli: &Cli, config: &Config) -> Result<Status> {
  tracing::debug!(
    rows_per_page = config.table.rows_per_page,
    form_overrides = config.form.len(),
    "resolved configuration"
  );
  let width = herald::terminal_width();

  match &cli.command {
    Commands::Predict { features, input, format } => {
      predict_command(config, features, input.as_deref(), *format)
    }
    Commands::Data { search, sort, desc, page, format } => {
      let direction = if *desc { SortDirection::Desc } else { SortDirection::Asc };
      let query =
        DataQuery { search: search.as_deref(), sort: sort.map(|c| (c, direction)), page: *page };
      data_command(config, &query, *format)
    }
    Commands::Importance => {
      print!("{}", render::section("Feature Importance", width));
      print!("{}", render::render_importance(width));
      println!();
      print!("{}", render::section("Key Risk Factors", width));
      print!("{}", render::render_key_factors(4));
      Ok(Status::Ok)
    }
    Commands::Distribution { feature } => {
      let Some(distribution) = insights::distribution(*feature) else {
        let available: Vec<&str> =
          insights::distribution_features().iter().map(|f| f.key()).collect();
        anyhow::bail!(
          "No distribution data for {}; available: {}",
          feature.key(),
          available.join(", ")
        );
      };
      print!("{}", render::section("Feature Distribution", width));
      print!("{}", render::render_distribution(&distribution, width));
      Ok(Status::Ok)
    }
    Commands::Correlations { matrix } => {
      if *matrix {
        print!("{}", render::section("Correlation Matrix", width));
        print!("{}", render::render_correlation_matrix());
      } else {
        print!("{}", render::section("Feature Correlation with Outcome", width));
        print!("{}", render::render_outcome_correlations(width));
      }
      Ok(Status::Ok)
    }
    Commands::Classes => {
      print!("{}", render::section("Class Distribution", width));
      print!("{}", render::render_classes(width));
      Ok(Status::Ok)
    }
    Commands::Models => {
      print_models(width);
      Ok(Status::Ok)
    }
    Commands::Features => {
      print!("{}", render::section("Features", width));
      print!("{}", render::render_feature_reference());
      Ok(Status::Ok)
    }
    Commands::Dashboard => dashboard(config, width),
    Commands::Init { path, force } => init_command(path, *force),
  }
}

fn init_command(path: &Path, force: bool) -> Result<Status> {
  if path.exists() && !force {
    anyhow::bail!("{} already exists; pass --force to overwrite it", path.display());
  }
  Config::default()
    .save_to_file(path)
    .with_context(|| format!("Failed to write configuration to {}", path.display()))?;
  herald::success!("Wrote default configuration to {}", path.display());
  herald::info!("Set form values and table.rows_per_page there to change the defaults");
  Ok(Status::Ok)
}

fn print_models(width: usize) {
  print!("{}", render::section("Model Performance", width));
  print!("{}", render::render_models());
  println!();
  print!("{}", render::render_confusion_matrix());
}

/// Read a JSON `PatientInput` file
pub fn load_input(path: &Path) -> Result<PatientInput> {
  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read input file {}", path.display()))?;
  serde_json::from_str(&content)
    .with_context(|| format!("Failed to parse input file {}", path.display()))
}

/// Form defaults, then the input file, then individual flags
pub fn resolve_input(
  config: &Config,
  features: &FeatureArgs,
  input: Option<&Path>,
) -> Result<PatientInput> {
  let base = match input {
    Some(path) => load_input(path)?,
    None => config.form_defaults(),
  };
  Ok(features.apply(base))
}

fn predict_command(
  config: &Config,
  features: &FeatureArgs,
  input: Option<&Path>,
  format: OutputFormat,
) -> Result<Status> {
  let patient = resolve_input(config, features, input)?;
  herald::verbose!("scoring {}", serde_json::to_string(&patient)?);

  match model::predict(&patient) {
    Ok(result) => {
      match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Pretty => print!("{}", render::render_prediction(&patient, &result)),
      }
      Ok(Status::Ok)
    }
    Err(PredictError::InvalidInput(err)) => {
      match format {
        OutputFormat::Json => {
          let body = serde_json::json!({
            "error": "Invalid input values",
            "violations": err.violations.iter().map(ToString::to_string).collect::<Vec<_>>(),
          });
          println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Pretty => eprint!("{}", render::render_rejection(&err)),
      }
      herald::error!("Prediction Error: please check your inputs");
      Ok(Status::Rejected)
    }
  }
}

pub struct DataQuery<'q> {
  pub search: Option<&'q str>,
  pub sort: Option<(Column, SortDirection)>,
  pub page: usize,
}

fn data_command(config: &Config, query: &DataQuery, format: OutputFormat) -> Result<Status> {
  let mut state = TableState::with_rows_per_page(dataset::sample(), config.table.rows_per_page);
  if let Some(term) = query.search {
    state.set_search(term);
  }
  if let Some((column, direction)) = query.sort {
    state.set_sort(column, direction);
  }
  state.go_to_page(query.page);
  if state.page() != query.page {
    herald::warn!("page {} is out of range, showing page {}", query.page, state.page());
  }

  let view = state.view();
  match format {
    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view.rows)?),
    OutputFormat::Pretty => {
      let width = herald::terminal_width();
      print!("{}", render::section("Pima Indians Diabetes Dataset (Sample)", width));
      print!("{}", render::render_table(&view, state.sort()));
    }
  }
  Ok(Status::Ok)
}

fn dashboard(config: &Config, width: usize) -> Result<Status> {
  herald::event(herald::Level::Info, "rendering dashboard");

  data_command(config, &DataQuery { search: None, sort: None, page: 1 }, OutputFormat::Pretty)?;
  println!();
  print!("{}", render::section("Class Distribution", width));
  print!("{}", render::render_classes(width));
  println!();
  print!("{}", render::section("Feature Importance", width));
  print!("{}", render::render_importance(width));
  println!();
  print!("{}", render::section("Key Risk Factors", width));
  print!("{}", render::render_key_factors(4));
  println!();
  print!("{}", render::section("Feature Distribution", width));
  for (i, feature) in insights::distribution_features().iter().enumerate() {
    if let Some(distribution) = insights::distribution(*feature) {
      if i > 0 {
        println!();
      }
      print!("{}", render::render_distribution(&distribution, width));
    }
  }
  println!();
  print!("{}", render::section("Feature Correlation with Outcome", width));
  print!("{}", render::render_outcome_correlations(width));
  println!();
  print!("{}", render::section("Correlation Matrix", width));
  print!("{}", render::render_correlation_matrix());
  println!();
  print_models(width);
  println!();
  print!("{}", render::section("Features", width));
  print!("{}", render::render_feature_reference());
  println!();
  print!("{}", render::section("Diabetes Prediction (form defaults)", width));
  let patient = config.form_defaults();
  let result = model::predict(&patient)?;
  print!("{}", render::render_prediction(&patient, &result));
  Ok(Status::Ok)
}

#[cfg(test)]
mod tests {
  use super::*;
  use clap::CommandFactory;

  #[test]
  fn test_cli_definition_is_valid() {
    Cli::command().debug_assert();
  }

  #[test]
  fn test_feature_flags_override_base() {
    let args = FeatureArgs { glucose: Some(160.0), age: Some(50.0), ..FeatureArgs::default() };
    let input = args.apply(PatientInput::default());
    assert_eq!(input.glucose, 160.0);
    assert_eq!(input.age, 50.0);
    assert_eq!(input.bmi, 25.0);
  }

  #[test]
  fn test_parse_predict_flags() {
    let cli = Cli::try_parse_from([
      "glucoscope",
      "predict",
      "--glucose",
      "150",
      "--blood-pressure",
      "80",
      "--pedigree",
      "0.9",
      "--format",
      "json",
    ])
    .unwrap();
    match cli.command {
      Commands::Predict { features, format, input } => {
        assert_eq!(features.glucose, Some(150.0));
        assert_eq!(features.blood_pressure, Some(80.0));
        assert_eq!(features.diabetes_pedigree, Some(0.9));
        assert_eq!(format, OutputFormat::Json);
        assert!(input.is_none());
      }
      _ => panic!("expected predict"),
    }
  }

  #[test]
  fn test_parse_data_sort_column() {
    let cli =
      Cli::try_parse_from(["glucoscope", "data", "--sort", "bmi", "--desc", "--page", "2"]).unwrap();
    match cli.command {
      Commands::Data { sort, desc, page, .. } => {
        assert_eq!(sort, Some(Column::Feature(Feature::Bmi)));
        assert!(desc);
        assert_eq!(page, 2);
      }
      _ => panic!("expected data"),
    }
  }

  #[test]
  fn test_desc_requires_sort() {
    assert!(Cli::try_parse_from(["glucoscope", "data", "--desc"]).is_err());
  }

  #[test]
  fn test_resolve_input_prefers_file_then_flags() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("patient.json");
    std::fs::write(
      &path,
      r#"{"pregnancies":6,"glucose":148,"bloodPressure":72,"skinThickness":35,
          "insulin":0,"bmi":33.6,"diabetesPedigree":0.627,"age":50}"#,
    )
    .unwrap();

    let flags = FeatureArgs { age: Some(40.0), ..FeatureArgs::default() };
    let input = resolve_input(&Config::default(), &flags, Some(path.as_path())).unwrap();
    assert_eq!(input.glucose, 148.0);
    assert_eq!(input.age, 40.0);
  }

  #[test]
  fn test_load_input_reports_missing_fields() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("partial.json");
    std::fs::write(&path, r#"{"glucose":148}"#).unwrap();
    let err = load_input(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse input file"));
  }

  #[test]
  fn test_no_color_flag_overrides_config() {
    let config = Config::default();
    let plain = Cli::try_parse_from(["glucoscope", "--no-color", "classes"]).unwrap();
    assert!(!plain.color_enabled(&config));
    let colored = Cli::try_parse_from(["glucoscope", "classes"]).unwrap();
    assert!(colored.color_enabled(&config));
    assert!(!colored.color_enabled(&Config { color: false, ..Config::default() }));
  }

  #[test]
  fn test_init_skips_existing_config() {
    let cli = Cli::try_parse_from(["glucoscope", "--config", "/nonexistent/glucoscope.json", "init"])
      .unwrap();
    assert_eq!(load_config(&cli).unwrap(), Config::default());
  }

  #[test]
  fn test_init_writes_loadable_config() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    assert_eq!(init_command(&path, false).unwrap(), Status::Ok);
    assert_eq!(Config::load_from_file(&path).unwrap(), Config::default());

    let err = init_command(&path, false).unwrap_err();
    assert!(err.to_string().contains("already exists"));
    assert_eq!(init_command(&path, true).unwrap(), Status::Ok);
  }

  #[test]
  fn test_status_exit_codes() {
    assert_eq!(Status::Ok.exit_code(), 0);
    assert_eq!(Status::Rejected.exit_code(), 1);
  }
}
