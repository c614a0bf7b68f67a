//! Configuration management for glucoscope
//!
//! Handles loading, validating and saving display settings and the
//! default values of the prediction form.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::features::{Feature, PatientInput};
use crate::table::DEFAULT_ROWS_PER_PAGE;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
  /// Sample browser settings
  #[serde(default)]
  pub table: TableConfig,
  /// Overrides for the prediction form defaults, keyed by feature
  #[serde(default)]
  pub form: BTreeMap<Feature, f64>,
  /// Colored output
  #[serde(default = "default_color")]
  pub color: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
  #[serde(default = "default_rows_per_page")]
  pub rows_per_page: usize,
}

fn default_rows_per_page() -> usize {
  DEFAULT_ROWS_PER_PAGE
}
fn default_color() -> bool {
  true
}

impl Default for TableConfig {
  fn default() -> Self {
    Self { rows_per_page: default_rows_per_page() }
  }
}

impl Default for Config {
  fn default() -> Self {
    Self { table: TableConfig::default(), form: BTreeMap::new(), color: default_color() }
  }
}

const LOCAL_CONFIG_PATHS: [&str; 2] = [".glucoscope.json", "glucoscope.json"];

impl Config {
  /// Load and validate configuration from a file
  pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
      .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    let config: Config = serde_json::from_str(&content)
      .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
    config.validate()?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
  }

  /// Config file locations, most specific first
  pub fn search_paths() -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = LOCAL_CONFIG_PATHS.iter().map(PathBuf::from).collect();
    if let Some(dir) = dirs::config_dir() {
      paths.push(dir.join("glucoscope").join("config.json"));
    }
    paths
  }

  /// Load from the first existing search path, or defaults
  pub fn load() -> Result<Self, ConfigError> {
    match Self::search_paths().into_iter().find(|p| p.exists()) {
      Some(path) => Self::load_from_file(path),
      None => Ok(Config::default()),
    }
  }

  /// Explicit path wins over the search
  pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
    match explicit {
      Some(path) => Self::load_from_file(path),
      None => Self::load(),
    }
  }

  pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
    let path = path.as_ref();
    let content =
      serde_json::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))?;
    std::fs::write(path, content)
      .map_err(|source| ConfigError::Write { path: path.to_path_buf(), source })
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.table.rows_per_page == 0 {
      return Err(ConfigError::Invalid("table.rows_per_page must be at least 1".to_string()));
    }
    for (feature, value) in &self.form {
      let range = feature.range();
      if !range.contains(*value) {
        return Err(ConfigError::Invalid(format!(
          "form.{} = {} is outside {} to {}",
          feature.key(),
          value,
          range.min,
          range.max
        )));
      }
    }
    Ok(())
  }

  /// Starting values of the prediction form
  pub fn form_defaults(&self) -> PatientInput {
    self.form.iter().fold(PatientInput::default(), |input, (f, v)| input.with(*f, *v))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use tempfile::TempDir;

  #[test]
  fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.table.rows_per_page, 5);
    assert!(config.form.is_empty());
    assert!(config.color);
    assert_eq!(config.form_defaults(), PatientInput::default());
  }

  #[test]
  fn test_config_load_nonexistent_file() {
    let result = Config::load_from_file(Path::new("nonexistent.json"));
    assert!(matches!(result, Err(ConfigError::Read { .. })));
  }

  #[test]
  fn test_config_load_partial_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("glucoscope.json");
    fs::write(&config_path, r#"{ "form": { "glucose": 150, "bloodPressure": 85 } }"#).unwrap();

    let config = Config::load_from_file(&config_path).unwrap();
    assert_eq!(config.table.rows_per_page, 5);
    assert!(config.color);

    let form = config.form_defaults();
    assert_eq!(form.glucose, 150.0);
    assert_eq!(form.blood_pressure, 85.0);
    assert_eq!(form.age, 30.0);
  }

  #[test]
  fn test_config_load_invalid_json() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("invalid.json");
    fs::write(&config_path, "{ invalid json }").unwrap();

    let result = Config::load_from_file(&config_path);
    assert!(matches!(result, Err(ConfigError::Parse { .. })));
  }

  #[test]
  fn test_config_rejects_unknown_feature() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("unknown.json");
    fs::write(&config_path, r#"{ "form": { "height": 170 } }"#).unwrap();

    assert!(Config::load_from_file(&config_path).is_err());
  }

  #[test]
  fn test_config_validation() {
    let zero_rows = Config { table: TableConfig { rows_per_page: 0 }, ..Config::default() };
    assert!(matches!(zero_rows.validate(), Err(ConfigError::Invalid(_))));

    let mut bad_form = Config::default();
    bad_form.form.insert(Feature::Age, 90.0);
    let err = bad_form.validate().unwrap_err();
    assert!(err.to_string().contains("form.age"));
  }

  #[test]
  fn test_config_save_and_load() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("saved.json");

    let mut original = Config { table: TableConfig { rows_per_page: 10 }, ..Config::default() };
    original.color = false;
    original.form.insert(Feature::Bmi, 31.5);

    original.save_to_file(&config_path).unwrap();
    let loaded = Config::load_from_file(&config_path).unwrap();
    assert_eq!(original, loaded);
  }

  #[test]
  fn test_resolve_prefers_explicit_path() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("explicit.json");
    fs::write(&config_path, r#"{ "table": { "rows_per_page": 3 } }"#).unwrap();

    let config = Config::resolve(Some(config_path.as_path())).unwrap();
    assert_eq!(config.table.rows_per_page, 3);
  }

  #[test]
  fn test_search_paths_start_local() {
    let paths = Config::search_paths();
    assert_eq!(paths[0], PathBuf::from(".glucoscope.json"));
    assert_eq!(paths[1], PathBuf::from("glucoscope.json"));
  }
}
