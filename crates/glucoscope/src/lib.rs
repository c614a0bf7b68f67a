//! Educational diabetes-risk dashboard over the Pima Indians Diabetes sample
//!
//! The library holds the static sample, the precomputed chart data and a
//! fixed logistic-regression scorer. The `glucoscope` binary renders it all
//! to the terminal.

pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod features;
pub mod insights;
pub mod model;
pub mod render;
pub mod risk;
pub mod table;

pub use config::Config;
pub use error::{ConfigError, PredictError, Result, ValidationError};
pub use features::{Feature, PatientInput};
pub use model::{predict, ConfidenceLevel, Prediction, PredictionResult};
