//! Core library for the `agromet` CLI.
//!
//! This crate defines:
//! - Configuration of the prediction service endpoint
//! - The HTTP contract with the prediction service (`POST /predict`, `GET /predictions`)
//! - The prediction request form state and its text rendering
//!
//! It is used by `agromet-cli`, but can also be mounted by other front ends.

pub mod config;
pub mod form;
pub mod model;
pub mod render;
pub mod service;

pub use config::{Config, EnvOverrides, ServiceConfig};
pub use form::{FAILURE_MESSAGE, FormState, PendingSubmission, PredictionForm, SubmitRejected};
pub use model::{DateInput, PredictionRequest, PredictionResult, SeriesEntry};
pub use service::{HttpPredictionService, PredictionService, ServiceError};
