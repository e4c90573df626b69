use serde::{Deserialize, Serialize};
use std::fmt;

/// Date text as typed by the user, expected as `DD-MM-YYYY`.
///
/// The only check is presence: the text is sent verbatim and the prediction
/// service is the one that validates the format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateInput(String);

impl DateInput {
    /// Returns `None` for empty or whitespace-only text.
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() { None } else { Some(Self(text)) }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DateInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body of `POST /predict`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub future_date: String,
}

impl From<&DateInput> for PredictionRequest {
    fn from(date: &DateInput) -> Self {
        Self { future_date: date.as_str().to_owned() }
    }
}

/// Successful body of `POST /predict`. Unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// °C
    pub temperatura: f64,
    /// mm
    pub precipitacion: f64,
    /// %
    pub humedad: f64,
    /// degrees
    pub direccion_viento: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descripcion_clima: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calidad_aire: Option<f64>,
}

/// One record of `GET /predictions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesEntry {
    pub fecha: String,
    pub temperatura: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precipitacion: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humedad: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direccion_viento: Option<f64>,
}
