//! State of the prediction request form.
//!
//! The form owns the date text the user is typing and the outcome of the last
//! settled submission. At most one request is outstanding at a time: while a
//! submission is pending the submit control is disabled, and the previous
//! outcome stays on screen until the new one settles.

use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    model::{DateInput, PredictionResult},
    service::{PredictionService, ServiceError},
};

/// Shown for every kind of failure: transport, non-2xx status or bad body.
pub const FAILURE_MESSAGE: &str =
    "No se pudo realizar la predicción. Verifica la fecha ingresada.";

/// Outcome of the last settled submission.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FormState {
    #[default]
    Idle,
    Success { date: DateInput, result: PredictionResult },
    Failure(String),
}

impl FormState {
    pub fn result(&self) -> Option<&PredictionResult> {
        match self {
            FormState::Success { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FormState::Failure(msg) => Some(msg),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    #[error("A date is required (DD-MM-YYYY)")]
    EmptyDate,

    #[error("A prediction request is already in progress")]
    InFlight,
}

/// Ticket for an outstanding request, handed back to [`PredictionForm::settle`].
#[derive(Debug)]
#[must_use = "an unsettled submission keeps the form disabled"]
pub struct PendingSubmission {
    id: u64,
    date: DateInput,
}

impl PendingSubmission {
    pub fn date(&self) -> &DateInput {
        &self.date
    }
}

#[derive(Debug, Default)]
pub struct PredictionForm {
    date_text: String,
    state: FormState,
    in_flight: Option<u64>,
    next_id: u64,
}

impl PredictionForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn date_text(&self) -> &str {
        &self.date_text
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        !self.is_pending() && DateInput::new(self.date_text.as_str()).is_some()
    }

    pub fn on_date_change(&mut self, text: impl Into<String>) {
        self.date_text = text.into();
    }

    pub fn begin_submit(&mut self) -> Result<PendingSubmission, SubmitRejected> {
        if self.in_flight.is_some() {
            return Err(SubmitRejected::InFlight);
        }
        let date =
            DateInput::new(self.date_text.as_str()).ok_or(SubmitRejected::EmptyDate)?;

        self.next_id += 1;
        let id = self.next_id;
        self.in_flight = Some(id);
        debug!(id, date = %date, "submission started");

        Ok(PendingSubmission { id, date })
    }

    /// Apply the outcome of `pending`. Returns `false` when the ticket is not
    /// the outstanding one, in which case nothing changes.
    pub fn settle(
        &mut self,
        pending: PendingSubmission,
        outcome: Result<PredictionResult, ServiceError>,
    ) -> bool {
        if self.in_flight != Some(pending.id) {
            debug!(id = pending.id, "ignoring stale submission");
            return false;
        }
        self.in_flight = None;

        self.state = match outcome {
            Ok(result) => FormState::Success { date: pending.date, result },
            Err(err) => {
                warn!(id = pending.id, timeout = err.is_timeout(), error = %err, "prediction failed");
                FormState::Failure(FAILURE_MESSAGE.to_string())
            }
        };
        true
    }

    /// Drop an outstanding submission without touching the shown outcome.
    pub fn cancel(&mut self, pending: PendingSubmission) {
        if self.in_flight == Some(pending.id) {
            self.in_flight = None;
        }
    }

    /// Submit the current date and wait for the service to answer.
    pub async fn submit(&mut self, service: &dyn PredictionService) -> Result<(), SubmitRejected> {
        let pending = self.begin_submit()?;
        let outcome = service.predict(pending.date()).await;
        self.settle(pending, outcome);
        Ok(())
    }
}
