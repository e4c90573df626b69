use anyhow::Context;
use chrono::{Duration, Local};
use clap::{Parser, Subcommand};
use inquire::{CustomType, CustomUserError, InquireError, Text, validator::Validation};
use tracing::{info, warn};

use agromet_core::{
    Config, DateInput, HttpPredictionService, PredictionForm, PredictionService,
    render::{SERIES_ERROR_MESSAGE, render_form, render_series},
    service::parse_base_url,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "agromet", version, about = "Red Agrometeorológicas de Formosa: weather predictions")]
pub struct Cli {
    /// Prediction service origin for this run, e.g. "http://localhost:5000".
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the prediction service address and request timeout.
    Configure,

    /// Request a prediction for one date.
    Predict {
        /// Date as DD-MM-YYYY; prompted for when absent.
        date: Option<String>,
    },

    /// Keep asking for dates until cancelled (Esc / Ctrl-C).
    Session,

    /// Show the stored temperature prediction series.
    Series,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let Cli { base_url, command } = self;

        match command {
            Command::Configure => configure(),
            Command::Predict { date } => {
                let service = load_service(base_url)?;
                let date = match date.filter(|d| DateInput::new(d.as_str()).is_some()) {
                    Some(d) => d,
                    None => prompt_date(&tomorrow())?,
                };
                predict_once(&service, date).await
            }
            Command::Session => {
                let service = load_service(base_url)?;
                session(&service).await
            }
            Command::Series => {
                let service = load_service(base_url)?;
                show_series(&service).await;
                Ok(())
            }
        }
    }
}

fn load_service(base_url: Option<String>) -> anyhow::Result<HttpPredictionService> {
    let mut cfg = Config::resolve()?;
    if let Some(url) = base_url {
        cfg.service.base_url = url;
    }

    let service = HttpPredictionService::from_config(&cfg.service)
        .context("Failed to set up the prediction service client")?;
    info!(base_url = service.base_url(), timeout_secs = cfg.service.timeout_secs, "using prediction service");

    Ok(service)
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let base_url = Text::new("Prediction service URL:")
        .with_default(&cfg.service.base_url)
        .with_validator(|s: &str| {
            Ok(match parse_base_url(s) {
                Ok(_) => Validation::Valid,
                Err(e) => Validation::Invalid(e.to_string().into()),
            })
        })
        .prompt()?;

    let timeout_secs = CustomType::<u64>::new("Request timeout (seconds):")
        .with_default(cfg.service.timeout_secs)
        .with_error_message("Please enter a whole number of seconds")
        .with_validator(validate_timeout)
        .prompt()?;

    cfg.service.base_url = base_url;
    cfg.service.timeout_secs = timeout_secs;
    cfg.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn predict_once(service: &dyn PredictionService, date: String) -> anyhow::Result<()> {
    let mut form = PredictionForm::new();
    form.on_date_change(date);
    println!("{}", submit_and_render(&mut form, service).await);
    Ok(())
}

async fn session(service: &dyn PredictionService) -> anyhow::Result<()> {
    let mut form = PredictionForm::new();
    let mut suggestion = tomorrow();

    loop {
        let date = match prompt_date(&suggestion) {
            Ok(d) => d,
            Err(e) if is_cancel(&e) => break,
            Err(e) => return Err(e),
        };

        form.on_date_change(date);
        println!("{}\n", submit_and_render(&mut form, service).await);

        suggestion = form.date_text().to_string();
    }

    Ok(())
}

/// A rejected submission leaves the form as it was and reports why.
async fn submit_and_render(form: &mut PredictionForm, service: &dyn PredictionService) -> String {
    match form.submit(service).await {
        Ok(()) => render_form(form),
        Err(rejected) => rejected.to_string(),
    }
}

async fn show_series(service: &dyn PredictionService) {
    match service.series().await {
        Ok(entries) => println!("{}", render_series(&entries)),
        Err(err) => {
            warn!(error = %err, "failed to fetch prediction series");
            println!("{SERIES_ERROR_MESSAGE}");
        }
    }
}

fn prompt_date(default: &str) -> anyhow::Result<String> {
    let date = Text::new("Ingrese una fecha futura (DD-MM-YYYY):")
        .with_default(default)
        .with_validator(validate_date)
        .prompt()?;
    Ok(date)
}

/// Same rule as the form: whitespace-only text is no date.
fn validate_date(text: &str) -> Result<Validation, CustomUserError> {
    Ok(match DateInput::new(text) {
        Some(_) => Validation::Valid,
        None => Validation::Invalid("La fecha es requerida".into()),
    })
}

fn validate_timeout(secs: &u64) -> Result<Validation, CustomUserError> {
    Ok(if *secs == 0 {
        Validation::Invalid("The timeout must be at least 1 second".into())
    } else {
        Validation::Valid
    })
}

fn is_cancel(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<InquireError>(),
        Some(InquireError::OperationCanceled | InquireError::OperationInterrupted)
    )
}

fn tomorrow() -> String {
    (Local::now().date_naive() + Duration::days(1)).format("%d-%m-%Y").to_string()
}
