use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    load_settings, load_settings_from,
    transport::PredictionTransport,
    view::{field_label, ResultPanel, FAILURE_NOTICE},
    FormSession, HttpPredictionTransport, Settings, SubmissionController, SubmissionEvent,
    SubmissionState,
};
use shared::domain::FieldName;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod input;

#[derive(Parser, Debug)]
#[command(name = "predictor", about = "Drug response prediction client")]
struct Args {
    /// Settings file; defaults to ./predictor.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    predict_url: Option<String>,
    #[arg(long)]
    health_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fill in the form and request a prediction.
    Predict {
        /// TOML or JSON file mapping field names to values.
        #[arg(long)]
        input: Option<PathBuf>,
        /// Field value, applied after the file.
        #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = input::parse_assignment)]
        assignments: Vec<(FieldName, String)>,
        /// Print the raw prediction result as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Query the prediction service health endpoint.
    Health,
    /// List the form fields.
    Fields,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();
    let settings = resolve_settings(&args)?;

    match args.command {
        Command::Predict {
            input,
            assignments,
            json,
        } => predict(&settings, input, assignments, json).await,
        Command::Health => health(&settings).await,
        Command::Fields => {
            for field in FieldName::ALL {
                let marker = if field.is_derived() { " (derived)" } else { "" };
                println!("{:<24} {}{marker}", field.as_str(), field_label(field));
            }
            Ok(())
        }
    }
}

fn resolve_settings(args: &Args) -> Result<Settings> {
    let mut settings = match &args.config {
        Some(path) => load_settings_from(path)?,
        None => load_settings(),
    };
    if let Some(url) = &args.predict_url {
        settings.predict_url = url.clone();
    }
    if let Some(url) = &args.health_url {
        settings.health_url = Some(url.clone());
    }
    Ok(settings)
}

async fn predict(
    settings: &Settings,
    input: Option<PathBuf>,
    assignments: Vec<(FieldName, String)>,
    json: bool,
) -> Result<()> {
    let mut values = match input {
        Some(path) => input::load_form_file(&path)?,
        None => Default::default(),
    };
    values.extend(assignments);

    let controller = SubmissionController::new(
        Arc::new(HttpPredictionTransport::from_settings(settings)),
        settings.submit_policy,
    );
    let mut session = FormSession::new(controller);
    for (field, value) in values {
        session
            .set_field(field, value)
            .with_context(|| format!("cannot set '{field}'"))?;
    }

    let missing = session.record().missing_required();
    if !missing.is_empty() {
        let names: Vec<_> = missing.iter().map(|field| field.as_str()).collect();
        bail!("required fields are empty: {}", names.join(", "));
    }

    for field in [FieldName::MutationRatio, FieldName::MutationResponseRatio] {
        println!("{}: {}", field_label(field), session.record().get(field));
    }

    info!(url = %settings.predict_url, "requesting prediction");
    let mut events = session.controller().subscribe_events();
    let state = session.submit_current().await?;

    match state {
        SubmissionState::Succeeded(result) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                for line in ResultPanel::from_result(&result).lines() {
                    println!("{line}");
                }
            }
            Ok(())
        }
        _ => {
            eprintln!("{FAILURE_NOTICE}");
            let mut reason = None;
            while let Ok(event) = events.try_recv() {
                if let SubmissionEvent::Failed { reason: r, .. } = event {
                    reason = Some(r);
                }
            }
            bail!(
                "prediction request failed: {}",
                reason.unwrap_or_else(|| "no response".to_string())
            )
        }
    }
}

async fn health(settings: &Settings) -> Result<()> {
    let transport = HttpPredictionTransport::from_settings(settings);
    let status = transport
        .health()
        .await
        .with_context(|| format!("health check against {} failed", settings.health_url()))?;
    println!(
        "{} (status={}, model_loaded={}, version={})",
        status.message, status.status, status.model_loaded, status.version
    );
    if !status.is_healthy() {
        bail!("prediction service is not ready");
    }
    Ok(())
}
