use std::{path::PathBuf, sync::Arc};

use anyhow::{anyhow, Result};
use clap::Parser;
use client_core::{
    load_settings, load_settings_from, FormSession, HttpPredictionTransport, SubmissionController,
};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

mod backend_bridge;
mod controller;
mod ui;

use backend_bridge::commands::BackendCommand;
use controller::events::UiEvent;
use ui::PredictorApp;

const APP_TITLE: &str = "Drug Response Prediction App";

#[derive(Parser, Debug)]
#[command(name = "predictor_gui", about = "Drug response prediction desktop form")]
struct Args {
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    predict_url: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut settings = match &args.config {
        Some(path) => load_settings_from(path)?,
        None => load_settings(),
    };
    if let Some(url) = args.predict_url {
        settings.predict_url = url;
    }
    tracing::info!(
        predict_url = %settings.predict_url,
        policy = ?settings.submit_policy,
        "starting prediction form"
    );

    let controller = SubmissionController::new(
        Arc::new(HttpPredictionTransport::from_settings(&settings)),
        settings.submit_policy,
    );
    let session = FormSession::new(Arc::clone(&controller));

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(controller, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_TITLE)
            .with_inner_size([720.0, 820.0])
            .with_min_inner_size([560.0, 600.0]),
        ..Default::default()
    };
    let predict_url = settings.predict_url.clone();
    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(move |_cc| {
            Ok(Box::new(PredictorApp::new(
                session,
                cmd_tx,
                ui_rx,
                predict_url,
            )))
        }),
    )
    .map_err(|err| anyhow!("failed to run desktop form: {err}"))
}
