//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::SubmissionController;
use crossbeam_channel::{Receiver, Sender};
use tokio::sync::broadcast::error::RecvError;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(
    controller: Arc<SubmissionController>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let mut events = controller.subscribe_events();
            let events_tx = ui_tx.clone();
            tokio::spawn(async move {
                loop {
                    match events.recv().await {
                        Ok(event) => {
                            let _ = events_tx.try_send(UiEvent::Submission(event));
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "ui dropped submission events");
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
            });

            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::Submit(pending) => {
                        let controller = Arc::clone(&controller);
                        tokio::spawn(async move {
                            controller.complete(pending).await;
                        });
                    }
                    BackendCommand::CheckHealth => {
                        let controller = Arc::clone(&controller);
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            let event = match controller.transport().health().await {
                                Ok(status) => UiEvent::HealthChecked(status),
                                Err(err) => UiEvent::Error(UiError::from_submission_error(
                                    UiErrorContext::HealthCheck,
                                    &err,
                                )),
                            };
                            let _ = ui_tx.try_send(event);
                        });
                    }
                }
            }
        });
    });
}
