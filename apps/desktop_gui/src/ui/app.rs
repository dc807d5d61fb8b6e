use std::time::Duration;

use client_core::{
    view::{field_label, field_placeholder, submit_label, ResultPanel},
    FormSession, SubmissionState,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::FieldName;

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::{
        events::{UiError, UiErrorContext, UiEvent},
        orchestration::dispatch_backend_command,
        reducer::{apply_ui_event, StatusBannerSeverity, StatusModel},
    },
};

const ACCENT: egui::Color32 = egui::Color32::from_rgb(88, 80, 236);
const SUCCESS: egui::Color32 = egui::Color32::from_rgb(22, 163, 74);
const DANGER: egui::Color32 = egui::Color32::from_rgb(220, 38, 38);
const FIELD_WIDTH: f32 = 280.0;

pub struct PredictorApp {
    session: FormSession,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    model: StatusModel,
    predict_url: String,
}

impl PredictorApp {
    pub fn new(
        session: FormSession,
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        predict_url: String,
    ) -> Self {
        Self {
            session,
            cmd_tx,
            ui_rx,
            model: StatusModel {
                status: "Starting backend worker...".to_string(),
                ..StatusModel::default()
            },
            predict_url,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            apply_ui_event(&mut self.model, event);
        }
    }

    fn try_submit(&mut self) {
        if let Some(field) = self.session.record().missing_required().first() {
            let message = format!("Please fill in {}.", field_label(*field));
            self.model.show_error(
                UiError::from_message(UiErrorContext::Submit, format!("{field} is required")),
                message,
            );
            return;
        }

        let pending = match self.session.begin_submit() {
            Ok(pending) => pending,
            Err(err) => {
                let error = UiError::from_submission_error(UiErrorContext::Submit, &err);
                let message = error.message().to_string();
                self.model.show_error(error, message);
                return;
            }
        };

        if let Err(BackendCommand::Submit(pending)) = dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::Submit(pending),
            &mut self.model.status,
        ) {
            let reason = self.model.status.clone();
            self.session.controller().abort(pending, reason);
        }
    }

    fn check_health(&mut self) {
        let _ = dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::CheckHealth,
            &mut self.model.status,
        );
    }

    fn field_input(&mut self, ui: &mut egui::Ui, field: FieldName) {
        ui.vertical(|ui| {
            ui.label(egui::RichText::new(field_label(field)).strong());
            let mut value = self.session.record().get(field).to_string();
            let edit = egui::TextEdit::singleline(&mut value)
                .hint_text(field_placeholder(field))
                .desired_width(FIELD_WIDTH);
            let response = ui.add_enabled(!field.is_derived(), edit);
            if response.changed() {
                if let Err(err) = self.session.set_field(field, value) {
                    apply_ui_event(
                        &mut self.model,
                        UiEvent::Error(UiError::from_message(
                            UiErrorContext::FormEdit,
                            err.to_string(),
                        )),
                    );
                }
            }
        });
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        let Some(banner) = self.model.banner.clone() else {
            return;
        };
        let color = match banner.severity {
            StatusBannerSeverity::Info => SUCCESS,
            StatusBannerSeverity::Error => DANGER,
        };

        egui::Frame::group(ui.style())
            .stroke(egui::Stroke::new(1.0, color))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.colored_label(color, egui::RichText::new(&banner.message).strong());
                    if ui.small_button("Dismiss").clicked() {
                        self.model.banner = None;
                    }
                });
            });
        ui.add_space(8.0);
    }

    fn show_form(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("prediction_form")
            .num_columns(2)
            .spacing([24.0, 12.0])
            .show(ui, |ui| {
                for (index, field) in FieldName::ALL.into_iter().enumerate() {
                    self.field_input(ui, field);
                    if index % 2 == 1 {
                        ui.end_row();
                    }
                }
            });
    }

    fn show_actions(&mut self, ui: &mut egui::Ui, state: &SubmissionState) {
        ui.horizontal(|ui| {
            let fill = if state.result().is_some() { SUCCESS } else { ACCENT };
            let button = egui::Button::new(
                egui::RichText::new(submit_label(state))
                    .strong()
                    .size(16.0)
                    .color(egui::Color32::WHITE),
            )
            .fill(fill)
            .min_size(egui::vec2(200.0, 36.0));
            if ui.add(button).clicked() {
                self.try_submit();
            }
            if ui.button("Check service").clicked() {
                self.check_health();
            }
        });
    }

    fn show_result_panel(&self, ui: &mut egui::Ui, state: &SubmissionState) {
        let Some(panel) = ResultPanel::from_state(state) else {
            return;
        };

        ui.add_space(12.0);
        ui.separator();
        ui.label(
            egui::RichText::new("Prediction Result")
                .size(20.0)
                .strong()
                .color(SUCCESS),
        );
        ui.monospace(format!("Predicted Drug: {}", panel.predicted_drug));
        ui.monospace(format!("Confidence: {}", panel.confidence));
        if !panel.top_predictions.is_empty() {
            ui.add_space(6.0);
            ui.label(egui::RichText::new("Top Predictions:").strong());
            for line in &panel.top_predictions {
                ui.monospace(format!("• {line}"));
            }
        }
    }
}

impl eframe::App for PredictorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Drug Response Prediction App");
                ui.weak(format!("Prediction service: {}", self.predict_url));
                ui.add_space(12.0);

                self.show_status_banner(ui);
                self.show_form(ui);
                ui.add_space(16.0);

                let state = self.session.state();
                self.show_actions(ui, &state);
                // The click above may have moved the state on.
                let state = self.session.state();
                self.show_result_panel(ui, &state);

                ui.add_space(12.0);
                ui.separator();
                ui.horizontal_wrapped(|ui| {
                    ui.small("Status:");
                    ui.small(egui::RichText::new(&self.model.status).weak());
                });
            });
        });

        let poll = if self.session.state().is_pending() {
            Duration::from_millis(100)
        } else {
            Duration::from_millis(250)
        };
        ctx.request_repaint_after(poll);
    }
}
