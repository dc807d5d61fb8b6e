//! UI layer for the prediction form.

pub mod app;

pub use app::PredictorApp;
