//! Bridge from the UI thread to the async backend worker.

pub mod commands;
pub mod runtime;
