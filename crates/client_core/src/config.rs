use std::{collections::HashMap, fs, path::Path};

use anyhow::Context;
use tracing::warn;
use url::Url;

use crate::submission::SubmitPolicy;

pub const DEFAULT_PREDICT_URL: &str = "http://localhost:8000/predict/";
pub const DEFAULT_SETTINGS_FILE: &str = "predictor.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub predict_url: String,
    pub health_url: Option<String>,
    pub submit_policy: SubmitPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            predict_url: DEFAULT_PREDICT_URL.into(),
            health_url: None,
            submit_policy: SubmitPolicy::AllowConcurrent,
        }
    }
}

impl Settings {
    /// Explicit health URL, or the root of the prediction service.
    pub fn health_url(&self) -> String {
        if let Some(url) = &self.health_url {
            return url.clone();
        }
        Url::parse(&self.predict_url)
            .and_then(|url| url.join("/"))
            .map(|url| url.to_string())
            .unwrap_or_else(|_| self.predict_url.clone())
    }
}

/// Defaults, then `predictor.toml` in the working directory, then the environment.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();
    if let Ok(raw) = fs::read_to_string(DEFAULT_SETTINGS_FILE) {
        apply_file_overrides(&mut settings, &raw);
    }
    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
    settings
}

/// Like [`load_settings`] but the given file must exist and parse.
pub fn load_settings_from(path: &Path) -> anyhow::Result<Settings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
    toml::from_str::<HashMap<String, String>>(&raw).with_context(|| {
        format!(
            "settings file '{}' is not a flat TOML table of strings",
            path.display()
        )
    })?;

    let mut settings = Settings::default();
    apply_file_overrides(&mut settings, &raw);
    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
    Ok(settings)
}

fn apply_file_overrides(settings: &mut Settings, raw: &str) {
    let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) else {
        warn!("ignoring unreadable settings file");
        return;
    };

    if let Some(v) = file_cfg.get("predict_url") {
        settings.predict_url = v.clone();
    }
    if let Some(v) = file_cfg.get("health_url") {
        settings.health_url = Some(v.clone());
    }
    if let Some(v) = file_cfg.get("submit_policy") {
        apply_submit_policy(settings, v);
    }
}

fn apply_env_overrides(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("PREDICTOR_URL") {
        settings.predict_url = v;
    }
    if let Some(v) = var("APP__PREDICT_URL") {
        settings.predict_url = v;
    }

    if let Some(v) = var("PREDICTOR_HEALTH_URL") {
        settings.health_url = Some(v);
    }
    if let Some(v) = var("APP__HEALTH_URL") {
        settings.health_url = Some(v);
    }

    if let Some(v) = var("APP__SUBMIT_POLICY") {
        apply_submit_policy(settings, &v);
    }
}

fn apply_submit_policy(settings: &mut Settings, raw: &str) {
    match raw.parse::<SubmitPolicy>() {
        Ok(policy) => settings.submit_policy = policy,
        Err(err) => warn!(%err, "keeping configured submit policy"),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
