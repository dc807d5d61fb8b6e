//! Form values supplied on the command line or in a TOML/JSON file.

use std::{collections::BTreeMap, fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;
use shared::domain::FieldName;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FieldValue {
    Text(String),
    Integer(i64),
    Number(f64),
}

impl FieldValue {
    fn into_text(self) -> String {
        match self {
            FieldValue::Text(text) => text,
            FieldValue::Integer(value) => value.to_string(),
            FieldValue::Number(value) => value.to_string(),
        }
    }
}

/// `--set field=value`
pub fn parse_assignment(raw: &str) -> Result<(FieldName, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{raw}'"))?;
    let field = name.parse::<FieldName>().map_err(|err| err.to_string())?;
    Ok((field, value.to_string()))
}

pub fn load_form_file(path: &Path) -> Result<BTreeMap<FieldName, String>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read form file '{}'", path.display()))?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    parse_form_values(&raw, is_json)
        .with_context(|| format!("invalid form file '{}'", path.display()))
}

fn parse_form_values(raw: &str, is_json: bool) -> Result<BTreeMap<FieldName, String>> {
    let entries: BTreeMap<String, FieldValue> = if is_json {
        serde_json::from_str(raw)?
    } else {
        toml::from_str(raw)?
    };

    entries
        .into_iter()
        .map(|(name, value)| -> Result<(FieldName, String)> {
            Ok((name.parse::<FieldName>()?, value.into_text()))
        })
        .collect()
}
