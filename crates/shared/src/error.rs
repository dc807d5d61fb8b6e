use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::FieldName;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("unknown form field '{0}'")]
    UnknownField(String),
    #[error("field '{0}' is derived and cannot be edited")]
    ReadOnlyField(FieldName),
}

/// Error body returned by the prediction service, `{"detail": ...}`.
///
/// `detail` is a plain string for prediction failures and a list of
/// validation entries when the request body is rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub detail: serde_json::Value,
}

impl ApiError {
    pub fn summary(&self) -> String {
        match &self.detail {
            serde_json::Value::String(message) => message.clone(),
            serde_json::Value::Array(entries) => entries
                .iter()
                .map(|entry| {
                    entry
                        .get("msg")
                        .and_then(serde_json::Value::as_str)
                        .map(str::to_string)
                        .unwrap_or_else(|| entry.to_string())
                })
                .collect::<Vec<_>>()
                .join("; "),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarizes_string_detail() {
        let err: ApiError =
            serde_json::from_str(r#"{"detail":"Prediction error: bad input"}"#).expect("decode");
        assert_eq!(err.summary(), "Prediction error: bad input");
    }

    #[test]
    fn summarizes_validation_detail_list() {
        let err: ApiError = serde_json::from_str(
            r#"{"detail":[{"loc":["body","msi_pval"],"msg":"value is not a valid float"},{"loc":["body"]}]}"#,
        )
        .expect("decode");
        assert_eq!(
            err.summary(),
            r#"value is not a valid float; {"loc":["body"]}"#
        );
    }
}
