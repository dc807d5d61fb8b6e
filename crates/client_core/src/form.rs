//! Form state store and the derivation rules for the two computed ratio fields.

use std::collections::BTreeMap;

use shared::{domain::FieldName, error::FormError};
use tracing::debug;

/// Guards `mutation_response_ratio` against division by an exact zero.
pub const RESPONSE_RATIO_EPSILON: f64 = 1e-6;

/// Current text of every form field, entered or derived.
///
/// Only [`FormRecord::with_field`] changes a value, and it always re-runs the
/// derivations, so derived fields never drift from their inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRecord {
    values: BTreeMap<FieldName, String>,
}

impl Default for FormRecord {
    fn default() -> Self {
        Self {
            values: FieldName::ALL
                .into_iter()
                .map(|field| (field, String::new()))
                .collect(),
        }
    }
}

impl FormRecord {
    pub fn get(&self, field: FieldName) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or_default()
    }

    /// Fields and values in display order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &str)> {
        self.values
            .iter()
            .map(|(field, value)| (*field, value.as_str()))
    }

    /// Returns a new record with `field` set to `raw` and both derived fields
    /// recomputed from the result. `self` is left untouched.
    pub fn with_field(
        &self,
        field: FieldName,
        raw: impl Into<String>,
    ) -> Result<Self, FormError> {
        if field.is_derived() {
            return Err(FormError::ReadOnlyField(field));
        }

        let mut next = self.clone();
        next.values.insert(field, raw.into());
        next.apply_derivations();
        Ok(next)
    }

    /// Free-entry fields that are still blank.
    pub fn missing_required(&self) -> Vec<FieldName> {
        FieldName::free_entry()
            .filter(|field| self.get(*field).trim().is_empty())
            .collect()
    }

    fn apply_derivations(&mut self) {
        let ratio = derive_mutation_ratio(
            self.get(FieldName::NFeaturePos),
            self.get(FieldName::NFeatureNeg),
        );
        self.store_derived(FieldName::MutationRatio, ratio);

        let response_ratio = derive_mutation_response_ratio(
            self.get(FieldName::LogIc50MeanPos),
            self.get(FieldName::LogIc50MeanNeg),
        );
        self.store_derived(FieldName::MutationResponseRatio, response_ratio);
    }

    fn store_derived(&mut self, field: FieldName, derivation: Derivation) {
        if let Derivation::Updated(value) = derivation {
            self.values.insert(field, format_number(value));
        }
    }
}

/// Outcome of recomputing one derived field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Derivation {
    /// An input was blank or not a number; keep the previous value.
    NoChange,
    Updated(f64),
}

/// `pos / (pos + neg)`, only when both counts parse and their sum is positive.
pub fn derive_mutation_ratio(n_feature_pos: &str, n_feature_neg: &str) -> Derivation {
    match (parse_float(n_feature_pos), parse_float(n_feature_neg)) {
        (Some(pos), Some(neg)) if pos + neg > 0.0 => Derivation::Updated(pos / (pos + neg)),
        _ => Derivation::NoChange,
    }
}

/// `pos / (neg + 1e-6)`, only when both means parse.
pub fn derive_mutation_response_ratio(
    log_ic50_mean_pos: &str,
    log_ic50_mean_neg: &str,
) -> Derivation {
    match (parse_float(log_ic50_mean_pos), parse_float(log_ic50_mean_neg)) {
        (Some(pos), Some(neg)) => Derivation::Updated(pos / (neg + RESPONSE_RATIO_EPSILON)),
        _ => Derivation::NoChange,
    }
}

/// Reads the longest leading decimal number of `raw`, ignoring leading
/// whitespace and any trailing text: `"3abc"` is 3, `"3e"` is 3, `"1,5"` is 1.
/// `Infinity` with an optional sign is accepted; `inf` and `NaN` are not.
pub fn parse_float(raw: &str) -> Option<f64> {
    let text = raw.trim_start();
    let bytes = text.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));

    if text[end..].starts_with("Infinity") {
        return Some(if text.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits + frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_start = end + 1;
        if matches!(bytes.get(exp_start), Some(b'+' | b'-')) {
            exp_start += 1;
        }
        let exp_digits = count_digits(&bytes[exp_start..]);
        if exp_digits > 0 {
            end = exp_start + exp_digits;
        }
    }

    text[..end].parse::<f64>().ok()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|byte| byte.is_ascii_digit()).count()
}

/// Renders a derived value back into form text, switching to exponent form
/// (`1e+21`, `1.5e-7`) outside `[1e-6, 1e21)`.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        let sign = if value < 0.0 { "-" } else { "" };
        return format!("{sign}Infinity");
    }
    if value == 0.0 {
        // Covers -0.0 as well.
        return "0".to_string();
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return value.to_string();
    }
    let exponential = format!("{value:e}");
    match exponential.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => exponential,
    }
}

/// Owns the single [`FormRecord`] of one form session.
#[derive(Debug, Clone, Default)]
pub struct FormStateStore {
    record: FormRecord,
}

impl FormStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self) -> &FormRecord {
        &self.record
    }

    /// Updates a free-entry field, recomputes the derived fields and returns
    /// a snapshot of the new state.
    pub fn set_field(
        &mut self,
        field: FieldName,
        raw: impl Into<String>,
    ) -> Result<FormRecord, FormError> {
        let next = self.record.with_field(field, raw)?;
        debug!(field = field.as_str(), "form field updated");
        self.record = next;
        Ok(self.record.clone())
    }

    pub fn set_field_by_name(
        &mut self,
        name: &str,
        raw: impl Into<String>,
    ) -> Result<FormRecord, FormError> {
        let field = name.parse::<FieldName>()?;
        self.set_field(field, raw)
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
