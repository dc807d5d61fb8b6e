use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::FormError;

/// How a form field is entered and coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Free text, sent to the prediction service unchanged.
    Text,
    /// Numeric-as-text, coerced to a number at submit time.
    Numeric,
    /// Computed from other fields, never edited directly.
    Derived,
}

/// Every field of the prediction form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    TargetPathway,
    FeatureName,
    Ic50EffectSize,
    FeaturePosIc50Var,
    FeatureNegIc50Var,
    FeaturePval,
    TissuePval,
    MsiPval,
    NFeaturePos,
    NFeatureNeg,
    LogIc50MeanPos,
    LogIc50MeanNeg,
    MutationResponseRatio,
    MutationRatio,
}

impl FieldName {
    pub const ALL: [FieldName; 14] = [
        FieldName::TargetPathway,
        FieldName::FeatureName,
        FieldName::Ic50EffectSize,
        FieldName::FeaturePosIc50Var,
        FieldName::FeatureNegIc50Var,
        FieldName::FeaturePval,
        FieldName::TissuePval,
        FieldName::MsiPval,
        FieldName::NFeaturePos,
        FieldName::NFeatureNeg,
        FieldName::LogIc50MeanPos,
        FieldName::LogIc50MeanNeg,
        FieldName::MutationResponseRatio,
        FieldName::MutationRatio,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldName::TargetPathway => "target_pathway",
            FieldName::FeatureName => "feature_name",
            FieldName::Ic50EffectSize => "ic50_effect_size",
            FieldName::FeaturePosIc50Var => "feature_pos_ic50_var",
            FieldName::FeatureNegIc50Var => "feature_neg_ic50_var",
            FieldName::FeaturePval => "feature_pval",
            FieldName::TissuePval => "tissue_pval",
            FieldName::MsiPval => "msi_pval",
            FieldName::NFeaturePos => "n_feature_pos",
            FieldName::NFeatureNeg => "n_feature_neg",
            FieldName::LogIc50MeanPos => "log_ic50_mean_pos",
            FieldName::LogIc50MeanNeg => "log_ic50_mean_neg",
            FieldName::MutationResponseRatio => "mutation_response_ratio",
            FieldName::MutationRatio => "mutation_ratio",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            FieldName::TargetPathway | FieldName::FeatureName => FieldKind::Text,
            FieldName::MutationResponseRatio | FieldName::MutationRatio => FieldKind::Derived,
            _ => FieldKind::Numeric,
        }
    }

    pub fn is_derived(self) -> bool {
        self.kind() == FieldKind::Derived
    }

    /// Fields the user types into directly.
    pub fn free_entry() -> impl Iterator<Item = FieldName> {
        Self::ALL.into_iter().filter(|field| !field.is_derived())
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldName {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))
    }
}
