use serde::{Deserialize, Serialize};

/// Body of `POST /predict/`.
///
/// Non-finite numbers serialize as `null`; the service rejects them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub target_pathway: String,
    pub feature_name: String,
    pub ic50_effect_size: f64,
    pub feature_pos_ic50_var: f64,
    pub feature_neg_ic50_var: f64,
    pub feature_pval: f64,
    pub tissue_pval: f64,
    pub msi_pval: f64,
    pub mutation_response_ratio: f64,
    pub mutation_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopPrediction {
    pub drug: String,
    #[serde(rename = "Confidence")]
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predicted_drug: String,
    pub confidence: f64,
    pub top_predictions: Vec<TopPrediction>,
}

/// Body of the service's root health-check endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub message: String,
    pub status: String,
    pub model_loaded: bool,
    pub version: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy" && self.model_loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_prediction_uses_capitalized_confidence_key() {
        let result: PredictionResult = serde_json::from_str(
            r#"{"predicted_drug":"Erlotinib","confidence":0.9,
                "top_predictions":[{"drug":"Erlotinib","Confidence":0.9},{"drug":"Gefitinib","Confidence":0.05}]}"#,
        )
        .expect("decode");
        assert_eq!(result.top_predictions[1].drug, "Gefitinib");
        assert_eq!(result.top_predictions[1].confidence, 0.05);

        let encoded = serde_json::to_value(&result.top_predictions[0]).expect("encode");
        assert!(encoded.get("Confidence").is_some());
        assert!(encoded.get("confidence").is_none());
    }

    #[test]
    fn nan_numbers_are_sent_as_null() {
        let request = PredictionRequest {
            target_pathway: "DNA replication".to_string(),
            feature_name: "ABCB1_mut".to_string(),
            ic50_effect_size: f64::NAN,
            feature_pos_ic50_var: 1.57,
            feature_neg_ic50_var: 1.83,
            feature_pval: 0.06,
            tissue_pval: 0.0,
            msi_pval: 0.1,
            mutation_response_ratio: 0.8,
            mutation_ratio: 0.65,
        };
        let encoded = serde_json::to_value(&request).expect("encode");
        assert!(encoded["ic50_effect_size"].is_null());
        assert_eq!(encoded["mutation_ratio"], 0.65);
        assert!(encoded.get("n_feature_pos").is_none());
    }

    #[test]
    fn health_requires_loaded_model() {
        let status = HealthStatus {
            message: "Drug Prediction API is running".to_string(),
            status: "healthy".to_string(),
            model_loaded: false,
            version: "1.0.0".to_string(),
        };
        assert!(!status.is_healthy());
    }
}
