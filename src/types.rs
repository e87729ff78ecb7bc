use serde::Serialize;

use crate::domain::{Domain, EntityInput};
use crate::risk::RiskTier;

// ---------- Response types ----------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuantityResult {
    pub name: String,
    pub value: f64,
    pub risk_level: RiskTier,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityResult {
    pub input: EntityInput,
    pub quantities: Vec<QuantityResult>,
    pub overall_risk: RiskTier,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayResult {
    /// 1-based position in the request.
    pub day: usize,
    pub results: Vec<EntityResult>,
}

/// Envelope shared by every prediction endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResponse {
    pub status: &'static str,
    pub domain: Domain,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub predictions: Vec<DayResult>,
}

impl PredictionResponse {
    pub fn success(domain: Domain, predictions: Vec<DayResult>) -> Self {
        Self {
            status: "success",
            domain,
            state: None,
            predictions,
        }
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub domains: Vec<Domain>,
    pub timestamp_ms: i64,
}
