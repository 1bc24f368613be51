use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::links::LinkOpportunity;
use crate::measures::{Explanation, MeasureOutcome};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecordScoresResponse {
    pub id: Uuid,
    pub title: String,
    pub aggregate_score: u8,
    pub measures: Vec<MeasureOutcome>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MeasureResponse {
    pub id: String,
    pub label: String,
    pub score: f64,
    pub explanation: Explanation,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LinkOpportunitiesQuery {
    /// Number of candidates to request, 1 to 50. Defaults to 10.
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LinkOpportunitiesResponse {
    pub record_id: Uuid,
    pub items: Vec<LinkOpportunity>,
    /// Set when there is nothing to list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TagSuggestionsResponse {
    pub record_id: Uuid,
    pub suggestions: Vec<String>,
}
