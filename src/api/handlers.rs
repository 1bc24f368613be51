use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    api::dtos::{
        ErrorResponse, LinkOpportunitiesQuery, LinkOpportunitiesResponse, MeasureResponse,
        RecordScoresResponse, TagSuggestionsResponse,
    },
    app_state::AppState,
    dashboard::PublicationSummary,
    entities::ContentRecord,
    extractor::ExtractionCache,
    links::{DEFAULT_LINK_LIMIT, LinkOpportunity, Opportunities},
    measures::MeasureKind,
    repositories::{SortDirection, SortField},
};

pub const MAX_LINK_LIMIT: usize = 50;

const LINK_CACHE_CONTROL: &str = "max-age=3600";

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

async fn load_record(state: &AppState, id: Uuid) -> Result<ContentRecord, Response> {
    match state.content_store.load_by_id(id).await {
        Ok(Some(record)) => Ok(record),
        Ok(None) => Err(error_response(StatusCode::NOT_FOUND, "Record not found")),
        Err(e) => {
            error!(record_id = %id, error = %e, "failed to load record");
            Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error",
            ))
        }
    }
}

#[utoipa::path(
    get,
    path = "/v1/dashboard",
    tag = "dashboard",
    responses(
        (status = 200, description = "Scored publications, newest first", body = [PublicationSummary]),
        (status = 500, description = "Content store failure", body = ErrorResponse)
    )
)]
pub async fn dashboard(State(state): State<AppState>) -> Response {
    let records = match state
        .content_store
        .load_published(&state.content_type, SortField::Created, SortDirection::Desc)
        .await
    {
        Ok(records) => records,
        Err(e) => {
            error!(error = %e, "failed to load published records");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Database error");
        }
    };

    let cache = ExtractionCache::new();
    let rows = state.dashboard.build(&records, &cache).await;
    Json(rows).into_response()
}

#[utoipa::path(
    get,
    path = "/v1/records/{id}/scores",
    tag = "scores",
    params(("id" = Uuid, Path, description = "Record id")),
    responses(
        (status = 200, description = "All measures and the aggregate score", body = RecordScoresResponse),
        (status = 404, description = "Unknown record", body = ErrorResponse)
    )
)]
pub async fn record_scores(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    let record = match load_record(&state, id).await {
        Ok(record) => record,
        Err(response) => return response,
    };

    let cache = ExtractionCache::new();
    let report = state.measures.evaluate_all(&record, &cache).await;
    Json(RecordScoresResponse {
        id: record.id,
        title: record.title,
        aggregate_score: report.aggregate_score,
        measures: report.measures,
    })
    .into_response()
}

#[utoipa::path(
    get,
    path = "/v1/records/{id}/measures/{measure_id}",
    tag = "scores",
    params(
        ("id" = Uuid, Path, description = "Record id"),
        ("measure_id" = String, Path, description = "One of metatags_presence, possible_backlinks, schema_presence, taxonomy_presence")
    ),
    responses(
        (status = 200, description = "A single measure", body = MeasureResponse),
        (status = 404, description = "Unknown record or measure", body = ErrorResponse)
    )
)]
pub async fn record_measure(
    State(state): State<AppState>,
    Path((id, measure_id)): Path<(Uuid, String)>,
) -> Response {
    let Some(kind) = MeasureKind::from_id(&measure_id) else {
        return error_response(StatusCode::NOT_FOUND, "Measure not found");
    };
    let record = match load_record(&state, id).await {
        Ok(record) => record,
        Err(response) => return response,
    };

    let cache = ExtractionCache::new();
    let result = state.measures.evaluate(kind, &record, &cache).await;
    Json(MeasureResponse {
        id: kind.id().to_string(),
        label: kind.label().to_string(),
        score: result.score,
        explanation: result.explanation,
    })
    .into_response()
}

#[utoipa::path(
    get,
    path = "/v1/records/{id}/link-opportunities",
    tag = "links",
    params(("id" = Uuid, Path, description = "Record id"), LinkOpportunitiesQuery),
    responses(
        (status = 200, description = "Records worth linking to, best first", body = LinkOpportunitiesResponse),
        (status = 404, description = "Unknown record", body = ErrorResponse)
    )
)]
pub async fn link_opportunities(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<LinkOpportunitiesQuery>,
) -> Response {
    let record = match load_record(&state, id).await {
        Ok(record) => record,
        Err(response) => return response,
    };
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LINK_LIMIT)
        .clamp(1, MAX_LINK_LIMIT);

    let cache = ExtractionCache::new();
    let body = match state.links.find(&record, limit, &cache).await {
        Ok(Opportunities::NoContent) => LinkOpportunitiesResponse {
            record_id: record.id,
            items: Vec::new(),
            message: Some("No content available for similarity search.".to_string()),
        },
        Ok(Opportunities::Found(candidates)) => {
            info!(record_id = %record.id, limit, found = candidates.len(), "link opportunities");
            let message = candidates
                .is_empty()
                .then(|| "No link opportunities found.".to_string());
            LinkOpportunitiesResponse {
                record_id: record.id,
                items: candidates.into_iter().map(LinkOpportunity::from).collect(),
                message,
            }
        }
        Err(e) => {
            error!(record_id = %record.id, error = %e, "failed to extract record text");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Could not render record",
            );
        }
    };

    ([(header::CACHE_CONTROL, LINK_CACHE_CONTROL)], Json(body)).into_response()
}

#[utoipa::path(
    get,
    path = "/v1/records/{id}/tag-suggestions",
    tag = "tags",
    params(("id" = Uuid, Path, description = "Record id")),
    responses(
        (status = 200, description = "Up to five vocabulary terms", body = TagSuggestionsResponse),
        (status = 404, description = "Unknown record", body = ErrorResponse)
    )
)]
pub async fn tag_suggestions(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    let record = match load_record(&state, id).await {
        Ok(record) => record,
        Err(response) => return response,
    };

    let cache = ExtractionCache::new();
    let suggestions = state.suggester.suggest(&record, &cache).await;
    Json(TagSuggestionsResponse {
        record_id: record.id,
        suggestions,
    })
    .into_response()
}
