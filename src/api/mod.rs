pub mod dtos;
pub mod handlers;

use axum::{Router, body::Body, http::Request, routing::get};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{app_state::AppState, health};

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(OpenApi)]
#[openapi(
    info(title = "seolens", description = "SEO scoring for published content"),
    paths(
        health::health_check,
        handlers::dashboard,
        handlers::record_scores,
        handlers::record_measure,
        handlers::link_opportunities,
        handlers::tag_suggestions,
    ),
    tags(
        (name = "health", description = "Liveness"),
        (name = "dashboard", description = "Editorial dashboard"),
        (name = "scores", description = "Per-record SEO measures"),
        (name = "links", description = "Internal linking opportunities"),
        (name = "tags", description = "AI tag suggestions"),
    )
)]
pub struct ApiDoc;

/// Full HTTP surface with tracing and request ids.
pub fn router(state: AppState) -> Router {
    let request_id = axum::http::HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .route("/healthz", get(health::health_check))
        .route("/v1/dashboard", get(handlers::dashboard))
        .route("/v1/records/{id}/scores", get(handlers::record_scores))
        .route(
            "/v1/records/{id}/measures/{measure_id}",
            get(handlers::record_measure),
        )
        .route(
            "/v1/records/{id}/link-opportunities",
            get(handlers::link_opportunities),
        )
        .route(
            "/v1/records/{id}/tag-suggestions",
            get(handlers::tag_suggestions),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                        let request_id = request
                            .headers()
                            .get(REQUEST_ID_HEADER)
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or("");
                        tracing::info_span!(
                            "http.request",
                            method = %request.method(),
                            uri = %request.uri(),
                            request_id = %request_id,
                        )
                    }),
                )
                .layer(PropagateRequestIdLayer::new(request_id)),
        )
        .with_state(state)
}
