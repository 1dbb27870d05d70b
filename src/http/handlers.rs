use crate::core::context::RequestContext;
use crate::domain::model::DeliveryRequest;
use crate::http::presenters::{ApiError, CreatedResponse, HealthResponse};
use crate::http::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

fn request_context(state: &AppState, headers: &HeaderMap) -> RequestContext {
    let mut ctx = RequestContext::new();
    if let Some(request_id) = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
    {
        ctx = ctx.with_request_id(request_id);
    }
    if let Some(timeout) = state.request_timeout {
        ctx = ctx.with_timeout(timeout);
    }
    ctx
}

pub async fn create_delivery(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<DeliveryRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    request.validate()?;

    let ctx = request_context(&state, &headers);
    let delivery = request.into_delivery(&state.default_status);
    let created = state.registration.execute(&ctx, delivery).await?;

    Ok((
        StatusCode::CREATED,
        [(REQUEST_ID_HEADER, ctx.request_id().to_string())],
        Json(CreatedResponse::new(created.id().unwrap_or_default())),
    ))
}

pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "up".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
