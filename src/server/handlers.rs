//! Endpoint handlers
//!
//! Bodies are taken as raw bytes and decoded here so a malformed body gets
//! the same `{error, details}` envelope as every other failure. Each
//! generation runs in a span tagged with a fresh request id.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    response::IntoResponse,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use super::AppState;
use super::error::{ApiError, ApiResult};
use crate::types::{
    Assumptions, Generated, ImageInputs, ImageSet, LeapOfFaithInputs, MomTestInputs,
    MomTestSheet,
};

fn parse_body<T: DeserializeOwned>(body: &Bytes) -> ApiResult<T> {
    serde_json::from_slice(body)
        .map_err(|e| ApiError::internal("Invalid JSON request body", e.to_string()))
}

/// CORS preflight
pub async fn preflight() -> &'static str {
    "ok"
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "providers": state.generator.provider_status(),
    }))
}

pub async fn leap_of_faith(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<Generated<Assumptions>>> {
    let inputs: LeapOfFaithInputs = parse_body(&body)?;
    let span = info_span!("leap_of_faith", request_id = %Uuid::new_v4(), intent = %inputs.intent());
    async {
        info!("Generating leap of faith");
        Ok::<_, ApiError>(Json(state.generator.leap_of_faith(&inputs).await?))
    }
    .instrument(span)
    .await
}

pub async fn mom_test(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<Generated<MomTestSheet>>> {
    let inputs: MomTestInputs = parse_body(&body)?;
    let span = info_span!("mom_test", request_id = %Uuid::new_v4());
    async {
        info!(category = %inputs.assumption_category, "Generating Mom-Test questions");
        Ok::<_, ApiError>(Json(state.generator.mom_test(&inputs).await))
    }
    .instrument(span)
    .await
}

pub async fn business_image(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<Generated<ImageSet>>> {
    let inputs: ImageInputs = parse_body(&body)?;
    let span = info_span!("business_image", request_id = %Uuid::new_v4());
    async {
        info!(style = %inputs.style_preset, n = ?inputs.n, "Generating business image");
        Ok::<_, ApiError>(Json(state.generator.business_image(&inputs).await))
    }
    .instrument(span)
    .await
}
