// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! GET /api/website-status: one snapshot as JSON, or a live SSE stream.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::error::ApiError;
use crate::server::GatewayState;
use crate::sse;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusQuery {
    pub job_id: Option<String>,
    pub stream: Option<String>,
}

pub async fn get_website_status(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Query(query): Query<StatusQuery>,
) -> Result<Response, ApiError> {
    let job_id = query
        .job_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::bad_request("jobId query parameter is required"))?;

    let job = state
        .store
        .get_job(job_id)
        .ok_or_else(|| ApiError::not_found("Job not found"))?;

    if wants_stream(&headers, query.stream.as_deref()) {
        return Ok(sse::status_stream(&state, job).into_response());
    }
    Ok(Json(job).into_response())
}

/// `Accept: text/event-stream`, or `stream=true` / `stream=1`.
fn wants_stream(headers: &HeaderMap, stream: Option<&str>) -> bool {
    let accepts = headers
        .get("accept")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("text/event-stream"));
    let flag = stream.is_some_and(|s| s.eq_ignore_ascii_case("true") || s == "1");
    accepts || flag
}
