// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for submissions, CRM relays, health and metrics.

use std::net::SocketAddr;

use axum::Json;
use axum::body::{Body, Bytes};
use axum::extract::{ConnectInfo, Query, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sitesmith_core::types::{AdapterType, WebsiteRequest};
use sitesmith_core::SitesmithError;
use sitesmith_crm::{BookingForm, ContactForm};
use tracing::info;

use crate::error::ApiError;
use crate::rate_limit::{RateLimiter, client_id};
use crate::server::GatewayState;

/// Largest accepted request body.
const MAX_BODY_BYTES: usize = 256 * 1024;
const MAX_IDEMPOTENCY_KEY_LEN: usize = 255;

/// Response body for POST /api/generate-website.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub success: bool,
    pub job_id: String,
    pub status_url: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub jobs_in_store: usize,
    pub adapters: Vec<AdapterInfo>,
}

#[derive(Debug, Serialize)]
pub struct AdapterInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AdapterType,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotsQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// POST /api/generate-website
///
/// Validates the request, stores a queued job and starts the pipeline in the
/// background. The response only carries the job id and where to poll.
pub async fn post_generate_website(
    State(state): State<GatewayState>,
    request: Request,
) -> Result<Json<SubmitResponse>, ApiError> {
    let (parts, body) = request.into_parts();
    limit(&state.submit_limiter, &parts)?;

    let input: WebsiteRequest = parse_json(body).await?;
    input.validate()?;

    let (job, created) = match idempotency_key(&parts)? {
        Some(key) => state.store.create_job_with_key(input, &key),
        None => (state.store.create_job(input), true),
    };

    if created {
        sitesmith_prometheus::record_job_submitted();
        state.orchestrator.spawn(job.id.clone());
        info!(job_id = %job.id, company = %job.input.company_name, "generation job accepted");
    } else {
        info!(job_id = %job.id, "duplicate submission, returning existing job");
    }

    let base = state.public_base_url.as_deref().unwrap_or("");
    Ok(Json(SubmitResponse {
        success: true,
        status_url: format!("{base}/api/website-status?jobId={}", job.id),
        job_id: job.id,
    }))
}

/// POST /api/contact
pub async fn post_contact(
    State(state): State<GatewayState>,
    request: Request,
) -> Result<Json<Value>, ApiError> {
    let (parts, body) = request.into_parts();
    limit(&state.contact_limiter, &parts)?;

    let form: ContactForm = parse_json(body).await?;
    form.validate()?;
    let crm = configured_crm(&state)?;
    let payload = to_payload(&form)?;
    Ok(Json(crm.forward_contact(payload).await?))
}

/// POST /api/booking
pub async fn post_booking(
    State(state): State<GatewayState>,
    request: Request,
) -> Result<Json<Value>, ApiError> {
    let (parts, body) = request.into_parts();
    limit(&state.contact_limiter, &parts)?;

    let form: BookingForm = parse_json(body).await?;
    form.validate()?;
    let crm = configured_crm(&state)?;
    let payload = to_payload(&form)?;
    Ok(Json(crm.forward_booking(payload).await?))
}

/// GET /api/calendar/slots?startDate=YYYY-MM-DD&endDate=YYYY-MM-DD
pub async fn get_calendar_slots(
    State(state): State<GatewayState>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<Value>, ApiError> {
    let (Some(start), Some(end)) = (query.start_date, query.end_date) else {
        return Err(ApiError::bad_request("startDate and endDate are required"));
    };
    let crm = configured_crm(&state)?;
    Ok(Json(crm.free_slots(&start, &end).await?))
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    let mut adapters: Vec<AdapterInfo> = state
        .orchestrator
        .adapters()
        .into_iter()
        .map(|(name, kind)| AdapterInfo { name, kind })
        .collect();
    if let Some(crm) = &state.crm {
        adapters.push(AdapterInfo {
            name: crm.name().to_string(),
            kind: crm.adapter_type(),
        });
    }

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        jobs_in_store: state.store.len(),
        adapters,
    })
}

/// GET /metrics
pub async fn get_metrics(State(state): State<GatewayState>) -> Response {
    match &state.metrics {
        Some(render) => (
            StatusCode::OK,
            [(CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
            render(),
        )
            .into_response(),
        None => ApiError::not_found("metrics are disabled").into_response(),
    }
}

fn limit(limiter: &RateLimiter, parts: &Parts) -> Result<(), ApiError> {
    let peer = parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0);
    let client = client_id(&parts.headers, peer);
    limiter.check(&client).map_err(|retry_after| {
        info!(%client, retry_after_secs = retry_after.as_secs(), "rate limit exceeded");
        ApiError::rate_limited(retry_after)
    })
}

fn idempotency_key(parts: &Parts) -> Result<Option<String>, ApiError> {
    let Some(value) = parts.headers.get("idempotency-key") else {
        return Ok(None);
    };
    let key = value
        .to_str()
        .map_err(|_| ApiError::bad_request("Idempotency-Key must be visible ASCII"))?
        .trim();
    if key.is_empty() {
        return Ok(None);
    }
    if key.len() > MAX_IDEMPOTENCY_KEY_LEN {
        return Err(ApiError::bad_request("Idempotency-Key is too long"));
    }
    Ok(Some(key.to_string()))
}

async fn parse_json<T: DeserializeOwned>(body: Body) -> Result<T, ApiError> {
    let bytes: Bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| ApiError::bad_request(format!("could not read request body: {e}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| ApiError::bad_request(format!("invalid JSON body: {e}")))
}

fn configured_crm(state: &GatewayState) -> Result<&dyn sitesmith_core::CrmRelay, ApiError> {
    state
        .crm
        .as_deref()
        .ok_or_else(|| SitesmithError::Config("CRM relay is not configured".into()).into())
}

fn to_payload<T: Serialize>(form: &T) -> Result<Value, ApiError> {
    serde_json::to_value(form)
        .map_err(|e| SitesmithError::Internal(format!("failed to encode submission: {e}")).into())
}
