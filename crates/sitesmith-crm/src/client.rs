// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP relay to the CRM.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, SecondsFormat, Utc};
use reqwest::Url;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use sitesmith_core::traits::{CrmRelay, ServiceAdapter};
use sitesmith_core::types::AdapterType;
use sitesmith_core::SitesmithError;
use tracing::{debug, info};

const SERVICE: &str = "crm";
const CALENDAR_API_VERSION: &str = "2021-04-15";
const CONTACT_SOURCE: &str = "sitesmith-contact-form";
const BOOKING_SOURCE: &str = "sitesmith-booking-form";

/// Forwards form submissions to CRM webhooks and reads calendar availability.
pub struct CrmClient {
    client: reqwest::Client,
    contact_webhook_url: Option<String>,
    booking_webhook_url: Option<String>,
    api_key: Option<SecretString>,
    calendar_id: Option<String>,
    base_url: String,
}

impl CrmClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, SitesmithError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SitesmithError::Internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            contact_webhook_url: None,
            booking_webhook_url: None,
            api_key: None,
            calendar_id: None,
            base_url: base_url.into(),
        })
    }

    pub fn with_contact_webhook(mut self, url: Option<String>) -> Self {
        self.contact_webhook_url = url;
        self
    }

    pub fn with_booking_webhook(mut self, url: Option<String>) -> Self {
        self.booking_webhook_url = url;
        self
    }

    pub fn with_calendar(mut self, api_key: Option<SecretString>, calendar_id: Option<String>) -> Self {
        self.api_key = api_key;
        self.calendar_id = calendar_id;
        self
    }

    async fn relay(
        &self,
        webhook: Option<&str>,
        kind: &str,
        source: &str,
        payload: Value,
    ) -> Result<Value, SitesmithError> {
        let url = webhook.ok_or_else(|| {
            SitesmithError::Config(format!("{kind} webhook URL is not configured"))
        })?;
        let body = stamp(payload, source);

        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| SitesmithError::transport(SERVICE, e))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(SitesmithError::Upstream {
                service: SERVICE.into(),
                status: Some(status.as_u16()),
                body: text,
            });
        }
        info!(kind, status = status.as_u16(), "submission forwarded");

        let upstream = serde_json::from_str::<Value>(&text).unwrap_or(Value::Null);
        Ok(serde_json::json!({ "success": true, "response": upstream }))
    }
}

/// Adds `source` and `submittedAt` to an object payload.
fn stamp(payload: Value, source: &str) -> Value {
    let mut object = match payload {
        Value::Object(map) => map,
        other => {
            let mut map = serde_json::Map::new();
            map.insert("data".into(), other);
            map
        }
    };
    object.insert("source".into(), Value::from(source));
    object.insert(
        "submittedAt".into(),
        Value::from(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    Value::Object(object)
}

/// Start of `date` (UTC) in epoch milliseconds; `end_of_day` moves it to the
/// last millisecond of that day.
fn epoch_millis(date: &str, field: &str, end_of_day: bool) -> Result<i64, SitesmithError> {
    let day = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| SitesmithError::Validation(format!("{field} must be YYYY-MM-DD")))?;
    let time = if end_of_day {
        day.and_hms_milli_opt(23, 59, 59, 999)
    } else {
        day.and_hms_opt(0, 0, 0)
    };
    time.map(|t| t.and_utc().timestamp_millis())
        .ok_or_else(|| SitesmithError::Validation(format!("{field} is out of range")))
}

#[async_trait]
impl ServiceAdapter for CrmClient {
    fn name(&self) -> &str {
        "crm"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Crm
    }
}

#[async_trait]
impl CrmRelay for CrmClient {
    async fn forward_contact(&self, payload: Value) -> Result<Value, SitesmithError> {
        self.relay(self.contact_webhook_url.as_deref(), "contact", CONTACT_SOURCE, payload)
            .await
    }

    async fn forward_booking(&self, payload: Value) -> Result<Value, SitesmithError> {
        self.relay(self.booking_webhook_url.as_deref(), "booking", BOOKING_SOURCE, payload)
            .await
    }

    async fn free_slots(&self, start_date: &str, end_date: &str) -> Result<Value, SitesmithError> {
        let (Some(key), Some(calendar)) = (&self.api_key, &self.calendar_id) else {
            return Err(SitesmithError::Config(
                "calendar lookups need crm.api_key and crm.calendar_id".into(),
            ));
        };
        let start = epoch_millis(start_date, "startDate", false)?;
        let end = epoch_millis(end_date, "endDate", true)?;
        if end < start {
            return Err(SitesmithError::Validation(
                "endDate must not be before startDate".into(),
            ));
        }

        let url = Url::parse_with_params(
            &format!(
                "{}/calendars/{calendar}/free-slots",
                self.base_url.trim_end_matches('/')
            ),
            &[("startDate", start.to_string()), ("endDate", end.to_string())],
        )
        .map_err(|e| SitesmithError::Config(format!("bad CRM base URL: {e}")))?;

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", key.expose_secret()))
            .map_err(|e| SitesmithError::Config(format!("invalid CRM API key: {e}")))?;
        auth.set_sensitive(true);

        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, auth)
            .header("version", CALENDAR_API_VERSION)
            .send()
            .await
            .map_err(|e| SitesmithError::transport(SERVICE, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SitesmithError::Upstream {
                service: SERVICE.into(),
                status: Some(status.as_u16()),
                body: response.text().await.unwrap_or_default(),
            });
        }
        debug!(calendar = %calendar, start_date, end_date, "free slots fetched");
        response
            .json()
            .await
            .map_err(|e| SitesmithError::transport(SERVICE, e))
    }
}
