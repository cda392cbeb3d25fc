// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contact form and booking relays for generated sites, plus calendar
//! availability from the CRM.

pub mod client;
pub mod forms;

use secrecy::SecretString;
use sitesmith_config::{SitesmithConfig, resolve_secret};
use sitesmith_core::SitesmithError;

pub use client::CrmClient;
pub use forms::{BookingForm, ContactForm};

pub const CRM_API_KEY_ENV: &str = "CRM_API_KEY";

/// Builds the relay from `[crm]`. Unset webhooks surface as errors per call.
pub fn crm_from_config(config: &SitesmithConfig) -> Result<CrmClient, SitesmithError> {
    let crm = &config.crm;
    let api_key = resolve_secret(&crm.api_key, CRM_API_KEY_ENV).map(SecretString::from);
    Ok(CrmClient::new(crm.base_url.clone())?
        .with_contact_webhook(crm.contact_webhook_url.clone())
        .with_booking_webhook(crm.booking_webhook_url.clone())
        .with_calendar(api_key, crm.calendar_id.clone()))
}
