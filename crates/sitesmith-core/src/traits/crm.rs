// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CRM relay trait for contact forms, bookings and calendar slots.

use async_trait::async_trait;

use crate::error::SitesmithError;
use crate::traits::adapter::ServiceAdapter;

/// Forwards website submissions to the CRM.
///
/// Non-success upstream responses surface as
/// [`SitesmithError::Upstream`] carrying the upstream body.
#[async_trait]
pub trait CrmRelay: ServiceAdapter {
    async fn forward_contact(
        &self,
        payload: serde_json::Value,
    ) -> Result<serde_json::Value, SitesmithError>;

    async fn forward_booking(
        &self,
        payload: serde_json::Value,
    ) -> Result<serde_json::Value, SitesmithError>;

    /// Free calendar slots between two `YYYY-MM-DD` dates (inclusive).
    async fn free_slots(
        &self,
        start_date: &str,
        end_date: &str,
    ) -> Result<serde_json::Value, SitesmithError>;
}
