// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Visitor submissions accepted by the relay endpoints.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sitesmith_core::types::looks_like_email;
use sitesmith_core::SitesmithError;

const MAX_FIELD_LEN: usize = 5000;

/// A contact form submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

impl ContactForm {
    pub fn validate(&self) -> Result<(), SitesmithError> {
        let mut problems = Vec::new();
        require(&mut problems, "name", &self.name);
        require(&mut problems, "message", &self.message);
        check_email(&mut problems, &self.email);
        finish(problems)
    }
}

/// A booking request for a date and time slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingForm {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl BookingForm {
    pub fn validate(&self) -> Result<(), SitesmithError> {
        let mut problems = Vec::new();
        require(&mut problems, "name", &self.name);
        check_email(&mut problems, &self.email);
        if NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").is_err() {
            problems.push("date must be YYYY-MM-DD".to_string());
        }
        if NaiveTime::parse_from_str(self.time.trim(), "%H:%M").is_err() {
            problems.push("time must be HH:MM".to_string());
        }
        finish(problems)
    }
}

fn require(problems: &mut Vec<String>, field: &str, value: &str) {
    if value.trim().is_empty() {
        problems.push(format!("{field} is required"));
    } else if value.len() > MAX_FIELD_LEN {
        problems.push(format!("{field} is too long"));
    }
}

fn check_email(problems: &mut Vec<String>, email: &str) {
    if email.trim().is_empty() {
        problems.push("email is required".to_string());
    } else if !looks_like_email(email.trim()) {
        problems.push("email is not a valid address".to_string());
    }
}

fn finish(problems: Vec<String>) -> Result<(), SitesmithError> {
    if problems.is_empty() {
        Ok(())
    } else {
        Err(SitesmithError::Validation(problems.join("; ")))
    }
}
