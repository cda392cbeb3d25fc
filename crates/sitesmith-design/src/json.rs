// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pulls a JSON object out of model text.
//!
//! Even in JSON response mode the model sometimes wraps its answer in a
//! markdown fence or adds a sentence before it.

use serde::de::DeserializeOwned;
use sitesmith_core::SitesmithError;
use tracing::debug;

/// The outermost `{ ... }` span of `text`, fences and prose stripped.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Parses the JSON object embedded in `text`.
///
/// Failures are [`SitesmithError::Content`] naming `what` was expected.
pub fn parse_model_json<T: DeserializeOwned>(text: &str, what: &str) -> Result<T, SitesmithError> {
    let Some(json) = extract_json_object(text) else {
        debug!(raw = %text, "model answer had no JSON object");
        return Err(SitesmithError::Content(format!(
            "model answer for {what} contained no JSON object"
        )));
    };
    serde_json::from_str(json).map_err(|e| {
        debug!(raw = %text, "unparsable model JSON");
        SitesmithError::Content(format!("model answer for {what} is not valid JSON: {e}"))
    })
}
