// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `{{ name }}` placeholder interpolation.
//!
//! Values are inserted verbatim; callers escape them first. A trailing `?`
//! (`{{ name? }}`) marks a placeholder that may be left empty.

use std::collections::HashMap;

use sitesmith_core::SitesmithError;

#[derive(Debug, Default)]
pub struct Context {
    values: HashMap<&'static str, String>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &'static str, value: impl Into<String>) -> &mut Self {
        self.values.insert(key, value.into());
        self
    }
}

/// Renders `source` against `context`.
///
/// An unknown required placeholder or an unclosed `{{` is an internal error:
/// templates are compiled into the binary.
pub fn render(source: &str, context: &Context) -> Result<String, SitesmithError> {
    let mut out = String::with_capacity(source.len() * 2);
    let mut rest = source;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let close = after
            .find("}}")
            .ok_or_else(|| SitesmithError::Internal("unclosed `{{` in site template".into()))?;
        let raw = after[..close].trim();
        let (name, optional) = match raw.strip_suffix('?') {
            Some(name) => (name.trim(), true),
            None => (raw, false),
        };
        match context.values.get(name) {
            Some(value) => out.push_str(value),
            None if optional => {}
            None => {
                return Err(SitesmithError::Internal(format!(
                    "site template references unknown value `{name}`"
                )));
            }
        }
        rest = &after[close + 2..];
    }
    out.push_str(rest);
    Ok(out)
}
