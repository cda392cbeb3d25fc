// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turns a free-text color description into a three-color palette.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::Deserialize;
use sitesmith_core::traits::{GenerationRequest, TextGenerator};
use sitesmith_core::types::{ColorPalette, WebsiteRequest};
use sitesmith_core::SitesmithError;
use tracing::{debug, warn};

use crate::json::parse_model_json;

/// A 6-digit hex code not followed by another word character.
static HEX_IN_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#[0-9A-Fa-f]{6}\b").expect("static regex"));

const SYSTEM_PROMPT: &str = "You are a brand designer. You answer with JSON only.";

#[derive(Debug, Deserialize)]
struct PaletteAnswer {
    primary: Option<String>,
    secondary: Option<String>,
    accent: Option<String>,
}

/// Resolves brand colors, falling back to [`ColorPalette::fallback`] on any failure.
pub struct ColorResolver {
    generator: Arc<dyn TextGenerator>,
}

impl ColorResolver {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Always yields a valid palette.
    pub async fn resolve(&self, request: &WebsiteRequest) -> ColorPalette {
        let description = request.colors.trim();
        if description.is_empty() {
            debug!("no color description, using fallback palette");
            sitesmith_prometheus::record_fallback("colors");
            return ColorPalette::fallback();
        }

        if let Some(palette) = palette_from_hex_codes(description) {
            debug!(primary = %palette.primary, "palette taken from explicit hex codes");
            return palette;
        }

        match self.ask_model(request, description).await {
            Ok(palette) => palette,
            Err(e) => {
                warn!(error = %e, "color resolution failed, using fallback palette");
                sitesmith_prometheus::record_fallback("colors");
                ColorPalette::fallback()
            }
        }
    }

    async fn ask_model(
        &self,
        request: &WebsiteRequest,
        description: &str,
    ) -> Result<ColorPalette, SitesmithError> {
        let prompt = build_prompt(request, description);
        let generation = GenerationRequest {
            system: Some(SYSTEM_PROMPT.to_string()),
            ..GenerationRequest::json(prompt)
        }
        .with_temperature(0.3);

        let text = self.generator.generate(generation).await?;
        let answer: PaletteAnswer = parse_model_json(&text, "colors")?;

        let field = |v: &Option<String>| v.as_deref().unwrap_or_default().to_string();
        ColorPalette::from_hex(
            &field(&answer.primary),
            &field(&answer.secondary),
            &field(&answer.accent),
        )
        .ok_or_else(|| {
            SitesmithError::Content(format!("model returned an invalid palette: {answer:?}"))
        })
    }
}

/// First three hex codes of `text`, if it carries at least three.
pub fn palette_from_hex_codes(text: &str) -> Option<ColorPalette> {
    let codes: Vec<&str> = HEX_IN_TEXT
        .find_iter(text)
        .take(3)
        .map(|m| m.as_str())
        .collect();
    match codes.as_slice() {
        [p, s, a] => ColorPalette::from_hex(p, s, a),
        _ => None,
    }
}

fn build_prompt(request: &WebsiteRequest, description: &str) -> String {
    let themes = if request.brand_themes.is_empty() {
        "none given".to_string()
    } else {
        request.brand_themes.join(", ")
    };
    format!(
        "Choose a website color palette for \"{company}\", a {industry} business.\n\
         The owner describes the colors as: \"{description}\".\n\
         Brand themes: {themes}.\n\n\
         Reply with a JSON object with exactly the keys \"primary\", \"secondary\" and \
         \"accent\". Each value must be a 6-digit hex code such as \"#1A2B3C\". \
         The primary color is used for headers and buttons, the secondary for highlights, \
         the accent for text and dark backgrounds.",
        company = request.company_name.trim(),
        industry = request.industry.trim(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use sitesmith_test_utils::MockTextGenerator;

    fn request(colors: &str) -> WebsiteRequest {
        WebsiteRequest {
            company_name: "Harbor Dental".into(),
            industry: "Dentist".into(),
            colors: colors.into(),
            pages: vec!["Home".into()],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn uses_model_palette_when_valid() {
        let generator = Arc::new(MockTextGenerator::with_responses(vec![
            r##"{"primary":"#0A3D62","secondary":"#60A3BC","accent":"#F8EFBA"}"##.into(),
        ]));
        let resolver = ColorResolver::new(generator.clone());
        let palette = resolver.resolve(&request("ocean blues and sand")).await;
        assert_eq!(palette.primary, "#0A3D62");
        assert_eq!(palette.accent, "#F8EFBA");

        let sent = generator.requests().await;
        assert_eq!(sent.len(), 1);
        assert!(sent[0].json_response);
        assert!(sent[0].prompt.contains("ocean blues and sand"));
    }

    #[tokio::test]
    async fn explicit_hex_codes_skip_the_model() {
        let generator = Arc::new(MockTextGenerator::new());
        let resolver = ColorResolver::new(generator.clone());
        let palette = resolver
            .resolve(&request("use #112233, #445566 and #778899 please"))
            .await;
        assert_eq!(
            palette,
            ColorPalette::from_hex("#112233", "#445566", "#778899").unwrap()
        );
        assert_eq!(generator.call_count().await, 0);
    }

    #[tokio::test]
    async fn unparsable_answer_yields_exact_fallback() {
        let generator = Arc::new(MockTextGenerator::with_responses(vec![
            "I think navy would look great!".into(),
        ]));
        let palette = ColorResolver::new(generator).resolve(&request("navy")).await;
        assert_eq!(palette, ColorPalette::fallback());
        assert_eq!(palette.primary, "#D32F2F");
        assert_eq!(palette.secondary, "#FFC107");
        assert_eq!(palette.accent, "#263238");
    }

    #[tokio::test]
    async fn invalid_hex_in_answer_yields_fallback() {
        let generator = Arc::new(MockTextGenerator::with_responses(vec![
            r##"{"primary":"navy","secondary":"#FFFFFF","accent":"#000000"}"##.into(),
        ]));
        let palette = ColorResolver::new(generator).resolve(&request("navy")).await;
        assert_eq!(palette, ColorPalette::fallback());
    }

    #[tokio::test]
    async fn model_error_yields_fallback() {
        let generator = Arc::new(MockTextGenerator::new());
        let palette = ColorResolver::new(generator).resolve(&request("green")).await;
        assert_eq!(palette, ColorPalette::fallback());
    }

    #[tokio::test]
    async fn empty_description_yields_fallback_without_model() {
        let generator = Arc::new(MockTextGenerator::new());
        let palette = ColorResolver::new(generator.clone()).resolve(&request("  ")).await;
        assert_eq!(palette, ColorPalette::fallback());
        assert_eq!(generator.call_count().await, 0);
    }

    #[test]
    fn fewer_than_three_codes_is_not_a_palette() {
        assert!(palette_from_hex_codes("#112233 and #445566").is_none());
        assert!(palette_from_hex_codes("#1122334 #445566 #778899").is_none());
    }

    proptest! {
        #[test]
        fn any_three_hex_codes_are_used_in_order(
            a in "[0-9A-Fa-f]{6}",
            b in "[0-9A-Fa-f]{6}",
            c in "[0-9A-Fa-f]{6}",
        ) {
            let text = format!("primary #{a}, then #{b} and finally #{c}.");
            let palette = palette_from_hex_codes(&text).unwrap();
            prop_assert!(palette.is_valid());
            prop_assert_eq!(palette.primary, format!("#{a}"));
            prop_assert_eq!(palette.secondary, format!("#{b}"));
            prop_assert_eq!(palette.accent, format!("#{c}"));
        }
    }
}
