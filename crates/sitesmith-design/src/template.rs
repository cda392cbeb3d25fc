// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Template selection: ask the model, fall back to industry keywords.

use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;
use sitesmith_core::template::TemplateId;
use sitesmith_core::traits::{GenerationRequest, TextGenerator};
use sitesmith_core::types::{ColorPalette, WebsiteRequest};
use sitesmith_core::SitesmithError;
use tracing::{debug, info, warn};

use crate::json::parse_model_json;

/// Keywords shorter than this only match a whole word or its plural;
/// longer ones also match as a stem (`dentist` in `dentistry`).
const MIN_STEM_LEN: usize = 5;

/// Checked in order; the first template with a keyword matching any word
/// of the industry wins.
const KEYWORDS: &[(TemplateId, &[&str])] = &[
    (
        TemplateId::BeautySalon,
        &[
            "beauty", "salon", "hair", "hairdress", "barber", "spa", "nail", "cosmetic",
            "makeup", "lash", "brow", "esthetic", "aesthetic",
        ],
    ),
    (
        TemplateId::FitnessStudio,
        &[
            "fitness", "gym", "yoga", "pilates", "trainer", "training", "crossfit", "martial",
            "boxing", "dance", "dancing",
        ],
    ),
    (
        TemplateId::HealthClinic,
        &[
            "health", "medical", "clinic", "dental", "dentist", "doctor", "physio", "therap",
            "chiropract", "wellness", "pharmac", "veterin", "optomet", "hospital",
        ],
    ),
    (
        TemplateId::Restaurant,
        &[
            "restaurant", "cafe", "café", "cafeteria", "coffee", "bakery", "bistro", "pizza",
            "pizzeria", "food", "cater", "diner", "grill", "kitchen", "brewer", "brewing",
            "pub", "bar",
        ],
    ),
    (
        TemplateId::ConstructionTrades,
        &[
            "construct", "builder", "building", "plumb", "electric", "roofing", "roofer",
            "hvac", "landscap", "lawn", "contractor", "carpent", "painting", "renovat",
            "handyman", "remodel",
        ],
    ),
    (
        TemplateId::ProfessionalServices,
        &[
            "law", "legal", "attorney", "lawyer", "account", "consult", "insurance", "financ",
            "tax", "bookkeep", "architect", "advis",
        ],
    ),
    (
        TemplateId::RealEstate,
        &["realt", "estate", "property", "properties", "mortgage", "housing", "rental"],
    ),
    (
        TemplateId::RetailShop,
        &[
            "retail", "shop", "store", "boutique", "florist", "flower", "gift", "jewel",
            "cloth", "fashion", "ecommerce", "apparel",
        ],
    ),
    (
        TemplateId::TechStartup,
        &[
            "tech", "technolog", "software", "saas", "startup", "digital", "cyber", "cloud",
            "developer", "computer", "web",
        ],
    ),
];

#[derive(Debug, Deserialize)]
struct TemplateAnswer {
    template: String,
    #[serde(default)]
    reason: Option<String>,
}

/// Picks a catalog template for a business. Never fails.
pub struct TemplateSelector {
    generator: Arc<dyn TextGenerator>,
}

impl TemplateSelector {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub async fn select(&self, request: &WebsiteRequest, palette: &ColorPalette) -> TemplateId {
        match self.ask_model(request, palette).await {
            Ok(template) => template,
            Err(e) => {
                let template = template_for_industry(&request.industry);
                warn!(error = %e, %template, "template selection fell back to keywords");
                sitesmith_prometheus::record_fallback("template");
                template
            }
        }
    }

    async fn ask_model(
        &self,
        request: &WebsiteRequest,
        palette: &ColorPalette,
    ) -> Result<TemplateId, SitesmithError> {
        let generation = GenerationRequest::json(build_prompt(request, palette)).with_temperature(0.2);
        let text = self.generator.generate(generation).await?;
        let answer: TemplateAnswer = parse_model_json(&text, "template")?;

        let template = TemplateId::from_str(answer.template.trim()).map_err(|_| {
            SitesmithError::Content(format!(
                "model chose `{}`, which is not in the catalog",
                answer.template
            ))
        })?;
        info!(%template, reason = answer.reason.as_deref().unwrap_or(""), "template selected");
        Ok(template)
    }
}

/// Keyword fallback: `"Restaurant"` maps to `restaurant`, anything
/// unrecognized to `service-business`.
pub fn template_for_industry(industry: &str) -> TemplateId {
    let lowered = industry.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    KEYWORDS
        .iter()
        .find(|(_, keywords)| {
            words
                .iter()
                .any(|word| keywords.iter().any(|k| keyword_matches(k, word)))
        })
        .map(|(template, _)| *template)
        .unwrap_or_else(|| {
            debug!(industry, "no industry keyword matched");
            TemplateId::default()
        })
}

fn keyword_matches(keyword: &str, word: &str) -> bool {
    if keyword.len() >= MIN_STEM_LEN {
        return word.starts_with(keyword);
    }
    match word.strip_prefix(keyword) {
        Some(rest) => matches!(rest, "" | "s" | "es"),
        None => false,
    }
}

fn build_prompt(request: &WebsiteRequest, palette: &ColorPalette) -> String {
    let catalog: String = TemplateId::catalog()
        .map(|t| format!("- {t}: {}\n", t.description()))
        .collect();
    format!(
        "Pick the best website template for this business.\n\n\
         Company: {company}\n\
         Industry: {industry}\n\
         Description: {description}\n\
         Brand colors: primary {primary}, secondary {secondary}, accent {accent}\n\n\
         Templates:\n{catalog}\n\
         Reply with a JSON object {{\"template\": \"<template name>\", \"reason\": \"<one sentence>\"}} \
         where the template name is exactly one of the names listed above.",
        company = request.company_name.trim(),
        industry = request.industry.trim(),
        description = request.description.as_deref().unwrap_or("not provided"),
        primary = palette.primary,
        secondary = palette.secondary,
        accent = palette.accent,
    )
}
