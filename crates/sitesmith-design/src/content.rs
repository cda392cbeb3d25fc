// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model-written page copy.

use std::sync::Arc;

use async_trait::async_trait;
use sitesmith_core::template::TemplateId;
use sitesmith_core::traits::{ContentGenerator, GenerationRequest, ServiceAdapter, TextGenerator};
use sitesmith_core::types::{
    AdapterType, ColorPalette, HealthStatus, SiteContent, WebsiteRequest, slugify,
};
use sitesmith_core::SitesmithError;
use tracing::{debug, info};

use crate::json::parse_model_json;

const SYSTEM_PROMPT: &str = "You are a senior copywriter for small-business websites. \
Write warm, specific, benefit-led copy. Never invent prices, awards or certifications. \
Answer with JSON only.";

/// [`ContentGenerator`] backed by a [`TextGenerator`].
pub struct AiContentGenerator {
    generator: Arc<dyn TextGenerator>,
}

impl AiContentGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl ServiceAdapter for AiContentGenerator {
    fn name(&self) -> &str {
        "ai-content"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::ContentGenerator
    }

    async fn health_check(&self) -> Result<HealthStatus, SitesmithError> {
        self.generator.health_check().await
    }
}

#[async_trait]
impl ContentGenerator for AiContentGenerator {
    async fn generate(
        &self,
        request: &WebsiteRequest,
        template: TemplateId,
        palette: &ColorPalette,
    ) -> Result<SiteContent, SitesmithError> {
        let generation = GenerationRequest {
            system: Some(SYSTEM_PROMPT.to_string()),
            ..GenerationRequest::json(build_prompt(request, template, palette))
        }
        .with_temperature(0.7)
        .with_max_output_tokens(8192);

        let text = self.generator.generate(generation).await?;
        let raw: SiteContent = parse_model_json(&text, "site content")?;
        let content = normalize(raw, request)?;
        info!(
            pages = content.pages.len(),
            image_queries = content.image_queries.len(),
            "site content generated"
        );
        Ok(content)
    }
}

/// Orders pages as requested, normalizes slugs and fills blank headings.
///
/// Every requested page must be present in the model answer.
pub fn normalize(mut content: SiteContent, request: &WebsiteRequest) -> Result<SiteContent, SitesmithError> {
    for page in &mut content.pages {
        let source = if page.slug.trim().is_empty() {
            page.title.as_str()
        } else {
            page.slug.as_str()
        };
        page.slug = slugify(source);
    }

    let mut ordered = Vec::new();
    let mut missing = Vec::new();
    for name in request.page_names() {
        let slug = slugify(name);
        match content.pages.iter().position(|p| p.slug == slug) {
            Some(index) => {
                let mut page = content.pages.swap_remove(index);
                if page.title.trim().is_empty() {
                    page.title = name.to_string();
                }
                ordered.push(page);
            }
            None => missing.push(name.to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(SitesmithError::Content(format!(
            "generated content is missing page(s): {}",
            missing.join(", ")
        )));
    }
    if !content.pages.is_empty() {
        debug!(extra = content.pages.len(), "dropping pages that were not requested");
    }
    content.pages = ordered;

    if content.site_title.trim().is_empty() {
        content.site_title = request.company_name.trim().to_string();
    }
    if content.hero.headline.trim().is_empty() {
        content.hero.headline = content.site_title.clone();
    }
    content
        .image_queries
        .retain(|q| !q.trim().is_empty());
    Ok(content)
}

fn build_prompt(request: &WebsiteRequest, template: TemplateId, palette: &ColorPalette) -> String {
    let pages: Vec<String> = request
        .page_names()
        .iter()
        .map(|name| format!("\"{}\" (slug \"{}\")", name, slugify(name)))
        .collect();
    let sections = request.quality.sections_per_page();
    let optional = |label: &str, value: &Option<String>| match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => format!("{label}: {v}\n"),
        _ => String::new(),
    };
    let mut features = Vec::new();
    if request.features.contact_form {
        features.push("contact form");
    }
    if request.features.booking {
        features.push("online booking");
    }
    if request.features.gallery {
        features.push("photo gallery");
    }
    if request.features.testimonials {
        features.push("testimonials");
    }

    format!(
        "Write the copy for a website.\n\n\
         Company: {company}\n\
         Industry: {industry}\n\
         {description}{address}{phone}{email}\
         Brand themes: {themes}\n\
         Template style: {template} ({template_description})\n\
         Brand colors: {primary}, {secondary}, {accent}\n\
         Site features: {features}\n\n\
         Pages: {pages}\n\
         Write {sections} sections per page.\n\n\
         Reply with one JSON object of this shape:\n\
         {{\"siteTitle\": \"...\", \"tagline\": \"...\", \
         \"hero\": {{\"headline\": \"...\", \"subheadline\": \"...\", \"ctaText\": \"...\"}}, \
         \"pages\": [{{\"slug\": \"...\", \"title\": \"...\", \
         \"sections\": [{{\"heading\": \"...\", \"body\": \"...\"}}]}}], \
         \"imageQueries\": [\"...\", \"...\"]}}\n\
         Use exactly the slugs given above. imageQueries are two short stock-photo \
         search terms that fit the business.",
        company = request.company_name.trim(),
        industry = request.industry.trim(),
        description = optional("Description", &request.description),
        address = optional("Address", &request.address),
        phone = optional("Phone", &request.phone),
        email = optional("Email", &request.email),
        themes = if request.brand_themes.is_empty() {
            "none given".to_string()
        } else {
            request.brand_themes.join(", ")
        },
        template_description = template.description(),
        primary = palette.primary,
        secondary = palette.secondary,
        accent = palette.accent,
        features = if features.is_empty() {
            "none".to_string()
        } else {
            features.join(", ")
        },
        pages = pages.join(", "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitesmith_core::types::{PageContent, QualityTier};
    use sitesmith_test_utils::MockTextGenerator;

    fn request() -> WebsiteRequest {
        WebsiteRequest {
            company_name: "Green Leaf Landscaping".into(),
            industry: "Landscaping".into(),
            pages: vec!["Home".into(), "About Us".into(), "Services".into()],
            quality: QualityTier::Premium,
            ..Default::default()
        }
    }

    fn answer() -> String {
        serde_json::json!({
            "siteTitle": "Green Leaf",
            "tagline": "Gardens that grow with you",
            "hero": {"headline": "Beautiful yards", "subheadline": "Since 1999", "ctaText": "Get a quote"},
            "pages": [
                {"slug": "services", "title": "Services", "sections": [{"heading": "Mowing", "body": "Weekly."}]},
                {"slug": "Home", "title": "Home", "sections": []},
                {"slug": "", "title": "About Us", "sections": []},
                {"slug": "blog", "title": "Blog", "sections": []}
            ],
            "imageQueries": ["garden design", ""]
        })
        .to_string()
    }

    #[tokio::test]
    async fn generates_pages_in_requested_order() {
        let generator = Arc::new(MockTextGenerator::with_responses(vec![format!(
            "```json\n{}\n```",
            answer()
        )]));
        let content = AiContentGenerator::new(generator.clone())
            .generate(&request(), TemplateId::ConstructionTrades, &ColorPalette::fallback())
            .await
            .unwrap();

        let slugs: Vec<&str> = content.pages.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["home", "about-us", "services"]);
        assert_eq!(content.image_queries, vec!["garden design".to_string()]);
        assert_eq!(content.hero.cta_text, "Get a quote");

        let prompt = &generator.requests().await[0].prompt;
        assert!(prompt.contains("\"About Us\" (slug \"about-us\")"));
        assert!(prompt.contains("Write 4 sections per page."));
    }

    #[tokio::test]
    async fn missing_page_is_a_content_error() {
        let body = serde_json::json!({
            "siteTitle": "Green Leaf",
            "pages": [{"slug": "home", "title": "Home", "sections": []}]
        });
        let generator = Arc::new(MockTextGenerator::with_responses(vec![body.to_string()]));
        let err = AiContentGenerator::new(generator)
            .generate(&request(), TemplateId::default(), &ColorPalette::fallback())
            .await
            .unwrap_err();
        assert!(matches!(err, SitesmithError::Content(_)));
        assert!(err.to_string().contains("About Us"));
    }

    #[tokio::test]
    async fn model_failure_propagates() {
        let generator = Arc::new(MockTextGenerator::new());
        let result = AiContentGenerator::new(generator)
            .generate(&request(), TemplateId::default(), &ColorPalette::fallback())
            .await;
        assert!(matches!(result, Err(SitesmithError::Provider { .. })));
    }

    #[test]
    fn blank_titles_are_filled_from_request() {
        let mut req = request();
        req.pages = vec!["Contact".into()];
        let raw = SiteContent {
            pages: vec![PageContent {
                slug: "contact".into(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let content = normalize(raw, &req).unwrap();
        assert_eq!(content.pages[0].title, "Contact");
        assert_eq!(content.site_title, "Green Leaf Landscaping");
        assert_eq!(content.hero.headline, "Green Leaf Landscaping");
    }

    #[test]
    fn pages_sharing_a_slug_are_generated_once() {
        let mut req = request();
        req.pages = vec!["Home".into(), "home".into(), "About Us".into()];
        let raw = SiteContent {
            pages: vec![
                PageContent {
                    slug: "about-us".into(),
                    title: "About Us".into(),
                    ..Default::default()
                },
                PageContent {
                    slug: "home".into(),
                    title: "Home".into(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let content = normalize(raw, &req).unwrap();
        let slugs: Vec<&str> = content.pages.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["home", "about-us"]);
    }
}
