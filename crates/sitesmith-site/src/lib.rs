// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Renders generated content into a static website.
//!
//! Output is a flat set of files ready to push to a repository:
//! `index.html`, one `<slug>.html` per further page, `assets/styles.css`,
//! `README.md` and `vercel.json`.

pub mod css;
pub mod html;
pub mod template;

use async_trait::async_trait;
use sitesmith_core::traits::{ServiceAdapter, SiteBuildInput, SiteBuilder};
use sitesmith_core::types::{AdapterType, ImageData, SiteFile};
use sitesmith_core::SitesmithError;
use tracing::debug;

use crate::html::escape;
use crate::template::{Context, render};

const DEFAULT_CONTACT_ENDPOINT: &str = "/api/contact";
const DEFAULT_BOOKING_ENDPOINT: &str = "/api/booking";

/// The [`SiteBuilder`] used in production.
#[derive(Debug, Clone)]
pub struct StaticSiteBuilder {
    contact_endpoint: String,
    booking_endpoint: String,
}

impl Default for StaticSiteBuilder {
    fn default() -> Self {
        Self {
            contact_endpoint: DEFAULT_CONTACT_ENDPOINT.to_string(),
            booking_endpoint: DEFAULT_BOOKING_ENDPOINT.to_string(),
        }
    }
}

impl StaticSiteBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Points generated forms at the relay endpoints under `origin`
    /// (e.g. `https://sitesmith.example.com`).
    pub fn with_api_origin(mut self, origin: &str) -> Self {
        let origin = origin.trim_end_matches('/');
        self.contact_endpoint = format!("{origin}{DEFAULT_CONTACT_ENDPOINT}");
        self.booking_endpoint = format!("{origin}{DEFAULT_BOOKING_ENDPOINT}");
        self
    }

    /// Renders every file for the site.
    pub fn render(&self, input: SiteBuildInput<'_>) -> Result<Vec<SiteFile>, SitesmithError> {
        let content = input.content;
        if content.pages.is_empty() {
            return Err(SitesmithError::Content(
                "cannot build a site without pages".into(),
            ));
        }

        let layout = input.template.layout();
        let found: Vec<&ImageData> = input.images.iter().flatten().collect();
        let links: Vec<(String, String)> = content
            .pages
            .iter()
            .enumerate()
            .map(|(i, page)| (page_file(i, &page.slug), page.title.clone()))
            .collect();
        let contact_page = content
            .pages
            .iter()
            .position(|p| p.slug.contains("contact"))
            .unwrap_or(0);
        let footer = footer(input, &found);

        let mut files = Vec::with_capacity(content.pages.len() + 3);
        for (i, page) in content.pages.iter().enumerate() {
            let file = &links[i].0;
            let is_index = i == 0;

            let hero = if is_index {
                let cta_href = if input.request.features.contact_form {
                    format!("{}#contact", links[contact_page].0)
                } else {
                    links.get(1).map(|l| l.0.clone()).unwrap_or_else(|| "#".into())
                };
                html::hero(
                    css::hero_class(layout.hero),
                    &content.hero.headline,
                    &content.hero.subheadline,
                    &content.hero.cta_text,
                    &cta_href,
                    found.first().copied(),
                )
            } else {
                String::new()
            };
            let gallery = if is_index && input.request.features.gallery {
                html::gallery(&found)
            } else {
                String::new()
            };
            let forms = if i == contact_page {
                html::forms(
                    input.request.features,
                    &self.contact_endpoint,
                    &self.booking_endpoint,
                )
            } else {
                String::new()
            };

            let title = if is_index {
                format!("{} | {}", content.site_title, content.tagline)
            } else {
                format!("{} | {}", page.title, content.site_title)
            };

            let mut ctx = Context::new();
            ctx.set("title", escape(title.trim_end_matches(" | ")))
                .set("description", escape(&content.tagline))
                .set("font_query", escape(&css::font_query(&layout)))
                .set("template", input.template.to_string())
                .set("site_title", escape(&content.site_title))
                .set("nav", html::nav(&links, file))
                .set("hero", hero)
                .set("sections", html::sections(&page.title, &page.sections, !is_index))
                .set("gallery", gallery)
                .set("forms", forms)
                .set("footer", footer.clone());

            files.push(SiteFile::new(file.clone(), render(html::PAGE_LAYOUT, &ctx)?));
        }

        files.push(SiteFile::new(
            "assets/styles.css",
            css::stylesheet(input.palette, &layout),
        ));
        files.push(SiteFile::new("README.md", readme(input, &links)));
        files.push(SiteFile::new("vercel.json", vercel_json()));

        debug!(files = files.len(), template = %input.template, "site rendered");
        Ok(files)
    }
}

#[async_trait]
impl ServiceAdapter for StaticSiteBuilder {
    fn name(&self) -> &str {
        "static-site"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::SiteBuilder
    }
}

#[async_trait]
impl SiteBuilder for StaticSiteBuilder {
    async fn build(&self, input: SiteBuildInput<'_>) -> Result<Vec<SiteFile>, SitesmithError> {
        self.render(input)
    }
}

/// The first page is always `index.html`.
fn page_file(index: usize, slug: &str) -> String {
    if index == 0 {
        "index.html".to_string()
    } else if slug.is_empty() || slug == "index" {
        format!("page-{index}.html")
    } else {
        format!("{slug}.html")
    }
}

fn footer(input: SiteBuildInput<'_>, images: &[&ImageData]) -> String {
    let request = input.request;
    let mut lines = vec![format!(
        "      <p><strong>{}</strong></p>\n",
        escape(&input.content.site_title)
    )];
    if let Some(address) = request.address.as_deref().filter(|a| !a.trim().is_empty()) {
        lines.push(format!("      <p>{}</p>\n", escape(address.trim())));
    }
    if let Some(phone) = request.phone.as_deref().filter(|p| !p.trim().is_empty()) {
        let dial: String = phone
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '+')
            .collect();
        lines.push(format!(
            "      <p><a href=\"tel:{}\">{}</a></p>\n",
            escape(&dial),
            escape(phone.trim())
        ));
    }
    if let Some(email) = request.email.as_deref().filter(|e| !e.trim().is_empty()) {
        lines.push(format!(
            "      <p><a href=\"mailto:{0}\">{0}</a></p>\n",
            escape(email.trim())
        ));
    }
    if !images.is_empty() {
        let credits: Vec<String> = images.iter().map(|i| escape(&i.attribution())).collect();
        lines.push(format!(
            "      <p class=\"credits\">{}</p>\n",
            credits.join(" &middot; ")
        ));
    }
    lines.concat()
}

fn readme(input: SiteBuildInput<'_>, links: &[(String, String)]) -> String {
    let content = input.content;
    let pages: String = links
        .iter()
        .map(|(file, title)| format!("- [{title}]({file})\n"))
        .collect();
    format!(
        "# {title}\n\n\
         {tagline}\n\n\
         Static website for {company} ({industry}).\n\n\
         ## Pages\n\n{pages}\n\
         ## Design\n\n\
         - Template: `{template}`\n\
         - Primary color: `{primary}`\n\
         - Secondary color: `{secondary}`\n\
         - Accent color: `{accent}`\n\n\
         ## Deploying\n\n\
         The site is plain HTML and CSS with no build step. Import the repository \
         into Vercel or serve the repository root from any static host.\n",
        title = content.site_title,
        tagline = content.tagline,
        company = input.request.company_name.trim(),
        industry = input.request.industry.trim(),
        template = input.template,
        primary = input.palette.primary,
        secondary = input.palette.secondary,
        accent = input.palette.accent,
    )
}

fn vercel_json() -> String {
    let config = serde_json::json!({
        "$schema": "https://openapi.vercel.sh/vercel.json",
        "cleanUrls": true,
        "trailingSlash": false,
        "buildCommand": null,
        "outputDirectory": "."
    });
    let mut text = serde_json::to_string_pretty(&config).unwrap_or_else(|_| config.to_string());
    text.push('\n');
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitesmith_core::template::TemplateId;
    use sitesmith_core::types::{
        ColorPalette, FeatureFlags, HeroContent, ImageProvider, PageContent, Section,
        SiteContent, WebsiteRequest,
    };

    fn request(features: FeatureFlags) -> WebsiteRequest {
        WebsiteRequest {
            company_name: "Rosa's <Kitchen>".into(),
            industry: "Restaurant".into(),
            phone: Some("+1 (555) 010-2030".into()),
            email: Some("hi@rosas.example".into()),
            pages: vec!["Home".into(), "Menu".into(), "Contact".into()],
            features,
            ..Default::default()
        }
    }

    fn content() -> SiteContent {
        let page = |slug: &str, title: &str| PageContent {
            slug: slug.into(),
            title: title.into(),
            sections: vec![Section {
                heading: format!("{title} & more"),
                body: "Fresh pasta.\n\nMade <daily>.".into(),
            }],
        };
        SiteContent {
            site_title: "Rosa's <Kitchen>".into(),
            tagline: "Pasta \"done right\"".into(),
            hero: HeroContent {
                headline: "Welcome".into(),
                subheadline: "Since 1987".into(),
                cta_text: "Reserve".into(),
            },
            pages: vec![page("home", "Home"), page("menu", "Menu"), page("contact", "Contact")],
            image_queries: vec![],
        }
    }

    fn image() -> ImageData {
        ImageData {
            url: "https://images.example/1.jpg".into(),
            alt: "pasta".into(),
            photographer: "Lu".into(),
            photographer_url: None,
            source: ImageProvider::Unsplash,
        }
    }

    fn build(features: FeatureFlags, images: &[Option<ImageData>]) -> Vec<SiteFile> {
        let req = request(features);
        let content = content();
        let palette = ColorPalette::fallback();
        StaticSiteBuilder::new()
            .render(SiteBuildInput {
                request: &req,
                template: TemplateId::Restaurant,
                palette: &palette,
                content: &content,
                images,
            })
            .unwrap()
    }

    fn file<'a>(files: &'a [SiteFile], path: &str) -> &'a str {
        &files.iter().find(|f| f.path == path).unwrap().content
    }

    #[test]
    fn produces_expected_file_set() {
        let files = build(FeatureFlags::default(), &[]);
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "index.html",
                "menu.html",
                "contact.html",
                "assets/styles.css",
                "README.md",
                "vercel.json"
            ]
        );
    }

    #[test]
    fn interpolated_text_is_escaped() {
        let files = build(FeatureFlags::default(), &[]);
        let index = file(&files, "index.html");
        assert!(index.contains("Rosa&#39;s &lt;Kitchen&gt;"));
        assert!(!index.contains("<Kitchen>"));
        assert!(index.contains("Made &lt;daily&gt;."));
        assert!(index.contains("Pasta &quot;done right&quot;"));
    }

    #[test]
    fn navigation_links_every_page() {
        let files = build(FeatureFlags::default(), &[]);
        for page in ["index.html", "menu.html", "contact.html"] {
            let html = file(&files, page);
            assert!(html.contains("href=\"index.html\""));
            assert!(html.contains("href=\"menu.html\""));
            assert!(html.contains("href=\"contact.html\""));
        }
    }

    #[test]
    fn contact_form_only_when_requested() {
        let without = build(FeatureFlags::default(), &[]);
        assert!(!file(&without, "contact.html").contains("<form"));

        let with = build(
            FeatureFlags {
                contact_form: true,
                ..Default::default()
            },
            &[],
        );
        let contact = file(&with, "contact.html");
        assert!(contact.contains("class=\"contact-form\""));
        assert!(contact.contains("action=\"/api/contact\""));
        assert!(!file(&with, "index.html").contains("<form"));
        assert!(file(&with, "index.html").contains("href=\"contact.html#contact\""));
    }

    #[test]
    fn images_get_hero_and_attribution() {
        let files = build(
            FeatureFlags {
                gallery: true,
                ..Default::default()
            },
            &[Some(image()), None],
        );
        let index = file(&files, "index.html");
        assert!(index.contains("src=\"https://images.example/1.jpg\""));
        assert!(index.contains("Photo by Lu on Unsplash"));
        assert!(index.contains("class=\"gallery container\""));
    }

    #[test]
    fn no_pages_is_content_error() {
        let req = request(FeatureFlags::default());
        let content = SiteContent::default();
        let palette = ColorPalette::fallback();
        let err = StaticSiteBuilder::new()
            .render(SiteBuildInput {
                request: &req,
                template: TemplateId::default(),
                palette: &palette,
                content: &content,
                images: &[],
            })
            .unwrap_err();
        assert!(matches!(err, SitesmithError::Content(_)));
    }

    #[test]
    fn api_origin_is_applied_to_forms() {
        let builder = StaticSiteBuilder::new().with_api_origin("https://api.example.com/");
        assert_eq!(builder.contact_endpoint, "https://api.example.com/api/contact");
    }

    #[test]
    fn vercel_config_is_valid_json() {
        let value: serde_json::Value = serde_json::from_str(&vercel_json()).unwrap();
        assert_eq!(value["cleanUrls"], true);
    }

    #[tokio::test]
    async fn trait_build_delegates_to_render() {
        let req = request(FeatureFlags::default());
        let content = content();
        let palette = ColorPalette::fallback();
        let builder: &dyn SiteBuilder = &StaticSiteBuilder::new();
        let files = builder
            .build(SiteBuildInput {
                request: &req,
                template: TemplateId::Restaurant,
                palette: &palette,
                content: &content,
                images: &[],
            })
            .await
            .unwrap();
        assert_eq!(files.len(), 6);
    }
}
