// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use sitesmith_core::types::{
    FeatureFlags, HeroContent, PageContent, Section, SiteContent, WebsiteRequest, slugify,
};

/// A valid three-page request for a bakery.
pub fn sample_request() -> WebsiteRequest {
    WebsiteRequest {
        company_name: "Crumb & Co Bakery".into(),
        industry: "Bakery".into(),
        description: Some("Neighbourhood bakery known for sourdough and cardamom buns.".into()),
        address: Some("12 Mill Lane, Portland".into()),
        phone: Some("+1 503 555 0142".into()),
        email: Some("hello@crumbandco.example".into()),
        colors: "warm browns with a pop of teal".into(),
        brand_themes: vec!["cozy".into(), "artisan".into()],
        pages: vec!["Home".into(), "Menu".into(), "Contact".into()],
        features: FeatureFlags {
            contact_form: true,
            ..FeatureFlags::default()
        },
        ..WebsiteRequest::default()
    }
}

/// Content matching the pages of `request`, one section each.
pub fn sample_content(request: &WebsiteRequest) -> SiteContent {
    let pages = request
        .page_names()
        .into_iter()
        .map(|name| PageContent {
            slug: slugify(name),
            title: name.to_string(),
            sections: vec![Section {
                heading: format!("About our {}", name.to_lowercase()),
                body: format!("{} welcomes you.", request.company_name),
            }],
        })
        .collect();

    SiteContent {
        site_title: request.company_name.clone(),
        tagline: format!("The best {} in town", request.industry.to_lowercase()),
        hero: HeroContent {
            headline: format!("Welcome to {}", request.company_name),
            subheadline: "Made fresh every morning".into(),
            cta_text: "Visit us".into(),
        },
        pages,
        image_queries: vec![
            format!("{} storefront", request.industry),
            format!("{} products", request.industry),
        ],
    }
}
