// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The fixed catalog of site templates.
//!
//! Template names are kebab-case on the wire (`health-clinic`) and in the
//! prompts sent to the model. Anything outside this catalog is rejected by
//! [`TemplateId::from_str`](std::str::FromStr).

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// A named template from the fixed catalog.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateId {
    Restaurant,
    BeautySalon,
    FitnessStudio,
    HealthClinic,
    ConstructionTrades,
    ProfessionalServices,
    RealEstate,
    RetailShop,
    TechStartup,
    #[default]
    ServiceBusiness,
}

/// Hero block arrangement used by the site builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeroStyle {
    /// Full-width photo behind the headline.
    FullBleed,
    /// Headline on one side, photo on the other.
    Split,
    /// Text-only hero on a solid brand color.
    Minimal,
}

/// Presentation hints a template contributes to the rendered site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateLayout {
    pub heading_font: &'static str,
    pub body_font: &'static str,
    pub hero: HeroStyle,
    /// Corner radius in pixels for cards and buttons.
    pub radius_px: u8,
}

impl TemplateId {
    /// All catalog entries in declaration order.
    pub fn catalog() -> impl Iterator<Item = TemplateId> {
        TemplateId::iter()
    }

    /// One-line description shown to the model when it picks a template.
    pub fn description(self) -> &'static str {
        match self {
            TemplateId::Restaurant => "restaurants, cafes, bakeries, bars and caterers",
            TemplateId::BeautySalon => "hair salons, barbers, spas, nail and beauty studios",
            TemplateId::FitnessStudio => "gyms, yoga and pilates studios, personal trainers",
            TemplateId::HealthClinic => "medical, dental, physiotherapy and wellness clinics",
            TemplateId::ConstructionTrades => {
                "builders, plumbers, electricians, roofers and landscapers"
            }
            TemplateId::ProfessionalServices => {
                "law firms, accountants, consultants, insurance and finance"
            }
            TemplateId::RealEstate => "real estate agencies, realtors and property managers",
            TemplateId::RetailShop => "shops, boutiques, florists and online stores",
            TemplateId::TechStartup => "software companies, SaaS products and IT services",
            TemplateId::ServiceBusiness => "any other local service business",
        }
    }

    /// Layout hints for the static site builder.
    pub fn layout(self) -> TemplateLayout {
        let (heading_font, body_font, hero, radius_px) = match self {
            TemplateId::Restaurant => ("Playfair Display", "Lato", HeroStyle::FullBleed, 4),
            TemplateId::BeautySalon => ("Cormorant Garamond", "Montserrat", HeroStyle::Split, 24),
            TemplateId::FitnessStudio => ("Oswald", "Roboto", HeroStyle::FullBleed, 0),
            TemplateId::HealthClinic => ("Nunito", "Open Sans", HeroStyle::Split, 12),
            TemplateId::ConstructionTrades => ("Roboto Slab", "Roboto", HeroStyle::FullBleed, 2),
            TemplateId::ProfessionalServices => ("Merriweather", "Source Sans 3", HeroStyle::Minimal, 4),
            TemplateId::RealEstate => ("Libre Baskerville", "Raleway", HeroStyle::FullBleed, 8),
            TemplateId::RetailShop => ("Poppins", "Poppins", HeroStyle::Split, 16),
            TemplateId::TechStartup => ("Inter", "Inter", HeroStyle::Minimal, 10),
            TemplateId::ServiceBusiness => ("Montserrat", "Open Sans", HeroStyle::Split, 8),
        };
        TemplateLayout {
            heading_font,
            body_font,
            hero,
            radius_px,
        }
    }
}
