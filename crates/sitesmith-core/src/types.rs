// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the pipeline, the job store and the gateway.
//!
//! Everything that crosses the HTTP boundary serializes with camelCase keys.

use std::collections::HashSet;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};

use crate::error::SitesmithError;
use crate::template::TemplateId;

/// Maximum number of pages a single request may ask for.
pub const MAX_PAGES: usize = 10;

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("static regex"));

// --- Jobs ---

/// Lifecycle state of a generation job.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// Returns true once the job can no longer change.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Allowed moves: queued -> processing -> {completed | failed}.
    /// Re-asserting the current status is always allowed.
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        if self == next {
            return true;
        }
        matches!(
            (self, next),
            (JobStatus::Queued, JobStatus::Processing)
                | (JobStatus::Processing, JobStatus::Completed)
                | (JobStatus::Processing, JobStatus::Failed)
        )
    }
}

/// Links to the published artifacts of a completed job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResult {
    pub repo_url: String,
    pub repo_name: String,
    pub deployment_url: Option<String>,
    pub template: TemplateId,
    pub colors: ColorPalette,
}

/// A website generation job as held by the job store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub status: JobStatus,
    pub progress: u8,
    pub message: String,
    pub input: WebsiteRequest,
    pub result: Option<JobResult>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Creates a queued job with a fresh UUID v4 id.
    pub fn new(input: WebsiteRequest) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            status: JobStatus::Queued,
            progress: 0,
            message: "Job queued".to_string(),
            input,
            result: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update merged into a [`Job`] by the job store.
///
/// `None` fields are left untouched. `result` and `error` are doubly optional
/// so a patch can clear them (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobPatch {
    pub status: Option<JobStatus>,
    pub progress: Option<u8>,
    pub message: Option<String>,
    pub result: Option<Option<JobResult>>,
    pub error: Option<Option<String>>,
}

impl JobPatch {
    /// A progress/message update while the job is running.
    pub fn progress(progress: u8, message: impl Into<String>) -> Self {
        Self {
            progress: Some(progress),
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Sets the status alongside the other fields.
    pub fn with_status(mut self, status: JobStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Change notification published by the job store on every mutation.
///
/// Updates carry the status and progress right after the merge; anything
/// else has to be read back from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobEvent {
    Created(String),
    Updated {
        id: String,
        status: JobStatus,
        progress: u8,
    },
    Deleted(String),
}

impl JobEvent {
    /// The id of the job this event refers to.
    pub fn job_id(&self) -> &str {
        match self {
            JobEvent::Created(id) | JobEvent::Deleted(id) => id,
            JobEvent::Updated { id, .. } => id,
        }
    }
}

// --- Submission payload ---

/// Optional site features requested by the customer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeatureFlags {
    pub contact_form: bool,
    pub booking: bool,
    pub gallery: bool,
    pub testimonials: bool,
}

/// Quality tier of the generated copy.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    #[default]
    Standard,
    Premium,
}

impl QualityTier {
    /// Number of content sections requested per page.
    pub fn sections_per_page(self) -> usize {
        match self {
            QualityTier::Standard => 2,
            QualityTier::Premium => 4,
        }
    }
}

/// Business details submitted to `POST /api/generate-website`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteRequest {
    pub company_name: String,
    pub industry: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Free-text color description ("navy and gold", "#112233 and white").
    #[serde(default)]
    pub colors: String,
    #[serde(default, deserialize_with = "string_or_list")]
    pub brand_themes: Vec<String>,
    #[serde(default)]
    pub pages: Vec<String>,
    #[serde(default)]
    pub features: FeatureFlags,
    #[serde(default)]
    pub quality: QualityTier,
}

impl WebsiteRequest {
    /// Checks required fields. All problems are reported together.
    pub fn validate(&self) -> Result<(), SitesmithError> {
        let mut problems = Vec::new();

        if self.company_name.trim().is_empty() {
            problems.push("companyName is required".to_string());
        }
        if self.industry.trim().is_empty() {
            problems.push("industry is required".to_string());
        }
        if self.page_names().is_empty() {
            problems.push("at least one page is required".to_string());
        }
        if self.pages.len() > MAX_PAGES {
            problems.push(format!("at most {MAX_PAGES} pages are allowed"));
        }
        if let Some(email) = self.email.as_deref() {
            if !email.trim().is_empty() && !looks_like_email(email) {
                problems.push(format!("email `{email}` is not a valid address"));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(SitesmithError::Validation(problems.join("; ")))
        }
    }

    /// Requested page names, trimmed, one per slug.
    ///
    /// Names without any slug characters are dropped, and when several names
    /// share a slug (`"Home"`, `"home "`) only the first is kept.
    pub fn page_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.pages
            .iter()
            .map(|p| p.trim())
            .filter(|p| {
                let slug = slugify(p);
                !slug.is_empty() && seen.insert(slug)
            })
            .collect()
    }
}

/// Minimal shape check: one `@`, something on both sides, a dot in the domain.
pub fn looks_like_email(value: &str) -> bool {
    let value = value.trim();
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.contains(char::is_whitespace)
        }
        None => false,
    }
}

/// Accepts either `"a, b"` or `["a", "b"]`.
fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Themes {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<Themes>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(Themes::One(s)) => s
            .split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
        Some(Themes::Many(v)) => v,
    })
}

// --- Design ---

/// Three brand colors, each a `#RRGGBB` hex code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPalette {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
}

impl ColorPalette {
    /// Palette used whenever the model output cannot be trusted.
    pub fn fallback() -> Self {
        Self {
            primary: "#D32F2F".to_string(),
            secondary: "#FFC107".to_string(),
            accent: "#263238".to_string(),
        }
    }

    /// Builds a palette only if all three values are strict 6-digit hex codes.
    pub fn from_hex(primary: &str, secondary: &str, accent: &str) -> Option<Self> {
        let (p, s, a) = (primary.trim(), secondary.trim(), accent.trim());
        if is_hex_color(p) && is_hex_color(s) && is_hex_color(a) {
            Some(Self {
                primary: p.to_string(),
                secondary: s.to_string(),
                accent: a.to_string(),
            })
        } else {
            None
        }
    }

    pub fn is_valid(&self) -> bool {
        is_hex_color(&self.primary) && is_hex_color(&self.secondary) && is_hex_color(&self.accent)
    }
}

/// Matches `^#[0-9A-Fa-f]{6}$`.
pub fn is_hex_color(value: &str) -> bool {
    HEX_COLOR.is_match(value)
}

// --- Images ---

/// Which stock-photo provider an image came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ImageProvider {
    Unsplash,
    Pexels,
}

/// One stock photo picked for a search term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageData {
    pub url: String,
    pub alt: String,
    pub photographer: String,
    pub photographer_url: Option<String>,
    pub source: ImageProvider,
}

impl ImageData {
    /// Attribution line required by both providers' terms.
    pub fn attribution(&self) -> String {
        let provider = match self.source {
            ImageProvider::Unsplash => "Unsplash",
            ImageProvider::Pexels => "Pexels",
        };
        format!("Photo by {} on {provider}", self.photographer)
    }
}

// --- Content ---

/// Hero block copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeroContent {
    pub headline: String,
    pub subheadline: String,
    pub cta_text: String,
}

/// A titled block of page copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Section {
    pub heading: String,
    pub body: String,
}

/// Copy for one page of the site.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageContent {
    pub slug: String,
    pub title: String,
    pub sections: Vec<Section>,
}

/// All generated copy for a site.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteContent {
    pub site_title: String,
    pub tagline: String,
    pub hero: HeroContent,
    pub pages: Vec<PageContent>,
    pub image_queries: Vec<String>,
}

/// Normalizes a page name into a URL slug (`"About Us"` -> `"about-us"`).
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_dash = false;
    for c in value.trim().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

// --- Site files and publishing ---

/// One generated static file, path relative to the repository root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteFile {
    pub path: String,
    pub content: String,
}

impl SiteFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// A repository created on the source-hosting service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoInfo {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub html_url: String,
    pub default_branch: String,
    /// Latest commit after all files were pushed.
    pub commit_sha: String,
}

/// A deployment triggered on the hosting service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    pub id: String,
    pub url: String,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Degraded(String),
    Unhealthy(String),
}

/// Identifies the kind of collaborator an adapter implements.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AdapterType {
    TextGenerator,
    ImageSearch,
    ContentGenerator,
    SiteBuilder,
    RepoHost,
    Deployer,
    Crm,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn request() -> WebsiteRequest {
        WebsiteRequest {
            company_name: "Luigi's".into(),
            industry: "Restaurant".into(),
            pages: vec!["Home".into()],
            ..WebsiteRequest::default()
        }
    }

    #[test]
    fn new_job_is_queued_with_nothing_attached() {
        let job = Job::new(request());
        assert_eq!(job.status, JobStatus::Queued);
        assert_eq!(job.progress, 0);
        assert!(job.result.is_none());
        assert!(job.error.is_none());
        assert_eq!(job.created_at, job.updated_at);
        assert!(uuid::Uuid::parse_str(&job.id).is_ok());
    }

    #[test]
    fn status_transitions_are_monotonic() {
        use JobStatus::*;
        assert!(Queued.can_transition_to(Processing));
        assert!(Processing.can_transition_to(Completed));
        assert!(Processing.can_transition_to(Failed));
        assert!(Processing.can_transition_to(Processing));
        assert!(!Queued.can_transition_to(Completed));
        assert!(!Completed.can_transition_to(Processing));
        assert!(!Failed.can_transition_to(Completed));
        assert!(Completed.is_terminal() && Failed.is_terminal());
        assert!(!Queued.is_terminal() && !Processing.is_terminal());
    }

    #[test]
    fn job_serializes_camel_case() {
        let job = Job::new(request());
        let json = serde_json::to_value(&job).unwrap();
        assert_eq!(json["status"], "queued");
        assert_eq!(json["input"]["companyName"], "Luigi's");
        assert!(json["createdAt"].is_string());
        assert!(json["result"].is_null());
        assert!(json["error"].is_null());
    }

    #[test]
    fn request_accepts_brand_themes_as_string_or_list() {
        let a: WebsiteRequest = serde_json::from_str(
            r#"{"companyName":"A","industry":"B","brandThemes":"modern, warm ,"}"#,
        )
        .unwrap();
        assert_eq!(a.brand_themes, vec!["modern", "warm"]);

        let b: WebsiteRequest = serde_json::from_str(
            r#"{"companyName":"A","industry":"B","brandThemes":["bold"],"quality":"premium","features":{"contactForm":true}}"#,
        )
        .unwrap();
        assert_eq!(b.brand_themes, vec!["bold"]);
        assert_eq!(b.quality, QualityTier::Premium);
        assert!(b.features.contact_form);
        assert!(!b.features.booking);
    }

    #[test]
    fn validation_collects_every_problem() {
        let bad = WebsiteRequest {
            email: Some("not-an-email".into()),
            ..WebsiteRequest::default()
        };
        let err = bad.validate().unwrap_err().to_string();
        assert!(err.contains("companyName"));
        assert!(err.contains("industry"));
        assert!(err.contains("page"));
        assert!(err.contains("not-an-email"));
        assert!(request().validate().is_ok());
    }

    #[test]
    fn page_names_keep_one_name_per_slug() {
        let mut req = request();
        req.pages = vec![
            "Home".into(),
            " home ".into(),
            "About Us".into(),
            "about-us".into(),
            "".into(),
            "Menu".into(),
        ];
        assert_eq!(req.page_names(), vec!["Home", "About Us", "Menu"]);
    }

    #[test]
    fn pages_without_slug_characters_do_not_count() {
        let mut req = request();
        req.pages = vec!["???".into(), "  ".into()];
        let err = req.validate().unwrap_err().to_string();
        assert!(err.contains("at least one page is required"), "{err}");
    }

    #[test]
    fn too_many_pages_is_rejected() {
        let mut req = request();
        req.pages = (0..=MAX_PAGES).map(|i| format!("Page {i}")).collect();
        assert!(req.validate().is_err());
    }

    #[test]
    fn email_shape_check() {
        assert!(looks_like_email("owner@luigis.it"));
        assert!(!looks_like_email("owner@luigis"));
        assert!(!looks_like_email("@luigis.it"));
        assert!(!looks_like_email("a b@luigis.it"));
    }

    #[test]
    fn slugify_normalizes_names() {
        assert_eq!(slugify("About Us"), "about-us");
        assert_eq!(slugify("  Menu & Drinks! "), "menu-drinks");
        assert_eq!(slugify("FAQ"), "faq");
        assert_eq!(slugify("***"), "");
    }

    #[test]
    fn fallback_palette_is_valid() {
        let p = ColorPalette::fallback();
        assert!(p.is_valid());
        assert_eq!(p.primary, "#D32F2F");
        assert_eq!(p.secondary, "#FFC107");
        assert_eq!(p.accent, "#263238");
    }

    #[test]
    fn palette_rejects_short_or_named_colors() {
        assert!(ColorPalette::from_hex("#fff", "#000000", "#123456").is_none());
        assert!(ColorPalette::from_hex("navy", "#000000", "#123456").is_none());
        assert!(ColorPalette::from_hex(" #AbCdEf", "#000000", "#123456").is_some());
    }

    #[test]
    fn attribution_names_provider() {
        let img = ImageData {
            url: "https://images.example/1.jpg".into(),
            alt: "pasta".into(),
            photographer: "Ana".into(),
            photographer_url: None,
            source: ImageProvider::Pexels,
        };
        assert_eq!(img.attribution(), "Photo by Ana on Pexels");
    }

    proptest! {
        #[test]
        fn any_six_hex_digits_are_valid(digits in "[0-9A-Fa-f]{6}") {
            let color = format!("#{digits}");
            prop_assert!(is_hex_color(&color));
        }

        #[test]
        fn anything_else_is_rejected(s in "[^#][0-9A-Za-z]{0,8}") {
            prop_assert!(!is_hex_color(&s));
        }
    }
}
