// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stylesheet generation from palette and template layout.

use sitesmith_core::template::{HeroStyle, TemplateLayout};
use sitesmith_core::types::ColorPalette;

pub(crate) fn hero_class(style: HeroStyle) -> &'static str {
    match style {
        HeroStyle::FullBleed => "hero--full-bleed",
        HeroStyle::Split => "hero--split",
        HeroStyle::Minimal => "hero--minimal",
    }
}

/// Google Fonts `family=` query for both layout fonts.
pub(crate) fn font_query(layout: &TemplateLayout) -> String {
    let family = |name: &str| format!("family={}:wght@400;700", name.replace(' ', "+"));
    if layout.heading_font == layout.body_font {
        family(layout.heading_font)
    } else {
        format!("{}&{}", family(layout.heading_font), family(layout.body_font))
    }
}

pub fn stylesheet(palette: &ColorPalette, layout: &TemplateLayout) -> String {
    format!(
        r#":root {{
  --color-primary: {primary};
  --color-secondary: {secondary};
  --color-accent: {accent};
  --font-heading: "{heading}", Georgia, serif;
  --font-body: "{body}", system-ui, sans-serif;
  --radius: {radius}px;
}}

* {{ box-sizing: border-box; }}
body {{ margin: 0; font-family: var(--font-body); color: var(--color-accent); line-height: 1.6; }}
h1, h2, h3 {{ font-family: var(--font-heading); line-height: 1.2; }}
a {{ color: var(--color-primary); }}
img {{ max-width: 100%; display: block; border-radius: var(--radius); }}
.container {{ max-width: 1100px; margin: 0 auto; padding: 0 1.25rem; }}

.site-header {{ background: var(--color-primary); color: #fff; }}
.site-header .container {{ display: flex; align-items: center; justify-content: space-between; min-height: 4rem; flex-wrap: wrap; }}
.brand {{ color: #fff; font-family: var(--font-heading); font-size: 1.35rem; text-decoration: none; font-weight: 700; }}
.site-nav a {{ color: #fff; margin-left: 1.25rem; text-decoration: none; opacity: .85; }}
.site-nav a.active, .site-nav a:hover {{ opacity: 1; border-bottom: 2px solid var(--color-secondary); }}

.hero {{ padding: 5rem 1.25rem; }}
.hero .lead {{ font-size: 1.25rem; }}
.hero--full-bleed {{ position: relative; color: #fff; background: var(--color-accent); }}
.hero--full-bleed .hero-media {{ position: absolute; inset: 0; margin: 0; opacity: .35; }}
.hero--full-bleed .hero-media img {{ width: 100%; height: 100%; object-fit: cover; border-radius: 0; }}
.hero--full-bleed .hero-text {{ position: relative; max-width: 1100px; margin: 0 auto; }}
.hero--split {{ display: grid; grid-template-columns: 1fr 1fr; gap: 2.5rem; align-items: center; max-width: 1100px; margin: 0 auto; }}
.hero--minimal {{ background: var(--color-primary); color: #fff; text-align: center; }}
.hero--minimal .hero-media {{ display: none; }}
.hero figcaption, .gallery figcaption {{ font-size: .75rem; opacity: .8; }}

.button {{ display: inline-block; background: var(--color-secondary); color: var(--color-accent); padding: .8rem 1.6rem; border-radius: var(--radius); text-decoration: none; font-weight: 700; border: 0; cursor: pointer; }}

.page-header {{ padding: 3rem 1.25rem 1rem; }}
.content-section {{ padding: 2rem 1.25rem; }}
.gallery {{ display: grid; grid-template-columns: repeat(auto-fit, minmax(260px, 1fr)); gap: 1.25rem; padding: 2rem 1.25rem; }}
.gallery figure {{ margin: 0; }}

.form-section form {{ display: grid; gap: 1rem; max-width: 560px; }}
.form-section label {{ display: grid; gap: .35rem; font-weight: 600; }}
.form-section input, .form-section textarea {{ font: inherit; padding: .65rem; border: 1px solid #ccc; border-radius: var(--radius); }}

.site-footer {{ background: var(--color-accent); color: #fff; padding: 2rem 0; margin-top: 3rem; font-size: .9rem; }}
.site-footer a {{ color: var(--color-secondary); }}

@media (max-width: 720px) {{
  .hero--split {{ grid-template-columns: 1fr; }}
  .site-nav a {{ margin-left: .75rem; }}
}}
"#,
        primary = palette.primary,
        secondary = palette.secondary,
        accent = palette.accent,
        heading = layout.heading_font,
        body = layout.body_font,
        radius = layout.radius_px,
    )
}
