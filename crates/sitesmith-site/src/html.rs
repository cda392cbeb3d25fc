// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTML fragments for generated pages.

use sitesmith_core::types::{FeatureFlags, ImageData, Section};

pub(crate) const PAGE_LAYOUT: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }}</title>
  <meta name="description" content="{{ description }}">
  <link rel="preconnect" href="https://fonts.googleapis.com">
  <link rel="stylesheet" href="https://fonts.googleapis.com/css2?{{ font_query }}&display=swap">
  <link rel="stylesheet" href="assets/styles.css">
</head>
<body class="template-{{ template }}">
  <header class="site-header">
    <div class="container">
      <a class="brand" href="index.html">{{ site_title }}</a>
      <nav class="site-nav">{{ nav }}</nav>
    </div>
  </header>
  <main>
{{ hero? }}{{ sections }}{{ gallery? }}{{ forms? }}  </main>
  <footer class="site-footer">
    <div class="container">
{{ footer }}    </div>
  </footer>
</body>
</html>
"#;

/// Escapes text for element content and double-quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Blank-line separated paragraphs become `<p>` elements.
pub fn paragraphs(body: &str) -> String {
    body.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| format!("<p>{}</p>", escape(p).replace('\n', "<br>")))
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn nav(links: &[(String, String)], current: &str) -> String {
    links
        .iter()
        .map(|(href, title)| {
            let class = if href == current { " class=\"active\"" } else { "" };
            format!("<a href=\"{}\"{class}>{}</a>", escape(href), escape(title))
        })
        .collect::<Vec<_>>()
        .join("")
}

pub(crate) fn hero(
    hero_class: &str,
    headline: &str,
    subheadline: &str,
    cta_text: &str,
    cta_href: &str,
    image: Option<&ImageData>,
) -> String {
    let media = match image {
        Some(img) => format!(
            "      <figure class=\"hero-media\"><img src=\"{}\" alt=\"{}\"><figcaption>{}</figcaption></figure>\n",
            escape(&img.url),
            escape(&img.alt),
            credit(img)
        ),
        None => String::new(),
    };
    let cta = if cta_text.trim().is_empty() {
        String::new()
    } else {
        format!(
            "        <a class=\"button\" href=\"{}\">{}</a>\n",
            escape(cta_href),
            escape(cta_text)
        )
    };
    format!(
        "    <section class=\"hero {hero_class}\">\n\
         \x20     <div class=\"hero-text\">\n\
         \x20       <h1>{}</h1>\n\
         \x20       <p class=\"lead\">{}</p>\n\
         {cta}\
         \x20     </div>\n\
         {media}\
         \x20   </section>\n",
        escape(headline),
        escape(subheadline),
    )
}

pub(crate) fn sections(page_title: &str, sections: &[Section], with_heading: bool) -> String {
    let mut out = String::new();
    if with_heading {
        out.push_str(&format!(
            "    <header class=\"page-header container\"><h1>{}</h1></header>\n",
            escape(page_title)
        ));
    }
    for section in sections {
        out.push_str(&format!(
            "    <section class=\"content-section container\">\n      <h2>{}</h2>\n{}\n    </section>\n",
            escape(&section.heading),
            paragraphs(&section.body)
        ));
    }
    out
}

pub(crate) fn gallery(images: &[&ImageData]) -> String {
    if images.is_empty() {
        return String::new();
    }
    let figures: String = images
        .iter()
        .map(|img| {
            format!(
                "      <figure><img src=\"{}\" alt=\"{}\" loading=\"lazy\"><figcaption>{}</figcaption></figure>\n",
                escape(&img.url),
                escape(&img.alt),
                credit(img)
            )
        })
        .collect();
    format!("    <section class=\"gallery container\">\n{figures}    </section>\n")
}

/// Contact and booking forms for the requested features.
pub(crate) fn forms(features: FeatureFlags, contact_endpoint: &str, booking_endpoint: &str) -> String {
    let mut out = String::new();
    if features.contact_form {
        out.push_str(&format!(
            r#"    <section class="form-section container" id="contact">
      <h2>Get in touch</h2>
      <form class="contact-form" method="post" action="{}">
        <label>Name <input name="name" required></label>
        <label>Email <input name="email" type="email" required></label>
        <label>Phone <input name="phone" type="tel"></label>
        <label>Message <textarea name="message" rows="5" required></textarea></label>
        <button class="button" type="submit">Send message</button>
      </form>
    </section>
"#,
            escape(contact_endpoint)
        ));
    }
    if features.booking {
        out.push_str(&format!(
            r#"    <section class="form-section container" id="booking">
      <h2>Book an appointment</h2>
      <form class="booking-form" method="post" action="{}">
        <label>Name <input name="name" required></label>
        <label>Email <input name="email" type="email" required></label>
        <label>Date <input name="date" type="date" required></label>
        <label>Time <input name="time" type="time" required></label>
        <label>Notes <textarea name="notes" rows="3"></textarea></label>
        <button class="button" type="submit">Request booking</button>
      </form>
    </section>
"#,
            escape(booking_endpoint)
        ));
    }
    out
}

fn credit(img: &ImageData) -> String {
    match &img.photographer_url {
        Some(url) => format!(
            "<a href=\"{}\" rel=\"noopener\">{}</a>",
            escape(url),
            escape(&img.attribution())
        ),
        None => escape(&img.attribution()),
    }
}
