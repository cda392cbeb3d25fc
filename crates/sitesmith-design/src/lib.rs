// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Design decisions for a generated site: palette, template and copy.
//!
//! Palette and template resolution never fail; they fall back to fixed
//! defaults. Copy generation is the only step here whose errors propagate.

pub mod color;
pub mod content;
pub mod json;
pub mod template;

pub use color::ColorResolver;
pub use content::AiContentGenerator;
pub use template::{TemplateSelector, template_for_industry};
