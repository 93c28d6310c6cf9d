//! Built-in theme templates using the Tera template engine
//!
//! Templates are embedded in the binary. Each run builds its own
//! [`TemplateRenderer`], so nothing is registered globally.

use std::collections::HashMap;
use tera::{Context, Tera};

use crate::content::date::{long_date, parse_timestamp};
use crate::content::slugify_title;
use crate::error::Result;
use crate::helpers;

/// The stylesheet emitted as `main.css`
pub const STYLESHEET: &str = include_str!("theme/main.css");

/// Template renderer with the embedded theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Compile all templates and register filters
    pub fn new() -> Result<Self> {
        // Autoescapes every `.html` template; rendered bodies opt out with `safe`
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("theme/layout.html")),
            ("index.html", include_str!("theme/index.html")),
            ("post.html", include_str!("theme/post.html")),
            ("page.html", include_str!("theme/page.html")),
            ("tag.html", include_str!("theme/tag.html")),
            ("category.html", include_str!("theme/category.html")),
            ("partials/post_meta.html", include_str!("theme/partials/post_meta.html")),
        ])?;

        tera.register_filter("format_date", format_date_filter);
        tera.register_filter("slugify", slugify_filter);
        tera.register_filter("strip_html", strip_html_filter);
        tera.register_filter("truncate_chars", truncate_chars_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: "2024-01-05T00:00:00Z" -> "January 5, 2024". Unparseable input passes through.
fn format_date_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("format_date", "value", String, value);
    let formatted = parse_timestamp(&s).map(|d| long_date(&d)).unwrap_or(s);
    Ok(tera::Value::String(formatted))
}

/// Tera filter: the slug used for output file names
fn slugify_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("slugify", "value", String, value);
    Ok(tera::Value::String(slugify_title(&s)))
}

/// Tera filter: strip HTML tags
fn strip_html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("strip_html", "value", String, value);
    Ok(tera::Value::String(helpers::strip_html(&s)))
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };
    let omission = match args.get("omission") {
        Some(val) => Some(tera::try_get_value!("truncate_chars", "omission", String, val)),
        None => None,
    };

    Ok(tera::Value::String(helpers::truncate(
        &s,
        length,
        omission.as_deref(),
    )))
}
