//! Processed post and page models

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::date::{long_date, parse_timestamp};
use crate::config::{PageSpec, PostSpec};

/// A blog post after its content has been resolved and rendered
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    /// Post title
    pub title: String,

    /// Explicit summary, used as the feed description when present
    pub description: Option<String>,

    /// Where the content came from, if not inline
    pub source: Option<String>,

    /// Raw creation timestamp as configured
    pub created_at: Option<String>,

    /// Raw update timestamp as configured
    pub updated_at: Option<String>,

    pub tags: Vec<String>,
    pub categories: Vec<String>,

    /// Rendered HTML, or an error placeholder
    pub content: String,

    /// File stem of the post's output
    pub slug: String,

    /// Parsed publication date, used for ordering
    #[serde(skip)]
    pub date: Option<DateTime<Utc>>,

    /// Publication date for display ("January 5, 2024")
    pub display_date: Option<String>,
}

impl Post {
    pub(crate) fn from_spec(spec: PostSpec, content: String, slug: String) -> Self {
        let raw_date = spec.created_at.as_deref().or(spec.published_date.as_deref());
        let date = raw_date.and_then(|raw| {
            let parsed = parse_timestamp(raw);
            if parsed.is_none() {
                tracing::warn!(title = %spec.title, value = raw, "Ignoring unparseable post date");
            }
            parsed
        });

        Self {
            created_at: spec.created_at.or(spec.published_date),
            display_date: date.as_ref().map(long_date),
            title: spec.title,
            description: spec.description,
            source: spec.source,
            updated_at: spec.updated_at,
            tags: spec.tags,
            categories: spec.categories,
            content,
            slug,
            date,
        }
    }

    /// Output file name, e.g. `hello-world.html`
    pub fn file_name(&self) -> String {
        format!("{}.html", self.slug)
    }

    /// Most recent configured timestamp, raw
    pub fn last_modified(&self) -> Option<&str> {
        self.updated_at.as_deref().or(self.created_at.as_deref())
    }
}

/// A standalone page after its content has been resolved and rendered
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    /// Page title
    pub title: String,

    pub description: Option<String>,

    pub source: Option<String>,

    pub created_at: Option<String>,

    pub updated_at: Option<String>,

    /// Rendered HTML, or an error placeholder
    pub content: String,

    /// File stem of the page's output
    pub slug: String,
}

impl Page {
    pub(crate) fn from_spec(spec: PageSpec, content: String, slug: String) -> Self {
        Self {
            title: spec.title,
            description: spec.description,
            source: spec.source,
            created_at: spec.created_at,
            updated_at: spec.updated_at,
            content,
            slug,
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.html", self.slug)
    }

    pub fn last_modified(&self) -> Option<&str> {
        self.updated_at.as_deref().or(self.created_at.as_deref())
    }
}
