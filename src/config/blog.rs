//! Blog configuration (blog.json)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// Base URL used when `meta.canonical` is not set
pub const DEFAULT_CANONICAL: &str = "https://example.com";

/// Posts per index page when `settings.postsPerPage` is not set
pub const DEFAULT_POSTS_PER_PAGE: usize = 10;

/// Top-level blog description. Immutable input to a generation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    #[serde(default)]
    pub site: SiteInfo,

    #[serde(default)]
    pub basics: Basics,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,

    #[serde(default)]
    pub settings: Settings,

    #[serde(default)]
    pub posts: Vec<PostSpec>,

    #[serde(default)]
    pub pages: Vec<PageSpec>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteInfo {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
}

/// Author information
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Basics {
    #[serde(default)]
    pub name: String,
    pub label: Option<String>,
    pub image: Option<String>,
    pub email: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    pub canonical: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub posts_per_page: Option<usize>,
}

/// A post as written in the configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSpec {
    pub title: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub source: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    /// Older configs date posts with `publishedDate` instead of `createdAt`
    pub published_date: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// A standalone page as written in the configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSpec {
    pub title: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub source: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Blog {
    /// Load configuration from a file. `.yaml`/`.yml` files are read as YAML, anything else as JSON.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        if matches!(content.trim(), "" | "null" | "~") {
            return Err(ConfigError::Missing);
        }

        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        let blog = if is_yaml {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };
        tracing::debug!("Loaded blog configuration from {:?}", path);
        Ok(blog)
    }

    /// Check the fields every run needs. Called before any content is touched.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.title.trim().is_empty() {
            return Err(ConfigError::MissingSiteTitle);
        }
        if self.site.description.is_none() {
            return Err(ConfigError::MissingSiteDescription);
        }
        if self.basics.name.trim().is_empty() {
            return Err(ConfigError::MissingAuthorName);
        }
        Ok(())
    }

    /// Site base URL without a trailing slash
    pub fn canonical_url(&self) -> &str {
        self.meta
            .as_ref()
            .and_then(|m| m.canonical.as_deref())
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(DEFAULT_CANONICAL)
            .trim_end_matches('/')
    }

    pub fn language(&self) -> &str {
        self.meta
            .as_ref()
            .and_then(|m| m.language.as_deref())
            .unwrap_or("en")
    }

    /// Page size for the paginated index, never below one
    pub fn posts_per_page(&self) -> usize {
        self.settings
            .posts_per_page
            .unwrap_or(DEFAULT_POSTS_PER_PAGE)
            .max(1)
    }
}
