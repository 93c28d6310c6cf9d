//! Content processor - turns configured posts and pages into rendered items
//!
//! Every item is fetched and rendered in its own task. A failing item gets a
//! placeholder body and never affects its siblings.

use futures::future::join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::slug::slugify_title;
use super::{ContentFetcher, MarkdownRenderer, Page, Post};
use crate::config::{PageSpec, PostSpec};
use crate::error::ContentError;

/// Result of resolving one item's content
pub type ContentOutcome = Result<String, ContentError>;

/// The parts of a post or page spec the processor needs
pub trait ContentSpec: Clone + Send + Sync + 'static {
    fn title(&self) -> &str;
    fn inline_content(&self) -> Option<&str>;
    fn source(&self) -> Option<&str>;
}

impl ContentSpec for PostSpec {
    fn title(&self) -> &str {
        &self.title
    }

    fn inline_content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

impl ContentSpec for PageSpec {
    fn title(&self) -> &str {
        &self.title
    }

    fn inline_content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

/// Fetches and renders content items concurrently
#[derive(Clone)]
pub struct ContentProcessor {
    fetcher: Arc<ContentFetcher>,
    renderer: Arc<MarkdownRenderer>,
    base_dir: Arc<PathBuf>,
}

impl ContentProcessor {
    pub fn new<P: AsRef<Path>>(
        fetcher: ContentFetcher,
        renderer: MarkdownRenderer,
        base_dir: P,
    ) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            renderer: Arc::new(renderer),
            base_dir: Arc::new(base_dir.as_ref().to_path_buf()),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Process all posts, newest first
    pub async fn process_posts(&self, specs: &[PostSpec]) -> Vec<Post> {
        tracing::info!("Processing {} posts", specs.len());
        let mut posts: Vec<Post> = self
            .process_all(specs)
            .await
            .into_iter()
            .map(|(spec, outcome)| {
                let content = content_or_placeholder(&spec, outcome);
                let slug = slugify_title(&spec.title);
                Post::from_spec(spec, content, slug)
            })
            .collect();
        sort_by_recency(&mut posts);
        posts
    }

    /// Process all pages, keeping their configured order
    pub async fn process_pages(&self, specs: &[PageSpec]) -> Vec<Page> {
        tracing::info!("Processing {} pages", specs.len());
        self.process_all(specs)
            .await
            .into_iter()
            .map(|(spec, outcome)| {
                let content = content_or_placeholder(&spec, outcome);
                let slug = slugify_title(&spec.title);
                Page::from_spec(spec, content, slug)
            })
            .collect()
    }

    /// Fan out one task per item and wait for all of them, preserving input order
    async fn process_all<S: ContentSpec>(&self, specs: &[S]) -> Vec<(S, ContentOutcome)> {
        let handles: Vec<_> = specs
            .iter()
            .cloned()
            .map(|spec| {
                let processor = self.clone();
                tokio::spawn(async move { processor.resolve(&spec).await })
            })
            .collect();

        let joined = join_all(handles).await;

        specs
            .iter()
            .cloned()
            .zip(joined)
            .map(|(spec, result)| {
                let outcome =
                    result.unwrap_or_else(|e| Err(ContentError::Process(e.to_string())));
                (spec, outcome)
            })
            .collect()
    }

    /// Resolve and render one item. Fetched source text wins over inline content.
    async fn resolve<S: ContentSpec>(&self, spec: &S) -> ContentOutcome {
        let mut text = spec.inline_content().unwrap_or_default().to_string();

        if let Some(source) = spec.source().filter(|s| !s.trim().is_empty()) {
            match self.fetcher.fetch(source, &self.base_dir).await {
                Some(fetched) if !fetched.trim().is_empty() => text = fetched,
                _ => tracing::debug!(title = spec.title(), source, "Source yielded no content"),
            }
        }

        if text.trim().is_empty() {
            return Err(ContentError::NoContent);
        }

        self.renderer.render(&text)
    }
}

/// The one place a failed outcome becomes placeholder HTML
fn content_or_placeholder<S: ContentSpec>(spec: &S, outcome: ContentOutcome) -> String {
    match outcome {
        Ok(html) => html,
        Err(e) => {
            tracing::warn!(
                title = spec.title(),
                source = spec.source().unwrap_or("<inline>"),
                error = %e,
                "Content item failed"
            );
            e.placeholder().to_string()
        }
    }
}

/// Stable sort, newest first. Undated posts follow dated ones in input order.
pub fn sort_by_recency(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.date.cmp(&a.date));
}
