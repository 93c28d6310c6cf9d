//! Content module - fetching, rendering and processing posts and pages

pub mod date;
mod fetcher;
mod markdown;
mod post;
pub mod processor;
mod slug;

pub use fetcher::{is_remote, ContentFetcher, FETCH_TIMEOUT, MAX_LOCAL_BYTES, MAX_REMOTE_BYTES};
pub use markdown::MarkdownRenderer;
pub use post::{Page, Post};
pub use processor::{ContentProcessor, ContentSpec};
pub use slug::slugify_title;
