//! Configuration module

mod blog;

pub use blog::{
    Basics, Blog, Meta, PageSpec, PostSpec, Settings, SiteInfo, DEFAULT_CANONICAL,
    DEFAULT_POSTS_PER_PAGE,
};
