//! XML sitemap

use tracing::debug;

use super::paginate::total_pages;
use super::taxonomy::PostIndex;
use crate::config::Blog;
use crate::content::{Page, Post};
use crate::helpers::{category_path, escape_xml, full_url, index_page_path, item_path, tag_path};

/// Change frequency for sitemap entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFreq {
    Daily,
    Weekly,
    Monthly,
}

impl ChangeFreq {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

/// A sitemap URL entry
#[derive(Debug, Clone)]
pub struct SitemapUrl {
    pub loc: String,
    /// Raw configured timestamp, written as-is
    pub lastmod: Option<String>,
    pub changefreq: ChangeFreq,
    pub priority: f32,
}

impl SitemapUrl {
    fn new(loc: String, lastmod: Option<&str>, changefreq: ChangeFreq, priority: f32) -> Self {
        Self {
            loc,
            lastmod: lastmod.map(str::to_string),
            changefreq,
            priority,
        }
    }

    fn to_xml(&self) -> String {
        let mut xml = String::from("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&self.loc)));
        if let Some(lastmod) = &self.lastmod {
            xml.push_str(&format!("    <lastmod>{}</lastmod>\n", escape_xml(lastmod)));
        }
        xml.push_str(&format!(
            "    <changefreq>{}</changefreq>\n",
            self.changefreq.as_str()
        ));
        xml.push_str(&format!("    <priority>{:.1}</priority>\n", self.priority));
        xml.push_str("  </url>\n");
        xml
    }
}

/// Every URL the site exposes, home first
pub fn collect_urls(
    blog: &Blog,
    posts: &[Post],
    pages: &[Page],
    tags: &PostIndex<'_>,
    categories: &PostIndex<'_>,
) -> Vec<SitemapUrl> {
    let base = blog.canonical_url();
    let mut urls = Vec::new();

    let newest = posts.first().and_then(Post::last_modified);
    urls.push(SitemapUrl::new(full_url(base, ""), newest, ChangeFreq::Daily, 1.0));

    for post in posts {
        urls.push(SitemapUrl::new(
            full_url(base, &item_path(&post.slug)),
            post.last_modified(),
            ChangeFreq::Monthly,
            0.8,
        ));
    }

    for page in pages {
        urls.push(SitemapUrl::new(
            full_url(base, &item_path(&page.slug)),
            page.last_modified(),
            ChangeFreq::Monthly,
            0.6,
        ));
    }

    for slug in tags.keys() {
        urls.push(SitemapUrl::new(
            full_url(base, &tag_path(slug)),
            None,
            ChangeFreq::Weekly,
            0.5,
        ));
    }

    for slug in categories.keys() {
        urls.push(SitemapUrl::new(
            full_url(base, &category_path(slug)),
            None,
            ChangeFreq::Weekly,
            0.5,
        ));
    }

    // Page 1 is the home page
    for number in 2..=total_pages(posts.len(), blog.posts_per_page()) {
        urls.push(SitemapUrl::new(
            full_url(base, &index_page_path(number)),
            None,
            ChangeFreq::Daily,
            0.7,
        ));
    }

    urls
}

/// Render the sitemap document
pub fn render_sitemap(urls: &[SitemapUrl]) -> String {
    debug!(count = urls.len(), "generating sitemap");

    let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
    xml.push('\n');
    for url in urls {
        xml.push_str(&url.to_xml());
    }
    xml.push_str("</urlset>\n");
    xml
}
