//! RSS 2.0 feed

use crate::config::Blog;
use crate::content::date::rfc2822;
use crate::content::Post;
use crate::helpers::{cdata, escape_xml, full_url, item_path, plain_summary};

/// Most posts carried by the feed
pub const FEED_LIMIT: usize = 20;

/// Length of an auto-generated item description, before the ellipsis
pub const DESCRIPTION_LENGTH: usize = 200;

/// Render the feed for posts already sorted newest first
pub fn render_feed(blog: &Blog, posts: &[Post]) -> String {
    let canonical = blog.canonical_url();
    let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(r#"<rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom">"#);
    xml.push_str("\n  <channel>\n");

    xml.push_str(&format!("    <title>{}</title>\n", cdata(&blog.site.title)));
    xml.push_str(&format!(
        "    <description>{}</description>\n",
        cdata(blog.site.description.as_deref().unwrap_or_default())
    ));
    xml.push_str(&format!("    <link>{}</link>\n", escape_xml(&canonical)));
    xml.push_str(&format!(
        "    <atom:link href=\"{}\" rel=\"self\" type=\"application/rss+xml\"/>\n",
        escape_xml(&full_url(&canonical, "rss.xml"))
    ));
    xml.push_str("    <generator>JsonBlog Generator</generator>\n");
    xml.push_str(&format!(
        "    <language>{}</language>\n",
        escape_xml(blog.language())
    ));
    xml.push_str("    <ttl>60</ttl>\n");

    // Newest post date keeps repeated builds byte-identical
    if let Some(date) = posts.iter().find_map(|p| p.date) {
        xml.push_str(&format!(
            "    <lastBuildDate>{}</lastBuildDate>\n",
            rfc2822(&date)
        ));
    }

    if let Some(image) = blog.basics.image.as_deref().filter(|i| !i.is_empty()) {
        xml.push_str("    <image>\n");
        xml.push_str(&format!("      <url>{}</url>\n", escape_xml(image)));
        xml.push_str(&format!("      <title>{}</title>\n", cdata(&blog.site.title)));
        xml.push_str(&format!("      <link>{}</link>\n", escape_xml(&canonical)));
        xml.push_str("    </image>\n");
    }

    for post in posts.iter().take(FEED_LIMIT) {
        xml.push_str(&render_item(&canonical, post));
    }

    xml.push_str("  </channel>\n</rss>\n");
    xml
}

fn render_item(canonical: &str, post: &Post) -> String {
    let link = escape_xml(&full_url(canonical, &item_path(&post.slug)));
    let description = match post.description.as_deref().filter(|d| !d.is_empty()) {
        Some(description) => description.to_string(),
        None => plain_summary(&post.content, DESCRIPTION_LENGTH),
    };

    let mut xml = String::from("    <item>\n");
    xml.push_str(&format!("      <title>{}</title>\n", cdata(&post.title)));
    xml.push_str(&format!(
        "      <description>{}</description>\n",
        cdata(&description)
    ));
    xml.push_str(&format!("      <link>{}</link>\n", link));
    xml.push_str(&format!(
        "      <guid isPermaLink=\"true\">{}</guid>\n",
        link
    ));
    if let Some(date) = post.date {
        xml.push_str(&format!("      <pubDate>{}</pubDate>\n", rfc2822(&date)));
    }
    for name in post.tags.iter().chain(post.categories.iter()) {
        xml.push_str(&format!("      <category>{}</category>\n", cdata(name)));
    }
    xml.push_str("    </item>\n");
    xml
}
