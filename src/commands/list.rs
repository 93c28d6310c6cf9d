//! List blog content

use anyhow::Result;

use crate::content::{ContentFetcher, ContentProcessor, MarkdownRenderer};
use crate::generator::taxonomy::{build_category_index, build_tag_index, PostIndex};
use crate::JsonBlog;

/// What `list` can print
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Post,
    Page,
    Tag,
    Category,
}

impl std::str::FromStr for ListKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "post" | "posts" => Ok(Self::Post),
            "page" | "pages" => Ok(Self::Page),
            "tag" | "tags" => Ok(Self::Tag),
            "category" | "categories" => Ok(Self::Category),
            _ => anyhow::bail!("Unknown type: {}. Available: post, page, tag, category", s),
        }
    }
}

/// Print a summary of the processed content of one kind
pub async fn run(app: &JsonBlog, kind: ListKind) -> Result<()> {
    for line in summarize(app, kind).await? {
        println!("{}", line);
    }
    Ok(())
}

async fn summarize(app: &JsonBlog, kind: ListKind) -> Result<Vec<String>> {
    let blog = app.load_blog()?;
    let processor =
        ContentProcessor::new(ContentFetcher::new(), MarkdownRenderer::new(), &app.base_dir);

    let mut lines = Vec::new();
    match kind {
        ListKind::Post => {
            let posts = processor.process_posts(&blog.posts).await;
            lines.push(format!("Posts ({}):", posts.len()));
            for post in &posts {
                lines.push(format!(
                    "  {} - {} [{}]",
                    post.date
                        .map(|d| d.format("%Y-%m-%d").to_string())
                        .unwrap_or_else(|| "----------".to_string()),
                    post.title,
                    post.source.as_deref().unwrap_or("inline")
                ));
            }
        }
        ListKind::Page => {
            let pages = processor.process_pages(&blog.pages).await;
            lines.push(format!("Pages ({}):", pages.len()));
            for page in &pages {
                lines.push(format!(
                    "  {} [{}]",
                    page.title,
                    page.source.as_deref().unwrap_or("inline")
                ));
            }
        }
        ListKind::Tag | ListKind::Category => {
            let posts = processor.process_posts(&blog.posts).await;
            let (label, index) = if kind == ListKind::Tag {
                ("Tags", build_tag_index(&posts))
            } else {
                ("Categories", build_category_index(&posts))
            };
            lines.push(format!("{} ({}):", label, index.len()));
            lines.extend(by_count(&index));
        }
    }

    Ok(lines)
}

/// Most used first; ties keep first-seen order
fn by_count(index: &PostIndex<'_>) -> Vec<String> {
    let mut entries: Vec<_> = index
        .values()
        .map(|group| (&group.name, group.posts.len()))
        .collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries
        .into_iter()
        .map(|(name, count)| format!("  {} ({})", name, count))
        .collect()
}
