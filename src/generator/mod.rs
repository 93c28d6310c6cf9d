//! Generator module - assembles the site from processed content using built-in Tera templates
//!
//! A run produces an ordered list of [`GeneratedFile`]s and never touches the
//! disk itself; writing or serving them is up to the caller.

pub mod paginate;
pub mod rss;
pub mod sitemap;
pub mod taxonomy;

use serde::Serialize;
use std::path::Path;
use tera::Context;

use crate::config::Blog;
use crate::content::{ContentFetcher, ContentProcessor, MarkdownRenderer, Page, Post};
use crate::error::Result;
use crate::helpers::{category_path, full_url, index_page_path, tag_path};
use crate::templates::{TemplateRenderer, STYLESHEET};
use paginate::paginate;
use taxonomy::{build_category_index, build_tag_index, slug_collisions, PostIndex};

/// One output file: a path relative to the output root and its body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub name: String,
    pub content: String,
}

impl GeneratedFile {
    fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Neighbouring post linked from a post page
#[derive(Debug, Clone, Serialize)]
pub struct NavPost {
    pub title: String,
    pub slug: String,
}

impl From<&Post> for NavPost {
    fn from(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            slug: post.slug.clone(),
        }
    }
}

/// Static site generator using Tera templates
pub struct Generator {
    renderer: TemplateRenderer,
    processor: ContentProcessor,
}

impl Generator {
    /// Create a generator resolving local sources against `base_dir`
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let processor =
            ContentProcessor::new(ContentFetcher::new(), MarkdownRenderer::new(), base_dir);
        Self::with_processor(processor)
    }

    /// Create a generator around an existing content processor
    pub fn with_processor(processor: ContentProcessor) -> Result<Self> {
        Ok(Self {
            renderer: TemplateRenderer::new()?,
            processor,
        })
    }

    /// Generate the entire site.
    ///
    /// Fails only on invalid configuration or a template error. Per-item content
    /// failures end up as placeholder bodies in their own files.
    pub async fn generate(&self, blog: &Blog) -> Result<Vec<GeneratedFile>> {
        blog.validate()?;

        tracing::info!(
            "Generating site from {}",
            self.processor.base_dir().display()
        );

        let posts = self.processor.process_posts(&blog.posts).await;
        let pages = self.processor.process_pages(&blog.pages).await;

        let tags = build_tag_index(&posts);
        let categories = build_category_index(&posts);
        warn_slug_collisions("tag", &tags);
        warn_slug_collisions("category", &categories);

        let mut files = Vec::new();

        // Index pages (with pagination)
        self.generate_index_pages(blog, &posts, &pages, &mut files)?;

        // Post pages
        self.generate_post_pages(blog, &posts, &pages, &mut files)?;

        // Standalone pages
        self.generate_page_pages(blog, &pages, &mut files)?;

        // Tag and category pages
        self.generate_tag_pages(blog, &pages, &tags, &mut files)?;
        self.generate_category_pages(blog, &pages, &categories, &mut files)?;

        files.push(GeneratedFile::new("rss.xml", rss::render_feed(blog, &posts)));

        let urls = sitemap::collect_urls(blog, &posts, &pages, &tags, &categories);
        files.push(GeneratedFile::new(
            "sitemap.xml",
            sitemap::render_sitemap(&urls),
        ));

        files.push(GeneratedFile::new("main.css", STYLESHEET));

        tracing::info!(
            posts = posts.len(),
            pages = pages.len(),
            tags = tags.len(),
            categories = categories.len(),
            "Generated {} files",
            files.len()
        );

        Ok(files)
    }

    /// Create a base context with common variables
    fn create_base_context(&self, blog: &Blog, pages: &[Page], path: &str) -> Context {
        let mut context = Context::new();
        context.insert("blog", blog);
        context.insert("language", blog.language());
        context.insert("pages", pages);
        context.insert("canonical_url", &full_url(blog.canonical_url(), path));
        context.insert("page_title", &None::<String>);
        context.insert("description", &blog.site.description);
        context
    }

    /// Index pages. Page 1 is rendered once and emitted both as the root and as `page/1.html`.
    fn generate_index_pages(
        &self,
        blog: &Blog,
        posts: &[Post],
        pages: &[Page],
        files: &mut Vec<GeneratedFile>,
    ) -> Result<()> {
        let slices = paginate(posts, blog.posts_per_page());
        tracing::info!("Generating {} index pages", slices.len());

        for slice in &slices {
            let number = slice.pagination.current;
            let path = if number == 1 {
                String::new()
            } else {
                index_page_path(number)
            };

            let mut context = self.create_base_context(blog, pages, &path);
            context.insert("page_posts", slice.items);
            context.insert("pagination", &slice.pagination);

            let html = self.renderer.render("index.html", &context)?;

            if number == 1 {
                files.push(GeneratedFile::new("index.html", html.clone()));
            }
            files.push(GeneratedFile::new(index_page_path(number), html));
            tracing::debug!("Generated index page {}", number);
        }

        Ok(())
    }

    /// Individual post pages, each linking its newer and older neighbour
    fn generate_post_pages(
        &self,
        blog: &Blog,
        posts: &[Post],
        pages: &[Page],
        files: &mut Vec<GeneratedFile>,
    ) -> Result<()> {
        for (i, post) in posts.iter().enumerate() {
            let newer = i.checked_sub(1).map(|j| NavPost::from(&posts[j]));
            let older = posts.get(i + 1).map(NavPost::from);

            let file_name = post.file_name();
            let mut context = self.create_base_context(blog, pages, &file_name);
            context.insert("page_title", &post.title);
            context.insert("description", &post.description);
            context.insert("post", post);
            context.insert("newer", &newer);
            context.insert("older", &older);

            let html = self.renderer.render("post.html", &context)?;
            tracing::debug!("Generated post: {}", file_name);
            files.push(GeneratedFile::new(file_name, html));
        }

        Ok(())
    }

    /// Standalone pages
    fn generate_page_pages(
        &self,
        blog: &Blog,
        pages: &[Page],
        files: &mut Vec<GeneratedFile>,
    ) -> Result<()> {
        for page in pages {
            let file_name = page.file_name();
            let mut context = self.create_base_context(blog, pages, &file_name);
            context.insert("page_title", &page.title);
            context.insert("description", &page.description);
            context.insert("page", page);

            let html = self.renderer.render("page.html", &context)?;
            tracing::debug!("Generated page: {}", file_name);
            files.push(GeneratedFile::new(file_name, html));
        }

        Ok(())
    }

    /// One page per tag
    fn generate_tag_pages(
        &self,
        blog: &Blog,
        pages: &[Page],
        tags: &PostIndex<'_>,
        files: &mut Vec<GeneratedFile>,
    ) -> Result<()> {
        for (slug, group) in tags {
            let path = tag_path(slug);
            let mut context = self.create_base_context(blog, pages, &path);
            context.insert("page_title", &format!("Tag: {}", group.name));
            context.insert("tag", &group.name);
            context.insert("tag_posts", &group.posts);

            let html = self.renderer.render("tag.html", &context)?;
            files.push(GeneratedFile::new(path, html));
        }

        tracing::info!("Generated {} tag pages", tags.len());
        Ok(())
    }

    /// One page per category
    fn generate_category_pages(
        &self,
        blog: &Blog,
        pages: &[Page],
        categories: &PostIndex<'_>,
        files: &mut Vec<GeneratedFile>,
    ) -> Result<()> {
        for (slug, group) in categories {
            let path = category_path(slug);
            let mut context = self.create_base_context(blog, pages, &path);
            context.insert("page_title", &format!("Category: {}", group.name));
            context.insert("category", &group.name);
            context.insert("category_posts", &group.posts);

            let html = self.renderer.render("category.html", &context)?;
            files.push(GeneratedFile::new(path, html));
        }

        tracing::info!("Generated {} category pages", categories.len());
        Ok(())
    }
}

/// Distinct names sharing a slug are merged into one output file
fn warn_slug_collisions(kind: &str, index: &PostIndex<'_>) {
    for (slug, names) in slug_collisions(index) {
        tracing::warn!(
            kind,
            slug,
            names = ?names,
            "Distinct {} names merged into one output file",
            kind
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Basics, Meta, PageSpec, PostSpec, Settings, SiteInfo};
    use crate::error::{ConfigError, Error};
    use std::fs;

    fn blog() -> Blog {
        Blog {
            site: SiteInfo {
                title: "Test Blog".into(),
                description: Some("A test blog".into()),
            },
            basics: Basics {
                name: "Test Author".into(),
                ..Default::default()
            },
            meta: Some(Meta {
                canonical: Some("https://testblog.com".into()),
                language: None,
            }),
            ..Default::default()
        }
    }

    fn post(title: &str, content: &str, created_at: Option<&str>) -> PostSpec {
        PostSpec {
            title: title.into(),
            content: Some(content.into()),
            created_at: created_at.map(str::to_string),
            ..Default::default()
        }
    }

    fn numbered_posts(count: usize) -> Vec<PostSpec> {
        (1..=count)
            .map(|i| {
                post(
                    &format!("Post {}", i),
                    &format!("Content for post {}", i),
                    Some(&format!("2024-01-{:02}T00:00:00Z", i)),
                )
            })
            .collect()
    }

    fn find<'a>(files: &'a [GeneratedFile], name: &str) -> Option<&'a GeneratedFile> {
        files.iter().find(|f| f.name == name)
    }

    fn content<'a>(files: &'a [GeneratedFile], name: &str) -> &'a str {
        &find(files, name)
            .unwrap_or_else(|| panic!("{} not generated", name))
            .content
    }

    /// Name of the single post file in a one-post site
    fn blog_slug(files: &[GeneratedFile]) -> String {
        files
            .iter()
            .map(|f| f.name.as_str())
            .find(|name| {
                name.ends_with(".html") && *name != "index.html" && !name.contains('/')
            })
            .expect("post file")
            .to_string()
    }

    async fn run(blog: &Blog) -> Vec<GeneratedFile> {
        let dir = tempfile::tempdir().unwrap();
        Generator::new(dir.path())
            .unwrap()
            .generate(blog)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_generates_expected_files() {
        let mut blog = blog();
        blog.posts = vec![post("Test Post", "# Test Content", None)];
        blog.pages = vec![PageSpec {
            title: "About".into(),
            content: Some("# About Page".into()),
            ..Default::default()
        }];

        let files = run(&blog).await;
        let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "index.html",
                "page/1.html",
                "test-post.html",
                "about.html",
                "rss.xml",
                "sitemap.xml",
                "main.css",
            ]
        );
        assert!(content(&files, "test-post.html").contains("<h1>Test Content</h1>"));
        assert!(content(&files, "about.html").contains("<h1>About Page</h1>"));
        assert_eq!(content(&files, "main.css"), STYLESHEET);
    }

    #[tokio::test]
    async fn test_invalid_config_fails_before_processing() {
        let dir = tempfile::tempdir().unwrap();
        let generator = Generator::new(dir.path()).unwrap();

        let mut no_title = blog();
        no_title.site.title = String::new();
        let err = generator.generate(&no_title).await.unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::MissingSiteTitle)));

        let mut no_author = blog();
        no_author.basics.name = String::new();
        let err = generator.generate(&no_author).await.unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::MissingAuthorName)));
        assert_eq!(
            err.to_string(),
            "Blog basics configuration with author name is required"
        );
    }

    #[tokio::test]
    async fn test_pagination_pages() {
        let mut blog = blog();
        blog.settings = Settings {
            posts_per_page: Some(2),
        };
        blog.posts = numbered_posts(5);

        let files = run(&blog).await;

        let index = content(&files, "index.html");
        assert!(index.contains("Page 1 of 3"));
        assert!(index.contains("Post 5"));
        assert!(index.contains("Post 4"));
        assert!(!index.contains("Post 3"));
        assert!(index.contains("page/2.html"));
        assert!(index.contains("Next →"));
        assert!(!index.contains("← Previous"));
        assert_eq!(index, content(&files, "page/1.html"));

        let page2 = content(&files, "page/2.html");
        assert!(page2.contains("Page 2 of 3"));
        assert!(page2.contains("Post 3"));
        assert!(page2.contains("Post 2"));
        assert!(page2.contains(r#"<a class="prev" href="/">← Previous</a>"#));
        assert!(page2.contains("/page/3.html"));
        assert!(page2.contains("Next →"));

        let page3 = content(&files, "page/3.html");
        assert!(page3.contains("Page 3 of 3"));
        assert!(page3.contains("Post 1"));
        assert!(page3.contains("/page/2.html"));
        assert!(page3.contains("← Previous"));
        assert!(!page3.contains("Next →"));

        assert!(find(&files, "page/4.html").is_none());
    }

    #[tokio::test]
    async fn test_single_page_has_no_pager() {
        let mut blog = blog();
        blog.posts = numbered_posts(2);

        let files = run(&blog).await;
        let index = content(&files, "index.html");
        assert!(!index.contains("pagination"));
        assert!(!index.contains("Page 1 of"));
        assert!(index.contains("Post 2"));
        assert!(index.contains("Post 1"));
    }

    #[tokio::test]
    async fn test_empty_blog_still_has_index() {
        let files = run(&blog()).await;
        assert!(find(&files, "index.html").is_some());
        assert!(find(&files, "page/1.html").is_some());
        assert!(content(&files, "index.html").contains("No posts yet."));
    }

    #[tokio::test]
    async fn test_tag_and_category_pages() {
        let mut blog = blog();
        blog.posts = vec![
            PostSpec {
                tags: vec!["javascript".into(), "tutorial".into()],
                categories: vec!["Programming".into()],
                ..post("JavaScript Basics", "Learn JS", Some("2024-01-01"))
            },
            PostSpec {
                tags: vec!["javascript".into(), "nodejs".into()],
                categories: vec!["Programming".into(), "Backend".into()],
                ..post("Node Servers", "Learn Node", Some("2024-01-02"))
            },
            post("Untagged", "Nothing here", Some("2024-01-03")),
        ];

        let files = run(&blog).await;

        let tag_files: Vec<_> = files
            .iter()
            .filter(|f| f.name.starts_with("tag/"))
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(
            tag_files,
            vec!["tag/javascript.html", "tag/nodejs.html", "tag/tutorial.html"]
        );

        let js = content(&files, "tag/javascript.html");
        assert!(js.contains(r#"Posts tagged with "javascript""#));
        assert!(js.contains("2 posts"));
        assert!(js.contains("/javascript-basics.html"));
        assert!(js.contains("/node-servers.html"));

        let category_files: Vec<_> = files
            .iter()
            .filter(|f| f.name.starts_with("category/"))
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(
            category_files,
            vec!["category/programming.html", "category/backend.html"]
        );
        let programming = content(&files, "category/programming.html");
        assert!(programming.contains(r#"Posts in category "Programming""#));
        assert!(programming.contains("2 posts"));
        assert!(content(&files, "category/backend.html").contains("1 post<"));

        let post_page = content(&files, "javascript-basics.html");
        assert!(post_page.contains("Tags:"));
        assert!(post_page.contains("/tag/tutorial.html"));
        assert!(post_page.contains("Categories:"));
        assert!(post_page.contains("Programming"));
        assert!(!content(&files, "untagged.html").contains("Tags:"));

        let index = content(&files, "index.html");
        assert!(index.contains("/tag/javascript.html"));
        assert!(index.contains("/category/programming.html"));
    }

    #[tokio::test]
    async fn test_tags_sharing_a_slug_share_one_page() {
        let mut blog = blog();
        blog.posts = vec![
            PostSpec {
                tags: vec!["JavaScript".into()],
                ..post("One", "first", Some("2024-01-02"))
            },
            PostSpec {
                tags: vec!["javascript".into()],
                ..post("Two", "second", Some("2024-01-01"))
            },
        ];

        let files = run(&blog).await;
        let tag_files: Vec<_> = files
            .iter()
            .filter(|f| f.name.starts_with("tag/"))
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(tag_files, vec!["tag/javascript.html"]);

        let page = content(&files, "tag/javascript.html");
        assert!(page.contains(r#"Posts tagged with "JavaScript""#));
        assert!(page.contains("/one.html"));
        assert!(page.contains("/two.html"));
        assert!(page.find("/one.html") < page.find("/two.html"));

        let sitemap = content(&files, "sitemap.xml");
        assert_eq!(sitemap.matches("tag/javascript.html").count(), 1);
    }

    #[tokio::test]
    async fn test_plain_text_fields_are_escaped() {
        let mut blog = blog();
        blog.site.title = "Tom & Jerry".into();
        blog.posts = vec![PostSpec {
            description: Some(r#"say "hi" <b>"#.into()),
            tags: vec!["<i>x</i>".into()],
            ..post(
                r#"Why <script>alert(1)</script> & "quotes""#,
                "Some **bold** text",
                Some("2024-01-01"),
            )
        }];

        let files = run(&blog).await;
        let slug = &blog_slug(&files);
        let page = content(&files, slug);

        assert!(!page.contains("<script>alert(1)</script>"));
        assert!(page.contains(
            "Why &lt;script&gt;alert(1)&lt;&#x2F;script&gt; &amp; &quot;quotes&quot;"
        ));
        assert!(page.contains(r#"content="say &quot;hi&quot;"#));
        assert!(page.contains("<title>"));
        assert!(page.contains("Tom &amp; Jerry"));
        assert!(page.contains("&lt;i&gt;x&lt;&#x2F;i&gt;"));
        assert!(!page.contains("<i>x</i>"));
        // Rendered bodies are not escaped
        assert!(page.contains("<strong>bold</strong>"));

        let index = content(&files, "index.html");
        assert!(!index.contains("<script>alert(1)</script>"));
    }

    #[tokio::test]
    async fn test_failed_items_are_isolated() {
        let mut blog = blog();
        blog.posts = vec![
            post("Good Post", "This is good content", Some("2024-01-02")),
            PostSpec {
                title: "Bad Post".into(),
                source: Some("./missing.md".into()),
                created_at: Some("2024-01-01".into()),
                ..Default::default()
            },
        ];
        blog.pages = vec![PageSpec {
            title: "Empty".into(),
            ..Default::default()
        }];

        let files = run(&blog).await;
        assert!(content(&files, "good-post.html").contains("This is good content"));
        assert!(content(&files, "bad-post.html").contains("Error: No content found"));
        assert!(content(&files, "empty.html").contains("Error: No content found"));
    }

    #[tokio::test]
    async fn test_local_source_resolves_against_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("posts")).unwrap();
        fs::write(dir.path().join("posts/hello.md"), "Hello from **disk**").unwrap();

        let mut blog = blog();
        blog.posts = vec![PostSpec {
            title: "Hello".into(),
            source: Some("./posts/hello.md".into()),
            ..Default::default()
        }];

        let files = Generator::new(dir.path())
            .unwrap()
            .generate(&blog)
            .await
            .unwrap();
        assert!(content(&files, "hello.html").contains("<strong>disk</strong>"));
    }

    #[tokio::test]
    async fn test_post_navigation() {
        let mut blog = blog();
        blog.posts = numbered_posts(3);

        let files = run(&blog).await;
        let middle = content(&files, "post-2.html");
        assert!(middle.contains(r#"<a class="newer" href="/post-3.html">"#));
        assert!(middle.contains(r#"<a class="older" href="/post-1.html">"#));

        let newest = content(&files, "post-3.html");
        assert!(!newest.contains(r#"class="newer""#));
        assert!(newest.contains(r#"<a class="older" href="/post-2.html">"#));
    }

    #[tokio::test]
    async fn test_feed_and_sitemap_counts() {
        let mut blog = blog();
        blog.settings = Settings {
            posts_per_page: Some(10),
        };
        blog.posts = numbered_posts(25);
        blog.posts[0].tags = vec!["rust".into()];
        blog.posts[0].categories = vec!["Code".into()];
        blog.pages = vec![PageSpec {
            title: "About".into(),
            content: Some("About me".into()),
            ..Default::default()
        }];

        let files = run(&blog).await;

        let feed = content(&files, "rss.xml");
        assert_eq!(feed.matches("<item>").count(), 20);
        assert!(feed.contains("<![CDATA[Post 25]]>"));
        assert!(!feed.contains("<![CDATA[Post 5]]>"));

        // home + 25 posts + 1 page + 1 tag + 1 category + pages 2..=3
        let sitemap = content(&files, "sitemap.xml");
        assert_eq!(sitemap.matches("<url>").count(), 31);

        let index = content(&files, "index.html");
        assert!(index.contains(r#"<link rel="alternate" type="application/rss+xml""#));
        assert!(index.contains(r#"href="/rss.xml""#));
    }

    #[tokio::test]
    async fn test_generation_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let generator = Generator::new(dir.path()).unwrap();
        let mut blog = blog();
        blog.posts = numbered_posts(12);

        let first = generator.generate(&blog).await.unwrap();
        let second = generator.generate(&blog).await.unwrap();
        assert_eq!(
            content(&first, "index.html"),
            content(&second, "index.html")
        );
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_concurrent_runs_agree() {
        let dir = tempfile::tempdir().unwrap();
        let generator = Generator::new(dir.path()).unwrap();
        let mut blog = blog();
        blog.posts = numbered_posts(8);

        let (a, b) = tokio::join!(generator.generate(&blog), generator.generate(&blog));
        assert_eq!(a.unwrap(), b.unwrap());
    }

    #[tokio::test]
    async fn test_many_posts_processed_in_parallel() {
        let mut blog = blog();
        blog.posts = (0..50)
            .map(|i| {
                post(
                    &format!("Parallel {}", i),
                    &format!("Body {}", i),
                    Some(&format!("2024-02-{:02}T{:02}:00:00Z", i % 28 + 1, i % 24)),
                )
            })
            .collect();

        let files = run(&blog).await;
        for i in 0..50 {
            let name = format!("parallel-{}.html", i);
            assert!(
                content(&files, &name).contains(&format!("Body {}", i)),
                "{} has wrong content",
                name
            );
        }
    }
}
