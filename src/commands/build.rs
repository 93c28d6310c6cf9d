//! Generate the site and write it to disk

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::time::Instant;

use crate::generator::GeneratedFile;
use crate::server::ChangeWatcher;
use crate::JsonBlog;

/// Generate the site into the output directory. Returns the number of files written.
pub async fn run(app: &JsonBlog) -> Result<usize> {
    let start = Instant::now();

    let blog = app
        .load_blog()
        .with_context(|| format!("Failed to load {}", app.config_path.display()))?;
    let files = crate::generate(&blog, &app.base_dir).await?;
    write_files(&app.output_dir, &files)?;

    let duration = start.elapsed();
    tracing::info!(
        "Wrote {} files to {} in {:.2}s",
        files.len(),
        app.output_dir.display(),
        duration.as_secs_f64()
    );

    Ok(files.len())
}

/// Write generated files under `output_dir`, creating parent directories.
/// A later file with the same name overwrites an earlier one.
pub fn write_files(output_dir: &Path, files: &[GeneratedFile]) -> Result<()> {
    fs::create_dir_all(output_dir)?;

    for file in files {
        let output_path = output_dir.join(&file.name);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create dir {:?}", parent))?;
        }
        fs::write(&output_path, &file.content)
            .with_context(|| format!("Failed to write {:?}", output_path))?;
        tracing::debug!("Wrote: {:?}", output_path);
    }

    Ok(())
}

/// Rebuild whenever the config or a local source changes
pub async fn watch(app: &JsonBlog) -> Result<()> {
    let mut watcher = ChangeWatcher::start(&app.config_path, &app.base_dir, Some(&app.output_dir))?;
    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    while let Some(paths) = watcher.changed().await {
        for path in &paths {
            tracing::info!("File changed: {}", path.display());
        }
        if let Err(e) = run(app).await {
            tracing::error!("Generation failed: {:#}", e);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_files_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![
            GeneratedFile {
                name: "index.html".into(),
                content: "<p>home</p>".into(),
            },
            GeneratedFile {
                name: "tag/rust.html".into(),
                content: "<p>rust</p>".into(),
            },
            GeneratedFile {
                name: "tag/rust.html".into(),
                content: "<p>Rust</p>".into(),
            },
        ];

        write_files(dir.path(), &files).unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("index.html")).unwrap(),
            "<p>home</p>"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("tag/rust.html")).unwrap(),
            "<p>Rust</p>"
        );
    }

    #[tokio::test]
    async fn test_build_writes_site() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("posts")).unwrap();
        fs::write(dir.path().join("posts/first.md"), "# First").unwrap();
        let config = dir.path().join("blog.json");
        fs::write(
            &config,
            r#"{
                "site": { "title": "Built", "description": "A built blog" },
                "basics": { "name": "Builder" },
                "settings": { "postsPerPage": 1 },
                "posts": [
                    { "title": "First", "source": "./posts/first.md", "createdAt": "2024-01-01" },
                    { "title": "Second", "content": "Inline", "createdAt": "2024-01-02", "tags": ["news"] }
                ]
            }"#,
        )
        .unwrap();

        let output = dir.path().join("build");
        let app = JsonBlog::new(&config, &output);
        let count = app.build().await.unwrap();

        // index, page/1, page/2, 2 posts, 1 tag, rss, sitemap, css
        assert_eq!(count, 9);
        assert!(output.join("page/2.html").is_file());
        assert!(output.join("tag/news.html").is_file());
        let first = fs::read_to_string(output.join("first.html")).unwrap();
        assert!(first.contains("<h1>First</h1>"));
    }

    #[tokio::test]
    async fn test_build_reports_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("blog.json");
        fs::write(&config, r#"{ "site": { "description": "x" }, "basics": { "name": "A" } }"#)
            .unwrap();

        let app = JsonBlog::new(&config, dir.path().join("build"));
        let err = app.build().await.unwrap_err();
        assert!(format!("{:#}", err).contains("Blog site configuration with title is required"));
        assert!(!dir.path().join("build").exists());
    }
}
