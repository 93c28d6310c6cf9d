//! Create a new post

use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;

use crate::content::slugify_title;
use crate::JsonBlog;

/// Append a post to the configuration and create its markdown source.
/// Existing keys keep their order.
pub fn create_post(
    app: &JsonBlog,
    title: &str,
    tags: &[String],
    categories: &[String],
) -> Result<PathBuf> {
    let raw = fs::read_to_string(&app.config_path)
        .with_context(|| format!("Failed to read {}", app.config_path.display()))?;
    let is_yaml = matches!(
        app.config_path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let mut config: Value = if is_yaml {
        serde_yaml::from_str(&raw)?
    } else {
        serde_json::from_str(&raw)?
    };

    let slug = slugify_title(title);
    let relative = format!("./posts/{}.md", slug);
    let file_path = app.base_dir.join("posts").join(format!("{}.md", slug));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let root = config
        .as_object_mut()
        .context("Blog configuration must be an object")?;
    let posts = root
        .entry("posts")
        .or_insert_with(|| Value::Array(Vec::new()))
        .as_array_mut()
        .context("`posts` must be a list")?;

    let mut post = json!({
        "title": title,
        "source": relative,
        "createdAt": chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
    });
    if !tags.is_empty() {
        post["tags"] = json!(tags);
    }
    if !categories.is_empty() {
        post["categories"] = json!(categories);
    }
    posts.push(post);

    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, format!("# {}\n\n", title))?;

    let serialized = if is_yaml {
        serde_yaml::to_string(&config)?
    } else {
        let mut s = serde_json::to_string_pretty(&config)?;
        s.push('\n');
        s
    };
    fs::write(&app.config_path, serialized)?;

    println!("Created: {:?}", file_path);
    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_post_appends_and_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("blog.json");
        fs::write(
            &config,
            r#"{"site":{"title":"T","description":"D"},"basics":{"name":"N"},"posts":[]}"#,
        )
        .unwrap();
        let app = JsonBlog::new(&config, dir.path().join("build"));

        let path = create_post(&app, "My New Post!", &["rust".to_string()], &[]).unwrap();
        assert_eq!(path, dir.path().join("posts/my-new-post.md"));
        assert!(fs::read_to_string(&path).unwrap().starts_with("# My New Post!"));

        let written = fs::read_to_string(&config).unwrap();
        let site = written.find("\"site\"").unwrap();
        let basics = written.find("\"basics\"").unwrap();
        let posts = written.find("\"posts\"").unwrap();
        assert!(site < basics && basics < posts);

        let blog = app.load_blog().unwrap();
        assert_eq!(blog.posts.len(), 1);
        assert_eq!(blog.posts[0].title, "My New Post!");
        assert_eq!(blog.posts[0].source.as_deref(), Some("./posts/my-new-post.md"));
        assert_eq!(blog.posts[0].tags, vec!["rust"]);
        assert!(blog.posts[0].created_at.is_some());
    }

    #[test]
    fn test_new_post_creates_posts_list() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("blog.yaml");
        fs::write(&config, "site:\n  title: T\n  description: D\nbasics:\n  name: N\n").unwrap();
        let app = JsonBlog::new(&config, dir.path().join("build"));

        create_post(&app, "Yaml Post", &[], &["Notes".to_string()]).unwrap();
        let blog = app.load_blog().unwrap();
        assert_eq!(blog.posts[0].categories, vec!["Notes"]);
    }

    #[test]
    fn test_new_post_refuses_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("blog.json");
        fs::write(&config, "{}").unwrap();
        fs::create_dir_all(dir.path().join("posts")).unwrap();
        fs::write(dir.path().join("posts/taken.md"), "x").unwrap();
        let app = JsonBlog::new(&config, dir.path().join("build"));

        assert!(create_post(&app, "Taken", &[], &[]).is_err());
        assert_eq!(fs::read_to_string(&config).unwrap(), "{}");
    }
}
