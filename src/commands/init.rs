//! Initialize a new blog

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::DEFAULT_CONFIG;

const STARTER_CONFIG: &str = r#"{
  "site": {
    "title": "My Blog",
    "description": "Thoughts, notes and experiments"
  },
  "basics": {
    "name": "Your Name",
    "label": "Writer",
    "email": "you@example.com"
  },
  "meta": {
    "canonical": "https://example.com",
    "language": "en"
  },
  "settings": {
    "postsPerPage": 10
  },
  "posts": [
    {
      "title": "Hello World",
      "description": "The first post on this blog",
      "source": "./posts/hello-world.md",
      "createdAt": "{{ date }}",
      "tags": ["welcome"],
      "categories": ["General"]
    }
  ],
  "pages": [
    {
      "title": "About",
      "content": "This blog is generated by **jsonblog** from a single `blog.json` file."
    }
  ]
}
"#;

const STARTER_POST: &str = r#"# Hello World

Welcome to your new blog. Edit `posts/hello-world.md` or add posts to `blog.json`.

```rust
fn main() {
    println!("Hello, world!");
}
```
"#;

/// Initialize a new blog in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join(DEFAULT_CONFIG);
    if config_path.exists() {
        anyhow::bail!("File already exists: {:?}", config_path);
    }

    fs::create_dir_all(target_dir.join("posts"))?;

    let now = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
    fs::write(&config_path, STARTER_CONFIG.replace("{{ date }}", &now))?;

    let post_path = target_dir.join("posts/hello-world.md");
    if !post_path.exists() {
        fs::write(&post_path, STARTER_POST)?;
    }

    tracing::info!("Created {:?}", config_path);
    Ok(())
}
