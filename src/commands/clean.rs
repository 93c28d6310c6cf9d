//! Clean the output directory

use anyhow::Result;
use std::fs;

use crate::JsonBlog;

/// Remove the output directory if present
pub fn run(app: &JsonBlog) -> Result<()> {
    if app.output_dir.exists() {
        fs::remove_dir_all(&app.output_dir)?;
        tracing::info!("Deleted: {:?}", app.output_dir);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_removes_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("build");
        fs::create_dir_all(output.join("page")).unwrap();
        fs::write(output.join("index.html"), "x").unwrap();

        let app = JsonBlog::new(dir.path().join("blog.json"), &output);
        run(&app).unwrap();
        assert!(!output.exists());

        // Nothing to remove is fine
        run(&app).unwrap();
    }
}
