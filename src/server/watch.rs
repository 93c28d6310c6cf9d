//! Debounced file watching shared by `serve` and `build --watch`

use anyhow::Result;
use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, Debouncer};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;

/// Quiet period before a burst of changes triggers one rebuild
pub const DEBOUNCE: Duration = Duration::from_millis(500);

/// Keeps the watcher alive; dropping it stops the events
pub struct ChangeWatcher {
    _debouncer: Debouncer<RecommendedWatcher>,
    rx: mpsc::UnboundedReceiver<Vec<PathBuf>>,
}

impl ChangeWatcher {
    /// Watch the config file and, recursively, the directory holding local sources.
    /// Paths under `ignore` (the build output) never trigger a rebuild.
    pub fn start(config_path: &Path, base_dir: &Path, ignore: Option<&Path>) -> Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        let ignore = ignore.map(absolute);
        let base_dir = absolute(base_dir);
        let config_path = absolute(config_path);

        let mut debouncer = new_debouncer(DEBOUNCE, move |result: DebounceEventResult| match result {
            Ok(events) => {
                let changed: Vec<PathBuf> = events
                    .into_iter()
                    .map(|e| e.path)
                    .filter(|p| is_relevant(p, ignore.as_deref()))
                    .collect();
                if !changed.is_empty() {
                    let _ = tx.send(changed);
                }
            }
            Err(e) => tracing::error!("Watch error: {:?}", e),
        })?;

        if base_dir.exists() {
            debouncer
                .watcher()
                .watch(&base_dir, RecursiveMode::Recursive)?;
            tracing::debug!("Watching: {:?}", base_dir);
        }

        // The config usually sits inside base_dir, but not necessarily
        if config_path.exists() && !config_path.starts_with(&base_dir) {
            debouncer
                .watcher()
                .watch(&config_path, RecursiveMode::NonRecursive)?;
            tracing::debug!("Watching: {:?}", config_path);
        }

        Ok(Self {
            _debouncer: debouncer,
            rx,
        })
    }

    /// Wait for the next batch of changed paths. `None` once the watcher is gone.
    pub async fn changed(&mut self) -> Option<Vec<PathBuf>> {
        self.rx.recv().await
    }
}

/// Event paths come back absolute, so compare against absolute roots
fn absolute(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Filter out editor droppings, VCS internals and our own output
fn is_relevant(path: &Path, ignore: Option<&Path>) -> bool {
    if ignore.is_some_and(|dir| path.starts_with(dir)) {
        return false;
    }
    let path_str = path.to_string_lossy();
    !path_str.contains(".git")
        && !path_str.contains(".DS_Store")
        && !path_str.contains("node_modules")
        && !path_str.ends_with('~')
        && !path_str.ends_with(".swp")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_relevant() {
        assert!(is_relevant(Path::new("/site/blog.json"), None));
        assert!(is_relevant(Path::new("/site/posts/a.md"), None));
        assert!(!is_relevant(Path::new("/site/.git/index"), None));
        assert!(!is_relevant(Path::new("/site/posts/a.md~"), None));
        assert!(!is_relevant(
            Path::new("/site/build/index.html"),
            Some(Path::new("/site/build"))
        ));
    }
}
