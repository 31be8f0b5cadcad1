use crate::config::DEFAULT_EXCLUDED_DIRS;
use ignore::WalkBuilder;
use std::path::{Component, Path, PathBuf};

/// Recursive file walk that skips build, VCS and dependency directories
pub struct DirectoryScanner {
    root: PathBuf,
    excluded: Vec<String>,
    max_depth: usize,
}

impl DirectoryScanner {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            excluded: DEFAULT_EXCLUDED_DIRS
                .iter()
                .map(|d| (*d).to_string())
                .collect(),
            max_depth: 20,
        }
    }

    #[must_use]
    pub fn with_excluded(mut self, excluded: &[String]) -> Self {
        self.excluded = excluded.iter().map(|d| d.to_lowercase()).collect();
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Files under the root accepted by `accept`, sorted by path.
    ///
    /// Unreadable entries are logged and skipped.
    pub fn scan(&self, accept: impl Fn(&Path) -> bool) -> Vec<PathBuf> {
        let mut files = Vec::new();

        let root = self.root.clone();
        let excluded = self.excluded.clone();
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .hidden(false)
            .git_ignore(true)
            .git_global(false)
            .git_exclude(true)
            .max_depth(Some(self.max_depth));
        builder.filter_entry(move |entry| !is_excluded_scope(entry.path(), &root, &excluded));

        for result in builder.build() {
            match result {
                Ok(entry) => {
                    if !entry.file_type().is_some_and(|t| t.is_file()) {
                        continue;
                    }
                    let path = entry.path();
                    if accept(path) {
                        files.push(path.to_path_buf());
                    }
                }
                Err(e) => log::warn!("Failed to read entry: {e}"),
            }
        }

        files.sort();
        log::info!("Found {} candidate files under {}", files.len(), self.root.display());
        files
    }
}

fn is_excluded_scope(path: &Path, root: &Path, excluded: &[String]) -> bool {
    let Ok(relative) = path.strip_prefix(root) else {
        return false;
    };
    relative.components().any(|component| match component {
        Component::Normal(name) => {
            let lowered = name.to_string_lossy().to_lowercase();
            excluded.iter().any(|ignored| *ignored == lowered)
        }
        _ => false,
    })
}
