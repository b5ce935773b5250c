use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Scanner for finding schema files in a directory
pub struct Scanner {
    /// Root directory to scan
    schema_dir: PathBuf,
    /// Patterns to exclude
    exclude_patterns: Vec<String>,
}

impl Scanner {
    /// Create a new scanner
    pub fn new(schema_dir: PathBuf, exclude_patterns: Vec<String>) -> Self {
        Scanner {
            schema_dir,
            exclude_patterns,
        }
    }

    /// Scan for all `.toml` schema files, sorted by path
    pub fn scan(&self) -> Result<Vec<PathBuf>> {
        let mut schema_files = Vec::new();

        for entry in WalkDir::new(&self.schema_dir)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| !self.is_excluded(e.path()))
        {
            let entry = entry.with_context(|| {
                format!("Failed to scan schema directory: {}", self.schema_dir.display())
            })?;
            let path = entry.path();

            if path.is_file() && self.is_schema_file(path) {
                debug!("Found schema file: {}", path.display());
                schema_files.push(path.to_path_buf());
            }
        }

        schema_files.sort();
        Ok(schema_files)
    }

    /// Check if a path is a schema file
    fn is_schema_file(&self, path: &Path) -> bool {
        path.extension().map(|ext| ext == "toml").unwrap_or(false)
    }

    /// Check if a path should be excluded. Patterns are matched against
    /// each path component below the schema directory, or as a relative
    /// path prefix (`legacy/v1`).
    fn is_excluded(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.schema_dir).unwrap_or(path);

        self.exclude_patterns.iter().any(|pattern| {
            let pattern = Path::new(pattern);
            relative.starts_with(pattern)
                || relative
                    .components()
                    .any(|c| Path::new(c.as_os_str()) == pattern)
        })
    }
}
