//! Games directory catalog.
//!
//! Maps the numeric selector sent by the menu client to an image path. Ids
//! are positions in the path-sorted scan, so they are stable as long as the
//! directory contents are.

use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub id: usize,
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Walk `dir` recursively and collect files whose extension is in
    /// `extensions` (case-insensitive).
    pub fn scan(dir: &Path, extensions: &[String]) -> Self {
        if !dir.is_dir() {
            tracing::warn!(dir = %dir.display(), "Games directory not found, catalog is empty");
            return Self::default();
        }

        let paths: Vec<PathBuf> = WalkDir::new(dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(e) => Some(e),
                Err(err) => {
                    tracing::debug!("Skipping unreadable entry: {err}");
                    None
                }
            })
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| has_extension(p, extensions))
            .collect();

        let catalog = Self::from_paths(paths);
        tracing::info!(
            dir = %dir.display(),
            games = catalog.len(),
            "Scanned games directory"
        );
        catalog
    }

    /// Build a catalog from an explicit list. Paths are sorted before ids are
    /// assigned.
    pub fn from_paths(mut paths: Vec<PathBuf>) -> Self {
        paths.sort();
        paths.dedup();
        let entries = paths
            .into_iter()
            .enumerate()
            .map(|(id, path)| CatalogEntry {
                id,
                name: display_name(&path),
                path,
            })
            .collect();
        Self { entries }
    }

    /// Image path for selector `id`. Negative or out-of-range ids find
    /// nothing.
    pub fn lookup_filename(&self, id: i64) -> Option<PathBuf> {
        let index = usize::try_from(id).ok()?;
        self.entries.get(index).map(|e| e.path.clone())
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)))
}

fn display_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
