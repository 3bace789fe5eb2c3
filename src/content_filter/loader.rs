//! Filter list loading
//!
//! Reads filter lists from local files or directories and prepends the
//! bundled default list.

use crate::scriptlets::ScriptletError;
use std::fs;
use std::path::{Path, PathBuf};

/// Extension of filter list files picked up from directories
const FILTER_EXTENSION: &str = "txt";

/// Built-in YouTube ad blocking rules
const BUNDLED_FILTERS: &str = r#"! Bundled YouTube ad blocking rules
youtube.com,m.youtube.com,music.youtube.com##+js(set-constant, ytInitialPlayerResponse.playerAds, undefined)
youtube.com,m.youtube.com,music.youtube.com##+js(set-constant, ytInitialPlayerResponse.adPlacements, undefined)
youtube.com,m.youtube.com,music.youtube.com##+js(json-prune, playerResponse.adPlacements adPlacements playerAds)
"#;

/// Loads filter lists from disk
pub struct FilterLoader {
    paths: Vec<PathBuf>,
    include_bundled: bool,
}

impl FilterLoader {
    /// Create a loader for the given files or directories
    pub fn new(paths: Vec<PathBuf>, include_bundled: bool) -> Self {
        Self {
            paths,
            include_bundled,
        }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Load every list, bundled list first.
    ///
    /// Missing paths and unreadable files are logged and skipped. Fails only
    /// when nothing at all could be loaded.
    pub fn load(&self) -> Result<Vec<String>, ScriptletError> {
        let mut filters = Vec::new();

        if self.include_bundled {
            filters.push(Self::load_bundled());
        }

        let mut last_error = None;
        for path in &self.paths {
            match Self::load_path(path) {
                Ok(mut loaded) => filters.append(&mut loaded),
                Err(e) => {
                    log::warn!("Failed to load filters from {:?}: {}", path, e);
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if filters.is_empty() => Err(e.into()),
            _ => Ok(filters),
        }
    }

    /// Built-in filter list
    pub fn load_bundled() -> String {
        BUNDLED_FILTERS.to_string()
    }

    fn load_path(path: &Path) -> std::io::Result<Vec<String>> {
        if !path.exists() {
            log::debug!("Filter path {:?} does not exist, skipping", path);
            return Ok(Vec::new());
        }

        if !path.is_dir() {
            let content = fs::read_to_string(path)?;
            log::debug!("Loaded filter list: {:?}", path);
            return Ok(vec![content]);
        }

        let mut files: Vec<PathBuf> = fs::read_dir(path)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == FILTER_EXTENSION))
            .collect();
        files.sort();

        let mut filters = Vec::with_capacity(files.len());
        for file in files {
            match fs::read_to_string(&file) {
                Ok(content) => {
                    log::debug!("Loaded filter list: {:?}", file);
                    filters.push(content);
                }
                Err(e) => {
                    log::warn!("Failed to read filter list {:?}: {}", file, e);
                }
            }
        }

        Ok(filters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_only() {
        let loader = FilterLoader::new(Vec::new(), true);
        let filters = loader.load().unwrap();
        assert_eq!(filters.len(), 1);
        assert!(filters[0].contains("youtube.com"));
    }

    #[test]
    fn test_missing_paths_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let loader = FilterLoader::new(vec![dir.path().join("missing.txt")], false);
        assert!(loader.load().unwrap().is_empty());
    }

    #[test]
    fn test_load_file_and_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("single.txt");
        fs::write(&file, "a.com##+js(noeval)\n").unwrap();

        let lists = dir.path().join("lists");
        fs::create_dir(&lists).unwrap();
        fs::write(lists.join("b.txt"), "b.com##+js(nowebrtc)\n").unwrap();
        fs::write(lists.join("a.txt"), "a.com##+js(noeval)\n").unwrap();
        fs::write(lists.join("notes.md"), "ignored").unwrap();

        let loader = FilterLoader::new(vec![file.clone(), lists.clone()], true);
        assert_eq!(loader.paths(), &[file, lists]);
        let filters = loader.load().unwrap();

        assert_eq!(filters.len(), 4);
        assert_eq!(filters[0], FilterLoader::load_bundled());
        assert_eq!(filters[1], "a.com##+js(noeval)\n");
        // directory entries are sorted by name
        assert_eq!(filters[2], "a.com##+js(noeval)\n");
        assert_eq!(filters[3], "b.com##+js(nowebrtc)\n");
    }
}
