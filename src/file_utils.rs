use anyhow::{Context, Result, anyhow};
use log::debug;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File utilities for locating documents and guarding outputs
pub struct FileManager;

impl FileManager {
    /// Find files with a specific extension in a directory, sorted by path
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let extension = extension.trim_start_matches('.');
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
            {
                result.push(path.to_path_buf());
            }
        }

        result.sort();
        Ok(result)
    }

    /// Expand an input path into the documents to process
    ///
    /// A file is returned as-is regardless of extension; a directory is
    /// searched recursively for `.json` files.
    pub fn collect_inputs<P: AsRef<Path>>(path: P) -> Result<Vec<PathBuf>> {
        let path = path.as_ref();
        if path.is_file() {
            return Ok(vec![path.to_path_buf()]);
        }
        if path.is_dir() {
            let files = Self::find_files(path, "json")?;
            debug!("Found {} documents under {}", files.len(), path.display());
            return Ok(files);
        }
        Err(anyhow!("Input path does not exist: {}", path.display()))
    }

    /// Refuse to overwrite an existing file unless forced
    pub fn ensure_writable<P: AsRef<Path>>(path: P, force_overwrite: bool) -> Result<()> {
        let path = path.as_ref();
        if path.exists() && !force_overwrite {
            return Err(anyhow!(
                "Output file already exists: {} (use --force-overwrite to replace it)",
                path.display()
            ));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        Ok(())
    }
}
