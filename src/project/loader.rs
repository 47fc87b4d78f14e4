//! Loading `.pkl` files from disk into a project.

use std::fs;
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use super::Project;
use crate::error::Result;

const PKL_EXTENSION: &str = "pkl";

/// Open every `.pkl` file under `dir`, recursively, at version 0.
///
/// Returns the uris of the loaded documents, sorted.
pub fn load_directory(project: &Project, dir: impl AsRef<Path>) -> Result<Vec<String>> {
    let root = dir.as_ref().canonicalize()?;
    let mut loaded = Vec::new();

    for entry in WalkDir::new(&root).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != PKL_EXTENSION) {
            continue;
        }
        let text = fs::read_to_string(path)?;
        let uri = file_uri(path);
        project.open(&uri, 0, text);
        loaded.push(uri);
    }

    debug!(dir = %root.display(), files = loaded.len(), "loaded directory");
    loaded.sort();
    Ok(loaded)
}

/// `file://` uri for an absolute path.
pub fn file_uri(path: &Path) -> String {
    let path = path.to_string_lossy().replace('\\', "/");
    if path.starts_with('/') {
        format!("file://{path}")
    } else {
        format!("file:///{path}")
    }
}
