//! Corpus enumeration.

use crate::utils::error::RunnerError;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// List the regular files of a corpus directory, sorted by path
///
/// With `extension`, only files with that extension (leading dot optional)
/// are returned.
pub fn discover_corpus(dir: &Path, extension: Option<&str>) -> Result<Vec<PathBuf>, RunnerError> {
    let unreadable = |source| RunnerError::CorpusUnreadable {
        path: dir.to_path_buf(),
        source,
    };

    let wanted = extension.map(|ext| ext.trim_start_matches('.'));
    let mut files = Vec::new();

    for entry in fs::read_dir(dir).map_err(unreadable)? {
        let path = entry.map_err(unreadable)?.path();
        if !path.is_file() {
            continue;
        }
        if let Some(ext) = wanted {
            if path.extension().and_then(|e| e.to_str()) != Some(ext) {
                debug!("Skipping {} (extension filter)", path.display());
                continue;
            }
        }
        files.push(path);
    }

    files.sort();
    Ok(files)
}
