use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use walkdir::WalkDir;

use crate::base::Uri;

/// Failure to scan a configuration root.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The root exists but is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// The root itself could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Collects every `.bsl` and `.os` source under `root`.
///
/// Returns path/text pairs ready for `Workspace::populate`, which orders
/// and deduplicates them. Sources are decoded lossily, so a stray invalid
/// byte does not lose the file. Entries that cannot be read are logged and
/// skipped; only a failure on the root itself is an error.
pub fn discover(root: impl AsRef<Path>) -> Result<Vec<(Uri, String)>, LoadError> {
    let root = root.as_ref();
    let metadata = std::fs::metadata(root).map_err(|source| LoadError::Io {
        path: root.display().to_string(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(LoadError::NotADirectory(root.display().to_string()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                tracing::warn!("[PROJECT] skipping unreadable entry: {error}");
                continue;
            }
        };
        if !entry.file_type().is_file() || !is_source_path(entry.path()) {
            continue;
        }
        match std::fs::read(entry.path()) {
            Ok(bytes) => {
                let uri: Uri = Arc::from(entry.path().to_string_lossy().as_ref());
                files.push((uri, String::from_utf8_lossy(&bytes).into_owned()));
            }
            Err(error) => {
                tracing::warn!(
                    "[PROJECT] cannot read {}: {error}",
                    entry.path().display()
                );
            }
        }
    }
    tracing::info!(
        "[PROJECT] discovered {} source files under {}",
        files.len(),
        root.display()
    );
    Ok(files)
}

fn is_source_path(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| {
            extension.eq_ignore_ascii_case("bsl") || extension.eq_ignore_ascii_case("os")
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    #[test]
    fn test_discovers_sources_recursively() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("Catalogs/Товары/Ext");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("ManagerModule.bsl"), "Перем Таблица;").unwrap();
        fs::write(dir.path().join("script.os"), "Перем Скрипт;").unwrap();
        fs::write(dir.path().join("readme.txt"), "не код").unwrap();

        let mut files = discover(dir.path()).unwrap();
        files.sort_by(|a, b| a.0.cmp(&b.0));

        assert_eq!(files.len(), 2);
        assert!(files[0].0.ends_with("ManagerModule.bsl"));
        assert_eq!(files[0].1, "Перем Таблица;");
        assert!(files[1].0.ends_with("script.os"));
    }

    #[test]
    fn test_invalid_utf8_is_decoded_lossily() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.bsl"), b"\xFF\xFE = 1;").unwrap();

        let files = discover(dir.path()).unwrap();

        assert_eq!(files.len(), 1);
        assert!(files[0].1.contains('\u{FFFD}'));
        assert!(files[0].1.ends_with(" = 1;"));
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("нет-такого");

        let error = discover(&missing).unwrap_err();

        assert!(matches!(error, LoadError::Io { .. }));
    }

    #[test]
    fn test_file_root_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("module.bsl");
        fs::write(&file, "Перем Х;").unwrap();

        let error = discover(&file).unwrap_err();

        assert!(matches!(error, LoadError::NotADirectory(_)));
    }

    #[test]
    fn test_empty_root_yields_no_files() {
        let dir = tempfile::tempdir().unwrap();

        assert!(discover(dir.path()).unwrap().is_empty());
    }
}
