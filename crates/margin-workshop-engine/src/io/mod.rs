use crate::analytics::{feedback_themes, themes_csv};
use crate::models::ManuscriptFile;
use crate::records::{Comment, CommentRecord};
use relative_path::{RelativePath, RelativePathBuf};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed comments file {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid manuscripts directory: {0}")]
    InvalidManuscriptsDir(String),
}

/// Read a manuscript and return its content
pub fn read_manuscript(relative_path: &RelativePath, root: &Path) -> Result<String, IoError> {
    let absolute_path = relative_path.to_path(root);
    if !absolute_path.exists() {
        return Err(IoError::NotFound(absolute_path));
    }
    fs::read_to_string(&absolute_path).map_err(IoError::Io)
}

/// Scan for manuscripts (`.txt` and `.md`) under the root, sorted by path
pub fn scan_manuscripts(root: &Path) -> Result<Vec<ManuscriptFile>, IoError> {
    validate_manuscripts_dir(root)?;

    let mut files = Vec::new();
    scan_directory_recursive(root, RelativePath::new(""), &mut files)?;
    files.sort();
    log::debug!("found {} manuscripts under {}", files.len(), root.display());
    Ok(files)
}

fn scan_directory_recursive(
    dir: &Path,
    relative_dir: &RelativePath,
    files: &mut Vec<ManuscriptFile>,
) -> Result<(), IoError> {
    let entries = fs::read_dir(dir).map_err(IoError::Io)?;

    for entry in entries {
        let entry = entry.map_err(IoError::Io)?;
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            log::debug!("skipping non UTF-8 path {}", path.display());
            continue;
        };
        let relative = relative_dir.join(name);

        if path.is_dir() {
            scan_directory_recursive(&path, &relative, files)?;
        } else if ManuscriptFile::is_manuscript_path(name) {
            files.push(ManuscriptFile::new(relative));
        }
    }

    Ok(())
}

/// Load the comments saved alongside a manuscript. A manuscript nobody has
/// commented on yet has no sidecar, which reads as an empty list.
pub fn load_comments(file: &ManuscriptFile, root: &Path) -> Result<Vec<Comment>, IoError> {
    let path = file.comments_path().to_path(root);
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(&path)?;
    let records: Vec<CommentRecord> =
        serde_json::from_str(&content).map_err(|source| IoError::Json {
            path: path.clone(),
            source,
        })?;

    Ok(records
        .into_iter()
        .filter_map(|record| match Comment::from_record(record) {
            Ok(comment) => Some(comment),
            Err(e) => {
                log::warn!("{}: skipping comment: {e}", path.display());
                None
            }
        })
        .collect())
}

/// Write every comment for a manuscript to its sidecar, replacing what was there
pub fn save_comments(
    file: &ManuscriptFile,
    root: &Path,
    comments: &[Comment],
) -> Result<(), IoError> {
    let relative: RelativePathBuf = file.comments_path();
    let path = relative.to_path(root);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let records: Vec<CommentRecord> = comments.iter().map(Comment::to_record).collect();
    let json = serde_json::to_string_pretty(&records).map_err(|source| IoError::Json {
        path: path.clone(),
        source,
    })?;
    fs::write(&path, json)?;
    log::debug!("saved {} comments to {}", comments.len(), path.display());
    Ok(())
}

/// Write the feedback-theme breakdown of `comments` as CSV beside the
/// manuscript, returning where it went.
pub fn export_themes(
    file: &ManuscriptFile,
    root: &Path,
    comments: &[Comment],
) -> Result<PathBuf, IoError> {
    let path = file.themes_export_path().to_path(root);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, themes_csv(&feedback_themes(comments)))?;
    log::info!("exported feedback themes to {}", path.display());
    Ok(path)
}

pub fn validate_manuscripts_dir(path: &Path) -> Result<(), IoError> {
    if !path.exists() || !path.is_dir() {
        return Err(IoError::InvalidManuscriptsDir(format!(
            "{} is not a directory",
            path.display()
        )));
    }

    Ok(())
}
