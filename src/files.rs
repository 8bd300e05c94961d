//! File-serving hook for images and attachments embedded in page content.

use std::path::{Component, Path, PathBuf};

use crate::errors::AppError;

/// The only file area pages serve from.
pub const FILE_AREA: &str = "pagecontent";

/// Resolve `(context, filearea, args)` to a file under `files_dir`.
///
/// Anything outside the page content area, any path that tries to leave its
/// directory, and anything that is not a regular file is `NotFound`.
pub fn resolve(files_dir: &Path, context: &str, filearea: &str, args: &str) -> Result<PathBuf, AppError> {
    if filearea != FILE_AREA {
        log::debug!("File request for unknown area '{filearea}'");
        return Err(AppError::NotFound);
    }

    let mut path = files_dir.to_path_buf();
    for part in [context, filearea].into_iter().chain(args.split('/').filter(|s| !s.is_empty())) {
        let mut components = Path::new(part).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(segment)), None) => path.push(segment),
            _ => {
                log::warn!("Rejected file path segment '{part}'");
                return Err(AppError::NotFound);
            }
        }
    }

    if path.is_file() { Ok(path) } else { Err(AppError::NotFound) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_traversal_and_other_areas() {
        let dir = Path::new("/srv/files");
        assert!(matches!(resolve(dir, "12", "pagecontent", "../secret"), Err(AppError::NotFound)));
        assert!(matches!(resolve(dir, "..", "pagecontent", "a.png"), Err(AppError::NotFound)));
        assert!(matches!(resolve(dir, "12", "attachments", "a.png"), Err(AppError::NotFound)));
    }
}
