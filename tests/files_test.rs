//! File hook tests against a temporary files directory.

use std::fs;

use tempfile::TempDir;

use custompages::errors::AppError;
use custompages::files::resolve;

fn files_dir() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let area = dir.path().join("12").join("pagecontent").join("img");
    fs::create_dir_all(&area).expect("Failed to create file area");
    fs::write(area.join("logo.png"), b"png").expect("Failed to write file");
    dir
}

#[test]
fn test_existing_file_resolves() {
    let dir = files_dir();
    let path = resolve(dir.path(), "12", "pagecontent", "img/logo.png").unwrap();
    assert_eq!(fs::read(path).unwrap(), b"png");
}

#[test]
fn test_missing_file_and_directory_are_not_found() {
    let dir = files_dir();
    assert!(matches!(resolve(dir.path(), "12", "pagecontent", "img/nope.png"), Err(AppError::NotFound)));
    assert!(matches!(resolve(dir.path(), "12", "pagecontent", "img"), Err(AppError::NotFound)));
    assert!(matches!(resolve(dir.path(), "13", "pagecontent", "img/logo.png"), Err(AppError::NotFound)));
}

#[test]
fn test_other_areas_and_traversal_are_rejected() {
    let dir = files_dir();
    assert!(matches!(resolve(dir.path(), "12", "private", "img/logo.png"), Err(AppError::NotFound)));
    assert!(matches!(
        resolve(dir.path(), "12", "pagecontent", "img/../img/logo.png"),
        Err(AppError::NotFound)
    ));
}
