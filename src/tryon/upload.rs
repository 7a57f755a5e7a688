use log::{info, warn};
use std::path::{Path, PathBuf};
use uuid::Uuid;
use walkdir::WalkDir;

use crate::catalog::scanner::is_catalog_image;
use crate::error::{AppError, AppResult};

/// Copy a user-picked image into `save_dir` under a short random name.
///
/// The extension is kept (lower-cased) so the copy stays recognisable as an
/// image; anything that isn't png/jpg/jpeg is rejected.
pub async fn save_uploaded_file(source: PathBuf, save_dir: PathBuf) -> AppResult<PathBuf> {
    let filename = source
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();
    if !is_catalog_image(&filename) {
        return Err(AppError::UnsupportedUpload(source));
    }

    tokio::fs::create_dir_all(&save_dir)
        .await
        .map_err(|e| AppError::io(&save_dir, e))?;

    let target = save_dir.join(upload_file_name(&source));
    tokio::fs::copy(&source, &target)
        .await
        .map_err(|e| AppError::io(&source, e))?;

    info!("📥 Saved upload {} as {}", source.display(), target.display());
    Ok(target)
}

/// Copy the generated picture to a user-chosen location
pub async fn export_result(source: PathBuf, target: PathBuf) -> AppResult<PathBuf> {
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| AppError::io(parent, e))?;
    }
    tokio::fs::copy(&source, &target)
        .await
        .map_err(|e| AppError::io(&source, e))?;

    info!("💾 Exported {} to {}", source.display(), target.display());
    Ok(target)
}

/// `<8 random hex chars>.<lower-case extension>`
pub fn upload_file_name(source: &Path) -> String {
    let id = Uuid::new_v4().simple().to_string();
    let short = &id[..8];
    match source.extension() {
        Some(ext) => format!("{}.{}", short, ext.to_string_lossy().to_lowercase()),
        None => short.to_string(),
    }
}

/// First image already present in the user photo directory, if any.
/// The directory is created when missing.
pub fn find_sample_photo(dir: &Path) -> Option<PathBuf> {
    if let Err(e) = std::fs::create_dir_all(dir) {
        warn!("⚠️  Could not create {}: {}", dir.display(), e);
        return None;
    }

    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .find(|e| is_catalog_image(&e.file_name().to_string_lossy()))
        .map(|e| e.into_path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_upload_file_name() {
        let name = upload_file_name(Path::new("/home/me/Holiday.JPG"));
        assert_eq!(name.len(), 12);
        assert!(name.ends_with(".jpg"));
        assert_ne!(name, upload_file_name(Path::new("/home/me/Holiday.JPG")));
    }

    #[tokio::test]
    async fn test_save_uploaded_file_copies_into_dir() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("me.PNG");
        fs::write(&source, b"pixels").unwrap();
        let save_dir = dir.path().join("uploads").join("user_images");

        let saved = save_uploaded_file(source, save_dir.clone()).await.unwrap();

        assert_eq!(saved.parent(), Some(save_dir.as_path()));
        assert_eq!(saved.extension().unwrap(), "png");
        assert_eq!(fs::read(&saved).unwrap(), b"pixels");
    }

    #[tokio::test]
    async fn test_save_uploaded_file_rejects_other_types() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("notes.txt");
        fs::write(&source, b"hi").unwrap();

        let result = save_uploaded_file(source, dir.path().join("out")).await;
        assert!(matches!(result, Err(AppError::UnsupportedUpload(_))));
    }

    #[tokio::test]
    async fn test_export_result_copies_to_chosen_path() {
        let dir = tempfile::tempdir().unwrap();
        let generated = dir.path().join("generated_1a2b3c4d.png");
        fs::write(&generated, b"result").unwrap();
        let target = dir.path().join("exports").join("my_look.png");

        let saved = export_result(generated.clone(), target.clone()).await.unwrap();

        assert_eq!(saved, target);
        assert_eq!(fs::read(&target).unwrap(), b"result");
        assert!(generated.is_file());
    }

    #[tokio::test]
    async fn test_export_result_reports_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let result = export_result(dir.path().join("gone.png"), dir.path().join("out.png")).await;
        assert!(matches!(result, Err(AppError::Io { .. })));
    }

    #[test]
    fn test_find_sample_photo() {
        let dir = tempfile::tempdir().unwrap();
        let photos = dir.path().join("user_images");
        assert_eq!(find_sample_photo(&photos), None);
        assert!(photos.is_dir());

        fs::write(photos.join("readme.txt"), b"x").unwrap();
        fs::write(photos.join("priya_1.png"), b"x").unwrap();
        assert_eq!(find_sample_photo(&photos), Some(photos.join("priya_1.png")));
    }
}
