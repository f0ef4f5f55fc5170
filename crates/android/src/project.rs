//! Flutter project layout probes

use adati_core::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Whether the directory is a Flutter project root (has a pubspec.yaml)
pub fn is_flutter_project(dir: &Path) -> bool {
    dir.join("pubspec.yaml").exists()
}

/// The Android subproject directory, which must exist
pub fn android_dir(project_dir: &Path) -> Result<PathBuf> {
    let dir = project_dir.join("android");
    if !dir.is_dir() {
        return Err(Error::project_layout(format!(
            "Android directory not found in {}",
            project_dir.display()
        )));
    }
    Ok(dir)
}

/// Location of the local secrets file for this project
pub fn key_properties_path(project_dir: &Path) -> PathBuf {
    project_dir.join("android").join("key.properties")
}

/// Whether the Android subproject carries a Gradle wrapper
pub fn has_gradle_wrapper(android_dir: &Path) -> bool {
    android_dir.join("gradlew").exists() || android_dir.join("gradlew.bat").exists()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_flutter_project() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!is_flutter_project(dir.path()));

        std::fs::write(dir.path().join("pubspec.yaml"), "name: adati\n").unwrap();
        assert!(is_flutter_project(dir.path()));
    }

    #[test]
    fn test_android_dir_missing_is_layout_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = android_dir(dir.path()).unwrap_err();
        assert_eq!(err.code, adati_core::ErrorCode::ProjectLayoutError);
    }

    #[test]
    fn test_android_dir_found() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("android")).unwrap();
        assert!(android_dir(dir.path()).is_ok());
    }

    #[test]
    fn test_key_properties_path() {
        let path = key_properties_path(Path::new("/project"));
        assert_eq!(path, PathBuf::from("/project/android/key.properties"));
    }

    #[test]
    fn test_has_gradle_wrapper() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!has_gradle_wrapper(dir.path()));

        std::fs::write(dir.path().join("gradlew"), "#!/bin/sh\n").unwrap();
        assert!(has_gradle_wrapper(dir.path()));
    }
}
