use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::shared::constants::APP_DIR_NAME;

#[derive(Error, Debug)]
pub enum ModelResolveError {
    #[error("model file not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to create cache directory: {0}")]
    CacheDir(#[source] std::io::Error),
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to write model to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not determine cache directory")]
    NoCacheDir,
}

/// Progress callback: `(bytes_downloaded, total_bytes)`.
/// `total_bytes` is 0 if the server didn't provide Content-Length.
pub type ProgressFn = Box<dyn Fn(u64, u64) + Send>;

/// Locates a detection model, downloading it into the user cache if needed.
///
/// An explicit path always wins and must exist. Otherwise the platform
/// cache directory is checked before falling back to `url`.
pub fn resolve(
    name: &str,
    url: &str,
    explicit: Option<&Path>,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, ModelResolveError> {
    if let Some(path) = explicit {
        return if path.is_file() {
            Ok(path.to_path_buf())
        } else {
            Err(ModelResolveError::NotFound(path.to_path_buf()))
        };
    }
    resolve_in(&model_cache_dir()?, name, url, progress)
}

fn resolve_in(
    cache_dir: &Path,
    name: &str,
    url: &str,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, ModelResolveError> {
    let cached = cache_dir.join(name);
    if cached.is_file() {
        log::debug!("Using cached model {}", cached.display());
        return Ok(cached);
    }

    fs::create_dir_all(cache_dir).map_err(ModelResolveError::CacheDir)?;
    log::info!("Downloading {name} to {}", cache_dir.display());
    download(url, &cached, progress)?;
    Ok(cached)
}

/// Platform-specific model cache directory.
///
/// - macOS: `~/Library/Application Support/Engagecam/models/`
/// - Linux: `$XDG_CACHE_HOME/Engagecam/models/` or `~/.cache/Engagecam/models/`
/// - Windows: `%LOCALAPPDATA%/Engagecam/models/`
pub fn model_cache_dir() -> Result<PathBuf, ModelResolveError> {
    #[cfg(target_os = "macos")]
    let base = dirs::data_dir();
    #[cfg(not(target_os = "macos"))]
    let base = dirs::cache_dir();

    base.map(|d| d.join(APP_DIR_NAME).join("models"))
        .ok_or(ModelResolveError::NoCacheDir)
}

/// Downloads into `<dest>.part` and renames on success, so an interrupted
/// download never leaves a truncated model at `dest`.
fn download(url: &str, dest: &Path, progress: Option<ProgressFn>) -> Result<(), ModelResolveError> {
    let temp_path = dest.with_extension("part");
    let result = stream_to(url, &temp_path, progress).and_then(|()| {
        fs::rename(&temp_path, dest).map_err(|source| ModelResolveError::Write {
            path: dest.to_path_buf(),
            source,
        })
    });
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn stream_to(
    url: &str,
    temp_path: &Path,
    progress: Option<ProgressFn>,
) -> Result<(), ModelResolveError> {
    let write_error = |source| ModelResolveError::Write {
        path: temp_path.to_path_buf(),
        source,
    };

    let mut response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|source| ModelResolveError::Download {
            url: url.to_string(),
            source,
        })?;

    let total = response.content_length().unwrap_or(0);
    let mut file = fs::File::create(temp_path).map_err(write_error)?;
    let mut buf = vec![0u8; 1024 * 1024];
    let mut downloaded: u64 = 0;
    loop {
        let n = response.read(&mut buf).map_err(write_error)?;
        if n == 0 {
            break;
        }
        file.write_all(&buf[..n]).map_err(write_error)?;
        downloaded += n as u64;
        if let Some(ref cb) = progress {
            cb(downloaded, total);
        }
    }
    file.flush().map_err(write_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_path_is_returned() {
        let tmp = TempDir::new().unwrap();
        let model = tmp.path().join("custom.onnx");
        fs::write(&model, b"model").unwrap();

        let resolved = resolve("ignored.onnx", "http://unused.invalid", Some(&model), None);
        assert_eq!(resolved.unwrap(), model);
    }

    #[test]
    fn test_missing_explicit_path_errors() {
        let tmp = TempDir::new().unwrap();
        let model = tmp.path().join("absent.onnx");

        let err = resolve("ignored.onnx", "http://unused.invalid", Some(&model), None).unwrap_err();
        assert!(matches!(err, ModelResolveError::NotFound(p) if p == model));
    }

    #[test]
    fn test_explicit_directory_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let err = resolve("x.onnx", "http://unused.invalid", Some(tmp.path()), None).unwrap_err();
        assert!(matches!(err, ModelResolveError::NotFound(_)));
    }

    #[test]
    fn test_cached_model_skips_download() {
        let tmp = TempDir::new().unwrap();
        let cached = tmp.path().join("face.onnx");
        fs::write(&cached, b"cached").unwrap();

        let resolved = resolve_in(tmp.path(), "face.onnx", "http://unused.invalid", None);
        assert_eq!(resolved.unwrap(), cached);
    }

    #[test]
    fn test_failed_download_leaves_no_files() {
        let tmp = TempDir::new().unwrap();
        let cache = tmp.path().join("models");

        let result = resolve_in(
            &cache,
            "face.onnx",
            "http://invalid.nonexistent.example.com/face.onnx",
            None,
        );
        assert!(matches!(result, Err(ModelResolveError::Download { .. })));
        assert!(cache.exists());
        assert!(!cache.join("face.onnx").exists());
        assert!(!cache.join("face.part").exists());
    }

    #[test]
    fn test_model_cache_dir_uses_app_name() {
        let path = model_cache_dir().unwrap();
        assert!(path.to_string_lossy().contains(APP_DIR_NAME));
        assert!(path.ends_with("models"));
    }
}
