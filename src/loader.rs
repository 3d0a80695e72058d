//! Locating, fetching and decoding the bundle.

use crate::bundle::Bundle;
use crate::config::{ChatConfig, DEFAULT_DATA_FILE};
use crate::error::{ChatError, Result};
use crate::utils::{ensure_dir, is_remote};
use std::fs;
use std::path::{Path, PathBuf};

/// Where a session's bundle lives and where to get it if it is missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSource {
    pub path: PathBuf,
    pub remote: Option<String>,
}

impl DataSource {
    /// Interpret the form's "URL or local path" field.
    ///
    /// A URL is cached under `config.cache_dir` using its last path segment
    /// as the file name. A path is paired with the configured download URL.
    pub fn parse(input: &str, config: &ChatConfig) -> Self {
        let input = input.trim();

        if input.is_empty() {
            return DataSource {
                path: config.data_path.clone(),
                remote: config.source_url.clone(),
            };
        }

        if is_remote(input) {
            return DataSource {
                path: config.cache_dir.join(file_name_from_url(input)),
                remote: Some(input.to_string()),
            };
        }

        DataSource {
            path: PathBuf::from(input),
            remote: config.source_url.clone(),
        }
    }

    pub fn load(&self) -> Result<Bundle> {
        load_data(&self.path, self.remote.as_deref())
    }
}

fn file_name_from_url(url: &str) -> String {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    let after_scheme = without_query
        .split_once("://")
        .map_or(without_query, |(_, rest)| rest);

    match after_scheme.split_once('/') {
        Some((_, path)) => match path.rsplit('/').next() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => DEFAULT_DATA_FILE.to_string(),
        },
        None => DEFAULT_DATA_FILE.to_string(),
    }
}

/// Load the bundle at `path`, downloading it from `remote` first when the
/// file does not exist yet.
pub fn load_data(path: &Path, remote: Option<&str>) -> Result<Bundle> {
    if !path.exists() {
        let Some(url) = remote else {
            return Err(ChatError::config(format!(
                "{} does not exist and no download URL is configured",
                path.display()
            )));
        };
        download_file(url, path)?;
    }

    let bundle = Bundle::read_from(path)?;
    tracing::info!(
        "Loaded {} entries ({}d index, {} vocabulary tokens) from {}",
        bundle.len(),
        bundle.index.dimension(),
        bundle.encoder.vocab_size(),
        path.display()
    );
    Ok(bundle)
}

/// Blocking client without reqwest's default 30 second total timeout; a
/// bundle download runs for as long as the transfer takes.
fn http_client() -> Result<reqwest::blocking::Client> {
    Ok(reqwest::blocking::Client::builder().timeout(None).build()?)
}

/// Fetch `url` into `save_path` with a single GET.
///
/// The body lands in a `.part` sibling first and is renamed into place, so a
/// failed or empty download never leaves a file at `save_path`.
pub fn download_file(url: &str, save_path: &Path) -> Result<u64> {
    tracing::info!("Downloading bundle from {}...", url);

    let response = http_client()?.get(url).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(ChatError::download(format!("{} returned {}", url, status)));
    }

    let bytes = response.bytes()?;
    if bytes.is_empty() {
        return Err(ChatError::download(format!("{} returned an empty payload", url)));
    }

    if let Some(parent) = save_path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_dir(parent)?;
        }
    }

    let mut partial = save_path.as_os_str().to_owned();
    partial.push(".part");
    let partial = PathBuf::from(partial);

    if let Err(e) = fs::write(&partial, &bytes).and_then(|_| fs::rename(&partial, save_path)) {
        let _ = fs::remove_file(&partial);
        return Err(e.into());
    }

    let size_mb = bytes.len() as f64 / (1024.0 * 1024.0);
    tracing::info!("Saved {} ({size_mb:.1} MB)", save_path.display());
    Ok(bytes.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::tests::sample_bundle;
    use tempfile::tempdir;

    fn config_in(dir: &Path) -> ChatConfig {
        ChatConfig {
            data_path: dir.join("default.bin"),
            source_url: Some("https://example.com/default.bin".to_string()),
            cache_dir: dir.join("cache"),
            ..ChatConfig::default()
        }
    }

    #[test]
    fn test_missing_file_without_remote_is_config_error() {
        let dir = tempdir().unwrap();
        let err = load_data(&dir.path().join("absent.bin"), None).unwrap_err();
        assert!(matches!(err, ChatError::Config(_)));
    }

    #[test]
    fn test_existing_file_loads_without_remote() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bundle.bin");
        fs::write(&path, sample_bundle().to_bytes().unwrap()).unwrap();

        let bundle = load_data(&path, None).unwrap();
        assert_eq!(bundle.sentences.len(), bundle.summaries.len());
        assert_eq!(bundle.len(), 10);
    }

    #[test]
    fn test_corrupt_file_is_deserialize_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bundle.bin");
        fs::write(&path, b"definitely not a bundle").unwrap();

        let err = load_data(&path, Some("http://127.0.0.1:1/unused")).unwrap_err();
        assert!(matches!(err, ChatError::Deserialize(_)));
    }

    #[test]
    fn test_unreachable_remote_is_download_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bundle.bin");

        let err = load_data(&path, Some("http://127.0.0.1:1/bundle.bin")).unwrap_err();
        assert!(matches!(err, ChatError::Download(_)));
        assert!(!path.exists());
    }

    #[test]
    fn test_parse_empty_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path());
        let source = DataSource::parse("   ", &config);
        assert_eq!(source.path, config.data_path);
        assert_eq!(source.remote, config.source_url);
    }

    #[test]
    fn test_parse_url_caches_by_file_name() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path());
        let source = DataSource::parse("https://host/files/qa.bin?raw=1", &config);
        assert_eq!(source.path, dir.path().join("cache").join("qa.bin"));
        assert_eq!(source.remote.as_deref(), Some("https://host/files/qa.bin?raw=1"));
    }

    #[test]
    fn test_parse_path_keeps_configured_remote() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path());
        let source = DataSource::parse("local/qa.bin", &config);
        assert_eq!(source.path, PathBuf::from("local/qa.bin"));
        assert_eq!(source.remote, config.source_url);
    }

    #[test]
    fn test_file_name_from_url_fallback() {
        assert_eq!(file_name_from_url("https://host"), DEFAULT_DATA_FILE);
        assert_eq!(file_name_from_url("https://host/dir/"), DEFAULT_DATA_FILE);
        assert_eq!(file_name_from_url("http://host/a/b.bin#x"), "b.bin");
    }
}
