use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{info, warn};

use super::loader::load_file;
use super::model::Dataset;
use crate::error::{DataLoadError, Result};

/// Google Drive export of the station's hourly observations.
pub const DEFAULT_SOURCE_URL: &str =
    "https://drive.google.com/uc?export=download&id=1GU4-tpp_mqsFNoh3HvBvI2M72lqCSLPF";

/// Where the observation table comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Remote file, downloaded once at startup into a local cache.
    Url(String),
    /// Local file, loaded as-is.
    Path(PathBuf),
}

impl DataSource {
    /// Anything with an http(s) scheme is remote, everything else a path.
    pub fn parse(s: &str) -> Self {
        let lower = s.trim().to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DataSource::Url(s.trim().to_string())
        } else {
            DataSource::Path(PathBuf::from(s))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Url(url) => write!(f, "{url}"),
            DataSource::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Obtain the dataset.
///
/// Remote sources are downloaded next to `cache` and must parse before they
/// replace it. When the download fails or yields something unreadable and a
/// previous copy exists in `cache`, that copy is used instead; otherwise the
/// load fails. Nothing is retried.
pub fn load_source(source: &DataSource, cache: &Path) -> Result<Dataset> {
    match source {
        DataSource::Path(path) => load_file(path),
        DataSource::Url(url) => match download(url, cache) {
            Ok(dataset) => Ok(dataset),
            Err(e) if cache.exists() => {
                warn!("{e}; falling back to cached copy {}", cache.display());
                load_file(cache)
            }
            Err(e) => Err(e),
        },
    }
}

fn download(url: &str, cache: &Path) -> Result<Dataset> {
    let fetch_err = |message: String| DataLoadError::Fetch {
        url: url.to_string(),
        message,
    };

    info!("Downloading {url}...");
    let response = reqwest::blocking::get(url).map_err(|e| fetch_err(e.to_string()))?;
    if !response.status().is_success() {
        return Err(fetch_err(format!("HTTP {}", response.status())));
    }
    let content = response.bytes().map_err(|e| fetch_err(e.to_string()))?;

    // Same directory so `persist` is a rename; same extension for `load_file`.
    let dir = match cache.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let suffix = cache
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    let mut staged = tempfile::Builder::new()
        .prefix(".download-")
        .suffix(&suffix)
        .tempfile_in(dir)?;
    staged.write_all(&content)?;
    staged.flush()?;

    let dataset = load_file(staged.path())
        .map_err(|e| fetch_err(format!("downloaded content is unusable: {e}")))?;
    staged.persist(cache).map_err(|e| e.error)?;
    info!(
        "Downloaded {} bytes from {url} to {}",
        content.len(),
        cache.display()
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Read;
    use std::net::TcpListener;
    use std::thread;

    /// Answer a single HTTP request with `body`; returns the URL to fetch.
    fn serve_once(content_type: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
        });
        format!("http://{addr}/data.csv")
    }

    const CACHED: &str = "datetime,TEMP,PRES\n2015-05-05 05:00:00,18.0,1008.0\n";

    #[test]
    fn parses_urls_and_paths() {
        assert_eq!(
            DataSource::parse("https://example.org/data.csv"),
            DataSource::Url("https://example.org/data.csv".to_string())
        );
        assert_eq!(
            DataSource::parse("data/PRSA.csv"),
            DataSource::Path(PathBuf::from("data/PRSA.csv"))
        );
    }

    #[test]
    fn unreachable_url_falls_back_to_cache() {
        let mut cache = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        cache.write_all(CACHED.as_bytes()).unwrap();
        cache.flush().unwrap();

        let source = DataSource::Url("http://127.0.0.1:9/data.csv".to_string());
        let ds = load_source(&source, cache.path()).unwrap();
        assert_eq!(ds.year_bounds, (2015, 2015));
    }

    #[test]
    fn unreachable_url_without_cache_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("missing.csv");
        let source = DataSource::Url("http://127.0.0.1:9/data.csv".to_string());
        assert!(matches!(
            load_source(&source, &cache),
            Err(DataLoadError::Fetch { .. })
        ));
    }

    #[test]
    fn html_download_keeps_cached_copy() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("data.csv");
        std::fs::write(&cache, CACHED).unwrap();

        let url = serve_once(
            "text/html",
            "<html><body>Google Drive - Virus scan warning</body></html>",
        );
        let ds = load_source(&DataSource::Url(url), &cache).unwrap();

        assert_eq!(ds.year_bounds, (2015, 2015));
        assert_eq!(std::fs::read_to_string(&cache).unwrap(), CACHED);
        // no staging files left behind
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn html_download_without_cache_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("data.csv");

        let url = serve_once("text/html", "<html><body>quota exceeded</body></html>");
        assert!(matches!(
            load_source(&DataSource::Url(url), &cache),
            Err(DataLoadError::Fetch { .. })
        ));
        assert!(!cache.exists());
    }

    #[test]
    fn valid_download_replaces_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("data.csv");
        std::fs::write(&cache, CACHED).unwrap();

        let fresh = "datetime,TEMP,PRES\n2017-01-01 00:00:00,-2.0,1030.0\n";
        let url = serve_once("text/csv", fresh);
        let ds = load_source(&DataSource::Url(url), &cache).unwrap();

        assert_eq!(ds.year_bounds, (2017, 2017));
        assert_eq!(std::fs::read_to_string(&cache).unwrap(), fresh);
    }
}
