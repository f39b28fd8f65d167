pub mod downloader;
pub mod search;

pub use downloader::Downloader;
pub use search::SearchPage;

use reqwest::{
    Client,
    header::{ACCEPT, CACHE_CONTROL, HeaderMap, HeaderValue, USER_AGENT},
};
use std::time::Duration;

pub type Result<T> = std::result::Result<T, DownloadError>;

#[derive(thiserror::Error, Debug)]
pub enum DownloadError {
    #[error("HTTP request {url} failed. Error: {error}")]
    RequestError { error: reqwest::Error, url: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Page structure mismatch: {0}")]
    PageStructureMismatch(String),

    #[error("Invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Download incomplete: {downloaded}/{total} bytes")]
    IncompleteDownload { downloaded: u64, total: u64 },

    #[error("Failed to create file: {path}. Error: {error}")]
    FileCreateError { error: std::io::Error, path: String },
}

/// Browser-like headers; the search site rejects bare clients.
pub fn headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static("Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/112.0.0.0 Safari/537.36"));
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers
}

pub fn client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .default_headers(headers())
        .timeout(timeout)
        .build()
        .map_err(|e| DownloadError::RequestError {
            error: e,
            url: String::default(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers() {
        let headers = headers();
        assert!(headers.contains_key("user-agent"));
        assert!(headers.contains_key("accept"));
        assert!(headers.contains_key("cache-control"));

        let user_agent = headers.get("user-agent").unwrap();
        assert!(user_agent.to_str().unwrap().contains("Mozilla"));
    }

    #[test]
    fn test_client() {
        assert!(client(Duration::from_secs(5)).is_ok());
    }
}
