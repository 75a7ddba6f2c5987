//! Steam community CDN client.
//!
//! Client icons live at `{base}/{app_id}/{hash}.ico`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::io::AsyncWriteExt;

use crate::IconError;

/// Base URL of the Steam community app images.
pub const DEFAULT_CDN_BASE_URL: &str =
    "https://cdn.cloudflare.steamstatic.com/steamcommunity/public/images/apps";

/// Downloads client icon archives.
#[derive(Debug, Clone)]
pub struct IconClient {
    http: reqwest::Client,
    base_url: String,
}

impl IconClient {
    /// Creates a new client; `timeout` bounds each request.
    pub fn new(timeout: Option<Duration>) -> Result<Self, IconError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: DEFAULT_CDN_BASE_URL.to_string(),
        })
    }

    /// Sets a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Returns the icon URL for an app id and icon hash.
    pub fn icon_url(&self, app_id: &str, hash: &str) -> String {
        format!("{}/{app_id}/{hash}.ico", self.base_url)
    }

    /// Downloads the icon archive into `dest_dir/<hash>.ico`.
    ///
    /// The file is created with create-new semantics: an existing file is an
    /// error, never overwritten.
    pub async fn download(
        &self,
        app_id: &str,
        hash: &str,
        dest_dir: &Path,
    ) -> Result<PathBuf, IconError> {
        let url = self.icon_url(app_id, hash);
        let mut resp = self.http.get(&url).send().await?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(IconError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let path = dest_dir.join(format!("{hash}.ico"));
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;

        let mut written = 0usize;
        while let Some(chunk) = resp.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len();
        }
        file.flush().await?;

        tracing::debug!(app_id, %url, bytes = written, "icon archive saved");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Starts a mock HTTP server that answers one request with `status` and `body`.
    async fn mock_server(status: u16, body: &'static [u8]) -> (String, tokio::task::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let url = format!("http://127.0.0.1:{port}");

        let handle = tokio::spawn(async move {
            if let Ok((mut stream, _)) = listener.accept().await {
                let mut buf = vec![0u8; 8192];
                let _ = stream.read(&mut buf).await;

                let head = format!(
                    "HTTP/1.1 {status} Mock\r\nContent-Type: image/x-icon\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                let _ = stream.write_all(head.as_bytes()).await;
                let _ = stream.write_all(body).await;
                let _ = stream.shutdown().await;
            }
        });

        (url, handle)
    }

    #[test]
    fn icon_url_format() {
        let client = IconClient::new(None)
            .unwrap()
            .with_base_url("https://cdn.example.com/apps/");
        assert_eq!(
            client.icon_url("620", "abc123"),
            "https://cdn.example.com/apps/620/abc123.ico"
        );
    }

    #[test]
    fn default_base_url() {
        let client = IconClient::new(None).unwrap();
        assert!(
            client
                .icon_url("70", "ff")
                .starts_with("https://cdn.cloudflare.steamstatic.com/")
        );
    }

    #[tokio::test]
    async fn download_writes_archive() {
        let (url, handle) = mock_server(200, b"\x00\x00\x01\x00ICODATA").await;
        let dir = tempfile::tempdir().unwrap();

        let client = IconClient::new(None).unwrap().with_base_url(url);
        let path = client.download("620", "abc123", dir.path()).await.unwrap();

        assert_eq!(path, dir.path().join("abc123.ico"));
        assert_eq!(std::fs::read(&path).unwrap(), b"\x00\x00\x01\x00ICODATA");

        handle.abort();
    }

    #[tokio::test]
    async fn download_error_status() {
        let (url, handle) = mock_server(404, b"<Error>NoSuchKey</Error>").await;
        let dir = tempfile::tempdir().unwrap();

        let client = IconClient::new(None).unwrap().with_base_url(url);
        let err = client
            .download("620", "abc123", dir.path())
            .await
            .unwrap_err();

        match err {
            IconError::Api { status, body } => {
                assert_eq!(status, 404);
                assert!(body.contains("NoSuchKey"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
        assert!(!dir.path().join("abc123.ico").exists());

        handle.abort();
    }

    #[tokio::test]
    async fn download_refuses_to_overwrite() {
        let (url, handle) = mock_server(200, b"NEW").await;
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("abc123.ico"), b"OLD").unwrap();

        let client = IconClient::new(None).unwrap().with_base_url(url);
        let err = client
            .download("620", "abc123", dir.path())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            IconError::Io(ref e) if e.kind() == std::io::ErrorKind::AlreadyExists
        ));
        assert_eq!(std::fs::read(dir.path().join("abc123.ico")).unwrap(), b"OLD");

        handle.abort();
    }

    #[tokio::test]
    async fn download_unreachable_server() {
        // Bind and drop to get a port nothing listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let dir = tempfile::tempdir().unwrap();
        let client = IconClient::new(Some(Duration::from_secs(5)))
            .unwrap()
            .with_base_url(format!("http://127.0.0.1:{port}"));

        let err = client
            .download("620", "abc123", dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, IconError::Http(_)));
    }
}
