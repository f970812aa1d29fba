// src/fetch/download.rs
use reqwest::Client;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, warn};

use crate::error::FetchError;

async fn get_bytes_core(client: &Client, url: &str) -> Result<Vec<u8>, FetchError> {
    debug!("GET {}", url);
    let resp = client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| FetchError::from_reqwest(url, e))?;
    let bytes = resp
        .bytes()
        .await
        .map_err(|e| FetchError::from_reqwest(url, e))?;
    Ok(bytes.to_vec())
}

/// GET `url`, retrying transient failures up to `max_retries` extra times
/// with doubling backoff. Other failures return at once.
pub async fn get_bytes_with_retry(
    client: &Client,
    url: &str,
    max_retries: u32,
    initial_backoff: Duration,
) -> Result<Vec<u8>, FetchError> {
    let mut attempts = 0;
    loop {
        match get_bytes_core(client, url).await {
            Ok(b) => return Ok(b),
            Err(e) if e.is_transient() && attempts < max_retries => {
                attempts += 1;
                let backoff = initial_backoff * 2u32.pow(attempts - 1);
                warn!(%url, attempt = attempts, delay_ms = backoff.as_millis() as u64, error = %e, "retrying");
                sleep(backoff).await;
            }
            Err(e) if e.is_transient() => {
                error!(%url, error = %e, "exhausted retries");
                return Err(e);
            }
            Err(e) => {
                error!(%url, error = %e, "request failed");
                return Err(e);
            }
        }
    }
}

/// Same as [`get_bytes_with_retry`], decoded as UTF-8 (lossy).
pub async fn get_text_with_retry(
    client: &Client,
    url: &str,
    max_retries: u32,
    initial_backoff: Duration,
) -> Result<String, FetchError> {
    let bytes = get_bytes_with_retry(client, url, max_retries, initial_backoff).await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answer every request with `status` and count the requests.
    async fn serve_status(status: &'static str) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/doc.pdf", listener.local_addr().unwrap());
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        tokio::spawn(async move {
            loop {
                let Ok((mut sock, _)) = listener.accept().await else {
                    return;
                };
                counter.fetch_add(1, Ordering::SeqCst);
                let mut buf = [0u8; 1024];
                let _ = sock.read(&mut buf).await;
                let resp = format!(
                    "HTTP/1.1 {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                    status
                );
                let _ = sock.write_all(resp.as_bytes()).await;
                let _ = sock.shutdown().await;
            }
        });
        (url, hits)
    }

    #[tokio::test]
    async fn not_found_is_not_retried() {
        let (url, hits) = serve_status("404 Not Found").await;
        let err = get_bytes_with_retry(&Client::new(), &url, 3, Duration::from_millis(1))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn server_errors_are_retried_until_exhausted() {
        let (url, hits) = serve_status("503 Service Unavailable").await;
        let err = get_bytes_with_retry(&Client::new(), &url, 2, Duration::from_millis(1))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 503, .. }));
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }
}
