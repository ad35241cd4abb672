use crate::error::{StageError, StageErrorKind, StageResult};
use crate::logger::{LogLevel, LOGGER};
use crate::pipeline::{PipelineStage, Report, RunContext};
use std::error::Error as StdError;
use std::io::Read;
use std::time::Duration;
use url::Url;

/// Number of characters of the body quoted in the report
const PREVIEW_CHARS: usize = 120;

/// Body of a single GET request, decoded as UTF-8
#[derive(Debug, Clone)]
pub struct FetchedText {
    pub status: u16,
    pub body: String,
}

impl FetchedText {
    /// Length of the body in characters
    pub fn char_len(&self) -> usize {
        self.body.chars().count()
    }

    /// First `limit` characters of the body
    pub fn preview(&self, limit: usize) -> &str {
        match self.body.char_indices().nth(limit) {
            Some((idx, _)) => &self.body[..idx],
            None => &self.body,
        }
    }
}

/// Stage that downloads the configured URL
///
/// # Context Requirements
/// - `url` - Absolute http(s) URL
/// - `network_timeout` - Applied to connect and to each body read
///
/// # Report Output
/// - `HTTP status: S`
/// - `Downloaded chars: N`
/// - `First 120 chars: ...`
pub struct NetworkStage;

impl NetworkStage {
    /// Create a new network stage
    pub fn new() -> Self {
        Self
    }
}

impl Default for NetworkStage {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStage for NetworkStage {
    fn execute(&self, context: &RunContext, _report: &Report) -> StageResult<String> {
        let fetched = fetch_text(context.url(), context.network_timeout())?;

        Ok(format!(
            "HTTP status: {}\nDownloaded chars: {}\nFirst {} chars: {}",
            fetched.status,
            fetched.char_len(),
            PREVIEW_CHARS,
            fetched.preview(PREVIEW_CHARS)
        ))
    }

    fn name(&self) -> &str {
        "NETWORK"
    }

    fn error_kind(&self) -> StageErrorKind {
        StageErrorKind::Network
    }

    fn failure_level(&self) -> LogLevel {
        LogLevel::Warn
    }
}

/// Issue a single GET and read the body whatever the status code
///
/// `timeout` bounds the connect, the wait for response headers and every
/// individual body read, so a slow body that keeps arriving is not cut off.
/// The client and response are dropped before returning, which releases the
/// connection on every path.
pub fn fetch_text(url: &str, timeout: Duration) -> StageResult<FetchedText> {
    let fetch_error = |e: Box<dyn StdError + Send + Sync>| StageError::Network {
        message: format!("Network fetch failed for: {}", url),
        source: Some(e),
    };

    let parsed = Url::parse(url)
        .map_err(|e| StageError::network(format!("Invalid URL '{}': {}", url, e)))?;

    let client = reqwest::blocking::Client::builder()
        .connect_timeout(timeout)
        .timeout(timeout)
        .build()
        .map_err(|e| fetch_error(e.into()))?;

    let mut response = client
        .get(parsed)
        .send()
        .map_err(|e| fetch_error(e.into()))?;
    let status = response.status().as_u16();

    LOGGER.log(
        LogLevel::Info,
        &format!("HTTP status: {}", status),
        "pipeline::network",
    );

    // Each read call is bounded by the timeout, not the body as a whole
    let mut bytes = Vec::new();
    response
        .read_to_end(&mut bytes)
        .map_err(|e| fetch_error(e.into()))?;

    Ok(FetchedText {
        status,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;
    use std::time::Instant;

    /// Serve exactly one canned HTTP response on a local port
    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf);
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });

        format!("http://{}/", addr)
    }

    /// A local port with nothing listening on it
    fn closed_port_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}/", addr)
    }

    #[test]
    fn test_fetch_success_body() {
        let url = serve_once("200 OK", "hello pipeline");
        let fetched = fetch_text(&url, Duration::from_secs(5)).unwrap();

        assert_eq!(fetched.status, 200);
        assert_eq!(fetched.body, "hello pipeline");
        assert_eq!(fetched.char_len(), 14);
    }

    #[test]
    fn test_fetch_reads_error_body() {
        let url = serve_once("404 Not Found", "no such page");
        let fetched = fetch_text(&url, Duration::from_secs(5)).unwrap();

        assert_eq!(fetched.status, 404);
        assert_eq!(fetched.body, "no such page");
    }

    #[test]
    fn test_unreachable_host_is_network_error() {
        let url = closed_port_url();
        let err = fetch_text(&url, Duration::from_secs(5)).unwrap_err();

        assert_eq!(err.kind(), StageErrorKind::Network);
        assert_eq!(err.to_string(), format!("Network fetch failed for: {}", url));
        assert!(std::error::Error::source(&err).is_some());
    }

    /// Send headers, then the body one byte at a time with a pause between
    fn serve_trickle(body: &'static str, gap: Duration) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf);
                let head = format!(
                    "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                let _ = stream.write_all(head.as_bytes());
                let _ = stream.flush();
                for byte in body.as_bytes() {
                    thread::sleep(gap);
                    let _ = stream.write_all(&[*byte]);
                    let _ = stream.flush();
                }
            }
        });

        format!("http://{}/", addr)
    }

    /// Accept the connection and never answer
    fn serve_silent(hold: Duration) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        thread::spawn(move || {
            if let Ok((stream, _)) = listener.accept() {
                thread::sleep(hold);
                drop(stream);
            }
        });

        format!("http://{}/", addr)
    }

    #[test]
    fn test_slow_body_within_read_timeout_succeeds() {
        let url = serve_trickle("12345678", Duration::from_millis(200));
        let fetched = fetch_text(&url, Duration::from_millis(500)).unwrap();

        assert_eq!(fetched.status, 200);
        assert_eq!(fetched.body, "12345678");
    }

    #[test]
    fn test_silent_server_times_out_as_network_error() {
        let url = serve_silent(Duration::from_secs(5));
        let started = Instant::now();

        let err = fetch_text(&url, Duration::from_millis(500)).unwrap_err();

        assert!(started.elapsed() < Duration::from_secs(4));
        assert_eq!(err.kind(), StageErrorKind::Network);
        assert_eq!(err.to_string(), format!("Network fetch failed for: {}", url));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_invalid_url_is_network_error() {
        let err = fetch_text("not a url", Duration::from_secs(1)).unwrap_err();
        assert_eq!(err.kind(), StageErrorKind::Network);
        assert!(err.to_string().contains("not a url"));
    }

    #[test]
    fn test_preview_counts_characters() {
        let fetched = FetchedText {
            status: 200,
            body: "é".repeat(130),
        };
        assert_eq!(fetched.char_len(), 130);
        assert_eq!(fetched.preview(PREVIEW_CHARS).chars().count(), 120);

        let short = FetchedText {
            status: 200,
            body: "short".to_string(),
        };
        assert_eq!(short.preview(PREVIEW_CHARS), "short");
    }

    #[test]
    fn test_network_stage_summary() {
        let url = serve_once("200 OK", "body");
        let context = RunContext::new("input.txt", url, "out/report.zip", "")
            .with_network_timeout(Duration::from_secs(5));

        let summary = NetworkStage::new()
            .execute(&context, &Report::new("run"))
            .unwrap();

        assert_eq!(
            summary,
            "HTTP status: 200\nDownloaded chars: 4\nFirst 120 chars: body"
        );
    }

    #[test]
    fn test_network_failure_logged_as_warning() {
        assert_eq!(NetworkStage::new().failure_level(), LogLevel::Warn);
    }
}
