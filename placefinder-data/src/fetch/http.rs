//! HTTP-based `LocationSource` for the campus overlay-items endpoint.
//!
//! The [`LocationSource`] trait is synchronous so seeding can run from plain
//! command-line code. This source bridges the async HTTP client to that
//! interface by blocking on a Tokio runtime internally.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use placefinder_core::Category;
//! use placefinder_data::{HttpLocationSource, HttpLocationSourceConfig, LocationSource};
//!
//! let config = HttpLocationSourceConfig::default()
//!     .with_timeout(Duration::from_secs(10))
//!     .with_user_agent("my-app/1.0");
//! let source = HttpLocationSource::with_config(config)?;
//!
//! let racks = source.fetch_layer(Category::Bikes)?;
//! println!("{} bike racks", racks.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::time::Duration;

use log::debug;
use placefinder_core::Category;
use reqwest::Client;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use url::Url;

use super::{LayerResponse, LocationSource, RawLocation, SourceBuildError, TransportError};

/// Default provider endpoint.
pub const DEFAULT_BASE_URL: &str = "https://www.cornell.edu/about/maps/overlay-items.cfm";

/// Default user agent for provider requests.
pub const DEFAULT_USER_AGENT: &str = "placefinder-data/0.1";

/// Default per-attempt timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Configuration for [`HttpLocationSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpLocationSourceConfig {
    /// Endpoint receiving the `layer` and `clearCache` query parameters.
    pub base_url: String,
    /// Per-attempt timeout covering connection and body transfer.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for HttpLocationSourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpLocationSourceConfig {
    /// Create a configuration targeting `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the per-attempt timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Request URL for `category`'s layer.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidUrl`] when `base_url` does not parse.
    pub fn layer_url(&self, category: Category) -> Result<Url, TransportError> {
        Url::parse_with_params(
            &self.base_url,
            &[("layer", category.as_str()), ("clearCache", "1")],
        )
        .map_err(|err| TransportError::InvalidUrl {
            base_url: self.base_url.clone(),
            message: err.to_string(),
        })
    }
}

/// HTTP location source.
///
/// The source owns a current-thread Tokio runtime reused across calls.
///
/// # Runtime behaviour
///
/// Outside any Tokio runtime the stored runtime drives the request. Inside a
/// multi-threaded runtime (detected via [`Handle::try_current()`] and
/// [`RuntimeFlavor::MultiThread`]) the caller's handle is used through
/// [`tokio::task::block_in_place`]. Inside a `current_thread` runtime the
/// stored runtime is used, which blocks the caller's executor for the length
/// of the request.
pub struct HttpLocationSource {
    client: Client,
    config: HttpLocationSourceConfig,
    runtime: Runtime,
}

impl std::fmt::Debug for HttpLocationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpLocationSource")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl HttpLocationSource {
    /// Create a source for the default provider endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new() -> Result<Self, SourceBuildError> {
        Self::with_config(HttpLocationSourceConfig::default())
    }

    /// Create a source with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn with_config(config: HttpLocationSourceConfig) -> Result<Self, SourceBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(SourceBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(SourceBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            runtime,
        })
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &HttpLocationSourceConfig {
        &self.config
    }

    async fn fetch_layer_async(&self, url: Url) -> Result<Vec<RawLocation>, TransportError> {
        let url_text = url.to_string();
        debug!("requesting {url_text}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url_text))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, &url_text))?;

        let body = response
            .text()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url_text))?;

        let layer: LayerResponse =
            serde_json::from_str(&body).map_err(|err| TransportError::Decode {
                url: url_text,
                message: err.to_string(),
            })?;
        Ok(layer.into_items())
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> TransportError {
        if error.is_timeout() {
            return TransportError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return TransportError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        TransportError::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

impl LocationSource for HttpLocationSource {
    fn fetch_layer(&self, category: Category) -> Result<Vec<RawLocation>, TransportError> {
        let url = self.config.layer_url(category)?;
        let future = self.fetch_layer_async(url);
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    /// Serve one canned HTTP response on a loopback port.
    fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback listener");
        let address = listener.local_addr().expect("listener address");
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept connection");
            let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
            let mut request_line = String::new();
            reader
                .read_line(&mut request_line)
                .expect("read request line");
            let mut header = String::new();
            while reader.read_line(&mut header).expect("read header") > 2 {
                header.clear();
            }
            let response = format!(
                "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream
                .write_all(response.as_bytes())
                .expect("write response");
            request_line
        });
        (format!("http://{address}/overlay-items.cfm"), handle)
    }

    #[rstest]
    fn layer_url_carries_layer_and_cache_buster() {
        let url = HttpLocationSourceConfig::default()
            .layer_url(Category::Tcat)
            .expect("default URL parses");
        assert_eq!(
            url.as_str(),
            "https://www.cornell.edu/about/maps/overlay-items.cfm?layer=TCAT&clearCache=1"
        );
    }

    #[rstest]
    fn invalid_base_url_is_reported() {
        let source = HttpLocationSource::with_config(HttpLocationSourceConfig::new("not a url"))
            .expect("source should build");
        let err = source
            .fetch_layer(Category::Blue)
            .expect_err("fetch should fail");
        assert!(matches!(err, TransportError::InvalidUrl { .. }));
    }

    #[rstest]
    fn configured_timeout_bounds_each_attempt() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback listener");
        let address = listener.local_addr().expect("listener address");
        // Hold the connection open without answering until the client gives up.
        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept connection");
            let mut discarded = Vec::new();
            stream.read_to_end(&mut discarded).unwrap_or_default();
        });
        let config = HttpLocationSourceConfig::new(format!("http://{address}/overlay-items.cfm"))
            .with_timeout(Duration::from_millis(200));
        let source = HttpLocationSource::with_config(config).expect("source should build");

        let err = source
            .fetch_layer(Category::Charging)
            .expect_err("fetch should time out");
        drop(source);
        server.join().expect("server thread");

        assert!(
            matches!(err, TransportError::Timeout { timeout_secs: 0, .. }),
            "unexpected error {err:?}"
        );
    }

    #[rstest]
    fn fetches_and_decodes_items() {
        let (base_url, server) = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"items": [{"Lat": 42.444, "Lng": -76.5019, "Name": "Rack"}]}"#,
        );
        let source = HttpLocationSource::with_config(HttpLocationSourceConfig::new(base_url))
            .expect("source should build");

        let items = source.fetch_layer(Category::Bikes).expect("fetch layer");
        let request_line = server.join().expect("server thread");

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name(), "Rack");
        assert!(
            request_line.contains("layer=Bikes&clearCache=1"),
            "unexpected request line {request_line:?}"
        );
    }

    #[rstest]
    fn non_success_status_is_an_http_error() {
        let (base_url, server) = serve_once("HTTP/1.1 503 Service Unavailable", "{}");
        let source = HttpLocationSource::with_config(HttpLocationSourceConfig::new(base_url))
            .expect("source should build");

        let err = source
            .fetch_layer(Category::Water)
            .expect_err("fetch should fail");
        server.join().expect("server thread");

        assert!(matches!(err, TransportError::Http { status: 503, .. }));
    }

    #[rstest]
    fn undecodable_body_is_a_decode_error() {
        let (base_url, server) = serve_once("HTTP/1.1 200 OK", "<html>maintenance</html>");
        let source = HttpLocationSource::with_config(HttpLocationSourceConfig::new(base_url))
            .expect("source should build");

        let err = source
            .fetch_layer(Category::Water)
            .expect_err("fetch should fail");
        server.join().expect("server thread");

        assert!(matches!(err, TransportError::Decode { .. }));
    }
}
