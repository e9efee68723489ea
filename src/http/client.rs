//! Hyper HTTP client used by the producers to call upstream feeds.
//!
//! One pooled client is shared by all producers; every call carries its own
//! deadline.

use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Empty, Full};
use hyper::{Method, Request};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tokio::time::timeout;

use crate::upstream::ProducerError;

pub const MAX_IDLE_CONN_DURATION: Duration = Duration::from_secs(30);
pub const CONNS_PER_HOST: usize = 4;
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

pub type HyperClient = Client<HttpsConnector<HttpConnector>, BoxBody<Bytes, hyper::Error>>;

/// Creates a pooled HTTPS-or-HTTP client. Falls back to the bundled webpki
/// roots when the platform store has no usable certificates.
pub fn create_client() -> HyperClient {
    let mut http_connector = HttpConnector::new();
    http_connector.set_nodelay(true);
    http_connector.set_keepalive(Some(Duration::from_secs(30)));
    http_connector.set_connect_timeout(Some(CONNECT_TIMEOUT));
    http_connector.enforce_http(false);

    let tls = match hyper_rustls::HttpsConnectorBuilder::new().with_native_roots() {
        Ok(builder) => builder,
        Err(e) => {
            tracing::warn!(
                component = "http-client",
                event = "native_roots_unavailable",
                error = %e,
                "falling back to bundled root certificates"
            );
            hyper_rustls::HttpsConnectorBuilder::new().with_webpki_roots()
        }
    }
    .https_or_http()
    .enable_http1()
    .wrap_connector(http_connector);

    Client::builder(TokioExecutor::new())
        .pool_idle_timeout(MAX_IDLE_CONN_DURATION)
        .pool_max_idle_per_host(CONNS_PER_HOST)
        .build(tls)
}

/// JSON-over-HTTP helper with a per-request deadline.
#[derive(Clone)]
pub struct JsonClient {
    client: HyperClient,
    timeout: Duration,
}

impl JsonClient {
    pub fn new(client: HyperClient, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Returns a copy using a different deadline over the same pool.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            client: self.client.clone(),
            timeout,
        }
    }

    /// GETs `url` and decodes the JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> Result<T, ProducerError> {
        let body: BoxBody<Bytes, hyper::Error> = Empty::<Bytes>::new()
            .map_err(|never: std::convert::Infallible| match never {})
            .boxed();
        let bytes = self.send(Method::GET, url, headers, body).await?;
        decode(url, &bytes)
    }

    /// POSTs `payload` as JSON and decodes the JSON response.
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        payload: &B,
    ) -> Result<T, ProducerError> {
        let encoded = serde_json::to_vec(payload).map_err(|e| ProducerError::Decode {
            url: url.to_string(),
            reason: format!("encode request: {e}"),
        })?;
        let body: BoxBody<Bytes, hyper::Error> = Full::new(Bytes::from(encoded))
            .map_err(|never: std::convert::Infallible| match never {})
            .boxed();

        let mut all = Vec::with_capacity(headers.len() + 1);
        all.push(("content-type", "application/json"));
        all.extend_from_slice(headers);

        let bytes = self.send(Method::POST, url, &all, body).await?;
        decode(url, &bytes)
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        headers: &[(&str, &str)],
        body: BoxBody<Bytes, hyper::Error>,
    ) -> Result<Bytes, ProducerError> {
        let http_err = |reason: String| ProducerError::Http {
            url: url.to_string(),
            reason,
        };

        let mut builder = Request::builder().method(method).uri(url);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let req = builder.body(body).map_err(|e| http_err(e.to_string()))?;

        let exchange = async {
            let response = self
                .client
                .request(req)
                .await
                .map_err(|e| http_err(e.to_string()))?;

            let status = response.status();
            let bytes = response
                .into_body()
                .collect()
                .await
                .map_err(|e| http_err(e.to_string()))?
                .to_bytes();

            if !status.is_success() {
                return Err(ProducerError::Status {
                    url: url.to_string(),
                    status: status.as_u16(),
                });
            }
            Ok(bytes)
        };

        match timeout(self.timeout, exchange).await {
            Ok(result) => result,
            Err(_) => Err(ProducerError::Timeout {
                url: url.to_string(),
                timeout: self.timeout,
            }),
        }
    }
}

fn decode<T: DeserializeOwned>(url: &str, bytes: &[u8]) -> Result<T, ProducerError> {
    serde_json::from_slice(bytes).map_err(|e| ProducerError::Decode {
        url: url.to_string(),
        reason: e.to_string(),
    })
}
