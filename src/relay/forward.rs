//! The relay operation: one inbound request in, one response out.

use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::Request;
use axum::response::{IntoResponse, Response};
use reqwest::redirect::Policy;
use reqwest::Client;

use crate::config::{BodyErrorPolicy, RelayConfig};
use crate::http::request::request_id;
use crate::observability::metrics;
use crate::relay::body::{build_form, OutboundBody, Payload, PayloadKind, RequestBodyKind};
use crate::relay::error::RelayError;
use crate::relay::headers::{copy_response_headers, sanitize_request_headers};
use crate::relay::target::target_url;

/// Forwards requests to a single, fixed backend origin.
///
/// Holds no per-request state; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Relay {
    origin: String,
    client: Client,
    body_policy: BodyErrorPolicy,
}

impl Relay {
    /// Create a relay for `origin` (no trailing `/`) using an existing client.
    pub fn new(origin: impl Into<String>, client: Client, body_policy: BodyErrorPolicy) -> Self {
        Self {
            origin: origin.into(),
            client,
            body_policy,
        }
    }

    /// Build the relay and its HTTP client from configuration.
    pub fn from_config(config: &RelayConfig) -> Result<Self, reqwest::Error> {
        // The origin is reached directly; HTTP(S)_PROXY from the environment is ignored.
        let mut builder = Client::builder().no_proxy();
        if let Some(secs) = config.timeouts.connect_secs {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = config.timeouts.request_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if !config.backend.follow_redirects {
            builder = builder.redirect(Policy::none());
        }

        Ok(Self::new(
            config.backend.normalized_origin(),
            builder.build()?,
            config.relay.on_body_error,
        ))
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Relay `request` to `<origin>/<sub_path>[?query]`.
    ///
    /// Never fails: backend errors become a JSON 500, rejected bodies a JSON 400
    /// and oversized bodies a JSON 413.
    pub async fn forward(&self, request: Request<Body>, sub_path: &str) -> Response {
        let start = Instant::now();
        let method = request.method().clone();
        let request_id = request_id(request.headers()).to_string();

        tracing::debug!(
            request_id = %request_id,
            method = %method,
            path = %sub_path,
            "Relaying request"
        );

        let response = match self.try_forward(request, sub_path, &request_id).await {
            Ok(response) => response,
            Err(e) => {
                if matches!(e, RelayError::BodyRejected(_) | RelayError::BodyTooLarge(_)) {
                    tracing::warn!(request_id = %request_id, error = %e, "Rejected request body");
                } else {
                    metrics::record_upstream_error();
                    tracing::error!(request_id = %request_id, error = %e, "Proxy request failed");
                }
                e.into_response()
            }
        };

        metrics::record_request(method.as_str(), response.status().as_u16(), start);
        response
    }

    async fn try_forward(
        &self,
        request: Request<Body>,
        sub_path: &str,
        request_id: &str,
    ) -> Result<Response, RelayError> {
        let url = target_url(&self.origin, sub_path, request.uri().query());
        let method = request.method().clone();
        let kind = RequestBodyKind::detect(&method, request.headers());
        let headers = sanitize_request_headers(request.headers(), kind);

        let body = match OutboundBody::extract(kind, request).await {
            Ok(body) => body,
            Err(e) if e.is_too_large() => {
                metrics::record_body_read_failure("too_large");
                return Err(RelayError::BodyTooLarge(e));
            }
            Err(e) => {
                metrics::record_body_read_failure(self.body_policy.as_str());
                match self.body_policy {
                    BodyErrorPolicy::Reject => return Err(RelayError::BodyRejected(e)),
                    BodyErrorPolicy::Drop => {
                        tracing::warn!(
                            request_id = %request_id,
                            error = %e,
                            "Failed to read request body, forwarding without it"
                        );
                        OutboundBody::Empty
                    }
                }
            }
        };

        let outbound = self.client.request(method, &url).headers(headers);
        let outbound = match body {
            OutboundBody::Empty => outbound,
            OutboundBody::Text(bytes) => outbound.body(bytes),
            OutboundBody::Form(parts) => outbound.multipart(build_form(parts)?),
        };

        let backend = outbound.send().await?;
        let status = backend.status();
        let backend_headers = backend.headers().clone();
        let bytes = backend.bytes().await?;

        let payload = Payload::decode(PayloadKind::detect(&backend_headers), bytes)?;
        let kind = payload.kind();

        tracing::debug!(
            request_id = %request_id,
            status = %status,
            url = %url,
            "Backend responded"
        );

        let mut response = payload.into_response();
        *response.status_mut() = status;
        copy_response_headers(&backend_headers, response.headers_mut(), kind);
        Ok(response)
    }
}
