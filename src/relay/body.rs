//! Body encodings on both legs of the relay.
//!
//! The encoding is decided once per request (`RequestBodyKind`) and once per
//! backend response (`PayloadKind`); everything downstream branches on those
//! tags instead of re-inspecting `content-type`.

use axum::body::{Body, Bytes};
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::BytesRejection;
use axum::extract::{FromRequest, Multipart};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use reqwest::multipart::{Form, Part};
use thiserror::Error;

/// How the inbound body is read and re-sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestBodyKind {
    /// GET/HEAD: the body is never read.
    None,
    /// `multipart/form-data`: decoded into parts, re-encoded with a new boundary.
    Multipart,
    /// Anything else: forwarded byte-for-byte.
    Text,
}

impl RequestBodyKind {
    pub fn detect(method: &Method, headers: &HeaderMap) -> Self {
        if method == Method::GET || method == Method::HEAD {
            return Self::None;
        }
        if content_type_contains(headers, "multipart/form-data") {
            Self::Multipart
        } else {
            Self::Text
        }
    }
}

/// How the backend body is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Json,
    Text,
}

impl PayloadKind {
    pub fn detect(headers: &HeaderMap) -> Self {
        if content_type_contains(headers, "application/json") {
            Self::Json
        } else {
            Self::Text
        }
    }
}

fn content_type_contains(headers: &HeaderMap, needle: &str) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_ascii_lowercase().contains(needle))
        .unwrap_or(false)
}

/// Failure to extract the inbound body.
#[derive(Debug, Error)]
pub enum BodyReadError {
    #[error("invalid multipart request: {0}")]
    Multipart(#[from] MultipartRejection),

    #[error("malformed multipart field: {0}")]
    Field(#[from] MultipartError),

    #[error("failed to read request body: {0}")]
    Buffer(#[from] BytesRejection),
}

impl BodyReadError {
    /// The body ran past the limit set by `DefaultBodyLimit`, however it was framed.
    pub fn is_too_large(&self) -> bool {
        let status = match self {
            BodyReadError::Multipart(e) => e.status(),
            BodyReadError::Field(e) => e.status(),
            BodyReadError::Buffer(e) => e.status(),
        };
        status == StatusCode::PAYLOAD_TOO_LARGE
    }
}

/// One field or file of a multipart form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl FormPart {
    fn into_part(self) -> Result<Part, reqwest::Error> {
        let part = Part::bytes(self.data.to_vec());
        let part = match self.file_name {
            Some(file_name) => part.file_name(file_name),
            None => part,
        };
        match self.content_type {
            Some(mime) => part.mime_str(&mime),
            None => Ok(part),
        }
    }
}

/// The inbound body as it will be sent to the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundBody {
    Empty,
    Text(Bytes),
    Form(Vec<FormPart>),
}

impl OutboundBody {
    /// Read the request body according to `kind`, consuming the request.
    ///
    /// Both readers honor the `DefaultBodyLimit` installed on the router
    /// (axum's 2 MB default when none is set).
    pub async fn extract(
        kind: RequestBodyKind,
        request: Request<Body>,
    ) -> Result<Self, BodyReadError> {
        match kind {
            RequestBodyKind::None => Ok(Self::Empty),
            RequestBodyKind::Text => {
                let bytes = Bytes::from_request(request, &()).await?;
                Ok(Self::Text(bytes))
            }
            RequestBodyKind::Multipart => {
                let mut multipart = Multipart::from_request(request, &()).await?;
                let mut parts = Vec::new();
                while let Some(field) = multipart.next_field().await? {
                    let name = field.name().unwrap_or_default().to_string();
                    let file_name = field.file_name().map(str::to_owned);
                    let content_type = field.content_type().map(str::to_owned);
                    let data = field.bytes().await?;
                    parts.push(FormPart {
                        name,
                        file_name,
                        content_type,
                        data,
                    });
                }
                Ok(Self::Form(parts))
            }
        }
    }
}

/// Re-encode decoded parts as a form. The form picks its own boundary.
pub fn build_form(parts: Vec<FormPart>) -> Result<Form, reqwest::Error> {
    let mut form = Form::new();
    for part in parts {
        let name = part.name.clone();
        form = form.part(name, part.into_part()?);
    }
    Ok(form)
}

/// The decoded backend body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(serde_json::Value),
    Text(Bytes),
}

impl Payload {
    /// Decode a buffered backend body.
    ///
    /// An empty body declared as JSON (HEAD, 204) is kept as empty text.
    pub fn decode(kind: PayloadKind, bytes: Bytes) -> Result<Self, serde_json::Error> {
        match kind {
            PayloadKind::Json if !bytes.is_empty() => Ok(Self::Json(serde_json::from_slice(&bytes)?)),
            _ => Ok(Self::Text(bytes)),
        }
    }

    pub fn kind(&self) -> PayloadKind {
        match self {
            Payload::Json(_) => PayloadKind::Json,
            Payload::Text(_) => PayloadKind::Text,
        }
    }
}

impl IntoResponse for Payload {
    fn into_response(self) -> Response {
        match self {
            Payload::Json(value) => Json(value).into_response(),
            Payload::Text(bytes) => Response::new(Body::from(bytes)),
        }
    }
}
