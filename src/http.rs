//! HTTP glue between hyper and [`ContactHandler`]
//!
//! Every response carries the CORS headers, including errors and preflight
//! replies.

use crate::error::ContactError;
use crate::handler::{ContactHandler, ContactResponse};
use bytes::Bytes;
use http_body_util::{BodyExt, Full, Limited};
use hyper::body::Body;
use hyper::header::CONTENT_TYPE;
use hyper::{Method, Request, Response, StatusCode};
use tracing::{error, warn};

/// Headers attached to every response
pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "POST, OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type"),
];

/// Reads the request body (POST only) and dispatches to the handler
pub async fn handle_http_request<B>(handler: &ContactHandler, req: Request<B>) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let method = req.method().clone();
    let body = if method == Method::POST {
        match Limited::new(req.into_body(), handler.config().max_body_bytes)
            .collect()
            .await
        {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                warn!(error = %e, "Failed to read request body");
                let err = ContactError::Validation("Request body too large or unreadable.".to_string());
                return into_response(handler.error_response(&err));
            }
        }
    } else {
        Bytes::new()
    };

    into_response(handler.handle(&method, &body).await)
}

/// Converts a handler response into a hyper response with CORS headers
pub fn into_response(response: ContactResponse) -> Response<Full<Bytes>> {
    let mut builder = Response::builder().status(response.status);
    for (name, value) in CORS_HEADERS {
        builder = builder.header(name, value);
    }

    let body = match response.body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            serde_json::to_vec(&json).unwrap_or_else(|_| {
                br#"{"success":false,"error":"Internal error"}"#.to_vec()
            })
        }
        None => Vec::new(),
    };

    builder
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|e| {
            error!(error = %e, "Failed to build response");
            let mut fallback = Response::new(Full::new(Bytes::new()));
            *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        })
}
