use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;
use std::time::Instant;
use tracing::{error, info, warn};

use crate::config::{Environment, RequestLogFormat};
use crate::error::{ApiError, ServerFault};
use crate::handlers::AppState;

/// Logging middleware for request/response tracking
pub async fn logging_middleware(
    State(format): State<RequestLogFormat>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let version = request.version();
    let client_ip = get_client_ip(&request);
    let user_agent = request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let latency_ms = started.elapsed().as_millis() as u64;

    match format {
        RequestLogFormat::Tiny => info!(
            target: "address_book::middleware",
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            latency_ms,
            "Request completed"
        ),
        RequestLogFormat::Common => {
            let content_length = response
                .headers()
                .get(header::CONTENT_LENGTH)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-");
            info!(
                target: "address_book::middleware",
                client_ip = %client_ip,
                method = %method,
                uri = %uri,
                version = ?version,
                status = status.as_u16(),
                content_length,
                user_agent = %user_agent,
                latency_ms,
                "Request completed"
            )
        }
    }

    response
}

/// Rejects the request with 401 unless it carries the configured bearer token.
/// The wrapped handler does not run after a rejection.
pub async fn require_bearer_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token);

    let authorized = match (presented, state.config.api_token.as_deref()) {
        (Some(presented), Some(expected)) => presented == expected,
        _ => false,
    };

    if !authorized {
        warn!(
            target: "address_book::middleware",
            method = %request.method(),
            uri = %request.uri(),
            "Rejected unauthorized request"
        );
        return ApiError::Unauthorized.into_response();
    }

    next.run(request).await
}

/// Renders server faults raised below this layer according to the environment
pub async fn error_translator(
    State(environment): State<Environment>,
    request: Request,
    next: Next,
) -> Response {
    let uri = request.uri().clone();
    let mut response = next.run(request).await;

    match response.extensions_mut().remove::<ServerFault>() {
        Some(fault) => {
            error!(
                target: "address_book::middleware",
                uri = %uri,
                detail = %fault.detail,
                "Request failed with server error"
            );
            fault.render(environment)
        }
        None => response,
    }
}

const SECURITY_HEADERS: [(&str, &str); 6] = [
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "SAMEORIGIN"),
    ("x-dns-prefetch-control", "off"),
    ("referrer-policy", "no-referrer"),
    ("x-download-options", "noopen"),
    ("x-xss-protection", "0"),
];

/// Adds hardening headers the handler did not set itself
pub async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    for (name, value) in SECURITY_HEADERS {
        headers
            .entry(HeaderName::from_static(name))
            .or_insert(HeaderValue::from_static(value));
    }

    response
}

fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

fn get_client_ip(request: &Request) -> String {
    // Try to get real IP from headers first
    if let Some(forwarded) = request.headers().get("x-forwarded-for") {
        if let Ok(forwarded_str) = forwarded.to_str() {
            if let Some(first_ip) = forwarded_str.split(',').next() {
                return first_ip.trim().to_string();
            }
        }
    }

    if let Some(real_ip) = request.headers().get("x-real-ip") {
        if let Ok(ip_str) = real_ip.to_str() {
            return ip_str.to_string();
        }
    }

    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        addr.ip().to_string()
    } else {
        "unknown".to_string()
    }
}
