//! Per-request access log for the reporting API.
//!
//! Query strings carry RISON job params that can be large, so only their
//! length is logged. API keys are reduced to a short prefix.

use std::time::Instant;

use actix_web::Error;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Next;
use tracing::{error, info, warn};

use crate::config::API_KEY_HEADER;

/// Visible prefix of an API key in logs.
const KEY_HINT_LEN: usize = 8;

/// Loggable hint for an API key: its prefix only.
fn key_hint(key: Option<&str>) -> String {
    match key {
        None => "none".to_string(),
        Some(k) => match k.get(..KEY_HINT_LEN) {
            Some(prefix) if k.len() > KEY_HINT_LEN => format!("{}...", prefix),
            _ => "invalid".to_string(),
        },
    }
}

/// Log one line per request once the response is known.
///
/// Mount with `actix_web::middleware::from_fn(log_request)`.
pub async fn log_request(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.path().to_string();
    let query_len = req.query_string().len();
    let api_key = key_hint(
        req.headers()
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok()),
    );

    let res = next.call(req).await?;
    let status = res.status().as_u16();
    let duration_ms = start.elapsed().as_millis() as u64;

    match status {
        500.. => error!(
            target: "reporting",
            %method, %path, status, duration_ms, query_len, %api_key,
            "Request failed"
        ),
        400..=499 => warn!(
            target: "reporting",
            %method, %path, status, duration_ms, query_len, %api_key,
            "Request rejected"
        ),
        _ => info!(
            target: "reporting",
            %method, %path, status, duration_ms, query_len, %api_key,
            "Request handled"
        ),
    }

    Ok(res)
}
