//! Actix-web extractor resolving the acting reporting user.
//!
//! # Security
//! - Header values are wrapped in `SecretString` as soon as they are read
//! - Secret values are never logged or exposed in debug output

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, web};
use secrecy::{ExposeSecret, SecretString};
use std::future::{Ready, ready};

use super::Credentials;
use crate::config::{ADMIN_KEY_HEADER, API_KEY_HEADER};
use crate::error::AppError;
use crate::models::AuthenticatedUser;

const NOT_AUTHENTICATED: &str = "Sorry, you aren't authenticated";
const NO_REPORTING_ACCESS: &str = "Sorry, you don't have access to Reporting";

/// Extract a secret header value, wrapping it in SecretString.
/// Returns None if the header is missing or invalid UTF-8.
fn extract_secret_header(req: &HttpRequest, header_name: &str) -> Option<SecretString> {
    req.headers()
        .get(header_name)
        .and_then(|v| v.to_str().ok())
        .map(|s| SecretString::from(s.to_string()))
}

/// The user a reporting request acts as.
///
/// `user` is `None` when security is disabled. With security enabled the
/// extractor rejects unauthenticated callers (401) and roles without
/// reporting access (403).
#[derive(Debug, Clone)]
pub struct ReportingUser {
    pub user: Option<AuthenticatedUser>,
}

impl ReportingUser {
    /// Username used to filter and stamp reports.
    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.username.as_str())
    }
}

fn authenticate(req: &HttpRequest) -> Result<ReportingUser, AppError> {
    let credentials = req
        .app_data::<web::Data<Credentials>>()
        .ok_or_else(|| AppError::Internal("Internal configuration error".to_string()))?;

    if !credentials.security_enabled() {
        return Ok(ReportingUser { user: None });
    }

    let user = if let Some(admin) = extract_secret_header(req, ADMIN_KEY_HEADER)
        .and_then(|key| credentials.verify_admin_key(key.expose_secret()))
    {
        admin
    } else {
        extract_secret_header(req, API_KEY_HEADER)
            .and_then(|key| credentials.verify_api_key(key.expose_secret()))
            .ok_or_else(|| AppError::Unauthorized(NOT_AUTHENTICATED.to_string()))?
    };

    if !user.role.can_use_reporting() {
        return Err(AppError::Forbidden(NO_REPORTING_ACCESS.to_string()));
    }

    Ok(ReportingUser { user: Some(user) })
}

impl FromRequest for ReportingUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
