//! Request extractors
//!
//! Identity resolution (cookie first, then bearer header) and validated
//! JSON bodies.

use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::api::AppState;
use crate::models::user::{User, UserRole};
use crate::utils::errors::{EventFlowError, Result};

/// The authenticated caller, resolved to a live user record
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// An authenticated caller with the admin role
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

/// Pull the token from the named cookie, falling back to a bearer header
fn token_from_parts(parts: &Parts, cookie_name: &str) -> Option<String> {
    let jar = CookieJar::from_headers(&parts.headers);
    if let Some(cookie) = jar.get(cookie_name) {
        return Some(cookie.value().to_string());
    }

    let header_value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = header_value.trim().split_once(' ')?;
    if scheme != "Bearer" {
        return None;
    }

    Some(token.trim().to_string())
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = EventFlowError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let cookie_name = state.services.auth_service.cookie_name();
        let token =
            token_from_parts(parts, cookie_name).ok_or(EventFlowError::MissingToken)?;

        let user = state.services.auth_service.authenticate(&token).await?;
        Ok(CurrentUser(user))
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = EventFlowError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;

        if user.role != UserRole::Admin {
            return Err(EventFlowError::PermissionDenied(
                "Admin privileges required".to_string(),
            ));
        }

        Ok(AdminUser(user))
    }
}

/// JSON body run through `validator` before the handler sees it
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = EventFlowError;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}
