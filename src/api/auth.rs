//! Authentication endpoints

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde_json::{json, Value};

use crate::api::extract::{CurrentUser, ValidatedJson};
use crate::api::AppState;
use crate::models::user::{
    GoogleLoginRequest, LoginRequest, RegisterRequest, User, UserProfile,
};
use crate::utils::errors::Result;

fn session_cookie(name: &str, token: String) -> Cookie<'static> {
    Cookie::build((name.to_string(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

fn authenticated(
    state: &AppState,
    jar: CookieJar,
    user: &User,
) -> Result<(CookieJar, Json<UserProfile>)> {
    let token = state.services.auth_service.issue_token(user)?;
    let cookie = session_cookie(state.services.auth_service.cookie_name(), token);
    Ok((jar.add(cookie), Json(user.profile())))
}

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(body): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, (CookieJar, Json<UserProfile>))> {
    let user = state
        .services
        .auth_service
        .register(&body.name, &body.email, &body.password)
        .await?;

    Ok((StatusCode::CREATED, authenticated(&state, jar, &user)?))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(body): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, Json<UserProfile>)> {
    let user = state
        .services
        .auth_service
        .login(&body.email, &body.password)
        .await?;

    authenticated(&state, jar, &user)
}

/// POST /auth/google
pub async fn google_login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(body): ValidatedJson<GoogleLoginRequest>,
) -> Result<(CookieJar, Json<UserProfile>)> {
    let identity = state
        .services
        .google_service
        .verify_id_token(&body.id_token)
        .await?;

    let user = state
        .services
        .auth_service
        .login_or_register_google(&identity.name, &identity.email)
        .await?;

    authenticated(&state, jar, &user)
}

/// POST /auth/logout
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<Value>) {
    let name = state.services.auth_service.cookie_name().to_string();
    let mut removal = Cookie::from(name);
    removal.set_path("/");
    (jar.remove(removal), Json(json!({ "ok": true })))
}

/// GET /auth/profile
pub async fn profile(CurrentUser(user): CurrentUser) -> Json<UserProfile> {
    Json(user.profile())
}
