//! Authentication service routes

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::{
    WithRejection,
    cookie::{Cookie, CookieJar, SameSite},
};
use common::session::{TOKEN_COOKIE, USER_COOKIE};
use serde_json::json;
use tracing::info;

use crate::{
    error::AuthError,
    models::{AuthResponse, LoginRequest, SessionResponse, SignupRequest},
    session::Authenticated,
    state::{AppState, CookieSettings},
};

/// Create the router for the authentication service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/session", get(current_session))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "auth-service"
    }))
}

/// User signup endpoint
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(payload), _): WithRejection<Json<SignupRequest>, AuthError>,
) -> Result<impl IntoResponse, AuthError> {
    let authenticated = state.sessions.signup(payload).await?;
    let jar = with_session_cookies(jar, &authenticated, &state.cookies);

    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse {
            success: true,
            user: authenticated.user,
            token: authenticated.token.token,
        }),
    ))
}

/// User login endpoint
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(payload), _): WithRejection<Json<LoginRequest>, AuthError>,
) -> Result<impl IntoResponse, AuthError> {
    let authenticated = state.sessions.login(payload).await?;
    let jar = with_session_cookies(jar, &authenticated, &state.cookies);

    Ok((
        StatusCode::OK,
        jar,
        Json(AuthResponse {
            success: true,
            user: authenticated.user,
            token: authenticated.token.token,
        }),
    ))
}

/// Logout endpoint
///
/// Tokens are not revocable, so logging out only drops the client's cookies.
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    info!("Logout request");

    let jar = jar
        .add(removal_cookie(TOKEN_COOKIE))
        .add(removal_cookie(USER_COOKIE));

    (
        jar,
        Json(json!({
            "success": true,
            "message": "Logged out successfully"
        })),
    )
}

/// Report the identity held in the caller's session cookie
pub async fn current_session(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let session = state
        .sessions
        .current_user(jar.get(TOKEN_COOKIE).map(|cookie| cookie.value()));

    Json(SessionResponse {
        success: session.is_some(),
        user: session.map(|session| session.email),
    })
}

fn with_session_cookies(
    jar: CookieJar,
    authenticated: &Authenticated,
    settings: &CookieSettings,
) -> CookieJar {
    jar.add(session_cookie(
        TOKEN_COOKIE,
        authenticated.token.token.clone(),
        settings,
        true,
    ))
    .add(session_cookie(
        USER_COOKIE,
        authenticated.user.clone(),
        settings,
        false,
    ))
}

fn session_cookie(
    name: &'static str,
    value: String,
    settings: &CookieSettings,
    http_only: bool,
) -> Cookie<'static> {
    let max_age = i64::try_from(settings.max_age).unwrap_or(i64::MAX);

    Cookie::build((name, value))
        .path("/")
        .http_only(http_only)
        .secure(settings.secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(max_age))
        .build()
}

fn removal_cookie(name: &'static str) -> Cookie<'static> {
    let mut cookie = Cookie::build((name, "")).path("/").build();
    cookie.make_removal();
    cookie
}
