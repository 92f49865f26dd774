use crate::auth::models::AuthUser;
use crate::constants::{SECURE_SESSION_COOKIE, SESSION_COOKIE};
use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use hestia_core::models::CreditDebit;
use hestia_core::AppError;
use hestia_db::session_token_from_cookie;
use std::sync::Arc;

fn unauthorized() -> Response {
    HttpAppError(AppError::Unauthorized("Unauthorized".to_string())).into_response()
}

/// Session token from `Authorization: Bearer …`, else from the auth library's cookie.
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(bearer) = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        return Some(bearer.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE || *name == SECURE_SESSION_COOKIE)
        .map(|(_, value)| {
            let decoded = urlencoding::decode(value)
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| value.to_string());
            session_token_from_cookie(&decoded).to_string()
        })
        .filter(|t| !t.is_empty())
}

/// Reject requests without a live session; otherwise attach [`AuthUser`].
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = extract_session_token(request.headers()) else {
        tracing::debug!(path = %request.uri().path(), "Missing session token");
        return unauthorized();
    };

    let user_id = match state.gates.sessions.resolve_user(&token).await {
        Ok(Some(user_id)) => user_id,
        Ok(None) => {
            tracing::debug!(path = %request.uri().path(), "Session not found or expired");
            return unauthorized();
        }
        Err(e) => return HttpAppError(e).into_response(),
    };

    request.extensions_mut().insert(AuthUser { user_id });
    next.run(request).await
}

/// Spend one credit before the handler runs. Must sit inside [`auth_middleware`].
pub async fn credit_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(user) = request.extensions().get::<AuthUser>().cloned() else {
        return unauthorized();
    };
    let reason = request.uri().path().trim_start_matches('/').to_string();

    match state.gates.credits.debit_one(&user.user_id, &reason).await {
        Ok(CreditDebit::Debited { remaining }) => {
            tracing::info!(user_id = %user.user_id, remaining, reason = %reason, "Credit spent");
            next.run(request).await
        }
        Ok(CreditDebit::Insufficient) => {
            HttpAppError(AppError::InsufficientCredit("Insufficient credits".to_string()))
                .into_response()
        }
        Ok(CreditDebit::UserNotFound) => {
            HttpAppError(AppError::NotFound("User not found".to_string())).into_response()
        }
        Err(e) => HttpAppError(e).into_response(),
    }
}
