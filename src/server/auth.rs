use crate::domain::model::Actor;
use crate::server::AppState;
use crate::utils::error::AdError;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

/// Resolves the `Authorization` header into an [`Actor`] request extension.
/// No header means anonymous; a header that does not resolve is rejected.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AdError> {
    let actor = match extract_token(req.headers())? {
        None => Actor::Anonymous,
        Some(token) => match state.directory.authenticate(&token).await {
            Some(user) => Actor::Authenticated(user),
            None => return Err(AdError::AuthenticationFailed),
        },
    };

    req.extensions_mut().insert(actor);
    Ok(next.run(req).await)
}

/// Accepts `Token <key>` and `Bearer <key>`.
pub(crate) fn extract_token(headers: &HeaderMap) -> Result<Option<String>, AdError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let raw = value.to_str().map_err(|_| AdError::AuthenticationFailed)?;
    let (scheme, token) = raw
        .trim()
        .split_once(' ')
        .ok_or(AdError::AuthenticationFailed)?;

    if !scheme.eq_ignore_ascii_case("token") && !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AdError::AuthenticationFailed);
    }

    let token = token.trim();
    if token.is_empty() || token.contains(' ') {
        return Err(AdError::AuthenticationFailed);
    }
    Ok(Some(token.to_string()))
}
