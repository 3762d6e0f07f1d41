//! Bearer-token authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::state::AppState;
use crate::token::codec::TokenPayload;

/// Authenticated user extracted from a Bearer token in the `Authorization`
/// header.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication; the verified payload is the only trusted source of the
/// acting user's identity:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.payload.user.id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Verified claims of the presented access token.
    pub payload: TokenPayload,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        // A missing header parses as zero fields and fails the same way as
        // a malformed one.
        let fields: Vec<&str> = auth_header.split_whitespace().collect();
        if fields.len() < 2 {
            return Err(AppError::Unauthorized(
                "invalid authorization header format".to_string(),
            ));
        }

        let scheme = fields[0].to_lowercase();
        if scheme != "bearer" {
            return Err(AppError::Unauthorized(format!(
                "unsupported authorization type {scheme}"
            )));
        }

        let payload = state
            .codec
            .verify_token(fields[1])
            .map_err(|e| AppError::Unauthorized(e.to_string()))?;

        Ok(AuthUser { payload })
    }
}
