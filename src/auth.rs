use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;

use crate::error::ApiError;

/// Accepts the token from a bearer header first, then from the `token` query
/// parameter.
pub fn verify_token(
    expected: &str,
    auth: Option<Authorization<Bearer>>,
    query_token: Option<&str>,
) -> Result<(), ApiError> {
    let provided = auth.as_ref().map(|a| a.token()).or(query_token);
    match provided {
        Some(token) if token == expected => Ok(()),
        _ => Err(ApiError::Unauthorized("Invalid authentication token".into())),
    }
}
