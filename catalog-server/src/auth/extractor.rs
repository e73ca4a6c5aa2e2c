//! Editor identity extractor
//!
//! Validates the bearer token of protected handlers and yields the
//! request-scoped [`EditorIdentity`].

use axum::{extract::FromRequestParts, http::request::Parts};
use shared::error::{AppError, AppResult};

use super::jwt::{EditorClaims, JwtError, JwtService};
use crate::state::AppState;

/// Authenticated editor extracted from the JWT
#[derive(Debug, Clone)]
pub struct EditorIdentity {
    pub user_id: String,
    pub brand_ids: Vec<i64>,
}

impl EditorIdentity {
    pub fn can_edit_products(&self, brand_id: i64) -> bool {
        self.brand_ids.contains(&brand_id)
    }

    /// Reject with 403 unless the editor belongs to the brand
    pub fn authorize_brand(&self, brand_id: i64) -> AppResult<()> {
        if self.can_edit_products(brand_id) {
            Ok(())
        } else {
            tracing::warn!(user_id = %self.user_id, brand_id, "Brand access denied");
            Err(AppError::permission_denied(format!(
                "Not allowed to edit products of brand {brand_id}"
            )))
        }
    }
}

impl From<EditorClaims> for EditorIdentity {
    fn from(claims: EditorClaims) -> Self {
        Self {
            user_id: claims.sub,
            brand_ids: claims.brands,
        }
    }
}

impl FromRequestParts<AppState> for EditorIdentity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(identity) = parts.extensions.get::<EditorIdentity>() {
            return Ok(identity.clone());
        }

        let header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(AppError::not_authenticated)?;
        let token = JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?;

        let claims = state.jwt.validate_token(token).map_err(|e| {
            tracing::debug!(error = %e, uri = ?parts.uri, "JWT validation failed");
            match e {
                JwtError::ExpiredToken => AppError::token_expired(),
                _ => AppError::invalid_token("Invalid token"),
            }
        })?;

        let identity = EditorIdentity::from(claims);
        parts.extensions.insert(identity.clone());
        Ok(identity)
    }
}
