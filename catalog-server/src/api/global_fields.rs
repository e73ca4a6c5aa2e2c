//! Global field API
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | GET | `/api/brands/{brand_id}/global-fields` | List a brand's fields |
//! | POST | `/api/brands/{brand_id}/global-fields` | Create a field |

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use http::StatusCode;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{GlobalField, GlobalFieldCreate};
use shared::util::snowflake_id;

use super::blocking;
use crate::auth::EditorIdentity;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{brand_id}/global-fields",
        get(list_global_fields).post(create_global_field),
    )
}

pub async fn list_global_fields(
    State(state): State<AppState>,
    identity: EditorIdentity,
    Path(brand_id): Path<i64>,
) -> AppResult<Json<Vec<GlobalField>>> {
    identity.authorize_brand(brand_id)?;
    let fields = blocking(move || {
        ensure_brand(&state, brand_id)?;
        Ok(state.storage().list_global_fields(brand_id)?)
    })
    .await?;
    Ok(Json(fields))
}

pub async fn create_global_field(
    State(state): State<AppState>,
    identity: EditorIdentity,
    Path(brand_id): Path<i64>,
    Json(data): Json<GlobalFieldCreate>,
) -> AppResult<(StatusCode, Json<GlobalField>)> {
    identity.authorize_brand(brand_id)?;
    let label = data.label.trim().to_string();
    if label.is_empty() {
        return Err(AppError::validation("label must not be empty").with_detail("field", "label"));
    }

    let field = blocking(move || {
        ensure_brand(&state, brand_id)?;
        let field = GlobalField {
            id: snowflake_id(),
            brand_id,
            label,
            shop_reference: data.shop_reference,
            default_value: data.default_value,
            mutable: data.mutable,
        };
        if !state.storage().create_global_field(&field)? {
            return Err(AppError::with_message(
                ErrorCode::GlobalFieldLabelExists,
                format!("Global field '{}' already exists", field.label),
            )
            .with_detail("label", field.label));
        }
        tracing::info!(brand_id, field_id = field.id, label = %field.label, "Global field created");
        Ok(field)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(field)))
}

fn ensure_brand(state: &AppState, brand_id: i64) -> AppResult<()> {
    match state.storage().get_brand(brand_id)? {
        Some(_) => Ok(()),
        None => Err(AppError::brand_not_found(brand_id)),
    }
}
