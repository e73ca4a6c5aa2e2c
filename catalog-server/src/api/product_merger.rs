//! Product merger API
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | GET | `/api/product-merger/{brand_id}` | Preview a merge |
//! | POST | `/api/product-merger/{brand_id}` | Execute a merge |

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use http::StatusCode;
use serde::Deserialize;
use shared::error::{AppError, AppResult};

use super::blocking;
use super::presenter::{PreviewView, present_preview};
use crate::auth::EditorIdentity;
use crate::merging::{MergeOutcome, MergeRequest, OptionChange, PreviewRequest};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/{brand_id}", get(preview).post(merge))
}

#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    /// Comma separated product ids
    pub product_ids: String,
    pub parent_product_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct MergeBody {
    pub product_ids: Vec<i64>,
    pub parent_product_id: Option<i64>,
    pub parent_product_name: Option<String>,
    #[serde(default)]
    pub product_variant_option_changes: Vec<OptionChange>,
}

pub async fn preview(
    State(state): State<AppState>,
    identity: EditorIdentity,
    Path(brand_id): Path<i64>,
    Query(query): Query<PreviewQuery>,
) -> AppResult<Json<PreviewView>> {
    identity.authorize_brand(brand_id)?;
    let product_ids = parse_id_list(&query.product_ids)?;
    check_selection(&product_ids, query.parent_product_id)?;

    let request = PreviewRequest {
        brand_id,
        product_ids,
        parent_product_id: query.parent_product_id,
    };
    let view = blocking(move || {
        let preview = state.merger.preview(&request)?;
        let fields = state.storage().list_global_fields(brand_id)?;
        Ok(present_preview(&preview, &fields))
    })
    .await?;

    Ok(Json(view))
}

pub async fn merge(
    State(state): State<AppState>,
    identity: EditorIdentity,
    Path(brand_id): Path<i64>,
    Json(body): Json<MergeBody>,
) -> AppResult<(StatusCode, Json<MergeOutcome>)> {
    identity.authorize_brand(brand_id)?;
    let product_ids = dedup(body.product_ids);
    check_selection(&product_ids, body.parent_product_id)?;
    if body.parent_product_id.is_none()
        && body
            .parent_product_name
            .as_deref()
            .is_none_or(|name| name.trim().is_empty())
    {
        return Err(AppError::validation(
            "parent_product_name is required when parent_product_id is not given",
        ));
    }

    let request = MergeRequest {
        brand_id,
        product_ids,
        parent_product_id: body.parent_product_id,
        parent_product_name: body.parent_product_name,
        changes: body.product_variant_option_changes,
    };
    let outcome = blocking(move || Ok(state.merger.merge(&request)?)).await?;

    Ok((StatusCode::CREATED, Json(outcome)))
}

/// Parse "1, 2,3" into ids, dropping duplicates
fn parse_id_list(raw: &str) -> AppResult<Vec<i64>> {
    let ids = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>().map_err(|_| {
                AppError::validation(format!("Invalid product id in product_ids: {s}"))
                    .with_detail("field", "product_ids")
            })
        })
        .collect::<AppResult<Vec<_>>>()?;
    Ok(dedup(ids))
}

fn dedup(ids: Vec<i64>) -> Vec<i64> {
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

/// Two products to merge, or one to add to an existing parent
fn check_selection(product_ids: &[i64], parent_product_id: Option<i64>) -> AppResult<()> {
    let required = if parent_product_id.is_some() { 1 } else { 2 };
    if product_ids.len() < required {
        return Err(AppError::validation(format!(
            "At least {required} product(s) must be selected"
        ))
        .with_detail("field", "product_ids"));
    }
    Ok(())
}
