//! Handlers for `/weapons` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/weapons/{category}` | 400 if the category is not configured |
//! | `GET`  | `/weapons/search/{query}` | Case-insensitive name substring |

use axum::{
  Json,
  extract::{Path, State},
};
use ordnance_core::{
  store::WeaponStore,
  weapon::{SearchResult, Weapon},
};
use ordnance_ingest::Ingest;
use serde::Serialize;

use crate::{ApiState, error::ApiError};

// ─── By category ─────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct WeaponsResponse {
  pub weapons: Vec<Weapon>,
}

/// `GET /weapons/{category}`
pub async fn by_category<S, I>(
  State(state): State<ApiState<S, I>>,
  Path(category): Path<String>,
) -> Result<Json<WeaponsResponse>, ApiError>
where
  S: WeaponStore,
  I: Ingest,
{
  if !state.sources.contains_category(&category) {
    return Err(ApiError::BadRequest(format!("category {category} does not exist")));
  }

  let weapons = state
    .bounded(async {
      state
        .store
        .weapons_by_category(&category)
        .await
        .map_err(|e| ApiError::Store(Box::new(e)))
    })
    .await?;
  Ok(Json(WeaponsResponse { weapons }))
}

// ─── Search ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SearchResponse {
  pub results: Vec<SearchResult>,
}

/// `GET /weapons/search/{query}`
pub async fn search<S, I>(
  State(state): State<ApiState<S, I>>,
  Path(query): Path<String>,
) -> Result<Json<SearchResponse>, ApiError>
where
  S: WeaponStore,
  I: Ingest,
{
  let query = query.trim();
  if query.is_empty() {
    return Err(ApiError::BadRequest("search query must not be blank".into()));
  }

  let results = state
    .bounded(async {
      state
        .store
        .search_by_name(query)
        .await
        .map_err(|e| ApiError::Store(Box::new(e)))
    })
    .await?;
  Ok(Json(SearchResponse { results }))
}
