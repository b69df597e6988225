use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::extract::{CurrentUser, JsonBody, ListParams};
use super::validation::Validator;
use super::{ApiError, ApiResponse, AppState, Paginated};
use crate::db::FavoriteCity;
use crate::i18n::{Lang, Msg};
use crate::services::FavoriteError;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddFavoriteRequest {
    pub city: Option<String>,
}

/// POST /weather-module/favorite-cities
pub async fn add(
    State(state): State<Arc<AppState>>,
    lang: Lang,
    CurrentUser(user): CurrentUser,
    JsonBody(payload): JsonBody<AddFavoriteRequest>,
) -> Result<(StatusCode, Json<ApiResponse<FavoriteCity>>), ApiError> {
    let mut v = Validator::new(lang);
    let Some(city) = v.city(payload.city.as_deref()) else {
        return Err(v.into_error());
    };

    let favorite = state
        .favorite_service()
        .add(user.id, city)
        .await
        .map_err(|e| favorite_error(lang, e, Msg::FavoriteAddError))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            favorite,
            Msg::FavoriteAddSuccess.text(lang),
        )),
    ))
}

/// DELETE /weather-module/favorite-cities/{id}
pub async fn remove(
    State(state): State<Arc<AppState>>,
    lang: Lang,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<FavoriteCity>>>, ApiError> {
    let id = id
        .parse::<i32>()
        .map_err(|_| ApiError::not_found(lang, Msg::FavoriteNotFound))?;

    state
        .favorite_service()
        .remove(user.id, id)
        .await
        .map_err(|e| favorite_error(lang, e, Msg::FavoriteRemoveError))?;

    Ok(Json(ApiResponse::success(
        Vec::new(),
        Msg::FavoriteRemoveSuccess.text(lang),
    )))
}

/// GET /weather-module/favorite-cities
pub async fn list(
    State(state): State<Arc<AppState>>,
    lang: Lang,
    CurrentUser(user): CurrentUser,
    params: ListParams,
) -> Result<Paginated<FavoriteCity>, ApiError> {
    let page = state
        .favorite_service()
        .list(user.id, params.options)
        .await
        .map_err(|e| favorite_error(lang, e, Msg::FavoriteGetError))?;

    Ok(Paginated {
        message: Msg::ApiSuccess.text(lang).to_string(),
        page,
        path: state.absolute_url(&params.path),
    })
}

fn favorite_error(lang: Lang, err: FavoriteError, context: Msg) -> ApiError {
    match err {
        FavoriteError::AlreadyExists => ApiError::conflict(lang, Msg::FavoriteCityExists),
        FavoriteError::NotFound => ApiError::not_found(lang, Msg::FavoriteNotFound),
        FavoriteError::Internal(detail) => ApiError::internal(lang, context, detail),
    }
}
