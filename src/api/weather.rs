use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::extract::{CurrentUser, ListParams};
use super::validation::Validator;
use super::{ApiError, ApiResponse, AppState, Paginated};
use crate::db::SearchHistoryEntry;
use crate::i18n::{Lang, Msg};
use crate::models::WeatherSnapshot;
use crate::services::WeatherError;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ByCityQuery {
    pub city: Option<String>,
}

/// GET /weather-module/weather/by-city
///
/// The city is validated before the cache or provider is touched.
pub async fn by_city(
    State(state): State<Arc<AppState>>,
    lang: Lang,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ByCityQuery>,
) -> Result<Json<ApiResponse<WeatherSnapshot>>, ApiError> {
    let mut v = Validator::new(lang);
    let Some(city) = v.city(query.city.as_deref()) else {
        return Err(v.into_error());
    };

    let snapshot = state
        .weather_service()
        .current_by_city(user.id, city, lang)
        .await
        .map_err(|e| match e {
            WeatherError::Upstream(error) => ApiError::upstream(lang, error),
        })?;

    Ok(Json(ApiResponse::success(
        snapshot,
        Msg::WeatherSuccess.text(lang),
    )))
}

/// GET /weather-module/search-history
pub async fn search_history(
    State(state): State<Arc<AppState>>,
    lang: Lang,
    CurrentUser(user): CurrentUser,
    params: ListParams,
) -> Result<Paginated<SearchHistoryEntry>, ApiError> {
    let page = state
        .store()
        .list_search_history(user.id, params.options)
        .await
        .map_err(|e| ApiError::internal(lang, Msg::SearchHistoryGetError, format!("{e:#}")))?;

    Ok(Paginated {
        message: Msg::ApiSuccess.text(lang).to_string(),
        page,
        path: state.absolute_url(&params.path),
    })
}
