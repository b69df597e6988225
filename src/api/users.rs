use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::extract::{CurrentUser, JsonBody, ListParams};
use super::validation::Validator;
use super::{ApiError, ApiResponse, AppState, Paginated, UserDto};
use crate::i18n::{Lang, Msg, Rule};
use crate::services::{AccountChanges, NewAccount, UserError};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

/// GET /users
pub async fn list(
    State(state): State<Arc<AppState>>,
    lang: Lang,
    CurrentUser(current): CurrentUser,
    params: ListParams,
) -> Result<Paginated<UserDto>, ApiError> {
    let page = state
        .user_service()
        .list(current.id, params.options)
        .await
        .map_err(|e| user_error(lang, e, Msg::UserListError))?;

    Ok(Paginated {
        message: Msg::ApiSuccess.text(lang).to_string(),
        page: page.map(UserDto::from),
        path: state.absolute_url(&params.path),
    })
}

/// POST /users
pub async fn create(
    State(state): State<Arc<AppState>>,
    lang: Lang,
    JsonBody(payload): JsonBody<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), ApiError> {
    let mut v = Validator::new(lang);
    let name = v.name(payload.name.as_deref());
    let email = v.email(payload.email.as_deref());
    let password = v.confirmed_password(
        payload.password.as_deref(),
        payload.password_confirmation.as_deref(),
    );
    let role = v.required("role", payload.role.as_deref());
    let (Some(name), Some(email), Some(password), Some(role)) = (name, email, password, role)
    else {
        return Err(v.into_error());
    };

    let user = state
        .user_service()
        .create(NewAccount {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: role.to_string(),
        })
        .await
        .map_err(|e| user_error(lang, e, Msg::UserCreateError))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            user.into(),
            Msg::UserCreateSuccess.text(lang),
        )),
    ))
}

/// PUT /users/{id}
pub async fn update(
    State(state): State<Arc<AppState>>,
    lang: Lang,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let id = parse_id(lang, &id)?;

    let mut v = Validator::new(lang);
    let name = v.optional_text(
        "name",
        payload.name.as_deref(),
        crate::constants::limits::NAME_MIN_LEN,
        crate::constants::limits::NAME_MAX_LEN,
    );
    let password = v.optional_password(payload.password.as_deref());
    let role = payload.role.as_deref().map(str::trim).filter(|r| !r.is_empty());
    v.finish()?;

    let user = state
        .user_service()
        .update(
            id,
            AccountChanges {
                name: name.map(str::to_string),
                password: password.map(str::to_string),
                role: role.map(str::to_string),
            },
        )
        .await
        .map_err(|e| user_error(lang, e, Msg::ApiError))?;

    Ok(Json(ApiResponse::success(
        user.into(),
        Msg::UserUpdateSuccess.text(lang),
    )))
}

/// DELETE /users/{id}
pub async fn delete(
    State(state): State<Arc<AppState>>,
    lang: Lang,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = parse_id(lang, &id)?;

    state
        .user_service()
        .delete(id)
        .await
        .map_err(|e| user_error(lang, e, Msg::ApiError))?;

    Ok(Json(ApiResponse::success((), Msg::UserDeleted.text(lang))))
}

/// Ids that cannot name a row are treated as missing rows.
fn parse_id(lang: Lang, raw: &str) -> Result<i32, ApiError> {
    raw.parse::<i32>()
        .map_err(|_| ApiError::not_found(lang, Msg::UserNotFound))
}

fn user_error(lang: Lang, err: UserError, context: Msg) -> ApiError {
    match err {
        UserError::NotFound => ApiError::not_found(lang, Msg::UserNotFound),
        UserError::EmailTaken => ApiError::field(lang, "email", Rule::Unique),
        UserError::RoleNotFound(_) => ApiError::field(lang, "role", Rule::Exists),
        UserError::Internal(detail) => ApiError::internal(lang, context, detail),
    }
}
