use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::db::{Role, User};
use crate::models::Page;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }

    pub fn error(message: impl Into<String>, data: T) -> Self {
        Self {
            success: false,
            message: message.into(),
            data,
        }
    }
}

/// Length-aware pagination metadata, field-compatible with Laravel's paginator.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PaginationMeta {
    pub current_page: u64,
    pub first_page_url: String,
    pub from: Option<u64>,
    pub last_page: u64,
    pub last_page_url: String,
    pub next_page_url: Option<String>,
    pub path: String,
    pub per_page: u64,
    pub prev_page_url: Option<String>,
    pub to: Option<u64>,
    pub total: u64,
}

impl PaginationMeta {
    pub fn new<T>(page: &Page<T>, path: &str) -> Self {
        let url = |n: u64| format!("{path}?page={n}");
        let last_page = page.last_page();

        Self {
            current_page: page.current_page,
            first_page_url: url(1),
            from: page.from(),
            last_page,
            last_page_url: url(last_page),
            next_page_url: (page.current_page < last_page).then(|| url(page.current_page + 1)),
            path: path.to_string(),
            per_page: page.per_page,
            prev_page_url: (page.current_page > 1).then(|| url(page.current_page - 1)),
            to: page.to(),
            total: page.total,
        }
    }
}

#[derive(Serialize)]
struct PageEnvelope<T> {
    success: &'static str,
    message: String,
    data: Vec<T>,
    pagination: PaginationMeta,
}

/// An empty page keeps the historical `status` key and drops pagination.
#[derive(Serialize)]
struct EmptyEnvelope<T> {
    status: &'static str,
    message: String,
    data: Vec<T>,
}

/// Paginated list response.
pub struct Paginated<T> {
    pub message: String,
    pub page: Page<T>,
    /// Absolute URL of the listing endpoint, without query string.
    pub path: String,
}

impl<T: Serialize> IntoResponse for Paginated<T> {
    fn into_response(self) -> Response {
        if self.page.items.is_empty() {
            return Json(EmptyEnvelope {
                status: "Success",
                message: self.message,
                data: self.page.items,
            })
            .into_response();
        }

        let pagination = PaginationMeta::new(&self.page, &self.path);
        Json(PageEnvelope {
            success: "Success",
            message: self.message,
            data: self.page.items,
            pagination,
        })
        .into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RoleDto {
    pub id: i32,
    pub name: String,
    pub guard_name: String,
}

impl From<Role> for RoleDto {
    fn from(role: Role) -> Self {
        Self {
            id: role.id,
            name: role.name,
            guard_name: role.guard_name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user_data: UserDto,
    pub role: Option<RoleDto>,
    pub token_type: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(items: usize, total: u64, per_page: u64, current_page: u64) -> Page<usize> {
        Page {
            items: (0..items).collect(),
            total,
            per_page,
            current_page,
        }
    }

    #[test]
    fn test_pagination_meta_first_page() {
        let meta = PaginationMeta::new(&page(2, 3, 2, 1), "http://localhost:8000/api/v1/users");

        assert_eq!(meta.last_page, 2);
        assert_eq!(meta.from, Some(1));
        assert_eq!(meta.to, Some(2));
        assert_eq!(
            meta.first_page_url,
            "http://localhost:8000/api/v1/users?page=1"
        );
        assert_eq!(
            meta.next_page_url.as_deref(),
            Some("http://localhost:8000/api/v1/users?page=2")
        );
        assert_eq!(meta.prev_page_url, None);
    }

    #[test]
    fn test_pagination_meta_last_page() {
        let meta = PaginationMeta::new(&page(1, 3, 2, 2), "http://x/list");

        assert_eq!(meta.from, Some(3));
        assert_eq!(meta.to, Some(3));
        assert_eq!(meta.next_page_url, None);
        assert_eq!(meta.prev_page_url.as_deref(), Some("http://x/list?page=1"));
        assert_eq!(meta.last_page_url, "http://x/list?page=2");
    }
}
