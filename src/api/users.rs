//! User management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::user::User;
use crate::infrastructure::user::{CreateUserRequest, UpdateUserRequest};

/// Request to create a new user
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserApiRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Request to update a user; all fields optional
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserApiRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

/// User response body; the password hash is never serialized
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub username: String,
    pub role: String,
    pub connection_status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().as_str().to_string(),
            email: user.email().as_str().to_string(),
            username: user.username().as_str().to_string(),
            role: user.role().as_str().to_string(),
            connection_status: user.connection_status().as_str().to_string(),
            created_at: user.created_at().to_rfc3339(),
            updated_at: user.updated_at().to_rfc3339(),
        }
    }
}

/// List users response
#[derive(Debug, Clone, Serialize)]
pub struct ListUsersResponse {
    pub users: Vec<UserResponse>,
    pub total: usize,
}

/// GET /api/users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<ListUsersResponse>, ApiError> {
    debug!("Listing all users");

    let users = state.user_service.list().await.map_err(ApiError::from)?;

    let user_responses: Vec<UserResponse> = users.iter().map(UserResponse::from).collect();
    let total = user_responses.len();

    Ok(Json(ListUsersResponse {
        users: user_responses,
        total,
    }))
}

/// GET /api/users/:user_id
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    debug!(user_id = %user_id, "Getting user");

    let user = state
        .user_service
        .get(&user_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::not_found(format!("User '{}' not found", user_id)))?;

    Ok(Json(UserResponse::from(&user)))
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserApiRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    debug!(email = %request.email, "Creating user");

    let service_request = CreateUserRequest {
        email: request.email,
        password: request.password,
        username: request.username,
        role: request.role,
    };

    let user = state
        .user_service
        .create(service_request)
        .await
        .map_err(ApiError::from)?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// PUT /api/users/:user_id
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<UpdateUserApiRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    debug!(user_id = %user_id, "Updating user");

    let service_request = UpdateUserRequest {
        email: request.email,
        username: request.username,
        password: request.password,
        role: request.role,
    };

    let user = state
        .user_service
        .update(&user_id, service_request)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(UserResponse::from(&user)))
}

/// DELETE /api/users/:user_id
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    debug!(user_id = %user_id, "Deleting user");

    state
        .user_service
        .delete(&user_id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(serde_json::json!({
        "deleted": true,
        "id": user_id
    })))
}

/// POST /api/users/:user_id/connect
pub async fn connect_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    debug!(user_id = %user_id, "Marking user connected");

    let user = state
        .user_service
        .connect(&user_id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(UserResponse::from(&user)))
}

/// POST /api/users/:user_id/disconnect
pub async fn disconnect_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    debug!(user_id = %user_id, "Marking user disconnected");

    let user = state
        .user_service
        .disconnect(&user_id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(UserResponse::from(&user)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::{ConnectionStatus, Email, PasswordHash, Role, UserId, Username};
    use chrono::Utc;

    #[test]
    fn test_user_response_excludes_password() {
        let user = User::reconstitute(
            UserId::generate(),
            Email::new("body@example.com").unwrap(),
            Username::new("body_user").unwrap(),
            PasswordHash::new("super_secret_hash").unwrap(),
            Role::Admin,
            Utc::now(),
            Utc::now(),
            ConnectionStatus::Connected,
        );

        let response = UserResponse::from(&user);
        let json = serde_json::to_string(&response).unwrap();

        assert!(!json.contains("super_secret_hash"));
        assert!(!json.contains("password"));
        assert!(json.contains("body@example.com"));
        assert!(json.contains("\"connection_status\":\"connected\""));
        assert!(json.contains("\"role\":\"admin\""));
    }

    #[test]
    fn test_create_request_optional_fields() {
        let request: CreateUserApiRequest = serde_json::from_str(
            r#"{"email": "min@example.com", "password": "secure_password123"}"#,
        )
        .unwrap();

        assert!(request.username.is_none());
        assert!(request.role.is_none());
    }
}
