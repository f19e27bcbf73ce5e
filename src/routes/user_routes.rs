use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::dto::UserDTO;
use crate::services::UserService;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_user_router() -> Router<AppState> {
    Router::new()
        .route("/rest-api/users", post(create_user).get(get_users))
        .route(
            "/rest-api/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<UserDTO>, JsonRejection>,
) -> Result<(StatusCode, Json<UserDTO>), AppError> {
    let Json(request) = payload?;
    let service = UserService::new(state.store.clone());
    let response = service.create_user(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<UserDTO>, JsonRejection>,
) -> Result<Json<UserDTO>, AppError> {
    let Json(request) = payload?;
    let service = UserService::new(state.store.clone());
    let response = service.update_user(id, request).await?;
    Ok(Json(response))
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserDTO>, AppError> {
    let service = UserService::new(state.store.clone());
    let response = service.get_user_by_id(id).await?;
    Ok(Json(response))
}

async fn get_users(State(state): State<AppState>) -> Result<Json<Vec<UserDTO>>, AppError> {
    let service = UserService::new(state.store.clone());
    let response = service.get_users().await?;
    Ok(Json(response))
}

async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let service = UserService::new(state.store.clone());
    service.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
