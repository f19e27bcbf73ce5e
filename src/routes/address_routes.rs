use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::dto::AddressDTO;
use crate::services::AddressService;
use crate::state::AppState;
use crate::utils::errors::AppError;

// "adresses" es la ruta pública que usan los clientes existentes
pub fn create_address_router() -> Router<AppState> {
    Router::new()
        .route("/rest-api/adresses", get(get_adresses))
        .route(
            "/rest-api/adresses/:user_id",
            get(get_address)
                .post(create_address)
                .put(update_address)
                .delete(delete_address),
        )
}

async fn create_address(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    payload: Result<Json<AddressDTO>, JsonRejection>,
) -> Result<(StatusCode, Json<AddressDTO>), AppError> {
    let Json(request) = payload?;
    let service = AddressService::new(state.store.clone());
    let response = service.create_address(user_id, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_address(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    payload: Result<Json<AddressDTO>, JsonRejection>,
) -> Result<Json<AddressDTO>, AppError> {
    let Json(request) = payload?;
    let service = AddressService::new(state.store.clone());
    let response = service.update_address(user_id, request).await?;
    Ok(Json(response))
}

async fn get_address(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<AddressDTO>, AppError> {
    let service = AddressService::new(state.store.clone());
    let response = service.get_address_by_user_id(user_id).await?;
    Ok(Json(response))
}

async fn get_adresses(State(state): State<AppState>) -> Result<Json<Vec<AddressDTO>>, AppError> {
    let service = AddressService::new(state.store.clone());
    let response = service.get_adresses().await?;
    Ok(Json(response))
}

async fn delete_address(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let service = AddressService::new(state.store.clone());
    service.delete_address(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
