use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::dto::PhoneNumberDTO;
use crate::services::PhoneService;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_phone_router() -> Router<AppState> {
    Router::new()
        .route("/rest-api/phones", get(get_phone_numbers))
        .route(
            "/rest-api/phones/:user_id",
            get(get_phones)
                .post(create_phone)
                .put(update_phone)
                .delete(delete_phone),
        )
}

async fn create_phone(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    payload: Result<Json<PhoneNumberDTO>, JsonRejection>,
) -> Result<(StatusCode, Json<PhoneNumberDTO>), AppError> {
    let Json(request) = payload?;
    let service = PhoneService::new(state.store.clone());
    let response = service.create_phone_number(user_id, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_phone(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    payload: Result<Json<PhoneNumberDTO>, JsonRejection>,
) -> Result<Json<Vec<PhoneNumberDTO>>, AppError> {
    let Json(request) = payload?;
    let service = PhoneService::new(state.store.clone());
    let response = service.update_phone_number(user_id, request).await?;
    Ok(Json(response))
}

async fn get_phones(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<PhoneNumberDTO>>, AppError> {
    let service = PhoneService::new(state.store.clone());
    let response = service.get_phones_by_user_id(user_id).await?;
    Ok(Json(response))
}

async fn get_phone_numbers(
    State(state): State<AppState>,
) -> Result<Json<Vec<PhoneNumberDTO>>, AppError> {
    let service = PhoneService::new(state.store.clone());
    let response = service.get_phone_numbers().await?;
    Ok(Json(response))
}

// El teléfono a borrar viaja en el cuerpo del DELETE
async fn delete_phone(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    payload: Result<Json<PhoneNumberDTO>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Json(request) = payload?;
    let service = PhoneService::new(state.store.clone());
    service.delete_phone_number(user_id, request).await?;
    Ok(StatusCode::NO_CONTENT)
}
