use std::sync::Arc;

use tracing::{info, warn};
use validator::Validate;

use crate::dto::PhoneNumberDTO;
use crate::models::{is_phone_complete, NewPhoneNumber, User};
use crate::repositories::{Store, StoreError, StoreTransaction};
use crate::services::not_found;
use crate::utils::errors::{AppError, AppResult, DUPLICATED_PHONE, INVALID_PHONE, PHONE_NOT_FOUND};
use crate::utils::validation::describe_errors;

/// Teléfonos de un usuario; dentro del usuario el número es la clave
pub struct PhoneService {
    store: Arc<dyn Store>,
}

impl PhoneService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create_phone_number(
        &self,
        user_id: i64,
        dto: PhoneNumberDTO,
    ) -> AppResult<PhoneNumberDTO> {
        let candidate = checked_phone(&dto, user_id)?;

        let mut tx = self.store.begin().await?;
        let user = find_owner(tx.as_mut(), user_id).await?;

        let phones = tx.phone_find_all_by_user(user_id).await?;
        if phones.iter().any(|p| p.same_number(&candidate.number)) {
            warn!("⚠️ El usuario {} ya tiene el número {}", user_id, candidate.number);
            return Err(AppError::IllegalOperation(DUPLICATED_PHONE.to_string()));
        }

        let phone = tx.phone_insert(&candidate).await.map_err(phone_error)?;

        tx.commit().await?;
        info!("📞 Teléfono {} creado para el usuario {}", phone.phone_id, user_id);

        Ok(PhoneNumberDTO::from_phone(&phone, Some(&user)))
    }

    /// Busca el teléfono por `phoneId` dentro del conjunto del usuario y, si el
    /// número cambió, sobrescribe tipo y número. Un `phoneId` ajeno al conjunto
    /// o el mismo número no modifican nada. Devuelve el conjunto completo.
    pub async fn update_phone_number(
        &self,
        user_id: i64,
        dto: PhoneNumberDTO,
    ) -> AppResult<Vec<PhoneNumberDTO>> {
        let phone_id = required_phone_id(&dto)?;
        let candidate = checked_phone(&dto, user_id)?;

        let mut tx = self.store.begin().await?;
        find_owner(tx.as_mut(), user_id).await?;

        let mut phones = tx.phone_find_all_by_user(user_id).await?;
        if phones.is_empty() {
            return Err(AppError::NotFound(PHONE_NOT_FOUND.to_string()));
        }

        if let Some(index) = phones.iter().position(|p| p.phone_id == phone_id) {
            if !phones[index].same_number(&candidate.number) {
                if phones.iter().any(|p| p.same_number(&candidate.number)) {
                    warn!("⚠️ El usuario {} ya tiene el número {}", user_id, candidate.number);
                    return Err(AppError::IllegalOperation(DUPLICATED_PHONE.to_string()));
                }
                phones[index].phone_type = candidate.phone_type;
                phones[index].number = candidate.number;
            }
        }

        tx.phone_update_batch(&phones).await.map_err(phone_error)?;
        tx.commit().await?;
        info!("📞 Teléfonos del usuario {} actualizados", user_id);

        Ok(phones
            .iter()
            .map(|phone| PhoneNumberDTO::from_phone(phone, None))
            .collect())
    }

    pub async fn get_phones_by_user_id(&self, user_id: i64) -> AppResult<Vec<PhoneNumberDTO>> {
        let mut tx = self.store.begin_read_only().await?;
        find_owner(tx.as_mut(), user_id).await?;
        let phones = tx.phone_find_all_by_user(user_id).await?;
        tx.commit().await?;

        if phones.is_empty() {
            return Err(AppError::NotFound(PHONE_NOT_FOUND.to_string()));
        }

        Ok(phones
            .iter()
            .map(|phone| PhoneNumberDTO::from_phone(phone, None))
            .collect())
    }

    pub async fn get_phone_numbers(&self) -> AppResult<Vec<PhoneNumberDTO>> {
        let mut tx = self.store.begin_read_only().await?;
        let phones = tx.phone_find_all().await?;
        tx.commit().await?;

        if phones.is_empty() {
            return Err(AppError::NotFound(PHONE_NOT_FOUND.to_string()));
        }

        Ok(phones
            .iter()
            .map(|phone| PhoneNumberDTO::from_phone(phone, None))
            .collect())
    }

    /// Quita exactamente el teléfono identificado por `phoneId`
    pub async fn delete_phone_number(&self, user_id: i64, dto: PhoneNumberDTO) -> AppResult<()> {
        let phone_id = required_phone_id(&dto)?;
        checked_phone(&dto, user_id)?;

        let mut tx = self.store.begin().await?;
        find_owner(tx.as_mut(), user_id).await?;

        let phones = tx.phone_find_all_by_user(user_id).await?;
        if !phones.iter().any(|p| p.phone_id == phone_id) {
            return Err(AppError::NotFound(PHONE_NOT_FOUND.to_string()));
        }

        tx.phone_delete(phone_id)
            .await
            .map_err(not_found(PHONE_NOT_FOUND))?;
        tx.commit().await?;

        info!("🗑️ Teléfono {} del usuario {} eliminado", phone_id, user_id);
        Ok(())
    }
}

pub(crate) fn checked_phone(dto: &PhoneNumberDTO, user_id: i64) -> AppResult<NewPhoneNumber> {
    let phone = dto
        .to_new_phone(user_id)
        .filter(is_phone_complete)
        .ok_or_else(|| AppError::InvalidPhoneState(INVALID_PHONE.to_string()))?;
    phone
        .validate()
        .map_err(|e| AppError::InvalidPhoneState(describe_errors(&e)))?;
    Ok(phone)
}

fn required_phone_id(dto: &PhoneNumberDTO) -> AppResult<i64> {
    dto.phone_id
        .ok_or_else(|| AppError::InvalidPhoneState(INVALID_PHONE.to_string()))
}

async fn find_owner(tx: &mut dyn StoreTransaction, user_id: i64) -> AppResult<User> {
    tx.user_find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(PHONE_NOT_FOUND.to_string()))
}

fn phone_error(err: StoreError) -> AppError {
    match err {
        StoreError::UniqueViolation(_) => AppError::IllegalOperation(DUPLICATED_PHONE.to_string()),
        StoreError::ForeignKeyViolation(_) | StoreError::NotFound => {
            AppError::NotFound(PHONE_NOT_FOUND.to_string())
        }
        other => AppError::from(other),
    }
}
