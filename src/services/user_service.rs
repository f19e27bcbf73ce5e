use std::sync::Arc;

use tracing::{info, warn};
use validator::Validate;

use crate::dto::UserDTO;
use crate::models::{
    cpf_consistency, has_duplicated_numbers, is_user_complete, CpfConsistency, NewUser,
    PhoneNumber,
};
use crate::repositories::{Store, StoreError, StoreTransaction};
use crate::services::address_service::checked_address;
use crate::services::not_found;
use crate::services::phone_service::checked_phone;
use crate::utils::errors::{
    AppError, AppResult, DUPLICATED_PHONE, INVALID_USER, USER_CPF, USER_NOT_FOUND,
};
use crate::utils::validation::describe_errors;

pub struct UserService {
    store: Arc<dyn Store>,
}

impl UserService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Crea el usuario junto con la dirección y los teléfonos que traiga anidados
    pub async fn create_user(&self, dto: UserDTO) -> AppResult<UserDTO> {
        let candidate = checked_user(&dto)?;
        let address = dto
            .address_dto
            .as_ref()
            .map(|address| checked_address(address, 0))
            .transpose()?;
        let phones = dto
            .phones_dto
            .iter()
            .map(|phone| checked_phone(phone, 0))
            .collect::<AppResult<Vec<_>>>()?;
        if has_duplicated_numbers(phones.iter().map(|p| p.number.as_str())) {
            return Err(AppError::IllegalOperation(DUPLICATED_PHONE.to_string()));
        }

        let mut tx = self.store.begin().await?;
        ensure_cpf_available(tx.as_mut(), &candidate, None).await?;

        let user = tx.user_insert(&candidate).await.map_err(cpf_conflict)?;

        let address = match address {
            Some(mut address) => {
                address.user_id = user.user_id;
                Some(tx.address_insert(&address).await?)
            }
            None => None,
        };

        let mut saved_phones = Vec::with_capacity(phones.len());
        for mut phone in phones {
            phone.user_id = user.user_id;
            saved_phones.push(tx.phone_insert(&phone).await?);
        }

        tx.commit().await?;
        info!("✅ Usuario creado: {} {} (id {})", user.name, user.sur_name, user.user_id);

        Ok(UserDTO::from_parts(&user, address.as_ref(), &saved_phones))
    }

    /// Sobrescribe los campos escalares; dirección y teléfonos no se tocan
    pub async fn update_user(&self, user_id: i64, dto: UserDTO) -> AppResult<UserDTO> {
        let candidate = checked_user(&dto)?;

        let mut tx = self.store.begin().await?;
        let mut user = tx
            .user_find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.to_string()))?;

        ensure_cpf_available(tx.as_mut(), &candidate, Some(user_id)).await?;

        user.apply(&candidate);
        let user = tx.user_update(&user).await.map_err(cpf_conflict)?;
        let address = tx.address_find_by_user(user_id).await?;
        let phones = tx.phone_find_all_by_user(user_id).await?;

        tx.commit().await?;
        info!("✅ Usuario {} actualizado", user_id);

        Ok(UserDTO::from_parts(&user, address.as_ref(), &phones))
    }

    pub async fn get_user_by_id(&self, user_id: i64) -> AppResult<UserDTO> {
        let mut tx = self.store.begin_read_only().await?;
        let user = tx
            .user_find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.to_string()))?;
        let address = tx.address_find_by_user(user_id).await?;
        let phones = tx.phone_find_all_by_user(user_id).await?;
        tx.commit().await?;

        Ok(UserDTO::from_parts(&user, address.as_ref(), &phones))
    }

    pub async fn get_users(&self) -> AppResult<Vec<UserDTO>> {
        let mut tx = self.store.begin_read_only().await?;
        let users = tx.user_find_all().await?;
        if users.is_empty() {
            return Err(AppError::NotFound(USER_NOT_FOUND.to_string()));
        }
        let addresses = tx.address_find_all().await?;
        let phones = tx.phone_find_all().await?;
        tx.commit().await?;

        let result = users
            .iter()
            .map(|user| {
                let address = addresses.iter().find(|a| a.user_id == user.user_id);
                let owned: Vec<PhoneNumber> = phones
                    .iter()
                    .filter(|p| p.user_id == user.user_id)
                    .cloned()
                    .collect();
                UserDTO::from_parts(user, address, &owned)
            })
            .collect();

        Ok(result)
    }

    /// La dirección y los teléfonos del usuario caen en cascada
    pub async fn delete_user(&self, user_id: i64) -> AppResult<()> {
        let mut tx = self.store.begin().await?;
        tx.user_delete(user_id)
            .await
            .map_err(not_found(USER_NOT_FOUND))?;
        tx.commit().await?;

        info!("🗑️ Usuario {} eliminado", user_id);
        Ok(())
    }
}

pub(crate) fn checked_user(dto: &UserDTO) -> AppResult<NewUser> {
    let user = dto
        .to_new_user()
        .filter(is_user_complete)
        .ok_or_else(|| AppError::InvalidUserState(INVALID_USER.to_string()))?;
    user.validate()
        .map_err(|e| AppError::InvalidUserState(describe_errors(&e)))?;
    Ok(user)
}

/// El CPF no puede pertenecer a otro usuario, y nadie puede aparecer dos veces
/// con CPF distinto. Sobre el propio usuario solo se rechaza conservar la
/// identidad cambiando el CPF.
async fn ensure_cpf_available(
    tx: &mut dyn StoreTransaction,
    candidate: &NewUser,
    updating: Option<i64>,
) -> AppResult<()> {
    if let Some(owner) = tx.user_find_by_cpf(&candidate.cpf).await? {
        if Some(owner.user_id) != updating {
            warn!("⚠️ CPF ya registrado por el usuario {}", owner.user_id);
            return Err(AppError::CpfConflict(USER_CPF.to_string()));
        }
    }

    for existing in tx.user_find_all().await? {
        let inconsistent = if Some(existing.user_id) == updating {
            existing.same_identity(candidate) && !existing.same_cpf(candidate)
        } else {
            cpf_consistency(&existing, candidate) == CpfConsistency::Inconsistent
        };

        if inconsistent {
            warn!("⚠️ CPF inconsistente con el usuario {}", existing.user_id);
            return Err(AppError::CpfConflict(USER_CPF.to_string()));
        }
    }

    Ok(())
}

fn cpf_conflict(err: StoreError) -> AppError {
    match err {
        StoreError::UniqueViolation(_) => AppError::CpfConflict(USER_CPF.to_string()),
        StoreError::NotFound => AppError::NotFound(USER_NOT_FOUND.to_string()),
        other => AppError::from(other),
    }
}
