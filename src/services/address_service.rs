use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};
use validator::Validate;

use crate::dto::AddressDTO;
use crate::models::{is_address_complete, NewAddress, User};
use crate::repositories::{Store, StoreError, StoreTransaction};
use crate::services::not_found;
use crate::utils::errors::{
    AppError, AppResult, ADDRESS_NOT_FOUND, EXISTING_ADDRESS, INVALID_ADDRESS,
};
use crate::utils::validation::describe_errors;

/// Dirección única por usuario
pub struct AddressService {
    store: Arc<dyn Store>,
}

impl AddressService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create_address(&self, user_id: i64, dto: AddressDTO) -> AppResult<AddressDTO> {
        let candidate = checked_address(&dto, user_id)?;

        let mut tx = self.store.begin().await?;
        let user = find_owner(tx.as_mut(), user_id).await?;

        if tx.address_find_by_user(user_id).await?.is_some() {
            warn!("⚠️ El usuario {} ya tiene dirección", user_id);
            return Err(AppError::ConflictExistingAddress(EXISTING_ADDRESS.to_string()));
        }

        let address = tx
            .address_insert(&candidate)
            .await
            .map_err(|err| match err {
                StoreError::UniqueViolation(_) => {
                    AppError::ConflictExistingAddress(EXISTING_ADDRESS.to_string())
                }
                StoreError::ForeignKeyViolation(_) => {
                    AppError::NotFound(ADDRESS_NOT_FOUND.to_string())
                }
                other => AppError::from(other),
            })?;

        tx.commit().await?;
        info!("🏠 Dirección {} creada para el usuario {}", address.address_id, user_id);

        Ok(AddressDTO::from_address(&address, Some(&user)))
    }

    /// Sobrescribe los campos escalares; el dueño no cambia
    pub async fn update_address(&self, user_id: i64, dto: AddressDTO) -> AppResult<AddressDTO> {
        let candidate = checked_address(&dto, user_id)?;

        let mut tx = self.store.begin().await?;
        let user = find_owner(tx.as_mut(), user_id).await?;
        let mut address = tx
            .address_find_by_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(ADDRESS_NOT_FOUND.to_string()))?;

        address.apply(&candidate);
        let address = tx
            .address_update(&address)
            .await
            .map_err(not_found(ADDRESS_NOT_FOUND))?;

        tx.commit().await?;
        info!("🏠 Dirección del usuario {} actualizada", user_id);

        Ok(AddressDTO::from_address(&address, Some(&user)))
    }

    pub async fn get_address_by_user_id(&self, user_id: i64) -> AppResult<AddressDTO> {
        let mut tx = self.store.begin_read_only().await?;
        let user = find_owner(tx.as_mut(), user_id).await?;
        let address = tx
            .address_find_by_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(ADDRESS_NOT_FOUND.to_string()))?;
        tx.commit().await?;

        Ok(AddressDTO::from_address(&address, Some(&user)))
    }

    /// Todas las direcciones con su dueño
    pub async fn get_adresses(&self) -> AppResult<Vec<AddressDTO>> {
        let mut tx = self.store.begin_read_only().await?;
        let addresses = tx.address_find_all().await?;
        if addresses.is_empty() {
            return Err(AppError::NotFound(ADDRESS_NOT_FOUND.to_string()));
        }
        let owners: HashMap<i64, User> = tx
            .user_find_all()
            .await?
            .into_iter()
            .map(|user| (user.user_id, user))
            .collect();
        tx.commit().await?;

        Ok(addresses
            .iter()
            .map(|address| AddressDTO::from_address(address, owners.get(&address.user_id)))
            .collect())
    }

    /// Quita la dirección; el usuario sigue existiendo
    pub async fn delete_address(&self, user_id: i64) -> AppResult<()> {
        let mut tx = self.store.begin().await?;
        find_owner(tx.as_mut(), user_id).await?;
        let address = tx
            .address_find_by_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(ADDRESS_NOT_FOUND.to_string()))?;

        tx.address_delete(address.address_id)
            .await
            .map_err(not_found(ADDRESS_NOT_FOUND))?;
        tx.commit().await?;

        info!("🗑️ Dirección del usuario {} eliminada", user_id);
        Ok(())
    }
}

pub(crate) fn checked_address(dto: &AddressDTO, user_id: i64) -> AppResult<NewAddress> {
    let address = dto
        .to_new_address(user_id)
        .filter(is_address_complete)
        .ok_or_else(|| AppError::InvalidAddressState(INVALID_ADDRESS.to_string()))?;
    address
        .validate()
        .map_err(|e| AppError::InvalidAddressState(describe_errors(&e)))?;
    Ok(address)
}

async fn find_owner(tx: &mut dyn StoreTransaction, user_id: i64) -> AppResult<User> {
    tx.user_find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(ADDRESS_NOT_FOUND.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures::{glasshouse, lula, store};
    use crate::services::UserService;

    async fn setup() -> (AddressService, UserService, i64) {
        let store = store();
        let users = UserService::new(store.clone());
        let user_id = users.create_user(lula()).await.unwrap().user_id;
        (AddressService::new(store), users, user_id)
    }

    #[tokio::test]
    async fn test_one_address_per_user() {
        let (service, _, user_id) = setup().await;

        let created = service.create_address(user_id, glasshouse()).await.unwrap();
        assert_ne!(created.address_id, 0);
        assert_eq!(created.user_dto.as_ref().map(|u| u.user_id), Some(user_id));

        let err = service.create_address(user_id, glasshouse()).await.unwrap_err();
        assert!(matches!(err, AppError::ConflictExistingAddress(_)));
    }

    #[tokio::test]
    async fn test_missing_user_or_fields() {
        let (service, _, user_id) = setup().await;

        let err = service.create_address(999, glasshouse()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let no_city = AddressDTO {
            city: None,
            ..glasshouse()
        };
        let err = service.create_address(user_id, no_city).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidAddressState(_)));

        let bad_zip = AddressDTO {
            zip_code: Some("69-069".to_string()),
            ..glasshouse()
        };
        let err = service.create_address(user_id, bad_zip).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidAddressState(_)));
    }

    #[tokio::test]
    async fn test_update_keeps_identity() {
        let (service, _, user_id) = setup().await;
        let created = service.create_address(user_id, glasshouse()).await.unwrap();

        let moved = AddressDTO {
            city: Some("Brasília".to_string()),
            state: Some("DF".to_string()),
            complement: None,
            ..glasshouse()
        };
        let updated = service.update_address(user_id, moved).await.unwrap();
        assert_eq!(updated.address_id, created.address_id);
        assert_eq!(updated.city.as_deref(), Some("Brasília"));
        assert!(updated.complement.is_none());

        let fetched = service.get_address_by_user_id(user_id).await.unwrap();
        assert_eq!(fetched, updated);
    }

    #[tokio::test]
    async fn test_update_without_address() {
        let (service, _, user_id) = setup().await;
        let err = service.update_address(user_id, glasshouse()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_detaches_from_user() {
        let (service, users, user_id) = setup().await;
        assert!(matches!(service.get_adresses().await, Err(AppError::NotFound(_))));

        service.create_address(user_id, glasshouse()).await.unwrap();
        assert_eq!(service.get_adresses().await.unwrap().len(), 1);

        service.delete_address(user_id).await.unwrap();
        assert!(matches!(
            service.get_address_by_user_id(user_id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.delete_address(user_id).await,
            Err(AppError::NotFound(_))
        ));

        let user = users.get_user_by_id(user_id).await.unwrap();
        assert!(user.address_dto.is_none());

        // La dirección puede volver a crearse
        service.create_address(user_id, glasshouse()).await.unwrap();
    }
}
