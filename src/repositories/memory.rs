//! Almacén en memoria
//!
//! Mismo contrato que PostgreSQL: identificadores asignados por el almacén,
//! unicidad de CPF (por dígitos), una dirección por usuario, números únicos por
//! usuario, claves foráneas y borrado en cascada. Las transacciones se
//! serializan: cada una trabaja sobre una copia del estado y `commit` la publica.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::models::{Address, NewAddress, NewPhoneNumber, NewUser, PhoneNumber, User};
use crate::repositories::{
    AddressRepository, PhoneRepository, Store, StoreError, StoreResult, StoreTransaction,
    UserRepository,
};
use crate::utils::validation::normalize_digits;

#[derive(Debug, Clone, Default)]
struct MemoryState {
    users: BTreeMap<i64, User>,
    addresses: BTreeMap<i64, Address>,
    phones: BTreeMap<i64, PhoneNumber>,
    last_user_id: i64,
    last_address_id: i64,
    last_phone_id: i64,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn open(&self, read_only: bool) -> MemoryTransaction {
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();
        MemoryTransaction {
            guard,
            working,
            read_only,
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn begin(&self) -> StoreResult<Box<dyn StoreTransaction>> {
        Ok(Box::new(self.open(false).await))
    }

    async fn begin_read_only(&self) -> StoreResult<Box<dyn StoreTransaction>> {
        Ok(Box::new(self.open(true).await))
    }
}

pub struct MemoryTransaction {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
    read_only: bool,
}

impl MemoryTransaction {
    fn writable(&self) -> StoreResult<()> {
        if self.read_only {
            return Err(StoreError::Database(
                "cannot execute write in a read-only transaction".to_string(),
            ));
        }
        Ok(())
    }

    fn require_user(&self, user_id: i64, constraint: &str) -> StoreResult<()> {
        if !self.working.users.contains_key(&user_id) {
            return Err(StoreError::ForeignKeyViolation(constraint.to_string()));
        }
        Ok(())
    }

    fn cpf_taken(&self, cpf: &str, except: Option<i64>) -> bool {
        let digits = normalize_digits(cpf);
        self.working
            .users
            .values()
            .any(|u| Some(u.user_id) != except && normalize_digits(&u.cpf) == digits)
    }

    fn number_taken(&self, user_id: i64, number: &str, except: Option<i64>) -> bool {
        self.working.phones.values().any(|p| {
            p.user_id == user_id && Some(p.phone_id) != except && p.same_number(number)
        })
    }
}

#[async_trait]
impl StoreTransaction for MemoryTransaction {
    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let MemoryTransaction {
            mut guard, working, ..
        } = *self;
        *guard = working;
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MemoryTransaction {
    async fn user_insert(&mut self, user: &NewUser) -> StoreResult<User> {
        self.writable()?;
        if self.cpf_taken(&user.cpf, None) {
            return Err(StoreError::UniqueViolation("users_cpf_key".to_string()));
        }

        self.working.last_user_id += 1;
        let saved = User {
            user_id: self.working.last_user_id,
            name: user.name.clone(),
            sur_name: user.sur_name.clone(),
            birth_date: user.birth_date,
            cpf: user.cpf.clone(),
            email: user.email.clone(),
        };
        self.working.users.insert(saved.user_id, saved.clone());
        Ok(saved)
    }

    async fn user_find_by_id(&mut self, user_id: i64) -> StoreResult<Option<User>> {
        Ok(self.working.users.get(&user_id).cloned())
    }

    async fn user_find_by_cpf(&mut self, cpf: &str) -> StoreResult<Option<User>> {
        let digits = normalize_digits(cpf);
        Ok(self
            .working
            .users
            .values()
            .find(|u| normalize_digits(&u.cpf) == digits)
            .cloned())
    }

    async fn user_find_all(&mut self) -> StoreResult<Vec<User>> {
        Ok(self.working.users.values().cloned().collect())
    }

    async fn user_update(&mut self, user: &User) -> StoreResult<User> {
        self.writable()?;
        if !self.working.users.contains_key(&user.user_id) {
            return Err(StoreError::NotFound);
        }
        if self.cpf_taken(&user.cpf, Some(user.user_id)) {
            return Err(StoreError::UniqueViolation("users_cpf_key".to_string()));
        }

        self.working.users.insert(user.user_id, user.clone());
        Ok(user.clone())
    }

    async fn user_delete(&mut self, user_id: i64) -> StoreResult<()> {
        self.writable()?;
        if self.working.users.remove(&user_id).is_none() {
            return Err(StoreError::NotFound);
        }

        // ON DELETE CASCADE
        self.working.addresses.retain(|_, a| a.user_id != user_id);
        self.working.phones.retain(|_, p| p.user_id != user_id);
        Ok(())
    }
}

#[async_trait]
impl AddressRepository for MemoryTransaction {
    async fn address_insert(&mut self, address: &NewAddress) -> StoreResult<Address> {
        self.writable()?;
        self.require_user(address.user_id, "addresses_user_id_fkey")?;
        if self
            .working
            .addresses
            .values()
            .any(|a| a.user_id == address.user_id)
        {
            return Err(StoreError::UniqueViolation("addresses_user_id_key".to_string()));
        }

        self.working.last_address_id += 1;
        let saved = Address {
            address_id: self.working.last_address_id,
            public_place: address.public_place.clone(),
            street_address: address.street_address.clone(),
            complement: address.complement.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            zip_code: address.zip_code.clone(),
            user_id: address.user_id,
        };
        self.working.addresses.insert(saved.address_id, saved.clone());
        Ok(saved)
    }

    async fn address_find_by_user(&mut self, user_id: i64) -> StoreResult<Option<Address>> {
        Ok(self
            .working
            .addresses
            .values()
            .find(|a| a.user_id == user_id)
            .cloned())
    }

    async fn address_find_all(&mut self) -> StoreResult<Vec<Address>> {
        Ok(self.working.addresses.values().cloned().collect())
    }

    async fn address_update(&mut self, address: &Address) -> StoreResult<Address> {
        self.writable()?;
        let stored = self
            .working
            .addresses
            .get_mut(&address.address_id)
            .ok_or(StoreError::NotFound)?;

        // user_id no forma parte del UPDATE
        let user_id = stored.user_id;
        *stored = Address {
            user_id,
            ..address.clone()
        };
        Ok(stored.clone())
    }

    async fn address_delete(&mut self, address_id: i64) -> StoreResult<()> {
        self.writable()?;
        self.working
            .addresses
            .remove(&address_id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl PhoneRepository for MemoryTransaction {
    async fn phone_insert(&mut self, phone: &NewPhoneNumber) -> StoreResult<PhoneNumber> {
        self.writable()?;
        self.require_user(phone.user_id, "phones_user_id_fkey")?;
        if self.number_taken(phone.user_id, &phone.number, None) {
            return Err(StoreError::UniqueViolation(
                "phones_user_id_number_digits_key".to_string(),
            ));
        }

        self.working.last_phone_id += 1;
        let saved = PhoneNumber {
            phone_id: self.working.last_phone_id,
            phone_type: phone.phone_type.clone(),
            number: phone.number.clone(),
            user_id: phone.user_id,
        };
        self.working.phones.insert(saved.phone_id, saved.clone());
        Ok(saved)
    }

    async fn phone_find_all_by_user(&mut self, user_id: i64) -> StoreResult<Vec<PhoneNumber>> {
        Ok(self
            .working
            .phones
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn phone_find_all(&mut self) -> StoreResult<Vec<PhoneNumber>> {
        Ok(self.working.phones.values().cloned().collect())
    }

    async fn phone_update_batch(&mut self, phones: &[PhoneNumber]) -> StoreResult<()> {
        self.writable()?;
        for phone in phones {
            let user_id = self
                .working
                .phones
                .get(&phone.phone_id)
                .map(|p| p.user_id)
                .ok_or(StoreError::NotFound)?;
            if self.number_taken(user_id, &phone.number, Some(phone.phone_id)) {
                return Err(StoreError::UniqueViolation(
                    "phones_user_id_number_digits_key".to_string(),
                ));
            }
            if let Some(stored) = self.working.phones.get_mut(&phone.phone_id) {
                stored.phone_type = phone.phone_type.clone();
                stored.number = phone.number.clone();
            }
        }
        Ok(())
    }

    async fn phone_delete(&mut self, phone_id: i64) -> StoreResult<()> {
        self.writable()?;
        self.working
            .phones
            .remove(&phone_id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn new_user(cpf: &str) -> NewUser {
        NewUser {
            name: "Luiz Inacio".to_string(),
            sur_name: "da Silva".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1972, 2, 22).unwrap(),
            cpf: cpf.to_string(),
            email: "lula@prov.com".to_string(),
        }
    }

    fn new_phone(user_id: i64, number: &str) -> NewPhoneNumber {
        NewPhoneNumber {
            phone_type: "Cel".to_string(),
            number: number.to_string(),
            user_id,
        }
    }

    #[tokio::test]
    async fn test_commit_publishes_and_drop_discards() {
        let store = MemoryStore::new();

        let mut tx = store.begin().await.unwrap();
        tx.user_insert(&new_user("123.456.789-10")).await.unwrap();
        drop(tx);

        let mut tx = store.begin_read_only().await.unwrap();
        assert!(tx.user_find_all().await.unwrap().is_empty());
        drop(tx);

        let mut tx = store.begin().await.unwrap();
        let saved = tx.user_insert(&new_user("123.456.789-10")).await.unwrap();
        tx.commit().await.unwrap();

        let mut tx = store.begin_read_only().await.unwrap();
        assert_eq!(tx.user_find_by_id(saved.user_id).await.unwrap(), Some(saved));
    }

    #[tokio::test]
    async fn test_cpf_unique_by_digits() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        tx.user_insert(&new_user("123.456.789-10")).await.unwrap();

        let err = tx.user_insert(&new_user("12345678910")).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation(_)));
        assert!(tx.user_find_by_cpf("12345678910").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_foreign_keys_and_cascade() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();

        let err = tx.phone_insert(&new_phone(42, "(21) 96687-8776")).await.unwrap_err();
        assert!(matches!(err, StoreError::ForeignKeyViolation(_)));

        let user = tx.user_insert(&new_user("123.456.789-10")).await.unwrap();
        tx.phone_insert(&new_phone(user.user_id, "(21) 96687-8776")).await.unwrap();
        tx.address_insert(&NewAddress {
            public_place: "Avenida".to_string(),
            street_address: "Glasshouse, 69".to_string(),
            complement: None,
            city: "Rio".to_string(),
            state: "RJ".to_string(),
            zip_code: "69.069-069".to_string(),
            user_id: user.user_id,
        })
        .await
        .unwrap();

        tx.user_delete(user.user_id).await.unwrap();
        assert!(tx.address_find_all().await.unwrap().is_empty());
        assert!(tx.phone_find_all().await.unwrap().is_empty());
        assert_eq!(tx.user_delete(user.user_id).await, Err(StoreError::NotFound));
    }

    #[tokio::test]
    async fn test_phone_number_unique_within_user() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let user = tx.user_insert(&new_user("123.456.789-10")).await.unwrap();

        tx.phone_insert(&new_phone(user.user_id, "(21) 96687-8776")).await.unwrap();
        let err = tx
            .phone_insert(&new_phone(user.user_id, "21966878776"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation(_)));
    }

    #[tokio::test]
    async fn test_read_only_rejects_writes() {
        let store = MemoryStore::new();
        let mut tx = store.begin_read_only().await.unwrap();
        let err = tx.user_insert(&new_user("123.456.789-10")).await.unwrap_err();
        assert!(matches!(err, StoreError::Database(_)));
    }
}
