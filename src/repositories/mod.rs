//! Repositorios
//!
//! Operaciones tipadas sobre el almacén relacional para usuarios, direcciones y
//! teléfonos. Toda operación corre dentro de una transacción abierta con
//! [`Store::begin`] (o [`Store::begin_read_only`]); la transacción se confirma con
//! [`StoreTransaction::commit`] y se descarta si se suelta sin confirmar.

pub mod address_repository;
pub mod memory;
pub mod phone_repository;
pub mod postgres;
pub mod user_repository;

use async_trait::async_trait;
use thiserror::Error;

pub use address_repository::AddressRepository;
pub use memory::MemoryStore;
pub use phone_repository::PhoneRepository;
pub use postgres::PgStore;
pub use user_repository::UserRepository;

/// Errores del almacén; nunca exponen tipos propios del driver
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("row not found")]
    NotFound,

    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("foreign key violated: {0}")]
    ForeignKeyViolation(String),

    #[error("database error: {0}")]
    Database(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Una transacción abierta con todas las operaciones del gateway
#[async_trait]
pub trait StoreTransaction: UserRepository + AddressRepository + PhoneRepository + Send {
    async fn commit(self: Box<Self>) -> StoreResult<()>;
}

/// Punto de entrada al almacén, compartido por todo el proceso
#[async_trait]
pub trait Store: Send + Sync {
    async fn begin(&self) -> StoreResult<Box<dyn StoreTransaction>>;

    async fn begin_read_only(&self) -> StoreResult<Box<dyn StoreTransaction>>;
}
