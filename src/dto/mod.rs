//! DTOs de la API
//!
//! Formas externas (JSON) de usuarios, direcciones y teléfonos. La proyección
//! desde los modelos omite la referencia al dueño cuando el dueño es el objeto
//! que la contiene, así el JSON nunca tiene ciclos.

pub mod address_dto;
pub mod date_format;
pub mod phone_dto;
pub mod user_dto;

pub use address_dto::AddressDTO;
pub use phone_dto::PhoneNumberDTO;
pub use user_dto::UserDTO;
