//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos que mapean al schema PostgreSQL
//! (`users`, `addresses`, `phones`) y los predicados de negocio sobre ellos.

pub mod address;
pub mod phone;
pub mod user;

pub use address::{is_address_complete, Address, NewAddress};
pub use phone::{has_duplicated_numbers, is_phone_complete, NewPhoneNumber, PhoneNumber};
pub use user::{cpf_consistency, is_user_complete, CpfConsistency, NewUser, User};
