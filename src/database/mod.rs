//! Módulo de base de datos
//!
//! Maneja la conexión y el schema de PostgreSQL

pub mod connection;
pub mod schema;

pub use connection::{mask_database_url, DatabaseConnection};
