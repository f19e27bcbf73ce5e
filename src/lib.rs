//! Registro de usuarios con dirección y teléfonos
//!
//! API HTTP+JSON sobre el agregado Usuario: una dirección opcional y un
//! conjunto de teléfonos por usuario, persistidos en PostgreSQL (o en memoria).

pub mod config;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::create_router;
pub use state::AppState;
