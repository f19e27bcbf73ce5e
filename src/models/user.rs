//! Modelo de User
//!
//! Este módulo contiene el struct User que mapea a la tabla `users`, el
//! candidato de inserción `NewUser` y las reglas de consistencia del CPF.

use chrono::NaiveDate;
use sqlx::FromRow;
use validator::Validate;

use crate::utils::validation::{normalize_digits, validate_cpf, validate_email, validate_not_empty};

/// User - mapea exactamente a la tabla users
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct User {
    pub user_id: i64,
    pub name: String,
    pub sur_name: String,
    pub birth_date: NaiveDate,
    pub cpf: String,
    pub email: String,
}

/// Datos de un usuario todavía no persistido (o los nuevos valores de uno existente)
#[derive(Debug, Clone, Validate)]
pub struct NewUser {
    #[validate(custom = "validate_not_empty")]
    pub name: String,

    #[validate(custom = "validate_not_empty")]
    pub sur_name: String,

    pub birth_date: NaiveDate,

    #[validate(custom = "validate_cpf")]
    pub cpf: String,

    #[validate(custom = "validate_email")]
    pub email: String,
}

impl User {
    /// Sobrescribe los campos escalares; el id no cambia
    pub fn apply(&mut self, changes: &NewUser) {
        self.name = changes.name.clone();
        self.sur_name = changes.sur_name.clone();
        self.birth_date = changes.birth_date;
        self.cpf = changes.cpf.clone();
        self.email = changes.email.clone();
    }

    pub fn same_identity(&self, candidate: &NewUser) -> bool {
        self.name == candidate.name
            && self.sur_name == candidate.sur_name
            && self.birth_date == candidate.birth_date
            && self.email == candidate.email
    }

    pub fn same_cpf(&self, candidate: &NewUser) -> bool {
        normalize_digits(&self.cpf) == normalize_digits(&candidate.cpf)
    }
}

/// Todos los campos obligatorios presentes y con contenido
pub fn is_user_complete(user: &NewUser) -> bool {
    [&user.name, &user.sur_name, &user.cpf, &user.email]
        .iter()
        .all(|field| !field.trim().is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpfConsistency {
    Consistent,
    Inconsistent,
}

/// La misma persona con otro CPF, o otra persona con el mismo CPF, es inconsistente
pub fn cpf_consistency(existing: &User, candidate: &NewUser) -> CpfConsistency {
    let same_identity = existing.same_identity(candidate);
    let same_cpf = existing.same_cpf(candidate);

    if same_identity != same_cpf {
        CpfConsistency::Inconsistent
    } else {
        CpfConsistency::Consistent
    }
}
