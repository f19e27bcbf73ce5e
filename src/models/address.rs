use sqlx::FromRow;
use validator::Validate;

use crate::utils::validation::{is_zip_valid, validate_not_empty, validate_zip_code};

/// Address - mapea a la tabla addresses; `user_id` es la referencia al dueño
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Address {
    pub address_id: i64,
    pub public_place: String,
    pub street_address: String,
    pub complement: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub user_id: i64,
}

#[derive(Debug, Clone, Validate)]
pub struct NewAddress {
    #[validate(custom = "validate_not_empty")]
    pub public_place: String,

    #[validate(custom = "validate_not_empty")]
    pub street_address: String,

    pub complement: Option<String>,

    #[validate(custom = "validate_not_empty")]
    pub city: String,

    #[validate(custom = "validate_not_empty")]
    pub state: String,

    #[validate(custom = "validate_zip_code")]
    pub zip_code: String,

    pub user_id: i64,
}

impl Address {
    /// Sobrescribe los campos escalares; el dueño no cambia
    pub fn apply(&mut self, changes: &NewAddress) {
        self.public_place = changes.public_place.clone();
        self.street_address = changes.street_address.clone();
        self.complement = changes.complement.clone();
        self.city = changes.city.clone();
        self.state = changes.state.clone();
        self.zip_code = changes.zip_code.clone();
    }
}

pub fn is_address_complete(address: &NewAddress) -> bool {
    [
        &address.public_place,
        &address.street_address,
        &address.city,
        &address.state,
    ]
    .iter()
    .all(|field| !field.trim().is_empty())
        && is_zip_valid(&address.zip_code)
}
