use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::dto::UserDTO;
use crate::models::{NewPhoneNumber, PhoneNumber, User};
use crate::utils::validation::normalize_digits;

/// Dos teléfonos son iguales si tienen el mismo número, sin importar id ni tipo
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneNumberDTO {
    /// Opcional en la creación; PUT y DELETE lo exigen
    #[serde(default)]
    pub phone_id: Option<i64>,
    #[serde(rename = "type")]
    pub phone_type: Option<String>,
    pub number: Option<String>,
    #[serde(rename = "userDTO", default, skip_serializing_if = "Option::is_none")]
    pub user_dto: Option<Box<UserDTO>>,
}

impl PhoneNumberDTO {
    pub fn from_phone(phone: &PhoneNumber, owner: Option<&User>) -> Self {
        Self {
            phone_id: Some(phone.phone_id),
            phone_type: Some(phone.phone_type.clone()),
            number: Some(phone.number.clone()),
            user_dto: owner.map(|user| Box::new(UserDTO::summary(user))),
        }
    }

    pub fn to_new_phone(&self, user_id: i64) -> Option<NewPhoneNumber> {
        Some(NewPhoneNumber {
            phone_type: self.phone_type.clone()?,
            number: self.number.clone()?,
            user_id,
        })
    }

    fn number_key(&self) -> Option<String> {
        self.number.as_deref().map(normalize_digits)
    }
}

impl PartialEq for PhoneNumberDTO {
    fn eq(&self, other: &Self) -> bool {
        self.number_key() == other.number_key()
    }
}

impl Eq for PhoneNumberDTO {}

impl Hash for PhoneNumberDTO {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.number_key().hash(state);
    }
}
