use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::dto::{AddressDTO, PhoneNumberDTO};
use crate::models::{Address, NewUser, PhoneNumber, User};

/// Forma externa del usuario: embebe su dirección y sus teléfonos sin back-ref
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDTO {
    #[serde(default)]
    pub user_id: i64,
    pub name: Option<String>,
    pub sur_name: Option<String>,
    #[serde(default, with = "crate::dto::date_format")]
    pub birth_date: Option<NaiveDate>,
    pub cpf: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "addressDTO", default)]
    pub address_dto: Option<AddressDTO>,
    #[serde(rename = "phonesDTO", default, deserialize_with = "null_as_empty")]
    pub phones_dto: Vec<PhoneNumberDTO>,
}

/// `"phonesDTO": null` equivale a no mandar teléfonos
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<PhoneNumberDTO>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<PhoneNumberDTO>>::deserialize(deserializer)?.unwrap_or_default())
}

impl UserDTO {
    pub fn from_parts(user: &User, address: Option<&Address>, phones: &[PhoneNumber]) -> Self {
        Self {
            address_dto: address.map(|a| AddressDTO::from_address(a, None)),
            phones_dto: phones
                .iter()
                .map(|p| PhoneNumberDTO::from_phone(p, None))
                .collect(),
            ..Self::summary(user)
        }
    }

    /// Solo los campos escalares; es la referencia al dueño dentro de una
    /// dirección o un teléfono pedidos por separado
    pub fn summary(user: &User) -> Self {
        Self {
            user_id: user.user_id,
            name: Some(user.name.clone()),
            sur_name: Some(user.sur_name.clone()),
            birth_date: Some(user.birth_date),
            cpf: Some(user.cpf.clone()),
            email: Some(user.email.clone()),
            address_dto: None,
            phones_dto: Vec::new(),
        }
    }

    /// `None` si falta algún campo obligatorio
    pub fn to_new_user(&self) -> Option<NewUser> {
        Some(NewUser {
            name: self.name.clone()?,
            sur_name: self.sur_name.clone()?,
            birth_date: self.birth_date?,
            cpf: self.cpf.clone()?,
            email: self.email.clone()?,
        })
    }
}
