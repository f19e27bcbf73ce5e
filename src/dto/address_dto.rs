use serde::{Deserialize, Serialize};

use crate::dto::UserDTO;
use crate::models::{Address, NewAddress, User};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressDTO {
    #[serde(default)]
    pub address_id: i64,
    pub public_place: Option<String>,
    pub street_address: Option<String>,
    pub complement: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    /// Se omite cuando la dirección va dentro de su propio usuario
    #[serde(rename = "userDTO", default, skip_serializing_if = "Option::is_none")]
    pub user_dto: Option<Box<UserDTO>>,
}

impl AddressDTO {
    pub fn from_address(address: &Address, owner: Option<&User>) -> Self {
        Self {
            address_id: address.address_id,
            public_place: Some(address.public_place.clone()),
            street_address: Some(address.street_address.clone()),
            complement: address.complement.clone(),
            city: Some(address.city.clone()),
            state: Some(address.state.clone()),
            zip_code: Some(address.zip_code.clone()),
            user_dto: owner.map(|user| Box::new(UserDTO::summary(user))),
        }
    }

    pub fn to_new_address(&self, user_id: i64) -> Option<NewAddress> {
        Some(NewAddress {
            public_place: self.public_place.clone()?,
            street_address: self.street_address.clone()?,
            complement: self.complement.clone(),
            city: self.city.clone()?,
            state: self.state.clone()?,
            zip_code: self.zip_code.clone()?,
            user_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn test_standalone_address_carries_owner() {
        let owner = User {
            user_id: 7,
            name: "Luiz Inacio".to_string(),
            sur_name: "da Silva".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1972, 2, 22).unwrap(),
            cpf: "123.456.789-10".to_string(),
            email: "lula@prov.com".to_string(),
        };
        let address = Address {
            address_id: 3,
            public_place: "Avenida".to_string(),
            street_address: "Glasshouse, 69".to_string(),
            complement: None,
            city: "Rio".to_string(),
            state: "RJ".to_string(),
            zip_code: "69.069-069".to_string(),
            user_id: 7,
        };

        let value = serde_json::to_value(AddressDTO::from_address(&address, Some(&owner))).unwrap();
        assert_eq!(value["addressId"], 3);
        assert_eq!(value["streetAddress"], "Glasshouse, 69");
        assert!(value["complement"].is_null());
        assert_eq!(value["userDTO"]["userId"], 7);
        assert!(value["userDTO"]["addressDTO"].is_null());
    }

    #[test]
    fn test_complement_is_not_required() {
        let dto: AddressDTO = serde_json::from_value(json!({
            "addressId": 0,
            "publicPlace": "Avenida",
            "streetAddress": "Glasshouse, 69",
            "city": "Rio",
            "state": "RJ",
            "zipCode": "69.069-069"
        }))
        .unwrap();

        let address = dto.to_new_address(9).unwrap();
        assert_eq!(address.user_id, 9);
        assert!(address.complement.is_none());

        let dto = AddressDTO {
            city: None,
            ..dto
        };
        assert!(dto.to_new_address(9).is_none());
    }
}
