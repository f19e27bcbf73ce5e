use sqlx::FromRow;
use validator::Validate;

use crate::utils::validation::{is_phone_valid, normalize_digits, validate_not_empty, validate_phone};

/// PhoneNumber - mapea a la tabla phones; dentro de un usuario la clave es `number`
#[derive(Debug, Clone, FromRow)]
pub struct PhoneNumber {
    pub phone_id: i64,
    pub phone_type: String,
    pub number: String,
    pub user_id: i64,
}

#[derive(Debug, Clone, Validate)]
pub struct NewPhoneNumber {
    #[validate(custom = "validate_not_empty")]
    pub phone_type: String,

    #[validate(custom = "validate_phone")]
    pub number: String,

    pub user_id: i64,
}

impl PhoneNumber {
    /// `(21) 96687-8776` y `21966878776` son el mismo número
    pub fn same_number(&self, number: &str) -> bool {
        normalize_digits(&self.number) == normalize_digits(number)
    }
}

pub fn is_phone_complete(phone: &NewPhoneNumber) -> bool {
    !phone.phone_type.trim().is_empty() && is_phone_valid(&phone.number)
}

/// Verifica que ningún número aparezca dos veces en el conjunto
pub fn has_duplicated_numbers<'a, I>(numbers: I) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = std::collections::HashSet::new();
    numbers
        .into_iter()
        .any(|number| !seen.insert(normalize_digits(number)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_complete() {
        let phone = NewPhoneNumber {
            phone_type: "Cel".to_string(),
            number: "(21) 96687-8776".to_string(),
            user_id: 1,
        };
        assert!(is_phone_complete(&phone));
        assert!(phone.validate().is_ok());

        let blank_type = NewPhoneNumber {
            phone_type: "".to_string(),
            ..phone.clone()
        };
        assert!(!is_phone_complete(&blank_type));

        let bad_number = NewPhoneNumber {
            number: "12345".to_string(),
            ..phone
        };
        assert!(!is_phone_complete(&bad_number));
        assert!(bad_number.validate().is_err());
    }

    #[test]
    fn test_same_number_ignores_format() {
        let phone = PhoneNumber {
            phone_id: 7,
            phone_type: "Cel".to_string(),
            number: "(21) 96687-8776".to_string(),
            user_id: 1,
        };
        assert!(phone.same_number("21966878776"));
        assert!(!phone.same_number("(21) 98966-2377"));
    }

    #[test]
    fn test_duplicated_numbers() {
        assert!(has_duplicated_numbers(["(21) 96687-8776", "21966878776"]));
        assert!(!has_duplicated_numbers(["(21) 96687-8776", "(21) 98966-2377"]));
    }
}
