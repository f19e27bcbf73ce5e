use async_trait::async_trait;

use crate::models::{Address, NewAddress};
use crate::repositories::postgres::PgTransaction;
use crate::repositories::{StoreError, StoreResult};

#[async_trait]
pub trait AddressRepository {
    /// Falla con `ForeignKeyViolation` si el usuario no existe
    async fn address_insert(&mut self, address: &NewAddress) -> StoreResult<Address>;

    async fn address_find_by_user(&mut self, user_id: i64) -> StoreResult<Option<Address>>;

    async fn address_find_all(&mut self) -> StoreResult<Vec<Address>>;

    async fn address_update(&mut self, address: &Address) -> StoreResult<Address>;

    async fn address_delete(&mut self, address_id: i64) -> StoreResult<()>;
}

const ADDRESS_COLUMNS: &str =
    "address_id, public_place, street_address, complement, city, state, zip_code, user_id";

#[async_trait]
impl AddressRepository for PgTransaction {
    async fn address_insert(&mut self, address: &NewAddress) -> StoreResult<Address> {
        let query = format!(
            r#"
            INSERT INTO addresses (public_place, street_address, complement, city, state, zip_code, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            ADDRESS_COLUMNS
        );

        let result = sqlx::query_as::<_, Address>(&query)
            .bind(&address.public_place)
            .bind(&address.street_address)
            .bind(&address.complement)
            .bind(&address.city)
            .bind(&address.state)
            .bind(&address.zip_code)
            .bind(address.user_id)
            .fetch_one(self.conn())
            .await?;

        Ok(result)
    }

    async fn address_find_by_user(&mut self, user_id: i64) -> StoreResult<Option<Address>> {
        let query = format!("SELECT {} FROM addresses WHERE user_id = $1", ADDRESS_COLUMNS);

        let result = sqlx::query_as::<_, Address>(&query)
            .bind(user_id)
            .fetch_optional(self.conn())
            .await?;

        Ok(result)
    }

    async fn address_find_all(&mut self) -> StoreResult<Vec<Address>> {
        let query = format!("SELECT {} FROM addresses ORDER BY address_id", ADDRESS_COLUMNS);

        let result = sqlx::query_as::<_, Address>(&query)
            .fetch_all(self.conn())
            .await?;

        Ok(result)
    }

    async fn address_update(&mut self, address: &Address) -> StoreResult<Address> {
        let query = format!(
            r#"
            UPDATE addresses
            SET public_place = $2, street_address = $3, complement = $4, city = $5, state = $6, zip_code = $7
            WHERE address_id = $1
            RETURNING {}
            "#,
            ADDRESS_COLUMNS
        );

        sqlx::query_as::<_, Address>(&query)
            .bind(address.address_id)
            .bind(&address.public_place)
            .bind(&address.street_address)
            .bind(&address.complement)
            .bind(&address.city)
            .bind(&address.state)
            .bind(&address.zip_code)
            .fetch_optional(self.conn())
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn address_delete(&mut self, address_id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM addresses WHERE address_id = $1")
            .bind(address_id)
            .execute(self.conn())
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }
}
