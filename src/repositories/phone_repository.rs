use async_trait::async_trait;

use crate::models::{NewPhoneNumber, PhoneNumber};
use crate::repositories::postgres::PgTransaction;
use crate::repositories::{StoreError, StoreResult};

#[async_trait]
pub trait PhoneRepository {
    /// Falla con `ForeignKeyViolation` si el usuario no existe
    async fn phone_insert(&mut self, phone: &NewPhoneNumber) -> StoreResult<PhoneNumber>;

    async fn phone_find_all_by_user(&mut self, user_id: i64) -> StoreResult<Vec<PhoneNumber>>;

    async fn phone_find_all(&mut self) -> StoreResult<Vec<PhoneNumber>>;

    /// Actualiza tipo y número de cada teléfono; `NotFound` si alguno ya no existe
    async fn phone_update_batch(&mut self, phones: &[PhoneNumber]) -> StoreResult<()>;

    async fn phone_delete(&mut self, phone_id: i64) -> StoreResult<()>;
}

const PHONE_COLUMNS: &str = "phone_id, phone_type, number, user_id";

#[async_trait]
impl PhoneRepository for PgTransaction {
    async fn phone_insert(&mut self, phone: &NewPhoneNumber) -> StoreResult<PhoneNumber> {
        let query = format!(
            r#"
            INSERT INTO phones (phone_type, number, user_id)
            VALUES ($1, $2, $3)
            RETURNING {}
            "#,
            PHONE_COLUMNS
        );

        let result = sqlx::query_as::<_, PhoneNumber>(&query)
            .bind(&phone.phone_type)
            .bind(&phone.number)
            .bind(phone.user_id)
            .fetch_one(self.conn())
            .await?;

        Ok(result)
    }

    async fn phone_find_all_by_user(&mut self, user_id: i64) -> StoreResult<Vec<PhoneNumber>> {
        let query = format!(
            "SELECT {} FROM phones WHERE user_id = $1 ORDER BY phone_id",
            PHONE_COLUMNS
        );

        let result = sqlx::query_as::<_, PhoneNumber>(&query)
            .bind(user_id)
            .fetch_all(self.conn())
            .await?;

        Ok(result)
    }

    async fn phone_find_all(&mut self) -> StoreResult<Vec<PhoneNumber>> {
        let query = format!("SELECT {} FROM phones ORDER BY phone_id", PHONE_COLUMNS);

        let result = sqlx::query_as::<_, PhoneNumber>(&query)
            .fetch_all(self.conn())
            .await?;

        Ok(result)
    }

    async fn phone_update_batch(&mut self, phones: &[PhoneNumber]) -> StoreResult<()> {
        for phone in phones {
            let result = sqlx::query(
                "UPDATE phones SET phone_type = $2, number = $3 WHERE phone_id = $1",
            )
            .bind(phone.phone_id)
            .bind(&phone.phone_type)
            .bind(&phone.number)
            .execute(self.conn())
            .await?;

            if result.rows_affected() == 0 {
                return Err(StoreError::NotFound);
            }
        }

        Ok(())
    }

    async fn phone_delete(&mut self, phone_id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM phones WHERE phone_id = $1")
            .bind(phone_id)
            .execute(self.conn())
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }
}
