use async_trait::async_trait;

use crate::models::{NewUser, User};
use crate::repositories::postgres::PgTransaction;
use crate::repositories::{StoreError, StoreResult};
use crate::utils::validation::normalize_digits;

#[async_trait]
pub trait UserRepository {
    async fn user_insert(&mut self, user: &NewUser) -> StoreResult<User>;

    async fn user_find_by_id(&mut self, user_id: i64) -> StoreResult<Option<User>>;

    /// Compara solo los dígitos del CPF
    async fn user_find_by_cpf(&mut self, cpf: &str) -> StoreResult<Option<User>>;

    async fn user_find_all(&mut self) -> StoreResult<Vec<User>>;

    async fn user_update(&mut self, user: &User) -> StoreResult<User>;

    /// Borra el usuario; dirección y teléfonos caen en cascada
    async fn user_delete(&mut self, user_id: i64) -> StoreResult<()>;
}

const USER_COLUMNS: &str = "user_id, name, sur_name, birth_date, cpf, email";

#[async_trait]
impl UserRepository for PgTransaction {
    async fn user_insert(&mut self, user: &NewUser) -> StoreResult<User> {
        let query = format!(
            r#"
            INSERT INTO users (name, sur_name, birth_date, cpf, email)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        let result = sqlx::query_as::<_, User>(&query)
            .bind(&user.name)
            .bind(&user.sur_name)
            .bind(user.birth_date)
            .bind(&user.cpf)
            .bind(&user.email)
            .fetch_one(self.conn())
            .await?;

        Ok(result)
    }

    async fn user_find_by_id(&mut self, user_id: i64) -> StoreResult<Option<User>> {
        let query = format!("SELECT {} FROM users WHERE user_id = $1", USER_COLUMNS);

        let result = sqlx::query_as::<_, User>(&query)
            .bind(user_id)
            .fetch_optional(self.conn())
            .await?;

        Ok(result)
    }

    async fn user_find_by_cpf(&mut self, cpf: &str) -> StoreResult<Option<User>> {
        let query = format!(
            "SELECT {} FROM users WHERE regexp_replace(cpf, '[^0-9]', '', 'g') = $1",
            USER_COLUMNS
        );

        let result = sqlx::query_as::<_, User>(&query)
            .bind(normalize_digits(cpf))
            .fetch_optional(self.conn())
            .await?;

        Ok(result)
    }

    async fn user_find_all(&mut self) -> StoreResult<Vec<User>> {
        let query = format!("SELECT {} FROM users ORDER BY user_id", USER_COLUMNS);

        let result = sqlx::query_as::<_, User>(&query)
            .fetch_all(self.conn())
            .await?;

        Ok(result)
    }

    async fn user_update(&mut self, user: &User) -> StoreResult<User> {
        let query = format!(
            r#"
            UPDATE users
            SET name = $2, sur_name = $3, birth_date = $4, cpf = $5, email = $6
            WHERE user_id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&query)
            .bind(user.user_id)
            .bind(&user.name)
            .bind(&user.sur_name)
            .bind(user.birth_date)
            .bind(&user.cpf)
            .bind(&user.email)
            .fetch_optional(self.conn())
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn user_delete(&mut self, user_id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id)
            .execute(self.conn())
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }
}
