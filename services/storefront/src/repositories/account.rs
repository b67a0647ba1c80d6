//! Account repository for database operations

use anyhow::Result;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use crate::{
    membership::AccountStore,
    models::{Account, Collection, NewAccount},
};

const ACCOUNT_COLUMNS: &str =
    "id, email, username, password_hash, cart, wishlist, created_at, updated_at";

fn account_from_row(row: &PgRow) -> Account {
    Account {
        id: row.get("id"),
        email: row.get("email"),
        username: row.get("username"),
        password_hash: row.get("password_hash"),
        cart: row.get("cart"),
        wishlist: row.get("wishlist"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Hash a password with Argon2 and a random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();
    Ok(hash)
}

/// Check a password against a stored Argon2 hash
pub fn verify_password(account: &Account, password: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(&account.password_hash)
        .map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Returns true when the error is a unique constraint violation
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .is_some_and(|e| e.is_unique_violation())
}

/// Account repository
#[derive(Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create an account with empty cart and wishlist
    pub async fn create(&self, new_account: &NewAccount) -> Result<Account> {
        info!("Creating account: {}", new_account.email);

        let password_hash = hash_password(&new_account.password)?;

        let sql = format!(
            "INSERT INTO accounts (email, username, password_hash) VALUES ($1, $2, $3) RETURNING {}",
            ACCOUNT_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(&new_account.email)
            .bind(&new_account.username)
            .bind(&password_hash)
            .fetch_one(&self.pool)
            .await?;

        Ok(account_from_row(&row))
    }

    /// Find an account by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        let sql = format!("SELECT {} FROM accounts WHERE email = $1", ACCOUNT_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(account_from_row))
    }

    /// Overwrite the cart or wishlist of an account
    pub async fn save_collection(
        &self,
        account_id: Uuid,
        collection: Collection,
        items: &[Uuid],
    ) -> Result<bool> {
        let sql = format!(
            "UPDATE accounts SET {} = $2, updated_at = NOW() WHERE id = $1",
            collection.column()
        );
        let result = sqlx::query(&sql)
            .bind(account_id)
            .bind(items)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete an account
    pub async fn delete(&self, account_id: Uuid) -> Result<bool> {
        info!("Deleting account: {}", account_id);

        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(account_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl AccountStore for AccountRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        AccountRepository::find_by_email(self, email).await
    }

    async fn save_collection(
        &self,
        account_id: Uuid,
        collection: Collection,
        items: &[Uuid],
    ) -> Result<bool> {
        AccountRepository::save_collection(self, account_id, collection, items).await
    }
}
