//! MySQL implementation of the AccountRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{mysql::MySqlRow, MySqlPool, Row};
use uuid::Uuid;

use cc_core::domain::entities::account::{Account, AccountRole};
use cc_core::domain::value_objects::Identifier;
use cc_core::errors::{AuthError, DomainError, DomainResult};
use cc_core::repositories::AccountRepository;

use crate::InfrastructureError;

const SELECT_COLUMNS: &str = r#"
    SELECT id, identifier, display_name, credential_hash, role, mobile,
           activated, created_at, updated_at, last_login_at
    FROM accounts
"#;

/// MySQL implementation of AccountRepository
///
/// Ids are stored as `CHAR(36)` strings and identifiers in their normalized
/// form, which is also the unique key.
pub struct MySqlAccountRepository {
    pool: MySqlPool,
}

impl MySqlAccountRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn column<'r, T>(row: &'r MySqlRow, name: &str) -> DomainResult<T>
    where
        T: sqlx::Decode<'r, sqlx::MySql> + sqlx::Type<sqlx::MySql>,
    {
        row.try_get(name)
            .map_err(|e| DomainError::store(format!("Failed to read accounts.{}: {}", name, e)))
    }

    /// Convert a database row to an Account entity
    fn row_to_account(row: &MySqlRow) -> DomainResult<Account> {
        let id: String = Self::column(row, "id")?;
        let identifier: String = Self::column(row, "identifier")?;
        let role: String = Self::column(row, "role")?;
        let mobile: Option<String> = Self::column(row, "mobile")?;

        let corrupt = |field: &str, detail: String| DomainError::Internal {
            message: format!("Corrupt accounts.{} value: {}", field, detail),
        };

        Ok(Account {
            id: Uuid::parse_str(&id).map_err(|e| corrupt("id", e.to_string()))?,
            identifier: Identifier::parse(&identifier)
                .map_err(|e| corrupt("identifier", e.to_string()))?,
            display_name: Self::column(row, "display_name")?,
            credential_hash: Self::column(row, "credential_hash")?,
            role: role
                .parse::<AccountRole>()
                .map_err(|e| corrupt("role", e.to_string()))?,
            mobile: mobile
                .map(|m| Identifier::phone(&m))
                .transpose()
                .map_err(|e| corrupt("mobile", e.to_string()))?,
            activated: Self::column(row, "activated")?,
            created_at: Self::column::<DateTime<Utc>>(row, "created_at")?,
            updated_at: Self::column::<DateTime<Utc>>(row, "updated_at")?,
            last_login_at: Self::column::<Option<DateTime<Utc>>>(row, "last_login_at")?,
        })
    }
}

#[async_trait]
impl AccountRepository for MySqlAccountRepository {
    async fn find_by_identifier(&self, identifier: &Identifier) -> DomainResult<Option<Account>> {
        let query = format!("{} WHERE identifier = ? LIMIT 1", SELECT_COLUMNS);

        let row = sqlx::query(&query)
            .bind(identifier.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(InfrastructureError::from)?;

        row.as_ref().map(Self::row_to_account).transpose()
    }

    async fn create(&self, account: Account) -> DomainResult<Account> {
        let query = r#"
            INSERT INTO accounts (
                id, identifier, display_name, credential_hash, role, mobile,
                activated, created_at, updated_at, last_login_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        let result = sqlx::query(query)
            .bind(account.id.to_string())
            .bind(account.identifier.as_str())
            .bind(&account.display_name)
            .bind(&account.credential_hash)
            .bind(account.role.as_str())
            .bind(account.mobile.as_ref().map(|m| m.as_str().to_string()))
            .bind(account.activated)
            .bind(account.created_at)
            .bind(account.updated_at)
            .bind(account.last_login_at)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(account),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(AuthError::AccountAlreadyExists.into())
            }
            Err(e) => Err(InfrastructureError::from(e).into()),
        }
    }

    async fn update(&self, account: Account) -> DomainResult<Account> {
        let query = r#"
            UPDATE accounts
            SET display_name = ?, credential_hash = ?, role = ?, mobile = ?,
                activated = ?, updated_at = ?, last_login_at = ?
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(&account.display_name)
            .bind(&account.credential_hash)
            .bind(account.role.as_str())
            .bind(account.mobile.as_ref().map(|m| m.as_str().to_string()))
            .bind(account.activated)
            .bind(account.updated_at)
            .bind(account.last_login_at)
            .bind(account.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(InfrastructureError::from)?;

        // MySQL reports matched-but-unchanged rows as 0 affected; confirm existence
        if result.rows_affected() == 0
            && self.find_by_identifier(&account.identifier).await?.is_none()
        {
            return Err(DomainError::NotFound {
                resource: "Account".to_string(),
            });
        }

        Ok(account)
    }

    async fn set_activated(&self, identifier: &Identifier) -> DomainResult<bool> {
        let result = sqlx::query(
            "UPDATE accounts SET activated = TRUE, updated_at = ? WHERE identifier = ? AND activated = FALSE",
        )
        .bind(Utc::now())
        .bind(identifier.as_str())
        .execute(&self.pool)
        .await
        .map_err(InfrastructureError::from)?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }

        // Already activated, or no such account
        let exists: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM accounts WHERE identifier = ? LIMIT 1")
                .bind(identifier.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(InfrastructureError::from)?;

        Ok(exists.is_some())
    }
}
