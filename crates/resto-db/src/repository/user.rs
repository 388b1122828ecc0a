//! Staff account storage. Small surface: the server only needs account
//! creation, login lookup, and the bootstrap existence check.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use resto_core::{Role, User};

#[derive(Debug, Clone, sqlx::FromRow)]
struct UserRow {
    id: String,
    username: String,
    password_hash: String,
    role: String,
    display_name: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            id: self.id,
            username: self.username,
            password_hash: self.password_hash,
            role: Role::from_tag(&self.role),
            display_name: self.display_name,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

const SELECT_COLUMNS: &str =
    "id, username, password_hash, role, display_name, is_active, created_at, updated_at";

/// Input for [`UserRepository::insert`]. The password is already hashed
/// by the caller; raw credentials never reach this crate.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub display_name: Option<String>,
}

/// Repository for staff-account database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Creates a staff account. Duplicate usernames surface as
    /// [`DbError::UniqueViolation`].
    pub async fn insert(&self, new_user: NewUser) -> DbResult<User> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(username = %new_user.username, role = new_user.role.as_str(), "Creating user");

        sqlx::query(
            r#"
            INSERT INTO users (
                id, username, password_hash, role, display_name,
                is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?6)
            "#,
        )
        .bind(&id)
        .bind(&new_user.username)
        .bind(&new_user.password_hash)
        .bind(new_user.role.as_str())
        .bind(new_user.display_name.as_deref())
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(User {
            id,
            username: new_user.username,
            password_hash: new_user.password_hash,
            role: new_user.role,
            display_name: new_user.display_name,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Login lookup. Only active accounts are returned.
    pub async fn find_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM users WHERE username = ?1 AND is_active = 1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    /// Total account count, used by the first-run bootstrap check.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn admin() -> NewUser {
        NewUser {
            username: "admin".to_string(),
            password_hash: "$argon2id$fake".to_string(),
            role: Role::Admin,
            display_name: Some("Administrator".to_string()),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let db = test_db().await;
        assert_eq!(db.users().count().await.unwrap(), 0);

        let created = db.users().insert(admin()).await.unwrap();
        assert_eq!(created.role, Role::Admin);
        assert!(created.is_active);

        let found = db.users().find_by_username("admin").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.password_hash, "$argon2id$fake");

        assert!(db.users().find_by_username("nobody").await.unwrap().is_none());
        assert_eq!(db.users().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let db = test_db().await;
        db.users().insert(admin()).await.unwrap();

        let err = db.users().insert(admin()).await.unwrap_err();
        assert!(err.is_unique_violation(), "got: {err:?}");
    }
}
