//! User operations
//!
//! Every lookup except the uniqueness check is scoped to an audience: admin
//! accounts and regular accounts live in the same table but are never
//! returned for the other audience.

use chrono::Utc;
use sqlx::Row;
use tracing::debug;

use crate::error::DbError;
use crate::models::{NewUser, User};
use crate::repository::Database;

const USER_COLUMNS: &str = "id, email, password_hash, first_name, last_name, rank, location, \
                            status, is_admin, created_at, updated_at";

impl Database {
    // ==================== User Operations ====================

    /// Insert a new user
    pub async fn insert_user(&self, user: NewUser) -> Result<User, DbError> {
        let now = Utc::now();

        // Emails are unique across both audiences
        if self.email_exists(&user.email).await? {
            return Err(DbError::Duplicate(format!("User '{}' already exists", user.email)));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO users (email, password_hash, first_name, last_name, rank, location,
                               status, is_admin, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(i64::from(user.rank))
        .bind(user.location.as_str())
        .bind(&user.status)
        .bind(user.is_admin)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DbError::from_write(e, &format!("User '{}' already exists", user.email)))?;

        let id: i64 = result.get("id");
        debug!("Inserted user {} (admin: {})", id, user.is_admin);

        Ok(User {
            id,
            email: user.email,
            password_hash: user.password_hash,
            first_name: user.first_name,
            last_name: user.last_name,
            rank: user.rank,
            location: user.location,
            status: user.status,
            is_admin: user.is_admin,
            created_at: now,
            updated_at: now,
        })
    }

    /// Check whether any user, in either audience, holds this email
    pub async fn email_exists(&self, email: &str) -> Result<bool, DbError> {
        let result = sqlx::query("SELECT COUNT(*) as count FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;
        let count: i64 = result.get("count");
        Ok(count > 0)
    }

    /// Get a user of the given audience by email
    pub async fn get_user_by_email(
        &self,
        email: &str,
        is_admin: bool,
    ) -> Result<Option<User>, DbError> {
        let result = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ? AND is_admin = ?"
        ))
        .bind(email)
        .bind(is_admin)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| User::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// Get a user of the given audience by ID
    pub async fn get_user_by_id(&self, id: i64, is_admin: bool) -> Result<Option<User>, DbError> {
        let result = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ? AND is_admin = ?"
        ))
        .bind(id)
        .bind(is_admin)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| User::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// List all users of the given audience
    pub async fn list_users(&self, is_admin: bool) -> Result<Vec<User>, DbError> {
        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE is_admin = ? ORDER BY id"
        ))
        .bind(is_admin)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| User::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Overwrite the mutable fields of a user with the given record
    ///
    /// The admin flag and creation time are never rewritten. Returns the
    /// stored record with its new `updated_at`.
    pub async fn update_user(&self, user: &User) -> Result<User, DbError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE users
            SET email = ?, password_hash = ?, first_name = ?, last_name = ?, rank = ?,
                location = ?, status = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(i64::from(user.rank))
        .bind(user.location.as_str())
        .bind(&user.status)
        .bind(now.to_rfc3339())
        .bind(user.id)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from_write(e, &format!("User '{}' already exists", user.email)))?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("User: {}", user.id)));
        }

        Ok(User {
            updated_at: now,
            ..user.clone()
        })
    }

    /// Delete a user, returning the number of removed rows
    pub async fn delete_user(&self, id: i64) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use crate::error::DbError;
    use crate::models::{Location, NewUser, STATUS_ENABLED, UserRank};
    use crate::repository::test_support::temp_database;

    fn new_user(email: &str, is_admin: bool) -> NewUser {
        NewUser {
            email: email.to_string(),
            password_hash: "$argon2id$fake".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            rank: UserRank::Beta,
            location: Location::Safe,
            status: STATUS_ENABLED.to_string(),
            is_admin,
        }
    }

    #[tokio::test]
    async fn test_insert_and_fetch_scoped_by_audience() {
        let (_dir, db) = temp_database().await;

        let admin = db.insert_user(new_user("admin@mrkt.io", true)).await.unwrap();
        let regular = db.insert_user(new_user("user@mrkt.io", false)).await.unwrap();

        let fetched = db.get_user_by_id(admin.id, true).await.unwrap().unwrap();
        assert_eq!(fetched.email, "admin@mrkt.io");
        assert_eq!(fetched.rank, UserRank::Beta);
        assert_eq!(fetched.location, Location::Safe);
        assert!(fetched.is_admin);

        // An admin record is invisible to the regular audience and vice versa
        assert!(db.get_user_by_id(admin.id, false).await.unwrap().is_none());
        assert!(db.get_user_by_id(regular.id, true).await.unwrap().is_none());
        assert!(db.get_user_by_email("user@mrkt.io", true).await.unwrap().is_none());
        assert!(db.get_user_by_email("user@mrkt.io", false).await.unwrap().is_some());

        let admins = db.list_users(true).await.unwrap();
        assert_eq!(admins.len(), 1);
        assert_eq!(admins[0].id, admin.id);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected_across_audiences() {
        let (_dir, db) = temp_database().await;

        db.insert_user(new_user("dup@mrkt.io", true)).await.unwrap();
        let result = db.insert_user(new_user("dup@mrkt.io", false)).await;

        assert!(matches!(result, Err(DbError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_update_overwrites_mutable_fields() {
        let (_dir, db) = temp_database().await;

        let mut user = db.insert_user(new_user("old@mrkt.io", true)).await.unwrap();
        user.email = "new@mrkt.io".to_string();
        user.rank = UserRank::Alpha;

        let updated = db.update_user(&user).await.unwrap();
        assert!(updated.updated_at >= updated.created_at);

        let stored = db.get_user_by_id(user.id, true).await.unwrap().unwrap();
        assert_eq!(stored.email, "new@mrkt.io");
        assert_eq!(stored.rank, UserRank::Alpha);
        assert_eq!(stored.first_name, "Ada");
    }

    #[tokio::test]
    async fn test_update_into_taken_email_is_duplicate() {
        let (_dir, db) = temp_database().await;

        db.insert_user(new_user("taken@mrkt.io", true)).await.unwrap();
        let mut user = db.insert_user(new_user("free@mrkt.io", true)).await.unwrap();
        user.email = "taken@mrkt.io".to_string();

        let result = db.update_user(&user).await;
        assert!(matches!(result, Err(DbError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_delete_reports_row_count() {
        let (_dir, db) = temp_database().await;

        let user = db.insert_user(new_user("gone@mrkt.io", false)).await.unwrap();

        assert_eq!(db.delete_user(user.id).await.unwrap(), 1);
        assert_eq!(db.delete_user(user.id).await.unwrap(), 0);
        assert!(db.get_user_by_id(user.id, false).await.unwrap().is_none());
    }
}
