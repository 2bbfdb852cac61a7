use std::{fmt::Debug, str::FromStr};

use chrono::{DateTime, Utc};
use czp_common::UserProfile;
use log::*;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Row,
    SqlitePool,
};

use crate::traits::{UpsertOutcome, UserMirror, UserMirrorError};

const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS mirrored_users (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    citizen_id  TEXT NOT NULL UNIQUE,
    first_name  TEXT,
    last_name   TEXT,
    mobile      TEXT,
    email       TEXT,
    user_id     TEXT,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
)"#;

/// A mirrored user row, as stored.
#[derive(Debug, Clone, PartialEq)]
pub struct MirroredUser {
    pub citizen_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// [`UserMirror`] backed by SQLite.
///
/// The schema is created on construction, so pointing `new_with_url` at a
/// fresh (or in-memory) database is enough to get a working mirror.
#[derive(Clone)]
pub struct SqliteUserMirror {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteUserMirror {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteUserMirror ({:?})", self.pool)
    }
}

impl SqliteUserMirror {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, UserMirrorError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| UserMirrorError::DatabaseError(e.to_string()))?
            .create_if_missing(true);
        // Every pooled connection to an in-memory URL opens its own private
        // database, so the mirror must stay on a single long-lived connection.
        let (max_connections, min_connections) = if url.contains(":memory:") { (1, 1) } else { (max_connections, 0) };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .connect_with(options)
            .await?;
        sqlx::query(CREATE_USERS_TABLE).execute(&pool).await?;
        debug!("🗃️ User mirror ready at {url}");
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// The stored row for the given citizen, if any.
    pub async fn fetch_user(&self, citizen_id: &str) -> Result<Option<MirroredUser>, UserMirrorError> {
        let row = sqlx::query(
            r#"SELECT citizen_id, first_name, last_name, mobile, email, user_id, created_at, updated_at
               FROM mirrored_users WHERE citizen_id = $1"#,
        )
        .bind(citizen_id)
        .fetch_optional(&self.pool)
        .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(MirroredUser {
            citizen_id: row.try_get("citizen_id")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            mobile: row.try_get("mobile")?,
            email: row.try_get("email")?,
            user_id: row.try_get("user_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        }))
    }
}

impl UserMirror for SqliteUserMirror {
    async fn upsert_user(&self, profile: &UserProfile) -> Result<UpsertOutcome, UserMirrorError> {
        let citizen_id = profile.citizen_id.as_deref().ok_or(UserMirrorError::MissingCitizenId)?;
        let now = Utc::now();
        let existing = sqlx::query("SELECT id FROM mirrored_users WHERE citizen_id = $1")
            .bind(citizen_id)
            .fetch_optional(&self.pool)
            .await?;
        let outcome = match existing {
            Some(_) => {
                sqlx::query(
                    r#"UPDATE mirrored_users
                       SET first_name = $2, last_name = $3, mobile = $4, email = $5, user_id = $6, updated_at = $7
                       WHERE citizen_id = $1"#,
                )
                .bind(citizen_id)
                .bind(&profile.first_name)
                .bind(&profile.last_name)
                .bind(&profile.mobile)
                .bind(&profile.email)
                .bind(&profile.user_id)
                .bind(now)
                .execute(&self.pool)
                .await?;
                trace!("🗃️ Updated the user record for citizen {citizen_id}");
                UpsertOutcome::Updated
            },
            None => {
                sqlx::query(
                    r#"INSERT INTO mirrored_users
                       (citizen_id, first_name, last_name, mobile, email, user_id, created_at, updated_at)
                       VALUES ($1, $2, $3, $4, $5, $6, $7, $7)"#,
                )
                .bind(citizen_id)
                .bind(&profile.first_name)
                .bind(&profile.last_name)
                .bind(&profile.mobile)
                .bind(&profile.email)
                .bind(&profile.user_id)
                .bind(now)
                .execute(&self.pool)
                .await?;
                trace!("🗃️ Inserted a user record for citizen {citizen_id}");
                UpsertOutcome::Inserted
            },
        };
        Ok(outcome)
    }
}
