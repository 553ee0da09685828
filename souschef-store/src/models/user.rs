/// User model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id SERIAL PRIMARY KEY,
///     first_name VARCHAR(50) NOT NULL,
///     last_name VARCHAR(50) NOT NULL,
///     email VARCHAR(100) UNIQUE NOT NULL,
///     password_hash VARCHAR(255) NOT NULL,
///     phone VARCHAR(15) UNIQUE,
///     birth_date DATE,
///     address TEXT,
///     city VARCHAR(50),
///     country VARCHAR(50),
///     thread_number INT NOT NULL DEFAULT 0,
///     token_number INT NOT NULL DEFAULT 0,
///     last_login TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Two row types exist on purpose: [`User`] carries the password hash and
/// stays inside the repository; [`UserProfile`] has no hash field at all and
/// is the only shape that crosses the boundary.
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

use crate::validation::ValidatedRegistration;

/// Full user row, including the password hash
///
/// Internal to the repositories; never returned to callers.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub thread_number: i32,
    pub token_number: i32,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Public user record
///
/// The password hash is structurally absent: there is no field to leak.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserProfile {
    /// Unique user ID (store-assigned)
    pub id: i32,

    pub first_name: String,
    pub last_name: String,

    /// Normalized (trimmed, lower-cased) email address
    pub email: String,

    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,

    /// Number of conversation threads owned by this user
    ///
    /// Maintained by the thread repository; not independently writable.
    pub thread_number: i32,

    /// Usage counter, reserved
    pub token_number: i32,

    /// When the user last logged in (None if never)
    pub last_login: Option<DateTime<Utc>>,

    /// When the account was created; set once, immutable
    pub created_at: DateTime<Utc>,
}

/// Sparse profile update
///
/// Only fields set to `Some` are written; everything else is left untouched.
/// Email and password are deliberately not updatable through this struct —
/// email is the login identity and passwords go through the dedicated
/// change-password flow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

impl ProfileUpdate {
    /// Returns true if at least one field would be written
    pub fn has_changes(&self) -> bool {
        self.first_name.is_some()
            || self.last_name.is_some()
            || self.phone.is_some()
            || self.birth_date.is_some()
            || self.address.is_some()
            || self.city.is_some()
            || self.country.is_some()
    }
}

impl User {
    /// Inserts a new user row from validated registration data
    ///
    /// # Returns
    ///
    /// The store-assigned user id.
    ///
    /// # Errors
    ///
    /// A unique-constraint violation on email or phone surfaces as
    /// `sqlx::Error::Database`; the repository maps it to
    /// `UserAlreadyExists`.
    pub async fn insert(
        executor: impl PgExecutor<'_>,
        data: &ValidatedRegistration,
    ) -> Result<i32, sqlx::Error> {
        let (id,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO users
                (first_name, last_name, email, password_hash, phone, birth_date, address, city, country)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(&data.phone)
        .bind(data.birth_date)
        .bind(&data.address)
        .bind(&data.city)
        .bind(&data.country)
        .fetch_one(executor)
        .await?;

        Ok(id)
    }

    /// Finds a full user row (including hash) by normalized email
    pub async fn find_by_email(
        executor: impl PgExecutor<'_>,
        email: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, email, password_hash, phone, birth_date,
                   address, city, country, thread_number, token_number, last_login, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(executor)
        .await
    }

    /// Finds a public profile by normalized email
    pub async fn find_profile_by_email(
        executor: impl PgExecutor<'_>,
        email: &str,
    ) -> Result<Option<UserProfile>, sqlx::Error> {
        sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT id, first_name, last_name, email, phone, birth_date,
                   address, city, country, thread_number, token_number, last_login, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(executor)
        .await
    }

    /// Finds a public profile by id
    pub async fn find_profile_by_id(
        executor: impl PgExecutor<'_>,
        id: i32,
    ) -> Result<Option<UserProfile>, sqlx::Error> {
        sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT id, first_name, last_name, email, phone, birth_date,
                   address, city, country, thread_number, token_number, last_login, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Returns true if a user with this id exists
    pub async fn exists(executor: impl PgExecutor<'_>, id: i32) -> Result<bool, sqlx::Error> {
        let row: Option<(i32,)> = sqlx::query_as("SELECT id FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(row.is_some())
    }

    /// Sets `last_login` to the current time and returns the fresh profile
    ///
    /// Returns `None` if the user no longer exists.
    pub async fn touch_last_login(
        executor: impl PgExecutor<'_>,
        id: i32,
    ) -> Result<Option<UserProfile>, sqlx::Error> {
        sqlx::query_as::<_, UserProfile>(
            r#"
            UPDATE users
            SET last_login = NOW()
            WHERE id = $1
            RETURNING id, first_name, last_name, email, phone, birth_date,
                      address, city, country, thread_number, token_number, last_login, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Fetches the stored password hash for a user
    pub async fn get_password_hash(
        executor: impl PgExecutor<'_>,
        id: i32,
    ) -> Result<Option<String>, sqlx::Error> {
        let row: Option<(String,)> = sqlx::query_as("SELECT password_hash FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(row.map(|(hash,)| hash))
    }

    /// Replaces the stored password hash
    ///
    /// # Returns
    ///
    /// Number of rows affected (0 when the user does not exist).
    pub async fn set_password_hash(
        executor: impl PgExecutor<'_>,
        id: i32,
        password_hash: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    /// Applies a sparse profile update
    ///
    /// The SET clause is built deterministically from the fields present in
    /// `data`, in declaration order, so bind positions always line up.
    /// Callers must check [`ProfileUpdate::has_changes`] first.
    ///
    /// # Returns
    ///
    /// Number of rows affected (0 when the user does not exist).
    pub async fn apply_update(
        executor: impl PgExecutor<'_>,
        id: i32,
        data: &ProfileUpdate,
    ) -> Result<u64, sqlx::Error> {
        let mut sets: Vec<String> = Vec::new();
        let mut bind_count = 1;

        if data.first_name.is_some() {
            bind_count += 1;
            sets.push(format!("first_name = ${}", bind_count));
        }
        if data.last_name.is_some() {
            bind_count += 1;
            sets.push(format!("last_name = ${}", bind_count));
        }
        if data.phone.is_some() {
            bind_count += 1;
            sets.push(format!("phone = ${}", bind_count));
        }
        if data.birth_date.is_some() {
            bind_count += 1;
            sets.push(format!("birth_date = ${}", bind_count));
        }
        if data.address.is_some() {
            bind_count += 1;
            sets.push(format!("address = ${}", bind_count));
        }
        if data.city.is_some() {
            bind_count += 1;
            sets.push(format!("city = ${}", bind_count));
        }
        if data.country.is_some() {
            bind_count += 1;
            sets.push(format!("country = ${}", bind_count));
        }

        let query = format!("UPDATE users SET {} WHERE id = $1", sets.join(", "));

        let mut q = sqlx::query(&query).bind(id);

        if let Some(ref first_name) = data.first_name {
            q = q.bind(first_name);
        }
        if let Some(ref last_name) = data.last_name {
            q = q.bind(last_name);
        }
        if let Some(ref phone) = data.phone {
            q = q.bind(phone);
        }
        if let Some(birth_date) = data.birth_date {
            q = q.bind(birth_date);
        }
        if let Some(ref address) = data.address {
            q = q.bind(address);
        }
        if let Some(ref city) = data.city {
            q = q.bind(city);
        }
        if let Some(ref country) = data.country {
            q = q.bind(country);
        }

        let result = q.execute(executor).await?;

        Ok(result.rows_affected())
    }

    /// Increments the user's owned-thread counter
    pub async fn increment_thread_count(
        executor: impl PgExecutor<'_>,
        id: i32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET thread_number = thread_number + 1 WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(())
    }

    /// Decrements the user's owned-thread counter
    pub async fn decrement_thread_count(
        executor: impl PgExecutor<'_>,
        id: i32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET thread_number = thread_number - 1 WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(())
    }

    /// Deletes a user row
    ///
    /// # Returns
    ///
    /// Number of rows affected (0 when the user does not exist). Thread
    /// cleanup happens before this in the repository; the row-level CASCADE
    /// is only a safety net.
    pub async fn delete(executor: impl PgExecutor<'_>, id: i32) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}
