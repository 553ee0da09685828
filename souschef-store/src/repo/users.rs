/// User repository: registration, authentication and account lifecycle
///
/// All operations run inside one transactional scope and return either a
/// [`UserProfile`] (never the hash) or a typed [`StoreError`]. Validation
/// errors propagate untouched so the UI keeps field-level detail.
///
/// # Example
///
/// ```no_run
/// use souschef_store::repo::UserRepository;
/// use souschef_store::validation::RegistrationInput;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let users = UserRepository::new(pool);
///
/// let profile = users
///     .register(&RegistrationInput {
///         first_name: "Ana".to_string(),
///         last_name: "Lee".to_string(),
///         email: "ana@example.com".to_string(),
///         password: "Secr3t!A".to_string(),
///         ..Default::default()
///     })
///     .await?;
///
/// let same = users.authenticate("ana@example.com", "Secr3t!A").await?;
/// assert_eq!(profile.id, same.id);
/// # Ok(())
/// # }
/// ```
use sqlx::PgPool;
use tracing::{info, warn};

use crate::auth::password::{hash_password, verify_password};
use crate::db::session;
use crate::error::{StoreError, StoreResult};
use crate::models::thread::Thread;
use crate::models::user::{ProfileUpdate, User, UserProfile};
use crate::validation::{validate_credentials, validate_registration, RegistrationInput};

/// Repository for the `users` entity
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new repository over the given pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Registers a new user
    ///
    /// Runs registration validation in collect-all mode so the UI receives
    /// every violation at once, inserts the row, and re-reads it by
    /// normalized email inside the same transaction.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Validation`] — invalid input, with per-field detail
    /// - [`StoreError::UserAlreadyExists`] — email or phone already taken
    /// - [`StoreError::Unavailable`] — store fault
    pub async fn register(&self, input: &RegistrationInput) -> StoreResult<UserProfile> {
        let validated = validate_registration(input, true)?;

        let mut tx = session::begin(&self.pool).await?;

        User::insert(&mut *tx, &validated).await?;

        let profile = User::find_profile_by_email(&mut *tx, &validated.email)
            .await?
            .ok_or_else(|| {
                StoreError::Unavailable("Registered user could not be read back".to_string())
            })?;

        session::commit(tx).await?;

        info!(user_id = profile.id, email = %profile.email, "user registered");
        Ok(profile)
    }

    /// Authenticates a user and updates their last login
    ///
    /// # Errors
    ///
    /// - [`StoreError::Validation`] — blank email or password
    /// - [`StoreError::UserNotFound`] — no account for this email
    /// - [`StoreError::InvalidPassword`] — password mismatch (a stored hash
    ///   that fails to parse counts as a mismatch, not a fault)
    pub async fn authenticate(&self, email: &str, password: &str) -> StoreResult<UserProfile> {
        let credentials = validate_credentials(email, password, false)?;

        let mut tx = session::begin(&self.pool).await?;

        let user = User::find_by_email(&mut *tx, &credentials.email)
            .await?
            .ok_or(StoreError::UserNotFound)?;

        let verified = match verify_password(&credentials.password, &user.password_hash) {
            Ok(verified) => verified,
            Err(e) => {
                warn!(user_id = user.id, error = %e, "stored password hash did not parse");
                false
            }
        };

        if !verified {
            warn!(user_id = user.id, "authentication failed: password mismatch");
            return Err(StoreError::InvalidPassword);
        }

        let profile = User::touch_last_login(&mut *tx, user.id)
            .await?
            .ok_or(StoreError::UserNotFound)?;

        session::commit(tx).await?;

        info!(user_id = profile.id, "user authenticated");
        Ok(profile)
    }

    /// Fetches a user's public profile
    ///
    /// # Errors
    ///
    /// [`StoreError::UserNotFound`] if the user does not exist.
    pub async fn get_profile(&self, user_id: i32) -> StoreResult<UserProfile> {
        let mut tx = session::begin(&self.pool).await?;

        let profile = User::find_profile_by_id(&mut *tx, user_id)
            .await?
            .ok_or(StoreError::UserNotFound)?;

        session::commit(tx).await?;

        Ok(profile)
    }

    /// Applies a sparse profile update
    ///
    /// Only fields present in `changes` are written; with no fields supplied
    /// this degrades to a plain profile read.
    ///
    /// # Errors
    ///
    /// [`StoreError::UserNotFound`] if no row was affected.
    pub async fn update_profile(
        &self,
        user_id: i32,
        changes: &ProfileUpdate,
    ) -> StoreResult<UserProfile> {
        if !changes.has_changes() {
            return self.get_profile(user_id).await;
        }

        let mut tx = session::begin(&self.pool).await?;

        let affected = User::apply_update(&mut *tx, user_id, changes).await?;
        if affected == 0 {
            return Err(StoreError::UserNotFound);
        }

        let profile = User::find_profile_by_id(&mut *tx, user_id)
            .await?
            .ok_or(StoreError::UserNotFound)?;

        session::commit(tx).await?;

        info!(user_id, "user profile updated");
        Ok(profile)
    }

    /// Changes a user's password
    ///
    /// The current password must verify against the stored hash before the
    /// new one replaces it.
    ///
    /// # Errors
    ///
    /// - [`StoreError::UserNotFound`] — user does not exist
    /// - [`StoreError::InvalidPassword`] — current password does not verify
    pub async fn change_password(
        &self,
        user_id: i32,
        current_password: &str,
        new_password: &str,
    ) -> StoreResult<()> {
        let mut tx = session::begin(&self.pool).await?;

        let stored_hash = User::get_password_hash(&mut *tx, user_id)
            .await?
            .ok_or(StoreError::UserNotFound)?;

        let verified = match verify_password(current_password, &stored_hash) {
            Ok(verified) => verified,
            Err(e) => {
                warn!(user_id, error = %e, "stored password hash did not parse");
                false
            }
        };

        if !verified {
            warn!(user_id, "password change rejected: current password mismatch");
            return Err(StoreError::InvalidPassword);
        }

        let new_hash = hash_password(new_password).map_err(|e| {
            tracing::error!(user_id, error = %e, "password hashing failed");
            StoreError::Unavailable("Password could not be processed".to_string())
        })?;

        User::set_password_hash(&mut *tx, user_id, &new_hash).await?;

        session::commit(tx).await?;

        info!(user_id, "password changed");
        Ok(())
    }

    /// Deletes a user and everything they own
    ///
    /// Within one transaction: every owned thread is removed with the full
    /// cascade (checkpoint purge, thread row, counter decrement), then the
    /// user row itself. Running the cascade before the user row disappears
    /// keeps the checkpoint cleanup anchored to a valid thread/user context.
    ///
    /// # Errors
    ///
    /// [`StoreError::UserNotFound`] if the user does not exist.
    pub async fn delete(&self, user_id: i32) -> StoreResult<()> {
        let mut tx = session::begin(&self.pool).await?;

        if !User::exists(&mut *tx, user_id).await? {
            return Err(StoreError::UserNotFound);
        }

        let thread_ids = Thread::ids_for_user(&mut *tx, user_id).await?;
        let thread_count = thread_ids.len();

        for thread_id in thread_ids {
            Thread::purge_checkpoint_state(&mut tx, thread_id).await?;
            Thread::delete_row(&mut *tx, thread_id).await?;
            User::decrement_thread_count(&mut *tx, user_id).await?;
        }

        User::delete(&mut *tx, user_id).await?;

        session::commit(tx).await?;

        info!(user_id, threads_removed = thread_count, "user deleted");
        Ok(())
    }
}
