/// Authentication primitives
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
///
/// Password *policy* (length, character classes) lives in the field
/// validator; this module only turns plaintext into salted hashes and back
/// into yes/no answers. Hashes never leave the repository boundary.
///
/// # Example
///
/// ```no_run
/// use souschef_store::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
/// # Ok(())
/// # }
/// ```
pub mod password;
