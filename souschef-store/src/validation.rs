/// Registration and authentication input validation
///
/// This module validates and normalizes user input before it reaches the
/// repositories. Two entry points exist, both accepting a `collect_all`
/// flag:
///
/// - [`validate_registration`]: full registration form
/// - [`validate_credentials`]: email/password pair for login
///
/// Fields are evaluated in a fixed order: first_name, last_name, email,
/// phone, password, birth_date, address, city, country. In fail-fast mode
/// (`collect_all = false`) the first invalid field returns its specific
/// [`ValidationError`] variant immediately. In collect-all mode every field
/// is evaluated and all violations are returned together as
/// [`ValidationError::Invalid`], ordered by field, so the UI can render a
/// message next to each input.
///
/// On success the registration validator returns normalized values with the
/// password already hashed — the plaintext never travels further.
///
/// # Example
///
/// ```
/// use souschef_store::validation::{validate_registration, RegistrationInput};
///
/// let input = RegistrationInput {
///     first_name: "Ana".to_string(),
///     last_name: "Lee".to_string(),
///     email: "ANA@Example.com".to_string(),
///     password: "Secr3t!A".to_string(),
///     ..Default::default()
/// };
///
/// let validated = validate_registration(&input, true).unwrap();
/// assert_eq!(validated.email, "ana@example.com");
/// assert!(validated.password_hash.starts_with("$argon2id$"));
/// ```
use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use crate::auth::password::hash_password;
use crate::error::{FieldViolation, ValidationError};

/// Raw registration form input
///
/// Optional free-text fields arrive as the UI sends them; empty strings are
/// normalized to absent during validation. `birth_date` is the `YYYY-MM-DD`
/// string a date picker produces.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistrationInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub birth_date: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

/// Registration data after validation and normalization
///
/// Carries the Argon2 hash instead of the plaintext password.
#[derive(Debug, Clone)]
pub struct ValidatedRegistration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

/// Login credentials after validation
///
/// The password is deliberately NOT hashed here; it is compared against the
/// stored hash during authentication.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Validates a complete registration form
///
/// See the module docs for field order and mode semantics. On success the
/// returned [`ValidatedRegistration`] contains trimmed names, the
/// lower-cased email, the phone/birth_date/address/city/country normalized
/// to absent when blank, and the hashed password.
///
/// # Errors
///
/// - Fail-fast mode: the field-specific variant for the first violation.
/// - Collect-all mode: [`ValidationError::Invalid`] carrying every
///   violation in field order; the list is complete before the error is
///   constructed.
pub fn validate_registration(
    input: &RegistrationInput,
    collect_all: bool,
) -> Result<ValidatedRegistration, ValidationError> {
    let mut violations: Vec<FieldViolation> = Vec::new();

    let first_name = apply(
        check_name(&input.first_name),
        "first_name",
        ValidationError::FirstName,
        collect_all,
        &mut violations,
    )?;
    let last_name = apply(
        check_name(&input.last_name),
        "last_name",
        ValidationError::LastName,
        collect_all,
        &mut violations,
    )?;
    let email = apply(
        check_email(&input.email),
        "email",
        ValidationError::Email,
        collect_all,
        &mut violations,
    )?;
    let phone = apply(
        check_phone(input.phone.as_deref()),
        "phone",
        ValidationError::Phone,
        collect_all,
        &mut violations,
    )?;
    apply(
        check_password(&input.password),
        "password",
        ValidationError::Password,
        collect_all,
        &mut violations,
    )?;
    let birth_date = apply(
        check_birth_date(input.birth_date.as_deref()),
        "birth_date",
        ValidationError::BirthDate,
        collect_all,
        &mut violations,
    )?;
    let address = apply(
        check_address(input.address.as_deref()),
        "address",
        ValidationError::Address,
        collect_all,
        &mut violations,
    )?;
    let city = apply(
        check_place(input.city.as_deref()),
        "city",
        ValidationError::City,
        collect_all,
        &mut violations,
    )?;
    let country = apply(
        check_place(input.country.as_deref()),
        "country",
        ValidationError::Country,
        collect_all,
        &mut violations,
    )?;

    if !violations.is_empty() {
        return Err(ValidationError::Invalid(violations));
    }

    // Hash only once the whole form is known to be valid
    let password_hash = hash_password(&input.password).map_err(|e| {
        tracing::error!(error = %e, "password hashing failed during registration");
        ValidationError::Password("Password could not be processed".to_string())
    })?;

    Ok(ValidatedRegistration {
        first_name: first_name.expect("validated"),
        last_name: last_name.expect("validated"),
        email: email.expect("validated"),
        password_hash,
        phone: phone.expect("validated"),
        birth_date: birth_date.expect("validated"),
        address: address.expect("validated"),
        city: city.expect("validated"),
        country: country.expect("validated"),
    })
}

/// Validates login credentials
///
/// Both fields must be present and non-blank. The email is trimmed and
/// lower-cased so lookups hit the normalized stored value.
pub fn validate_credentials(
    email: &str,
    password: &str,
    collect_all: bool,
) -> Result<Credentials, ValidationError> {
    let mut violations: Vec<FieldViolation> = Vec::new();

    let normalized = email.trim().to_lowercase();
    if normalized.is_empty() {
        if !collect_all {
            return Err(ValidationError::Email("Email is required".to_string()));
        }
        violations.push(FieldViolation::new("email", "Email is required"));
    }

    if password.trim().is_empty() {
        if !collect_all {
            return Err(ValidationError::Password("Password is required".to_string()));
        }
        violations.push(FieldViolation::new("password", "Password is required"));
    }

    if !violations.is_empty() {
        return Err(ValidationError::Invalid(violations));
    }

    Ok(Credentials {
        email: normalized,
        password: password.to_string(),
    })
}

/// Routes a single field result into the active validation mode
///
/// Fail-fast: the first `Err` becomes the field-specific variant. Collect
/// all: the message is appended to `violations` and evaluation continues
/// with `None` standing in for the value.
fn apply<T>(
    result: Result<T, String>,
    field: &'static str,
    variant: fn(String) -> ValidationError,
    collect_all: bool,
    violations: &mut Vec<FieldViolation>,
) -> Result<Option<T>, ValidationError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(message) if collect_all => {
            violations.push(FieldViolation::new(field, message));
            Ok(None)
        }
        Err(message) => Err(variant(message)),
    }
}

fn check_name(value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    let length = trimmed.chars().count();

    if length < 2 || length > 50 {
        return Err("Must be between 2 and 50 characters long".to_string());
    }

    if !trimmed
        .chars()
        .all(|c| c.is_alphabetic() || c == '\'' || c == '-' || c == ' ')
    {
        return Err("May only contain letters, apostrophes, hyphens and spaces".to_string());
    }

    Ok(trimmed.to_string())
}

fn check_email(value: &str) -> Result<String, String> {
    let normalized = value.trim().to_lowercase();

    if normalized.is_empty() {
        return Err("Email is required".to_string());
    }

    if normalized.chars().count() > 100 {
        return Err("Must be at most 100 characters long".to_string());
    }

    if !normalized.validate_email() {
        return Err("Is not a valid email address".to_string());
    }

    Ok(normalized)
}

fn check_phone(value: Option<&str>) -> Result<Option<String>, String> {
    let trimmed = match value {
        Some(raw) => raw.trim(),
        None => return Ok(None),
    };

    if trimmed.is_empty() {
        return Ok(None);
    }

    if trimmed.chars().count() > 15 {
        return Err("Must be at most 15 characters long".to_string());
    }

    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err("May only contain digits and an optional leading '+'".to_string());
    }

    if digits.chars().count() < 7 {
        return Err("Must contain at least 7 digits".to_string());
    }

    Ok(Some(trimmed.to_string()))
}

/// Checks the password policy; the first failed rule wins
fn check_password(password: &str) -> Result<(), String> {
    if password.chars().count() < 8 {
        return Err("Password must be at least 8 characters long".to_string());
    }

    if !password.chars().any(|c| c.is_uppercase()) {
        return Err("Password must contain at least one uppercase letter".to_string());
    }

    if !password.chars().any(|c| c.is_lowercase()) {
        return Err("Password must contain at least one lowercase letter".to_string());
    }

    if !password.chars().any(|c| c.is_numeric()) {
        return Err("Password must contain at least one digit".to_string());
    }

    if !password.chars().any(|c| !c.is_alphanumeric()) {
        return Err("Password must contain at least one special character".to_string());
    }

    Ok(())
}

fn check_birth_date(value: Option<&str>) -> Result<Option<NaiveDate>, String> {
    let trimmed = match value {
        Some(raw) => raw.trim(),
        None => return Ok(None),
    };

    if trimmed.is_empty() {
        return Ok(None);
    }

    let birth = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| "Must be a valid date in YYYY-MM-DD format".to_string())?;

    let today = Utc::now().date_naive();
    if age_on(today, birth) < 18 {
        return Err("You must be at least 18 years old".to_string());
    }

    Ok(Some(birth))
}

/// Calendar-year age, adjusted when this year's birthday has not happened yet
fn age_on(today: NaiveDate, birth: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

fn check_address(value: Option<&str>) -> Result<Option<String>, String> {
    let trimmed = match value {
        Some(raw) => raw.trim(),
        None => return Ok(None),
    };

    if trimmed.is_empty() {
        return Ok(None);
    }

    if trimmed.chars().count() > 200 {
        return Err("Must be at most 200 characters long".to_string());
    }

    Ok(Some(trimmed.to_string()))
}

fn check_place(value: Option<&str>) -> Result<Option<String>, String> {
    let trimmed = match value {
        Some(raw) => raw.trim(),
        None => return Ok(None),
    };

    if trimmed.is_empty() {
        return Ok(None);
    }

    if trimmed.chars().count() > 50 {
        return Err("Must be at most 50 characters long".to_string());
    }

    if !trimmed
        .chars()
        .all(|c| c.is_alphabetic() || c == ' ' || c == '-' || c == '\'' || c == '.')
    {
        return Err("May only contain letters, spaces, hyphens and punctuation".to_string());
    }

    Ok(Some(trimmed.to_string()))
}
