/// Integration tests for the user repository
///
/// These tests require a running PostgreSQL database; see tests/common/mod.rs
/// for the connection setup.
mod common;

use common::{registration, unique_email, TestContext};
use souschef_store::error::{StoreError, ValidationError};
use souschef_store::models::user::ProfileUpdate;

#[tokio::test]
async fn test_register_normalizes_email() {
    let ctx = TestContext::new().await.expect("test context");

    let email = unique_email();
    let mut input = registration(&email);
    input.email = format!("  {}  ", email.to_uppercase());

    let profile = ctx.users.register(&input).await.expect("register");

    assert_eq!(profile.email, email);
    assert_eq!(profile.first_name, "Test");
    assert_eq!(profile.thread_number, 0);
    assert!(profile.last_login.is_none());

    ctx.users.delete(profile.id).await.expect("cleanup");
}

#[tokio::test]
async fn test_register_duplicate_email_fails_cleanly() {
    let ctx = TestContext::new().await.expect("test context");

    let email = unique_email();
    let profile = ctx
        .users
        .register(&registration(&email))
        .await
        .expect("first register");

    let err = ctx
        .users
        .register(&registration(&email))
        .await
        .expect_err("second register must fail");
    assert!(matches!(err, StoreError::UserAlreadyExists));

    // The first registration is unaffected
    let unchanged = ctx.users.get_profile(profile.id).await.expect("profile");
    assert_eq!(unchanged.email, email);
    assert_eq!(unchanged.thread_number, 0);

    ctx.users.delete(profile.id).await.expect("cleanup");
}

#[tokio::test]
async fn test_register_surfaces_all_violations() {
    let ctx = TestContext::new().await.expect("test context");

    let mut input = registration(&unique_email());
    input.email = "not-an-email".to_string();
    input.password = "weak".to_string();

    let err = ctx.users.register(&input).await.expect_err("must fail");

    match err {
        StoreError::Validation(ValidationError::Invalid(violations)) => {
            let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
            assert_eq!(fields, vec!["email", "password"]);
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_authenticate_wrong_password_leaves_last_login_unset() {
    let ctx = TestContext::new().await.expect("test context");

    let email = unique_email();
    let profile = ctx.users.register(&registration(&email)).await.expect("register");

    let err = ctx
        .users
        .authenticate(&email, "Wr0ng!pass")
        .await
        .expect_err("must fail");
    assert!(matches!(err, StoreError::InvalidPassword));

    let unchanged = ctx.users.get_profile(profile.id).await.expect("profile");
    assert!(unchanged.last_login.is_none());

    ctx.users.delete(profile.id).await.expect("cleanup");
}

#[tokio::test]
async fn test_authenticate_unknown_email() {
    let ctx = TestContext::new().await.expect("test context");

    let err = ctx
        .users
        .authenticate(&unique_email(), "Secr3t!A")
        .await
        .expect_err("must fail");
    assert!(matches!(err, StoreError::UserNotFound));
}

#[tokio::test]
async fn test_authenticate_success_updates_last_login() {
    let ctx = TestContext::new().await.expect("test context");

    let email = unique_email();
    let profile = ctx.users.register(&registration(&email)).await.expect("register");

    let first = ctx
        .users
        .authenticate(&email, "Secr3t!A")
        .await
        .expect("authenticate");
    let first_login = first.last_login.expect("last_login set");
    assert!(first_login >= first.created_at);

    let second = ctx
        .users
        .authenticate(&email, "Secr3t!A")
        .await
        .expect("authenticate again");
    assert!(second.last_login.expect("last_login set") >= first_login);

    ctx.users.delete(profile.id).await.expect("cleanup");
}

#[tokio::test]
async fn test_get_profile_not_found() {
    let ctx = TestContext::new().await.expect("test context");

    let err = ctx.users.get_profile(-1).await.expect_err("must fail");
    assert!(matches!(err, StoreError::UserNotFound));
}

#[tokio::test]
async fn test_update_profile_is_sparse() {
    let ctx = TestContext::new().await.expect("test context");

    let email = unique_email();
    let profile = ctx.users.register(&registration(&email)).await.expect("register");

    let updated = ctx
        .users
        .update_profile(
            profile.id,
            &ProfileUpdate {
                city: Some("Lyon".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect("update");

    assert_eq!(updated.city.as_deref(), Some("Lyon"));
    // Untouched fields survive
    assert_eq!(updated.first_name, "Test");
    assert_eq!(updated.email, email);
    assert!(updated.country.is_none());

    ctx.users.delete(profile.id).await.expect("cleanup");
}

#[tokio::test]
async fn test_update_profile_without_changes_is_a_read() {
    let ctx = TestContext::new().await.expect("test context");

    let email = unique_email();
    let profile = ctx.users.register(&registration(&email)).await.expect("register");

    let same = ctx
        .users
        .update_profile(profile.id, &ProfileUpdate::default())
        .await
        .expect("no-op update");

    assert_eq!(same.id, profile.id);
    assert_eq!(same.email, profile.email);

    ctx.users.delete(profile.id).await.expect("cleanup");
}

#[tokio::test]
async fn test_update_profile_unknown_user() {
    let ctx = TestContext::new().await.expect("test context");

    let err = ctx
        .users
        .update_profile(
            -1,
            &ProfileUpdate {
                city: Some("Lyon".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect_err("must fail");
    assert!(matches!(err, StoreError::UserNotFound));
}

#[tokio::test]
async fn test_change_password_flow() {
    let ctx = TestContext::new().await.expect("test context");

    let email = unique_email();
    let profile = ctx.users.register(&registration(&email)).await.expect("register");

    // Wrong current password is rejected
    let err = ctx
        .users
        .change_password(profile.id, "Wr0ng!pass", "N3wSecr3t!")
        .await
        .expect_err("must fail");
    assert!(matches!(err, StoreError::InvalidPassword));

    // Correct current password replaces the hash
    ctx.users
        .change_password(profile.id, "Secr3t!A", "N3wSecr3t!")
        .await
        .expect("change password");

    ctx.users
        .authenticate(&email, "N3wSecr3t!")
        .await
        .expect("new password works");

    let err = ctx
        .users
        .authenticate(&email, "Secr3t!A")
        .await
        .expect_err("old password must fail");
    assert!(matches!(err, StoreError::InvalidPassword));

    ctx.users.delete(profile.id).await.expect("cleanup");
}

#[tokio::test]
async fn test_change_password_unknown_user() {
    let ctx = TestContext::new().await.expect("test context");

    let err = ctx
        .users
        .change_password(-1, "Secr3t!A", "N3wSecr3t!")
        .await
        .expect_err("must fail");
    assert!(matches!(err, StoreError::UserNotFound));
}

#[tokio::test]
async fn test_delete_user_removes_threads_and_checkpoints() {
    let ctx = TestContext::new().await.expect("test context");

    let email = unique_email();
    let profile = ctx.users.register(&registration(&email)).await.expect("register");

    let thread_a = ctx
        .threads
        .create(profile.id, Some("Weeknight Pasta"))
        .await
        .expect("thread a");
    let thread_b = ctx
        .threads
        .create(profile.id, None)
        .await
        .expect("thread b");

    common::seed_checkpoint_state(&ctx.db, thread_a)
        .await
        .expect("seed a");
    common::seed_checkpoint_state(&ctx.db, thread_b)
        .await
        .expect("seed b");

    ctx.users.delete(profile.id).await.expect("delete user");

    let err = ctx.users.get_profile(profile.id).await.expect_err("gone");
    assert!(matches!(err, StoreError::UserNotFound));

    for thread_id in [thread_a, thread_b] {
        let err = ctx.threads.get_details(thread_id).await.expect_err("gone");
        assert!(matches!(err, StoreError::ThreadNotFound));

        let rows = common::checkpoint_rows(&ctx.db, thread_id)
            .await
            .expect("count");
        assert_eq!(rows, 0, "checkpoint state for thread {} must be purged", thread_id);
    }
}

#[tokio::test]
async fn test_delete_unknown_user() {
    let ctx = TestContext::new().await.expect("test context");

    let err = ctx.users.delete(-1).await.expect_err("must fail");
    assert!(matches!(err, StoreError::UserNotFound));
}
