/// End-to-end account and conversation scenario
///
/// Walks the full happy path a user takes through the store: register,
/// fail a login, log in, start a conversation, delete it.
mod common;

use common::TestContext;
use souschef_store::error::StoreError;
use souschef_store::validation::RegistrationInput;
use uuid::Uuid;

#[tokio::test]
async fn test_register_chat_and_clean_up() {
    let ctx = TestContext::new().await.expect("test context");

    // Unique address, mixed case on purpose
    let local = format!("ana-{}", Uuid::new_v4());
    let email = format!("{}@example.com", local);

    let profile = ctx
        .users
        .register(&RegistrationInput {
            first_name: "Ana".to_string(),
            last_name: "Lee".to_string(),
            email: format!("{}@Example.com", local.to_uppercase()),
            password: "Secr3t!A".to_string(),
            ..Default::default()
        })
        .await
        .expect("register");
    assert_eq!(profile.email, email);

    // Wrong password is rejected
    let err = ctx
        .users
        .authenticate(&email, "wrong")
        .await
        .expect_err("wrong password must fail");
    assert!(matches!(err, StoreError::InvalidPassword));

    // Correct password succeeds; no threads yet
    let logged_in = ctx
        .users
        .authenticate(&email, "Secr3t!A")
        .await
        .expect("authenticate");
    assert_eq!(logged_in.thread_number, 0);

    // Starting a conversation bumps the counter
    let thread_id = ctx
        .threads
        .create(logged_in.id, Some("Dinner Ideas"))
        .await
        .expect("create thread");
    let with_thread = ctx.users.get_profile(logged_in.id).await.expect("profile");
    assert_eq!(with_thread.thread_number, 1);

    // Deleting it restores the counter and empties the listing
    ctx.threads.delete(thread_id).await.expect("delete thread");

    let after = ctx.users.get_profile(logged_in.id).await.expect("profile");
    assert_eq!(after.thread_number, 0);

    let listed = ctx
        .threads
        .list_for_user(logged_in.id)
        .await
        .expect("list");
    assert!(listed.is_empty());

    ctx.users.delete(logged_in.id).await.expect("cleanup");
}
