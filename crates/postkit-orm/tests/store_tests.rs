//! Behaviour every PostStore backend must share.
//!
//! The PostgreSQL variant needs `TEST_DATABASE_URL` and is ignored by default:
//! `TEST_DATABASE_URL=postgres://... cargo test -p postkit-orm -- --ignored`

use postkit_orm::{seed_demo_data, MemoryStore, PgStore, PostAttributes, PostStore, ValidPost};

async fn valid(title: &str, description: &str) -> ValidPost {
    PostAttributes::new(title, description)
        .validate()
        .await
        .expect("fixture attributes are valid")
}

async fn exercise_store(store: &dyn PostStore) {
    let alice = store.create_user("alice").await.unwrap();
    let bob = store.create_user("bob").await.unwrap();
    let before = store.count_posts().await.unwrap();

    // create + scoped reads
    let first = store
        .create_post(alice.id, valid("Testing Post", "Testing Description").await)
        .await
        .unwrap();
    let second = store
        .create_post(alice.id, valid("Another Post", "More text").await)
        .await
        .unwrap();
    let bobs = store
        .create_post(bob.id, valid("Bob's Post", "Bob wrote this").await)
        .await
        .unwrap();

    assert_eq!(first.user_id, alice.id);
    assert_eq!(store.count_posts().await.unwrap(), before + 3);
    assert_eq!(
        store.list_posts(alice.id).await.unwrap(),
        vec![first.clone(), second.clone()]
    );
    assert_eq!(
        store.find_post(alice.id, first.id).await.unwrap(),
        Some(first.clone())
    );

    // another user's post is invisible
    assert_eq!(store.find_post(alice.id, bobs.id).await.unwrap(), None);
    assert_eq!(
        store
            .update_post(alice.id, bobs.id, valid("Hijacked", "nope").await)
            .await
            .unwrap(),
        None
    );
    assert_eq!(store.delete_post(alice.id, bobs.id).await.unwrap(), None);
    assert_eq!(
        store.find_post(bob.id, bobs.id).await.unwrap().map(|p| p.title),
        Some("Bob's Post".to_string())
    );

    // update in place
    let updated = store
        .update_post(alice.id, first.id, valid("Update Post", "Changed").await)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.id, first.id);
    assert_eq!(updated.title, "Update Post");
    assert_eq!(updated.description, "Changed");
    assert_eq!(store.count_posts().await.unwrap(), before + 3);

    // hard delete
    let deleted = store.delete_post(alice.id, second.id).await.unwrap();
    assert_eq!(deleted, Some(second.clone()));
    assert_eq!(store.count_posts().await.unwrap(), before + 2);
    assert_eq!(store.find_post(alice.id, second.id).await.unwrap(), None);
    assert_eq!(store.delete_post(alice.id, second.id).await.unwrap(), None);
}

#[tokio::test]
async fn memory_store_contract() {
    let store = MemoryStore::new();
    exercise_store(&store).await;
    assert_eq!(store.backend_name(), "memory");
}

#[tokio::test]
async fn memory_store_lists_nothing_for_unknown_user() {
    let store = MemoryStore::new();
    assert!(store.list_posts(12345).await.unwrap().is_empty());
    assert!(store.find_user(12345).await.unwrap().is_none());
}

#[tokio::test]
async fn seed_only_runs_on_empty_store() {
    let store = MemoryStore::new();

    let user = seed_demo_data(&store).await.unwrap().expect("seeded user");
    assert_eq!(store.list_posts(user.id).await.unwrap().len(), 1);

    assert!(seed_demo_data(&store).await.unwrap().is_none());
    assert_eq!(store.count_users().await.unwrap(), 1);
    assert_eq!(store.count_posts().await.unwrap(), 1);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn postgres_store_contract() {
    let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL must be set");
    let store = PgStore::connect(&url).await.unwrap();
    store.migrate().await.unwrap();

    exercise_store(&store).await;
    assert_eq!(store.backend_name(), "postgres");
}
