use sos_contacts::{ContactError, ContactRepository, StoredContactRepository};
use sos_domain::{ContactDraft, ContactId, UserId};
use sos_storage::Storage;
use std::sync::Arc;
use tempfile::TempDir;

async fn repository(temp: &TempDir) -> StoredContactRepository {
    let storage = Storage::builder().root(temp.path()).connect().await.expect("connect");
    StoredContactRepository::new(&storage).expect("repository")
}

fn user(id: &str) -> UserId {
    UserId::parse(id).expect("user id")
}

fn priority_ids(contacts: &[sos_domain::Contact]) -> Vec<ContactId> {
    contacts.iter().filter(|c| c.is_priority).map(|c| c.id.clone()).collect()
}

#[tokio::test]
async fn empty_list_for_new_user() {
    let temp = TempDir::new().expect("tempdir");
    let repo = repository(&temp).await;
    assert!(repo.list(&user("u1")).await.expect("list").is_empty());
}

#[tokio::test]
async fn add_assigns_ids_and_keeps_order() {
    let temp = TempDir::new().expect("tempdir");
    let repo = repository(&temp).await;
    let u = user("u1");

    let alice = repo.add(&u, ContactDraft::new("Alice", "9876543210")).await.expect("add");
    let bob = repo.add(&u, ContactDraft::new(" Bob ", "9123456780")).await.expect("add");

    assert_eq!(alice.id.as_str().len(), 12);
    assert_ne!(alice.id, bob.id);
    assert_eq!(bob.name, "Bob");

    let names: Vec<String> =
        repo.list(&u).await.expect("list").into_iter().map(|c| c.name).collect();
    assert_eq!(names, ["Alice", "Bob"]);
}

#[tokio::test]
async fn invalid_drafts_are_rejected_before_storage() {
    let temp = TempDir::new().expect("tempdir");
    let repo = repository(&temp).await;
    let u = user("u1");

    let err = repo.add(&u, ContactDraft::new("Alice", "12345")).await.expect_err("short phone");
    assert!(matches!(err, ContactError::InvalidContact { .. }));
    let err = repo.add(&u, ContactDraft::new("   ", "9876543210")).await.expect_err("blank");
    assert_eq!(err.kind(), "invalid_contact");
    assert!(repo.list(&u).await.expect("list").is_empty());
}

#[tokio::test]
async fn users_are_isolated() {
    let temp = TempDir::new().expect("tempdir");
    let repo = repository(&temp).await;

    repo.add(&user("u1"), ContactDraft::new("Alice", "9876543210")).await.expect("add");
    assert!(repo.list(&user("u2")).await.expect("list").is_empty());
}

#[tokio::test]
async fn unaddressable_user_is_unauthenticated() {
    let temp = TempDir::new().expect("tempdir");
    let repo = repository(&temp).await;

    let err = repo.list(&user("../etc")).await.expect_err("bad key");
    assert!(matches!(err, ContactError::Unauthenticated { .. }));
}

#[tokio::test]
async fn priority_on_insert_clears_previous_holder() {
    let temp = TempDir::new().expect("tempdir");
    let repo = repository(&temp).await;
    let u = user("u1");

    let alice =
        repo.add(&u, ContactDraft::new("Alice", "9876543210").priority(true)).await.expect("add");
    let bob =
        repo.add(&u, ContactDraft::new("Bob", "9123456780").priority(true)).await.expect("add");

    let contacts = repo.list(&u).await.expect("list");
    assert_eq!(priority_ids(&contacts), [bob.id.clone()]);

    repo.update(&u, &alice.id, ContactDraft::new("Alice A.", "9876543210").priority(true))
        .await
        .expect("update");
    let contacts = repo.list(&u).await.expect("list");
    assert_eq!(priority_ids(&contacts), [alice.id]);
    assert_eq!(contacts[0].name, "Alice A.");
}

#[tokio::test]
async fn set_priority_moves_the_flag() {
    let temp = TempDir::new().expect("tempdir");
    let repo = repository(&temp).await;
    let u = user("u1");

    let alice = repo.add(&u, ContactDraft::new("Alice", "9876543210")).await.expect("add");
    let bob = repo.add(&u, ContactDraft::new("Bob", "9123456780")).await.expect("add");

    repo.set_priority(&u, &alice.id).await.expect("priority");
    repo.set_priority(&u, &bob.id).await.expect("priority");

    let contacts = repo.list(&u).await.expect("list");
    assert_eq!(priority_ids(&contacts), [bob.id]);
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let temp = TempDir::new().expect("tempdir");
    let repo = repository(&temp).await;
    let u = user("u1");
    let ghost = ContactId::from("ghost");

    repo.add(&u, ContactDraft::new("Alice", "9876543210")).await.expect("add");

    assert!(matches!(repo.set_priority(&u, &ghost).await, Err(ContactError::NotFound { .. })));
    assert!(matches!(repo.delete(&u, &ghost).await, Err(ContactError::NotFound { .. })));
    assert!(matches!(
        repo.update(&u, &ghost, ContactDraft::new("X", "9876543210")).await,
        Err(ContactError::NotFound { .. })
    ));
    assert_eq!(repo.list(&u).await.expect("list").len(), 1);
}

#[tokio::test]
async fn delete_removes_only_that_contact() {
    let temp = TempDir::new().expect("tempdir");
    let repo = repository(&temp).await;
    let u = user("u1");

    let alice = repo.add(&u, ContactDraft::new("Alice", "9876543210")).await.expect("add");
    let bob = repo.add(&u, ContactDraft::new("Bob", "9123456780")).await.expect("add");

    repo.delete(&u, &alice.id).await.expect("delete");
    let remaining: Vec<ContactId> =
        repo.list(&u).await.expect("list").into_iter().map(|c| c.id).collect();
    assert_eq!(remaining, [bob.id]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_priority_changes_leave_exactly_one_holder() {
    let temp = TempDir::new().expect("tempdir");
    let repo = Arc::new(repository(&temp).await);
    let u = user("u1");

    let mut ids = Vec::new();
    for i in 0..6 {
        let phone = format!("98765432{i:02}");
        ids.push(repo.add(&u, ContactDraft::new(format!("C{i}"), phone)).await.expect("add").id);
    }

    let tasks = ids.iter().cycle().take(24).cloned().map(|id| {
        let repo = Arc::clone(&repo);
        let u = u.clone();
        tokio::spawn(async move { repo.set_priority(&u, &id).await })
    });
    for outcome in futures::future::join_all(tasks).await {
        outcome.expect("join").expect("set_priority");
    }

    let contacts = repo.list(&u).await.expect("list");
    assert_eq!(contacts.len(), 6);
    assert_eq!(priority_ids(&contacts).len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn separate_repositories_on_one_store_still_converge() {
    let temp = TempDir::new().expect("tempdir");
    let storage = Storage::builder().root(temp.path()).connect().await.expect("connect");
    let first = StoredContactRepository::new(&storage).expect("repository");
    let second = StoredContactRepository::new(&storage).expect("repository");
    let u = user("u1");

    let alice = first.add(&u, ContactDraft::new("Alice", "9876543210")).await.expect("add");
    let bob = first.add(&u, ContactDraft::new("Bob", "9123456780")).await.expect("add");

    let (a, b) = tokio::join!(first.set_priority(&u, &alice.id), second.set_priority(&u, &bob.id));
    // A lost race surfaces as Conflict only after every retry lost too.
    for outcome in [a, b] {
        assert!(matches!(outcome, Ok(()) | Err(ContactError::Conflict { .. })));
    }

    let contacts = first.list(&u).await.expect("list");
    assert_eq!(priority_ids(&contacts).len(), 1);
}
