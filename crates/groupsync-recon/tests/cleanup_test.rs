//! Duplicate and orphaned link cleanup behavior.

mod common;

use common::InMemoryStore;
use groupsync_db::LinkId;
use groupsync_recon::DuplicateLinkCleaner;
use uuid::Uuid;

#[tokio::test]
async fn collapses_duplicates_to_one_link_per_pair() {
    let store = InMemoryStore::new();
    let group_id = store.add_group("Everyone", false, false);
    let user = store.add_user();
    store.raw_link(group_id, user);
    store.raw_link(group_id, user);
    store.raw_link(group_id, user);

    let report = DuplicateLinkCleaner::new(&store).run().await.unwrap();

    assert_eq!(report.removed, 2);
    assert!(report.is_clean());
    assert_eq!(store.pair_links(group_id, user).len(), 1);
}

#[tokio::test]
async fn lowest_link_id_survives() {
    let store = InMemoryStore::new();
    let group_id = store.add_group("Everyone", false, false);
    let user = store.add_user();

    let low = LinkId(Uuid::from_u128(1));
    let mid = LinkId(Uuid::from_u128(2));
    let high = LinkId(Uuid::from_u128(3));
    store.raw_link_with_id(high, group_id, user);
    store.raw_link_with_id(low, group_id, user);
    store.raw_link_with_id(mid, group_id, user);

    DuplicateLinkCleaner::new(&store).run().await.unwrap();

    assert_eq!(store.pair_links(group_id, user), vec![low]);
}

#[tokio::test]
async fn unique_pairs_are_untouched() {
    let store = InMemoryStore::new();
    let group_id = store.add_group("Everyone", false, false);
    let a = store.add_user();
    let b = store.add_user();
    let kept_a = store.raw_link(group_id, a);
    let kept_b = store.raw_link(group_id, b);

    let report = DuplicateLinkCleaner::new(&store).run().await.unwrap();

    assert_eq!(report.removed, 0);
    assert_eq!(store.pair_links(group_id, a), vec![kept_a]);
    assert_eq!(store.pair_links(group_id, b), vec![kept_b]);
}

#[tokio::test]
async fn second_run_removes_nothing() {
    let store = InMemoryStore::new();
    let group_id = store.add_group("Everyone", false, false);
    let user = store.add_user();
    store.raw_link(group_id, user);
    store.raw_link(group_id, user);

    let cleaner = DuplicateLinkCleaner::new(&store);

    let first = cleaner.run().await.unwrap();
    assert_eq!(first.removed, 1);

    let second = cleaner.run().await.unwrap();
    assert_eq!(second.removed, 0);
    assert_eq!(second.orphaned, 0);
}

#[tokio::test]
async fn pair_uniqueness_holds_after_any_successful_run() {
    let store = InMemoryStore::new();
    let group_a = store.add_group("Everyone", false, false);
    let group_b = store.add_group("Staff", false, false);
    let users: Vec<_> = (0..4).map(|_| store.add_user()).collect();

    for &user in &users {
        for group in [group_a, group_b] {
            store.raw_link(group, user);
            store.raw_link(group, user);
        }
    }

    DuplicateLinkCleaner::new(&store).run().await.unwrap();

    for &user in &users {
        for group in [group_a, group_b] {
            assert_eq!(store.pair_links(group, user).len(), 1);
        }
    }
}

#[tokio::test]
async fn removes_links_to_missing_users() {
    let store = InMemoryStore::new();
    let group_id = store.add_group("Everyone", false, false);
    let user = store.add_user();
    store.raw_link(group_id, user);
    // A link whose user row never existed.
    store.raw_link(group_id, groupsync_db::UserId::from(Uuid::new_v4()));

    let report = DuplicateLinkCleaner::new(&store).run().await.unwrap();

    assert_eq!(report.orphaned, 1);
    assert_eq!(store.pair_links(group_id, user).len(), 1);
    assert_eq!(store.link_count(), 1);
}

#[tokio::test]
async fn failed_pair_does_not_abort_the_rest() {
    let store = InMemoryStore::new();
    let group_id = store.add_group("Everyone", false, false);
    let healthy = store.add_user();
    let poisoned = store.add_user();

    store.raw_link(group_id, healthy);
    store.raw_link(group_id, healthy);

    let keep = LinkId(Uuid::from_u128(10));
    let doomed = LinkId(Uuid::from_u128(11));
    store.raw_link_with_id(keep, group_id, poisoned);
    store.raw_link_with_id(doomed, group_id, poisoned);
    store.poison_delete(doomed);

    let cleaner = DuplicateLinkCleaner::new(&store);

    let report = cleaner.run().await.unwrap();
    assert_eq!(report.removed, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].group_id, group_id);
    assert_eq!(report.failures[0].user_id, poisoned);
    assert!(!report.is_clean());

    // The healthy pair is fixed, the failed pair is still duplicated.
    assert_eq!(store.pair_links(group_id, healthy).len(), 1);
    assert_eq!(store.pair_links(group_id, poisoned).len(), 2);

    // Once the store recovers, a re-run finishes the job.
    store.heal_deletes();
    let retry = cleaner.run().await.unwrap();
    assert_eq!(retry.removed, 1);
    assert!(retry.is_clean());
    assert_eq!(store.pair_links(group_id, poisoned), vec![keep]);
}

#[tokio::test]
async fn empty_store_is_a_noop() {
    let store = InMemoryStore::new();

    let report = DuplicateLinkCleaner::new(&store).run().await.unwrap();

    assert_eq!(report.removed, 0);
    assert_eq!(report.orphaned, 0);
    assert!(report.is_clean());
}
