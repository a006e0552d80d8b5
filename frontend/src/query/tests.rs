use super::*;
use serde_json::json;

fn tasks_key() -> QueryKey {
    QueryKey::new("tasks")
}

fn tasks_open_key() -> QueryKey {
    QueryKey::new("tasks").with("status", "open")
}

// =========================================================
// Key canonicalization
// =========================================================

#[test]
fn identical_filters_map_to_identical_keys() {
    let a = QueryKey::new("tasks")
        .with("status", "open")
        .with("assignee_id", "u1");
    let b = QueryKey::new("tasks")
        .with("assignee_id", "u1")
        .with("status", "open");
    assert_eq!(a, b);

    let c = QueryKey::new("tasks").with_params([("assignee_id", "u1"), ("status", "open")]);
    assert_eq!(a, c);
}

#[test]
fn different_filters_are_distinct_keys() {
    assert_ne!(tasks_key(), tasks_open_key());
    assert_ne!(
        QueryKey::new("tasks").with("status", "open"),
        QueryKey::new("tasks").with("status", "done")
    );
    assert_ne!(QueryKey::new("tasks"), QueryKey::new("viewings"));
}

// =========================================================
// Fetch lifecycle
// =========================================================

#[test]
fn fetch_populates_and_freshens_entry() {
    let mut core = QueryCore::new();
    let key = tasks_key();

    assert_eq!(core.status(&key), FetchStatus::Idle);

    let ticket = core.begin_fetch(&key);
    assert_eq!(core.status(&key), FetchStatus::Fetching);
    assert!(!core.is_fresh(&key));

    assert!(core.complete_fetch(&key, ticket, json!([1, 2])));
    assert_eq!(core.status(&key), FetchStatus::Success);
    assert!(core.is_fresh(&key));
    assert_eq!(core.cached(&key), Some(json!([1, 2])));
}

#[test]
fn latest_initiated_fetch_wins() {
    let mut core = QueryCore::new();
    let key = tasks_key();

    let first = core.begin_fetch(&key);
    let second = core.begin_fetch(&key);

    // Second request resolves first
    assert!(core.complete_fetch(&key, second, json!("new")));
    // The slower, earlier-initiated request must not clobber it
    assert!(!core.complete_fetch(&key, first, json!("old")));

    assert_eq!(core.cached(&key), Some(json!("new")));
}

#[test]
fn stale_failure_does_not_mask_later_success() {
    let mut core = QueryCore::new();
    let key = tasks_key();

    let first = core.begin_fetch(&key);
    let second = core.begin_fetch(&key);

    assert!(core.complete_fetch(&key, second, json!("ok")));
    core.fail_fetch(&key, first);

    assert_eq!(core.status(&key), FetchStatus::Success);
    assert_eq!(core.cached(&key), Some(json!("ok")));
}

#[test]
fn failed_fetch_is_a_resting_state() {
    let mut core = QueryCore::new();
    let key = tasks_key();

    assert!(core.wants_fetch(&key), "unseen key wants an initial fetch");

    let ticket = core.begin_fetch(&key);
    assert!(!core.wants_fetch(&key), "in-flight fetch is not duplicated");

    core.fail_fetch(&key, ticket);
    assert_eq!(core.status(&key), FetchStatus::Error);
    assert!(
        !core.wants_fetch(&key),
        "a failure must not demand an immediate refetch"
    );
}

#[test]
fn invalidation_reawakens_a_failed_entry() {
    let mut core = QueryCore::new();
    let key = tasks_key();

    let ticket = core.begin_fetch(&key);
    core.fail_fetch(&key, ticket);
    assert!(!core.wants_fetch(&key));

    core.invalidate_family("tasks");
    assert_eq!(core.status(&key), FetchStatus::Idle);
    assert!(core.wants_fetch(&key), "next read after invalidation refetches");
}

// =========================================================
// Family invalidation
// =========================================================

#[test]
fn mutation_invalidates_every_key_in_the_family() {
    // Scenario: creating a task must stale both the general list
    // and the per-status view
    let mut core = QueryCore::new();
    let list = tasks_key();
    let by_status = tasks_open_key();

    let t1 = core.begin_fetch(&list);
    core.complete_fetch(&list, t1, json!([]));
    let t2 = core.begin_fetch(&by_status);
    core.complete_fetch(&by_status, t2, json!([]));

    assert!(core.is_fresh(&list));
    assert!(core.is_fresh(&by_status));

    assert_eq!(core.invalidate_family("tasks"), 2);

    assert!(!core.is_fresh(&list), "general list must be stale");
    assert!(!core.is_fresh(&by_status), "per-status view must be stale");
    // Cached values remain available for display while refetching
    assert_eq!(core.cached(&list), Some(json!([])));
}

#[test]
fn invalidation_leaves_other_families_untouched() {
    let mut core = QueryCore::new();
    let tasks = tasks_key();
    let viewings = QueryKey::new("viewings");

    let t1 = core.begin_fetch(&tasks);
    core.complete_fetch(&tasks, t1, json!([]));
    let t2 = core.begin_fetch(&viewings);
    core.complete_fetch(&viewings, t2, json!([]));

    core.invalidate_family("tasks");

    assert!(!core.is_fresh(&tasks));
    assert!(core.is_fresh(&viewings));
}

#[test]
fn fetch_started_before_invalidation_cannot_freshen_entry() {
    let mut core = QueryCore::new();
    let key = tasks_key();

    let ticket = core.begin_fetch(&key);
    core.invalidate_family("tasks");

    // The response still lands (it is the most recently resolved),
    // but the entry stays stale so the next read refetches
    assert!(core.complete_fetch(&key, ticket, json!("pre-invalidation")));
    assert_eq!(core.cached(&key), Some(json!("pre-invalidation")));
    assert!(!core.is_fresh(&key));
}

#[test]
fn refetch_after_invalidation_freshens_entry() {
    let mut core = QueryCore::new();
    let key = tasks_key();

    let t1 = core.begin_fetch(&key);
    core.complete_fetch(&key, t1, json!("v1"));
    core.invalidate_family("tasks");
    assert!(!core.is_fresh(&key));

    let t2 = core.begin_fetch(&key);
    assert!(core.complete_fetch(&key, t2, json!("v2")));
    assert!(core.is_fresh(&key));
    assert_eq!(core.cached(&key), Some(json!("v2")));
}

#[test]
fn stale_success_entry_wants_a_refetch() {
    let mut core = QueryCore::new();
    let key = tasks_key();

    let t1 = core.begin_fetch(&key);
    core.complete_fetch(&key, t1, json!([]));
    assert!(!core.wants_fetch(&key), "fresh data needs no fetch");

    core.invalidate_family("tasks");
    assert!(core.wants_fetch(&key));
}

// =========================================================
// Context integration
// =========================================================

#[test]
fn client_context_wrapper_meets_the_context_bounds() {
    // provide_context demands Send + Sync payloads; the cache handle
    // is provided wrapped in SendWrapper
    fn assert_context_payload<T: Clone + Send + Sync + 'static>() {}
    assert_context_payload::<SendWrapper<QueryClient>>();
}
