#![forbid(unsafe_code)]

use rusqlite::{Connection, params};
use std::path::PathBuf;
use tally_core::ids::{ActorId, RecordId};
use tally_core::model::{Flow, RecordKind, Visibility};
use tally_storage::{
    AccountCreateRequest, AccountUpdateRequest, BudgetCreateRequest, CategoryCreateRequest,
    CurrencyCreateRequest, ListRequest, OperationCreateRequest, OperationUpdateRequest,
    RestoreRequest, SoftDeleteRequest, SqliteStore, StoreError,
};

fn temp_dir(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let dir = base.join(format!("tally_storage_{test_name}_{pid}_{nonce}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn actor() -> ActorId {
    ActorId::try_new("alice").expect("actor id")
}

fn create_account(store: &mut SqliteStore, name: &str) -> RecordId {
    store
        .account_create(AccountCreateRequest {
            name: name.to_string(),
            currency: "USD".to_string(),
            opening_minor: 0,
            actor: actor(),
        })
        .expect("create account")
        .id
}

#[test]
fn create_appends_at_end_and_stamps_attribution() {
    let dir = temp_dir("create_appends_at_end_and_stamps_attribution");
    let mut store = SqliteStore::open(&dir).expect("open store");

    let first = store
        .account_create(AccountCreateRequest {
            name: "checking".to_string(),
            currency: "USD".to_string(),
            opening_minor: 12_500,
            actor: actor(),
        })
        .expect("create account");
    let second = create_account(&mut store, "savings");

    assert_eq!(first.position, 1);
    assert_eq!(
        store
            .account_get(second)
            .expect("get account")
            .expect("account exists")
            .position,
        2
    );
    assert_eq!(first.audit.created_by.as_deref(), Some("alice"));
    assert!(first.audit.create_time.is_some());
    assert_eq!(first.audit.update_time, None);
    assert_eq!(first.opening_minor, 12_500);
}

#[test]
fn create_allocates_past_stale_tombstone_positions() {
    let dir = temp_dir("create_allocates_past_stale_tombstone_positions");
    let mut store = SqliteStore::open(&dir).expect("open store");
    create_account(&mut store, "a");
    create_account(&mut store, "b");

    // A tombstoned row holding the stale table maximum, as older
    // databases contain.
    {
        let conn = Connection::open(dir.join("tally.db")).expect("open db");
        conn.execute(
            "INSERT INTO accounts(name, currency, opening_minor, position, delete_time, deleted_by) \
             VALUES ('ghost', 'USD', 0, 7, '2026-01-01T00:00:00Z', 'mallory')",
            params![],
        )
        .expect("insert stale tombstone");
    }

    let record = store
        .account_create(AccountCreateRequest {
            name: "c".to_string(),
            currency: "USD".to_string(),
            opening_minor: 0,
            actor: actor(),
        })
        .expect("create account");
    assert_eq!(
        record.position, 8,
        "allocation counts tombstoned rows so fresh positions never collide"
    );
}

#[test]
fn account_update_edits_selected_fields() {
    let dir = temp_dir("account_update_edits_selected_fields");
    let mut store = SqliteStore::open(&dir).expect("open store");
    let id = create_account(&mut store, "checking");

    let updated = store
        .account_update(AccountUpdateRequest {
            id,
            name: Some("daily checking".to_string()),
            currency: None,
            opening_minor: None,
            actor: ActorId::try_new("bob").expect("actor id"),
        })
        .expect("update account")
        .expect("account exists");
    assert_eq!(updated.name, "daily checking");
    assert_eq!(updated.currency, "USD", "untouched fields keep their value");
    assert_eq!(updated.audit.updated_by.as_deref(), Some("bob"));
    assert!(updated.audit.update_time.is_some());
}

#[test]
fn account_update_rejects_empty_edits_and_skips_missing_rows() {
    let dir = temp_dir("account_update_rejects_empty_edits_and_skips_missing_rows");
    let mut store = SqliteStore::open(&dir).expect("open store");
    let id = create_account(&mut store, "checking");

    let err = store
        .account_update(AccountUpdateRequest {
            id,
            name: None,
            currency: None,
            opening_minor: None,
            actor: actor(),
        })
        .expect_err("expected rejection");
    match err {
        StoreError::InvalidInput(message) => assert_eq!(message, "no fields to edit"),
        other => panic!("expected InvalidInput error, got {other:?}"),
    }

    let missing = store
        .account_update(AccountUpdateRequest {
            id: RecordId::new(999),
            name: Some("x".to_string()),
            currency: None,
            opening_minor: None,
            actor: actor(),
        })
        .expect("update account");
    assert!(missing.is_none());

    store
        .soft_delete(RecordKind::Account, SoftDeleteRequest { id, actor: actor() })
        .expect("soft delete");
    let tombstoned = store
        .account_update(AccountUpdateRequest {
            id,
            name: Some("x".to_string()),
            currency: None,
            opening_minor: None,
            actor: actor(),
        })
        .expect("update account");
    assert!(tombstoned.is_none(), "tombstoned rows are not editable");
}

#[test]
fn create_rejects_blank_names() {
    let dir = temp_dir("create_rejects_blank_names");
    let mut store = SqliteStore::open(&dir).expect("open store");

    let err = store
        .account_create(AccountCreateRequest {
            name: "   ".to_string(),
            currency: "USD".to_string(),
            opening_minor: 0,
            actor: actor(),
        })
        .expect_err("expected rejection");
    match err {
        StoreError::InvalidInput(message) => {
            assert_eq!(message, "account name must not be empty");
        }
        other => panic!("expected InvalidInput error, got {other:?}"),
    }
}

#[test]
fn every_orderable_kind_creates_and_lists() {
    let dir = temp_dir("every_orderable_kind_creates_and_lists");
    let mut store = SqliteStore::open(&dir).expect("open store");

    store
        .category_create(CategoryCreateRequest {
            name: "groceries".to_string(),
            flow: Flow::Expense,
            actor: actor(),
        })
        .expect("create category");
    store
        .currency_create(CurrencyCreateRequest {
            code: "EUR".to_string(),
            symbol: Some("€".to_string()),
            decimal_places: 2,
            actor: actor(),
        })
        .expect("create currency");
    store
        .budget_create(BudgetCreateRequest {
            name: "food".to_string(),
            amount_minor: 40_000,
            currency: "EUR".to_string(),
            actor: actor(),
        })
        .expect("create budget");

    let categories = store
        .category_list(Default::default())
        .expect("list categories");
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].flow, Flow::Expense);

    let currencies = store
        .currency_list(Default::default())
        .expect("list currencies");
    assert_eq!(currencies.len(), 1);
    assert_eq!(currencies[0].symbol.as_deref(), Some("€"));

    let budgets = store.budget_list(Default::default()).expect("list budgets");
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0].amount_minor, 40_000);
}

#[test]
fn list_respects_limit_and_offset() {
    let dir = temp_dir("list_respects_limit_and_offset");
    let mut store = SqliteStore::open(&dir).expect("open store");
    for name in ["a", "b", "c", "d"] {
        create_account(&mut store, name);
    }

    let page = store
        .account_list(ListRequest {
            visibility: Visibility::Live,
            limit: Some(2),
            offset: 1,
        })
        .expect("list accounts");
    let names: Vec<&str> = page.iter().map(|record| record.name.as_str()).collect();
    assert_eq!(names, vec!["b", "c"]);
}

#[test]
fn operations_share_the_tombstone_lifecycle_without_positions() {
    let dir = temp_dir("operations_share_the_tombstone_lifecycle_without_positions");
    let mut store = SqliteStore::open(&dir).expect("open store");
    let account_id = create_account(&mut store, "checking");
    let category_id = store
        .category_create(CategoryCreateRequest {
            name: "groceries".to_string(),
            flow: Flow::Expense,
            actor: actor(),
        })
        .expect("create category")
        .id;

    let operation = store
        .operation_create(OperationCreateRequest {
            account_id,
            category_id: Some(category_id),
            amount_minor: -2_350,
            note: Some("weekly shop".to_string()),
            occurred_on: "2026-08-01".to_string(),
            actor: actor(),
        })
        .expect("create operation");

    let deleted = store
        .operation_soft_delete(SoftDeleteRequest {
            id: operation.id,
            actor: actor(),
        })
        .expect("soft delete operation");
    assert!(deleted);
    assert!(store
        .operation_list(Default::default())
        .expect("list operations")
        .is_empty());
    assert_eq!(
        store
            .operation_list(ListRequest {
                visibility: Visibility::Deleted,
                ..Default::default()
            })
            .expect("list operations")
            .len(),
        1
    );

    let restored = store
        .operation_restore(RestoreRequest {
            id: operation.id,
            actor: actor(),
        })
        .expect("restore operation");
    assert!(restored);

    let updated = store
        .operation_update(OperationUpdateRequest {
            id: operation.id,
            account_id: None,
            category_id: Some(None),
            amount_minor: Some(-2_500),
            note: None,
            occurred_on: None,
            actor: actor(),
        })
        .expect("update operation")
        .expect("operation exists");
    assert_eq!(updated.amount_minor, -2_500);
    assert_eq!(updated.category_id, None);
    assert_eq!(updated.note.as_deref(), Some("weekly shop"));
}

#[test]
fn operation_create_enforces_account_reference() {
    let dir = temp_dir("operation_create_enforces_account_reference");
    let mut store = SqliteStore::open(&dir).expect("open store");

    let err = store
        .operation_create(OperationCreateRequest {
            account_id: RecordId::new(999),
            category_id: None,
            amount_minor: 100,
            note: None,
            occurred_on: "2026-08-01".to_string(),
            actor: actor(),
        })
        .expect_err("expected foreign key rejection");
    match err {
        StoreError::Sql(_) => {}
        other => panic!("expected Sql error, got {other:?}"),
    }
}

#[test]
fn uncommitted_transaction_is_not_persisted_after_reopen() {
    let dir = temp_dir("uncommitted_transaction_is_not_persisted_after_reopen");

    {
        let _store = SqliteStore::open(&dir).expect("open store");
    }

    let db_path = dir.join("tally.db");
    {
        let mut conn = Connection::open(&db_path).expect("open db");
        let tx = conn.transaction().expect("begin tx");
        tx.execute(
            "INSERT INTO accounts(name, currency, opening_minor, position) \
             VALUES ('phantom', 'USD', 0, 1)",
            params![],
        )
        .expect("insert inside tx");
        // Dropped without commit: nothing may survive the reopen.
    }

    let store = SqliteStore::open(&dir).expect("reopen store");
    assert!(store
        .account_list(Default::default())
        .expect("list accounts")
        .is_empty());
}
