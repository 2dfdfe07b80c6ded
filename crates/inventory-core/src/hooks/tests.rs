//! Hook Integration Tests
//!
//! Inventory and auth hooks driven against the in-memory backend.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use pretty_assertions::assert_eq;

use super::*;
use crate::backend::{BackendError, BackendOp, MemoryBackend};
use crate::domain::{DomainError, EditState, InventoryItem, ItemDraft, ItemField, ItemId, ItemStatus, Pool};

type PoolCell = Rc<RefCell<PoolState>>;
type AuthCell = Rc<RefCell<AuthState>>;

fn make_item(id: &str, gpu: &str, status: &str) -> InventoryItem {
    InventoryItem {
        id: ItemId::new(id),
        gpu: gpu.to_string(),
        status: ItemStatus::from(status),
        location: "SJC".to_string(),
        notes: None,
    }
}

fn draft(gpu: &str, status: &str, location: &str) -> ItemDraft {
    ItemDraft {
        gpu: gpu.to_string(),
        status: status.to_string(),
        location: location.to_string(),
        notes: String::new(),
    }
}

fn seeded_backend() -> Arc<MemoryBackend> {
    Arc::new(MemoryBackend::new().with_items(
        Pool::Global,
        vec![
            make_item("1", "H100", "not billed"),
            make_item("0", "A100", "billed"),
            make_item("2", "A100", "consumed"),
        ],
    ))
}

async fn loaded_hook(backend: &Arc<MemoryBackend>) -> InventoryHook<PoolCell, MemoryBackend> {
    let hook = InventoryHook::new(Rc::new(RefCell::new(PoolState::new(Pool::Global))), Arc::clone(backend));
    hook.load().await.expect("initial load");
    hook
}

fn auth_hook(backend: &Arc<MemoryBackend>) -> AuthHook<AuthCell, MemoryBackend> {
    AuthHook::new(Rc::new(RefCell::new(AuthState::new())), Arc::clone(backend))
}

/// Answers confirmation prompts with a fixed answer
struct Answer(bool);

impl ConfirmPrompt for Answer {
    fn confirm(&self, _message: &str) -> bool {
        self.0
    }
}

/// Credential prompt with canned answers that records what it was asked
#[derive(Default)]
struct ScriptedPrompt {
    email: Option<String>,
    password: Option<String>,
    asked: RefCell<Vec<CredentialField>>,
}

impl CredentialPrompt for ScriptedPrompt {
    fn ask(&self, field: CredentialField) -> Option<String> {
        self.asked.borrow_mut().push(field);
        match field {
            CredentialField::Email => self.email.clone(),
            CredentialField::Password => self.password.clone(),
        }
    }
}

// ========================
// Inventory
// ========================

#[tokio::test]
async fn test_load_orders_by_gpu() {
    let backend = seeded_backend();
    let hook = loaded_hook(&backend).await;

    hook.state().with_state(|s| {
        let gpus: Vec<&str> = s.items().iter().map(|i| i.gpu.as_str()).collect();
        assert_eq!(gpus, vec!["A100", "A100", "H100"]);
        assert_eq!(s.load_status(), &LoadStatus::Ready);
        assert!(!s.is_loading());
    });
}

#[tokio::test]
async fn test_failed_load_surfaces_error() {
    let backend = seeded_backend();
    backend.fail(BackendOp::List);
    let hook = InventoryHook::new(Rc::new(RefCell::new(PoolState::new(Pool::Global))), Arc::clone(&backend));

    assert!(hook.load().await.is_err());
    hook.state().with_state(|s| {
        assert!(s.load_error().is_some());
        assert!(s.items().is_empty());
    });

    backend.recover(BackendOp::List);
    assert_eq!(hook.load().await.unwrap(), 3);
    assert!(hook.state().with_state(|s| s.load_error().is_none()));
}

#[tokio::test]
async fn test_filter_and_stats_follow_the_filter() {
    let backend = seeded_backend();
    let hook = loaded_hook(&backend).await;

    hook.set_filter("a100");
    hook.state().with_state(|s| {
        let ids: Vec<&str> = s.filtered().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["0", "2"]);
        let stats = s.stats();
        assert_eq!((stats.total, stats.billed, stats.not_billed, stats.consumed), (2, 1, 0, 1));
    });

    hook.set_filter("");
    assert_eq!(hook.state().with_state(|s| s.stats().total), 3);
}

#[tokio::test]
async fn test_add_with_blank_required_field_makes_no_remote_call() {
    let backend = seeded_backend();
    let hook = loaded_hook(&backend).await;

    for bad in [draft("", "billed", "SJC"), draft("A100", "", "SJC"), draft("A100", "billed", "  ")] {
        let err = hook.add(&bad).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    assert_eq!(backend.call_count(BackendOp::Insert), 0);
    hook.state().with_state(|s| {
        assert_eq!(s.items().len(), 3);
        assert!(s.error().is_some());
    });
}

#[tokio::test]
async fn test_add_appends_server_record() {
    let backend = seeded_backend();
    let hook = loaded_hook(&backend).await;
    let revision = hook.state().with_state(|s| s.revision());

    let created = hook.add(&draft("B200", "billed", "TPE")).await.unwrap();
    assert!(!created.id.as_str().is_empty());
    assert_eq!(created.status, ItemStatus::Billed);

    hook.state().with_state(|s| {
        assert_eq!(s.items().len(), 4);
        assert_eq!(s.items().last(), Some(&created));
        assert!(s.revision() > revision);
        assert_eq!(s.error(), None);
    });
    assert_eq!(backend.items(Pool::Global).len(), 4);
}

#[tokio::test]
async fn test_add_failure_leaves_items_unchanged() {
    let backend = seeded_backend();
    let hook = loaded_hook(&backend).await;
    backend.fail(BackendOp::Insert);

    assert!(hook.add(&draft("B200", "billed", "TPE")).await.is_err());
    hook.state().with_state(|s| {
        assert_eq!(s.items().len(), 3);
        assert!(s.error().unwrap().contains("injected failure"));
    });
}

#[tokio::test]
async fn test_save_without_edit_is_noop() {
    let backend = seeded_backend();
    let hook = loaded_hook(&backend).await;

    assert_eq!(hook.save().await.unwrap(), SaveOutcome::NotEditing);
    assert_eq!(backend.call_count(BackendOp::Update), 0);
}

#[tokio::test]
async fn test_edit_and_save_merges_scratch() {
    let backend = seeded_backend();
    let hook = loaded_hook(&backend).await;
    let id = ItemId::new("1");

    assert_eq!(hook.edit(&id).unwrap(), None);
    assert!(hook.update_scratch(ItemField::Status, "billed"));
    assert!(hook.update_scratch(ItemField::Notes, "moved to rack 7"));

    let outcome = hook.save().await.unwrap();
    let SaveOutcome::Saved(saved) = outcome else {
        panic!("expected Saved, got {outcome:?}");
    };
    assert_eq!(saved.status, ItemStatus::Billed);
    assert_eq!(saved.notes_text(), "moved to rack 7");

    hook.state().with_state(|s| {
        assert_eq!(s.edit(), &EditState::Viewing);
        assert_eq!(s.find(&id), Some(&saved));
    });
    let stored = backend.items(Pool::Global);
    assert_eq!(stored.iter().find(|i| i.id == id), Some(&saved));
}

#[tokio::test]
async fn test_save_failure_keeps_editing() {
    let backend = seeded_backend();
    let hook = loaded_hook(&backend).await;
    let id = ItemId::new("0");
    backend.fail(BackendOp::Update);

    hook.edit(&id).unwrap();
    hook.update_scratch(ItemField::Location, "AMS");
    assert!(hook.save().await.is_err());

    hook.state().with_state(|s| {
        assert!(s.edit().is_editing(&id));
        assert_eq!(s.edit().scratch().map(|f| f.location.as_str()), Some("AMS"));
        assert_eq!(s.find(&id).map(|i| i.location.as_str()), Some("SJC"));
        assert!(s.error().is_some());
    });
}

#[tokio::test]
async fn test_save_unchanged_or_blank_scratch_skips_remote_call() {
    let backend = seeded_backend();
    let hook = loaded_hook(&backend).await;
    let id = ItemId::new("0");

    hook.edit(&id).unwrap();
    assert_eq!(hook.save().await.unwrap(), SaveOutcome::Unchanged);
    assert_eq!(hook.state().with_state(|s| s.edit().clone()), EditState::Viewing);

    hook.edit(&id).unwrap();
    hook.update_scratch(ItemField::Gpu, " ");
    assert!(matches!(hook.save().await, Err(DomainError::InvalidInput(_))));
    assert!(hook.state().with_state(|s| s.edit().is_editing(&id)));

    assert_eq!(backend.call_count(BackendOp::Update), 0);
}

#[tokio::test]
async fn test_switching_edit_target_reports_abandoned_changes() {
    let backend = seeded_backend();
    let hook = loaded_hook(&backend).await;

    hook.edit(&ItemId::new("0")).unwrap();
    assert_eq!(hook.edit(&ItemId::new("1")).unwrap(), None);

    hook.update_scratch(ItemField::Gpu, "H100 SXM");
    assert_eq!(hook.edit(&ItemId::new("2")).unwrap(), Some(ItemId::new("1")));
    assert!(hook.state().with_state(|s| s.edit().is_editing(&ItemId::new("2"))));

    assert!(matches!(hook.edit(&ItemId::new("missing")), Err(DomainError::NotFound(_))));
}

#[tokio::test]
async fn test_unconfirmed_delete_makes_no_remote_call() {
    let backend = seeded_backend();
    let hook = loaded_hook(&backend).await;
    let before = hook.state().with_state(|s| s.clone());

    let outcome = hook.delete(&ItemId::new("0"), &Answer(false)).await.unwrap();
    assert_eq!(outcome, DeleteOutcome::Cancelled);
    assert_eq!(backend.call_count(BackendOp::Delete), 0);
    assert_eq!(hook.state().with_state(|s| s.clone()), before);
}

#[tokio::test]
async fn test_confirmed_delete_removes_item() {
    let backend = seeded_backend();
    let hook = loaded_hook(&backend).await;
    let id = ItemId::new("2");
    hook.edit(&id).unwrap();

    assert_eq!(hook.delete(&id, &Confirmed).await.unwrap(), DeleteOutcome::Deleted);
    hook.state().with_state(|s| {
        assert!(s.find(&id).is_none());
        assert_eq!(s.edit(), &EditState::Viewing);
    });
    assert_eq!(backend.items(Pool::Global).len(), 2);
}

#[tokio::test]
async fn test_delete_failure_keeps_item() {
    let backend = seeded_backend();
    let hook = loaded_hook(&backend).await;
    backend.fail(BackendOp::Delete);

    assert!(hook.delete(&ItemId::new("1"), &Confirmed).await.is_err());
    hook.state().with_state(|s| {
        assert_eq!(s.items().len(), 3);
        assert!(s.error().is_some());
    });

    hook.dismiss_error();
    assert_eq!(hook.state().with_state(|s| s.error().map(str::to_string)), None);
}

#[tokio::test]
async fn test_delete_of_row_gone_remotely_keeps_local_copy() {
    let backend = seeded_backend();
    let stale = loaded_hook(&backend).await;
    let other = loaded_hook(&backend).await;
    let id = ItemId::new("0");
    other.delete(&id, &Confirmed).await.unwrap();

    let err = stale.delete(&id, &Confirmed).await.unwrap_err();
    assert!(matches!(err, DomainError::Backend(BackendError::NotFound(_))));
    stale.state().with_state(|s| {
        assert!(s.find(&id).is_some());
        assert!(s.error().is_some());
    });
    assert_eq!(backend.items(Pool::Global).len(), 2);
}

#[tokio::test]
async fn test_reload_if_loaded_skips_idle_pool() {
    let backend = seeded_backend();
    let hook = InventoryHook::new(Rc::new(RefCell::new(PoolState::new(Pool::Global))), Arc::clone(&backend));

    assert_eq!(hook.reload_if_loaded().await.unwrap(), None);
    assert_eq!(backend.call_count(BackendOp::List), 0);
    assert_eq!(hook.state().with_state(|s| s.load_status().clone()), LoadStatus::Idle);
}

#[tokio::test]
async fn test_reload_if_loaded_refetches_loaded_pool() {
    let backend = seeded_backend();
    let viewer = loaded_hook(&backend).await;
    let admin = loaded_hook(&backend).await;
    admin.add(&draft("B200", "billed", "AMS")).await.unwrap();
    assert_eq!(viewer.state().with_state(|s| s.items().len()), 3);

    assert_eq!(viewer.reload_if_loaded().await.unwrap(), Some(4));
    assert_eq!(backend.call_count(BackendOp::List), 3);
    viewer.state().with_state(|s| {
        assert_eq!(s.items().len(), 4);
        assert_eq!(s.load_status(), &LoadStatus::Ready);
    });
}

#[tokio::test]
async fn test_pools_are_independent() {
    let backend = Arc::new(
        MemoryBackend::new()
            .with_items(Pool::Global, vec![make_item("g1", "A100", "billed")])
            .with_items(Pool::Internal, vec![make_item("i1", "L40S", "consumed"), make_item("i2", "H200", "billed")]),
    );
    let global = InventoryHook::new(Rc::new(RefCell::new(PoolState::new(Pool::Global))), Arc::clone(&backend));
    let internal = InventoryHook::new(Rc::new(RefCell::new(PoolState::new(Pool::Internal))), Arc::clone(&backend));

    global.load().await.unwrap();
    internal.load().await.unwrap();
    internal.delete(&ItemId::new("i1"), &Confirmed).await.unwrap();

    assert_eq!(global.state().with_state(|s| s.items().len()), 1);
    assert_eq!(internal.state().with_state(|s| s.items().len()), 1);
    assert_eq!(backend.items(Pool::Global).len(), 1);
}

// ========================
// Auth
// ========================

#[tokio::test]
async fn test_refresh_grants_admin_for_admin_role() {
    let backend = Arc::new(
        MemoryBackend::new()
            .with_account("ops@example.com", "pw", Some("admin"))
            .with_session("ops@example.com"),
    );
    let hook = auth_hook(&backend);

    hook.refresh().await.unwrap();
    hook.state().with_state(|s| {
        assert_eq!(s.email(), Some("ops@example.com"));
        assert!(s.is_admin());
        assert!(s.can_manage());
        assert!(!s.is_checking());
    });
}

#[tokio::test]
async fn test_viewer_role_is_not_admin() {
    let backend = Arc::new(
        MemoryBackend::new()
            .with_account("viewer@example.com", "pw", Some("viewer"))
            .with_session("viewer@example.com"),
    );
    let hook = auth_hook(&backend);

    hook.refresh().await.unwrap();
    hook.state().with_state(|s| {
        assert_eq!(s.email(), Some("viewer@example.com"));
        assert!(!s.is_admin());
        assert!(!s.can_manage());
    });
}

#[tokio::test]
async fn test_role_lookup_failure_means_no_admin() {
    let backend = Arc::new(
        MemoryBackend::new()
            .with_account("ops@example.com", "pw", Some("admin"))
            .with_session("ops@example.com"),
    );
    backend.fail(BackendOp::RoleLookup);
    let hook = auth_hook(&backend);

    hook.refresh().await.unwrap();
    hook.state().with_state(|s| {
        assert_eq!(s.email(), Some("ops@example.com"));
        assert!(!s.is_admin());
    });
}

#[tokio::test]
async fn test_refresh_without_session_is_anonymous() {
    let backend = Arc::new(MemoryBackend::new());
    let hook = auth_hook(&backend);

    hook.refresh().await.unwrap();
    hook.state().with_state(|s| {
        assert_eq!(s.email(), None);
        assert!(!s.is_admin());
        assert!(!s.is_checking());
    });
    assert_eq!(backend.call_count(BackendOp::RoleLookup), 0);
}

#[tokio::test]
async fn test_failed_session_check_is_returned_to_caller() {
    let backend = Arc::new(MemoryBackend::new().with_session("ops@example.com"));
    backend.fail(BackendOp::CurrentUser);
    let hook = auth_hook(&backend);

    let err = hook.refresh().await.unwrap_err();
    assert!(matches!(err, DomainError::Backend(BackendError::Transport(_))));
    hook.state().with_state(|s| {
        assert_eq!(s.email(), None);
        assert!(!s.is_checking());
        assert_eq!(s.error(), Some(err.to_string().as_str()));
    });
    assert_eq!(backend.call_count(BackendOp::RoleLookup), 0);
}

#[tokio::test]
async fn test_wrong_password_keeps_anonymous_state() {
    let backend = Arc::new(MemoryBackend::new().with_account("ops@example.com", "right", Some("admin")));
    let hook = auth_hook(&backend);
    hook.refresh().await.unwrap();

    let result = hook
        .sign_in(Some("ops@example.com".into()), Some("wrong".into()), &ScriptedPrompt::default())
        .await;

    assert!(result.is_err());
    hook.state().with_state(|s| {
        assert_eq!(s.email(), None);
        assert!(!s.is_admin());
        assert!(s.error().unwrap().starts_with("Login failed"));
    });
    assert_eq!(backend.call_count(BackendOp::RoleLookup), 0);
}

#[tokio::test]
async fn test_sign_in_prompts_for_omitted_credentials() {
    let backend = Arc::new(MemoryBackend::new().with_account("ops@example.com", "pw", Some("admin")));
    let hook = auth_hook(&backend);
    let prompt = ScriptedPrompt {
        email: Some(" ops@example.com ".into()),
        password: Some("pw".into()),
        ..Default::default()
    };

    hook.sign_in(None, None, &prompt).await.unwrap();
    assert_eq!(*prompt.asked.borrow(), vec![CredentialField::Email, CredentialField::Password]);
    hook.state().with_state(|s| {
        assert_eq!(s.email(), Some("ops@example.com"));
        assert!(s.is_admin());
    });
}

#[tokio::test]
async fn test_sign_in_with_supplied_credentials_never_prompts() {
    let backend = Arc::new(MemoryBackend::new().with_account("ops@example.com", "pw", Some("viewer")));
    let hook = auth_hook(&backend);
    let prompt = ScriptedPrompt::default();

    hook.sign_in(Some("ops@example.com".into()), Some("pw".into()), &prompt)
        .await
        .unwrap();
    assert!(prompt.asked.borrow().is_empty());
    assert!(!hook.state().with_state(AuthState::is_admin));
}

#[tokio::test]
async fn test_dismissed_prompt_makes_no_remote_call() {
    let backend = Arc::new(MemoryBackend::new().with_account("ops@example.com", "pw", None));
    let hook = auth_hook(&backend);

    let err = hook.sign_in(None, None, &ScriptedPrompt::default()).await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidInput(_)));

    let prompt = ScriptedPrompt {
        email: Some("ops@example.com".into()),
        password: Some(String::new()),
        ..Default::default()
    };
    assert!(hook.sign_in(None, None, &prompt).await.is_err());
    assert_eq!(backend.call_count(BackendOp::SignIn), 0);
}

#[tokio::test]
async fn test_sign_out_resets_even_when_remote_fails() {
    let backend = Arc::new(
        MemoryBackend::new()
            .with_account("ops@example.com", "pw", Some("admin"))
            .with_session("ops@example.com"),
    );
    let hook = auth_hook(&backend);
    hook.refresh().await.unwrap();
    assert!(hook.state().with_state(AuthState::can_manage));

    backend.fail(BackendOp::SignOut);
    assert!(hook.sign_out().await.is_err());
    hook.state().with_state(|s| {
        assert_eq!(s.email(), None);
        assert!(!s.is_admin());
        assert!(s.error().is_some());
    });

    backend.recover(BackendOp::SignOut);
    hook.refresh().await.unwrap();
    assert_eq!(hook.state().with_state(|s| s.email().map(str::to_string)), None);
}
