//! Correlation Context - request-scoped correlation id
//!
//! A tokio task-local slot. Every inbound request runs inside its own scope, so
//! concurrently handled requests never see each other's id. Code outside any
//! scope reads `None`.

use std::cell::RefCell;
use std::future::Future;

/// Header carrying an externally supplied correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

tokio::task_local! {
    static REQUEST_ID: RefCell<Option<String>>;
}

/// Run `fut` inside a fresh, empty correlation scope
pub fn scope<F: Future>(fut: F) -> impl Future<Output = F::Output> {
    REQUEST_ID.scope(RefCell::new(None), fut)
}

/// Run `fut` inside a scope that already carries `request_id`.
///
/// Use this to carry the current id into a spawned task.
pub fn scope_with<F: Future>(request_id: impl Into<String>, fut: F) -> impl Future<Output = F::Output> {
    REQUEST_ID.scope(RefCell::new(Some(request_id.into())), fut)
}

/// Synchronous counterpart of [`scope_with`]
pub fn sync_scope_with<R>(request_id: impl Into<String>, f: impl FnOnce() -> R) -> R {
    REQUEST_ID.sync_scope(RefCell::new(Some(request_id.into())), f)
}

/// Store `request_id` in the current scope.
///
/// Returns `false` (and stores nothing) when called outside a scope.
pub fn set(request_id: impl Into<String>) -> bool {
    let request_id = request_id.into();
    REQUEST_ID
        .try_with(|slot| *slot.borrow_mut() = Some(request_id))
        .is_ok()
}

/// The current scope's correlation id, if any
pub fn get() -> Option<String> {
    REQUEST_ID.try_with(|slot| slot.borrow().clone()).ok().flatten()
}

/// Generate a fresh correlation id
pub fn generate() -> String {
    uuid::Uuid::new_v4().to_string()
}
