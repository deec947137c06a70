//! Application State
//!
//! One state per deployment: the record store, the credential policy and the
//! deployment's contract.

use std::sync::Arc;

use checkmark_store::{Item, Resource, ResourceStore, Todo};

use crate::auth::{AuthGuard, CredentialPolicy};
use crate::profile::{item_store, todo_store, Deployment, Profile};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState<R: Resource> {
    store: Arc<ResourceStore<R>>,
    credentials: Arc<dyn CredentialPolicy>,
    profile: Profile,
}

impl<R: Resource> AppState<R> {
    /// Create new application state
    pub fn new(
        store: Arc<ResourceStore<R>>,
        credentials: Arc<dyn CredentialPolicy>,
        profile: Profile,
    ) -> Self {
        Self {
            store,
            credentials,
            profile,
        }
    }

    /// Get the record store (cloned Arc for sharing)
    pub fn store(&self) -> Arc<ResourceStore<R>> {
        self.store.clone()
    }

    pub fn credentials(&self) -> &dyn CredentialPolicy {
        self.credentials.as_ref()
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Guard for this deployment's protected routes
    pub fn guard(&self) -> AuthGuard {
        AuthGuard::new(
            self.credentials.clone(),
            self.profile.missing_token,
            self.profile.invalid_token,
        )
    }
}

impl AppState<Item> {
    /// Item-style deployment with its fixtures and static credentials
    pub fn items() -> Self {
        Self::new(
            Arc::new(item_store()),
            Arc::new(Deployment::Items.credentials()),
            Deployment::Items.profile(),
        )
    }
}

impl AppState<Todo> {
    /// Todo-style deployment, initially empty
    pub fn todos() -> Self {
        Self::new(
            Arc::new(todo_store()),
            Arc::new(Deployment::Todos.credentials()),
            Deployment::Todos.profile(),
        )
    }
}
