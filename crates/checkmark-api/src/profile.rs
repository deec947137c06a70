//! Per-deployment contract
//!
//! The item-style and todo-style deployments share one lifecycle but differ
//! in paths, credentials, status codes and message strings. Those differences
//! are data, collected in a [`Profile`], so neither deployment's observable
//! contract leaks into the other.

use std::fmt;
use std::str::FromStr;

use checkmark_store::{Item, ResourceStore, StoreError, Todo, UpdatePolicy};

use crate::auth::{AuthFailure, StaticCredentials};
use crate::error::ApiError;

const MOCK_USERNAME: &str = "testuser";
const MOCK_PASSWORD: &str = "password123";

/// Messages, statuses and paths of one deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    /// Collection path, e.g. `/items`
    pub collection_path: &'static str,
    /// Unauthenticated reset hook
    pub reset_path: &'static str,
    pub login_success: &'static str,
    pub login_failed: &'static str,
    pub missing_token: AuthFailure,
    pub invalid_token: AuthFailure,
    pub text_required: &'static str,
    pub text_blank: &'static str,
    pub no_update_data: &'static str,
    /// `{id}` is replaced with the requested identifier
    pub not_found: &'static str,
    pub reset_done: &'static str,
    pub update_policy: UpdatePolicy,
}

impl Profile {
    /// Item-style deployment
    pub const ITEMS: Profile = Profile {
        collection_path: "/items",
        reset_path: "/reset-items",
        login_success: "Login successful",
        login_failed: "Invalid credentials",
        missing_token: AuthFailure::unauthorized("Authorization token required"),
        invalid_token: AuthFailure::forbidden("Invalid or expired token"),
        text_required: "Item name is required",
        text_blank: "Item name cannot be empty",
        no_update_data: "No update data provided",
        not_found: "Item not found",
        reset_done: "All items reset successfully.",
        update_policy: UpdatePolicy::RejectEmpty,
    };

    /// Todo-style deployment
    pub const TODOS: Profile = Profile {
        collection_path: "/todos",
        reset_path: "/reset-todos",
        login_success: "Login successful",
        login_failed: "Invalid username or password.",
        missing_token: AuthFailure::unauthorized("Authorization token required"),
        invalid_token: AuthFailure::forbidden("Unauthorized access."),
        text_required: "Todo text is required.",
        text_blank: "Todo text cannot be empty.",
        no_update_data: "No update data provided",
        not_found: "Todo with ID {id} not found.",
        reset_done: "All todos reset successfully.",
        update_policy: UpdatePolicy::AllowEmpty,
    };

    /// Path of a single record, in axum's capture syntax
    pub fn member_path(&self) -> String {
        format!("{}/{{id}}", self.collection_path)
    }

    /// Map a store failure to this deployment's response
    pub fn reject(&self, err: StoreError) -> ApiError {
        match err {
            StoreError::MissingField(_) => ApiError::Validation(self.text_required.to_string()),
            StoreError::BlankField(_) => ApiError::Validation(self.text_blank.to_string()),
            StoreError::NoUpdateData => ApiError::Validation(self.no_update_data.to_string()),
            StoreError::NotFound(id) => ApiError::NotFound(self.not_found.replace("{id}", &id)),
        }
    }
}

/// Which route set a server instance exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Deployment {
    Items,
    Todos,
}

impl Deployment {
    pub const ALL: [Deployment; 2] = [Deployment::Items, Deployment::Todos];

    pub fn profile(self) -> Profile {
        match self {
            Deployment::Items => Profile::ITEMS,
            Deployment::Todos => Profile::TODOS,
        }
    }

    pub fn credentials(self) -> StaticCredentials {
        let token = match self {
            Deployment::Items => "mock-auth-token-123",
            Deployment::Todos => "dummy-jwt-token-for-testuser",
        };
        StaticCredentials::new(MOCK_USERNAME, MOCK_PASSWORD, token)
    }

    pub fn default_port(self) -> u16 {
        match self {
            Deployment::Items => 3001,
            Deployment::Todos => 5000,
        }
    }

    /// Environment variable overriding the listen port
    pub fn port_env(self) -> &'static str {
        match self {
            Deployment::Items => "CHECKMARK_ITEMS_PORT",
            Deployment::Todos => "CHECKMARK_TODOS_PORT",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Deployment::Items => "items",
            Deployment::Todos => "todos",
        }
    }

    /// Parse a comma-separated list such as `items,todos`
    pub fn parse_list(list: &str) -> Result<Vec<Deployment>, UnknownDeployment> {
        let mut out = Vec::new();
        for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let deployment = name.parse()?;
            if !out.contains(&deployment) {
                out.push(deployment);
            }
        }
        Ok(out)
    }
}

impl fmt::Display for Deployment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown deployment '{0}' (expected 'items' or 'todos')")]
pub struct UnknownDeployment(pub String);

impl FromStr for Deployment {
    type Err = UnknownDeployment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "items" | "item" => Ok(Deployment::Items),
            "todos" | "todo" => Ok(Deployment::Todos),
            _ => Err(UnknownDeployment(s.to_string())),
        }
    }
}

/// Fresh item store holding the two fixture records
pub fn item_store() -> ResourceStore<Item> {
    let fixtures = Item::fixtures();
    let first_seq = fixtures.len() as u64 + 1;
    ResourceStore::with_fixtures(fixtures, first_seq)
        .with_update_policy(Profile::ITEMS.update_policy)
}

/// Fresh, empty todo store
pub fn todo_store() -> ResourceStore<Todo> {
    ResourceStore::new().with_update_policy(Profile::TODOS.update_policy)
}
