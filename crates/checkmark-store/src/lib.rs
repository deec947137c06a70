//! # Checkmark Store
//!
//! In-memory record storage for the Checkmark service.
//!
//! Provides:
//! - `Item` and `Todo` record types behind the [`Resource`] trait
//! - A sequential id generator that is rewound only by an explicit reset
//! - [`ResourceStore`], an insertion-ordered collection shared by handle

pub mod error;
pub mod record;
pub mod store;

pub use error::StoreError;
pub use record::{Fields, Item, ItemFields, Resource, Todo, TodoFields};
pub use store::{IdSequence, ResourceStore, UpdatePolicy};
