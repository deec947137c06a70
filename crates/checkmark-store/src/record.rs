//! Record types held by the store
//!
//! Both deployments share one lifecycle but differ in wire shape: items carry
//! a `name` and a string id (`item3`), todos carry a `text` and an integer id.
//! The [`Resource`] trait captures that difference so the store and the
//! router stay generic.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;

/// A record kind the store can hold
pub trait Resource: Clone + Serialize + Send + Sync + 'static {
    /// Identifier type as it appears on the wire
    type Id: Clone + PartialEq + fmt::Display + Send + Sync + 'static;

    /// Request body accepted by create and update
    type Body: DeserializeOwned + Default + Into<Fields> + Send + 'static;

    /// Name of the required text field, used in error messages
    const TEXT_FIELD: &'static str;

    /// Build a fresh record
    fn assemble(id: Self::Id, text: String, completed: bool) -> Self;

    /// Map a generator value to an identifier
    fn id_from_seq(seq: u64) -> Self::Id;

    /// Parse an identifier from a path segment
    fn parse_id(raw: &str) -> Option<Self::Id>;

    fn id(&self) -> &Self::Id;

    fn text(&self) -> &str;

    fn completed(&self) -> bool;

    /// Overwrite the fields present in `fields`, leaving the rest untouched
    fn apply(&mut self, fields: Fields);
}

/// Field values carried by a create or update request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields {
    pub text: Option<String>,
    pub completed: Option<bool>,
}

impl Fields {
    pub fn new(text: Option<String>, completed: Option<bool>) -> Self {
        Self { text, completed }
    }

    /// True when neither field was supplied
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.completed.is_none()
    }

    /// True when nothing usable was supplied: no `completed` and no
    /// non-empty text
    pub fn carries_no_data(&self) -> bool {
        self.completed.is_none() && self.text.as_deref().is_none_or(str::is_empty)
    }

    /// True when a text was supplied but is blank after trimming
    pub fn has_blank_text(&self) -> bool {
        self.text.as_deref().is_some_and(|t| t.trim().is_empty())
    }
}

/// Item record served under `/items`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub completed: bool,
}

impl Item {
    /// Records present before any request is served
    pub fn fixtures() -> Vec<Item> {
        vec![
            Item {
                id: "item1".to_string(),
                name: "Existing Item 1".to_string(),
                completed: false,
            },
            Item {
                id: "item2".to_string(),
                name: "Existing Item 2".to_string(),
                completed: true,
            },
        ]
    }
}

/// Body of `POST /items` and `PUT /items/{id}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemFields {
    pub name: Option<String>,
    pub completed: Option<bool>,
}

impl From<ItemFields> for Fields {
    fn from(body: ItemFields) -> Self {
        Fields::new(body.name, body.completed)
    }
}

impl Resource for Item {
    type Id = String;
    type Body = ItemFields;

    const TEXT_FIELD: &'static str = "name";

    fn assemble(id: String, text: String, completed: bool) -> Self {
        Self {
            id,
            name: text,
            completed,
        }
    }

    fn id_from_seq(seq: u64) -> String {
        format!("item{}", seq)
    }

    fn parse_id(raw: &str) -> Option<String> {
        Some(raw.to_string())
    }

    fn id(&self) -> &String {
        &self.id
    }

    fn text(&self) -> &str {
        &self.name
    }

    fn completed(&self) -> bool {
        self.completed
    }

    fn apply(&mut self, fields: Fields) {
        if let Some(name) = fields.text {
            self.name = name;
        }
        if let Some(completed) = fields.completed {
            self.completed = completed;
        }
    }
}

/// Todo record served under `/todos`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: u64,
    pub text: String,
    pub completed: bool,
}

/// Body of `POST /todos` and `PUT /todos/{id}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TodoFields {
    pub text: Option<String>,
    pub completed: Option<bool>,
}

impl From<TodoFields> for Fields {
    fn from(body: TodoFields) -> Self {
        Fields::new(body.text, body.completed)
    }
}

impl Resource for Todo {
    type Id = u64;
    type Body = TodoFields;

    const TEXT_FIELD: &'static str = "text";

    fn assemble(id: u64, text: String, completed: bool) -> Self {
        Self {
            id,
            text,
            completed,
        }
    }

    fn id_from_seq(seq: u64) -> u64 {
        seq
    }

    /// Leading decimal digits after optional whitespace; trailing text is
    /// ignored, so `007` is 7 and `5abc` is 5
    fn parse_id(raw: &str) -> Option<u64> {
        let raw = raw.trim_start();
        let end = raw
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(raw.len());
        raw[..end].parse().ok()
    }

    fn id(&self) -> &u64 {
        &self.id
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn completed(&self) -> bool {
        self.completed
    }

    fn apply(&mut self, fields: Fields) {
        if let Some(text) = fields.text {
            self.text = text;
        }
        if let Some(completed) = fields.completed {
            self.completed = completed;
        }
    }
}
