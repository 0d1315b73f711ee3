use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

use crate::policy::{Entity, EntityGraph, PayloadValue};

/// A payload that is well formed but cannot be applied.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("{message}")]
    Invalid { field: &'static str, message: String },
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

impl PayloadError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }
}

/// A model that can be exposed through a [`super::CrudBlueprint`].
///
/// # Example
/// ```rust,ignore
/// impl CrudModel for Note {
///     type Create = NoteCreate;
///     type Update = NoteUpdate;
///
///     fn from_create(payload: NoteCreate) -> Result<Self, PayloadError> {
///         Ok(Self { id: None, ownership: Ownership::current(), body: payload.body })
///     }
///
///     fn apply_update(&mut self, payload: NoteUpdate) -> Result<(), PayloadError> {
///         self.body = payload.body;
///         Ok(())
///     }
///
///     fn assign_id(&mut self, id: Uuid) {
///         self.id = Some(id);
///     }
/// }
/// ```
pub trait CrudModel: Entity + Serialize + Clone + Sized {
    type Create: DeserializeOwned + Validate + Send + 'static;
    type Update: DeserializeOwned + Validate + Send + 'static;

    /// Build a new, not yet persisted record from a create payload.
    fn from_create(payload: Self::Create) -> Result<Self, PayloadError>;

    fn apply_update(&mut self, payload: Self::Update) -> Result<(), PayloadError>;

    /// Called by repositories when the record is first stored.
    fn assign_id(&mut self, id: Uuid);

    /// Every entity a create would persist, and the values to start the
    /// bulk create check from. Models with nested entities extend the graph.
    fn creation_graph(&self) -> (EntityGraph, Vec<PayloadValue>) {
        let mut graph = EntityGraph::new();
        let root = graph.insert(self.clone());
        (graph, vec![root.into()])
    }

    /// JSON representation for the named view; `None` is the default view.
    fn render(&self, _view: Option<&str>) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }

    /// String form of a top-level field, used for lookups and filtering.
    fn field_value(&self, field: &str) -> Option<String> {
        match serde_json::to_value(self).ok()?.get(field)? {
            Value::Null => None,
            Value::String(value) => Some(value.clone()),
            other => Some(other.to_string()),
        }
    }
}
