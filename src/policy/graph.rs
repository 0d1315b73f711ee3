use std::{collections::HashSet, fmt};

use tracing::debug;

use super::{engine::Action, Entity, PermissionError, Permissions};

/// Key of an entity inside an [`EntityGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// A field value as seen by the bulk create check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadValue {
    /// Reference to an entity in the same graph.
    Entity(NodeId),
    /// Any list-like field, nested to arbitrary depth.
    Sequence(Vec<PayloadValue>),
    /// Scalars, strings and anything else that cannot hold an entity.
    Inert,
}

impl From<NodeId> for PayloadValue {
    fn from(id: NodeId) -> Self {
        Self::Entity(id)
    }
}

impl From<Vec<PayloadValue>> for PayloadValue {
    fn from(values: Vec<PayloadValue>) -> Self {
        Self::Sequence(values)
    }
}

/// Object graph of entities about to be persisted together.
///
/// Entities are stored in an arena and refer to each other by [`NodeId`], so
/// any shape, including self references and cycles, can be represented.
#[derive(Default)]
pub struct EntityGraph {
    nodes: Vec<Box<dyn Entity>>,
    fields: Vec<Vec<PayloadValue>>,
}

impl EntityGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entity: impl Entity) -> NodeId {
        self.nodes.push(Box::new(entity));
        self.fields.push(Vec::new());
        NodeId(self.nodes.len() - 1)
    }

    /// Record `value` as one of the entity-bearing fields of `node`.
    ///
    /// Links to nodes of another graph are ignored by the walk.
    pub fn link(&mut self, node: NodeId, value: impl Into<PayloadValue>) {
        if let Some(fields) = self.fields.get_mut(node.0) {
            fields.push(value.into());
        }
    }

    pub fn entity(&self, node: NodeId) -> Option<&dyn Entity> {
        self.nodes.get(node.0).map(|entity| &**entity)
    }

    pub fn fields(&self, node: NodeId) -> &[PayloadValue] {
        self.fields
            .get(node.0)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Check that every not yet persisted entity reachable from `values` may
    /// be created.
    ///
    /// Sequences are descended to any depth and so are the fields of every
    /// entity visited. Each entity is tested at most once per call, which also
    /// makes the walk terminate on cyclic graphs. Persisted entities are not
    /// tested but their fields are still walked.
    ///
    /// # Errors
    /// [`PermissionError::Forbidden`] naming the first entity that fails
    /// `can_create`, or [`PermissionError::Unauthenticated`] when a hook needed
    /// an actor.
    pub fn check_create(&self, values: &[PayloadValue]) -> Result<(), PermissionError> {
        let mut visited: HashSet<NodeId> = HashSet::new();
        // Reversed so the walk visits values in the order they were given.
        let mut pending: Vec<&PayloadValue> = values.iter().rev().collect();

        while let Some(value) = pending.pop() {
            match value {
                PayloadValue::Inert => {}
                PayloadValue::Sequence(items) => pending.extend(items.iter().rev()),
                PayloadValue::Entity(node) => {
                    if !visited.insert(*node) {
                        continue;
                    }
                    let Some(entity) = self.entity(*node) else {
                        continue;
                    };

                    if entity.id().is_none() && !entity.can_create()? {
                        debug!(entity = %entity.describe(), "Bulk create check rejected entity");
                        return Err(PermissionError::forbidden(Action::Create, entity));
                    }

                    pending.extend(self.fields(*node).iter().rev());
                }
            }
        }

        Ok(())
    }
}

impl fmt::Debug for EntityGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                self.nodes
                    .iter()
                    .zip(&self.fields)
                    .map(|(node, fields)| (node.describe(), fields)),
            )
            .finish()
    }
}
