use std::fmt::Debug;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{crud::RepositoryError, roles::Actor};

/// Loads an actor, together with its role grants, from persistent storage.
///
/// Called once per authenticated request; implementations must not cache
/// results across requests, since grants can change between them.
#[async_trait]
pub trait ActorLoader: Send + Sync + Debug {
    /// Returns `Ok(None)` when no actor with `id` exists.
    async fn load_actor(&self, id: Uuid) -> Result<Option<Actor>, RepositoryError>;
}
