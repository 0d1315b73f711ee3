use thiserror::Error;
use uuid::Uuid;

use crate::{auth::ActorResolution, roles::Actor};

/// Failure raised from inside a permission hook.
///
/// `Unauthenticated` propagates out of the engine. Everything else is logged
/// and treated as a denial.
#[derive(Debug, Error)]
pub enum HookError {
    #[error("user must be authenticated")]
    Unauthenticated,
    #[error("{0}")]
    Failed(String),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub type HookResult = Result<bool, HookError>;

/// What a permission hook can see about the operation it is evaluated in.
#[derive(Debug, Clone)]
pub struct HookContext {
    resolution: ActorResolution,
}

impl HookContext {
    pub(crate) fn new(resolution: ActorResolution) -> Self {
        Self { resolution }
    }

    /// The acting user, or [`HookError::Unauthenticated`] when there is none.
    pub fn actor(&self) -> Result<&Actor, HookError> {
        self.resolution.actor().ok_or(HookError::Unauthenticated)
    }

    /// The acting user, if any, for hooks that tolerate anonymous access.
    pub fn try_actor(&self) -> Option<&Actor> {
        self.resolution.actor()
    }

    pub fn actor_id(&self) -> Option<Uuid> {
        self.try_actor().map(|actor| actor.id)
    }
}
