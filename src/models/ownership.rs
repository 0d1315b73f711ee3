use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    auth::current_actor_id,
    policy::{HookContext, HookResult},
};

/// Reference to the user a record belongs to.
///
/// Embed it with `#[serde(flatten)]` so the owner shows up as a top-level
/// `user_id` field, and implement [`Owned`] to expose it to permission hooks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ownership {
    pub user_id: Option<Uuid>,
}

impl Ownership {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }

    /// Owned by the actor of the current operation, if there is one.
    pub fn current() -> Self {
        Self {
            user_id: current_actor_id(),
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == Some(user_id)
    }
}

pub trait Owned {
    fn owner_id(&self) -> Option<Uuid>;
}

impl Owned for Ownership {
    fn owner_id(&self) -> Option<Uuid> {
        self.user_id
    }
}

/// Permission hook granting access to the record's owner only.
pub fn owner_only<T: Owned + ?Sized>(record: &T, ctx: &HookContext) -> HookResult {
    let actor = ctx.actor()?;
    Ok(record.owner_id() == Some(actor.id))
}
