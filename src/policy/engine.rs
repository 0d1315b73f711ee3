use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
};

use strum::Display;
use thiserror::Error;
use tracing::{debug, trace, warn};

use super::{
    bypass,
    hooks::{HookContext, HookError, HookResult},
    Entity,
};
use crate::auth::{resolve_actor, ActorResolution};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Action {
    Read,
    Write,
    Create,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermissionError {
    /// A check needed an actor and none could be resolved.
    #[error("user must be authenticated")]
    Unauthenticated,
    /// The actor is known but not allowed.
    #[error("user not allowed to {action} resource: {entity}")]
    Forbidden { action: Action, entity: String },
}

impl PermissionError {
    pub fn forbidden<E: Entity + ?Sized>(action: Action, entity: &E) -> Self {
        Self::Forbidden {
            action,
            entity: entity.describe(),
        }
    }
}

/// Permission decisions for any [`Entity`].
///
/// Each query answers `Ok(true)` or `Ok(false)`; the only error is
/// [`PermissionError::Unauthenticated`], raised when a hook needs an actor and
/// the current operation has none.
pub trait Permissions: Entity {
    fn can_create(&self) -> Result<bool, PermissionError>;
    fn can_write(&self) -> Result<bool, PermissionError>;
    fn can_read(&self) -> Result<bool, PermissionError>;
}

impl<E: Entity + ?Sized> Permissions for E {
    fn can_create(&self) -> Result<bool, PermissionError> {
        let Some(ctx) = evaluation_context(self, Action::Create) else {
            return Ok(true);
        };
        if admin_override(self, &ctx, Action::Create) {
            return Ok(true);
        }

        settle(self, Action::Create, || self.allow_create(&ctx))
    }

    fn can_write(&self) -> Result<bool, PermissionError> {
        let Some(ctx) = evaluation_context(self, Action::Write) else {
            return Ok(true);
        };
        if admin_override(self, &ctx, Action::Write) {
            return Ok(true);
        }

        if self.id().is_none() {
            return settle(self, Action::Create, || self.allow_create(&ctx));
        }
        settle(self, Action::Write, || self.allow_write(&ctx))
    }

    fn can_read(&self) -> Result<bool, PermissionError> {
        let Some(ctx) = evaluation_context(self, Action::Read) else {
            return Ok(true);
        };
        if self.id().is_none() {
            return Ok(true);
        }
        // Reading is never exempt from the admin override.
        if ctx
            .try_actor()
            .is_some_and(|actor| actor.is_admin_in(self.domain()))
        {
            trace!(entity = %self.describe(), "Read allowed by admin override");
            return Ok(true);
        }

        settle(self, Action::Read, || self.allow_read(&ctx))
    }
}

/// Require `action` on `entity`, turning a denial into
/// [`PermissionError::Forbidden`].
pub fn authorize<E: Entity + ?Sized>(entity: &E, action: Action) -> Result<(), PermissionError> {
    let allowed = match action {
        Action::Read => entity.can_read()?,
        Action::Write => entity.can_write()?,
        Action::Create => entity.can_create()?,
    };

    if allowed {
        Ok(())
    } else {
        debug!(entity = %entity.describe(), %action, "Permission denied");
        Err(PermissionError::forbidden(action, entity))
    }
}

/// `None` when the check is settled as allowed before any rule runs.
fn evaluation_context<E: Entity + ?Sized>(entity: &E, action: Action) -> Option<HookContext> {
    if bypass::is_bypassed(entity.entity_type()) {
        trace!(entity = entity.entity_name(), %action, "Allowed by bypass scope");
        return None;
    }

    match resolve_actor() {
        ActorResolution::NoContext => {
            trace!(entity = entity.entity_name(), %action, "Allowed outside of any operation");
            None
        }
        resolution => Some(HookContext::new(resolution)),
    }
}

fn admin_override<E: Entity + ?Sized>(entity: &E, ctx: &HookContext, action: Action) -> bool {
    if entity.exempt_from_admin_override() {
        return false;
    }

    let allowed = ctx
        .try_actor()
        .is_some_and(|actor| actor.is_admin_in(entity.domain()));
    if allowed {
        trace!(entity = %entity.describe(), %action, "Allowed by admin override");
    }
    allowed
}

/// Run a hook, failing closed on errors and panics, except for missing
/// authentication.
fn settle<E: Entity + ?Sized>(
    entity: &E,
    action: Action,
    hook: impl FnOnce() -> HookResult,
) -> Result<bool, PermissionError> {
    let result = panic::catch_unwind(AssertUnwindSafe(hook))
        .unwrap_or_else(|payload| Err(HookError::Failed(panic_message(payload.as_ref()))));

    match result {
        Ok(allowed) => Ok(allowed),
        Err(HookError::Unauthenticated) => Err(PermissionError::Unauthenticated),
        Err(e) => {
            warn!(
                entity = %entity.describe(),
                %action,
                error = %e,
                "Permission hook failed, denying"
            );
            Ok(false)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let message = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown cause");
    format!("hook panicked: {message}")
}
