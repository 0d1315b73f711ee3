use std::any::TypeId;

use uuid::Uuid;

pub mod bypass;
mod engine;
pub mod graph;
pub mod hooks;
pub mod macros;

pub use bypass::{bypass_active, bypass_perms};
pub use engine::{authorize, Action, PermissionError, Permissions};
pub use graph::{EntityGraph, NodeId, PayloadValue};
pub use hooks::{HookContext, HookError, HookResult};

/// A record subject to row-level permission checks.
///
/// Implement the `allow_*` hooks to describe who may touch a record. Callers
/// never invoke the hooks directly; they go through [`Permissions`], which
/// layers the bypass scope, the no-context rule and the admin override on top.
///
/// Defaults: creating is allowed, writing is denied, reading follows writing.
/// Owners can create their own records but read and write access for others
/// must be granted explicitly.
///
/// A hook that returns an error or panics denies the check; only
/// [`HookError::Unauthenticated`] escapes.
///
/// # Example
/// ```rust,ignore
/// use rowguard::policy::{Entity, HookContext, HookResult};
///
/// impl Entity for Article {
///     fn id(&self) -> Option<Uuid> {
///         self.id
///     }
///
///     fn allow_write(&self, ctx: &HookContext) -> HookResult {
///         Ok(self.author_id == ctx.actor()?.id)
///     }
/// }
/// ```
pub trait Entity: Send + Sync + 'static {
    /// Identifier, `None` until the record has been persisted.
    fn id(&self) -> Option<Uuid>;

    /// Domain the record belongs to, used for the admin override.
    fn domain(&self) -> Option<&str> {
        None
    }

    /// Records for which being an admin is not enough on its own.
    ///
    /// Role grants use this so that admins cannot hand out roles their own
    /// rank does not allow.
    fn exempt_from_admin_override(&self) -> bool {
        false
    }

    /// Read hook. Defaults to the write hook.
    fn allow_read(&self, ctx: &HookContext) -> HookResult {
        self.allow_write(ctx)
    }

    /// Write hook, only consulted for persisted records.
    fn allow_write(&self, _ctx: &HookContext) -> HookResult {
        Ok(false)
    }

    /// Create hook.
    fn allow_create(&self, _ctx: &HookContext) -> HookResult {
        Ok(true)
    }

    /// Key the bypass scope is tracked under.
    fn entity_type(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn entity_name(&self) -> &'static str {
        crate::utils::short_type_name::<Self>()
    }

    /// Human readable reference used in errors and logs.
    fn describe(&self) -> String {
        match self.id() {
            Some(id) => format!("{}({id})", self.entity_name()),
            None => format!("{}(new)", self.entity_name()),
        }
    }

    /// Run `f` with permission checks for this entity type disabled.
    fn bypass_perms<R>(f: impl FnOnce() -> R) -> R
    where
        Self: Sized,
    {
        bypass::bypass_perms::<Self, R>(f)
    }
}
