//! Prelude for authentication and authorization.
//!
//! Import this module to bring the actor, the permission engine and the
//! authorization macro into scope.
//!
//! # Example
//! ```rust,ignore
//! use rowguard::auth::prelude::*;
//!
//! pub async fn show(actor: CurrentActor, State(repo): State<Notes>) -> RequestResult {
//!     let note = repo.find(id).await?.ok_or_else(|| RequestError::not_found("note"))?;
//!     authorize!(read, &note);
//!     Ok(RequestSuccess::Ok(serde_json::to_value(note)?))
//! }
//! ```

// Re-export authentication types
pub use crate::auth::{resolve_actor, ActorResolution, CurrentActor};
pub use crate::roles::{Actor, Role, RoleGrant};

// Re-export the permission engine
pub use crate::policy::{
    bypass_perms, Entity, EntityGraph, HookContext, HookResult, PayloadValue, PermissionError,
    Permissions,
};

// Re-export request errors used by handlers
pub use crate::api::request_result::{RequestError, RequestResult, RequestSuccess};

// Re-export authorization macro
pub use crate::{authorize, authorize_create_graph};
