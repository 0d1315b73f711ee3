pub mod actor_loader;
pub mod current_actor;
pub mod jwt;
pub mod middleware;
pub mod prelude;

pub use actor_loader::ActorLoader;
pub use current_actor::{
    current_actor_id, resolve_actor, run_as, run_unauthenticated, ActorResolution, AuthState,
    CurrentActor, OperationContext, UnauthenticatedReason,
};
pub use jwt::{generate_token, verify_token, Claims};
pub use middleware::operation_context_middleware;
