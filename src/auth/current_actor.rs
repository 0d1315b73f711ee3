use std::{future::Future, sync::Arc};

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use strum::Display;
use uuid::Uuid;

use crate::roles::Actor;

tokio::task_local! {
    static OPERATION: OperationContext;
}

/// Why an operation in flight has no resolved actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum UnauthenticatedReason {
    /// No credentials were presented.
    MissingToken,
    /// Credentials were presented but were malformed, expired or badly signed.
    InvalidToken,
    /// The token was valid but names an actor that no longer exists.
    UnknownActor,
    /// The actor could not be loaded.
    LoadFailed,
}

/// Authentication outcome for one operation.
#[derive(Debug, Clone)]
pub enum AuthState {
    Authenticated(Arc<Actor>),
    Unauthenticated(UnauthenticatedReason),
}

/// State carried for the duration of a single operation (usually one request).
///
/// The context lives in task-local storage, so concurrent requests never see
/// each other's actor and nothing survives past the end of the operation.
#[derive(Debug, Clone)]
pub struct OperationContext {
    auth: AuthState,
}

impl OperationContext {
    pub fn new(auth: AuthState) -> Self {
        Self { auth }
    }

    pub fn authenticated(actor: Actor) -> Self {
        Self::new(AuthState::Authenticated(Arc::new(actor)))
    }

    pub fn unauthenticated(reason: UnauthenticatedReason) -> Self {
        Self::new(AuthState::Unauthenticated(reason))
    }

    pub fn auth(&self) -> &AuthState {
        &self.auth
    }

    /// Run `future` with this context as the current operation.
    pub async fn scope<F>(self, future: F) -> F::Output
    where
        F: Future,
    {
        OPERATION.scope(self, future).await
    }

    /// Run synchronous code with this context as the current operation.
    pub fn sync_scope<R>(self, f: impl FnOnce() -> R) -> R {
        OPERATION.sync_scope(self, f)
    }
}

/// Result of asking "who is acting right now?".
#[derive(Debug, Clone)]
pub enum ActorResolution {
    /// No operation is in flight (background work, startup, scripts).
    NoContext,
    Authenticated(Arc<Actor>),
    /// An operation is in flight but nobody could be authenticated.
    Unauthenticated(UnauthenticatedReason),
}

impl ActorResolution {
    pub fn actor(&self) -> Option<&Actor> {
        match self {
            Self::Authenticated(actor) => Some(actor),
            Self::NoContext | Self::Unauthenticated(_) => None,
        }
    }
}

/// Resolve the actor of the current operation.
///
/// Reads the task-local operation context fresh on every call.
pub fn resolve_actor() -> ActorResolution {
    OPERATION
        .try_with(|context| match &context.auth {
            AuthState::Authenticated(actor) => ActorResolution::Authenticated(Arc::clone(actor)),
            AuthState::Unauthenticated(reason) => ActorResolution::Unauthenticated(*reason),
        })
        .unwrap_or(ActorResolution::NoContext)
}

pub fn current_actor_id() -> Option<Uuid> {
    resolve_actor().actor().map(|actor| actor.id)
}

/// Run `f` as `actor`, e.g. from a background job acting on a user's behalf.
pub fn run_as<R>(actor: Actor, f: impl FnOnce() -> R) -> R {
    OperationContext::authenticated(actor).sync_scope(f)
}

/// Run `f` inside an operation that failed to authenticate.
pub fn run_unauthenticated<R>(reason: UnauthenticatedReason, f: impl FnOnce() -> R) -> R {
    OperationContext::unauthenticated(reason).sync_scope(f)
}

/// Authenticated actor for the current request.
///
/// Requires the operation context middleware to be installed on the router.
///
/// # Example
/// ```rust,ignore
/// use rowguard::auth::CurrentActor;
///
/// pub async fn whoami(actor: CurrentActor) -> Json<Uuid> {
///     Json(actor.id)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentActor(pub Arc<Actor>);

impl std::ops::Deref for CurrentActor {
    type Target = Actor;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Rejection for [`CurrentActor`] extraction.
#[derive(Debug)]
pub struct AuthError;

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
    }
}

impl<S> FromRequestParts<S> for CurrentActor
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(_parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match resolve_actor() {
            ActorResolution::Authenticated(actor) => Ok(Self(actor)),
            ActorResolution::NoContext | ActorResolution::Unauthenticated(_) => Err(AuthError),
        }
    }
}
