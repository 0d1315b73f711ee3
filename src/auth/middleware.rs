use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::{debug, error, instrument, trace};

use super::{
    current_actor::{AuthState, OperationContext, UnauthenticatedReason},
    jwt,
};
use crate::app::App;

/// Middleware that authenticates the request and runs the rest of it inside
/// an operation context.
///
/// The actor is loaded fresh for every request. Handlers and permission checks
/// further down read it through [`super::current_actor::resolve_actor`].
#[instrument(skip_all, fields(method = %req.method(), uri = %req.uri()))]
pub async fn operation_context_middleware(
    State(app): State<App>,
    req: Request,
    next: Next,
) -> Response {
    let auth = authenticate(&app, req.headers()).await;

    match &auth {
        AuthState::Authenticated(actor) => trace!(actor_id = %actor.id, "Request authenticated"),
        AuthState::Unauthenticated(reason) => trace!(%reason, "Request not authenticated"),
    }

    OperationContext::new(auth).scope(next.run(req)).await
}

async fn authenticate(app: &App, headers: &HeaderMap) -> AuthState {
    let Some(auth_header) = headers.get(header::AUTHORIZATION) else {
        return AuthState::Unauthenticated(UnauthenticatedReason::MissingToken);
    };

    // Extract token (format: "Bearer <token>")
    let Some(token) = auth_header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
    else {
        return AuthState::Unauthenticated(UnauthenticatedReason::InvalidToken);
    };

    let claims = match jwt::verify_token(&app.config.jwt, token) {
        Ok(claims) => claims,
        Err(e) => {
            debug!(error = %e, "Rejected bearer token");
            return AuthState::Unauthenticated(UnauthenticatedReason::InvalidToken);
        }
    };

    let Some(actor_id) = claims.actor_id() else {
        return AuthState::Unauthenticated(UnauthenticatedReason::InvalidToken);
    };

    match app.actors.load_actor(actor_id).await {
        Ok(Some(actor)) => AuthState::Authenticated(Arc::new(actor)),
        Ok(None) => {
            debug!(%actor_id, "Token names an unknown actor");
            AuthState::Unauthenticated(UnauthenticatedReason::UnknownActor)
        }
        Err(e) => {
            error!(%actor_id, error = %e, "Failed to load actor");
            AuthState::Unauthenticated(UnauthenticatedReason::LoadFailed)
        }
    }
}
