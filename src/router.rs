use axum::{middleware::from_fn_with_state, routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::{
    api,
    app::App,
    auth::operation_context_middleware,
    crud::{CrudBlueprint, CrudModel, RouteInfo},
};

/// Application routes, plus a listing of the CRUD routes among them.
#[derive(Default)]
pub struct ApiRouter {
    router: Router<App>,
    routes: Vec<RouteInfo>,
}

impl ApiRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blueprint<M: CrudModel>(mut self, blueprint: &CrudBlueprint<M>) -> Self {
        self.routes.extend(blueprint.routes());
        self.router = self.router.merge(blueprint.router());
        self
    }

    /// Hand written routes, served alongside the blueprints.
    pub fn merge(mut self, router: Router<App>) -> Self {
        self.router = self.router.merge(router);
        self
    }

    pub fn routes(&self) -> &[RouteInfo] {
        &self.routes
    }

    pub fn into_router(self) -> Router<App> {
        self.router
    }
}

/// Full application router.
///
/// `api_router` is mounted under `/api` and every request to it runs inside an
/// operation context. Health checks stay outside of it.
pub fn router(app: App, api_router: Router<App>) -> Router {
    let api_router = Router::new()
        .nest("/api", api_router)
        .layer(from_fn_with_state(app.clone(), operation_context_middleware));

    Router::new()
        .route("/liveness", get(api::health_checks::ok))
        .route("/readiness", get(api::health_checks::ok))
        .merge(api_router)
        .layer(TraceLayer::new_for_http())
        .with_state(app)
}

#[cfg(test)]
mod tests {
    use axum::{routing::get, Json};
    use serde_json::{json, Value};

    use crate::{
        auth::CurrentActor,
        roles::{Role, RoleGrant},
        tests::setup_test,
    };

    async fn whoami(actor: CurrentActor) -> Json<Value> {
        Json(json!({ "id": actor.id }))
    }

    #[tokio::test]
    async fn test_health_checks_skip_authentication() {
        let test = setup_test(|_app, _users| axum::Router::new()).await;

        let response = test.server().get("/liveness").await;

        response.assert_status_ok();
        response.assert_text("OK");
    }

    #[tokio::test]
    async fn test_api_routes_see_the_current_actor() {
        let test = setup_test(|_app, _users| axum::Router::new().route("/me", get(whoami))).await;
        let user = test.create_user("me@example.com", vec![RoleGrant::global(Role::User)]);

        let anonymous = test.server().get("/api/me").await;
        anonymous.assert_status_unauthorized();

        let signed_in = test
            .server()
            .get("/api/me")
            .authorization_bearer(test.token_for(&user))
            .await;
        signed_in.assert_status_ok();
        assert_eq!(signed_in.json::<Value>(), json!({ "id": user.id }));
    }
}
