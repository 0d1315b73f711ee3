use std::{collections::BTreeMap, fmt, sync::Arc};

use axum::{http::Method, routing::MethodRouter, Router};
use tracing::{debug, info};

use super::{
    handlers::{self, CrudContext},
    methods::{
        parse_skip_methods, resolve_methods, ConfigurationError, CrudMethod, MethodTable,
        MethodWarning, MethodsSpec,
    },
    model::CrudModel,
    repository::Repository,
};
use crate::{
    config::CrudSettings,
    utils::{capitalize, convert_camel_to_snake, convert_snake_to_camel, short_type_name},
};

/// A route wired by a blueprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteInfo {
    pub method: CrudMethod,
    pub http_method: Method,
    pub path: String,
    pub operation_id: String,
    pub description: String,
    pub public: bool,
    pub admin_only: bool,
}

impl fmt::Display for RouteInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<7} {:<32} {}", self.http_method, self.path, self.description)?;
        if self.public {
            write!(f, " | Public")?;
        }
        if self.admin_only {
            write!(f, " | Admin only")?;
        }
        Ok(())
    }
}

/// Builder for [`CrudBlueprint`].
///
/// # Example
/// ```rust,ignore
/// let notes = CrudBlueprintBuilder::new("notes")
///     .methods([CrudMethod::Index, CrudMethod::Get, CrudMethod::Post])
///     .configured(&app.config.crud)?
///     .build(Arc::new(NoteRepository::new(pool)))?;
///
/// let router = Router::new().merge(notes.router());
/// ```
#[derive(Debug, Clone)]
pub struct CrudBlueprintBuilder {
    name: String,
    url_prefix: Option<String>,
    model_name: Option<String>,
    res_id: String,
    res_id_param: Option<String>,
    methods: MethodsSpec,
    skip_methods: Vec<CrudMethod>,
}

impl CrudBlueprintBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url_prefix: None,
            model_name: None,
            res_id: "id".to_string(),
            res_id_param: None,
            methods: MethodsSpec::default(),
            skip_methods: Vec::new(),
        }
    }

    /// Builder named after the model type, e.g. `user_setting` for `UserSetting`.
    pub fn for_model<M: CrudModel>() -> Self {
        let model_name = short_type_name::<M>();
        Self::new(convert_camel_to_snake(model_name)).model_name(model_name)
    }

    /// Defaults to `/{name}`.
    pub fn url_prefix(mut self, url_prefix: impl Into<String>) -> Self {
        self.url_prefix = Some(url_prefix.into());
        self
    }

    /// Used in operation ids. Defaults to the name in CamelCase.
    pub fn model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = Some(model_name.into());
        self
    }

    /// Field records are looked up by. Defaults to `id`.
    pub fn res_id(mut self, res_id: impl Into<String>) -> Self {
        self.res_id = res_id.into();
        self
    }

    /// Name of the path parameter. Defaults to `{name}_id`.
    pub fn res_id_param(mut self, res_id_param: impl Into<String>) -> Self {
        self.res_id_param = Some(res_id_param.into());
        self
    }

    pub fn methods(mut self, methods: impl Into<MethodsSpec>) -> Self {
        self.methods = methods.into();
        self
    }

    pub fn skip_methods(mut self, skip: impl IntoIterator<Item = CrudMethod>) -> Self {
        self.skip_methods = skip.into_iter().collect();
        self
    }

    /// Apply settings read from configuration on top of the builder.
    pub fn settings(mut self, settings: &CrudSettings) -> Result<Self, ConfigurationError> {
        if let Some(url_prefix) = &settings.url_prefix {
            self.url_prefix = Some(url_prefix.clone());
        }
        if let Some(methods) = &settings.methods {
            self.methods = MethodsSpec::try_from(methods)?;
        }
        if let Some(skip) = &settings.skip_methods {
            self.skip_methods = parse_skip_methods(skip)?;
        }
        Ok(self)
    }

    /// Apply the entry for this blueprint from the `crud` config section, if any.
    pub fn configured(
        self,
        crud: &BTreeMap<String, CrudSettings>,
    ) -> Result<Self, ConfigurationError> {
        match crud.get(&self.name) {
            Some(settings) => {
                debug!(blueprint = %self.name, "Applying CRUD settings from configuration");
                self.settings(settings)
            }
            None => Ok(self),
        }
    }

    /// Resolve the method table and bind the blueprint to its repository.
    pub fn build<M: CrudModel>(
        self,
        repository: Arc<dyn Repository<M>>,
    ) -> Result<CrudBlueprint<M>, ConfigurationError> {
        if !is_identifier(&self.name) {
            return Err(ConfigurationError::InvalidBlueprint {
                field: "name",
                value: self.name,
            });
        }
        if self.res_id.is_empty() {
            return Err(ConfigurationError::InvalidBlueprint {
                field: "res_id",
                value: self.res_id,
            });
        }

        let url_prefix = match self.url_prefix {
            Some(prefix) if !prefix.starts_with('/') => {
                return Err(ConfigurationError::InvalidBlueprint {
                    field: "url_prefix",
                    value: prefix,
                });
            }
            Some(prefix) => prefix.trim_end_matches('/').to_string(),
            None => format!("/{}", self.name),
        };

        let res_id_param = self
            .res_id_param
            .unwrap_or_else(|| format!("{}_id", self.name.to_lowercase()));
        if !is_identifier(&res_id_param) {
            return Err(ConfigurationError::InvalidBlueprint {
                field: "res_id_param",
                value: res_id_param,
            });
        }

        let model_name = self
            .model_name
            .unwrap_or_else(|| convert_snake_to_camel(&capitalize(&self.name)));

        let resolved = resolve_methods(&self.methods, &self.skip_methods);
        info!(
            blueprint = %self.name,
            methods = ?resolved.table.methods().collect::<Vec<_>>(),
            "CRUD blueprint built"
        );

        Ok(CrudBlueprint {
            context: Arc::new(CrudContext {
                name: self.name,
                res_id: self.res_id,
                methods: resolved.table,
                repository,
            }),
            model_name,
            url_prefix,
            res_id_param,
            warnings: resolved.warnings,
        })
    }
}

fn is_identifier(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// CRUD routes for one model, generated from its resolved method table.
pub struct CrudBlueprint<M: CrudModel> {
    context: Arc<CrudContext<M>>,
    model_name: String,
    url_prefix: String,
    res_id_param: String,
    warnings: Vec<MethodWarning>,
}

impl<M: CrudModel> fmt::Debug for CrudBlueprint<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrudBlueprint")
            .field("name", &self.context.name)
            .field("model_name", &self.model_name)
            .field("url_prefix", &self.url_prefix)
            .field("methods", &self.context.methods)
            .finish_non_exhaustive()
    }
}

impl<M: CrudModel> CrudBlueprint<M> {
    pub fn name(&self) -> &str {
        &self.context.name
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    pub fn methods(&self) -> &MethodTable {
        &self.context.methods
    }

    /// Redundancy warnings found while resolving the method table.
    pub fn warnings(&self) -> &[MethodWarning] {
        &self.warnings
    }

    fn collection_path(&self) -> String {
        if self.url_prefix.is_empty() {
            "/".to_string()
        } else {
            self.url_prefix.clone()
        }
    }

    fn item_path(&self) -> String {
        format!("{}/{{{}}}", self.url_prefix, self.res_id_param)
    }

    /// Every enabled route, in method order.
    pub fn routes(&self) -> Vec<RouteInfo> {
        let name = &self.context.name;
        let model = &self.model_name;

        self.context
            .methods
            .iter()
            .map(|(method, overrides)| {
                let (operation_id, description) = match method {
                    CrudMethod::Index => (format!("list{model}"), format!("Fetch all {name} resources.")),
                    CrudMethod::Post => (format!("create{model}"), format!("Create and return new {name}.")),
                    CrudMethod::Get => (format!("get{model}"), format!("Fetch {name} by ID.")),
                    CrudMethod::Patch => (format!("update{model}"), format!("Update {name} by ID.")),
                    CrudMethod::Delete => (format!("delete{model}"), format!("Delete {name} by ID.")),
                };

                RouteInfo {
                    method,
                    http_method: method.http_method(),
                    path: if method.is_item() {
                        self.item_path()
                    } else {
                        self.collection_path()
                    },
                    operation_id,
                    description: overrides.description.clone().unwrap_or(description),
                    public: overrides.public,
                    admin_only: overrides.admin_only,
                }
            })
            .collect()
    }

    /// Router with one route per enabled method, ready to be merged into the
    /// application router.
    pub fn router<S>(&self) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        let mut collection: MethodRouter<Arc<CrudContext<M>>> = MethodRouter::new();
        let mut item: MethodRouter<Arc<CrudContext<M>>> = MethodRouter::new();
        let (mut has_collection, mut has_item) = (false, false);

        for method in self.context.methods.methods() {
            match method {
                CrudMethod::Index => collection = collection.get(handlers::index::<M>),
                CrudMethod::Post => collection = collection.post(handlers::create::<M>),
                CrudMethod::Get => item = item.get(handlers::show::<M>),
                CrudMethod::Patch => item = item.patch(handlers::update::<M>),
                CrudMethod::Delete => item = item.delete(handlers::destroy::<M>),
            }
            if method.is_item() {
                has_item = true;
            } else {
                has_collection = true;
            }
        }

        let mut router = Router::new();
        if has_collection {
            router = router.route(&self.collection_path(), collection);
        }
        if has_item {
            router = router.route(&self.item_path(), item);
        }

        router.with_state(Arc::clone(&self.context))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{json, Value};
    use uuid::Uuid;

    use super::*;
    use crate::{
        api::{
            assertions::{be_forbidden, be_unauthorized, respond_bad_request, respond_created},
            request_result::PAGINATION_HEADER,
        },
        crud::MethodSetting,
        roles::{Role, RoleGrant},
        tests::{fixtures::Note, setup_test, MemoryRepository, TestUtils},
    };

    fn notes_blueprint(
        notes: &Arc<MemoryRepository<Note>>,
        builder: CrudBlueprintBuilder,
    ) -> CrudBlueprint<Note> {
        let repository: Arc<dyn Repository<Note>> = notes.clone();
        builder.build(repository).expect("blueprint should build")
    }

    async fn notes_server(builder: CrudBlueprintBuilder) -> (TestUtils, Arc<MemoryRepository<Note>>) {
        let notes = Arc::new(MemoryRepository::<Note>::new());
        let blueprint = notes_blueprint(&notes, builder);
        let test = setup_test(move |_app, _users| blueprint.router()).await;
        (test, notes)
    }

    #[test]
    fn test_defaults_follow_the_name() {
        let notes = Arc::new(MemoryRepository::<Note>::new());

        let blueprint = notes_blueprint(&notes, CrudBlueprintBuilder::new("user_notes"));

        assert_eq!(blueprint.url_prefix(), "/user_notes");
        assert_eq!(blueprint.model_name(), "UserNotes");
        assert_eq!(blueprint.methods().len(), 5);
        let paths: Vec<_> = blueprint
            .routes()
            .into_iter()
            .map(|route| (route.http_method, route.path))
            .collect();
        assert_eq!(
            paths,
            vec![
                (Method::GET, "/user_notes".to_string()),
                (Method::GET, "/user_notes/{user_notes_id}".to_string()),
                (Method::POST, "/user_notes".to_string()),
                (Method::PATCH, "/user_notes/{user_notes_id}".to_string()),
                (Method::DELETE, "/user_notes/{user_notes_id}".to_string()),
            ]
        );
    }

    #[test]
    fn test_for_model_names_after_type() {
        let notes = Arc::new(MemoryRepository::<Note>::new());

        let blueprint = notes_blueprint(&notes, CrudBlueprintBuilder::for_model::<Note>());

        assert_eq!(blueprint.name(), "note");
        assert_eq!(blueprint.routes()[0].operation_id, "listNote");
    }

    #[test]
    fn test_routes_reflect_overrides_and_skips() {
        let notes = Arc::new(MemoryRepository::<Note>::new());
        let builder = CrudBlueprintBuilder::new("notes")
            .url_prefix("/my/notes/")
            .methods(BTreeMap::from([
                (CrudMethod::Delete, MethodSetting::from(false)),
                (
                    CrudMethod::Index,
                    MethodSetting::from(crate::crud::MethodOverrides {
                        description: Some("Every note".to_string()),
                        public: true,
                        ..Default::default()
                    }),
                ),
            ]))
            .skip_methods([CrudMethod::Delete, CrudMethod::Patch]);

        let blueprint = notes_blueprint(&notes, builder);

        let routes = blueprint.routes();
        assert_eq!(routes.len(), 3);
        assert_eq!(routes[0].path, "/my/notes");
        assert_eq!(routes[0].description, "Every note");
        assert!(routes[0].public);
        assert_eq!(blueprint.warnings(), &[MethodWarning::RedundantSkip(CrudMethod::Delete)]);
    }

    #[test]
    fn test_invalid_configuration_fails_construction() {
        let notes = Arc::new(MemoryRepository::<Note>::new());
        let settings = CrudSettings {
            methods: Some(json!("not-a-list-or-dict")),
            ..CrudSettings::default()
        };

        let error = CrudBlueprintBuilder::new("notes")
            .settings(&settings)
            .expect_err("string methods must be rejected");
        assert!(matches!(error, ConfigurationError::InvalidShape { .. }));

        let repository: Arc<dyn Repository<Note>> = notes;
        let error = CrudBlueprintBuilder::new("notes")
            .url_prefix("notes")
            .build(repository)
            .expect_err("relative prefix must be rejected");
        assert!(matches!(
            error,
            ConfigurationError::InvalidBlueprint {
                field: "url_prefix",
                ..
            }
        ));
    }

    #[test]
    fn test_configured_reads_named_section() {
        let crud = BTreeMap::from([(
            "notes".to_string(),
            CrudSettings {
                methods: Some(json!(["INDEX", "GET"])),
                skip_methods: Some(json!(["GET"])),
                ..CrudSettings::default()
            },
        )]);
        let notes = Arc::new(MemoryRepository::<Note>::new());

        let builder = CrudBlueprintBuilder::new("notes")
            .configured(&crud)
            .expect("settings are valid");
        let blueprint = notes_blueprint(&notes, builder);

        assert_eq!(blueprint.methods().methods().collect::<Vec<_>>(), vec![CrudMethod::Index]);
    }

    #[tokio::test]
    async fn test_only_enabled_verbs_are_routed() {
        let (test, _notes) = notes_server(
            CrudBlueprintBuilder::new("notes").methods([CrudMethod::Index, CrudMethod::Get]),
        )
        .await;
        let user = test.create_user("reader@example.com", vec![RoleGrant::global(Role::User)]);

        let response = test
            .server()
            .post("/api/notes")
            .authorization_bearer(test.token_for(&user))
            .json(&json!({ "body": "hello" }))
            .await;

        response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_create_and_fetch_own_note() {
        let (test, notes) = notes_server(CrudBlueprintBuilder::new("notes")).await;
        let owner = test.create_user("owner@example.com", vec![RoleGrant::global(Role::User)]);

        let created = test
            .server()
            .post("/api/notes")
            .authorization_bearer(test.token_for(&owner))
            .json(&json!({ "body": "remember the milk" }))
            .await;
        assert!(respond_created(&created).is_ok());
        let body: Value = created.json();
        assert_eq!(body["body"], "remember the milk");
        assert_eq!(body["is_writable"], true);
        assert_eq!(notes.len(), 1);

        let id = body["id"].as_str().expect("id is assigned");
        let fetched = test
            .server()
            .get(&format!("/api/notes/{id}"))
            .authorization_bearer(test.token_for(&owner))
            .await;
        fetched.assert_status_ok();
        assert_eq!(fetched.json::<Value>()["user_id"], json!(owner.id));
    }

    #[tokio::test]
    async fn test_unauthenticated_requests_are_rejected() {
        let (test, _notes) = notes_server(CrudBlueprintBuilder::new("notes")).await;

        let response = test.server().get("/api/notes").await;
        assert!(be_unauthorized(&response).is_ok());

        let response = test
            .server()
            .get("/api/notes")
            .authorization_bearer("not-a-token")
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_public_method_allows_anonymous_access() {
        let mut settings = BTreeMap::new();
        settings.insert(
            CrudMethod::Get,
            MethodSetting::from(crate::crud::MethodOverrides {
                public: true,
                ..Default::default()
            }),
        );
        let (test, notes) = notes_server(CrudBlueprintBuilder::new("notes").methods(settings)).await;
        let note = notes
            .insert(Note::published("anyone can read this"))
            .expect("fixture should insert");
        let id = note.id.expect("fixture has an id");

        let response = test.server().get(&format!("/api/notes/{id}")).await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["is_writable"], false);
    }

    #[tokio::test]
    async fn test_index_only_lists_readable_records() {
        let (test, notes) = notes_server(CrudBlueprintBuilder::new("notes")).await;
        let owner = test.create_user("owner@example.com", vec![RoleGrant::global(Role::User)]);
        let other = test.create_user("other@example.com", vec![RoleGrant::global(Role::User)]);
        notes.insert(Note::owned_by(owner.id, "mine")).expect("fixture should insert");
        notes.insert(Note::owned_by(other.id, "theirs")).expect("fixture should insert");

        let response = test
            .server()
            .get("/api/notes")
            .authorization_bearer(test.token_for(&owner))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        let bodies: Vec<_> = body
            .as_array()
            .expect("index returns a list")
            .iter()
            .map(|note| note["body"].clone())
            .collect();
        assert_eq!(bodies, vec![json!("mine")]);
    }

    #[tokio::test]
    async fn test_index_filters_and_paginates() {
        let (test, notes) = notes_server(CrudBlueprintBuilder::new("notes")).await;
        let admin = test.create_user("admin@example.com", vec![RoleGrant::global(Role::Admin)]);
        for i in 0..5 {
            notes
                .insert(Note::owned_by(admin.id, &format!("note {i}")))
                .expect("fixture should insert");
        }
        notes
            .insert(Note::owned_by(Uuid::new_v4(), "someone else"))
            .expect("fixture should insert");

        let response = test
            .server()
            .get(&format!("/api/notes?user_id={}&page=2&page_size=2", admin.id))
            .authorization_bearer(test.token_for(&admin))
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>().as_array().map(Vec::len), Some(2));
        let pagination: Value = serde_json::from_str(
            response
                .header(PAGINATION_HEADER)
                .to_str()
                .expect("header is ascii"),
        )
        .expect("header is json");
        assert_eq!(
            pagination,
            json!({ "total": 5, "total_pages": 3, "page": 2, "page_size": 2 })
        );
    }

    #[tokio::test]
    async fn test_pages_past_the_end_are_empty() {
        let (test, notes) = notes_server(CrudBlueprintBuilder::new("notes")).await;
        let admin = test.create_user("admin@example.com", vec![RoleGrant::global(Role::Admin)]);
        for i in 0..3 {
            notes
                .insert(Note::owned_by(admin.id, &format!("note {i}")))
                .expect("fixture should insert");
        }

        for page in [7, usize::MAX] {
            let response = test
                .server()
                .get(&format!("/api/notes?page={page}&page_size=10"))
                .authorization_bearer(test.token_for(&admin))
                .await;

            response.assert_status_ok();
            assert_eq!(response.json::<Value>(), json!([]));
            let pagination: Value = serde_json::from_str(
                response
                    .header(PAGINATION_HEADER)
                    .to_str()
                    .expect("header is ascii"),
            )
            .expect("header is json");
            assert_eq!(pagination["total"], json!(3));
            assert_eq!(pagination["total_pages"], json!(1));
        }
    }

    #[tokio::test]
    async fn test_non_numeric_page_is_rejected() {
        let (test, _notes) = notes_server(CrudBlueprintBuilder::new("notes")).await;
        let admin = test.create_user("admin@example.com", vec![RoleGrant::global(Role::Admin)]);

        for query in ["page=two", "page_size=-1"] {
            let response = test
                .server()
                .get(&format!("/api/notes?{query}"))
                .authorization_bearer(test.token_for(&admin))
                .await;

            assert!(respond_bad_request(&response).is_ok());
        }
    }

    #[tokio::test]
    async fn test_get_missing_and_forbidden() {
        let (test, notes) = notes_server(CrudBlueprintBuilder::new("notes")).await;
        let user = test.create_user("user@example.com", vec![RoleGrant::global(Role::User)]);
        let theirs = notes
            .insert(Note::owned_by(Uuid::new_v4(), "private"))
            .expect("fixture should insert");

        let missing = test
            .server()
            .get(&format!("/api/notes/{}", Uuid::new_v4()))
            .authorization_bearer(test.token_for(&user))
            .await;
        missing.assert_status_not_found();

        let forbidden = test
            .server()
            .get(&format!("/api/notes/{}", theirs.id.expect("fixture has an id")))
            .authorization_bearer(test.token_for(&user))
            .await;
        assert!(be_forbidden(&forbidden).is_ok());
    }

    #[tokio::test]
    async fn test_patch_and_delete_require_write() {
        let (test, notes) = notes_server(CrudBlueprintBuilder::new("notes")).await;
        let owner = test.create_user("owner@example.com", vec![RoleGrant::global(Role::User)]);
        let intruder = test.create_user("intruder@example.com", vec![RoleGrant::global(Role::User)]);
        let note = notes
            .insert(Note::owned_by(owner.id, "draft"))
            .expect("fixture should insert");
        let path = format!("/api/notes/{}", note.id.expect("fixture has an id"));

        let denied = test
            .server()
            .patch(&path)
            .authorization_bearer(test.token_for(&intruder))
            .json(&json!({ "body": "defaced" }))
            .await;
        denied.assert_status(StatusCode::FORBIDDEN);

        let updated = test
            .server()
            .patch(&path)
            .authorization_bearer(test.token_for(&owner))
            .json(&json!({ "body": "final" }))
            .await;
        updated.assert_status_ok();
        assert_eq!(updated.json::<Value>()["body"], "final");

        let denied = test
            .server()
            .delete(&path)
            .authorization_bearer(test.token_for(&intruder))
            .await;
        denied.assert_status(StatusCode::FORBIDDEN);

        let deleted = test
            .server()
            .delete(&path)
            .authorization_bearer(test.token_for(&owner))
            .await;
        deleted.assert_status(StatusCode::NO_CONTENT);
        assert_eq!(notes.len(), 0);
    }

    #[tokio::test]
    async fn test_invalid_payload_is_rejected() {
        let (test, _notes) = notes_server(CrudBlueprintBuilder::new("notes")).await;
        let owner = test.create_user("owner@example.com", vec![RoleGrant::global(Role::User)]);

        let response = test
            .server()
            .post("/api/notes")
            .authorization_bearer(test.token_for(&owner))
            .json(&json!({ "body": "" }))
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_admin_only_method() {
        let settings = BTreeMap::from([(
            CrudMethod::Delete,
            MethodSetting::from(crate::crud::MethodOverrides {
                admin_only: true,
                ..Default::default()
            }),
        )]);
        let (test, notes) = notes_server(CrudBlueprintBuilder::new("notes").methods(settings)).await;
        let owner = test.create_user("owner@example.com", vec![RoleGrant::global(Role::User)]);
        let admin = test.create_user("admin@example.com", vec![RoleGrant::global(Role::Admin)]);
        let note = notes
            .insert(Note::owned_by(owner.id, "draft"))
            .expect("fixture should insert");
        let path = format!("/api/notes/{}", note.id.expect("fixture has an id"));

        let owner_attempt = test
            .server()
            .delete(&path)
            .authorization_bearer(test.token_for(&owner))
            .await;
        owner_attempt.assert_status(StatusCode::FORBIDDEN);

        let admin_attempt = test
            .server()
            .delete(&path)
            .authorization_bearer(test.token_for(&admin))
            .await;
        admin_attempt.assert_status(StatusCode::NO_CONTENT);
    }
}
