use std::{fmt, sync::Arc};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

use super::user_role::UserRole;
use crate::{
    auth::ActorLoader,
    crud::{CrudModel, PayloadError, Repository, RepositoryError},
    password::{hash_password, verify_password},
    policy::{bypass_active, Entity, EntityGraph, HookContext, HookResult, PayloadValue},
    roles::{Actor, Role, RoleGrant},
};

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Option<Uuid>,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub enabled: bool,
    pub roles: Vec<UserRole>,
}

impl User {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            id: None,
            email: email.into(),
            password_hash: None,
            enabled: true,
            roles: Vec::new(),
        }
    }

    pub fn with_password(mut self, password: &str) -> Result<Self, PayloadError> {
        self.set_password(password)?;
        Ok(self)
    }

    pub fn with_grants(mut self, grants: impl IntoIterator<Item = RoleGrant>) -> Self {
        let user_id = self.id;
        self.roles.extend(grants.into_iter().map(|grant| UserRole {
            user_id,
            ..UserRole::from(grant)
        }));
        self
    }

    pub fn set_password(&mut self, password: &str) -> Result<(), PayloadError> {
        let hash = hash_password(password).map_err(|e| PayloadError::Hashing(e.to_string()))?;
        self.password_hash = Some(hash);
        Ok(())
    }

    /// Users without a password never match.
    pub fn is_password_correct(&self, password: &str) -> bool {
        self.password_hash
            .as_deref()
            .is_some_and(|hash| verify_password(password, hash).unwrap_or(false))
    }

    pub fn grants(&self) -> Vec<RoleGrant> {
        self.roles.iter().map(UserRole::grant).collect()
    }

    pub fn is_admin(&self) -> bool {
        self.roles
            .iter()
            .any(|role| matches!(role.role, Role::Admin | Role::Superadmin))
    }

    /// The actor this user acts as. `None` until the user is stored.
    pub fn to_actor(&self) -> Option<Actor> {
        self.id.map(|id| Actor::new(id, self.grants()))
    }
}

impl Entity for User {
    fn id(&self) -> Option<Uuid> {
        self.id
    }

    /// Admin accounts are only managed through their own hooks, so that one
    /// admin cannot take over another.
    fn exempt_from_admin_override(&self) -> bool {
        self.is_admin()
    }

    fn allow_write(&self, ctx: &HookContext) -> HookResult {
        Ok(self.id.is_some() && self.id == ctx.actor_id())
    }

    fn allow_create(&self, ctx: &HookContext) -> HookResult {
        Ok(ctx.actor()?.is_admin())
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct RoleGrantPayload {
    pub role: Role,
    #[validate(length(min = 1, max = 255))]
    pub domain: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UserCreate {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: String,
    pub enabled: Option<bool>,
    #[serde(default)]
    #[validate(nested)]
    pub roles: Vec<RoleGrantPayload>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UserUpdate {
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: Option<String>,
    pub old_password: Option<String>,
    pub enabled: Option<bool>,
}

impl CrudModel for User {
    type Create = UserCreate;
    type Update = UserUpdate;

    fn from_create(payload: UserCreate) -> Result<Self, PayloadError> {
        let mut user = User::new(payload.email)
            .with_password(&payload.password)?
            .with_grants(
                payload
                    .roles
                    .iter()
                    .map(|role| RoleGrant::new(role.role, role.domain.as_deref())),
            );
        if let Some(enabled) = payload.enabled {
            user.enabled = enabled;
        }
        Ok(user)
    }

    /// Changing the password requires the old one, unless permission checks
    /// for users are bypassed.
    fn apply_update(&mut self, payload: UserUpdate) -> Result<(), PayloadError> {
        if let Some(password) = &payload.password {
            if !bypass_active::<User>() {
                let Some(old_password) = &payload.old_password else {
                    return Err(PayloadError::invalid(
                        "old_password",
                        "Must provide old_password to set new password",
                    ));
                };
                if !self.is_password_correct(old_password) {
                    return Err(PayloadError::invalid("old_password", "Old password is incorrect"));
                }
            }
            self.set_password(password)?;
        }

        if let Some(email) = payload.email {
            self.email = email;
        }
        if let Some(enabled) = payload.enabled {
            self.enabled = enabled;
        }
        Ok(())
    }

    fn assign_id(&mut self, id: Uuid) {
        self.id = Some(id);
        for role in &mut self.roles {
            role.user_id = Some(id);
            if role.id.is_none() {
                role.id = Some(Uuid::new_v4());
            }
        }
    }

    /// The user and every role grant it is created with.
    fn creation_graph(&self) -> (EntityGraph, Vec<PayloadValue>) {
        let mut graph = EntityGraph::new();
        let user = graph.insert(self.clone());
        let roles = self
            .roles
            .iter()
            .map(|role| graph.insert(role.clone()).into())
            .collect::<Vec<PayloadValue>>();
        graph.link(user, roles);
        (graph, vec![user.into()])
    }
}

/// Loads actors from stored users. Disabled users cannot act.
#[derive(Clone)]
pub struct UserActorLoader {
    users: Arc<dyn Repository<User>>,
}

impl UserActorLoader {
    pub fn new(users: Arc<dyn Repository<User>>) -> Self {
        Self { users }
    }
}

impl fmt::Debug for UserActorLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserActorLoader").finish_non_exhaustive()
    }
}

#[async_trait]
impl ActorLoader for UserActorLoader {
    async fn load_actor(&self, id: Uuid) -> Result<Option<Actor>, RepositoryError> {
        let Some(user) = self.users.find_by("id", &id.to_string()).await? else {
            return Ok(None);
        };

        if !user.enabled {
            debug!(user_id = %id, "Disabled user cannot act");
            return Ok(None);
        }

        Ok(user.to_actor())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::assertions::{be_forbidden, respond_created},
        auth::run_as,
        crud::CrudBlueprintBuilder,
        policy::{bypass_perms, Action, PermissionError, Permissions},
        tests::{setup_test, MemoryRepository},
    };

    fn stored(user: User) -> User {
        let mut user = user;
        user.assign_id(Uuid::new_v4());
        user
    }

    #[test]
    fn test_password_is_hashed_and_hidden() {
        let user = User::new("ada@example.com")
            .with_password("analytical")
            .expect("hashing should succeed");

        assert!(user.is_password_correct("analytical"));
        assert!(!user.is_password_correct("difference"));
        let rendered = user.render(None);
        assert!(rendered.get("password_hash").is_none());
        assert_eq!(rendered["email"], "ada@example.com");
    }

    #[test]
    fn test_user_writes_self_only() {
        let user = stored(User::new("ada@example.com").with_grants([RoleGrant::global(Role::User)]));
        let me = user.to_actor().expect("stored user has an id");
        let other = Actor::new(Uuid::new_v4(), vec![RoleGrant::global(Role::User)]);

        assert_eq!(run_as(me, || user.can_write()), Ok(true));
        assert_eq!(run_as(other, || user.can_write()), Ok(false));
    }

    #[test]
    fn test_admin_accounts_are_exempt_from_override() {
        let admin_user = stored(User::new("root@example.com").with_grants([RoleGrant::global(Role::Admin)]));
        let plain_user = stored(User::new("joe@example.com"));
        let other_admin = Actor::new(Uuid::new_v4(), vec![RoleGrant::global(Role::Admin)]);

        assert_eq!(run_as(other_admin.clone(), || admin_user.can_write()), Ok(false));
        assert_eq!(run_as(other_admin, || plain_user.can_write()), Ok(true));
    }

    #[test]
    fn test_only_admins_create_users() {
        let user = User::new("new@example.com");
        let admin = Actor::new(Uuid::new_v4(), vec![RoleGrant::new(Role::Admin, Some("acme"))]);
        let regular = Actor::new(Uuid::new_v4(), vec![RoleGrant::global(Role::User)]);

        assert_eq!(run_as(admin, || user.can_create()), Ok(true));
        assert_eq!(run_as(regular, || user.can_create()), Ok(false));
    }

    #[test]
    fn test_creation_graph_checks_nested_roles() {
        let user = User::new("boss@example.com").with_grants([RoleGrant::global(Role::Superadmin)]);
        let admin = Actor::new(Uuid::new_v4(), vec![RoleGrant::global(Role::Admin)]);
        let superadmin = Actor::new(Uuid::new_v4(), vec![RoleGrant::global(Role::Superadmin)]);
        let (graph, roots) = user.creation_graph();

        assert_eq!(graph.len(), 2);
        assert_eq!(
            run_as(admin, || graph.check_create(&roots)),
            Err(PermissionError::Forbidden {
                action: Action::Create,
                entity: "UserRole(new, superadmin)".to_string(),
            })
        );
        assert_eq!(run_as(superadmin, || graph.check_create(&roots)), Ok(()));
    }

    #[test]
    fn test_password_change_requires_old_password() {
        let mut user = stored(User::new("ada@example.com").with_password("analytical").expect("hash"));
        let change = |old: Option<&str>| UserUpdate {
            email: None,
            password: Some("new-password".to_string()),
            old_password: old.map(str::to_string),
            enabled: None,
        };

        assert!(matches!(
            user.apply_update(change(None)),
            Err(PayloadError::Invalid { field: "old_password", .. })
        ));
        assert!(matches!(
            user.apply_update(change(Some("wrong-password"))),
            Err(PayloadError::Invalid { field: "old_password", .. })
        ));
        user.apply_update(change(Some("analytical"))).expect("old password is correct");
        assert!(user.is_password_correct("new-password"));
    }

    #[test]
    fn test_bypass_allows_password_reset() {
        let mut user = stored(User::new("ada@example.com").with_password("analytical").expect("hash"));

        bypass_perms::<User, _>(|| {
            user.apply_update(UserUpdate {
                email: None,
                password: Some("reset-by-system".to_string()),
                old_password: None,
                enabled: None,
            })
        })
        .expect("bypass skips the old password check");

        assert!(user.is_password_correct("reset-by-system"));
    }

    #[tokio::test]
    async fn test_loader_skips_disabled_users() {
        let users = Arc::new(MemoryRepository::<User>::new());
        let active = users
            .insert(User::new("on@example.com").with_grants([RoleGrant::global(Role::Editor)]))
            .expect("insert");
        let mut disabled = User::new("off@example.com");
        disabled.enabled = false;
        let disabled = users.insert(disabled).expect("insert");
        let loader = UserActorLoader::new(users);

        let actor = loader
            .load_actor(active.id.expect("id"))
            .await
            .expect("load")
            .expect("active user resolves");
        assert!(actor.has_role(Role::Editor, None));
        assert_eq!(loader.load_actor(disabled.id.expect("id")).await.expect("load"), None);
        assert_eq!(loader.load_actor(Uuid::new_v4()).await.expect("load"), None);
    }

    #[tokio::test]
    async fn test_post_with_nested_privileged_role_is_forbidden() {
        let test = setup_test(|_app, users| {
            let repository: Arc<dyn Repository<User>> = users;
            CrudBlueprintBuilder::new("users")
                .model_name("User")
                .build(repository)
                .expect("blueprint should build")
                .router()
        })
        .await;
        let admin = test.create_user("admin@example.com", vec![RoleGrant::global(Role::Admin)]);
        let superadmin =
            test.create_user("root@example.com", vec![RoleGrant::global(Role::Superadmin)]);
        let payload = serde_json::json!({
            "email": "boss@example.com",
            "password": "correct horse",
            "roles": [{ "role": "superadmin" }],
        });

        let denied = test
            .server()
            .post("/api/users")
            .authorization_bearer(test.token_for(&admin))
            .json(&payload)
            .await;

        assert!(be_forbidden(&denied).is_ok());
        let error = denied.json::<serde_json::Value>()["error"].to_string();
        assert!(error.contains("UserRole(new, superadmin)"), "got {error}");
        assert_eq!(test.users.len(), 2);

        let allowed = test
            .server()
            .post("/api/users")
            .authorization_bearer(test.token_for(&superadmin))
            .json(&payload)
            .await;

        assert!(respond_created(&allowed).is_ok());
        assert_eq!(test.users.len(), 3);
    }
}
