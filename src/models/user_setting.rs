use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::ownership::{owner_only, Owned, Ownership};
use crate::{
    crud::{CrudModel, PayloadError},
    policy::{Entity, HookContext, HookResult},
};

/// Per-user key/value setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSetting {
    pub id: Option<Uuid>,
    #[serde(flatten)]
    pub ownership: Ownership,
    pub key: String,
    pub value: Option<String>,
}

impl Owned for UserSetting {
    fn owner_id(&self) -> Option<Uuid> {
        self.ownership.owner_id()
    }
}

impl Entity for UserSetting {
    fn id(&self) -> Option<Uuid> {
        self.id
    }

    fn allow_write(&self, ctx: &HookContext) -> HookResult {
        owner_only(self, ctx)
    }

    fn allow_create(&self, ctx: &HookContext) -> HookResult {
        owner_only(self, ctx)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UserSettingCreate {
    #[validate(length(min = 1, max = 80))]
    pub key: String,
    #[validate(length(max = 1024))]
    pub value: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UserSettingUpdate {
    #[validate(length(max = 1024))]
    pub value: Option<String>,
}

impl CrudModel for UserSetting {
    type Create = UserSettingCreate;
    type Update = UserSettingUpdate;

    fn from_create(payload: UserSettingCreate) -> Result<Self, PayloadError> {
        Ok(Self {
            id: None,
            ownership: Ownership::current(),
            key: payload.key,
            value: payload.value,
        })
    }

    fn apply_update(&mut self, payload: UserSettingUpdate) -> Result<(), PayloadError> {
        self.value = payload.value;
        Ok(())
    }

    fn assign_id(&mut self, id: Uuid) {
        self.id = Some(id);
    }

    fn render(&self, view: Option<&str>) -> serde_json::Value {
        match view {
            Some("value") => serde_json::json!({ "key": self.key, "value": self.value }),
            _ => serde_json::to_value(self).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::{json, Value};

    use super::*;
    use crate::{
        crud::{CrudBlueprintBuilder, CrudMethod, MethodOverrides, MethodSetting, Repository},
        roles::{Role, RoleGrant},
        tests::{setup_test, MemoryRepository},
    };

    #[tokio::test]
    async fn test_settings_are_private_to_their_owner() {
        let settings = Arc::new(MemoryRepository::<UserSetting>::new().with_unique(&["user_id", "key"]));
        let repository: Arc<dyn Repository<UserSetting>> = settings.clone();
        let blueprint = CrudBlueprintBuilder::for_model::<UserSetting>()
            .url_prefix("/settings")
            .methods(std::collections::BTreeMap::from([
                (CrudMethod::Index, MethodSetting::from(true)),
                (
                    CrudMethod::Post,
                    MethodSetting::from(MethodOverrides {
                        schema: Some("value".to_string()),
                        ..Default::default()
                    }),
                ),
            ]))
            .build(repository)
            .expect("blueprint should build");
        let test = setup_test(move |_app, _users| blueprint.router()).await;
        let owner = test.create_user("owner@example.com", vec![RoleGrant::global(Role::User)]);
        let other = test.create_user("other@example.com", vec![RoleGrant::global(Role::User)]);

        let created = test
            .server()
            .post("/api/settings")
            .authorization_bearer(test.token_for(&owner))
            .json(&json!({ "key": "theme", "value": "dark" }))
            .await;
        created.assert_status(axum::http::StatusCode::CREATED);
        assert_eq!(
            created.json::<Value>(),
            json!({ "key": "theme", "value": "dark", "is_writable": true })
        );

        let duplicate = test
            .server()
            .post("/api/settings")
            .authorization_bearer(test.token_for(&owner))
            .json(&json!({ "key": "theme", "value": "light" }))
            .await;
        duplicate.assert_status(axum::http::StatusCode::CONFLICT);

        let listed = test
            .server()
            .get("/api/settings")
            .authorization_bearer(test.token_for(&other))
            .await;
        listed.assert_status_ok();
        assert_eq!(listed.json::<Value>(), json!([]));
        assert_eq!(settings.len(), 1);
    }
}
