use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    crud::{CrudModel, PayloadError},
    policy::{Entity, HookContext, HookResult},
};

/// A tenant. Role grants can be scoped to a domain by its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub id: Option<Uuid>,
    pub name: String,
    pub display_name: String,
    pub active: bool,
}

impl Domain {
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            display_name: display_name.into(),
            active: true,
        }
    }
}

impl Entity for Domain {
    fn id(&self) -> Option<Uuid> {
        self.id
    }

    fn domain(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn allow_read(&self, _ctx: &HookContext) -> HookResult {
        Ok(true)
    }

    // Only admins, through the override, create domains.
    fn allow_create(&self, _ctx: &HookContext) -> HookResult {
        Ok(false)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct DomainCreate {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 255))]
    pub display_name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct DomainUpdate {
    #[validate(length(min = 1, max = 255))]
    pub display_name: Option<String>,
    pub active: Option<bool>,
}

impl CrudModel for Domain {
    type Create = DomainCreate;
    type Update = DomainUpdate;

    fn from_create(payload: DomainCreate) -> Result<Self, PayloadError> {
        if payload.name == crate::roles::ANY_DOMAIN {
            return Err(PayloadError::invalid("name", "'*' is reserved for all domains"));
        }
        Ok(Self::new(payload.name, payload.display_name))
    }

    fn apply_update(&mut self, payload: DomainUpdate) -> Result<(), PayloadError> {
        if let Some(display_name) = payload.display_name {
            self.display_name = display_name;
        }
        if let Some(active) = payload.active {
            self.active = active;
        }
        Ok(())
    }

    fn assign_id(&mut self, id: Uuid) {
        self.id = Some(id);
    }
}
