use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    crud::{CrudModel, PayloadError},
    policy::{Entity, HookContext, HookResult},
    roles::{normalize_domain, Actor, Role, RoleGrant},
};

/// A role granted to a user, optionally scoped to a domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRole {
    pub id: Option<Uuid>,
    /// Filled in when the owning user is stored.
    pub user_id: Option<Uuid>,
    pub role: Role,
    pub domain: Option<String>,
}

impl UserRole {
    /// Not yet persisted grant of `role` to `user_id`. A `"*"` domain means all
    /// domains.
    pub fn new(user_id: Uuid, role: Role, domain: Option<&str>) -> Self {
        Self {
            id: None,
            user_id: Some(user_id),
            role,
            domain: normalize_domain(domain),
        }
    }

    pub fn grant(&self) -> RoleGrant {
        RoleGrant {
            role: self.role,
            domain: self.domain.clone(),
        }
    }

    /// Superadmin and admin grants are handed out by superadmins only; the
    /// rest by admins of the grant's domain.
    fn may_be_managed_by(&self, actor: &Actor) -> bool {
        if self.role.is_privileged() {
            actor.is_superadmin()
        } else {
            actor.is_admin_in(self.domain.as_deref())
        }
    }
}

impl From<RoleGrant> for UserRole {
    fn from(grant: RoleGrant) -> Self {
        Self {
            id: None,
            user_id: None,
            role: grant.role,
            domain: grant.domain,
        }
    }
}

impl Entity for UserRole {
    fn id(&self) -> Option<Uuid> {
        self.id
    }

    fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    fn exempt_from_admin_override(&self) -> bool {
        true
    }

    fn describe(&self) -> String {
        let id = self.id.map_or_else(|| "new".to_string(), |id| id.to_string());
        match &self.domain {
            Some(domain) => format!("UserRole({id}, {} in {domain})", self.role),
            None => format!("UserRole({id}, {})", self.role),
        }
    }

    fn allow_read(&self, ctx: &HookContext) -> HookResult {
        let actor = ctx.actor()?;
        Ok(self.user_id == Some(actor.id) || self.may_be_managed_by(actor))
    }

    fn allow_write(&self, ctx: &HookContext) -> HookResult {
        Ok(self.may_be_managed_by(ctx.actor()?))
    }

    fn allow_create(&self, ctx: &HookContext) -> HookResult {
        self.allow_write(ctx)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UserRoleCreate {
    pub user_id: Uuid,
    pub role: Role,
    #[validate(length(min = 1, max = 255))]
    pub domain: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UserRoleUpdate {
    pub role: Option<Role>,
    #[validate(length(min = 1, max = 255))]
    pub domain: Option<String>,
}

impl CrudModel for UserRole {
    type Create = UserRoleCreate;
    type Update = UserRoleUpdate;

    fn from_create(payload: UserRoleCreate) -> Result<Self, PayloadError> {
        Ok(Self::new(payload.user_id, payload.role, payload.domain.as_deref()))
    }

    fn apply_update(&mut self, payload: UserRoleUpdate) -> Result<(), PayloadError> {
        let mut updated = self.clone();
        if let Some(role) = payload.role {
            updated.role = role;
        }
        if let Some(domain) = payload.domain {
            updated.domain = normalize_domain(Some(&domain));
        }

        // The write check ran against the current grant; the new one must
        // pass it as well, or an admin could promote a grant it can edit.
        let permitted = match crate::auth::resolve_actor().actor() {
            Some(actor) => updated.may_be_managed_by(actor),
            None => true,
        };
        if !permitted {
            return Err(PayloadError::invalid(
                "role",
                format!("not allowed to grant {} role", updated.role),
            ));
        }

        *self = updated;
        Ok(())
    }

    fn assign_id(&mut self, id: Uuid) {
        self.id = Some(id);
    }
}
