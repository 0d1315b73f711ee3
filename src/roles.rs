use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use uuid::Uuid;

/// Domain name that makes a grant apply to every domain.
pub const ANY_DOMAIN: &str = "*";

/// The closed set of roles an actor can be granted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    Superadmin,
    Admin,
    Editor,
    User,
}

impl Role {
    /// Roles whose grants can only be handed out by a superadmin.
    pub fn is_privileged(self) -> bool {
        matches!(self, Self::Superadmin | Self::Admin)
    }
}

/// A role held by an actor, optionally scoped to a single domain.
///
/// `domain: None` means the grant applies to all domains. The `"*"` sentinel
/// is accepted on input and normalized to `None` by [`RoleGrant::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleGrant {
    pub role: Role,
    pub domain: Option<String>,
}

impl RoleGrant {
    pub fn new(role: Role, domain: Option<&str>) -> Self {
        Self {
            role,
            domain: normalize_domain(domain),
        }
    }

    pub fn global(role: Role) -> Self {
        Self { role, domain: None }
    }

    /// Whether this grant covers `domain`.
    ///
    /// A global grant covers every domain. A query without a domain is
    /// satisfied by any grant of the role, scoped or not.
    pub fn covers(&self, domain: Option<&str>) -> bool {
        match (self.domain.as_deref(), domain) {
            (None, _) | (Some(ANY_DOMAIN), _) | (_, None) => true,
            (Some(own), Some(queried)) => own == queried,
        }
    }
}

pub(crate) fn normalize_domain(domain: Option<&str>) -> Option<String> {
    match domain {
        None | Some(ANY_DOMAIN) => None,
        Some(name) => Some(name.to_string()),
    }
}

/// The principal attempting an operation.
///
/// Actors are resolved per operation (see [`crate::auth::current_actor`]) and
/// are never cached beyond it, so grant changes take effect on the next request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: Uuid,
    #[serde(default)]
    pub grants: Vec<RoleGrant>,
}

impl Actor {
    pub fn new(id: Uuid, grants: Vec<RoleGrant>) -> Self {
        Self { id, grants }
    }

    pub fn has_role(&self, role: Role, domain: Option<&str>) -> bool {
        self.grants
            .iter()
            .any(|grant| grant.role == role && grant.covers(domain))
    }

    pub fn is_superadmin(&self) -> bool {
        self.has_role(Role::Superadmin, None)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin, None) || self.is_superadmin()
    }

    /// Admin check scoped to the domain an entity lives in.
    pub fn is_admin_in(&self, domain: Option<&str>) -> bool {
        self.has_role(Role::Admin, domain) || self.has_role(Role::Superadmin, domain)
    }

    /// Domains the actor holds any grant in; `"*"` stands for global grants.
    pub fn domain_ids(&self) -> BTreeSet<&str> {
        self.grants
            .iter()
            .map(|grant| grant.domain.as_deref().unwrap_or(ANY_DOMAIN))
            .collect()
    }

    pub fn has_domain_access(&self, domain: Option<&str>) -> bool {
        let Some(domain) = domain else {
            return true;
        };
        let domains = self.domain_ids();
        domains.contains(domain) || domains.contains(ANY_DOMAIN)
    }
}
