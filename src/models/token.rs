use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::ownership::{owner_only, Owned, Ownership};
use crate::{
    crud::{CrudModel, PayloadError},
    policy::{Entity, HookContext, HookResult},
    token::{generate_secure_token, API_TOKEN_LENGTH},
};

/// API token issued to a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub id: Option<Uuid>,
    #[serde(flatten)]
    pub ownership: Ownership,
    pub token: String,
    pub description: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub revoked: bool,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl Token {
    /// Fresh token owned by `ownership`.
    pub fn issue(ownership: Ownership, description: Option<String>) -> Self {
        Self {
            id: None,
            ownership,
            token: generate_secure_token(API_TOKEN_LENGTH),
            description,
            expires_at: None,
            revoked: false,
            revoked_at: None,
        }
    }

    pub fn revoke(&mut self) {
        if !self.revoked {
            self.revoked = true;
            self.revoked_at = Some(Utc::now());
        }
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && self.expires_at.is_none_or(|expires_at| expires_at > now)
    }
}

impl Owned for Token {
    fn owner_id(&self) -> Option<Uuid> {
        self.ownership.owner_id()
    }
}

impl Entity for Token {
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
pub struct TokenCreate {
    #[validate(length(max = 64))]
    pub description: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TokenUpdate {
    #[validate(length(max = 64))]
    pub description: Option<String>,
    /// Revocation is one way; `false` is ignored.
    pub revoked: Option<bool>,
}

impl CrudModel for Token {
    type Create = TokenCreate;
    type Update = TokenUpdate;

    fn from_create(payload: TokenCreate) -> Result<Self, PayloadError> {
        if payload.expires_at.is_some_and(|expires_at| expires_at <= Utc::now()) {
            return Err(PayloadError::invalid("expires_at", "must be in the future"));
        }
        let mut token = Token::issue(Ownership::current(), payload.description);
        token.expires_at = payload.expires_at;
        Ok(token)
    }

    fn apply_update(&mut self, payload: TokenUpdate) -> Result<(), PayloadError> {
        if let Some(description) = payload.description {
            self.description = Some(description);
        }
        if payload.revoked == Some(true) {
            self.revoke();
        }
        Ok(())
    }

    fn assign_id(&mut self, id: Uuid) {
        self.id = Some(id);
    }
}
