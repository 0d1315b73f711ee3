//! Built-in models for user management and multi-tenancy.

pub mod domain;
pub mod ownership;
pub mod token;
pub mod user;
pub mod user_role;
pub mod user_setting;

pub use domain::Domain;
pub use ownership::{owner_only, Owned, Ownership};
pub use token::Token;
pub use user::{User, UserActorLoader};
pub use user_role::UserRole;
pub use user_setting::UserSetting;
