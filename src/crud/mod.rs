//! Auto-generated CRUD routes for models implementing [`CrudModel`].

mod blueprint;
mod handlers;
pub mod methods;
mod model;
pub mod repository;

pub use blueprint::{CrudBlueprint, CrudBlueprintBuilder, RouteInfo};
pub use methods::{
    parse_skip_methods, resolve_methods, resolve_methods_value, ConfigurationError, CrudMethod,
    MethodOverrides, MethodSetting, MethodTable, MethodWarning, MethodsSpec, ResolvedMethods,
};
pub use model::{CrudModel, PayloadError};
pub use repository::{Filters, Repository, RepositoryError};
