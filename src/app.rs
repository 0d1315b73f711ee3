use std::sync::Arc;

use crate::{auth::ActorLoader, config::Config, environment::Environment};

/// State shared by every request handler.
#[derive(Clone, Debug)]
pub struct App {
    pub config: Config,
    pub environment: Environment,
    /// Resolves bearer tokens to actors.
    pub actors: Arc<dyn ActorLoader>,
}
