use std::{env, str::FromStr as _, sync::Arc};

use clap::Parser as _;
use config_rs::Config as ConfigRs;
use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    app::App,
    app_info::AppInfo,
    auth::ActorLoader,
    cli::{Cli, Commands},
    commands::{generate_secret, routes, serve, version},
    config::Config,
    crud::ConfigurationError,
    environment::Environment,
    router::ApiRouter,
    setup_tracing::setup_tracing_for_command,
};

const ENVIRONMENT_VARIABLE: &str = "APP_ENVIRONMENT";

/// Builds the application's routes. Blueprint configuration errors abort startup.
pub type AppRouter = Box<dyn FnOnce(App) -> Result<ApiRouter, ConfigurationError> + Send>;

#[derive(Debug, Error)]
pub enum BootError {
    #[error("failed to read configuration: {0}")]
    Config(#[from] config_rs::ConfigError),
    #[error("invalid CRUD configuration: {0}")]
    Crud(#[from] ConfigurationError),
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// Everything needed to start the application.
pub struct BootConfig {
    pub app_info: AppInfo,
    pub actors: Arc<dyn ActorLoader>,
    pub app_router: AppRouter,
}

impl BootConfig {
    #[must_use]
    pub fn new<F>(app_info: AppInfo, actors: Arc<dyn ActorLoader>, app_router: F) -> Self
    where
        F: FnOnce(App) -> Result<ApiRouter, ConfigurationError> + Send + 'static,
    {
        Self {
            app_info,
            actors,
            app_router: Box::new(app_router),
        }
    }
}

/// Parse the command line, load configuration and run the requested command.
///
/// # Example
/// ```rust,ignore
/// #[tokio::main]
/// async fn main() -> Result<(), BootError> {
///     let users: Arc<dyn Repository<User>> = Arc::new(UserStore::connect().await);
///     let actors = Arc::new(UserActorLoader::new(users.clone()));
///
///     boot(BootConfig::new(app_info(), actors, move |app| {
///         let users = CrudBlueprintBuilder::new("users")
///             .configured(&app.config.crud)?
///             .build(users)?;
///         Ok(ApiRouter::new().blueprint(&users))
///     }))
///     .await
/// }
/// ```
pub async fn boot(config: BootConfig) -> Result<(), BootError> {
    let cli = Cli::parse();

    if matches!(cli.command, Some(Commands::Version)) {
        version::print_version_info(config.app_info);
        return Ok(());
    }

    let environment = set_environment();

    let app_config = read_config(&environment)?;

    setup_tracing_for_command(&cli.command, &app_config.tracing.log_level);

    debug!("Environment set to: {:?}", environment);
    trace!("Configuration loaded: {:?}", app_config);

    let app = App {
        config: app_config,
        environment,
        actors: config.actors,
    };

    handle_command(cli, app, config.app_router, config.app_info).await
}

#[must_use]
pub fn set_environment() -> Environment {
    env::var(ENVIRONMENT_VARIABLE)
        .ok()
        .and_then(|s| Environment::from_str(&s).ok())
        .unwrap_or_default()
}

/// Read `config/{environment}` overlaid with `APP_`-prefixed variables, e.g.
/// `APP_SERVER__PORT=8080`.
pub fn read_config(environment: &Environment) -> Result<Config, config_rs::ConfigError> {
    let config_file_name = environment.config_file();

    trace!("Reading configuration from: {}", config_file_name);

    ConfigRs::builder()
        .add_source(config_rs::File::with_name(&config_file_name))
        .add_source(
            config_rs::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?
        .try_deserialize()
}

async fn handle_command(
    cli: Cli,
    app: App,
    app_router: AppRouter,
    app_info: AppInfo,
) -> Result<(), BootError> {
    match cli.command {
        Some(Commands::GenerateJwtSecret) => {
            generate_secret::handle_generate_secret_command();
            Ok(())
        }
        Some(Commands::Version) => {
            version::print_version_info(app_info);
            Ok(())
        }
        Some(Commands::Routes) => {
            let api = app_router(app)?;
            routes::print_routes(api.routes());
            Ok(())
        }
        Some(Commands::Serve) | None => serve::handle_serve_command(app, app_router).await,
    }
}
