use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = env!("CARGO_PKG_NAME"))]
#[command(about = env!("CARGO_PKG_DESCRIPTION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Start the web server (default)
    Serve,
    /// List the generated CRUD routes
    Routes,
    /// Generate a JWT secret for configuration
    GenerateJwtSecret,
    /// Show version information
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_subcommands() {
        let cli = Cli::try_parse_from(["rowguard", "routes"]).expect("routes is a command");
        assert_eq!(cli.command, Some(Commands::Routes));

        let cli = Cli::try_parse_from(["rowguard"]).expect("command is optional");
        assert_eq!(cli.command, None);

        assert!(Cli::try_parse_from(["rowguard", "migrate"]).is_err());
    }
}
