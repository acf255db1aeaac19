//! Command-line argument parsing
//!
//! The binary is configured mostly through `config.toml` and `SHORTLY__*`
//! environment variables; the command line only picks the file and the mode.

use clap::{Parser, Subcommand};

use super::DEFAULT_CONFIG_PATH;

#[derive(Debug, Parser)]
#[command(name = "shortly", version, about = "URL shortener with click analytics")]
pub struct CliArgs {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, global = true)]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Start the HTTP server (default)
    Serve,
    /// Write a sample configuration file with every default filled in
    GenerateConfig {
        /// Output path
        #[arg(default_value = "config.example.toml")]
        output: String,
    },
}

impl CliArgs {
    /// The command to run, `serve` when none was given
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_serve() {
        let args = CliArgs::parse_from(["shortly"]);
        assert_eq!(args.config, DEFAULT_CONFIG_PATH);
        assert_eq!(args.command(), Command::Serve);
    }

    #[test]
    fn test_config_path_and_subcommand() {
        let args = CliArgs::parse_from(["shortly", "-c", "custom.toml", "generate-config"]);
        assert_eq!(args.config, "custom.toml");
        assert_eq!(
            args.command(),
            Command::GenerateConfig {
                output: "config.example.toml".to_string()
            }
        );

        let args = CliArgs::parse_from(["shortly", "generate-config", "out.toml", "--config=x.toml"]);
        assert_eq!(args.config, "x.toml");
        assert_eq!(
            args.command(),
            Command::GenerateConfig {
                output: "out.toml".to_string()
            }
        );
    }
}
