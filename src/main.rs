use clap::Parser;
use tracing::info;

use shortly::config::args::{CliArgs, Command};
use shortly::config::{StaticConfig, init_config};
use shortly::runtime::run_server;
use shortly::system::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = CliArgs::parse();

    match args.command() {
        Command::GenerateConfig { output } => {
            let sample = StaticConfig::generate_sample_config()?;
            std::fs::write(&output, sample)?;
            println!("Sample configuration written to {}", output);
            Ok(())
        }
        Command::Serve => {
            let config = init_config(&args.config).map_err(|e| {
                eprintln!("{}", e.format_colored());
                anyhow::anyhow!(e)
            })?;
            let _guard = init_logging(&config.logging)?;
            info!("Configuration loaded (config file: {})", args.config);

            run_server(config).await
        }
    }
}
