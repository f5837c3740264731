use anyhow::{Context, Result, anyhow};
use clap::Parser;

use shortleak::cli::Cli;
use shortleak::config::{StaticConfig, validators::validate_config};
use shortleak::runtime::modes::run_server;
use shortleak::system::logging::init_logging;

#[actix_web::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.generate_config {
        println!("{}", StaticConfig::generate_sample_config());
        return Ok(());
    }

    dotenvy::dotenv().ok();

    let config = StaticConfig::load(cli.config.as_deref()).context("Failed to load config")?;
    validate_config(&config).map_err(|e| anyhow!("Invalid configuration: {}", e))?;

    // guard 需要存活到进程结束，否则文件日志不会刷新
    let _guard = init_logging(&config.logging)?;

    run_server(&config).await
}
