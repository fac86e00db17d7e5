use bot::BotService;
use config::AppConfig;

extern crate pretty_env_logger;
#[macro_use]
extern crate log;

mod bot;
mod command;
mod config;
mod error;
mod flow;
mod format;
mod handler;
mod middleware;
mod service;
mod state;
mod utils;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, env_file) = AppConfig::from_env()?;

    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", config.runtime.default_log_filter());
    }
    let _ = pretty_env_logger::try_init_timed();

    if let Some(path) = env_file {
        info!("Loaded environment from {}", path.display());
    }

    info!(
        "Starting SPL Shield bot (environment: {}, backend: {}, admins: {})",
        config.runtime.environment,
        config.api.base_url,
        config.admin.len()
    );

    let bot_service = BotService::new(config)?;
    bot_service
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("Bot stopped with error: {}", e))?;

    Ok(())
}
