use std::time::Duration;

use teloxide::adaptors::throttle::Limits;
use teloxide::adaptors::Throttle;
use teloxide::dptree;
use teloxide::prelude::*;
use teloxide::Bot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::command::setup_commands;
use crate::config::AppConfig;
use crate::error::{BotError, BotResult, HandlerResult};
use crate::handler::get_handler;
use crate::service::dialogue::DialogueService;
use crate::state::AppState;
use crate::utils::http;

pub struct BotService {
    pub bot: Throttle<Bot>,
    state: AppState,
}

impl BotService {
    pub fn new(config: AppConfig) -> BotResult<Self> {
        let client = http::create_telegram_client().map_err(|e| BotError::Other(e.into()))?;
        let bot = Bot::with_client(config.telegram.0.clone(), client).throttle(Limits::default());

        info!("Initializing AppState...");
        let state = AppState::new(config)?;
        info!("AppState initialized");

        Ok(Self { bot, state })
    }

    pub async fn start(&self) -> HandlerResult<()> {
        info!("Testing connection to Telegram API...");
        match self.bot.get_me().await {
            Ok(me) => info!("Connected to Telegram API as @{}", me.username()),
            Err(e) => {
                error!("Failed to connect to Telegram API: {:?}", e);
                return Err(anyhow::anyhow!("Failed to connect to Telegram API: {}", e).into());
            }
        }

        if let Err(e) = self.state.services.api.health().await {
            // scans re-check before every call, so the bot still starts
            warn!("Backend health check failed: {}", e);
        }

        setup_commands(&self.bot, &self.state.config.admin).await?;

        let cleanup = spawn_dialogue_cleanup(
            self.state.services.dialogue.clone(),
            self.state.config.dialogue.cleanup_interval,
        );

        Dispatcher::builder(self.bot.clone(), get_handler())
            .dependencies(dptree::deps![self.state.clone()])
            .error_handler(LoggingErrorHandler::with_custom_text(
                "An error has occurred in the dispatcher",
            ))
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        cleanup.abort();
        info!("Bot stopped");
        Ok(())
    }
}

fn spawn_dialogue_cleanup(dialogue: DialogueService, every: Duration) -> JoinHandle<()> {
    let every = every.max(Duration::from_secs(1));
    info!("Pruning expired dialogues every {}s", every.as_secs());

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            let removed = dialogue.cleanup_expired();
            if removed > 0 {
                debug!("Pruned {} dialogue entries, {} left", removed, dialogue.len());
            }
        }
    })
}
