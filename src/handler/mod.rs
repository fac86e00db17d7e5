mod callback;
mod command;
mod keyboard;
mod message;

pub use keyboard::*;

use callback::get_callback_handler;
use command::get_command_handler;
use message::get_message_handler;
use teloxide::{
    adaptors::Throttle,
    dispatching::UpdateHandler,
    dptree,
    payloads::SendMessageSetters,
    prelude::Requester,
    types::{ChatId, MessageId, ParseMode, Update},
    Bot,
};

use crate::{error::HandlerResult, flow::Outcome, middleware::resolve_context, state::AppState};

pub fn get_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    dptree::entry()
        // every branch below gets the sender's RequestContext
        .filter_map(|update: Update, state: AppState| resolve_context(&update, &state.config))
        .branch(get_command_handler())
        .branch(get_message_handler())
        .branch(get_callback_handler())
}

/// Sends the replies in order, after removing the input message when it held
/// a password.
async fn send_outcome(
    bot: &Throttle<Bot>,
    chat_id: ChatId,
    input: Option<MessageId>,
    outcome: Outcome,
) -> HandlerResult<()> {
    if outcome.delete_input {
        if let Some(message_id) = input {
            if let Err(e) = bot.delete_message(chat_id, message_id).await {
                warn!("Failed to delete password message in chat {}: {}", chat_id, e);
            }
        }
    }

    for reply in outcome.replies {
        let request = bot.send_message(chat_id, reply.text).parse_mode(ParseMode::Html);
        match reply.keyboard {
            Some(keyboard) => request.reply_markup(keyboard).await?,
            None => request.await?,
        };
    }

    Ok(())
}
