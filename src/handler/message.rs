use teloxide::{
    adaptors::Throttle,
    dispatching::{UpdateFilterExt, UpdateHandler},
    dptree,
    types::{Message, Update},
    Bot,
};

use super::send_outcome;
use crate::{
    error::HandlerResult,
    flow::{self, Input, Outcome, Reply},
    format,
    middleware::RequestContext,
    state::AppState,
};

use super::keyboard::get_main_menu_keyboard;

pub fn get_message_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    Update::filter_message()
        .branch(
            dptree::filter_map(|msg: Message| msg.text().map(ToOwned::to_owned)).endpoint(handle_text),
        )
        .branch(dptree::endpoint(handle_message_unknown))
}

async fn handle_text(
    bot: Throttle<Bot>,
    state: AppState,
    ctx: RequestContext,
    msg: Message,
    text: String,
) -> HandlerResult<()> {
    let outcome = flow::dispatch(&state, &ctx, Input::Text(text)).await;
    send_outcome(&bot, msg.chat.id, Some(msg.id), outcome).await
}

/// Stickers, photos and anything else without text.
async fn handle_message_unknown(bot: Throttle<Bot>, msg: Message) -> HandlerResult<()> {
    let outcome = Outcome {
        replies: vec![Reply::with_keyboard(format::UNKNOWN_MESSAGE, get_main_menu_keyboard())],
        delete_input: false,
    };
    send_outcome(&bot, msg.chat.id, None, outcome).await
}
