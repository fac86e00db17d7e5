use teloxide::{
    adaptors::Throttle,
    dispatching::{UpdateFilterExt, UpdateHandler},
    prelude::Requester,
    types::{CallbackQuery, Update},
    Bot,
};

use super::send_outcome;
use crate::{
    error::HandlerResult,
    flow::{self, Input},
    middleware::RequestContext,
    state::AppState,
};

pub fn get_callback_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    Update::filter_callback_query().endpoint(handle_callback)
}

async fn handle_callback(
    bot: Throttle<Bot>,
    state: AppState,
    ctx: RequestContext,
    q: CallbackQuery,
) -> HandlerResult<()> {
    // stop the button spinner before a possibly slow backend call
    bot.answer_callback_query(q.id.clone()).await?;

    let Some(data) = q.data else {
        return Ok(());
    };
    debug!("Callback {} from user {}", data, ctx.user_id);

    let outcome = flow::dispatch(&state, &ctx, Input::Callback(data)).await;
    send_outcome(&bot, ctx.chat_id, None, outcome).await
}
