use teloxide::{
    adaptors::Throttle,
    dispatching::{HandlerExt, UpdateFilterExt, UpdateHandler},
    types::{Message, Update},
    Bot,
};

use super::send_outcome;
use crate::{
    command::Command,
    error::HandlerResult,
    flow::{self, Input},
    middleware::RequestContext,
    state::AppState,
};

pub fn get_command_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    Update::filter_message()
        .filter_command::<Command>()
        .endpoint(handle_command)
}

async fn handle_command(
    bot: Throttle<Bot>,
    state: AppState,
    ctx: RequestContext,
    msg: Message,
    command: Command,
) -> HandlerResult<()> {
    info!("Command {:?} from user {}", command, ctx.user_id);

    let outcome = flow::dispatch(&state, &ctx, Input::Command(command)).await;
    send_outcome(&bot, msg.chat.id, Some(msg.id), outcome).await
}
