use teloxide::types::{ChatId, Update, UserId};

use crate::{
    command::Command,
    config::AppConfig,
    error::{BotError, BotResult},
};

/// Identity of whoever sent the update being handled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestContext {
    pub user_id: UserId,
    pub first_name: String,
    pub chat_id: ChatId,
    pub is_admin: bool,
}

impl RequestContext {
    pub fn new(user_id: UserId, first_name: impl Into<String>, is_admin: bool) -> Self {
        Self {
            user_id,
            first_name: first_name.into(),
            chat_id: ChatId::from(user_id),
            is_admin,
        }
    }
}

/// Updates without a sender (channel posts and the like) yield `None`.
pub fn resolve_context(update: &Update, config: &AppConfig) -> Option<RequestContext> {
    let user = update.from()?;
    let ctx = RequestContext::new(user.id, user.first_name.clone(), config.admin.contains(user.id));

    // callbacks and private messages come from the user's own chat
    match update.chat() {
        Some(chat) => Some(RequestContext { chat_id: chat.id, ..ctx }),
        None => Some(ctx),
    }
}

pub fn authorize(ctx: &RequestContext, command: &Command) -> BotResult<()> {
    if command.is_admin_only() && !ctx.is_admin {
        warn!("User {} tried admin command {:?}", ctx.user_id, command);
        return Err(BotError::Authorization(format!("{:?} is admin only", command)));
    }
    Ok(())
}
