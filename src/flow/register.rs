use super::FlowContext;
use crate::{
    error::{BotError, BotResult},
    format,
    handler::{get_cancel_keyboard, get_main_menu_keyboard},
    service::{api::RegisterRequest, dialogue::DialogueState},
    utils::{validate_email, validate_password, validate_username},
};

pub(super) fn start(cx: &mut FlowContext<'_>) -> BotResult<()> {
    cx.dialogue.update(DialogueState::RegisterEmail);
    cx.reply_with(format::REGISTER_PROMPT, get_cancel_keyboard());
    Ok(())
}

pub(super) async fn handle_text(cx: &mut FlowContext<'_>, text: &str) -> BotResult<()> {
    let input = text.trim();

    match cx.dialogue.state().clone() {
        DialogueState::RegisterEmail => {
            if !validate_email(input) {
                return Err(BotError::invalid(format::ERROR_INVALID_EMAIL));
            }
            cx.dialogue.update(DialogueState::RegisterPassword {
                email: input.to_string(),
            });
            cx.reply_with(format::REGISTER_PASSWORD_PROMPT, get_cancel_keyboard());
        }
        DialogueState::RegisterPassword { email } => {
            if !validate_password(input) {
                return Err(BotError::invalid(format::ERROR_SHORT_PASSWORD));
            }
            cx.dialogue.update(DialogueState::RegisterUsername {
                email,
                password: input.to_string(),
            });
            cx.reply_with(format::REGISTER_USERNAME_PROMPT, get_cancel_keyboard());
        }
        DialogueState::RegisterUsername { email, password } => {
            if !validate_username(input) {
                return Err(BotError::invalid(format::ERROR_INVALID_USERNAME));
            }
            complete(cx, email, password, input.to_string()).await?;
        }
        other => {
            return Err(BotError::DialogueStateError(format!(
                "Unexpected registration step {}",
                other
            )))
        }
    }
    Ok(())
}

async fn complete(cx: &mut FlowContext<'_>, email: String, password: String, username: String) -> BotResult<()> {
    cx.dialogue.reset();

    let request = RegisterRequest {
        email,
        username,
        confirm_password: password.clone(),
        password,
        telegram_id: cx.user_id().0,
    };

    let response = cx.api().register(&request).await?;
    info!("User {} registered as {}", cx.user_id(), request.username);

    cx.sessions().update(cx.user_id(), |session| {
        session.email = Some(request.email.clone());
        session.username = Some(request.username.clone());
        if let Some(tier) = response.tier {
            session.tier = tier;
        }
        if response.access_token.is_some() {
            session.auth_token = response.access_token.clone();
        }
    });

    cx.reply_with(
        format::register_success(&request.username, &request.email),
        get_main_menu_keyboard(),
    );
    Ok(())
}
