use super::FlowContext;
use crate::{
    error::{BotError, BotResult},
    format,
    handler::{get_cancel_keyboard, get_main_menu_keyboard},
    service::{
        api::{ApiError, LoginRequest},
        dialogue::DialogueState,
    },
    utils::validate_email,
};

pub(super) fn start(cx: &mut FlowContext<'_>) -> BotResult<()> {
    cx.dialogue.update(DialogueState::LoginEmail);
    cx.reply_with(format::LOGIN_PROMPT, get_cancel_keyboard());
    Ok(())
}

pub(super) async fn handle_text(cx: &mut FlowContext<'_>, text: &str) -> BotResult<()> {
    let input = text.trim();

    match cx.dialogue.state().clone() {
        DialogueState::LoginEmail => {
            if !validate_email(input) {
                return Err(BotError::invalid(format::ERROR_INVALID_EMAIL));
            }
            cx.dialogue.update(DialogueState::LoginPassword {
                email: input.to_string(),
            });
            cx.reply_with(format::LOGIN_PASSWORD_PROMPT, get_cancel_keyboard());
            Ok(())
        }
        DialogueState::LoginPassword { email } => {
            if input.is_empty() {
                return Err(BotError::invalid(format::ERROR_EMPTY_PASSWORD));
            }
            complete(cx, email, input.to_string()).await
        }
        other => Err(BotError::DialogueStateError(format!(
            "Unexpected login step {}",
            other
        ))),
    }
}

async fn complete(cx: &mut FlowContext<'_>, email: String, password: String) -> BotResult<()> {
    cx.dialogue.reset();

    let request = LoginRequest {
        email,
        password,
        telegram_id: cx.user_id().0,
    };

    // bad credentials are a rejected login, not an expired session
    let auth = cx.api().login(&request).await.map_err(|error| match error {
        ApiError::Auth { message, .. } if message.is_empty() => ApiError::Rejected("Invalid credentials".to_string()),
        ApiError::Auth { message, .. } => ApiError::Rejected(message),
        other => other,
    })?;

    if auth.access_token.is_none() {
        warn!("Login for user {} returned no access token", cx.user_id());
    }

    cx.sessions()
        .update(cx.user_id(), |session| session.apply_login(&request.email, &auth));
    info!("User {} logged in", cx.user_id());

    cx.reply_with(format::login_success(&auth), get_main_menu_keyboard());
    Ok(())
}
