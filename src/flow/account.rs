use super::FlowContext;
use crate::{error::BotResult, format, handler::get_main_menu_keyboard};

pub(super) fn start(cx: &mut FlowContext<'_>) -> BotResult<()> {
    cx.sessions().get_or_create(cx.user_id());
    cx.reply_with(format::WELCOME_MESSAGE, get_main_menu_keyboard());
    Ok(())
}

pub(super) fn help(cx: &mut FlowContext<'_>) -> BotResult<()> {
    cx.reply(format::HELP_MESSAGE);
    Ok(())
}

pub(super) async fn logout(cx: &mut FlowContext<'_>) -> BotResult<()> {
    let token = cx.sessions().auth_token(cx.user_id());

    if let Err(e) = cx.api().logout(cx.user_id(), token.as_deref()).await {
        warn!("Backend logout for user {} failed: {}", cx.user_id(), e);
    }
    cx.sessions().remove(cx.user_id());
    info!("User {} logged out", cx.user_id());

    cx.reply(format::LOGOUT_SUCCESS);
    Ok(())
}

pub(super) async fn dashboard(cx: &mut FlowContext<'_>) -> BotResult<()> {
    let Some(token) = cx.require_token() else {
        return Ok(());
    };

    let data = cx.api().dashboard(&token).await?;
    let session = cx.sessions().update(cx.user_id(), |session| {
        session.tier = data.tier;
        session.scans_today = data.scans_today;
        session.total_scans = data.total_scans;
        session.tdl_balance = data.tdl_balance;
        if data.username.is_some() {
            session.username = data.username.clone();
        }
    });

    cx.reply(format::dashboard(&data, &session));
    Ok(())
}

pub(super) async fn balance(cx: &mut FlowContext<'_>) -> BotResult<()> {
    let Some(token) = cx.require_token() else {
        return Ok(());
    };

    let data = cx.api().balance(&token).await?;
    cx.sessions().update(cx.user_id(), |session| {
        session.tier = data.tier;
        session.tdl_balance = data.tdl_balance;
    });

    cx.reply(format::balance(&data));
    Ok(())
}

pub(super) async fn history(cx: &mut FlowContext<'_>) -> BotResult<()> {
    let Some(token) = cx.require_token() else {
        return Ok(());
    };

    let entries = cx.api().scan_history(cx.user_id(), &token).await?;
    cx.reply(format::scan_history(&entries));
    Ok(())
}
