use super::FlowContext;
use crate::{
    error::BotResult,
    format::{self, TRANSACTIONS_LIMIT, USERS_LIMIT},
};

// Reachable only through `dispatch`, which has already checked the allow-list.

pub(super) async fn overview(cx: &mut FlowContext<'_>) -> BotResult<()> {
    let token = cx.sessions().auth_token(cx.user_id());
    let stats = cx.api().admin_stats(token.as_deref()).await?;
    cx.reply(format::admin_overview(&stats));
    Ok(())
}

pub(super) async fn detailed_stats(cx: &mut FlowContext<'_>) -> BotResult<()> {
    let token = cx.sessions().auth_token(cx.user_id());
    let stats = cx.api().detailed_stats(token.as_deref()).await?;
    cx.reply(format::detailed_stats(&stats));
    Ok(())
}

pub(super) async fn users(cx: &mut FlowContext<'_>) -> BotResult<()> {
    let token = cx.sessions().auth_token(cx.user_id());
    let users = cx.api().admin_users(USERS_LIMIT, token.as_deref()).await?;
    cx.reply(format::user_list(&users));
    Ok(())
}

pub(super) async fn transactions(cx: &mut FlowContext<'_>) -> BotResult<()> {
    let token = cx.sessions().auth_token(cx.user_id());
    let transactions = cx
        .api()
        .admin_transactions(TRANSACTIONS_LIMIT, token.as_deref())
        .await?;
    cx.reply(format::transaction_list(&transactions));
    Ok(())
}
