use super::FlowContext;
use crate::{
    error::{BotError, BotResult},
    format,
    handler::get_payment_keyboard,
    service::api::{PaymentVerification, Tier},
    utils::validate_tx_signature,
};

fn treasury_wallet<'a>(cx: &'a FlowContext<'_>) -> Option<&'a str> {
    cx.app.config.payment.treasury_wallet.as_deref()
}

pub(super) fn pricing(cx: &mut FlowContext<'_>) -> BotResult<()> {
    cx.reply(format::PRICING_MESSAGE);
    Ok(())
}

pub(super) fn upgrade(cx: &mut FlowContext<'_>) -> BotResult<()> {
    cx.reply_with(format::UPGRADE_MESSAGE, get_payment_keyboard());
    Ok(())
}

pub(super) fn buy_credits(cx: &mut FlowContext<'_>) -> BotResult<()> {
    let text = format::buy_credits(treasury_wallet(cx));
    cx.reply_with(text, get_payment_keyboard());
    Ok(())
}

/// `buy:<credits>` button.
pub(super) fn handle_package(cx: &mut FlowContext<'_>, credits: &str) -> BotResult<()> {
    let (credits, price) = credits
        .parse::<u64>()
        .ok()
        .and_then(|credits| format::package_price(credits).map(|price| (credits, price)))
        .ok_or_else(|| BotError::invalid("❌ Unknown credit package."))?;

    let text = format::package_instructions(credits, price, treasury_wallet(cx));
    cx.reply(text);
    Ok(())
}

/// `/verify_payment <tx_signature> [premium|mvp]`
pub(super) async fn verify_payment(cx: &mut FlowContext<'_>, args: &str) -> BotResult<()> {
    let mut parts = args.split_whitespace();
    let Some(signature) = parts.next() else {
        cx.reply(format::VERIFY_PAYMENT_USAGE);
        return Ok(());
    };

    if !validate_tx_signature(signature) {
        return Err(BotError::invalid(format::ERROR_INVALID_SIGNATURE));
    }

    let tier = parts
        .next()
        .map(|raw| raw.parse::<Tier>())
        .transpose()
        .map_err(|_| BotError::invalid(format::ERROR_INVALID_TIER))?;

    let request = PaymentVerification {
        tx_signature: signature.to_string(),
        tier,
        telegram_id: cx.user_id().0,
    };
    let token = cx.sessions().auth_token(cx.user_id());

    let receipt = cx.api().verify_payment(&request, token.as_deref()).await?;
    info!("Payment {} verified for user {}", signature, cx.user_id());

    if let Some(tier) = receipt.tier {
        cx.sessions().update(cx.user_id(), |session| session.tier = tier);
    }

    cx.reply(format::payment_verified(&receipt));
    Ok(())
}
