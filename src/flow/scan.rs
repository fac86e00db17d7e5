use super::FlowContext;
use crate::{
    error::{BotError, BotResult},
    format,
    handler::{get_cancel_keyboard, get_main_menu_keyboard, get_scan_tier_keyboard},
    service::{
        api::{ScanRequest, Tier},
        dialogue::DialogueState,
        session::UserSession,
    },
    utils::validate_solana_address,
};

pub(super) fn start(cx: &mut FlowContext<'_>) -> BotResult<()> {
    cx.dialogue.update(DialogueState::ScanAddress);
    cx.reply_with(format::SCAN_PROMPT, get_cancel_keyboard());
    Ok(())
}

pub(super) async fn handle_text(cx: &mut FlowContext<'_>, text: &str) -> BotResult<()> {
    let input = text.trim();

    match cx.dialogue.state().clone() {
        DialogueState::ScanAddress => {
            if !validate_solana_address(input) {
                return Err(BotError::invalid(format::ERROR_INVALID_ADDRESS));
            }
            debug!("User {} scanning {}", cx.user_id(), input);
            cx.dialogue.update(DialogueState::ScanTier {
                address: input.to_string(),
            });
            cx.reply_with(format::SCAN_TIER_PROMPT, get_scan_tier_keyboard());
            Ok(())
        }
        DialogueState::ScanTier { address } => {
            let tier = input
                .parse::<Tier>()
                .map_err(|_| BotError::invalid(format::ERROR_INVALID_TIER))?;
            run(cx, address, tier).await
        }
        other => Err(BotError::DialogueStateError(format!(
            "Unexpected scan step {}",
            other
        ))),
    }
}

/// `scan_tier:<tier>` button.
pub(super) async fn handle_tier_choice(cx: &mut FlowContext<'_>, tier: &str) -> BotResult<()> {
    let DialogueState::ScanTier { address } = cx.dialogue.state().clone() else {
        return Err(BotError::DialogueStateError(
            "Address not found. Please try /scan again.".to_string(),
        ));
    };

    let tier = tier
        .parse::<Tier>()
        .map_err(|_| BotError::invalid(format::ERROR_INVALID_TIER))?;
    run(cx, address, tier).await
}

async fn run(cx: &mut FlowContext<'_>, address: String, tier: Tier) -> BotResult<()> {
    cx.dialogue.reset();
    cx.reply(format::scan_processing(&address));

    cx.api().health().await?;

    let request = ScanRequest {
        address,
        tier,
        telegram_id: cx.user_id().0,
    };
    let token = cx.sessions().auth_token(cx.user_id());

    info!("User {} scanning {} ({})", cx.user_id(), request.address, tier.as_str());
    let result = cx.api().scan(&request, token.as_deref()).await?;

    cx.sessions().update(cx.user_id(), UserSession::record_scan);

    cx.reply_with(
        format::scan_result(&request.address, tier, &result),
        get_main_menu_keyboard(),
    );
    Ok(())
}
