use teloxide::utils::html;

use super::tdl;
use crate::service::api::PaymentReceipt;

/// Credit packages offered by `/buy_credits`: (credits, price in TDL).
pub const CREDIT_PACKAGES: [(u64, u64); 3] = [(10, 10), (50, 45), (100, 80)];

pub const PRICING_MESSAGE: &str = "💎 <b>SPL Shield Pricing</b>

<b>Scan Tiers</b>
💚 Free – 5 scans/day, core risk checks (uses daily quota)
⭐ Premium – Advanced liquidity &amp; holder analytics (10 TDL per scan)
🚀 MVP – Full AI insights, MEV &amp; rugpull detection (50 TDL per scan)

<b>How to Pay</b>
1. Send TDL to the treasury wallet (see /buy_credits)
2. Use <code>/verify_payment &lt;tx_signature&gt; [premium|mvp]</code>
3. Start scanning with the desired tier

Free credits reset daily. Premium/MVP credits never expire until used.";

pub const UPGRADE_MESSAGE: &str = "⬆️ <b>Upgrade Your Tier</b>

<b>Available Upgrades:</b>

⭐ <b>PREMIUM</b> - 50 TDL/month
• 50 scans per day
• Advanced AI insights
• Priority support

🚀 <b>MVP</b> - 200 TDL/month
• Unlimited scans
• Real-time monitoring
• API access
• Dedicated support

To upgrade, use /buy_credits first.";

pub const VERIFY_PAYMENT_USAGE: &str =
    "ℹ️ Usage: <code>/verify_payment &lt;tx_signature&gt; [premium|mvp]</code>";

pub const ERROR_INVALID_SIGNATURE: &str = "❌ That doesn't look like a Solana transaction signature.";

fn wallet_line(treasury_wallet: Option<&str>) -> String {
    match treasury_wallet {
        Some(wallet) => format!("Send TDL to: <code>{}</code>", html::escape(wallet)),
        None => "Send TDL to the treasury wallet shown in the web dashboard.".to_string(),
    }
}

pub fn package_price(credits: u64) -> Option<u64> {
    CREDIT_PACKAGES
        .iter()
        .find(|(amount, _)| *amount == credits)
        .map(|(_, price)| *price)
}

pub fn buy_credits(treasury_wallet: Option<&str>) -> String {
    let packages = CREDIT_PACKAGES
        .iter()
        .map(|(credits, price)| {
            let discount = 100 - price * 100 / credits;
            if discount > 0 {
                format!("• {} Credits = {} TDL ({}% off)", credits, price, discount)
            } else {
                format!("• {} Credits = {} TDL", credits, price)
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "💳 <b>Purchase Credits</b>\n\n\
         <b>Available Packages:</b>\n{}\n\n\
         {}\n\n\
         After payment, use /verify_payment with the transaction signature.",
        packages,
        wallet_line(treasury_wallet)
    )
}

pub fn package_instructions(credits: u64, price: u64, treasury_wallet: Option<&str>) -> String {
    format!(
        "🛒 <b>{} Credits Package</b>\n\n\
         1. Send exactly <b>{} TDL</b>\n\
         2. {}\n\
         3. Run <code>/verify_payment &lt;tx_signature&gt;</code>",
        credits,
        price,
        wallet_line(treasury_wallet)
    )
}

pub fn payment_verified(receipt: &PaymentReceipt) -> String {
    let mut lines = vec!["✅ <b>Payment verified!</b>".to_string(), String::new()];
    if let Some(credits) = receipt.credits_added {
        lines.push(format!("• Credits added: {}", credits));
    }
    if let Some(tier) = receipt.tier {
        lines.push(format!("• Tier: {}", tier.label()));
    }
    if let Some(amount) = receipt.amount {
        lines.push(format!("• Amount: {} TDL", tdl(amount)));
    }
    if let Some(message) = &receipt.message {
        lines.push(String::new());
        lines.push(html::escape(message));
    }
    lines.join("\n")
}
