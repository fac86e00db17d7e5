//! Chat texts. Everything here is a pure function of its arguments and
//! returns Telegram HTML; strings coming from the backend are escaped.

mod account;
mod admin;
mod payment;
mod scan;

pub use account::*;
pub use admin::*;
pub use payment::*;
pub use scan::*;

use teloxide::utils::html;

use crate::{error::BotError, service::api::ApiError};

pub const WELCOME_MESSAGE: &str = "🛡️ <b>Welcome to SPL Shield!</b>

I am your Solana risk co-pilot. Run instant token &amp; wallet scans, get AI recommendations, and stay on top of on-chain threats.

<b>🎯 Service Tiers:</b>
💚 <b>Free</b> – 5 scans/day with essential checks
⭐ <b>Premium</b> – Enhanced liquidity &amp; holder analytics (10 TDL per scan)
🚀 <b>MVP</b> – Full AI suite with MEV, rugpull &amp; sentiment analysis (50 TDL per scan)

<b>⚡ Quick Start:</b>
1. /register and verify your email
2. /login to link your account
3. /scan any token or wallet address

Tap the buttons below or type /help for the full command list.";

pub const HELP_MESSAGE: &str = "📚 <b>SPL Shield • Command Guide</b>

<b>👤 User Commands</b>
/start – Welcome message &amp; menu
/help – Display this guide
/register – Create a new account
/login – Sign in after email verification
/logout – Disconnect the bot
/dashboard – Account overview &amp; credits
/scan – Analyze a token or wallet
/history – Show recent scans
/balance – View TDL &amp; credit balances
/upgrade – Tier benefits &amp; instructions
/cancel – Abort the current operation

<b>💳 Payment Commands</b>
/buy_credits – View purchase instructions
/pricing – Tier &amp; credit pricing
/verify_payment &lt;tx&gt; [tier] – Confirm a TDL purchase

<b>🛠️ Admin Commands (admin only)</b>
/admin – High level dashboard
/stats – Credit &amp; usage breakdown
/users – Recent users snapshot
/transactions – Payment activity summary

💡 Pro tips:
• Inline buttons mirror the most common actions
• Risk scores are 0–1 (higher = riskier)
• Premium/MVP scans consume credits or direct TDL";

pub const MAIN_MENU: &str = "🏠 Main Menu";

pub const REGISTER_PROMPT: &str = "📝 <b>Account Registration</b>

Please enter your email address to register:
(We'll send you a verification link)

Example: user@example.com

Type /cancel to abort registration.";

pub const REGISTER_PASSWORD_PROMPT: &str = "✅ Email accepted!\n\n🔒 Now, create a strong password (at least 6 characters):";

pub const REGISTER_USERNAME_PROMPT: &str =
    "✅ Password set!\n\n👤 Finally, choose a username (3-32 letters, digits, <code>_ . -</code>):";

pub const LOGIN_PROMPT: &str = "🔐 <b>Account Login</b>

Please enter your email address:

Example: user@example.com

Type /cancel to abort login.";

pub const LOGIN_PASSWORD_PROMPT: &str = "✅ Email received!\n\n🔒 Now enter your password:";

pub const SCAN_PROMPT: &str = "🔍 <b>Address Scanner</b>

Please enter the Solana address you want to scan:

<b>Supported Types:</b>
• Token Contract Address
• Wallet Address

Example:
<code>EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v</code>

Type /cancel to abort scanning.";

pub const SCAN_TIER_PROMPT: &str = "✅ Address validated!\n\n💎 Select scan tier:";

pub const OPERATION_CANCELLED: &str = "❌ Operation cancelled.";

pub const OPERATION_EXPIRED: &str = "⌛ Your previous operation expired. Please start again.";

pub const LOGOUT_SUCCESS: &str = "✅ You've been logged out successfully.";

pub const ERROR_NOT_LOGGED_IN: &str = "❌ Please login first with /login";

pub const ERROR_SESSION_EXPIRED: &str = "❌ Your session has expired. Please login again with /login";

pub const ERROR_ADMIN_ONLY: &str = "❌ This command is for admins only.";

pub const ERROR_UNAVAILABLE: &str = "❌ Service temporarily unavailable. Please try again later.";

pub const ERROR_GENERIC: &str = "❌ Something went wrong. Please try again later.";

pub const ERROR_INVALID_EMAIL: &str = "❌ Invalid email format. Please try again:";

pub const ERROR_SHORT_PASSWORD: &str = "❌ Password must be at least 6 characters. Try again:";

pub const ERROR_EMPTY_PASSWORD: &str = "❌ Password cannot be empty. Try again:";

pub const ERROR_INVALID_USERNAME: &str =
    "❌ Username must be 3-32 characters of letters, digits, <code>_ . -</code>. Try again:";

pub const ERROR_INVALID_ADDRESS: &str = "❌ Invalid Solana address. Please check and try again.";

pub const ERROR_INVALID_TIER: &str = "❌ Unknown tier. Choose free, premium or mvp:";

pub const UNKNOWN_MESSAGE: &str = "🤔 I didn't understand that. Use /help to see what I can do.";

/// Error text shown when `action` (e.g. "Registration") fails.
pub fn error_message(action: &str, error: &BotError) -> String {
    match error {
        BotError::InputValidation(message) => message.clone(),
        BotError::Authorization(_) => ERROR_ADMIN_ONLY.to_string(),
        BotError::BackendUnavailable(_) => ERROR_UNAVAILABLE.to_string(),
        BotError::BackendRejected(ApiError::Auth { .. }) => ERROR_SESSION_EXPIRED.to_string(),
        BotError::BackendRejected(api) => {
            format!("❌ {} failed: {}", action, html::escape(&api.reason()))
        }
        BotError::DialogueStateError(message) => format!("❌ {}", html::escape(message)),
        BotError::ConfigError(_) | BotError::Other(_) => ERROR_GENERIC.to_string(),
    }
}

pub(crate) fn tdl(amount: f64) -> String {
    format!("{:.2}", amount)
}

pub(crate) fn or_na(value: Option<&str>) -> String {
    value.map(html::escape).unwrap_or_else(|| "N/A".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_by_kind() {
        let unavailable = BotError::from(ApiError::Network("timeout".into()));
        assert_eq!(error_message("Scan", &unavailable), ERROR_UNAVAILABLE);

        let rejected = BotError::from(ApiError::Validation {
            status: 400,
            message: "Email <already> registered".into(),
            fields: vec![],
        });
        assert_eq!(
            error_message("Registration", &rejected),
            "❌ Registration failed: Email &lt;already&gt; registered"
        );

        let auth = BotError::from(ApiError::Auth {
            status: 401,
            message: String::new(),
        });
        assert_eq!(error_message("Dashboard", &auth), ERROR_SESSION_EXPIRED);

        let invalid = BotError::invalid(ERROR_INVALID_EMAIL);
        assert_eq!(error_message("Registration", &invalid), ERROR_INVALID_EMAIL);
    }
}
