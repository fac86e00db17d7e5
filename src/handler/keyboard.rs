use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::{format::CREDIT_PACKAGES, service::api::Tier};

pub fn get_main_menu_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([
        [
            InlineKeyboardButton::callback("🔍 Scan", "scan"),
            InlineKeyboardButton::callback("📊 Dashboard", "dashboard"),
        ],
        [
            InlineKeyboardButton::callback("💰 Balance", "balance"),
            InlineKeyboardButton::callback("📜 History", "history"),
        ],
        [
            InlineKeyboardButton::callback("💎 Upgrade", "upgrade"),
            InlineKeyboardButton::callback("❓ Help", "show_help"),
        ],
    ])
}

fn cancel_button() -> InlineKeyboardButton {
    InlineKeyboardButton::callback("❌ Cancel", "cancel")
}

pub fn get_cancel_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([[cancel_button()]])
}

pub fn get_scan_tier_keyboard() -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = Tier::ALL
        .iter()
        .map(|tier| {
            let text = match tier {
                Tier::Free => "💚 FREE (Basic)",
                Tier::Premium => "⭐ PREMIUM (Advanced)",
                Tier::Mvp => "🚀 MVP (Unlimited)",
            };
            vec![InlineKeyboardButton::callback(
                text,
                format!("scan_tier:{}", tier.as_str()),
            )]
        })
        .collect();
    rows.push(vec![cancel_button()]);

    InlineKeyboardMarkup::new(rows)
}

pub fn get_payment_keyboard() -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = CREDIT_PACKAGES
        .iter()
        .map(|(credits, price)| {
            vec![InlineKeyboardButton::callback(
                format!("{} Credits - {} TDL", credits, price),
                format!("buy:{}", credits),
            )]
        })
        .collect();
    rows.push(vec![cancel_button()]);

    InlineKeyboardMarkup::new(rows)
}
