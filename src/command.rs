use teloxide::{
    adaptors::Throttle,
    macros::BotCommands,
    payloads::SetMyCommandsSetters,
    prelude::Requester,
    types::{BotCommand, BotCommandScope, ChatId, Recipient},
    Bot,
};

use crate::{config::AdminAllowList, error::HandlerResult};

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "SPL Shield commands:")]
pub enum Command {
    #[command(description = "Start the bot")]
    Start,
    #[command(description = "Show help")]
    Help,
    #[command(description = "Create an account")]
    Register,
    #[command(description = "Log in to your account")]
    Login,
    #[command(description = "Log out")]
    Logout,
    #[command(description = "View your dashboard")]
    Dashboard,
    #[command(description = "Scan a token or wallet")]
    Scan,
    #[command(description = "Recent scans")]
    History,
    #[command(description = "TDL balance and credits")]
    Balance,
    #[command(description = "Upgrade your tier")]
    Upgrade,
    #[command(description = "View pricing")]
    Pricing,
    #[command(rename = "buy_credits", description = "Buy scan credits")]
    BuyCredits,
    #[command(
        rename = "verify_payment",
        description = "Verify a payment. Usage: /verify_payment <tx_signature> [premium|mvp]"
    )]
    VerifyPayment(String),
    #[command(description = "Cancel the current operation")]
    Cancel,
    #[command(description = "Admin panel")]
    Admin,
    #[command(description = "Platform statistics")]
    Stats,
    #[command(description = "Recent users")]
    Users,
    #[command(description = "Recent transactions")]
    Transactions,
}

impl Command {
    pub fn is_admin_only(&self) -> bool {
        matches!(
            self,
            Command::Admin | Command::Stats | Command::Users | Command::Transactions
        )
    }

    pub fn user_commands() -> Vec<BotCommand> {
        vec![
            BotCommand::new("start", "Start the bot"),
            BotCommand::new("help", "Show help"),
            BotCommand::new("register", "Create an account"),
            BotCommand::new("login", "Log in to your account"),
            BotCommand::new("logout", "Log out"),
            BotCommand::new("dashboard", "View your dashboard"),
            BotCommand::new("scan", "Scan a token or wallet"),
            BotCommand::new("history", "Recent scans"),
            BotCommand::new("balance", "TDL balance and credits"),
            BotCommand::new("upgrade", "Upgrade your tier"),
            BotCommand::new("pricing", "View pricing"),
            BotCommand::new("buy_credits", "Buy scan credits"),
            BotCommand::new("cancel", "Cancel the current operation"),
        ]
    }

    pub fn admin_commands() -> Vec<BotCommand> {
        let mut commands = Self::user_commands();
        commands.extend([
            BotCommand::new("admin", "Admin panel"),
            BotCommand::new("stats", "Platform statistics"),
            BotCommand::new("users", "Recent users"),
            BotCommand::new("transactions", "Recent transactions"),
        ]);
        commands
    }
}

pub async fn setup_user_commands(bot: &Throttle<Bot>) -> HandlerResult<()> {
    bot.delete_my_commands().await?;
    bot.set_my_commands(Command::user_commands()).await?;
    Ok(())
}

async fn setup_admin_commands(bot: &Throttle<Bot>, chat_id: ChatId) -> HandlerResult<()> {
    bot.set_my_commands(Command::admin_commands())
        .scope(BotCommandScope::Chat {
            chat_id: Recipient::Id(chat_id),
        })
        .await?;
    Ok(())
}

/// Installs the global menu, then the extended one in each admin's private chat.
pub async fn setup_commands(bot: &Throttle<Bot>, admins: &AdminAllowList) -> HandlerResult<()> {
    setup_user_commands(bot).await?;

    for admin in admins.iter() {
        // fails until the admin has opened a chat with the bot
        if let Err(e) = setup_admin_commands(bot, ChatId::from(*admin)).await {
            warn!("Failed to set admin commands for {}: {}", admin, e);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::utils::command::BotCommands as _;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("/start", "splshield_bot").unwrap(), Command::Start);
        assert_eq!(
            Command::parse("/buy_credits", "splshield_bot").unwrap(),
            Command::BuyCredits
        );
        assert_eq!(
            Command::parse("/verify_payment 5abc premium", "splshield_bot").unwrap(),
            Command::VerifyPayment("5abc premium".into())
        );
        assert!(Command::parse("/unknown", "splshield_bot").is_err());
    }

    #[test]
    fn test_admin_only() {
        assert!(Command::Stats.is_admin_only());
        assert!(Command::Transactions.is_admin_only());
        assert!(!Command::Scan.is_admin_only());
        assert!(!Command::Cancel.is_admin_only());

        let user: Vec<_> = Command::user_commands().into_iter().map(|c| c.command).collect();
        assert!(!user.iter().any(|c| c == "stats"));
        assert_eq!(Command::admin_commands().len(), user.len() + 4);
    }
}
