use teloxide::utils::html;

use super::{or_na, tdl};
use crate::service::{
    api::{AuthResponse, BalanceData, Credits, DashboardData, Tier},
    session::UserSession,
};

pub fn tier_benefits(tier: Tier) -> &'static str {
    match tier {
        Tier::Free => "• 5 scans/day\n• Basic analysis",
        Tier::Premium => "• 50 scans/day\n• Advanced AI insights",
        Tier::Mvp => "• Unlimited scans\n• Real-time monitoring",
    }
}

fn credit_lines(credits: &Credits) -> String {
    format!(
        "• Free: {}\n• Premium: {}\n• MVP: {}",
        credits.free, credits.premium, credits.mvp
    )
}

pub fn register_success(username: &str, email: &str) -> String {
    format!(
        "✅ <b>Registration Submitted!</b>\n\n\
         Welcome aboard, {}!\n\
         We just sent a verification email to <b>{}</b>.\n\n\
         <b>Next Steps:</b>\n\
         1. Open the email and click the verification link\n\
         2. Return here and use /login\n\
         3. Start scanning with /scan\n\n\
         Email verification is required before logging in.",
        html::escape(username),
        html::escape(email)
    )
}

pub fn login_success(auth: &AuthResponse) -> String {
    let user = &auth.user;
    format!(
        "✅ <b>Login Successful!</b>\n\n\
         Welcome back, {}!\n\n\
         • Tier: {}\n\
         • Free credits remaining: {}\n\
         • Premium credits: {}\n\
         • MVP credits: {}\n\
         • TDL balance: {}\n\n\
         Use /scan to analyze a new address or /dashboard for a full overview.",
        html::escape(user.username.as_deref().unwrap_or("User")),
        user.tier.label(),
        user.scans_remaining.unwrap_or(user.credits.free),
        user.credits.premium,
        user.credits.mvp,
        tdl(user.tdl_balance),
    )
}

pub fn dashboard(data: &DashboardData, session: &UserSession) -> String {
    let email = data.email.as_deref().or(session.email.as_deref());
    let username = data.username.as_deref().or(session.username.as_deref());

    format!(
        "📊 <b>Your Dashboard</b>\n\n\
         <b>Account</b>\n\
         • Email: {}\n\
         • Username: {}\n\
         • Tier: {}\n\
         • Member since: {}\n\n\
         <b>Credits</b>\n{}\n\
         • TDL balance: {}\n\n\
         <b>Usage</b>\n\
         • Scans today: {}\n\
         • Daily limit: {}\n\
         • Total scans: {}\n\n\
         <b>Benefits</b>\n{}\n\n\
         Need more power? Use /upgrade or /pricing.",
        or_na(email),
        or_na(username),
        data.tier.label(),
        or_na(data.created_at.as_deref()),
        credit_lines(&data.credits),
        tdl(data.tdl_balance),
        data.scans_today,
        data.daily_limit
            .map(|l| l.to_string())
            .unwrap_or_else(|| "Unlimited".to_string()),
        data.total_scans,
        tier_benefits(data.tier),
    )
}

pub fn balance(data: &BalanceData) -> String {
    format!(
        "💰 <b>Your TDL Balance</b>\n\n\
         Balance: {} TDL\n\
         Tier: {}\n\n\
         <b>Credits</b>\n{}\n\n\
         Use /buy_credits to add more TDL!",
        tdl(data.tdl_balance),
        data.tier.label(),
        credit_lines(&data.credits),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::UserId;

    #[test]
    fn test_dashboard_falls_back_to_session() {
        let mut session = UserSession::new(UserId(1));
        session.email = Some("user@example.com".into());

        let data = DashboardData {
            tier: Tier::Mvp,
            tdl_balance: 12.5,
            daily_limit: None,
            ..Default::default()
        };

        let text = dashboard(&data, &session);
        assert!(text.contains("• Email: user@example.com"));
        assert!(text.contains("• Username: N/A"));
        assert!(text.contains("• Tier: MVP"));
        assert!(text.contains("• TDL balance: 12.50"));
        assert!(text.contains("• Daily limit: Unlimited"));
        assert!(text.contains("Unlimited scans"));
    }

    #[test]
    fn test_register_success_escapes() {
        let text = register_success("<b>", "user@example.com");
        assert!(text.contains("Welcome aboard, &lt;b&gt;!"));
        assert!(text.contains("<b>user@example.com</b>"));
    }
}
