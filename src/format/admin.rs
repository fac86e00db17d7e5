use std::fmt::Write;

use teloxide::utils::html;

use super::{or_na, tdl};
use crate::service::api::{AdminStats, AdminUser, DetailedStats, Transaction};

pub const USERS_LIMIT: usize = 20;
pub const TRANSACTIONS_LIMIT: usize = 15;

pub fn admin_overview(stats: &AdminStats) -> String {
    format!(
        "🛡️ <b>SPL Shield Admin Panel</b>\n\n\
         <b>System Stats:</b>\n\
         • Total Users: {}\n\
         • Active Today: {}\n\
         • Total Scans: {}\n\
         • Scans Today: {}\n\n\
         <b>Revenue:</b>\n\
         • Total TDL: {}\n\
         • Today: {}\n\n\
         Use /stats, /users, /transactions for details.",
        stats.total_users,
        stats.active_today,
        stats.total_scans,
        stats.scans_today,
        tdl(stats.total_revenue),
        tdl(stats.revenue_today),
    )
}

pub fn detailed_stats(stats: &DetailedStats) -> String {
    format!(
        "📊 <b>Detailed Statistics</b>\n\n\
         <b>Users by Tier:</b>\n\
         • Free: {}\n\
         • Premium: {}\n\
         • MVP: {}\n\n\
         <b>Scans:</b>\n\
         • Today: {}\n\
         • This Week: {}\n\
         • This Month: {}\n\n\
         <b>System Health:</b>\n\
         • API Status: {}\n\
         • Uptime: {}",
        stats.free_users,
        stats.premium_users,
        stats.mvp_users,
        stats.scans_today,
        stats.scans_week,
        stats.scans_month,
        html::escape(stats.api_status.as_deref().unwrap_or("Unknown")),
        or_na(stats.uptime.as_deref()),
    )
}

pub fn user_list(users: &[AdminUser]) -> String {
    let mut text = String::from("👥 <b>User Management</b>\n\n");
    if users.is_empty() {
        text.push_str("No users found.");
        return text;
    }
    for user in users.iter().take(USERS_LIMIT) {
        let _ = write!(
            text,
            "• {} ({})\n  Tier: {} | Scans: {}\n\n",
            html::escape(&user.username),
            html::escape(&user.email),
            user.tier.label(),
            user.total_scans
        );
    }
    text.trim_end().to_string()
}

pub fn transaction_list(transactions: &[Transaction]) -> String {
    let mut text = String::from("💳 <b>Recent Transactions</b>\n\n");
    if transactions.is_empty() {
        text.push_str("No transactions found.");
        return text;
    }
    for tx in transactions.iter().take(TRANSACTIONS_LIMIT) {
        let _ = write!(
            text,
            "• {} - {} TDL\n  Type: {} | {}\n\n",
            html::escape(&tx.user),
            tdl(tx.amount),
            html::escape(&tx.kind),
            html::escape(&tx.timestamp)
        );
    }
    text.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_are_capped() {
        let users: Vec<AdminUser> = (0..25)
            .map(|i| AdminUser {
                username: format!("user{}", i),
                email: format!("user{}@example.com", i),
                ..Default::default()
            })
            .collect();
        let text = user_list(&users);
        assert_eq!(text.matches("Tier: FREE").count(), USERS_LIMIT);
        assert!(text.contains("user19@example.com"));
        assert!(!text.contains("user20@example.com"));

        let transactions: Vec<Transaction> = (0..20)
            .map(|i| Transaction {
                user: format!("user{}", i),
                amount: 10.0,
                kind: "credits".into(),
                timestamp: "2024-01-01".into(),
            })
            .collect();
        let text = transaction_list(&transactions);
        assert_eq!(text.matches("10.00 TDL").count(), TRANSACTIONS_LIMIT);
    }

    #[test]
    fn test_empty_lists() {
        assert!(user_list(&[]).ends_with("No users found."));
        assert!(transaction_list(&[]).ends_with("No transactions found."));
    }
}
