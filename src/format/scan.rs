use std::fmt::Write;

use teloxide::utils::html;

use crate::{
    service::api::{ScanHistoryEntry, ScanResult, Tier},
    utils::shorten_address,
};

pub const HISTORY_LIMIT: usize = 10;

pub fn risk_label(score: f64) -> &'static str {
    if score < 0.25 {
        "🟢 LOW"
    } else if score < 0.5 {
        "🟡 MEDIUM"
    } else if score < 0.75 {
        "🟠 HIGH"
    } else {
        "🔴 CRITICAL"
    }
}

pub fn scan_processing(address: &str) -> String {
    format!(
        "⏳ <b>Analyzing Address...</b>\n\nPlease wait while we analyze:\n<code>{}</code>\n\n\
         Premium/MVP tiers may take a few extra seconds while we gather AI insights.",
        html::escape(address)
    )
}

fn bullet_list(items: &[String], empty: &str) -> String {
    if items.is_empty() {
        return empty.to_string();
    }
    items
        .iter()
        .map(|item| format!("• {}", html::escape(item)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn scan_result(address: &str, requested: Tier, result: &ScanResult) -> String {
    let score = result.normalized_score();
    let tier = result.tier_used.unwrap_or(requested);
    let kind = result.kind.as_deref().unwrap_or("Unknown");
    let level = result.risk_level.as_deref().unwrap_or("UNKNOWN");

    format!(
        "📊 <b>Scan Results</b>\n\n\
         <b>Address:</b> <code>{address}</code>\n\
         <b>Type &amp; Tier:</b> {kind} ({tier})\n\
         <b>Risk Score:</b> {score:.2} / 1.0 {label}\n\
         <b>Risk Level:</b> {level}\n\n\
         <b>🔍 Analysis</b>\n{summary}\n\n\
         <b>⚠️ Risk Factors</b>\n{factors}\n\n\
         <b>✅ Positive Signals</b>\n{signals}\n\n\
         <b>🤖 AI Insight</b>\n{ai}\n\n\
         <b>📈 Recommendation</b>\n{recommendation}",
        address = html::escape(&shorten_address(address)),
        kind = html::escape(kind),
        tier = tier.label(),
        score = score,
        label = risk_label(score),
        level = html::escape(level),
        summary = html::escape(result.message.as_deref().unwrap_or("Analysis complete.")),
        factors = bullet_list(&result.risk_factors, "None detected"),
        signals = bullet_list(&result.safe_indicators, "None found"),
        ai = html::escape(result.ai_summary.as_deref().unwrap_or("No AI insights available")),
        recommendation = html::escape(result.recommendation.as_deref().unwrap_or("Proceed with caution")),
    )
}

pub fn scan_history(entries: &[ScanHistoryEntry]) -> String {
    if entries.is_empty() {
        return "📭 No scan history found.".to_string();
    }

    let mut text = String::from("📜 <b>Your Recent Scans</b>\n\n");
    for (idx, entry) in entries.iter().take(HISTORY_LIMIT).enumerate() {
        let score = entry
            .risk_score
            .map(|s| format!("{:.2}", s))
            .unwrap_or_else(|| "N/A".to_string());
        let _ = write!(
            text,
            "{}. <code>{}</code>\n   Tier: {} | Risk: {} ({})\n   {}\n\n",
            idx + 1,
            html::escape(&shorten_address(&entry.address)),
            entry.tier.label(),
            score,
            html::escape(entry.risk_level.as_deref().unwrap_or("UNKNOWN")),
            html::escape(entry.created_at.as_deref().unwrap_or("N/A")),
        );
    }
    text.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDRESS: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

    #[test]
    fn test_risk_label_boundaries() {
        assert_eq!(risk_label(0.0), "🟢 LOW");
        assert_eq!(risk_label(0.2499), "🟢 LOW");
        assert_eq!(risk_label(0.25), "🟡 MEDIUM");
        assert_eq!(risk_label(0.5), "🟠 HIGH");
        assert_eq!(risk_label(0.75), "🔴 CRITICAL");
        assert_eq!(risk_label(1.0), "🔴 CRITICAL");
    }

    #[test]
    fn test_scan_result_is_deterministic() {
        let result = ScanResult {
            risk_score: 0.42,
            risk_level: Some("MEDIUM".into()),
            kind: Some("Token".into()),
            risk_factors: vec!["Mint authority <enabled>".into()],
            ..Default::default()
        };

        let first = scan_result(ADDRESS, Tier::Premium, &result);
        let second = scan_result(ADDRESS, Tier::Premium, &result);
        assert_eq!(first, second);

        assert!(first.contains("<code>EPjFWdd5...ZwyTDt1v</code>"));
        assert!(first.contains("Token (PREMIUM)"));
        assert!(first.contains("0.42 / 1.0 🟡 MEDIUM"));
        assert!(first.contains("• Mint authority &lt;enabled&gt;"));
        assert!(first.contains("None found"));
    }

    #[test]
    fn test_history_is_capped() {
        let entries: Vec<ScanHistoryEntry> = (0..15)
            .map(|i| ScanHistoryEntry {
                address: format!("{}{}", ADDRESS, i),
                risk_score: Some(0.1),
                ..Default::default()
            })
            .collect();

        let text = scan_history(&entries);
        assert!(text.contains("10. "));
        assert!(!text.contains("11. "));
        assert_eq!(scan_history(&[]), "📭 No scan history found.");
    }
}
