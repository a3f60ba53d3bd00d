// In crates/analytics/src/narrative.rs

use crate::format::fmt_currency;
use core_types::{MarketMetrics, StatusSnapshot, Trade};
use rust_decimal::Decimal;

const WAITING: &str = "En attente des premieres donnees...";
const HIGH_LATENCY_MS: f64 = 5_000.0;

/// Builds the "market mood" paragraph shown next to the badges.
pub fn build_narrative(
    status: Option<&StatusSnapshot>,
    metrics: &MarketMetrics,
    best: Option<&Trade>,
    worst: Option<&Trade>,
) -> String {
    let Some(status) = status else {
        return WAITING.to_string();
    };

    let latest = metrics.latest.as_ref();
    let spread = latest.and_then(|r| r.spread_bp).filter(|v| v.is_finite());
    let imbalance = latest.and_then(|r| r.depth_imbalance).filter(|v| v.is_finite());
    let latency = status.market_latency_ms.unwrap_or(0.0);
    let pnl = status.pnl.unwrap_or_default();

    let mut lines = Vec::new();

    if pnl.abs() < Decimal::ONE {
        lines.push("PnL neutre pour l'instant. Le bot observe et attend une impulsion nette.".to_string());
    } else if pnl > Decimal::ZERO {
        lines.push(format!("PnL positif {} : humeur confiante.", fmt_currency(Some(pnl))));
    } else {
        lines.push(format!("PnL negatif {}. Vigilance recommandee.", fmt_currency(Some(pnl))));
    }

    if let Some(spread) = spread {
        let tone = if spread < 1.0 {
            "tres serres"
        } else if spread < 3.0 {
            "moderes"
        } else {
            "larges"
        };
        lines.push(format!("Spreads {} ({:.2} bp).", tone, spread));
    }

    if let Some(imbalance) = imbalance {
        if imbalance.abs() < 0.1 {
            lines.push("Carnet equilibre, aucune domination nette.".to_string());
        } else {
            let side = if imbalance > 0.0 { "acheteurs" } else { "vendeurs" };
            lines.push(format!("Carnet {} (imbalance {:.0}%).", side, imbalance * 100.0));
        }
    }

    if latency > HIGH_LATENCY_MS {
        lines.push("Latence elevee detectee : fallback Kraken actif.".to_string());
    }

    if let Some(trade) = best {
        lines.push(format!("Meilleur trade: {}.", describe(trade)));
    }
    if let Some(trade) = worst {
        lines.push(format!("Worst trade: {}.", describe(trade)));
    }

    lines.join(" ")
}

fn describe(trade: &Trade) -> String {
    format!(
        "{} a {} ({})",
        trade.action.as_deref().unwrap_or("-"),
        fmt_currency(trade.price),
        fmt_currency(Some(trade.realized_pnl())),
    )
}
