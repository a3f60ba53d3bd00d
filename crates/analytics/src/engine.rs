// In crates/analytics/src/engine.rs

use crate::narrative::build_narrative;
use crate::types::{
    Badge, Competitor, DerivedView, HoldBaseline, LatencyPoint, LeaderboardEntry, Mood,
    TimelinePoint,
};
use core_types::{Candle, DashboardSnapshot, MarketMetrics, StatusSnapshot, Trade};
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

/// Number of most recent candles shown on the signal timeline.
pub const TIMELINE_WINDOW: usize = 80;
/// A PnL swing of this many dollars reaches full mood intensity.
pub const MOOD_FULL_SCALE: Decimal = dec!(50);
/// Capital assumed for the HODL baseline when the bot does not report one.
pub const DEFAULT_BASELINE_CAPITAL: Decimal = dec!(100);
pub const VETERAN_TRADE_COUNT: u64 = 10;
pub const SNIPER_HIT_RATE: f64 = 0.60;

/// Computes the derived view from a merged snapshot. Holds no state and does no I/O.
#[derive(Default)]
pub struct AnalyticsEngine;

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes every derived field from scratch.
    pub fn derive(&self, snapshot: &DashboardSnapshot) -> DerivedView {
        let status = snapshot.status.as_ref();
        let latest = snapshot.market_metrics.latest.as_ref();

        // 1. Timeline
        let timeline = timeline(&snapshot.candles);

        // 2. Microstructure gauges
        let depth_gauge = latest.and_then(|r| r.depth_imbalance).unwrap_or(0.0);
        let spread_bp = latest.and_then(|r| r.spread_bp);
        let latency_series = latency_series(&snapshot.market_metrics);

        // 3. Mood
        let pnl = status.and_then(|s| s.pnl).unwrap_or_default();
        let (mood, mood_intensity) = mood(pnl);

        // 4. Extremes
        let best_trade = best_trade(&snapshot.trades).cloned();
        let worst_trade = worst_trade(&snapshot.trades).cloned();

        // 5. Buy-and-hold comparison
        let hold_baseline = hold_baseline(&snapshot.candles, status.and_then(|s| s.initial_cash));

        // 6. Badges, leaderboard and narrative
        let badges = status.map(badges).unwrap_or_default();
        let leaderboard = leaderboard(status, hold_baseline.as_ref());
        let narrative = build_narrative(
            status,
            &snapshot.market_metrics,
            best_trade.as_ref(),
            worst_trade.as_ref(),
        );

        DerivedView {
            timeline,
            depth_gauge,
            spread_bp,
            latency_series,
            mood,
            mood_intensity,
            best_trade,
            worst_trade,
            hold_baseline,
            badges,
            leaderboard,
            narrative,
        }
    }
}

/// The last `TIMELINE_WINDOW` candles as (time, signal, close) samples.
pub fn timeline(candles: &[Candle]) -> Vec<TimelinePoint> {
    let start = candles.len().saturating_sub(TIMELINE_WINDOW);
    candles[start..]
        .iter()
        .map(|c| TimelinePoint {
            time: c.t0.clone(),
            signal: c.effective_signal(),
            price: c.close.unwrap_or_default(),
        })
        .collect()
}

pub fn latency_series(metrics: &MarketMetrics) -> Vec<LatencyPoint> {
    metrics
        .history
        .iter()
        .map(|entry| LatencyPoint {
            time: entry.timestamp.clone(),
            value: entry.latency_ms.filter(|v| v.is_finite()).unwrap_or(0.0),
        })
        .collect()
}

/// Mood direction and its intensity in [0, 1].
pub fn mood(pnl: Decimal) -> (Mood, f64) {
    let mood = if pnl >= Decimal::ZERO {
        Mood::Positive
    } else {
        Mood::Negative
    };
    let intensity = (pnl.abs() / MOOD_FULL_SCALE).min(Decimal::ONE);
    (mood, intensity.to_f64().unwrap_or(0.0))
}

/// The trade with the highest realized PnL. Ties keep the earliest trade.
pub fn best_trade(trades: &[Trade]) -> Option<&Trade> {
    trades.iter().fold(None, |best, trade| match best {
        Some(current) if trade.realized_pnl() <= current.realized_pnl() => Some(current),
        _ => Some(trade),
    })
}

/// The trade with the lowest realized PnL. Ties keep the earliest trade.
pub fn worst_trade(trades: &[Trade]) -> Option<&Trade> {
    trades.iter().fold(None, |worst, trade| match worst {
        Some(current) if trade.realized_pnl() >= current.realized_pnl() => Some(current),
        _ => Some(trade),
    })
}

/// Return of buying the first visible candle and holding to the last one.
///
/// Entry is the first open (its close when the open is missing), exit the last
/// close. Returns `None` when either price is missing or zero, or when the
/// return does not fit in a `Decimal`.
pub fn hold_baseline(candles: &[Candle], initial_cash: Option<Decimal>) -> Option<HoldBaseline> {
    let first = candles.first()?;
    let last = candles.last()?;

    let entry = first.open.or(first.close)?;
    let exit = last.close?;
    if entry.is_zero() || exit.is_zero() {
        return None;
    }

    let ratio = exit.checked_div(entry)?.checked_sub(Decimal::ONE)?;
    let capital = initial_cash.unwrap_or(DEFAULT_BASELINE_CAPITAL);
    let pct = ratio.checked_mul(dec!(100))?;
    let pnl = ratio.checked_mul(capital)?;
    Some(HoldBaseline {
        pct: pct.to_f64().unwrap_or(0.0),
        pnl,
    })
}

/// Milestones earned by the current status, in display order.
pub fn badges(status: &StatusSnapshot) -> Vec<Badge> {
    let mut badges = Vec::new();

    let n_trades = status.n_trades.unwrap_or(0);
    if n_trades >= VETERAN_TRADE_COUNT {
        badges.push(Badge {
            label: "Trader aguerri",
            detail: format!("{} trades", n_trades),
        });
    }

    let pnl = status.pnl.unwrap_or_default();
    if pnl > Decimal::ZERO {
        badges.push(Badge {
            label: "PnL positif",
            detail: format!("+{:.2}", pnl),
        });
    }

    let hit_rate = status.hit_rate_last_20.unwrap_or(0.0);
    if hit_rate > SNIPER_HIT_RATE {
        badges.push(Badge {
            label: "Sniper",
            detail: format!("{:.1}% hit", hit_rate * 100.0),
        });
    }

    badges
}

/// The bot against buy-and-hold and doing nothing, best PnL first.
pub fn leaderboard(
    status: Option<&StatusSnapshot>,
    baseline: Option<&HoldBaseline>,
) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = [Competitor::Hold, Competitor::Flat, Competitor::Bot]
        .into_iter()
        .map(|id| {
            let (pnl, pct) = match id {
                Competitor::Hold => baseline
                    .map(|b| (b.pnl, b.pct))
                    .unwrap_or((Decimal::ZERO, 0.0)),
                Competitor::Flat => (Decimal::ZERO, 0.0),
                Competitor::Bot => (
                    status.and_then(|s| s.pnl).unwrap_or_default(),
                    status.and_then(|s| s.pnl_pct).unwrap_or(0.0),
                ),
            };
            LeaderboardEntry {
                id,
                label: id.label(),
                pnl,
                pct,
            }
        })
        .collect();

    // `sort_by` is stable, so ties keep the listing order above.
    entries.sort_by(|a, b| b.pnl.cmp(&a.pnl));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{MarketHistoryEntry, MarketReading, Signal};

    fn candle(open: Option<Decimal>, close: Option<Decimal>) -> Candle {
        Candle {
            open,
            close,
            ..Default::default()
        }
    }

    fn trade(pnl: Decimal, action: &str) -> Trade {
        Trade {
            pnl: Some(pnl),
            action: Some(action.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn mood_clamps_intensity() {
        assert_eq!(mood(dec!(-500)), (Mood::Negative, 1.0));
        assert_eq!(mood(dec!(25)), (Mood::Positive, 0.5));
        assert_eq!(mood(Decimal::ZERO), (Mood::Positive, 0.0));
    }

    #[test]
    fn best_and_worst_keep_first_on_ties() {
        let trades = vec![trade(dec!(5), "first"), trade(dec!(5), "second"), trade(dec!(-3), "third")];
        let best = best_trade(&trades).unwrap();
        assert_eq!(best.action.as_deref(), Some("first"));
        let worst = worst_trade(&trades).unwrap();
        assert_eq!(worst.action.as_deref(), Some("third"));

        let flat = vec![trade(dec!(0), "a"), trade(dec!(0), "b")];
        assert_eq!(worst_trade(&flat).unwrap().action.as_deref(), Some("a"));
        assert!(best_trade(&[]).is_none());
    }

    #[test]
    fn missing_pnl_counts_as_zero() {
        let trades = vec![Trade::default(), trade(dec!(-1), "loss")];
        assert!(best_trade(&trades).unwrap().pnl.is_none());
        assert_eq!(worst_trade(&trades).unwrap().action.as_deref(), Some("loss"));
    }

    #[test]
    fn hold_baseline_uses_first_open_and_last_close() {
        let candles = vec![
            candle(Some(dec!(100)), Some(dec!(101))),
            candle(Some(dec!(101)), Some(dec!(110))),
        ];
        let baseline = hold_baseline(&candles, Some(dec!(1000))).unwrap();
        assert_eq!(baseline.pct, 10.0);
        assert_eq!(baseline.pnl, dec!(100));

        // Unknown capital falls back to 100.
        let baseline = hold_baseline(&candles, None).unwrap();
        assert_eq!(baseline.pnl, dec!(10));
    }

    #[test]
    fn hold_baseline_falls_back_to_close_when_open_is_missing() {
        let candles = vec![candle(None, Some(dec!(50))), candle(None, Some(dec!(55)))];
        let baseline = hold_baseline(&candles, None).unwrap();
        assert_eq!(baseline.pct, 10.0);
    }

    #[test]
    fn hold_baseline_is_unavailable_on_zero_or_missing_prices() {
        assert!(hold_baseline(&[], None).is_none());
        assert!(hold_baseline(&[candle(Some(Decimal::ZERO), Some(Decimal::ZERO))], None).is_none());
        // A zero open is a bad print, not a missing one: no fallback.
        assert!(hold_baseline(&[candle(Some(Decimal::ZERO), Some(dec!(50)))], None).is_none());
        assert!(hold_baseline(&[candle(None, None)], None).is_none());
        assert!(hold_baseline(&[candle(Some(dec!(10)), None)], None).is_none());
    }

    #[test]
    fn hold_baseline_is_unavailable_when_the_return_overflows() {
        let huge = Decimal::from_i128_with_scale(10_i128.pow(27), 0);
        let moon = vec![candle(Some(Decimal::ONE), Some(Decimal::ONE)), candle(None, Some(huge))];
        assert!(hold_baseline(&moon, None).is_none());

        let whale_cash = Decimal::from_i128_with_scale(5 * 10_i128.pow(28), 0);
        let tenfold = vec![candle(Some(dec!(10)), None), candle(None, Some(dec!(100)))];
        assert!(hold_baseline(&tenfold, Some(whale_cash)).is_none());
        assert_eq!(hold_baseline(&tenfold, None).unwrap().pnl, dec!(900));
    }

    #[test]
    fn derive_survives_extreme_prices_and_capital() {
        let whale_cash = Decimal::from_i128_with_scale(5 * 10_i128.pow(28), 0);
        let snapshot = DashboardSnapshot {
            status: Some(StatusSnapshot {
                initial_cash: Some(whale_cash),
                pnl: Some(dec!(3)),
                ..Default::default()
            }),
            candles: vec![candle(Some(dec!(10)), None), candle(None, Some(dec!(100)))],
            ..Default::default()
        };

        let view = AnalyticsEngine::new().derive(&snapshot);
        assert!(view.hold_baseline.is_none());
        let hold = view.leaderboard.iter().find(|e| e.id == Competitor::Hold).unwrap();
        assert_eq!(hold.pnl, Decimal::ZERO);
        assert_eq!(view.leaderboard[0].id, Competitor::Bot);
    }

    #[test]
    fn badges_for_seasoned_and_new_bots() {
        let seasoned = StatusSnapshot {
            n_trades: Some(12),
            pnl: Some(dec!(10.5)),
            hit_rate_last_20: Some(0.65),
            ..Default::default()
        };
        let earned = badges(&seasoned);
        let labels: Vec<_> = earned.iter().map(|b| b.label).collect();
        assert_eq!(labels, vec!["Trader aguerri", "PnL positif", "Sniper"]);
        assert_eq!(earned[0].detail, "12 trades");
        assert_eq!(earned[1].detail, "+10.50");
        assert_eq!(earned[2].detail, "65.0% hit");

        let rookie = StatusSnapshot {
            n_trades: Some(2),
            pnl: Some(dec!(-5)),
            hit_rate_last_20: Some(0.3),
            ..Default::default()
        };
        assert!(badges(&rookie).is_empty());

        let exact = StatusSnapshot {
            hit_rate_last_20: Some(0.60),
            n_trades: Some(10),
            ..Default::default()
        };
        let labels: Vec<_> = badges(&exact).iter().map(|b| b.label).collect();
        assert_eq!(labels, vec!["Trader aguerri"]);
    }

    #[test]
    fn timeline_keeps_last_eighty_candles() {
        let candles: Vec<Candle> = (0..100)
            .map(|i| Candle {
                t0: Some(format!("t{}", i)),
                close: Some(Decimal::from(i)),
                signal_candle: Some(if i % 2 == 0 { Signal::Long } else { Signal::Flat }),
                ..Default::default()
            })
            .collect();
        let points = timeline(&candles);
        assert_eq!(points.len(), TIMELINE_WINDOW);
        assert_eq!(points[0].time.as_deref(), Some("t20"));
        assert_eq!(points[0].signal, Signal::Long);
        assert_eq!(points[79].price, dec!(99));
        assert_eq!(points[79].signal, Signal::Flat);
    }

    #[test]
    fn leaderboard_sorts_by_pnl() {
        let status = StatusSnapshot {
            pnl: Some(dec!(-2)),
            pnl_pct: Some(-2.0),
            ..Default::default()
        };
        let baseline = HoldBaseline { pct: 3.0, pnl: dec!(3) };
        let ids: Vec<_> = leaderboard(Some(&status), Some(&baseline))
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![Competitor::Hold, Competitor::Flat, Competitor::Bot]);

        // All at zero: listing order is preserved.
        let ids: Vec<_> = leaderboard(None, None).into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![Competitor::Hold, Competitor::Flat, Competitor::Bot]);
    }

    #[test]
    fn derive_defaults_on_empty_snapshot() {
        let view = AnalyticsEngine::new().derive(&DashboardSnapshot::default());
        assert!(view.timeline.is_empty());
        assert_eq!(view.depth_gauge, 0.0);
        assert_eq!(view.spread_bp, None);
        assert_eq!(view.mood, Mood::Positive);
        assert_eq!(view.mood_intensity, 0.0);
        assert!(view.best_trade.is_none());
        assert!(view.hold_baseline.is_none());
        assert!(view.badges.is_empty());
        assert_eq!(view.narrative, "En attente des premieres donnees...");
    }

    #[test]
    fn derive_reads_latest_market_reading() {
        let snapshot = DashboardSnapshot {
            market_metrics: MarketMetrics {
                latest: Some(MarketReading {
                    depth_imbalance: Some(-0.4),
                    spread_bp: Some(2.5),
                    ..Default::default()
                }),
                history: vec![
                    MarketHistoryEntry {
                        timestamp: Some("a".into()),
                        latency_ms: Some(12.0),
                        ..Default::default()
                    },
                    MarketHistoryEntry::default(),
                ],
                volatility: None,
            },
            ..Default::default()
        };
        let view = AnalyticsEngine::new().derive(&snapshot);
        assert_eq!(view.depth_gauge, -0.4);
        assert_eq!(view.spread_bp, Some(2.5));
        assert_eq!(view.latency_series.len(), 2);
        assert_eq!(view.latency_series[0].value, 12.0);
        assert_eq!(view.latency_series[1].value, 0.0);
    }
}
