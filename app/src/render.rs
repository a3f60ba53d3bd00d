// In app/src/render.rs

use analytics::format::{fmt_book_price, fmt_book_qty, fmt_currency, fmt_latency, fmt_percent};
use analytics::{Mood, SignalEvent};
use app_config::UiPreferences;
use core_types::Signal;
use events::ViewModel;
use std::fmt::Write;

const BOOK_ROWS: usize = 5;

/// Plain-text dashboard for one view model.
pub fn render_view(view: &ViewModel, prefs: &UiPreferences) -> String {
    let mut out = String::new();
    let status = view.snapshot.status.as_ref();
    let derived = &view.derived;

    // --- Header ---
    let pair = status.and_then(|s| s.pair.as_deref()).unwrap_or("--");
    let feed = status.and_then(|s| s.feed_status.as_deref()).unwrap_or("--");
    let _ = writeln!(
        out,
        "[#{}] {} | feed {} | {}",
        view.cycle,
        pair,
        feed,
        view.updated_at.format("%H:%M:%S")
    );
    if let Some(error) = view.error() {
        let _ = writeln!(out, "  ! stale data: {}", error);
    }

    // --- Portfolio ---
    let _ = writeln!(
        out,
        "  equity {} | pnl {} ({}) | price {} | latency {}",
        fmt_currency(status.and_then(|s| s.equity)),
        fmt_currency(status.and_then(|s| s.pnl)),
        fmt_percent(status.and_then(|s| s.pnl_pct), 2),
        fmt_currency(status.and_then(|s| s.last_price)),
        fmt_latency(status.and_then(|s| s.market_latency_ms)),
    );
    let mood = match derived.mood {
        Mood::Positive => "positive",
        Mood::Negative => "negative",
    };
    let _ = writeln!(
        out,
        "  mood {} {:.0}% | spread {} bp | depth gauge {:+.2}",
        mood,
        derived.mood_intensity * 100.0,
        derived
            .spread_bp
            .map(|v| format!("{:.2}", v))
            .unwrap_or_else(|| "--".into()),
        derived.depth_gauge,
    );
    if let Some(event) = &view.signal_event {
        let _ = writeln!(out, "  last signal {}", describe_signal(event));
    }

    if prefs.focus_mode {
        return out;
    }

    // --- Leaderboard and badges ---
    for (rank, entry) in derived.leaderboard.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}. {:<14} {:>12} {:>9}",
            rank + 1,
            entry.label,
            fmt_currency(Some(entry.pnl)),
            fmt_percent(Some(entry.pct), 2),
        );
    }
    if !derived.badges.is_empty() {
        let badges: Vec<String> = derived
            .badges
            .iter()
            .map(|b| format!("{} ({})", b.label, b.detail))
            .collect();
        let _ = writeln!(out, "  badges: {}", badges.join(", "));
    }

    // --- Order book ---
    if !prefs.text_only {
        let book = &view.snapshot.orderbook;
        for i in 0..BOOK_ROWS.min(book.bids.len().max(book.asks.len())) {
            let bid = book.bids.get(i);
            let ask = book.asks.get(i);
            let _ = writeln!(
                out,
                "  {:>14} {:>12} | {:<12} {:<14}",
                fmt_book_qty(bid.map(|l| l.qty)),
                fmt_book_price(bid.map(|l| l.price)),
                fmt_book_price(ask.map(|l| l.price)),
                fmt_book_qty(ask.map(|l| l.qty)),
            );
        }
    }

    let _ = writeln!(out, "  {}", derived.narrative);
    out
}

pub fn describe_signal(event: &SignalEvent) -> String {
    let side = match event.signal {
        Signal::Long => "LONG",
        Signal::Short => "SHORT",
        Signal::Flat => "FLAT",
    };
    format!("{} at {}", side, event.time.as_deref().unwrap_or("--"))
}
