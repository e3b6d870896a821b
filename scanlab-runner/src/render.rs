//! Markdown rendering of a screen report.
//!
//! Pure formatting over the structured [`ScreenReport`] — the engine owns
//! the ordering and partitioning, this module only draws tables.

use scanlab_core::score::ScoreRecord;

use crate::config::ReportMode;
use crate::runner::ScreenReport;

/// Render the full Markdown report: three ranked tables plus a data-quality
/// section when anything was dropped on the way in.
pub fn render_markdown(report: &ScreenReport) -> String {
    let mut md = String::with_capacity(4096);

    let title = match report.mode {
        ReportMode::Daily => "Daily",
        ReportMode::Weekend => "Weekend",
    };
    md.push_str(&format!("# {title} Portfolio Report — {}\n\n", report.as_of));
    md.push_str("> Educational use only. Not financial advice.\n\n");

    push_section(&mut md, "Buy Candidates", &report.ranked.buys);
    push_section(&mut md, "Sell Candidates", &report.ranked.sells);
    push_section(&mut md, "Holds", &report.ranked.holds);

    if report.mode == ReportMode::Weekend {
        md.push_str("## Weekend Rethink Notes\n\n");
        md.push_str("- Tilt the rebalance toward the top scores, but cap any single name at 10%.\n");
        md.push_str("- Rotate out names stuck at low scores unless a near-term catalyst is known.\n");
        md.push_str(
            "- Idea hunt: rising volume plus fresh 20-over-50 crossovers in the last 10 sessions.\n",
        );
        md.push('\n');
    }

    if !report.skipped.is_empty() || report.history_rows_skipped > 0 {
        md.push_str("## Data Quality\n\n");
        if report.history_rows_skipped > 0 {
            md.push_str(&format!(
                "- {} unusable history row(s) dropped at load\n",
                report.history_rows_skipped
            ));
        }
        for skip in &report.skipped {
            md.push_str(&format!("- {} excluded: {}\n", skip.ticker, skip.reason));
        }
        md.push('\n');
    }

    md.push_str(&format!("Dataset hash: `{}`\n", report.dataset_hash));

    md
}

fn push_section(md: &mut String, title: &str, records: &[ScoreRecord]) {
    md.push_str(&format!("## {title} ({})\n\n", records.len()));
    if records.is_empty() {
        md.push_str("_None_\n\n");
        return;
    }

    md.push_str(
        "| ticker | score | close | rsi14 | sma20 | sma50 | ret_5d | volume | avgvol20 | marketCap |\n",
    );
    md.push_str("| --- | ---: | ---: | ---: | ---: | ---: | ---: | ---: | ---: | ---: |\n");
    for rec in records {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} | {} | {} | {} |\n",
            rec.ticker,
            rec.score,
            money(rec.close),
            opt(rec.rsi14, |v| grouped(v, 1)),
            opt(rec.sma20, money),
            opt(rec.sma50, money),
            opt(rec.ret_5d, pct),
            opt(rec.volume, |v| grouped(v, 0)),
            opt(rec.avgvol20, |v| grouped(v, 0)),
            opt(rec.market_cap, |v| format!("${}", grouped(v, 0))),
        ));
    }
    md.push('\n');
}

// ─── Formatting helpers ─────────────────────────────────────────────

fn opt(value: Option<f64>, f: impl Fn(f64) -> String) -> String {
    value.map(f).unwrap_or_else(|| "n/a".to_string())
}

fn money(v: f64) -> String {
    format!("${}", grouped(v, 2))
}

fn pct(v: f64) -> String {
    format!("{}%", grouped(v * 100.0, 1))
}

/// Fixed-point formatting with thousands separators ("1,234,567.8").
fn grouped(v: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, v.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut out = String::new();
    if v.is_sign_negative() && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}
