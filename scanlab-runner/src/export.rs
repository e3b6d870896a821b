//! Persistence — JSON manifest, audit CSV, and Markdown artifacts.
//!
//! The scored CSV is the full audit trail: every indicator, quote field,
//! gate, score, and flag for every ticker, not just the classification.
//! Persisted output is never read back as an input to a later run — the
//! manifest exists for reproducibility checks, not state.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use scanlab_core::score::ScoreRecord;

use crate::render::render_markdown;
use crate::runner::{ScreenReport, SCHEMA_VERSION};

// ─── JSON manifest ──────────────────────────────────────────────────

/// Serialize a `ScreenReport` to pretty JSON.
pub fn export_json(report: &ScreenReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize ScreenReport to JSON")
}

/// Deserialize a `ScreenReport`, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<ScreenReport> {
    let report: ScreenReport =
        serde_json::from_str(json).context("failed to deserialize ScreenReport from JSON")?;
    if report.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            report.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(report)
}

// ─── Audit CSV ──────────────────────────────────────────────────────

/// Export the audit table as CSV, one row per scored ticker.
///
/// Undefined numerics serialize as empty cells; floats use Rust's shortest
/// round-trippable formatting so re-running identical inputs produces a
/// byte-identical file.
pub fn export_scored_csv(records: &[ScoreRecord]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "ticker",
        "date",
        "close",
        "ret_5d",
        "sma20",
        "sma50",
        "avgvol20",
        "rsi14",
        "rolling_max_10",
        "drawdown_10",
        "price",
        "volume",
        "market_cap",
        "is_microcap",
        "valid_liquidity",
        "price_gate",
        "score",
        "signal",
    ])?;

    for rec in records {
        wtr.write_record([
            rec.ticker.as_str(),
            &rec.date.to_string(),
            &rec.close.to_string(),
            &opt_cell(rec.ret_5d),
            &opt_cell(rec.sma20),
            &opt_cell(rec.sma50),
            &opt_cell(rec.avgvol20),
            &opt_cell(rec.rsi14),
            &opt_cell(rec.rolling_max_10),
            &opt_cell(rec.drawdown_10),
            &opt_cell(rec.price),
            &opt_cell(rec.volume),
            &opt_cell(rec.market_cap),
            &rec.is_microcap.to_string(),
            &rec.valid_liquidity.to_string(),
            &rec.price_gate.to_string(),
            &rec.score.to_string(),
            &rec.signal.to_string(),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

fn opt_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Paths written by [`save_artifacts`].
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub scored_csv: PathBuf,
    pub report_md: PathBuf,
    pub latest_report: PathBuf,
    pub manifest: PathBuf,
}

/// Save the full artifact set for one screen run under `output_dir`:
/// `{date}_scored.csv`, `{date}_{mode}_report.md`, a refreshed
/// `latest_report.md` pointer, and `manifest.json`.
pub fn save_artifacts(report: &ScreenReport, output_dir: &Path) -> Result<ArtifactPaths> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output dir: {}", output_dir.display()))?;

    let scored_csv = output_dir.join(format!("{}_scored.csv", report.as_of));
    std::fs::write(&scored_csv, export_scored_csv(&report.records)?)?;

    let md = render_markdown(report);
    let report_md = output_dir.join(format!("{}_{}_report.md", report.as_of, report.mode));
    std::fs::write(&report_md, &md)?;

    let latest_report = output_dir.join("latest_report.md");
    std::fs::write(&latest_report, &md)?;

    let manifest = output_dir.join("manifest.json");
    std::fs::write(&manifest, export_json(report)?)?;

    Ok(ArtifactPaths {
        scored_csv,
        report_md,
        latest_report,
        manifest,
    })
}

/// Load a `ScreenReport` back from an output directory's manifest.
pub fn load_manifest(dir: &Path) -> Result<ScreenReport> {
    let manifest_path = dir.join("manifest.json");
    let json = std::fs::read_to_string(&manifest_path)
        .with_context(|| format!("failed to read {}", manifest_path.display()))?;
    import_json(&json)
}
