//! ScanLab Runner — orchestration around the core engine.
//!
//! Loads the watchlist/history/snapshot CSVs, fans the screen out across
//! the rayon pool, and persists the artifact bundle (audit CSV, Markdown
//! report, schema-versioned JSON manifest).

pub mod config;
pub mod export;
pub mod loader;
pub mod render;
pub mod runner;

pub use config::{ConfigError, DataConfig, JobConfig, ReportConfig, ReportMode};
pub use export::{load_manifest, save_artifacts, ArtifactPaths};
pub use loader::{LoadError, dataset_hash, load_history, load_snapshot, load_watchlist};
pub use render::render_markdown;
pub use runner::{run_screen_job, run_screen_job_as_of, ScreenReport, SCHEMA_VERSION};
