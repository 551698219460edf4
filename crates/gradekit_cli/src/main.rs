//! `gradekit` v1:
//! Scan a class grade card, print risky courses, append flagged students to
//! the summary workbook.
//!
//! - `settings` : file/env configuration
//! - `run`      : the end-to-end pipeline
mod run;
mod settings;

use std::io;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use crate::run::run;
use crate::settings::load_run_config;

fn init_tracing() {
    // Logs go to stderr; stdout carries the diagnostic listing.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let cfg = load_run_config()?;
    tracing::debug!(?cfg, "loaded configuration");

    let mut out = io::stdout().lock();
    let report = run(&cfg, &mut out)?;
    if report.cnt_rows_appended == 0 {
        tracing::info!(
            cnt_students = report.cnt_students,
            cnt_diagnostics = report.cnt_diagnostics,
            "no student flagged, summary rewritten unchanged"
        );
    }
    Ok(())
}
