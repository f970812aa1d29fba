use anyhow::Result;
use refdrugs::{
    config::Config, fetch::HttpSource, logging, output, pdf::LopdfTableReader,
    pipeline::Pipeline, report,
};
use std::{env, path::PathBuf, time::Instant};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    logging::init();
    info!("startup");

    // ─── 2) configuration ────────────────────────────────────────────
    let cfg_path = env::args()
        .nth(1)
        .or_else(|| env::var("REFDRUGS_CONFIG").ok())
        .map(PathBuf::from);
    let cfg = Config::load(cfg_path.as_deref())?;
    info!(base_url = %cfg.base_url, output_dir = %cfg.output_dir.display(), "configured");

    // ─── 3) run every category ───────────────────────────────────────
    let start = Instant::now();
    let pipeline = Pipeline::new(HttpSource::new(&cfg)?, LopdfTableReader, cfg.classifier());
    let out = pipeline.run().await;

    // ─── 4) persist ──────────────────────────────────────────────────
    let written = output::write_outputs(&cfg.output_dir, &out)?;
    let report_path = report::write_report(&cfg.output_dir, &out.report)?;
    info!(path = %report_path.display(), "wrote run report");

    for (kind, ds) in &out.combined {
        info!(kind = %kind, records = ds.len(), columns = %ds.header().cells().join(", "), "final dataset");
    }
    if out.report.skipped() > 0 {
        warn!(skipped = out.report.skipped(), "some categories were skipped; see run report");
    }
    info!(files = written.len(), elapsed = ?start.elapsed(), "all done");
    Ok(())
}
