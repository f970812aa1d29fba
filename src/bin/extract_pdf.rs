use anyhow::{Context, Result};
use refdrugs::{
    config::Config,
    logging, output,
    pdf::{LopdfTableReader, TableReader},
    process::process_pages,
    schema::DocumentCategory,
};
use std::{env, fs, path::Path};
use tracing::info;

/// Run one local PDF through extraction without touching the network.
fn main() -> Result<()> {
    logging::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 || args.len() > 4 {
        eprintln!(
            "Usage: {} <lista_a|lista_a_excluidos|lista_b|lista_b_excluidos> <file.pdf> [out.csv]",
            args[0]
        );
        std::process::exit(1);
    }
    let category: DocumentCategory = args[1].parse()?;
    let pdf_path = Path::new(&args[2]);

    let cfg = Config::load(env::var("REFDRUGS_CONFIG").ok().as_deref().map(Path::new))?;
    let bytes = fs::read(pdf_path).with_context(|| format!("reading {}", pdf_path.display()))?;

    let pages = LopdfTableReader.read_pages(&bytes)?;
    let dataset = process_pages(&pages, category, &cfg.classifier())?;

    println!("{}: {} records", category, dataset.len());
    println!("columns: {}", dataset.header().cells().join(" | "));

    if let Some(out) = args.get(3) {
        output::write_dataset_csv(out, &dataset)?;
        info!(path = %out, "wrote csv");
    }
    Ok(())
}
