//! gene-import CLI entry point
//!
//! Updates the gene table from NCBI gene_info, supplementary gene and GTF files.

use anyhow::Context;
use clap::Parser;
use gene_import::core::{
    count_lines, BufferedGeneStore, GeneStore, ImportOptions, MemoryGeneStore, DEFAULT_BULK_SIZE,
    HUMAN_TAXONOMY_ID,
};
use gene_import::formats;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "gene-import")]
#[command(about = "Update the gene table from gene_info, supplementary gene and GTF files")]
#[command(version)]
struct Cli {
    /// Gene table (TSV), created if it does not exist
    #[arg(long, default_value = "gene_table.tsv")]
    table: PathBuf,

    /// NCBI gene_info file
    #[arg(long)]
    genes: Option<PathBuf>,

    /// Supplementary gene file (symbol, type, cytoband, length)
    #[arg(long = "supp-genes")]
    supp_genes: Option<PathBuf>,

    /// GTF file for calculating and storing gene lengths
    #[arg(long)]
    gtf: Option<PathBuf>,

    /// Taxonomy id of the organism to import
    #[arg(long, default_value_t = HUMAN_TAXONOMY_ID)]
    taxonomy: u32,

    /// Genes queued before they are written to the table
    #[arg(long = "buffer-size", default_value_t = DEFAULT_BULK_SIZE)]
    buffer_size: usize,
}

fn announce(what: &str, path: &Path) -> anyhow::Result<()> {
    let shown = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    eprintln!("Reading {} from:  {}", what, shown.display());
    let lines = count_lines(path).with_context(|| format!("Failed to read {}", path.display()))?;
    eprintln!(" --> total number of lines:  {}", lines);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let start = Instant::now();

    if cli.genes.is_none() && cli.supp_genes.is_none() && cli.gtf.is_none() {
        anyhow::bail!("Nothing to import: pass at least one of --genes, --supp-genes or --gtf");
    }

    let options = ImportOptions {
        taxonomy_id: cli.taxonomy,
        buffer_size: cli.buffer_size,
        ..ImportOptions::default()
    };

    let table = if cli.table.exists() {
        eprintln!("Loading gene table: {:?}", cli.table);
        MemoryGeneStore::load(&cli.table)
            .with_context(|| format!("Failed to load gene table {}", cli.table.display()))?
    } else {
        eprintln!("Creating gene table: {:?}", cli.table);
        MemoryGeneStore::new()
    };
    let mut store = BufferedGeneStore::new(table, options.buffer_size);

    if let Some(genes) = &cli.genes {
        announce("gene data", genes)?;
        let report = formats::import_gene_info(genes, &mut store, &options)
            .with_context(|| format!("Failed to import {}", genes.display()))?;
        // Gene lengths are looked up by symbol, so new genes must be visible first
        store.flush()?;

        eprintln!("\n=== Gene Import Statistics ===");
        eprintln!("Records:          {}", report.records);
        eprintln!("Other organism:   {}", report.other_taxonomy);
        eprintln!("microRNA:         {}", report.microrna);
        eprintln!("Added (official): {}", report.added_official);
        eprintln!("Added (no off.):  {}", report.added_provisional);
        eprintln!("Already in table: {}", report.already_in_table);
        eprintln!("Duplicate symbol: {}", report.duplicate_symbols);
    }

    if let Some(supp_genes) = &cli.supp_genes {
        announce("supp. gene data", supp_genes)?;
        let stats = formats::import_supp_genes(supp_genes, &mut store)
            .with_context(|| format!("Failed to import {}", supp_genes.display()))?;
        store.flush()?;

        eprintln!("\n=== Supplementary Gene Statistics ===");
        eprintln!("Records:          {}", stats.total);
        eprintln!("Added:            {}", stats.added);
    }

    if let Some(gtf) = &cli.gtf {
        announce("loci data", gtf)?;
        let report = formats::import_gene_lengths(gtf, &mut store, &options)
            .with_context(|| format!("Failed to import {}", gtf.display()))?;

        eprintln!("\n=== Gene Length Statistics ===");
        eprintln!("Records:          {}", report.records);
        eprintln!("Gene groups:      {}", report.groups);
        eprintln!("Updated:          {}", report.updated);
        eprintln!("Not found:        {}", report.not_found.len());
        eprintln!("Other chromosome: {}", report.chromosome_mismatch);
    }

    let table = store.into_inner()?;
    table
        .save(&cli.table)
        .with_context(|| format!("Failed to write gene table {}", cli.table.display()))?;
    eprintln!("\nGene table written: {:?} ({} genes)", cli.table, table.len());
    eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());

    Ok(())
}
