//! Performance benchmarks for gene-import
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gene_import::core::{gene_length, ImportOptions, Locus, MemoryGeneStore};
use gene_import::formats::gene_info::import_gene_info_reader;

/// Exon-like loci: `count` exons of 150bp spread over a gene, every third overlapping its neighbour
fn synthetic_loci(count: u64) -> Vec<Locus> {
    (0..count)
        .map(|i| {
            let start = 1_000_000 + i * 400;
            let end = start + if i % 3 == 0 { 550 } else { 150 };
            Locus::new(start, end)
        })
        .collect()
}

/// gene_info lines with a handful of duplicate symbols
fn synthetic_gene_info(count: usize) -> String {
    (0..count)
        .map(|i| {
            let official = if i % 50 == 0 { "DUP".to_string() } else { format!("GENE{}", i) };
            format!(
                "9606\t{}\tLOC{}\t-\tALIAS{}\t-\t1\t1p36.{}\tdescription\tprotein-coding\t{}",
                i + 1,
                i,
                i,
                i % 40,
                official
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Benchmark union length for genes of different exon counts
fn bench_gene_length(c: &mut Criterion) {
    let mut group = c.benchmark_group("gene_length");

    for count in [10u64, 100, 1000].iter() {
        let loci = synthetic_loci(*count);
        group.throughput(Throughput::Elements(*count));
        group.bench_with_input(BenchmarkId::from_parameter(count), &loci, |b, loci| {
            b.iter(|| black_box(gene_length(black_box(loci)).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark gene_info reconciliation into an empty store
fn bench_reconcile(c: &mut Criterion) {
    let input = synthetic_gene_info(20_000);
    let options = ImportOptions::default();

    c.bench_function("reconcile_20k_genes", |b| {
        b.iter(|| {
            let mut store = MemoryGeneStore::new();
            let report = import_gene_info_reader(black_box(input.as_bytes()), &mut store, &options).unwrap();
            black_box(report)
        })
    });
}

criterion_group!(benches, bench_gene_length, bench_reconcile);
criterion_main!(benches);
