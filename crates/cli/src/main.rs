//! vecset CLI: generate embedding datasets and maintain them.
//!
//! Two subcommands:
//! - `vecset generate --config cfg.yaml [overrides]` embeds a corpus into
//!   a `.vec` dataset (shards + `queries.vec` + `meta.json`)
//! - `vecset dedup DIR [--dry-run] [--no-backup]` removes exact-duplicate
//!   vectors from an existing dataset and re-shards it

mod commands;

use anyhow::Context;
use clap::ArgMatches;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::build_cli;
use vecset_pipeline::{run_generate, GenerateConfig};
use vecset_store::{dedup_dataset, DedupOptions};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let matches = build_cli().get_matches();
    if let Err(e) = run(&matches) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    match matches.subcommand() {
        Some(("generate", sub)) => cmd_generate(sub),
        Some(("dedup", sub)) => cmd_dedup(sub),
        _ => unreachable!("subcommand is required"),
    }
}

fn cmd_generate(matches: &ArgMatches) -> anyhow::Result<()> {
    let config_path = matches
        .get_one::<PathBuf>("config")
        .expect("config is required");
    let mut config = GenerateConfig::load(config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;
    apply_overrides(&mut config, matches);

    let num_shards = *matches.get_one::<usize>("num-shards").expect("has default");
    let summary = run_generate(&config, num_shards)?;

    println!(
        "Wrote {} document vectors in {} shard file(s) and {} query vectors to {}",
        summary.num_docs,
        summary.shards.len(),
        summary.num_queries,
        summary.dataset_dir.display()
    );
    Ok(())
}

/// Layer CLI flags over the parsed config file.
fn apply_overrides(config: &mut GenerateConfig, matches: &ArgMatches) {
    if let Some(source) = matches.get_one::<String>("source") {
        config.source = Some(source.clone());
    }
    if let Some(path) = matches.get_one::<PathBuf>("source-path") {
        config.wikipedia.path = Some(path.clone());
        config.text_dir.path = Some(path.clone());
        config.messages.path = Some(path.clone());
    }
    if let Some(granularity) = matches.get_one::<String>("granularity") {
        config.granularity = Some(granularity.clone());
    }
    if let Some(dir) = matches.get_one::<PathBuf>("output-dir") {
        config.output.output_dir = dir.clone();
    }
    if let Some(name) = matches.get_one::<String>("output-name") {
        config.output.name = Some(name.clone());
    }
    if let Some(&batch_size) = matches.get_one::<usize>("batch-size") {
        config.embedder.batch_size = batch_size;
    }
    if let Some(&max_docs) = matches.get_one::<usize>("max-docs") {
        config.wikipedia.max_docs = Some(max_docs);
        config.text_dir.max_docs = Some(max_docs);
        config.messages.max_docs = Some(max_docs);
    }
    if let Some(model) = matches.get_one::<String>("model-name") {
        config.embedder.model_name = model.clone();
    }
    if let Some(&dim) = matches.get_one::<usize>("dim") {
        config.embedder.dim = dim;
    }
}

fn cmd_dedup(matches: &ArgMatches) -> anyhow::Result<()> {
    let dir = matches
        .get_one::<PathBuf>("dataset_dir")
        .expect("dataset_dir is required");
    let options = DedupOptions {
        dry_run: matches.get_flag("dry-run"),
        backup: !matches.get_flag("no-backup"),
    };

    let report = dedup_dataset(dir, &options)
        .with_context(|| format!("deduplicating {}", dir.display()))?;

    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string());
    if options.dry_run {
        println!(
            "[dry-run] {name}: {} vectors, {} duplicates, {} unique",
            report.total, report.duplicates, report.unique
        );
    } else if !report.resharded {
        println!(
            "{name}: {} vectors, no duplicates found, nothing to do",
            report.total
        );
    } else {
        println!(
            "{name}: {} vectors -> {} unique ({} duplicates removed)",
            report.total, report.unique, report.duplicates
        );
    }
    Ok(())
}
