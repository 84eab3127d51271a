//! Clap command tree definition.

use clap::{value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    Command::new("vecset")
        .about("Embedding vector dataset toolkit: generate .vec shard datasets and maintain them")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(build_generate())
        .subcommand(build_dedup())
}

fn build_generate() -> Command {
    Command::new("generate")
        .about("Embed a document corpus into a .vec dataset with a manifest")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("YAML config path")
                .value_parser(value_parser!(PathBuf))
                .required(true),
        )
        .arg(
            Arg::new("source")
                .long("source")
                .help("Override source (wikipedia, text_dir, or messages)"),
        )
        .arg(
            Arg::new("source-path")
                .long("source-path")
                .help("Override the selected source's path")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("granularity")
                .long("granularity")
                .help("Override granularity (sentence or paragraph)"),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .help("Override output.output_dir")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("output-name")
                .long("output-name")
                .help("Override output.name (dataset subdirectory, e.g. wiki-1024-sentences)"),
        )
        .arg(
            Arg::new("batch-size")
                .long("batch-size")
                .help("Override embedder.batch_size")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("max-docs")
                .long("max-docs")
                .help("Override the selected source's max_docs")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("model-name")
                .long("model-name")
                .help("Override embedder.model_name (e.g. all-MiniLM-L6-v2 or bge-m3)"),
        )
        .arg(
            Arg::new("dim")
                .long("dim")
                .help("Override embedder.dim (e.g. 384 for MiniLM, 1024 for bge-m3)")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("num-shards")
                .long("num-shards")
                .help("Split document vectors into N shard files (default: 1, no sharding)")
                .value_parser(value_parser!(usize))
                .default_value("1"),
        )
}

fn build_dedup() -> Command {
    Command::new("dedup")
        .about("Remove exact-duplicate vectors from a dataset and re-shard it")
        .arg(
            Arg::new("dataset_dir")
                .help("Dataset directory containing meta.json and vec shards")
                .value_parser(value_parser!(PathBuf))
                .required(true),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("Count duplicates without modifying anything")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-backup")
                .long("no-backup")
                .help("Skip creating .pre-dedup backup files")
                .action(ArgAction::SetTrue),
        )
}
