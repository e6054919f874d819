//! Entry point: dispatches to `build` or `search` and reports errors on
//! the way out, matching the teacher's `eprintln!` + non-zero exit
//! convention but routed through `anyhow` for context and `tracing` for
//! structured progress output.

use std::io::{self, BufRead, Write};
use std::time::Instant;

use clap::Parser;

use corpusidx::cli::{Cli, Commands};
use corpusidx::config::{BuildConfig, SearchConfig};
use corpusidx::index::QueryContext;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            input,
            output,
            batch_size,
            min_token_len,
        } => {
            let mut config = BuildConfig::new(input, output);
            config.batch_size = batch_size;
            config.min_token_len = min_token_len;

            let summary = corpusidx::build::run_build(&config)?;
            println!(
                "build complete: {} documents, {} terms, {} partials, {:.2}s",
                summary.documents_indexed,
                summary.term_count,
                summary.partial_count,
                summary.elapsed_secs
            );
            Ok(())
        }

        Commands::Search {
            index,
            simhash_threshold,
            dedup,
            limit,
        } => {
            let mut config = SearchConfig::new(index);
            config.simhash_threshold = simhash_threshold;
            config.dedup_mode = Commands::dedup_mode(&dedup);
            config.max_results = limit;

            let ctx = QueryContext::load(config)?;
            run_repl(&ctx, limit)
        }
    }
}

fn run_repl(ctx: &QueryContext, limit: usize) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("Look for anything: ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if matches!(query.to_lowercase().as_str(), "exit" | "quit" | "q") {
            break;
        }

        let started = Instant::now();
        let result = ctx.search(query);
        let elapsed = started.elapsed().as_secs_f64();

        if result.doc_ids.is_empty() {
            println!("No results found.");
        } else {
            println!(
                "Found {} {} in {elapsed:.4} seconds",
                result.doc_ids.len(),
                if result.doc_ids.len() == 1 { "result" } else { "results" }
            );
            for doc_id in result.doc_ids.iter().take(limit) {
                println!("  {doc_id}");
            }
        }
    }

    Ok(())
}
