// Copyright 2026 Oxide Computer Company

//! The `synth-merge` command.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use synth_merge::{MergeEngine, MergeResult};
use synth_merge_fs::{SynthConfig, TreeReader, TreeWriter};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod cli;

use cli::Cli;

fn init_tracing(verbose: u8) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "info".to_string(),
            2 => "info,synth_merge=debug,synth_merge_fs=debug".to_string(),
            _ => "debug,synth_merge=trace,synth_merge_fs=trace".to_string(),
        },
    };
    let filter = EnvFilter::try_new(&base_filter)
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(verbose >= 2)
                .with_writer(io::stderr)
                .compact(),
        )
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = run(&cli)?;
    let stdout = io::stdout();
    report(&result, &mut stdout.lock())?;
    Ok(())
}

/// Runs one synthesis pass: configuration, read, merge, write.
fn run(cli: &Cli) -> Result<MergeResult> {
    let config = match &cli.config {
        Some(path) => SynthConfig::load(path)?,
        None => SynthConfig::default(),
    };

    if let Some(library) = &config.library {
        info!(
            api = %library.api,
            version = %library.version,
            proto_path = library.proto_path.as_deref().unwrap_or("-"),
            "merging generated library"
        );
        for (name, value) in &library.generator_args {
            debug!(%name, %value, "generator argument");
        }
    }

    let mut rules = config.rule_table()?;
    if let Some(preset) = cli.preset {
        rules.extend(preset.rules());
    }
    debug!(rules = rules.len(), "compiled merge rules");

    // Output from earlier runs is never an input, even when nested.
    let exclude = config.exclude_patterns()?;
    let generated = TreeReader::new(&cli.generated)
        .exclude(exclude.clone())
        .skip_dir(&cli.output)
        .read()
        .with_context(|| format!("reading generated tree {}", cli.generated))?;
    let overrides = TreeReader::new(&cli.overrides)
        .exclude(exclude)
        .skip_dir(&cli.output)
        .skip_dir(&cli.generated)
        .read()
        .with_context(|| format!("reading override tree {}", cli.overrides))?;

    let result = MergeEngine::new(rules).merge(&generated, &overrides)?;
    TreeWriter::new(&cli.output)
        .dry_run(cli.dry_run)
        .write(result.tree())
        .with_context(|| format!("writing merged tree to {}", cli.output))?;

    Ok(result)
}

/// Writes one line per decision.
fn report(result: &MergeResult, out: &mut impl Write) -> io::Result<()> {
    for decision in result.decisions() {
        writeln!(out, "{decision}")?;
    }
    Ok(())
}
